use eyre::Result;
use sqlx::{Pool, Postgres};
use tracing::info;

pub async fn initialize_database(pool: &Pool<Postgres>) -> Result<()> {
    info!("Initializing database schema...");

    // Create accounts table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS accounts (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            role VARCHAR(32) NOT NULL,
            display_name VARCHAR(255) NOT NULL,
            email VARCHAR(255) NOT NULL,
            api_token VARCHAR(255) NOT NULL UNIQUE,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW()
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create ads table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS ads (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            vendor_id UUID NOT NULL REFERENCES accounts(id),
            title VARCHAR(255) NOT NULL,
            description TEXT NOT NULL DEFAULT '',
            kind VARCHAR(32) NOT NULL,
            status VARCHAR(32) NOT NULL DEFAULT 'pending',
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW()
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create time_slots table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS time_slots (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            ad_id UUID NOT NULL REFERENCES ads(id) ON DELETE CASCADE,
            start_time TIME NOT NULL,
            end_time TIME NOT NULL,
            weekdays SMALLINT[] NOT NULL,
            priority SMALLINT NOT NULL DEFAULT 3,
            active BOOLEAN NOT NULL DEFAULT TRUE,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            CONSTRAINT valid_time_range CHECK (end_time > start_time)
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create schedules table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS schedules (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            ad_id UUID NOT NULL REFERENCES ads(id),
            time_slot_id UUID NOT NULL REFERENCES time_slots(id) ON DELETE CASCADE,
            run_date DATE NOT NULL,
            status VARCHAR(32) NOT NULL DEFAULT 'scheduled',
            retry_count INTEGER NOT NULL DEFAULT 0,
            max_retries INTEGER NOT NULL DEFAULT 3,
            failure_reason TEXT NULL,
            next_retry_at TIMESTAMP WITH TIME ZONE NULL,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW()
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create execution_logs table (append-only)
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS execution_logs (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            schedule_id UUID NOT NULL REFERENCES schedules(id) ON DELETE CASCADE,
            action VARCHAR(64) NOT NULL,
            status VARCHAR(32) NOT NULL,
            message TEXT NULL,
            detail JSONB NULL,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW()
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create ad_events table (impressions and clicks)
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS ad_events (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            ad_id UUID NOT NULL REFERENCES ads(id) ON DELETE CASCADE,
            event_type VARCHAR(32) NOT NULL,
            occurred_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW()
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create orders table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS orders (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            vendor_id UUID NOT NULL REFERENCES accounts(id),
            buyer_id UUID NOT NULL REFERENCES accounts(id),
            total_cents BIGINT NOT NULL,
            status VARCHAR(32) NOT NULL DEFAULT 'pending',
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW()
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create chat_messages table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS chat_messages (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            sender_id UUID NOT NULL REFERENCES accounts(id),
            recipient_id UUID NOT NULL REFERENCES accounts(id),
            body TEXT NOT NULL,
            status VARCHAR(32) NOT NULL DEFAULT 'sent',
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW()
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create indexes
    let indexes = [
        "CREATE INDEX IF NOT EXISTS idx_ads_vendor_id ON ads(vendor_id);",
        "CREATE INDEX IF NOT EXISTS idx_ads_status ON ads(status);",
        "CREATE INDEX IF NOT EXISTS idx_time_slots_ad_id ON time_slots(ad_id);",
        "CREATE INDEX IF NOT EXISTS idx_schedules_ad_id ON schedules(ad_id);",
        "CREATE INDEX IF NOT EXISTS idx_schedules_run_date ON schedules(run_date);",
        "CREATE INDEX IF NOT EXISTS idx_schedules_time_slot_id ON schedules(time_slot_id);",
        "CREATE INDEX IF NOT EXISTS idx_execution_logs_schedule_id ON execution_logs(schedule_id);",
        "CREATE INDEX IF NOT EXISTS idx_ad_events_ad_id ON ad_events(ad_id);",
        "CREATE INDEX IF NOT EXISTS idx_orders_vendor_id ON orders(vendor_id);",
        "CREATE INDEX IF NOT EXISTS idx_orders_status ON orders(status);",
        "CREATE INDEX IF NOT EXISTS idx_chat_messages_sender_id ON chat_messages(sender_id);",
        "CREATE INDEX IF NOT EXISTS idx_chat_messages_recipient_id ON chat_messages(recipient_id);",
    ];

    for statement in indexes {
        sqlx::query(statement).execute(pool).await?;
    }

    info!("Database schema initialized successfully.");
    Ok(())
}
