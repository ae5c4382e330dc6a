use crate::models::DbChatMessage;
use chrono::Utc;
use eyre::Result;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

pub async fn create_message(
    pool: &Pool<Postgres>,
    sender_id: Uuid,
    recipient_id: Uuid,
    body: &str,
) -> Result<DbChatMessage> {
    let id = Uuid::new_v4();
    let now = Utc::now();

    let message = sqlx::query_as::<_, DbChatMessage>(
        r#"
        INSERT INTO chat_messages (id, sender_id, recipient_id, body, status, created_at)
        VALUES ($1, $2, $3, $4, 'sent', $5)
        RETURNING id, sender_id, recipient_id, body, status, created_at
        "#,
    )
    .bind(id)
    .bind(sender_id)
    .bind(recipient_id)
    .bind(body)
    .bind(now)
    .fetch_one(pool)
    .await?;

    Ok(message)
}

pub async fn get_message_by_id(pool: &Pool<Postgres>, id: Uuid) -> Result<Option<DbChatMessage>> {
    let message = sqlx::query_as::<_, DbChatMessage>(
        r#"
        SELECT id, sender_id, recipient_id, body, status, created_at
        FROM chat_messages
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(message)
}

pub async fn update_message_status(
    pool: &Pool<Postgres>,
    id: Uuid,
    status: &str,
) -> Result<Option<DbChatMessage>> {
    let message = sqlx::query_as::<_, DbChatMessage>(
        r#"
        UPDATE chat_messages
        SET status = $2
        WHERE id = $1
        RETURNING id, sender_id, recipient_id, body, status, created_at
        "#,
    )
    .bind(id)
    .bind(status)
    .fetch_optional(pool)
    .await?;

    Ok(message)
}

/// Every persisted message the account sent or received, in insertion order.
/// This is the offline catch-up path; socket delivery is best effort only.
pub async fn get_messages_for_account(
    pool: &Pool<Postgres>,
    account_id: Uuid,
) -> Result<Vec<DbChatMessage>> {
    let messages = sqlx::query_as::<_, DbChatMessage>(
        r#"
        SELECT id, sender_id, recipient_id, body, status, created_at
        FROM chat_messages
        WHERE sender_id = $1 OR recipient_id = $1
        ORDER BY created_at ASC
        "#,
    )
    .bind(account_id)
    .fetch_all(pool)
    .await?;

    Ok(messages)
}
