use crate::models::DbExecutionLog;
use chrono::Utc;
use eyre::Result;
use sqlx::{PgExecutor, Pool, Postgres};
use uuid::Uuid;

/// Appends one execution log row. The table is append-only; there are no
/// update or delete operations.
pub async fn append(
    executor: impl PgExecutor<'_>,
    schedule_id: Uuid,
    action: &str,
    status: &str,
    message: Option<&str>,
    detail: Option<serde_json::Value>,
) -> Result<DbExecutionLog> {
    let id = Uuid::new_v4();
    let now = Utc::now();

    let log = sqlx::query_as::<_, DbExecutionLog>(
        r#"
        INSERT INTO execution_logs (id, schedule_id, action, status, message, detail, created_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING id, schedule_id, action, status, message, detail, created_at
        "#,
    )
    .bind(id)
    .bind(schedule_id)
    .bind(action)
    .bind(status)
    .bind(message)
    .bind(detail)
    .bind(now)
    .fetch_one(executor)
    .await?;

    Ok(log)
}

pub async fn get_logs_by_schedule_id(
    pool: &Pool<Postgres>,
    schedule_id: Uuid,
) -> Result<Vec<DbExecutionLog>> {
    let logs = sqlx::query_as::<_, DbExecutionLog>(
        r#"
        SELECT id, schedule_id, action, status, message, detail, created_at
        FROM execution_logs
        WHERE schedule_id = $1
        ORDER BY created_at ASC
        "#,
    )
    .bind(schedule_id)
    .fetch_all(pool)
    .await?;

    Ok(logs)
}
