use crate::models::DbAccount;
use chrono::Utc;
use eyre::Result;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

pub async fn create_account(
    pool: &Pool<Postgres>,
    role: &str,
    display_name: &str,
    email: &str,
    api_token: &str,
) -> Result<DbAccount> {
    let id = Uuid::new_v4();
    let now = Utc::now();

    let account = sqlx::query_as::<_, DbAccount>(
        r#"
        INSERT INTO accounts (id, role, display_name, email, api_token, created_at)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING id, role, display_name, email, api_token, created_at
        "#,
    )
    .bind(id)
    .bind(role)
    .bind(display_name)
    .bind(email)
    .bind(api_token)
    .bind(now)
    .fetch_one(pool)
    .await?;

    Ok(account)
}

pub async fn get_account_by_id(pool: &Pool<Postgres>, id: Uuid) -> Result<Option<DbAccount>> {
    let account = sqlx::query_as::<_, DbAccount>(
        r#"
        SELECT id, role, display_name, email, api_token, created_at
        FROM accounts
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(account)
}

/// Opaque bearer-token lookup backing the authentication boundary.
pub async fn find_account_by_token(
    pool: &Pool<Postgres>,
    api_token: &str,
) -> Result<Option<DbAccount>> {
    let account = sqlx::query_as::<_, DbAccount>(
        r#"
        SELECT id, role, display_name, email, api_token, created_at
        FROM accounts
        WHERE api_token = $1
        "#,
    )
    .bind(api_token)
    .fetch_optional(pool)
    .await?;

    Ok(account)
}
