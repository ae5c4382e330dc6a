use crate::models::DbAd;
use chrono::Utc;
use eyre::Result;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

pub async fn create_ad(
    pool: &Pool<Postgres>,
    vendor_id: Uuid,
    title: &str,
    description: &str,
    kind: &str,
) -> Result<DbAd> {
    let id = Uuid::new_v4();
    let now = Utc::now();

    tracing::debug!(
        "Creating ad: id={}, vendor_id={}, title={}, kind={}",
        id,
        vendor_id,
        title,
        kind
    );

    let ad = sqlx::query_as::<_, DbAd>(
        r#"
        INSERT INTO ads (id, vendor_id, title, description, kind, status, created_at)
        VALUES ($1, $2, $3, $4, $5, 'pending', $6)
        RETURNING id, vendor_id, title, description, kind, status, created_at
        "#,
    )
    .bind(id)
    .bind(vendor_id)
    .bind(title)
    .bind(description)
    .bind(kind)
    .bind(now)
    .fetch_one(pool)
    .await?;

    Ok(ad)
}

pub async fn get_ad_by_id(pool: &Pool<Postgres>, id: Uuid) -> Result<Option<DbAd>> {
    let ad = sqlx::query_as::<_, DbAd>(
        r#"
        SELECT id, vendor_id, title, description, kind, status, created_at
        FROM ads
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(ad)
}

pub async fn list_ads(
    pool: &Pool<Postgres>,
    vendor_id: Option<Uuid>,
    status: Option<&str>,
) -> Result<Vec<DbAd>> {
    let ads = sqlx::query_as::<_, DbAd>(
        r#"
        SELECT id, vendor_id, title, description, kind, status, created_at
        FROM ads
        WHERE ($1::uuid IS NULL OR vendor_id = $1)
          AND ($2::varchar IS NULL OR status = $2)
        ORDER BY created_at DESC
        "#,
    )
    .bind(vendor_id)
    .bind(status)
    .fetch_all(pool)
    .await?;

    Ok(ads)
}

/// Updates the lifecycle status, returning `None` when the ad does not exist.
pub async fn update_ad_status(
    pool: &Pool<Postgres>,
    id: Uuid,
    status: &str,
) -> Result<Option<DbAd>> {
    tracing::debug!("Updating ad status: id={}, status={}", id, status);

    let ad = sqlx::query_as::<_, DbAd>(
        r#"
        UPDATE ads
        SET status = $2
        WHERE id = $1
        RETURNING id, vendor_id, title, description, kind, status, created_at
        "#,
    )
    .bind(id)
    .bind(status)
    .fetch_optional(pool)
    .await?;

    Ok(ad)
}
