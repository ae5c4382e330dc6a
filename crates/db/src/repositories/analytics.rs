//! Aggregate queries behind the analytics endpoints. Counts and sums only;
//! ratio arithmetic (CTR) happens in the core crate where the divide-by-zero
//! guard lives.

use crate::models::{DbEventTotals, DbRevenueRow, DbStatusCount, DbTopAdRow};
use chrono::NaiveDate;
use eyre::Result;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

pub async fn record_ad_event(
    pool: &Pool<Postgres>,
    ad_id: Uuid,
    event_type: &str,
) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO ad_events (id, ad_id, event_type)
        VALUES ($1, $2, $3)
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(ad_id)
    .bind(event_type)
    .execute(pool)
    .await?;

    Ok(())
}

pub async fn ad_counts_by_status(pool: &Pool<Postgres>) -> Result<Vec<DbStatusCount>> {
    let counts = sqlx::query_as::<_, DbStatusCount>(
        r#"
        SELECT status, COUNT(*) AS count
        FROM ads
        GROUP BY status
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(counts)
}

pub async fn schedule_counts_by_status(pool: &Pool<Postgres>) -> Result<Vec<DbStatusCount>> {
    let counts = sqlx::query_as::<_, DbStatusCount>(
        r#"
        SELECT status, COUNT(*) AS count
        FROM schedules
        GROUP BY status
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(counts)
}

pub async fn event_totals(pool: &Pool<Postgres>) -> Result<DbEventTotals> {
    let totals = sqlx::query_as::<_, DbEventTotals>(
        r#"
        SELECT COUNT(*) FILTER (WHERE event_type = 'impression') AS impressions,
               COUNT(*) FILTER (WHERE event_type = 'click') AS clicks
        FROM ad_events
        "#,
    )
    .fetch_one(pool)
    .await?;

    Ok(totals)
}

/// Per-ad impression and click totals. Callers compute and sort by CTR.
pub async fn ad_event_totals(pool: &Pool<Postgres>) -> Result<Vec<DbTopAdRow>> {
    let rows = sqlx::query_as::<_, DbTopAdRow>(
        r#"
        SELECT a.id, a.title,
               COUNT(e.id) FILTER (WHERE e.event_type = 'impression') AS impressions,
               COUNT(e.id) FILTER (WHERE e.event_type = 'click') AS clicks
        FROM ads a
        LEFT JOIN ad_events e ON e.ad_id = a.id
        GROUP BY a.id, a.title
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

pub async fn revenue(
    pool: &Pool<Postgres>,
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
) -> Result<DbRevenueRow> {
    let row = sqlx::query_as::<_, DbRevenueRow>(
        r#"
        SELECT COUNT(*) AS orders,
               COALESCE(SUM(total_cents), 0)::BIGINT AS revenue_cents
        FROM orders
        WHERE status = 'paid'
          AND ($1::date IS NULL OR created_at >= $1::date)
          AND ($2::date IS NULL OR created_at < $2::date + INTERVAL '1 day')
        "#,
    )
    .bind(from)
    .bind(to)
    .fetch_one(pool)
    .await?;

    Ok(row)
}
