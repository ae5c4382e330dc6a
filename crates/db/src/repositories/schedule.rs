use crate::models::{DbConflictingAd, DbSchedule};
use chrono::{NaiveDate, NaiveTime, Utc};
use eyre::Result;
use sqlx::{PgExecutor, Pool, Postgres};
use uuid::Uuid;

/// The conflict predicate: active ads owning an active slot whose weekday set
/// contains the target weekday, whose half-open `[start, end)` window
/// overlaps the candidate window, and which already hold a schedule row for
/// that exact date in `scheduled` or `running` state.
///
/// `exclude_schedule` lets a reschedule ignore its own row. The overlap test
/// must stay in sync with `bazaar_core::scheduling::overlaps`.
pub async fn find_conflicting_ads(
    executor: impl PgExecutor<'_>,
    run_date: NaiveDate,
    weekday: i16,
    start: NaiveTime,
    end: NaiveTime,
    exclude_schedule: Option<Uuid>,
) -> Result<Vec<DbConflictingAd>> {
    tracing::debug!(
        "Checking conflicts: date={}, weekday={}, window={}..{}",
        run_date,
        weekday,
        start,
        end
    );

    let conflicting = sqlx::query_as::<_, DbConflictingAd>(
        r#"
        SELECT DISTINCT a.id, a.title, a.status
        FROM time_slots ts
        JOIN ads a ON a.id = ts.ad_id
        JOIN schedules s ON s.time_slot_id = ts.id AND s.run_date = $1
        WHERE a.status = 'active'
          AND ts.active
          AND $2 = ANY(ts.weekdays)
          AND ts.start_time < $4
          AND ts.end_time > $3
          AND s.status IN ('scheduled', 'running')
          AND ($5::uuid IS NULL OR s.id <> $5)
        ORDER BY a.title
        "#,
    )
    .bind(run_date)
    .bind(weekday)
    .bind(start)
    .bind(end)
    .bind(exclude_schedule)
    .fetch_all(executor)
    .await?;

    Ok(conflicting)
}

/// Serializes schedule creation per calendar date for the lifetime of the
/// surrounding transaction, closing the check-then-insert race.
pub async fn lock_run_date(executor: impl PgExecutor<'_>, run_date: NaiveDate) -> Result<()> {
    sqlx::query("SELECT pg_advisory_xact_lock(hashtext($1))")
        .bind(run_date.to_string())
        .execute(executor)
        .await?;

    Ok(())
}

pub async fn insert_schedule(
    executor: impl PgExecutor<'_>,
    ad_id: Uuid,
    time_slot_id: Uuid,
    run_date: NaiveDate,
) -> Result<DbSchedule> {
    let id = Uuid::new_v4();
    let now = Utc::now();

    tracing::debug!(
        "Creating schedule: id={}, ad_id={}, time_slot_id={}, run_date={}",
        id,
        ad_id,
        time_slot_id,
        run_date
    );

    let schedule = sqlx::query_as::<_, DbSchedule>(
        r#"
        INSERT INTO schedules (id, ad_id, time_slot_id, run_date, status, retry_count, max_retries, created_at)
        VALUES ($1, $2, $3, $4, 'scheduled', 0, 3, $5)
        RETURNING id, ad_id, time_slot_id, run_date, status, retry_count, max_retries,
                  failure_reason, next_retry_at, created_at
        "#,
    )
    .bind(id)
    .bind(ad_id)
    .bind(time_slot_id)
    .bind(run_date)
    .bind(now)
    .fetch_one(executor)
    .await?;

    Ok(schedule)
}

pub async fn get_schedule_by_id(pool: &Pool<Postgres>, id: Uuid) -> Result<Option<DbSchedule>> {
    let schedule = sqlx::query_as::<_, DbSchedule>(
        r#"
        SELECT id, ad_id, time_slot_id, run_date, status, retry_count, max_retries,
               failure_reason, next_retry_at, created_at
        FROM schedules
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(schedule)
}

/// Marks a schedule cancelled, returning `None` when no row was touched.
pub async fn cancel_schedule(pool: &Pool<Postgres>, id: Uuid) -> Result<Option<DbSchedule>> {
    let schedule = sqlx::query_as::<_, DbSchedule>(
        r#"
        UPDATE schedules
        SET status = 'cancelled'
        WHERE id = $1
        RETURNING id, ad_id, time_slot_id, run_date, status, retry_count, max_retries,
                  failure_reason, next_retry_at, created_at
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(schedule)
}

/// Moves a schedule to a new date (and optionally a new slot), resetting its
/// status to `scheduled` and clearing failure bookkeeping.
pub async fn reschedule(
    executor: impl PgExecutor<'_>,
    id: Uuid,
    run_date: NaiveDate,
    time_slot_id: Option<Uuid>,
) -> Result<Option<DbSchedule>> {
    let schedule = sqlx::query_as::<_, DbSchedule>(
        r#"
        UPDATE schedules
        SET run_date = $2,
            time_slot_id = COALESCE($3, time_slot_id),
            status = 'scheduled',
            failure_reason = NULL,
            next_retry_at = NULL
        WHERE id = $1
        RETURNING id, ad_id, time_slot_id, run_date, status, retry_count, max_retries,
                  failure_reason, next_retry_at, created_at
        "#,
    )
    .bind(id)
    .bind(run_date)
    .bind(time_slot_id)
    .fetch_optional(executor)
    .await?;

    Ok(schedule)
}

/// Resets retry bookkeeping and returns the schedule to `scheduled`. By
/// contract this does not require the current status to be `failed`.
pub async fn reset_for_retry(pool: &Pool<Postgres>, id: Uuid) -> Result<Option<DbSchedule>> {
    let schedule = sqlx::query_as::<_, DbSchedule>(
        r#"
        UPDATE schedules
        SET status = 'scheduled',
            retry_count = 0,
            failure_reason = NULL,
            next_retry_at = NULL
        WHERE id = $1
        RETURNING id, ad_id, time_slot_id, run_date, status, retry_count, max_retries,
                  failure_reason, next_retry_at, created_at
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(schedule)
}

/// Bulk status transition for an ad's schedules (pause and resume). One
/// UPDATE statement, so the transition is atomic across the matched rows.
pub async fn transition_for_ad(
    pool: &Pool<Postgres>,
    ad_id: Uuid,
    from: &str,
    to: &str,
) -> Result<Vec<DbSchedule>> {
    tracing::debug!(
        "Bulk transition: ad_id={}, from={}, to={}",
        ad_id,
        from,
        to
    );

    let schedules = sqlx::query_as::<_, DbSchedule>(
        r#"
        UPDATE schedules
        SET status = $3
        WHERE ad_id = $1 AND status = $2
        RETURNING id, ad_id, time_slot_id, run_date, status, retry_count, max_retries,
                  failure_reason, next_retry_at, created_at
        "#,
    )
    .bind(ad_id)
    .bind(from)
    .bind(to)
    .fetch_all(pool)
    .await?;

    Ok(schedules)
}
