use crate::models::DbTimeSlot;
use bazaar_core::models::time_slot::ValidSlot;
use chrono::Utc;
use eyre::Result;
use sqlx::{PgExecutor, Pool, Postgres};
use uuid::Uuid;

pub async fn create_time_slot(
    executor: impl PgExecutor<'_>,
    ad_id: Uuid,
    slot: &ValidSlot,
) -> Result<DbTimeSlot> {
    let id = Uuid::new_v4();
    let now = Utc::now();

    let time_slot = sqlx::query_as::<_, DbTimeSlot>(
        r#"
        INSERT INTO time_slots (id, ad_id, start_time, end_time, weekdays, priority, active, created_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        RETURNING id, ad_id, start_time, end_time, weekdays, priority, active, created_at
        "#,
    )
    .bind(id)
    .bind(ad_id)
    .bind(slot.start)
    .bind(slot.end)
    .bind(&slot.weekdays)
    .bind(slot.priority)
    .bind(slot.active)
    .bind(now)
    .fetch_one(executor)
    .await?;

    Ok(time_slot)
}

pub async fn get_time_slots_by_ad_id(pool: &Pool<Postgres>, ad_id: Uuid) -> Result<Vec<DbTimeSlot>> {
    let time_slots = sqlx::query_as::<_, DbTimeSlot>(
        r#"
        SELECT id, ad_id, start_time, end_time, weekdays, priority, active, created_at
        FROM time_slots
        WHERE ad_id = $1
        ORDER BY start_time ASC
        "#,
    )
    .bind(ad_id)
    .fetch_all(pool)
    .await?;

    Ok(time_slots)
}

pub async fn get_time_slot_by_id(
    executor: impl PgExecutor<'_>,
    id: Uuid,
) -> Result<Option<DbTimeSlot>> {
    let time_slot = sqlx::query_as::<_, DbTimeSlot>(
        r#"
        SELECT id, ad_id, start_time, end_time, weekdays, priority, active, created_at
        FROM time_slots
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(executor)
    .await?;

    Ok(time_slot)
}

pub async fn delete_time_slots_by_ad_id(executor: impl PgExecutor<'_>, ad_id: Uuid) -> Result<()> {
    sqlx::query(
        r#"
        DELETE FROM time_slots
        WHERE ad_id = $1
        "#,
    )
    .bind(ad_id)
    .execute(executor)
    .await?;

    Ok(())
}

/// Wholesale slot replacement: old slots are deleted and the new set is
/// inserted inside one transaction, so readers never observe a half-replaced
/// slot list.
pub async fn replace_time_slots(
    pool: &Pool<Postgres>,
    ad_id: Uuid,
    slots: &[ValidSlot],
) -> Result<Vec<DbTimeSlot>> {
    tracing::debug!("Replacing time slots: ad_id={}, count={}", ad_id, slots.len());

    let mut tx = pool.begin().await?;

    delete_time_slots_by_ad_id(&mut *tx, ad_id).await?;

    let mut created = Vec::with_capacity(slots.len());
    for slot in slots {
        created.push(create_time_slot(&mut *tx, ad_id, slot).await?);
    }

    tx.commit().await?;

    Ok(created)
}
