//! # Scheduling Handlers
//!
//! Orchestration for ad run scheduling: single runs, cancel, reschedule,
//! retry, pause/resume, and the best-effort bulk scheduler.
//!
//! Schedule creation always runs inside a transaction that takes a
//! per-date advisory lock before re-running the conflict query, so two
//! concurrent requests for the same date serialize instead of both reading
//! "no conflict" and writing overlapping rows.

use axum::{
    extract::{Path, State},
    Json,
};
use serde_json::json;
use std::sync::Arc;

use bazaar_core::{
    errors::{BazaarError, BazaarResult, ConflictingAd},
    models::{
        execution_log::ExecutionLog,
        schedule::{
            BulkScheduleOutcome, BulkScheduleRequest, BulkScheduleResponse,
            BulkTransitionResponse, RescheduleRequest, ScheduleResponse, ScheduleRunRequest,
            ScheduleStatus,
        },
    },
    scheduling, validate,
};
use bazaar_db::models::{DbSchedule, DbTimeSlot};
use bazaar_db::repositories::{execution_log, schedule as schedule_repo, time_slot as slot_repo};
use chrono::NaiveDate;
use uuid::Uuid;

use crate::{
    middleware::{auth::AuthPrincipal, error_handling::AppError},
    ApiState,
};

#[axum::debug_handler]
pub async fn schedule_ad_run(
    State(state): State<Arc<ApiState>>,
    AuthPrincipal(principal): AuthPrincipal,
    Json(payload): Json<ScheduleRunRequest>,
) -> Result<Json<ScheduleResponse>, AppError> {
    principal.require_admin()?;

    // Date validation happens before any database round-trip
    let run_date = validate::parse_date(&payload.date)?;

    let ad = bazaar_db::repositories::ad::get_ad_by_id(&state.db_pool, payload.ad_id)
        .await
        .map_err(BazaarError::Database)?
        .ok_or_else(|| BazaarError::NotFound(format!("Ad with ID {} not found", payload.ad_id)))?;

    let slot = slot_repo::get_time_slot_by_id(&state.db_pool, payload.time_slot_id)
        .await
        .map_err(BazaarError::Database)?
        .ok_or_else(|| {
            BazaarError::NotFound(format!(
                "Time slot with ID {} not found",
                payload.time_slot_id
            ))
        })?;

    if slot.ad_id != ad.id {
        return Err(AppError(BazaarError::Validation(format!(
            "Time slot {} does not belong to ad {}",
            slot.id, ad.id
        ))));
    }

    let schedule = create_checked_schedule(&state, ad.id, &slot, run_date).await?;

    Ok(Json(schedule_response(schedule)))
}

#[axum::debug_handler]
pub async fn cancel_schedule(
    State(state): State<Arc<ApiState>>,
    AuthPrincipal(principal): AuthPrincipal,
    Path(id): Path<Uuid>,
) -> Result<Json<ScheduleResponse>, AppError> {
    principal.require_admin()?;

    let schedule = schedule_repo::cancel_schedule(&state.db_pool, id)
        .await
        .map_err(BazaarError::Database)?
        .ok_or_else(|| BazaarError::NotFound(format!("Schedule with ID {} not found", id)))?;

    execution_log::append(
        &state.db_pool,
        schedule.id,
        "cancel",
        "success",
        Some("Run cancelled"),
        None,
    )
    .await
    .map_err(BazaarError::Database)?;

    Ok(Json(schedule_response(schedule)))
}

#[axum::debug_handler]
pub async fn reschedule_ad_run(
    State(state): State<Arc<ApiState>>,
    AuthPrincipal(principal): AuthPrincipal,
    Path(id): Path<Uuid>,
    Json(payload): Json<RescheduleRequest>,
) -> Result<Json<ScheduleResponse>, AppError> {
    principal.require_admin()?;

    // Date validation happens before any write
    let new_date = validate::parse_date(&payload.date)?;

    let existing = schedule_repo::get_schedule_by_id(&state.db_pool, id)
        .await
        .map_err(BazaarError::Database)?
        .ok_or_else(|| BazaarError::NotFound(format!("Schedule with ID {} not found", id)))?;

    // The target slot is either the explicitly requested one or the one the
    // schedule already points at
    let slot_id = payload.time_slot_id.unwrap_or(existing.time_slot_id);
    let slot = slot_repo::get_time_slot_by_id(&state.db_pool, slot_id)
        .await
        .map_err(BazaarError::Database)?
        .ok_or_else(|| BazaarError::NotFound(format!("Time slot with ID {} not found", slot_id)))?;

    if slot.ad_id != existing.ad_id {
        return Err(AppError(BazaarError::Validation(format!(
            "Time slot {} does not belong to ad {}",
            slot.id, existing.ad_id
        ))));
    }

    // Conflict detection is re-run against the new date and slot; the row
    // being moved is excluded so it cannot conflict with itself.
    let mut tx = state
        .db_pool
        .begin()
        .await
        .map_err(|e| BazaarError::Database(e.into()))?;

    schedule_repo::lock_run_date(&mut *tx, new_date)
        .await
        .map_err(BazaarError::Database)?;

    let conflicts = schedule_repo::find_conflicting_ads(
        &mut *tx,
        new_date,
        scheduling::weekday_index(new_date),
        slot.start_time,
        slot.end_time,
        Some(existing.id),
    )
    .await
    .map_err(BazaarError::Database)?;

    if !conflicts.is_empty() {
        return Err(AppError(BazaarError::conflict(to_conflicting_ads(
            conflicts,
        ))));
    }

    let updated = schedule_repo::reschedule(&mut *tx, id, new_date, payload.time_slot_id)
        .await
        .map_err(BazaarError::Database)?
        .ok_or_else(|| BazaarError::NotFound(format!("Schedule with ID {} not found", id)))?;

    execution_log::append(
        &mut *tx,
        updated.id,
        "reschedule",
        "success",
        Some("Run rescheduled"),
        Some(json!({ "run_date": updated.run_date, "time_slot_id": updated.time_slot_id })),
    )
    .await
    .map_err(BazaarError::Database)?;

    tx.commit()
        .await
        .map_err(|e| BazaarError::Database(e.into()))?;

    Ok(Json(schedule_response(updated)))
}

#[axum::debug_handler]
pub async fn retry_failed_schedule(
    State(state): State<Arc<ApiState>>,
    AuthPrincipal(principal): AuthPrincipal,
    Path(id): Path<Uuid>,
) -> Result<Json<ScheduleResponse>, AppError> {
    principal.require_admin()?;

    // By contract the current status is not checked; the reset is idempotent
    let schedule = schedule_repo::reset_for_retry(&state.db_pool, id)
        .await
        .map_err(BazaarError::Database)?
        .ok_or_else(|| BazaarError::NotFound(format!("Schedule with ID {} not found", id)))?;

    execution_log::append(
        &state.db_pool,
        schedule.id,
        "retry",
        "success",
        Some("Retry counters reset"),
        None,
    )
    .await
    .map_err(BazaarError::Database)?;

    Ok(Json(schedule_response(schedule)))
}

#[axum::debug_handler]
pub async fn pause_ad_schedules(
    State(state): State<Arc<ApiState>>,
    AuthPrincipal(principal): AuthPrincipal,
    Path(ad_id): Path<Uuid>,
) -> Result<Json<BulkTransitionResponse>, AppError> {
    transition_ad_schedules(
        &state,
        principal,
        ad_id,
        ScheduleStatus::Scheduled,
        ScheduleStatus::Paused,
        "pause",
    )
    .await
}

#[axum::debug_handler]
pub async fn resume_ad_schedules(
    State(state): State<Arc<ApiState>>,
    AuthPrincipal(principal): AuthPrincipal,
    Path(ad_id): Path<Uuid>,
) -> Result<Json<BulkTransitionResponse>, AppError> {
    transition_ad_schedules(
        &state,
        principal,
        ad_id,
        ScheduleStatus::Paused,
        ScheduleStatus::Scheduled,
        "resume",
    )
    .await
}

async fn transition_ad_schedules(
    state: &ApiState,
    principal: bazaar_core::principal::Principal,
    ad_id: Uuid,
    from: ScheduleStatus,
    to: ScheduleStatus,
    action: &str,
) -> Result<Json<BulkTransitionResponse>, AppError> {
    principal.require_admin()?;

    let exists = bazaar_db::repositories::ad::get_ad_by_id(&state.db_pool, ad_id)
        .await
        .map_err(BazaarError::Database)?
        .is_some();

    if !exists {
        return Err(AppError(BazaarError::NotFound(format!(
            "Ad with ID {} not found",
            ad_id
        ))));
    }

    let transitioned =
        schedule_repo::transition_for_ad(&state.db_pool, ad_id, from.as_str(), to.as_str())
            .await
            .map_err(BazaarError::Database)?;

    for schedule in &transitioned {
        execution_log::append(
            &state.db_pool,
            schedule.id,
            action,
            "success",
            None,
            None,
        )
        .await
        .map_err(BazaarError::Database)?;
    }

    Ok(Json(BulkTransitionResponse {
        updated: transitioned.len() as u64,
    }))
}

#[axum::debug_handler]
pub async fn get_schedule(
    State(state): State<Arc<ApiState>>,
    AuthPrincipal(principal): AuthPrincipal,
    Path(id): Path<Uuid>,
) -> Result<Json<ScheduleResponse>, AppError> {
    principal.require_admin()?;

    let schedule = schedule_repo::get_schedule_by_id(&state.db_pool, id)
        .await
        .map_err(BazaarError::Database)?
        .ok_or_else(|| BazaarError::NotFound(format!("Schedule with ID {} not found", id)))?;

    Ok(Json(schedule_response(schedule)))
}

#[axum::debug_handler]
pub async fn get_schedule_logs(
    State(state): State<Arc<ApiState>>,
    AuthPrincipal(principal): AuthPrincipal,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<ExecutionLog>>, AppError> {
    principal.require_admin()?;

    let exists = schedule_repo::get_schedule_by_id(&state.db_pool, id)
        .await
        .map_err(BazaarError::Database)?
        .is_some();

    if !exists {
        return Err(AppError(BazaarError::NotFound(format!(
            "Schedule with ID {} not found",
            id
        ))));
    }

    let logs = execution_log::get_logs_by_schedule_id(&state.db_pool, id)
        .await
        .map_err(BazaarError::Database)?;

    let logs = logs
        .into_iter()
        .map(|log| ExecutionLog {
            id: log.id,
            schedule_id: log.schedule_id,
            action: log.action,
            status: log.status,
            message: log.message,
            detail: log.detail,
            created_at: log.created_at,
        })
        .collect();

    Ok(Json(logs))
}

/// Bulk scheduler: replaces each ad's slots wholesale, then schedules every
/// matching day in the range. Per-item failures are recorded in the result
/// list and never abort the batch.
#[axum::debug_handler]
pub async fn bulk_schedule_ads(
    State(state): State<Arc<ApiState>>,
    AuthPrincipal(principal): AuthPrincipal,
    Json(payload): Json<BulkScheduleRequest>,
) -> Result<Json<BulkScheduleResponse>, AppError> {
    principal.require_admin()?;

    // Request-level validation is fail-fast; only per-(ad, date) work is
    // allowed to fail partially
    let start_date = validate::parse_date(&payload.start_date)?;
    let end_date = validate::parse_date(&payload.end_date)?;
    if start_date > end_date {
        return Err(AppError(BazaarError::Validation(format!(
            "Start date {} is after end date {}",
            payload.start_date, payload.end_date
        ))));
    }

    let mut valid_slots = Vec::with_capacity(payload.slots.len());
    for slot in &payload.slots {
        valid_slots.push(slot.validate()?);
    }

    let mut results = Vec::new();

    for ad_id in &payload.ad_ids {
        let ad = match bazaar_db::repositories::ad::get_ad_by_id(&state.db_pool, *ad_id).await {
            Ok(Some(ad)) => ad,
            Ok(None) => {
                results.push(BulkScheduleOutcome::failed(
                    *ad_id,
                    payload.start_date.clone(),
                    None,
                    format!("Ad with ID {} not found", ad_id),
                ));
                continue;
            }
            Err(err) => {
                tracing::warn!("Bulk schedule: failed to load ad {}: {}", ad_id, err);
                results.push(BulkScheduleOutcome::failed(
                    *ad_id,
                    payload.start_date.clone(),
                    None,
                    err.to_string(),
                ));
                continue;
            }
        };

        // Replace the ad's slots wholesale before scheduling against them
        let created_slots = match slot_repo::replace_time_slots(
            &state.db_pool,
            ad.id,
            &valid_slots,
        )
        .await
        {
            Ok(slots) => slots,
            Err(err) => {
                tracing::warn!(
                    "Bulk schedule: failed to replace slots for ad {}: {}",
                    ad.id,
                    err
                );
                results.push(BulkScheduleOutcome::failed(
                    ad.id,
                    payload.start_date.clone(),
                    None,
                    err.to_string(),
                ));
                continue;
            }
        };

        for slot in &created_slots {
            for date in scheduling::matching_dates(start_date, end_date, &slot.weekdays) {
                match create_checked_schedule(&state, ad.id, slot, date).await {
                    Ok(schedule) => {
                        results.push(BulkScheduleOutcome::scheduled(
                            ad.id,
                            date,
                            slot.id,
                            schedule.id,
                        ));
                    }
                    Err(err) => {
                        tracing::warn!(
                            "Bulk schedule: ad {} on {} failed: {}",
                            ad.id,
                            date,
                            err
                        );
                        results.push(BulkScheduleOutcome::failed(
                            ad.id,
                            date.to_string(),
                            Some(slot.id),
                            err.to_string(),
                        ));
                    }
                }
            }
        }
    }

    let scheduled = results.iter().filter(|r| r.status == "scheduled").count();
    let failed = results.len() - scheduled;

    Ok(Json(BulkScheduleResponse {
        scheduled,
        failed,
        results,
    }))
}

/// Conflict-checked schedule creation. Takes the per-date advisory lock, runs
/// the conflict query, inserts the row, and appends the execution log, all in
/// one transaction.
async fn create_checked_schedule(
    state: &ApiState,
    ad_id: Uuid,
    slot: &DbTimeSlot,
    run_date: NaiveDate,
) -> BazaarResult<DbSchedule> {
    let mut tx = state
        .db_pool
        .begin()
        .await
        .map_err(|e| BazaarError::Database(e.into()))?;

    schedule_repo::lock_run_date(&mut *tx, run_date)
        .await
        .map_err(BazaarError::Database)?;

    let conflicts = schedule_repo::find_conflicting_ads(
        &mut *tx,
        run_date,
        scheduling::weekday_index(run_date),
        slot.start_time,
        slot.end_time,
        None,
    )
    .await
    .map_err(BazaarError::Database)?;

    if !conflicts.is_empty() {
        return Err(BazaarError::conflict(to_conflicting_ads(conflicts)));
    }

    let schedule = schedule_repo::insert_schedule(&mut *tx, ad_id, slot.id, run_date)
        .await
        .map_err(BazaarError::Database)?;

    execution_log::append(
        &mut *tx,
        schedule.id,
        "schedule",
        "success",
        Some("Run scheduled"),
        Some(json!({ "time_slot_id": slot.id, "run_date": run_date })),
    )
    .await
    .map_err(BazaarError::Database)?;

    tx.commit()
        .await
        .map_err(|e| BazaarError::Database(e.into()))?;

    Ok(schedule)
}

fn to_conflicting_ads(rows: Vec<bazaar_db::models::DbConflictingAd>) -> Vec<ConflictingAd> {
    rows.into_iter()
        .map(|row| ConflictingAd {
            id: row.id,
            title: row.title,
            status: row.status,
        })
        .collect()
}

pub(crate) fn schedule_response(schedule: DbSchedule) -> ScheduleResponse {
    ScheduleResponse {
        id: schedule.id,
        ad_id: schedule.ad_id,
        time_slot_id: schedule.time_slot_id,
        run_date: schedule.run_date.to_string(),
        status: schedule.status,
        retry_count: schedule.retry_count,
        max_retries: schedule.max_retries,
        failure_reason: schedule.failure_reason,
        next_retry_at: schedule.next_retry_at,
        created_at: schedule.created_at,
    }
}
