//! # Availability Handler
//!
//! The conflict checker's read-only face: given a date and a candidate time
//! window, reports whether any active ad already holds an overlapping
//! scheduled run that day.
//!
//! This is a pure read with no locking. A schedule created between this
//! check and a subsequent write is caught by the conflict re-check inside
//! the scheduling transaction.

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;
use std::sync::Arc;

use bazaar_core::{
    errors::{BazaarError, ConflictingAd},
    models::schedule::AvailabilityResponse,
    scheduling, validate,
};

use crate::{
    middleware::{auth::AuthPrincipal, error_handling::AppError},
    ApiState,
};

/// Query parameters for the availability endpoint.
///
/// `date` is `YYYY-MM-DD`; `start` and `end` are 24-hour `HH:MM` bounds of
/// the half-open candidate window `[start, end)`.
#[derive(Debug, Deserialize)]
pub struct AvailabilityQuery {
    pub date: String,
    pub start: String,
    pub end: String,
}

#[axum::debug_handler]
pub async fn check_availability(
    State(state): State<Arc<ApiState>>,
    AuthPrincipal(_principal): AuthPrincipal,
    Query(query): Query<AvailabilityQuery>,
) -> Result<Json<AvailabilityResponse>, AppError> {
    let date = validate::parse_date(&query.date)?;
    let start = validate::parse_time(&query.start)?;
    let end = validate::parse_time(&query.end)?;

    if start >= end {
        return Err(AppError(BazaarError::Validation(format!(
            "Window start {} must be before end {}",
            query.start, query.end
        ))));
    }

    let conflicts = bazaar_db::repositories::schedule::find_conflicting_ads(
        &state.db_pool,
        date,
        scheduling::weekday_index(date),
        start,
        end,
        None,
    )
    .await
    .map_err(BazaarError::Database)?;

    let conflicting_ads: Vec<ConflictingAd> = conflicts
        .into_iter()
        .map(|row| ConflictingAd {
            id: row.id,
            title: row.title,
            status: row.status,
        })
        .collect();

    Ok(Json(AvailabilityResponse {
        is_available: conflicting_ads.is_empty(),
        conflicting_ads,
    }))
}
