use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use std::str::FromStr;
use std::sync::Arc;

use bazaar_core::{
    errors::BazaarError,
    models::{
        ad::{AdResponse, AdStatus, CreateAdRequest, UpdateAdStatusRequest},
        time_slot::{TimeSlotResponse, UpdateTimeSlotsRequest},
    },
};
use bazaar_db::models::{DbAd, DbTimeSlot};
use uuid::Uuid;

use crate::{
    middleware::{auth::AuthPrincipal, error_handling::AppError},
    ApiState,
};

#[axum::debug_handler]
pub async fn create_ad(
    State(state): State<Arc<ApiState>>,
    AuthPrincipal(principal): AuthPrincipal,
    Json(payload): Json<CreateAdRequest>,
) -> Result<Json<AdResponse>, AppError> {
    principal.require_vendor()?;
    let kind = payload.validate()?;

    let db_ad = bazaar_db::repositories::ad::create_ad(
        &state.db_pool,
        principal.account_id,
        payload.title.trim(),
        &payload.description,
        kind.as_str(),
    )
    .await
    .map_err(BazaarError::Database)?;

    Ok(Json(ad_response(db_ad)))
}

#[derive(Debug, Deserialize)]
pub struct ListAdsQuery {
    pub status: Option<String>,
}

#[axum::debug_handler]
pub async fn list_ads(
    State(state): State<Arc<ApiState>>,
    AuthPrincipal(principal): AuthPrincipal,
    Query(query): Query<ListAdsQuery>,
) -> Result<Json<Vec<AdResponse>>, AppError> {
    // Validate the status filter before touching the database
    let status = match &query.status {
        Some(raw) => Some(AdStatus::from_str(raw)?),
        None => None,
    };

    // Admins see every ad; vendors see their own
    let vendor_filter = if principal.is_admin() {
        None
    } else {
        principal.require_vendor()?;
        Some(principal.account_id)
    };

    let ads = bazaar_db::repositories::ad::list_ads(
        &state.db_pool,
        vendor_filter,
        status.map(|s| s.as_str()),
    )
    .await
    .map_err(BazaarError::Database)?;

    Ok(Json(ads.into_iter().map(ad_response).collect()))
}

#[axum::debug_handler]
pub async fn get_ad(
    State(state): State<Arc<ApiState>>,
    AuthPrincipal(principal): AuthPrincipal,
    Path(id): Path<Uuid>,
) -> Result<Json<AdResponse>, AppError> {
    let db_ad = bazaar_db::repositories::ad::get_ad_by_id(&state.db_pool, id)
        .await
        .map_err(BazaarError::Database)?
        .ok_or_else(|| BazaarError::NotFound(format!("Ad with ID {} not found", id)))?;

    if !principal.may_manage_vendor(db_ad.vendor_id) {
        return Err(AppError(BazaarError::Authorization(
            "Not permitted to view this ad".to_string(),
        )));
    }

    Ok(Json(ad_response(db_ad)))
}

#[axum::debug_handler]
pub async fn update_ad_status(
    State(state): State<Arc<ApiState>>,
    AuthPrincipal(principal): AuthPrincipal,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateAdStatusRequest>,
) -> Result<Json<AdResponse>, AppError> {
    principal.require_admin()?;

    let next: AdStatus = payload.status.parse()?;

    let db_ad = bazaar_db::repositories::ad::get_ad_by_id(&state.db_pool, id)
        .await
        .map_err(BazaarError::Database)?
        .ok_or_else(|| BazaarError::NotFound(format!("Ad with ID {} not found", id)))?;

    let current: AdStatus = db_ad.status.parse()?;
    if !current.can_transition(next) {
        return Err(AppError(BazaarError::Validation(format!(
            "Cannot transition ad from {} to {}",
            current.as_str(),
            next.as_str()
        ))));
    }

    let updated = bazaar_db::repositories::ad::update_ad_status(&state.db_pool, id, next.as_str())
        .await
        .map_err(BazaarError::Database)?
        .ok_or_else(|| BazaarError::NotFound(format!("Ad with ID {} not found", id)))?;

    // Vendor notification is fire-and-forget: a delivery failure is logged
    // and never surfaces to the caller.
    if matches!(next, AdStatus::Approved | AdStatus::Rejected) {
        notify_vendor(&state, &updated, next).await;
    }

    Ok(Json(ad_response(updated)))
}

async fn notify_vendor(state: &ApiState, ad: &DbAd, status: AdStatus) {
    let vendor = match bazaar_db::repositories::account::get_account_by_id(
        &state.db_pool,
        ad.vendor_id,
    )
    .await
    {
        Ok(Some(vendor)) => vendor,
        Ok(None) => {
            tracing::warn!("Vendor {} for ad {} no longer exists", ad.vendor_id, ad.id);
            return;
        }
        Err(err) => {
            tracing::warn!("Failed to load vendor for notification: {}", err);
            return;
        }
    };

    let subject = format!("Your ad '{}' was {}", ad.title, status.as_str());
    let body = format!(
        "The status of your ad '{}' changed to {}.",
        ad.title,
        status.as_str()
    );

    if !state.notifier.send(&vendor.email, &subject, &body).await {
        tracing::warn!("Notification delivery failed for vendor {}", vendor.id);
    }
}

#[axum::debug_handler]
pub async fn update_time_slots(
    State(state): State<Arc<ApiState>>,
    AuthPrincipal(principal): AuthPrincipal,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateTimeSlotsRequest>,
) -> Result<Json<Vec<TimeSlotResponse>>, AppError> {
    let db_ad = bazaar_db::repositories::ad::get_ad_by_id(&state.db_pool, id)
        .await
        .map_err(BazaarError::Database)?
        .ok_or_else(|| BazaarError::NotFound(format!("Ad with ID {} not found", id)))?;

    if !principal.may_manage_vendor(db_ad.vendor_id) {
        return Err(AppError(BazaarError::Authorization(
            "Not permitted to manage this ad's time slots".to_string(),
        )));
    }

    // Validate every slot before the first write
    let mut valid_slots = Vec::with_capacity(payload.slots.len());
    for slot in &payload.slots {
        valid_slots.push(slot.validate()?);
    }

    // Old slots are deleted and new ones inserted inside one transaction
    let created =
        bazaar_db::repositories::time_slot::replace_time_slots(&state.db_pool, id, &valid_slots)
            .await
            .map_err(BazaarError::Database)?;

    Ok(Json(created.into_iter().map(slot_response).collect()))
}

#[axum::debug_handler]
pub async fn get_time_slots(
    State(state): State<Arc<ApiState>>,
    AuthPrincipal(principal): AuthPrincipal,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<TimeSlotResponse>>, AppError> {
    let db_ad = bazaar_db::repositories::ad::get_ad_by_id(&state.db_pool, id)
        .await
        .map_err(BazaarError::Database)?
        .ok_or_else(|| BazaarError::NotFound(format!("Ad with ID {} not found", id)))?;

    if !principal.may_manage_vendor(db_ad.vendor_id) {
        return Err(AppError(BazaarError::Authorization(
            "Not permitted to view this ad's time slots".to_string(),
        )));
    }

    let slots = bazaar_db::repositories::time_slot::get_time_slots_by_ad_id(&state.db_pool, id)
        .await
        .map_err(BazaarError::Database)?;

    Ok(Json(slots.into_iter().map(slot_response).collect()))
}

#[derive(Debug, Deserialize)]
pub struct AdEventRequest {
    pub event: String,
}

/// Unauthenticated tracking endpoint for impressions and clicks.
#[axum::debug_handler]
pub async fn record_ad_event(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<AdEventRequest>,
) -> Result<StatusCode, AppError> {
    if payload.event != "impression" && payload.event != "click" {
        return Err(AppError(BazaarError::Validation(format!(
            "Unknown ad event type: {}",
            payload.event
        ))));
    }

    let exists = bazaar_db::repositories::ad::get_ad_by_id(&state.db_pool, id)
        .await
        .map_err(BazaarError::Database)?
        .is_some();

    if !exists {
        return Err(AppError(BazaarError::NotFound(format!(
            "Ad with ID {} not found",
            id
        ))));
    }

    bazaar_db::repositories::analytics::record_ad_event(&state.db_pool, id, &payload.event)
        .await
        .map_err(BazaarError::Database)?;

    Ok(StatusCode::NO_CONTENT)
}

fn ad_response(ad: DbAd) -> AdResponse {
    AdResponse {
        id: ad.id,
        vendor_id: ad.vendor_id,
        title: ad.title,
        description: ad.description,
        kind: ad.kind,
        status: ad.status,
        created_at: ad.created_at,
    }
}

pub(crate) fn slot_response(slot: DbTimeSlot) -> TimeSlotResponse {
    TimeSlotResponse {
        id: slot.id,
        start: slot.start_time.format("%H:%M").to_string(),
        end: slot.end_time.format("%H:%M").to_string(),
        weekdays: slot.weekdays,
        priority: slot.priority,
        active: slot.active,
    }
}
