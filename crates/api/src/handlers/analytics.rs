use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;
use std::sync::Arc;

use bazaar_core::{
    errors::BazaarError,
    models::analytics::{
        ctr, AdCounts, DashboardResponse, RevenueResponse, ScheduleCounts, TopAdEntry,
        TopAdsResponse,
    },
    validate,
};
use bazaar_db::repositories::analytics as analytics_repo;

use crate::{
    middleware::{auth::AuthPrincipal, error_handling::AppError},
    ApiState,
};

#[axum::debug_handler]
pub async fn dashboard(
    State(state): State<Arc<ApiState>>,
    AuthPrincipal(principal): AuthPrincipal,
) -> Result<Json<DashboardResponse>, AppError> {
    principal.require_admin()?;

    let mut ads = AdCounts::default();
    for row in analytics_repo::ad_counts_by_status(&state.db_pool)
        .await
        .map_err(BazaarError::Database)?
    {
        match row.status.as_str() {
            "pending" => ads.pending = row.count,
            "approved" => ads.approved = row.count,
            "rejected" => ads.rejected = row.count,
            "active" => ads.active = row.count,
            "expired" => ads.expired = row.count,
            other => tracing::warn!("Unexpected ad status in counts: {}", other),
        }
    }

    let mut schedules = ScheduleCounts::default();
    for row in analytics_repo::schedule_counts_by_status(&state.db_pool)
        .await
        .map_err(BazaarError::Database)?
    {
        match row.status.as_str() {
            "scheduled" => schedules.scheduled = row.count,
            "running" => schedules.running = row.count,
            "completed" => schedules.completed = row.count,
            "failed" => schedules.failed = row.count,
            "cancelled" => schedules.cancelled = row.count,
            "paused" => schedules.paused = row.count,
            other => tracing::warn!("Unexpected schedule status in counts: {}", other),
        }
    }

    let totals = analytics_repo::event_totals(&state.db_pool)
        .await
        .map_err(BazaarError::Database)?;

    Ok(Json(DashboardResponse {
        ads,
        schedules,
        impressions: totals.impressions,
        clicks: totals.clicks,
        ctr: ctr(totals.clicks, totals.impressions),
    }))
}

#[derive(Debug, Deserialize)]
pub struct TopAdsQuery {
    pub limit: Option<usize>,
}

#[axum::debug_handler]
pub async fn top_ads(
    State(state): State<Arc<ApiState>>,
    AuthPrincipal(principal): AuthPrincipal,
    Query(query): Query<TopAdsQuery>,
) -> Result<Json<TopAdsResponse>, AppError> {
    principal.require_admin()?;

    let limit = query.limit.unwrap_or(10);

    let rows = analytics_repo::ad_event_totals(&state.db_pool)
        .await
        .map_err(BazaarError::Database)?;

    let mut ads: Vec<TopAdEntry> = rows
        .into_iter()
        .map(|row| TopAdEntry {
            id: row.id,
            title: row.title,
            impressions: row.impressions,
            clicks: row.clicks,
            ctr: ctr(row.clicks, row.impressions),
        })
        .collect();

    // Rank by CTR, breaking ties by raw click volume
    ads.sort_by(|a, b| {
        b.ctr
            .partial_cmp(&a.ctr)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(b.clicks.cmp(&a.clicks))
    });
    ads.truncate(limit);

    Ok(Json(TopAdsResponse { ads }))
}

#[derive(Debug, Deserialize)]
pub struct RevenueQuery {
    pub from: Option<String>,
    pub to: Option<String>,
}

#[axum::debug_handler]
pub async fn revenue(
    State(state): State<Arc<ApiState>>,
    AuthPrincipal(principal): AuthPrincipal,
    Query(query): Query<RevenueQuery>,
) -> Result<Json<RevenueResponse>, AppError> {
    principal.require_admin()?;

    let from = match &query.from {
        Some(raw) => Some(validate::parse_date(raw)?),
        None => None,
    };
    let to = match &query.to {
        Some(raw) => Some(validate::parse_date(raw)?),
        None => None,
    };

    let row = analytics_repo::revenue(&state.db_pool, from, to)
        .await
        .map_err(BazaarError::Database)?;

    Ok(Json(RevenueResponse {
        orders: row.orders,
        revenue_cents: row.revenue_cents,
    }))
}
