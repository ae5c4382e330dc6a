use axum::{
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;

use crate::{handlers, ApiState};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route("/api/ads", post(handlers::ad::create_ad))
        .route("/api/ads", get(handlers::ad::list_ads))
        .route("/api/ads/:id", get(handlers::ad::get_ad))
        .route("/api/ads/:id/status", post(handlers::ad::update_ad_status))
        .route("/api/ads/:id/slots", put(handlers::ad::update_time_slots))
        .route("/api/ads/:id/slots", get(handlers::ad::get_time_slots))
        .route("/api/ads/:id/events", post(handlers::ad::record_ad_event))
}
