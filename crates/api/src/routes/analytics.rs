use axum::{routing::get, Router};
use std::sync::Arc;

use crate::{handlers, ApiState};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route(
            "/api/analytics/dashboard",
            get(handlers::analytics::dashboard),
        )
        .route("/api/analytics/top-ads", get(handlers::analytics::top_ads))
        .route("/api/analytics/revenue", get(handlers::analytics::revenue))
}
