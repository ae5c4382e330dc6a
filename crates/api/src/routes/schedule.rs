use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::{handlers, ApiState};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route("/api/schedules", post(handlers::schedule::schedule_ad_run))
        .route(
            "/api/schedules/bulk",
            post(handlers::schedule::bulk_schedule_ads),
        )
        .route("/api/schedules/:id", get(handlers::schedule::get_schedule))
        .route(
            "/api/schedules/:id/cancel",
            post(handlers::schedule::cancel_schedule),
        )
        .route(
            "/api/schedules/:id/reschedule",
            post(handlers::schedule::reschedule_ad_run),
        )
        .route(
            "/api/schedules/:id/retry",
            post(handlers::schedule::retry_failed_schedule),
        )
        .route(
            "/api/schedules/:id/logs",
            get(handlers::schedule::get_schedule_logs),
        )
        .route(
            "/api/ads/:id/schedules/pause",
            post(handlers::schedule::pause_ad_schedules),
        )
        .route(
            "/api/ads/:id/schedules/resume",
            post(handlers::schedule::resume_ad_schedules),
        )
}
