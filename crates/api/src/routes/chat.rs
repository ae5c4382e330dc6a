use axum::{routing::get, Router};
use std::sync::Arc;

use crate::{handlers, ApiState};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route("/ws/chat", get(handlers::chat::chat_socket))
        .route("/api/chat/messages", get(handlers::chat::list_messages))
}
