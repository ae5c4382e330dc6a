//! # Bazaar API
//!
//! The API crate provides the web server implementation for the Bazaar
//! marketplace backend. It exposes endpoints for advertisement management,
//! time-slot scheduling, availability checks, analytics, and a WebSocket
//! chat channel.
//!
//! ## Architecture
//!
//! This crate follows a layered architecture:
//!
//! - **Routes**: Define API endpoints and URL structure
//! - **Handlers**: Implement request processing logic
//! - **Middleware**: Provide cross-cutting concerns like authentication and error handling
//! - **Config**: Handle environment and application configuration
//!
//! The API uses Axum as the web framework and SQLx for database interactions.

/// Configuration module for API settings
pub mod config;
/// Request handlers that implement business logic
pub mod handlers;
/// Middleware for authentication and error handling
pub mod middleware;
/// Notification boundary implementations
pub mod notify;
/// Route definitions and API endpoint structure
pub mod routes;

use std::sync::Arc;

use axum::Router;
use bazaar_core::models::chat::ServerEvent;
use bazaar_core::notify::Notifier;
use eyre::Result;
use sqlx::PgPool;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tracing::info;
use tracing_subscriber::FmtSubscriber;
use uuid::Uuid;

/// An outbound chat event addressed to a single account. Every connected
/// socket subscribes to the hub and forwards only its own events.
#[derive(Debug, Clone)]
pub struct AddressedEvent {
    pub recipient: Uuid,
    pub event: ServerEvent,
}

/// Shared application state that is accessible to all request handlers.
///
/// Encapsulates the database pool, the notification boundary, and the
/// in-process chat fan-out channel.
pub struct ApiState {
    /// PostgreSQL connection pool for database operations
    pub db_pool: PgPool,
    /// Fire-and-forget notification collaborator
    pub notifier: Arc<dyn Notifier>,
    /// Best-effort chat event hub; receivers that lag simply miss events
    pub chat_tx: broadcast::Sender<AddressedEvent>,
}

impl ApiState {
    pub fn new(db_pool: PgPool, notifier: Arc<dyn Notifier>) -> Self {
        let (chat_tx, _) = broadcast::channel(256);
        ApiState {
            db_pool,
            notifier,
            chat_tx,
        }
    }
}

/// Starts the API server with the provided configuration and database
/// connection.
pub async fn start_server(config: config::ApiConfig, db_pool: PgPool) -> Result<()> {
    // Initialize tracing for logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(config.log_level)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    // Create shared state with dependencies
    let state = Arc::new(ApiState::new(db_pool, Arc::new(notify::LogNotifier)));

    // Build the application router with all routes
    let app = Router::new()
        // Health check endpoints
        .merge(routes::health::routes())
        // Advertisement management endpoints
        .merge(routes::ad::routes())
        // Scheduling endpoints
        .merge(routes::schedule::routes())
        // Availability / conflict check endpoint
        .merge(routes::availability::routes())
        // Analytics endpoints
        .merge(routes::analytics::routes())
        // Chat endpoints (REST + WebSocket)
        .merge(routes::chat::routes())
        // Attach shared state to all routes
        .with_state(state);

    // Apply CORS configuration if origins are specified
    let app = if let Some(origins) = &config.cors_origins {
        let cors = tower_http::cors::CorsLayer::new()
            .allow_methods([
                axum::http::Method::GET,
                axum::http::Method::POST,
                axum::http::Method::PUT,
                axum::http::Method::DELETE,
                axum::http::Method::OPTIONS,
            ])
            .allow_headers([
                axum::http::header::CONTENT_TYPE,
                axum::http::header::AUTHORIZATION,
                axum::http::header::ACCEPT,
            ])
            .allow_origin(
                origins
                    .iter()
                    .map(|origin| origin.parse().unwrap())
                    .collect::<Vec<_>>(),
            )
            .allow_credentials(true);

        app.layer(cors)
    } else {
        app
    };

    // Add request timeout middleware
    let app = app.layer(
        tower::ServiceBuilder::new()
            .layer(tower_http::timeout::TimeoutLayer::new(
                std::time::Duration::from_secs(config.request_timeout),
            ))
            .into_inner(),
    );

    // Start the HTTP server
    let addr = config.server_addr();
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on http://{}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
