//! # Error Handling Middleware
//!
//! This module provides a standardized way to handle errors in the Bazaar
//! API. It maps domain-specific errors to appropriate HTTP status codes and
//! JSON error responses with a stable machine-readable `code` field, ensuring
//! a consistent error handling experience across the entire API.
//!
//! CONFLICT errors additionally carry the list of conflicting ads as
//! structured metadata for client display.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use bazaar_core::errors::BazaarError;
use serde_json::json;

/// Application error wrapper that provides HTTP status code mapping.
///
/// `AppError` wraps domain-specific `BazaarError` instances and implements
/// `IntoResponse` to convert them into HTTP responses with appropriate
/// status codes and JSON payloads.
#[derive(Debug)]
pub struct AppError(pub BazaarError);

/// Converts application errors to HTTP responses.
///
/// Maps each error type to the appropriate HTTP status code and formats the
/// error message, code, and any structured metadata into a JSON body.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Map error types to HTTP status codes
        let status = match &self.0 {
            BazaarError::NotFound(_) => StatusCode::NOT_FOUND,
            BazaarError::Validation(_) => StatusCode::BAD_REQUEST,
            BazaarError::Authentication(_) => StatusCode::UNAUTHORIZED,
            BazaarError::Authorization(_) => StatusCode::FORBIDDEN,
            BazaarError::Conflict { .. } => StatusCode::CONFLICT,
            BazaarError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            BazaarError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        // Get the error message and format as JSON
        let message = self.0.to_string();
        let code = self.0.code();
        let body = match &self.0 {
            BazaarError::Conflict {
                conflicting_ads, ..
            } => Json(json!({
                "error": message,
                "code": code,
                "conflicts": conflicting_ads,
            })),
            _ => Json(json!({ "error": message, "code": code })),
        };

        // Combine status code and JSON body into a response
        (status, body).into_response()
    }
}

/// Automatic conversion from BazaarError to AppError.
///
/// This implementation allows using `?` operator with functions that return
/// `Result<T, BazaarError>` in handler functions that return
/// `Result<T, AppError>`.
impl From<BazaarError> for AppError {
    fn from(err: BazaarError) -> Self {
        AppError(err)
    }
}

/// Automatic conversion from eyre::Report to AppError.
///
/// Wraps the eyre error in a `BazaarError::Database` variant so repository
/// failures can propagate with `?`.
impl From<eyre::Report> for AppError {
    fn from(err: eyre::Report) -> Self {
        AppError(BazaarError::Database(err))
    }
}
