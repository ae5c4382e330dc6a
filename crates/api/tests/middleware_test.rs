//! Tests for the error-mapping middleware: taxonomy code, HTTP status, and
//! structured CONFLICT metadata.

use axum::{body::to_bytes, http::StatusCode, response::IntoResponse};
use bazaar_api::middleware::error_handling::AppError;
use bazaar_core::errors::{BazaarError, ConflictingAd};
use pretty_assertions::assert_eq;
use uuid::Uuid;

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read response body");
    serde_json::from_slice(&bytes).expect("Response body was not JSON")
}

#[tokio::test]
async fn test_not_found_maps_to_404() {
    let response = AppError(BazaarError::NotFound("Ad not found".to_string())).into_response();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let json = body_json(response).await;
    assert_eq!(json["code"], "NOT_FOUND");
    assert_eq!(json["error"], "Resource not found: Ad not found");
}

#[tokio::test]
async fn test_validation_maps_to_400() {
    let response =
        AppError(BazaarError::Validation("Invalid date".to_string())).into_response();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_json(response).await;
    assert_eq!(json["code"], "INVALID_INPUT");
}

#[tokio::test]
async fn test_authentication_maps_to_401() {
    let response =
        AppError(BazaarError::Authentication("Missing bearer token".to_string()))
            .into_response();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let json = body_json(response).await;
    assert_eq!(json["code"], "UNAUTHENTICATED");
}

#[tokio::test]
async fn test_authorization_maps_to_403() {
    let response = AppError(BazaarError::Authorization(
        "Administrator role required".to_string(),
    ))
    .into_response();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let json = body_json(response).await;
    assert_eq!(json["code"], "FORBIDDEN");
}

#[tokio::test]
async fn test_conflict_maps_to_409_with_structured_metadata() {
    let ad = ConflictingAd {
        id: Uuid::new_v4(),
        title: "Morning banner".to_string(),
        status: "active".to_string(),
    };

    let response = AppError(BazaarError::conflict(vec![ad.clone()])).into_response();
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let json = body_json(response).await;
    assert_eq!(json["code"], "CONFLICT");

    let conflicts = json["conflicts"]
        .as_array()
        .expect("Expected a conflicts array");
    assert_eq!(conflicts.len(), 1);
    assert_eq!(conflicts[0]["id"], ad.id.to_string());
    assert_eq!(conflicts[0]["title"], "Morning banner");
    assert_eq!(conflicts[0]["status"], "active");
}

#[tokio::test]
async fn test_database_error_maps_to_500() {
    let response =
        AppError(BazaarError::Database(eyre::eyre!("connection refused"))).into_response();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let json = body_json(response).await;
    assert_eq!(json["code"], "INTERNAL");
}

#[tokio::test]
async fn test_eyre_report_converts_to_internal() {
    let error: AppError = eyre::eyre!("boom").into();
    let response = error.into_response();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}
