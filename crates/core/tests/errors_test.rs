use bazaar_core::errors::{BazaarError, BazaarResult, ConflictingAd};
use std::error::Error;
use uuid::Uuid;

#[test]
fn test_error_display() {
    let not_found = BazaarError::NotFound("Ad not found".to_string());
    let validation = BazaarError::Validation("Invalid input".to_string());
    let authentication = BazaarError::Authentication("Missing bearer token".to_string());
    let authorization = BazaarError::Authorization("Administrator role required".to_string());
    let database = BazaarError::Database(eyre::eyre!("Database connection failed"));
    let internal = BazaarError::Internal(Box::new(std::io::Error::new(
        std::io::ErrorKind::Other,
        "Internal error",
    )));

    assert_eq!(not_found.to_string(), "Resource not found: Ad not found");
    assert_eq!(validation.to_string(), "Validation error: Invalid input");
    assert_eq!(
        authentication.to_string(),
        "Authentication error: Missing bearer token"
    );
    assert_eq!(
        authorization.to_string(),
        "Authorization error: Administrator role required"
    );
    assert!(database.to_string().contains("Database error:"));
    assert!(internal.to_string().contains("Internal server error:"));
}

#[test]
fn test_error_codes() {
    assert_eq!(BazaarError::NotFound("x".into()).code(), "NOT_FOUND");
    assert_eq!(BazaarError::Validation("x".into()).code(), "INVALID_INPUT");
    assert_eq!(
        BazaarError::Authentication("x".into()).code(),
        "UNAUTHENTICATED"
    );
    assert_eq!(BazaarError::Authorization("x".into()).code(), "FORBIDDEN");
    assert_eq!(BazaarError::conflict(vec![]).code(), "CONFLICT");
    assert_eq!(
        BazaarError::Database(eyre::eyre!("boom")).code(),
        "INTERNAL"
    );
}

#[test]
fn test_conflict_carries_ads() {
    let ad = ConflictingAd {
        id: Uuid::new_v4(),
        title: "Morning banner".to_string(),
        status: "active".to_string(),
    };

    let error = BazaarError::conflict(vec![ad.clone()]);

    assert!(error
        .to_string()
        .contains("1 active ad(s) already occupy the requested window"));
    match error {
        BazaarError::Conflict {
            conflicting_ads, ..
        } => {
            assert_eq!(conflicting_ads.len(), 1);
            assert_eq!(conflicting_ads[0], ad);
        }
        other => panic!("Expected Conflict error, got: {:?}", other),
    }
}

#[test]
fn test_bazaar_result() {
    let result: BazaarResult<i32> = Ok(42);
    assert_eq!(result.unwrap(), 42);

    let result: BazaarResult<i32> = Err(BazaarError::NotFound("Not found".to_string()));
    assert!(result.is_err());
}

#[test]
fn test_error_conversion() {
    let io_error = std::io::Error::new(std::io::ErrorKind::Other, "IO error");
    let error = BazaarError::Internal(Box::new(io_error));

    assert!(error.source().is_some());
    assert!(error.to_string().contains("IO error"));
}
