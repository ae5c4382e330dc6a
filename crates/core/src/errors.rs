use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// An ad that blocks a requested scheduling window. Returned to callers as
/// structured metadata on CONFLICT errors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConflictingAd {
    pub id: Uuid,
    pub title: String,
    pub status: String,
}

#[derive(Error, Debug)]
pub enum BazaarError {
    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Authentication error: {0}")]
    Authentication(String),

    #[error("Authorization error: {0}")]
    Authorization(String),

    #[error("Scheduling conflict: {message}")]
    Conflict {
        message: String,
        conflicting_ads: Vec<ConflictingAd>,
    },

    #[error("Database error: {0}")]
    Database(#[from] eyre::Report),

    #[error("Internal server error: {0}")]
    Internal(#[from] Box<dyn std::error::Error + Send + Sync>),
}

impl BazaarError {
    /// Stable machine-readable code exposed at the API boundary.
    pub fn code(&self) -> &'static str {
        match self {
            BazaarError::NotFound(_) => "NOT_FOUND",
            BazaarError::Validation(_) => "INVALID_INPUT",
            BazaarError::Authentication(_) => "UNAUTHENTICATED",
            BazaarError::Authorization(_) => "FORBIDDEN",
            BazaarError::Conflict { .. } => "CONFLICT",
            BazaarError::Database(_) => "INTERNAL",
            BazaarError::Internal(_) => "INTERNAL",
        }
    }

    /// Builds a CONFLICT error from the list of ads occupying the window.
    pub fn conflict(conflicting_ads: Vec<ConflictingAd>) -> Self {
        let message = format!(
            "{} active ad(s) already occupy the requested window",
            conflicting_ads.len()
        );
        BazaarError::Conflict {
            message,
            conflicting_ads,
        }
    }
}

pub type BazaarResult<T> = Result<T, BazaarError>;
