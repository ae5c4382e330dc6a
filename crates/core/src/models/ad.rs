use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

use crate::errors::{BazaarError, BazaarResult};

/// Lifecycle status of an advertisement. Only `Active` ads participate in
/// availability listings and conflict checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdStatus {
    Pending,
    Approved,
    Rejected,
    Active,
    Expired,
}

impl AdStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AdStatus::Pending => "pending",
            AdStatus::Approved => "approved",
            AdStatus::Rejected => "rejected",
            AdStatus::Active => "active",
            AdStatus::Expired => "expired",
        }
    }

    /// Admin-driven transitions. Everything outside this map is an invalid
    /// state transition.
    pub fn can_transition(&self, next: AdStatus) -> bool {
        matches!(
            (self, next),
            (AdStatus::Pending, AdStatus::Approved)
                | (AdStatus::Pending, AdStatus::Rejected)
                | (AdStatus::Approved, AdStatus::Active)
                | (AdStatus::Active, AdStatus::Expired)
        )
    }
}

impl FromStr for AdStatus {
    type Err = BazaarError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(AdStatus::Pending),
            "approved" => Ok(AdStatus::Approved),
            "rejected" => Ok(AdStatus::Rejected),
            "active" => Ok(AdStatus::Active),
            "expired" => Ok(AdStatus::Expired),
            other => Err(BazaarError::Validation(format!(
                "Unknown ad status: {}",
                other
            ))),
        }
    }
}

/// Whether the ad promotes an in-marketplace service or an external campaign.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdKind {
    Service,
    External,
}

impl AdKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AdKind::Service => "service",
            AdKind::External => "external",
        }
    }
}

impl FromStr for AdKind {
    type Err = BazaarError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "service" => Ok(AdKind::Service),
            "external" => Ok(AdKind::External),
            other => Err(BazaarError::Validation(format!(
                "Unknown ad kind: {}",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ad {
    pub id: Uuid,
    pub vendor_id: Uuid,
    pub title: String,
    pub description: String,
    pub kind: AdKind,
    pub status: AdStatus,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateAdRequest {
    pub title: String,
    pub description: String,
    pub kind: String,
}

impl CreateAdRequest {
    pub fn validate(&self) -> BazaarResult<AdKind> {
        if self.title.trim().is_empty() {
            return Err(BazaarError::Validation(
                "Ad title must not be empty".to_string(),
            ));
        }
        self.kind.parse()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateAdStatusRequest {
    pub status: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdResponse {
    pub id: Uuid,
    pub vendor_id: Uuid,
    pub title: String,
    pub description: String,
    pub kind: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
}
