use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

use crate::errors::{BazaarError, ConflictingAd};
use crate::models::time_slot::SlotInput;

/// Run lifecycle of a concrete date-bound schedule:
///
/// ```text
/// Scheduled -> Running -> Completed
/// Scheduled -> Running -> Failed -> (retry) -> Scheduled
/// Scheduled -> Cancelled
/// Scheduled -> Paused -> Scheduled (resume)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScheduleStatus {
    Scheduled,
    Running,
    Completed,
    Failed,
    Cancelled,
    Paused,
}

impl ScheduleStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScheduleStatus::Scheduled => "scheduled",
            ScheduleStatus::Running => "running",
            ScheduleStatus::Completed => "completed",
            ScheduleStatus::Failed => "failed",
            ScheduleStatus::Cancelled => "cancelled",
            ScheduleStatus::Paused => "paused",
        }
    }
}

impl FromStr for ScheduleStatus {
    type Err = BazaarError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "scheduled" => Ok(ScheduleStatus::Scheduled),
            "running" => Ok(ScheduleStatus::Running),
            "completed" => Ok(ScheduleStatus::Completed),
            "failed" => Ok(ScheduleStatus::Failed),
            "cancelled" => Ok(ScheduleStatus::Cancelled),
            "paused" => Ok(ScheduleStatus::Paused),
            other => Err(BazaarError::Validation(format!(
                "Unknown schedule status: {}",
                other
            ))),
        }
    }
}

/// A binding of one ad + one time slot to one calendar date.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Schedule {
    pub id: Uuid,
    pub ad_id: Uuid,
    pub time_slot_id: Uuid,
    pub run_date: NaiveDate,
    pub status: ScheduleStatus,
    pub retry_count: i32,
    pub max_retries: i32,
    pub failure_reason: Option<String>,
    pub next_retry_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleRunRequest {
    pub ad_id: Uuid,
    pub time_slot_id: Uuid,
    pub date: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RescheduleRequest {
    pub date: String,
    pub time_slot_id: Option<Uuid>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BulkScheduleRequest {
    pub ad_ids: Vec<Uuid>,
    pub slots: Vec<SlotInput>,
    pub start_date: String,
    pub end_date: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleResponse {
    pub id: Uuid,
    pub ad_id: Uuid,
    pub time_slot_id: Uuid,
    pub run_date: String,
    pub status: String,
    pub retry_count: i32,
    pub max_retries: i32,
    pub failure_reason: Option<String>,
    pub next_retry_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// One entry per attempted (ad, date) pair in a bulk run. Failures carry the
/// error code and message instead of aborting the batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BulkScheduleOutcome {
    pub ad_id: Uuid,
    pub date: String,
    pub time_slot_id: Option<Uuid>,
    pub schedule_id: Option<Uuid>,
    pub status: String,
    pub error: Option<String>,
}

impl BulkScheduleOutcome {
    pub fn scheduled(ad_id: Uuid, date: NaiveDate, time_slot_id: Uuid, schedule_id: Uuid) -> Self {
        BulkScheduleOutcome {
            ad_id,
            date: date.to_string(),
            time_slot_id: Some(time_slot_id),
            schedule_id: Some(schedule_id),
            status: "scheduled".to_string(),
            error: None,
        }
    }

    pub fn failed(ad_id: Uuid, date: String, time_slot_id: Option<Uuid>, error: String) -> Self {
        BulkScheduleOutcome {
            ad_id,
            date,
            time_slot_id,
            schedule_id: None,
            status: "failed".to_string(),
            error: Some(error),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BulkScheduleResponse {
    pub scheduled: usize,
    pub failed: usize,
    pub results: Vec<BulkScheduleOutcome>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AvailabilityResponse {
    pub is_available: bool,
    pub conflicting_ads: Vec<ConflictingAd>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BulkTransitionResponse {
    pub updated: u64,
}
