use chrono::{DateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{BazaarError, BazaarResult};
use crate::validate;

/// A recurring weekly availability window owned by an ad.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeSlot {
    pub id: Uuid,
    pub ad_id: Uuid,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    /// Weekday set, 0 = Sunday .. 6 = Saturday.
    pub weekdays: Vec<i16>,
    /// 1 = highest .. 5 = lowest.
    pub priority: i16,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

/// Wire shape for slot writes. Times are `HH:MM` strings; everything is
/// range-checked by [`SlotInput::validate`] before reaching a repository.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlotInput {
    pub start: String,
    pub end: String,
    pub weekdays: Vec<u8>,
    pub priority: u8,
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

/// A fully validated slot ready for insertion.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidSlot {
    pub start: NaiveTime,
    pub end: NaiveTime,
    pub weekdays: Vec<i16>,
    pub priority: i16,
    pub active: bool,
}

impl SlotInput {
    pub fn validate(&self) -> BazaarResult<ValidSlot> {
        let start = validate::parse_time(&self.start)?;
        let end = validate::parse_time(&self.end)?;

        if start >= end {
            return Err(BazaarError::Validation(format!(
                "Slot start {} must be before end {}",
                self.start, self.end
            )));
        }

        let weekdays = validate::validate_weekdays(&self.weekdays)?;
        let priority = validate::validate_priority(self.priority)?;

        Ok(ValidSlot {
            start,
            end,
            weekdays,
            priority,
            active: self.active,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateTimeSlotsRequest {
    pub slots: Vec<SlotInput>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeSlotResponse {
    pub id: Uuid,
    pub start: String,
    pub end: String,
    pub weekdays: Vec<i16>,
    pub priority: i16,
    pub active: bool,
}

impl From<TimeSlot> for TimeSlotResponse {
    fn from(slot: TimeSlot) -> Self {
        TimeSlotResponse {
            id: slot.id,
            start: slot.start_time.format("%H:%M").to_string(),
            end: slot.end_time.format("%H:%M").to_string(),
            weekdays: slot.weekdays,
            priority: slot.priority,
            active: slot.active,
        }
    }
}
