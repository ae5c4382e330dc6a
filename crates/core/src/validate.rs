//! Input validation shared by every write path.
//!
//! All wire-facing times and dates arrive as strings; they are shape-checked
//! against a regex first and then parsed with chrono, so a malformed value is
//! rejected before any database round-trip.

use chrono::{NaiveDate, NaiveTime};
use regex::Regex;
use std::sync::LazyLock;

use crate::errors::{BazaarError, BazaarResult};

static TIME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([01][0-9]|2[0-3]):[0-5][0-9]$").unwrap());

static DATE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").unwrap());

/// Parses a 24-hour `HH:MM` time string.
pub fn parse_time(value: &str) -> BazaarResult<NaiveTime> {
    if !TIME_RE.is_match(value) {
        return Err(BazaarError::Validation(format!(
            "Invalid time '{}': expected 24-hour HH:MM",
            value
        )));
    }

    NaiveTime::parse_from_str(value, "%H:%M").map_err(|_| {
        BazaarError::Validation(format!("Invalid time '{}': expected 24-hour HH:MM", value))
    })
}

/// Parses a `YYYY-MM-DD` date string. The regex catches shape errors, the
/// chrono parse catches impossible dates such as `2024-13-40`.
pub fn parse_date(value: &str) -> BazaarResult<NaiveDate> {
    if !DATE_RE.is_match(value) {
        return Err(BazaarError::Validation(format!(
            "Invalid date '{}': expected YYYY-MM-DD",
            value
        )));
    }

    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| {
        BazaarError::Validation(format!("Invalid date '{}': not a calendar date", value))
    })
}

/// Checks a weekday list (0 = Sunday .. 6 = Saturday) and normalizes it into
/// a sorted, deduplicated set.
pub fn validate_weekdays(weekdays: &[u8]) -> BazaarResult<Vec<i16>> {
    if weekdays.is_empty() {
        return Err(BazaarError::Validation(
            "At least one weekday must be provided".to_string(),
        ));
    }

    for &day in weekdays {
        if day > 6 {
            return Err(BazaarError::Validation(format!(
                "Invalid weekday {}: must be 0-6 (0 = Sunday)",
                day
            )));
        }
    }

    let mut normalized: Vec<i16> = weekdays.iter().map(|&day| day as i16).collect();
    normalized.sort_unstable();
    normalized.dedup();
    Ok(normalized)
}

/// Checks a slot priority (1 = highest .. 5 = lowest).
pub fn validate_priority(priority: u8) -> BazaarResult<i16> {
    if (1..=5).contains(&priority) {
        Ok(priority as i16)
    } else {
        Err(BazaarError::Validation(format!(
            "Invalid priority {}: must be 1-5 (1 = highest)",
            priority
        )))
    }
}
