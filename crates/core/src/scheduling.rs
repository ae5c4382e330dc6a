//! Pure calendar logic behind the conflict checker and the bulk scheduler.
//!
//! The SQL conflict predicate in the database layer mirrors [`overlaps`]; the
//! two must agree on the half-open interval convention.

use chrono::{Datelike, NaiveDate, NaiveTime};

/// Half-open interval overlap test: `[a_start, a_end)` intersects
/// `[b_start, b_end)`. Back-to-back windows (one ending exactly where the
/// other starts) do not overlap.
pub fn overlaps(
    a_start: NaiveTime,
    a_end: NaiveTime,
    b_start: NaiveTime,
    b_end: NaiveTime,
) -> bool {
    a_start < b_end && a_end > b_start
}

/// Weekday index with the 0 = Sunday convention used across the schema.
pub fn weekday_index(date: NaiveDate) -> i16 {
    date.weekday().num_days_from_sunday() as i16
}

/// Every date in the inclusive range whose weekday appears in `weekdays`.
pub fn matching_dates(start: NaiveDate, end: NaiveDate, weekdays: &[i16]) -> Vec<NaiveDate> {
    let mut dates = Vec::new();
    let mut day = start;
    while day <= end {
        if weekdays.contains(&weekday_index(day)) {
            dates.push(day);
        }
        match day.succ_opt() {
            Some(next) => day = next,
            None => break,
        }
    }
    dates
}
