use bazaar_core::scheduling::{matching_dates, overlaps, weekday_index};
use chrono::{NaiveDate, NaiveTime};
use pretty_assertions::assert_eq;
use rstest::rstest;

fn t(hour: u32, minute: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, minute, 0).unwrap()
}

#[rstest]
// A window strictly outside [start, end) never overlaps
#[case(10, 0, 11, 0, 11, 0, 12, 0, false)] // back-to-back after
#[case(10, 0, 11, 0, 9, 0, 10, 0, false)] // back-to-back before
#[case(10, 0, 11, 0, 12, 0, 13, 0, false)] // disjoint
// Partial and full overlaps
#[case(10, 0, 11, 0, 10, 30, 11, 30, true)]
#[case(10, 0, 11, 0, 9, 30, 10, 30, true)]
#[case(10, 0, 11, 0, 10, 15, 10, 45, true)] // contained
#[case(10, 0, 11, 0, 9, 0, 12, 0, true)] // containing
#[case(10, 0, 11, 0, 10, 0, 11, 0, true)] // identical
fn test_overlaps(
    #[case] a_start_h: u32,
    #[case] a_start_m: u32,
    #[case] a_end_h: u32,
    #[case] a_end_m: u32,
    #[case] b_start_h: u32,
    #[case] b_start_m: u32,
    #[case] b_end_h: u32,
    #[case] b_end_m: u32,
    #[case] expected: bool,
) {
    let result = overlaps(
        t(a_start_h, a_start_m),
        t(a_end_h, a_end_m),
        t(b_start_h, b_start_m),
        t(b_end_h, b_end_m),
    );
    assert_eq!(result, expected);

    // Overlap is symmetric
    let reversed = overlaps(
        t(b_start_h, b_start_m),
        t(b_end_h, b_end_m),
        t(a_start_h, a_start_m),
        t(a_end_h, a_end_m),
    );
    assert_eq!(reversed, expected);
}

#[test]
fn test_weekday_index_uses_sunday_zero() {
    // 2024-01-07 was a Sunday
    assert_eq!(
        weekday_index(NaiveDate::from_ymd_opt(2024, 1, 7).unwrap()),
        0
    );
    // 2024-01-08 was a Monday
    assert_eq!(
        weekday_index(NaiveDate::from_ymd_opt(2024, 1, 8).unwrap()),
        1
    );
    // 2024-01-13 was a Saturday
    assert_eq!(
        weekday_index(NaiveDate::from_ymd_opt(2024, 1, 13).unwrap()),
        6
    );
}

#[test]
fn test_matching_dates_filters_by_weekday() {
    // Mon 2024-01-08 .. Wed 2024-01-10, slot runs Mon and Wed
    let start = NaiveDate::from_ymd_opt(2024, 1, 8).unwrap();
    let end = NaiveDate::from_ymd_opt(2024, 1, 10).unwrap();

    let dates = matching_dates(start, end, &[1, 3]);

    assert_eq!(
        dates,
        vec![
            NaiveDate::from_ymd_opt(2024, 1, 8).unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 10).unwrap(),
        ]
    );
}

#[test]
fn test_matching_dates_inclusive_bounds() {
    // A single-day range matches when the weekday lines up
    let day = NaiveDate::from_ymd_opt(2024, 1, 8).unwrap();
    assert_eq!(matching_dates(day, day, &[1]), vec![day]);
    assert_eq!(matching_dates(day, day, &[2]), Vec::<NaiveDate>::new());
}

#[test]
fn test_matching_dates_empty_when_range_inverted() {
    let start = NaiveDate::from_ymd_opt(2024, 1, 10).unwrap();
    let end = NaiveDate::from_ymd_opt(2024, 1, 8).unwrap();
    assert!(matching_dates(start, end, &[0, 1, 2, 3, 4, 5, 6]).is_empty());
}
