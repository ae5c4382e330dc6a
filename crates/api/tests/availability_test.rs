//! Mock-driven tests for the availability (conflict checker) read path.

use bazaar_core::{
    errors::{BazaarError, ConflictingAd},
    models::schedule::AvailabilityResponse,
    scheduling, validate,
};
use bazaar_db::mock::repositories::MockScheduleRepo;
use bazaar_db::models::DbConflictingAd;
use mockall::predicate;
use pretty_assertions::assert_eq;
use uuid::Uuid;

/// Mirrors the availability handler: validate, query, report.
async fn check_availability_wrapper(
    repo: &MockScheduleRepo,
    date: &str,
    start: &str,
    end: &str,
) -> Result<AvailabilityResponse, BazaarError> {
    let date = validate::parse_date(date)?;
    let start = validate::parse_time(start)?;
    let end = validate::parse_time(end)?;

    if start >= end {
        return Err(BazaarError::Validation(
            "Window start must be before end".to_string(),
        ));
    }

    let conflicting_ads: Vec<ConflictingAd> = repo
        .find_conflicting_ads(date, scheduling::weekday_index(date), start, end, None)
        .await
        .map_err(BazaarError::Database)?
        .into_iter()
        .map(|row| ConflictingAd {
            id: row.id,
            title: row.title,
            status: row.status,
        })
        .collect();

    Ok(AvailabilityResponse {
        is_available: conflicting_ads.is_empty(),
        conflicting_ads,
    })
}

#[tokio::test]
async fn test_clear_window_is_available() {
    let mut repo = MockScheduleRepo::new();

    repo.expect_find_conflicting_ads()
        .times(1)
        .returning(|_, _, _, _, _| Ok(vec![]));

    let response = check_availability_wrapper(&repo, "2024-01-08", "11:00", "12:00")
        .await
        .expect("Expected availability response");

    assert!(response.is_available);
    assert!(response.conflicting_ads.is_empty());
}

#[tokio::test]
async fn test_occupied_window_lists_conflicts() {
    let mut repo = MockScheduleRepo::new();
    let ad_id = Uuid::new_v4();

    repo.expect_find_conflicting_ads()
        .times(1)
        .returning(move |_, _, _, _, _| {
            Ok(vec![DbConflictingAd {
                id: ad_id,
                title: "Morning banner".to_string(),
                status: "active".to_string(),
            }])
        });

    let response = check_availability_wrapper(&repo, "2024-01-08", "10:30", "11:30")
        .await
        .expect("Expected availability response");

    assert!(!response.is_available);
    assert_eq!(response.conflicting_ads.len(), 1);
    assert_eq!(response.conflicting_ads[0].id, ad_id);
    assert_eq!(response.conflicting_ads[0].title, "Morning banner");
}

#[tokio::test]
async fn test_weekday_is_derived_from_date() {
    let mut repo = MockScheduleRepo::new();

    // 2024-01-13 was a Saturday: the query must receive weekday 6
    repo.expect_find_conflicting_ads()
        .with(
            predicate::always(),
            predicate::eq(6i16),
            predicate::always(),
            predicate::always(),
            predicate::eq(None::<Uuid>),
        )
        .times(1)
        .returning(|_, _, _, _, _| Ok(vec![]));

    let response = check_availability_wrapper(&repo, "2024-01-13", "10:00", "11:00")
        .await
        .expect("Expected availability response");
    assert!(response.is_available);
}

#[tokio::test]
async fn test_malformed_inputs_fail_before_query() {
    let mut repo = MockScheduleRepo::new();
    repo.expect_find_conflicting_ads().times(0);

    for (date, start, end) in [
        ("2024-13-40", "10:00", "11:00"),
        ("2024-01-08", "10:61", "11:00"),
        ("2024-01-08", "11:00", "10:00"),
        ("2024-01-08", "10:00", "10:00"),
    ] {
        match check_availability_wrapper(&repo, date, start, end).await {
            Err(BazaarError::Validation(_)) => {}
            other => panic!(
                "Expected Validation error for ({}, {}, {}), got: {:?}",
                date, start, end, other
            ),
        }
    }
}
