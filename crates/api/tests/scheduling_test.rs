//! Mock-driven tests for the scheduling orchestration: conflict detection,
//! fail-fast validation, and the best-effort bulk path.

use bazaar_core::{
    errors::{BazaarError, ConflictingAd},
    models::schedule::BulkScheduleOutcome,
    scheduling, validate,
};
use bazaar_db::mock::repositories::MockScheduleRepo;
use bazaar_db::models::{DbConflictingAd, DbSchedule, DbTimeSlot};
use chrono::{NaiveDate, NaiveTime, Utc};
use mockall::{predicate, Sequence};
use pretty_assertions::assert_eq;
use uuid::Uuid;

fn t(hour: u32, minute: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, minute, 0).unwrap()
}

fn slot(ad_id: Uuid, start: NaiveTime, end: NaiveTime, weekdays: Vec<i16>) -> DbTimeSlot {
    DbTimeSlot {
        id: Uuid::new_v4(),
        ad_id,
        start_time: start,
        end_time: end,
        weekdays,
        priority: 1,
        active: true,
        created_at: Utc::now(),
    }
}

fn schedule_row(ad_id: Uuid, time_slot_id: Uuid, run_date: NaiveDate) -> DbSchedule {
    DbSchedule {
        id: Uuid::new_v4(),
        ad_id,
        time_slot_id,
        run_date,
        status: "scheduled".to_string(),
        retry_count: 0,
        max_retries: 3,
        failure_reason: None,
        next_retry_at: None,
        created_at: Utc::now(),
    }
}

/// Mirrors the conflict-checked creation path: validate the date, run the
/// conflict query, insert on a clear window.
async fn schedule_run_wrapper(
    repo: &MockScheduleRepo,
    ad_id: Uuid,
    slot: &DbTimeSlot,
    date: &str,
) -> Result<DbSchedule, BazaarError> {
    let run_date = validate::parse_date(date)?;

    if slot.ad_id != ad_id {
        return Err(BazaarError::Validation(format!(
            "Time slot {} does not belong to ad {}",
            slot.id, ad_id
        )));
    }

    let conflicts = repo
        .find_conflicting_ads(
            run_date,
            scheduling::weekday_index(run_date),
            slot.start_time,
            slot.end_time,
            None,
        )
        .await
        .map_err(BazaarError::Database)?;

    if !conflicts.is_empty() {
        return Err(BazaarError::conflict(
            conflicts
                .into_iter()
                .map(|c| ConflictingAd {
                    id: c.id,
                    title: c.title,
                    status: c.status,
                })
                .collect(),
        ));
    }

    repo.insert_schedule(ad_id, slot.id, run_date)
        .await
        .map_err(BazaarError::Database)
}

async fn retry_wrapper(repo: &MockScheduleRepo, id: Uuid) -> Result<DbSchedule, BazaarError> {
    repo.reset_for_retry(id)
        .await
        .map_err(BazaarError::Database)?
        .ok_or_else(|| BazaarError::NotFound(format!("Schedule with ID {} not found", id)))
}

/// Mirrors the bulk path: every matching (slot, date) pair is attempted and
/// per-item failures are collected instead of aborting the batch.
async fn bulk_schedule_wrapper(
    repo: &MockScheduleRepo,
    ads_with_slots: &[(Uuid, Vec<DbTimeSlot>)],
    start: NaiveDate,
    end: NaiveDate,
) -> Vec<BulkScheduleOutcome> {
    let mut results = Vec::new();

    for (ad_id, slots) in ads_with_slots {
        for slot in slots {
            for date in scheduling::matching_dates(start, end, &slot.weekdays) {
                match schedule_run_wrapper(repo, *ad_id, slot, &date.to_string()).await {
                    Ok(schedule) => {
                        results.push(BulkScheduleOutcome::scheduled(
                            *ad_id,
                            date,
                            slot.id,
                            schedule.id,
                        ));
                    }
                    Err(err) => {
                        results.push(BulkScheduleOutcome::failed(
                            *ad_id,
                            date.to_string(),
                            Some(slot.id),
                            err.to_string(),
                        ));
                    }
                }
            }
        }
    }

    results
}

#[tokio::test]
async fn test_schedule_run_success_on_clear_window() {
    let mut repo = MockScheduleRepo::new();
    let ad_id = Uuid::new_v4();
    // 2024-01-08 was a Monday
    let monday = NaiveDate::from_ymd_opt(2024, 1, 8).unwrap();
    let slot = slot(ad_id, t(10, 0), t(11, 0), vec![1, 3]);
    let slot_id = slot.id;

    repo.expect_find_conflicting_ads()
        .with(
            predicate::eq(monday),
            predicate::eq(1i16),
            predicate::eq(t(10, 0)),
            predicate::eq(t(11, 0)),
            predicate::eq(None::<Uuid>),
        )
        .times(1)
        .returning(|_, _, _, _, _| Ok(vec![]));

    repo.expect_insert_schedule()
        .with(
            predicate::eq(ad_id),
            predicate::eq(slot_id),
            predicate::eq(monday),
        )
        .times(1)
        .returning(|ad_id, slot_id, run_date| Ok(schedule_row(ad_id, slot_id, run_date)));

    let result = schedule_run_wrapper(&repo, ad_id, &slot, "2024-01-08").await;

    let schedule = result.expect("Expected schedule to be created");
    assert_eq!(schedule.ad_id, ad_id);
    assert_eq!(schedule.status, "scheduled");
    assert_eq!(schedule.retry_count, 0);
}

#[tokio::test]
async fn test_overlapping_run_conflicts_then_succeeds_after_cancel() {
    // Ad A holds Mon 10:00-11:00. Ad B wants Mon 10:30-11:30: first attempt
    // conflicts listing Ad A; after Ad A's run is cancelled the identical
    // request succeeds.
    let mut repo = MockScheduleRepo::new();
    let ad_a = Uuid::new_v4();
    let ad_b = Uuid::new_v4();
    let monday = NaiveDate::from_ymd_opt(2024, 1, 8).unwrap();
    let slot_b = slot(ad_b, t(10, 30), t(11, 30), vec![1]);

    let blocking = DbConflictingAd {
        id: ad_a,
        title: "Ad A".to_string(),
        status: "active".to_string(),
    };

    let mut seq = Sequence::new();
    let blocking_clone = blocking.clone();
    repo.expect_find_conflicting_ads()
        .times(1)
        .in_sequence(&mut seq)
        .returning(move |_, _, _, _, _| Ok(vec![blocking_clone.clone()]));
    repo.expect_find_conflicting_ads()
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_, _, _, _, _| Ok(vec![]));

    let ad_a_schedule = schedule_row(ad_a, Uuid::new_v4(), monday);
    let cancelled_id = ad_a_schedule.id;
    repo.expect_cancel_schedule()
        .with(predicate::eq(cancelled_id))
        .times(1)
        .returning(move |_| {
            let mut cancelled = ad_a_schedule.clone();
            cancelled.status = "cancelled".to_string();
            Ok(Some(cancelled))
        });

    repo.expect_insert_schedule()
        .times(1)
        .returning(|ad_id, slot_id, run_date| Ok(schedule_row(ad_id, slot_id, run_date)));

    // First attempt: CONFLICT carrying Ad A
    let result = schedule_run_wrapper(&repo, ad_b, &slot_b, "2024-01-08").await;
    match result {
        Err(BazaarError::Conflict {
            conflicting_ads, ..
        }) => {
            assert_eq!(conflicting_ads.len(), 1);
            assert_eq!(conflicting_ads[0].id, ad_a);
            assert_eq!(conflicting_ads[0].title, "Ad A");
        }
        other => panic!("Expected Conflict error, got: {:?}", other),
    }

    // Cancel Ad A's run
    let cancelled = repo.cancel_schedule(cancelled_id).await.unwrap().unwrap();
    assert_eq!(cancelled.status, "cancelled");

    // The identical request now succeeds
    let schedule = schedule_run_wrapper(&repo, ad_b, &slot_b, "2024-01-08")
        .await
        .expect("Expected schedule after cancel");
    assert_eq!(schedule.ad_id, ad_b);
}

#[tokio::test]
async fn test_malformed_date_fails_before_any_write() {
    let mut repo = MockScheduleRepo::new();
    let ad_id = Uuid::new_v4();
    let slot = slot(ad_id, t(10, 0), t(11, 0), vec![1]);

    // Neither the conflict query nor the insert may run
    repo.expect_find_conflicting_ads().times(0);
    repo.expect_insert_schedule().times(0);

    let result = schedule_run_wrapper(&repo, ad_id, &slot, "2024-13-40").await;

    match result {
        Err(BazaarError::Validation(message)) => {
            assert!(message.contains("2024-13-40"));
        }
        other => panic!("Expected Validation error, got: {:?}", other),
    }
}

#[tokio::test]
async fn test_slot_ownership_is_checked() {
    let mut repo = MockScheduleRepo::new();
    let ad_id = Uuid::new_v4();
    let foreign_slot = slot(Uuid::new_v4(), t(10, 0), t(11, 0), vec![1]);

    repo.expect_find_conflicting_ads().times(0);
    repo.expect_insert_schedule().times(0);

    let result = schedule_run_wrapper(&repo, ad_id, &foreign_slot, "2024-01-08").await;

    match result {
        Err(BazaarError::Validation(message)) => {
            assert!(message.contains("does not belong"));
        }
        other => panic!("Expected Validation error, got: {:?}", other),
    }
}

#[tokio::test]
async fn test_retry_missing_schedule_is_not_found() {
    let mut repo = MockScheduleRepo::new();
    let id = Uuid::new_v4();

    repo.expect_reset_for_retry()
        .with(predicate::eq(id))
        .times(1)
        .returning(|_| Ok(None));

    let result = retry_wrapper(&repo, id).await;

    match result {
        Err(BazaarError::NotFound(_)) => {}
        other => panic!("Expected NotFound error, got: {:?}", other),
    }
}

#[tokio::test]
async fn test_retry_resets_counters() {
    let mut repo = MockScheduleRepo::new();
    let id = Uuid::new_v4();

    repo.expect_reset_for_retry()
        .with(predicate::eq(id))
        .times(1)
        .returning(|id| {
            let mut row = schedule_row(Uuid::new_v4(), Uuid::new_v4(),
                NaiveDate::from_ymd_opt(2024, 1, 8).unwrap());
            row.id = id;
            row.retry_count = 0;
            row.failure_reason = None;
            row.next_retry_at = None;
            Ok(Some(row))
        });

    let schedule = retry_wrapper(&repo, id).await.expect("Expected reset row");
    assert_eq!(schedule.retry_count, 0);
    assert_eq!(schedule.status, "scheduled");
    assert!(schedule.failure_reason.is_none());
    assert!(schedule.next_retry_at.is_none());
}

#[tokio::test]
async fn test_bulk_schedule_partial_failure_does_not_abort_batch() {
    // Two ads, each with a Mon/Wed slot, over Mon..Wed: 2 matching days per
    // ad gives 4 attempts. One simulated insert failure must leave the other
    // three scheduled.
    let mut repo = MockScheduleRepo::new();
    let ad_one = Uuid::new_v4();
    let ad_two = Uuid::new_v4();
    let monday = NaiveDate::from_ymd_opt(2024, 1, 8).unwrap();
    let wednesday = NaiveDate::from_ymd_opt(2024, 1, 10).unwrap();

    let slot_one = slot(ad_one, t(10, 0), t(11, 0), vec![1, 3]);
    let slot_two = slot(ad_two, t(12, 0), t(13, 0), vec![1, 3]);

    repo.expect_find_conflicting_ads()
        .times(4)
        .returning(|_, _, _, _, _| Ok(vec![]));

    repo.expect_insert_schedule()
        .times(4)
        .returning(move |ad_id, slot_id, run_date| {
            if ad_id == ad_two && run_date == wednesday {
                Err(eyre::eyre!("simulated insert failure"))
            } else {
                Ok(schedule_row(ad_id, slot_id, run_date))
            }
        });

    let results = bulk_schedule_wrapper(
        &repo,
        &[
            (ad_one, vec![slot_one]),
            (ad_two, vec![slot_two]),
        ],
        monday,
        wednesday,
    )
    .await;

    assert_eq!(results.len(), 4);

    let scheduled: Vec<_> = results.iter().filter(|r| r.status == "scheduled").collect();
    let failed: Vec<_> = results.iter().filter(|r| r.status == "failed").collect();
    assert_eq!(scheduled.len(), 3);
    assert_eq!(failed.len(), 1);

    assert_eq!(failed[0].ad_id, ad_two);
    assert_eq!(failed[0].date, "2024-01-10");
    assert!(failed[0]
        .error
        .as_deref()
        .unwrap()
        .contains("simulated insert failure"));
}
