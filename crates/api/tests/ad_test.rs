//! Mock-driven tests for time-slot replacement: validation happens before any
//! write, and a replacement returns exactly the slots that were written.

use bazaar_core::{
    errors::BazaarError,
    models::time_slot::{SlotInput, ValidSlot},
};
use bazaar_db::mock::repositories::MockTimeSlotRepo;
use bazaar_db::models::DbTimeSlot;
use chrono::Utc;
use mockall::predicate;
use pretty_assertions::assert_eq;
use uuid::Uuid;

/// Mirrors the slot-update handler: validate every slot, then replace
/// wholesale.
async fn update_slots_wrapper(
    repo: &MockTimeSlotRepo,
    ad_id: Uuid,
    inputs: &[SlotInput],
) -> Result<Vec<DbTimeSlot>, BazaarError> {
    let mut valid_slots = Vec::with_capacity(inputs.len());
    for input in inputs {
        valid_slots.push(input.validate()?);
    }

    repo.replace_time_slots(ad_id, valid_slots)
        .await
        .map_err(BazaarError::Database)
}

fn slot_input(start: &str, end: &str, weekdays: Vec<u8>, priority: u8) -> SlotInput {
    SlotInput {
        start: start.to_string(),
        end: end.to_string(),
        weekdays,
        priority,
        active: true,
    }
}

fn row_from_valid(ad_id: Uuid, slot: &ValidSlot) -> DbTimeSlot {
    DbTimeSlot {
        id: Uuid::new_v4(),
        ad_id,
        start_time: slot.start,
        end_time: slot.end,
        weekdays: slot.weekdays.clone(),
        priority: slot.priority,
        active: slot.active,
        created_at: Utc::now(),
    }
}

#[tokio::test]
async fn test_replacement_returns_exactly_what_was_written() {
    let mut repo = MockTimeSlotRepo::new();
    let ad_id = Uuid::new_v4();

    let inputs = vec![
        slot_input("10:00", "11:00", vec![1, 3], 1),
        slot_input("14:00", "16:00", vec![5], 2),
    ];

    repo.expect_replace_time_slots()
        .with(predicate::eq(ad_id), predicate::always())
        .times(1)
        .returning(|ad_id, slots| {
            Ok(slots.iter().map(|slot| row_from_valid(ad_id, slot)).collect())
        });

    let created = update_slots_wrapper(&repo, ad_id, &inputs)
        .await
        .expect("Expected slots to be replaced");

    // The read-back view is exactly the written set, old slots gone
    assert_eq!(created.len(), 2);
    assert_eq!(created[0].start_time.format("%H:%M").to_string(), "10:00");
    assert_eq!(created[0].weekdays, vec![1, 3]);
    assert_eq!(created[0].priority, 1);
    assert_eq!(created[1].end_time.format("%H:%M").to_string(), "16:00");
    assert_eq!(created[1].weekdays, vec![5]);
}

#[tokio::test]
async fn test_invalid_slot_rejects_whole_request_before_any_write() {
    let mut repo = MockTimeSlotRepo::new();
    let ad_id = Uuid::new_v4();

    // One good slot, one with an inverted window: nothing may be written
    let inputs = vec![
        slot_input("10:00", "11:00", vec![1], 1),
        slot_input("12:00", "09:00", vec![1], 1),
    ];

    repo.expect_replace_time_slots().times(0);

    match update_slots_wrapper(&repo, ad_id, &inputs).await {
        Err(BazaarError::Validation(_)) => {}
        other => panic!("Expected Validation error, got: {:?}", other),
    }
}
