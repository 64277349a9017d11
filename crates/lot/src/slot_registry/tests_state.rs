//! Tests for slot allocation, release, resizing, and queries.

use std::num::NonZeroU32;

use super::*;

use crate::config::MAX_CAPACITY;
use crate::entry_time::EntryTime;
use crate::lot_error::LotError;

fn registry(capacity: u32) -> SlotRegistry {
    SlotRegistry::new(capacity).unwrap()
}

fn at(millis: u64) -> EntryTime {
    EntryTime::from_unix_millis(millis)
}

// -------------------------------------------------------------------------
// Construction
// -------------------------------------------------------------------------

#[test]
fn test_new_registry_is_empty() {
    let reg = registry(5);
    assert_eq!(reg.capacity(), 5);
    assert_eq!(reg.available_slots(), 5);
    assert!(reg.all_parked_tickets().is_empty());
}

#[test]
fn test_new_rejects_zero_capacity() {
    assert_eq!(SlotRegistry::new(0), Err(LotError::InvalidCapacity));
}

// -------------------------------------------------------------------------
// Park
// -------------------------------------------------------------------------

#[test]
fn test_park_assigns_ascending_slots() {
    let mut reg = registry(3);
    let slots: Vec<u32> = ["A1", "B2", "C3"]
        .iter()
        .map(|r| reg.park(r).unwrap().slot_number())
        .collect();
    assert_eq!(slots, vec![1, 2, 3]);
    assert_eq!(reg.available_slots(), 0);
}

#[test]
fn test_park_records_entry_time_and_trimmed_registration() {
    let mut reg = registry(2);
    let ticket = reg.park_at("  KA01AB1234 ", at(1_704_067_200_000)).unwrap();
    assert_eq!(ticket.registration_number(), "KA01AB1234");
    assert_eq!(ticket.slot_number(), 1);
    assert_eq!(ticket.entry_time(), at(1_704_067_200_000));
    assert_eq!(reg.ticket_in_slot(1), Some(&ticket));
}

#[test]
fn test_park_blank_registration_rejected() {
    let mut reg = registry(2);
    assert_eq!(reg.park(""), Err(LotError::EmptyRegistration));
    assert_eq!(reg.park("   "), Err(LotError::EmptyRegistration));
    assert_eq!(reg.available_slots(), 2);
}

#[test]
fn test_park_duplicate_any_case_rejected() {
    let mut reg = registry(3);
    reg.park("abc123").unwrap();
    assert_eq!(
        reg.park("ABC123"),
        Err(LotError::AlreadyParked("ABC123".to_string()))
    );
    assert_eq!(reg.stats().occupied_slots, 1);
}

#[test]
fn test_park_full_lot_rejected() {
    let mut reg = registry(2);
    reg.park("A").unwrap();
    reg.park("B").unwrap();
    assert_eq!(reg.park("C"), Err(LotError::NoSlotAvailable));
}

#[test]
fn test_duplicate_checked_before_capacity() {
    let mut reg = registry(1);
    reg.park("A").unwrap();
    assert_eq!(reg.park("a"), Err(LotError::AlreadyParked("a".to_string())));
}

#[test]
fn test_freed_slot_is_reused_first() {
    let mut reg = registry(4);
    reg.park("W").unwrap();
    assert_eq!(reg.park("X").unwrap().slot_number(), 2);
    reg.park("Z").unwrap();
    reg.remove("X").unwrap();
    assert_eq!(reg.park("Y").unwrap().slot_number(), 2);
}

#[test]
fn test_lowest_of_several_gaps_is_used() {
    let mut reg = registry(5);
    for r in ["A", "B", "C", "D", "E"] {
        reg.park(r).unwrap();
    }
    reg.remove("D").unwrap();
    reg.remove("B").unwrap();
    assert_eq!(reg.park("F").unwrap().slot_number(), 2);
    assert_eq!(reg.park("G").unwrap().slot_number(), 4);
}

// -------------------------------------------------------------------------
// Remove and lookup
// -------------------------------------------------------------------------

#[test]
fn test_remove_returns_ticket_and_frees_slot() {
    let mut reg = registry(3);
    let parked = reg.park_at("MH12", at(42)).unwrap();
    let removed = reg.remove("mh12").unwrap();
    assert_eq!(removed, parked);
    assert_eq!(reg.slot_status(1), SlotStatus::Available);
    assert_eq!(reg.available_slots(), 3);
}

#[test]
fn test_remove_blank_rejected() {
    let mut reg = registry(3);
    assert_eq!(reg.remove(" "), Err(LotError::EmptyRegistration));
}

#[test]
fn test_remove_unknown_rejected() {
    let mut reg = registry(3);
    reg.park("A").unwrap();
    assert_eq!(reg.remove("B"), Err(LotError::NotFound("B".to_string())));
    assert_eq!(reg.stats().occupied_slots, 1);
}

#[test]
fn test_find_by_registration_ignores_case() {
    let mut reg = registry(3);
    reg.park("A").unwrap();
    reg.park("DL3C").unwrap();
    let found = reg.find_by_registration("dl3c").unwrap();
    assert_eq!(found.slot_number(), 2);
    assert!(reg.find_by_registration("nope").is_none());
    assert!(reg.find_by_registration("").is_none());
}

#[test]
fn test_is_parked() {
    let mut reg = registry(2);
    reg.park("Q1").unwrap();
    assert!(reg.is_parked("q1"));
    assert!(!reg.is_parked("Q2"));
}

// -------------------------------------------------------------------------
// Capacity changes
// -------------------------------------------------------------------------

#[test]
fn test_set_capacity_zero_rejected() {
    let mut reg = registry(3);
    assert_eq!(reg.set_capacity(0), Err(LotError::InvalidCapacity));
    assert_eq!(reg.capacity(), 3);
}

#[test]
fn test_grow_adds_available_slots() {
    let mut reg = registry(2);
    reg.park("A").unwrap();
    reg.set_capacity(6).unwrap();
    assert_eq!(reg.stats().available_slots, 5);
}

#[test]
fn test_shrink_over_occupied_slot_rejected() {
    let mut reg = registry(5);
    for r in ["A", "B", "C"] {
        reg.park(r).unwrap();
    }
    assert_eq!(
        reg.set_capacity(2),
        Err(LotError::CapacityInUse {
            requested: 2,
            occupied_slot: 3
        })
    );
    assert_eq!(reg.capacity(), 5);
}

#[test]
fn test_shrink_reports_lowest_dropped_occupied_slot() {
    let mut reg = registry(6);
    for r in ["A", "B", "C", "D", "E"] {
        reg.park(r).unwrap();
    }
    reg.remove("D").unwrap();
    assert_eq!(
        reg.set_capacity(3),
        Err(LotError::CapacityInUse {
            requested: 3,
            occupied_slot: 5
        })
    );
}

#[test]
fn test_shrink_to_highest_occupied_slot_allowed() {
    let mut reg = registry(10);
    for r in ["A", "B", "C"] {
        reg.park(r).unwrap();
    }
    reg.set_capacity(3).unwrap();
    assert_eq!(reg.capacity(), 3);
    assert_eq!(reg.available_slots(), 0);
}

#[test]
fn test_shrink_with_gap_keeps_low_slots() {
    let mut reg = registry(5);
    reg.park("A").unwrap();
    reg.park("B").unwrap();
    reg.remove("B").unwrap();
    reg.set_capacity(1).unwrap();
    assert_eq!(reg.all_slots().len(), 1);
    assert_eq!(reg.park("C"), Err(LotError::NoSlotAvailable));
}

// -------------------------------------------------------------------------
// Slot queries and stats
// -------------------------------------------------------------------------

#[test]
fn test_slot_details_include_ticket_only_when_occupied() {
    let mut reg = registry(2);
    let ticket = reg.park("A").unwrap();

    let occupied = reg.slot_details(1);
    assert_eq!(occupied.status, SlotStatus::Occupied);
    assert_eq!(occupied.ticket, Some(ticket));

    let free = reg.slot_details(2);
    assert_eq!(free.status, SlotStatus::Available);
    assert!(free.ticket.is_none());
}

#[test]
fn test_out_of_range_slot_reports_available() {
    let reg = registry(2);
    assert_eq!(reg.slot_status(0), SlotStatus::Available);
    assert_eq!(reg.slot_status(99), SlotStatus::Available);
}

#[test]
fn test_all_slots_ascending_and_complete() {
    let mut reg = registry(4);
    reg.park("A").unwrap();
    reg.park("B").unwrap();
    reg.remove("A").unwrap();

    let slots = reg.all_slots();
    let numbers: Vec<u32> = slots.iter().map(|s| s.slot_number).collect();
    assert_eq!(numbers, vec![1, 2, 3, 4]);
    let statuses: Vec<&str> = slots.iter().map(|s| s.status.as_str()).collect();
    assert_eq!(statuses, vec!["available", "occupied", "available", "available"]);
}

#[test]
fn test_all_parked_tickets_ordered_by_slot() {
    let mut reg = registry(4);
    for r in ["A", "B", "C"] {
        reg.park(r).unwrap();
    }
    reg.remove("A").unwrap();
    reg.park("D").unwrap();

    let order: Vec<(u32, &str)> = reg
        .all_parked_tickets()
        .into_iter()
        .map(|t| (t.slot_number(), t.registration_number()))
        .collect();
    assert_eq!(order, vec![(1, "D"), (2, "B"), (3, "C")]);
}

#[test]
fn test_stats_always_sum_to_capacity() {
    let mut reg = registry(3);
    reg.park("A").unwrap();
    let stats = reg.stats();
    assert_eq!(stats.occupied_slots + stats.available_slots, stats.capacity);
    assert_eq!(
        stats,
        LotStats {
            capacity: 3,
            available_slots: 2,
            occupied_slots: 1
        }
    );
}

#[test]
fn test_reset_clears_tickets_keeps_capacity() {
    let mut reg = registry(4);
    reg.park("A").unwrap();
    reg.park("B").unwrap();
    reg.reset();
    assert_eq!(reg.capacity(), 4);
    assert_eq!(reg.available_slots(), 4);
    assert!(reg.all_parked_tickets().is_empty());
    assert_eq!(reg.park("C").unwrap().slot_number(), 1);
}

// -------------------------------------------------------------------------
// Capacity input parsing
// -------------------------------------------------------------------------

#[test]
fn test_parse_capacity_accepts_trimmed_positive() {
    assert_eq!(parse_capacity(" 12 "), Ok(12));
}

#[test]
fn test_parse_capacity_bounded_by_max() {
    assert_eq!(parse_capacity("10000"), Ok(MAX_CAPACITY));
    assert_eq!(parse_capacity("10001"), Err(LotError::InvalidCapacity));
    assert_eq!(parse_capacity("4294967295"), Err(LotError::InvalidCapacity));
}

#[test]
fn test_capacity_above_max_refused_everywhere() {
    assert_eq!(
        SlotRegistry::new(MAX_CAPACITY + 1),
        Err(LotError::InvalidCapacity)
    );

    let mut reg = registry(3);
    assert_eq!(reg.set_capacity(u32::MAX), Err(LotError::InvalidCapacity));
    assert_eq!(reg.capacity(), 3);

    reg.set_capacity(MAX_CAPACITY).unwrap();
    assert_eq!(reg.all_slots().len(), MAX_CAPACITY as usize);
}

#[test]
fn test_with_capacity_clamps_to_max() {
    let reg = SlotRegistry::with_capacity(NonZeroU32::MAX);
    assert_eq!(reg.capacity(), MAX_CAPACITY);
}

#[test]
fn test_parse_capacity_rejects_bad_input() {
    for bad in ["", "0", "-3", "abc", "4.5", "99999999999"] {
        assert_eq!(parse_capacity(bad), Err(LotError::InvalidCapacity), "{bad:?}");
    }
}
