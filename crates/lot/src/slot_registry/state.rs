//! Slot registry resource: capacity, the occupied-slot map, allocation,
//! release, and read-only queries.

use std::collections::BTreeMap;
use std::num::NonZeroU32;

use bevy::prelude::*;

use crate::config::MAX_CAPACITY;
use crate::entry_time::EntryTime;
use crate::lot_error::LotError;
use crate::ticket::{normalize_registration, Ticket};

// =============================================================================
// Query result types
// =============================================================================

/// Whether a slot currently holds a ticket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SlotStatus {
    Occupied,
    Available,
}

impl SlotStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            SlotStatus::Occupied => "occupied",
            SlotStatus::Available => "available",
        }
    }
}

/// One slot as shown on the occupancy board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotDetails {
    pub slot_number: u32,
    pub status: SlotStatus,
    /// Present only when `status` is `Occupied`.
    pub ticket: Option<Ticket>,
}

/// Derived occupancy counters. Always computed from the occupancy map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LotStats {
    pub capacity: u32,
    pub available_slots: u32,
    pub occupied_slots: u32,
}

// =============================================================================
// Resource: slot registry
// =============================================================================

/// Every slot of the lot and who is parked in it.
///
/// Invariants held between calls:
/// - every key of `occupied` lies in `1..=capacity`
/// - each ticket's `slot_number` equals its key
/// - no two tickets share a registration (case-insensitive)
///
/// The registry never touches storage; callers persist after a successful
/// mutation.
#[derive(Resource, Debug, Clone, PartialEq, Eq)]
pub struct SlotRegistry {
    pub(super) capacity: NonZeroU32,
    pub(super) occupied: BTreeMap<u32, Ticket>,
}

impl SlotRegistry {
    /// Empty registry. Zero capacity or one above `MAX_CAPACITY` is refused
    /// with `InvalidCapacity`.
    pub fn new(capacity: u32) -> Result<Self, LotError> {
        checked_capacity(capacity).map(Self::with_capacity)
    }

    /// Empty registry; capacities above `MAX_CAPACITY` are clamped to it.
    pub fn with_capacity(capacity: NonZeroU32) -> Self {
        let capacity = NonZeroU32::new(capacity.get().min(MAX_CAPACITY)).unwrap_or(capacity);
        Self {
            capacity,
            occupied: BTreeMap::new(),
        }
    }

    pub fn capacity(&self) -> u32 {
        self.capacity.get()
    }

    pub fn occupied_slots(&self) -> u32 {
        self.occupied.len() as u32
    }

    pub fn available_slots(&self) -> u32 {
        self.capacity().saturating_sub(self.occupied_slots())
    }

    // -------------------------------------------------------------------------
    // Mutations
    // -------------------------------------------------------------------------

    /// Grow or shrink the lot.
    ///
    /// Shrinking is refused if any slot in `(new_capacity, capacity]` is
    /// occupied; the error names the lowest such slot.
    pub fn set_capacity(&mut self, new_capacity: u32) -> Result<(), LotError> {
        let capacity = checked_capacity(new_capacity)?;

        if new_capacity < self.capacity() {
            let dropped = (new_capacity + 1)..=self.capacity();
            if let Some(&occupied_slot) = self.occupied.range(dropped).next().map(|(k, _)| k) {
                return Err(LotError::CapacityInUse {
                    requested: new_capacity,
                    occupied_slot,
                });
            }
        }

        self.capacity = capacity;
        Ok(())
    }

    /// Park a vehicle in the lowest-numbered free slot, stamped with the
    /// current time.
    pub fn park(&mut self, registration: &str) -> Result<Ticket, LotError> {
        self.park_at(registration, EntryTime::now())
    }

    /// Park with a caller-supplied entry time.
    pub fn park_at(&mut self, registration: &str, entry_time: EntryTime) -> Result<Ticket, LotError> {
        let registration = normalize_registration(registration).ok_or(LotError::EmptyRegistration)?;

        if self.is_parked(registration) {
            return Err(LotError::AlreadyParked(registration.to_string()));
        }
        if self.available_slots() == 0 {
            return Err(LotError::NoSlotAvailable);
        }
        let slot = self.lowest_free_slot().ok_or(LotError::NoSlotAvailable)?;

        let ticket = Ticket::new(registration.to_string(), slot, entry_time);
        self.occupied.insert(slot, ticket.clone());
        Ok(ticket)
    }

    /// Release the slot held by `registration` and hand back its ticket.
    pub fn remove(&mut self, registration: &str) -> Result<Ticket, LotError> {
        let registration = normalize_registration(registration).ok_or(LotError::EmptyRegistration)?;

        let slot = self
            .find_by_registration(registration)
            .map(Ticket::slot_number)
            .ok_or_else(|| LotError::NotFound(registration.to_string()))?;

        self.occupied
            .remove(&slot)
            .ok_or_else(|| LotError::NotFound(registration.to_string()))
    }

    /// Drop every ticket. Capacity is kept.
    pub fn reset(&mut self) {
        self.occupied.clear();
    }

    // -------------------------------------------------------------------------
    // Queries
    // -------------------------------------------------------------------------

    /// Ticket whose registration matches, ignoring case and surrounding
    /// whitespace. Blank input never matches.
    pub fn find_by_registration(&self, registration: &str) -> Option<&Ticket> {
        let registration = normalize_registration(registration)?;
        self.occupied.values().find(|t| t.matches(registration))
    }

    pub fn is_parked(&self, registration: &str) -> bool {
        self.find_by_registration(registration).is_some()
    }

    pub fn ticket_in_slot(&self, slot_number: u32) -> Option<&Ticket> {
        self.occupied.get(&slot_number)
    }

    /// Slots outside `1..=capacity` hold nothing and report `Available`.
    pub fn slot_status(&self, slot_number: u32) -> SlotStatus {
        if self.occupied.contains_key(&slot_number) {
            SlotStatus::Occupied
        } else {
            SlotStatus::Available
        }
    }

    pub fn slot_details(&self, slot_number: u32) -> SlotDetails {
        let ticket = self.ticket_in_slot(slot_number).cloned();
        SlotDetails {
            slot_number,
            status: self.slot_status(slot_number),
            ticket,
        }
    }

    /// Every slot from 1 to capacity, ascending.
    pub fn all_slots(&self) -> Vec<SlotDetails> {
        (1..=self.capacity()).map(|slot| self.slot_details(slot)).collect()
    }

    /// Parked tickets ascending by slot number.
    pub fn all_parked_tickets(&self) -> Vec<&Ticket> {
        self.occupied.values().collect()
    }

    pub fn stats(&self) -> LotStats {
        let occupied_slots = self.occupied_slots();
        LotStats {
            capacity: self.capacity(),
            available_slots: self.capacity().saturating_sub(occupied_slots),
            occupied_slots,
        }
    }

    /// First gap in the ascending key sequence 1, 2, 3, ...
    fn lowest_free_slot(&self) -> Option<u32> {
        let mut candidate = 1u32;
        for &slot in self.occupied.keys() {
            if slot != candidate {
                break;
            }
            candidate += 1;
        }
        (candidate <= self.capacity()).then_some(candidate)
    }
}

// =============================================================================
// Pure input validation
// =============================================================================

/// Validate a capacity typed by a user: trimmed, base-10, in
/// `1..=MAX_CAPACITY`.
pub fn parse_capacity(input: &str) -> Result<u32, LotError> {
    let parsed = input
        .trim()
        .parse::<i64>()
        .map_err(|_| LotError::InvalidCapacity)?;
    let capacity = u32::try_from(parsed).map_err(|_| LotError::InvalidCapacity)?;
    checked_capacity(capacity).map(NonZeroU32::get)
}

fn checked_capacity(capacity: u32) -> Result<NonZeroU32, LotError> {
    NonZeroU32::new(capacity)
        .filter(|c| c.get() <= MAX_CAPACITY)
        .ok_or(LotError::InvalidCapacity)
}
