use serde::{Deserialize, Serialize};

use crate::entry_time::EntryTime;

/// Record of one parked vehicle. Created by `SlotRegistry::park` and never
/// mutated afterwards; removing the vehicle hands back an owned copy.
///
/// Field names serialize in camelCase to match the stored occupancy blob.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ticket {
    registration_number: String,
    slot_number: u32,
    entry_time: EntryTime,
}

impl Ticket {
    pub(crate) fn new(registration_number: String, slot_number: u32, entry_time: EntryTime) -> Self {
        Self {
            registration_number,
            slot_number,
            entry_time,
        }
    }

    /// Registration as entered, trimmed.
    pub fn registration_number(&self) -> &str {
        &self.registration_number
    }

    pub fn slot_number(&self) -> u32 {
        self.slot_number
    }

    pub fn entry_time(&self) -> EntryTime {
        self.entry_time
    }

    /// Case-insensitive comparison against an already-trimmed registration.
    pub fn matches(&self, registration: &str) -> bool {
        same_registration(&self.registration_number, registration)
    }
}

/// Trim user input; `None` when nothing is left.
pub fn normalize_registration(input: &str) -> Option<&str> {
    let trimmed = input.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}

/// Registrations compare equal ignoring surrounding whitespace and letter case.
pub fn same_registration(a: &str, b: &str) -> bool {
    let (a, b) = (a.trim(), b.trim());
    a == b || a.to_lowercase() == b.to_lowercase()
}
