//! Text encoding of the registry for a key-value blob store.
//!
//! Two blobs: the occupancy map as a JSON object keyed by decimal slot
//! number, and the capacity as decimal text. Decoding validates every
//! registry invariant, so a hand-edited or truncated blob can never produce
//! a registry that breaks them.

use std::collections::BTreeMap;
use std::num::NonZeroU32;

use bevy::prelude::*;

use crate::config::MAX_CAPACITY;
use crate::ticket::{normalize_registration, same_registration, Ticket};

use super::state::SlotRegistry;

impl SlotRegistry {
    /// Occupancy map as JSON text.
    pub fn encode_occupancy(&self) -> Result<String, String> {
        serde_json::to_string(&self.occupied).map_err(|e| format!("occupancy encode failed: {e}"))
    }

    /// Capacity as decimal text.
    pub fn encode_capacity(&self) -> String {
        self.capacity().to_string()
    }

    /// Rebuild from both blobs.
    pub fn decode(occupancy: &str, capacity: &str) -> Result<Self, String> {
        let capacity = decode_capacity(capacity)?;
        Self::from_snapshot(capacity, decode_occupancy(occupancy)?)
    }

    /// Like `decode`, but a capacity blob below the highest stored slot is
    /// raised to that slot instead of failing. A grow whose capacity write
    /// failed, followed by a park into a new slot, leaves the store that way.
    ///
    /// Returns the registry and the stored capacity that was raised, if any.
    pub fn decode_raising_capacity(
        occupancy: &str,
        capacity: &str,
    ) -> Result<(Self, Option<u32>), String> {
        let stored = decode_capacity(capacity)?;
        let occupied = decode_occupancy(occupancy)?;
        let highest = occupied.keys().next_back().copied().unwrap_or(0);
        if highest > stored && highest <= MAX_CAPACITY {
            return Ok((Self::from_snapshot(highest, occupied)?, Some(stored)));
        }
        Ok((Self::from_snapshot(stored, occupied)?, None))
    }

    /// Rebuild from decoded parts, rejecting anything that would violate a
    /// registry invariant. Registrations are stored trimmed.
    pub fn from_snapshot(capacity: u32, occupied: BTreeMap<u32, Ticket>) -> Result<Self, String> {
        let capacity = NonZeroU32::new(capacity)
            .filter(|c| c.get() <= MAX_CAPACITY)
            .ok_or_else(|| format!("capacity {capacity} is outside 1..={MAX_CAPACITY}"))?;

        let mut tickets: BTreeMap<u32, Ticket> = BTreeMap::new();
        for (slot, ticket) in occupied {
            if slot == 0 || slot > capacity.get() {
                return Err(format!(
                    "slot {slot} is outside 1..={}",
                    capacity.get()
                ));
            }
            if ticket.slot_number() != slot {
                return Err(format!(
                    "slot {slot} holds a ticket for slot {}",
                    ticket.slot_number()
                ));
            }
            let Some(registration) = normalize_registration(ticket.registration_number()) else {
                return Err(format!("slot {slot} has a blank registration"));
            };
            if tickets
                .values()
                .any(|other| same_registration(other.registration_number(), registration))
            {
                return Err(format!(
                    "registration {registration} is parked in more than one slot"
                ));
            }
            let trimmed = Ticket::new(registration.to_string(), slot, ticket.entry_time());
            tickets.insert(slot, trimmed);
        }

        debug!(
            "Restored registry snapshot: {} of {} slots occupied",
            tickets.len(),
            capacity
        );
        Ok(Self {
            capacity,
            occupied: tickets,
        })
    }
}

fn decode_occupancy(occupancy: &str) -> Result<BTreeMap<u32, Ticket>, String> {
    serde_json::from_str(occupancy)
        .map_err(|e| format!("occupancy blob is not a valid slot map: {e}"))
}

/// Parse the capacity blob.
pub fn decode_capacity(text: &str) -> Result<u32, String> {
    text.trim()
        .parse::<u32>()
        .map_err(|e| format!("capacity blob {text:?} is not a number: {e}"))
}
