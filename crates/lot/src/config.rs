use std::num::NonZeroU32;

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Capacity used when nothing has been persisted yet and the caller did not
/// choose one.
pub const DEFAULT_CAPACITY: u32 = 20;

/// Largest capacity a registry accepts. Every slot is listed on the
/// occupancy board, so the bound keeps `all_slots` to a size a UI can draw.
pub const MAX_CAPACITY: u32 = 10_000;

/// Store key holding the JSON occupancy map (slot number -> ticket).
pub const OCCUPANCY_KEY: &str = "parkingData";

/// Store key holding the capacity as decimal text.
pub const CAPACITY_KEY: &str = "totalSlots";

/// Lot-level settings read at startup.
#[derive(Resource, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LotConfig {
    /// Capacity of a brand-new registry. Ignored when a saved registry is
    /// restored, since the saved capacity wins.
    pub initial_capacity: NonZeroU32,
}

impl Default for LotConfig {
    fn default() -> Self {
        Self {
            initial_capacity: NonZeroU32::new(DEFAULT_CAPACITY).unwrap_or(NonZeroU32::MIN),
        }
    }
}
