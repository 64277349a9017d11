//! Writing the registry to a blob store and reading it back.

use std::num::NonZeroU32;

use bevy::prelude::*;
use lot::config::{CAPACITY_KEY, OCCUPANCY_KEY};
use lot::SlotRegistry;

use crate::blob_store::BlobStore;
use crate::save_error::SaveError;

/// Write both registry blobs, occupancy first.
///
/// The two writes are not atomic together. If only the capacity write fails
/// after a grow, the stored capacity can lag behind the stored tickets;
/// `load_registry` raises it back to the highest stored slot.
pub fn persist_registry<S: BlobStore + ?Sized>(
    registry: &SlotRegistry,
    store: &mut S,
) -> Result<(), SaveError> {
    let occupancy = registry.encode_occupancy().map_err(SaveError::Encode)?;
    store.set(OCCUPANCY_KEY, &occupancy)?;
    store.set(CAPACITY_KEY, &registry.encode_capacity())?;
    Ok(())
}

/// Read the registry back.
///
/// `Ok(None)` when either key has never been written. A stored capacity
/// below the highest stored slot is raised to that slot with a warning.
pub fn load_registry<S: BlobStore + ?Sized>(store: &S) -> Result<Option<SlotRegistry>, SaveError> {
    let (Some(occupancy), Some(capacity)) = (store.get(OCCUPANCY_KEY)?, store.get(CAPACITY_KEY)?)
    else {
        return Ok(None);
    };
    let (registry, raised_from) =
        SlotRegistry::decode_raising_capacity(&occupancy, &capacity).map_err(SaveError::Decode)?;
    if let Some(stored) = raised_from {
        warn!(
            "Saved capacity {} is below occupied slots, restoring with {} slots",
            stored,
            registry.capacity()
        );
    }
    Ok(Some(registry))
}

/// Restore the saved registry, or start empty with `fallback_capacity` when
/// nothing usable is stored. Never fails: unreadable state is logged and
/// left in the store untouched until the next write replaces it.
pub fn restore_registry<S: BlobStore + ?Sized>(
    store: &S,
    fallback_capacity: NonZeroU32,
) -> SlotRegistry {
    match load_registry(store) {
        Ok(Some(registry)) => {
            let stats = registry.stats();
            info!(
                "Restored parking registry: {} of {} slots occupied",
                stats.occupied_slots, stats.capacity
            );
            registry
        }
        Ok(None) => {
            info!(
                "No saved parking registry, starting empty with {} slots",
                fallback_capacity
            );
            SlotRegistry::with_capacity(fallback_capacity)
        }
        Err(e) => {
            warn!(
                "Saved parking registry unusable, starting empty with {} slots: {}",
                fallback_capacity, e
            );
            SlotRegistry::with_capacity(fallback_capacity)
        }
    }
}
