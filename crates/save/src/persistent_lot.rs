//! Registry paired with its store: every successful mutation is followed by
//! exactly one persistence write.
//!
//! A failed write never undoes the mutation. It is logged, kept as
//! `last_persist_error`, and the next successful write clears it.

use std::num::NonZeroU32;

use bevy::prelude::*;
use lot::{EntryTime, LotError, SlotRegistry, Ticket};

use crate::blob_store::BlobStore;
use crate::registry_persist::{persist_registry, restore_registry};
use crate::save_error::SaveError;

pub struct PersistentLot<S: BlobStore> {
    registry: SlotRegistry,
    store: S,
    last_persist_error: Option<SaveError>,
}

impl<S: BlobStore> PersistentLot<S> {
    /// Restore from `store`, or start empty with `fallback_capacity`.
    /// Nothing is written until the first mutation.
    pub fn open(store: S, fallback_capacity: NonZeroU32) -> Self {
        let registry = restore_registry(&store, fallback_capacity);
        Self {
            registry,
            store,
            last_persist_error: None,
        }
    }

    /// Read-only view for queries (`stats`, `all_slots`, lookups).
    pub fn registry(&self) -> &SlotRegistry {
        &self.registry
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    /// Error from the most recent write, if it failed.
    pub fn last_persist_error(&self) -> Option<&SaveError> {
        self.last_persist_error.as_ref()
    }

    pub fn set_capacity(&mut self, new_capacity: u32) -> Result<(), LotError> {
        self.registry.set_capacity(new_capacity)?;
        self.persist();
        Ok(())
    }

    pub fn park(&mut self, registration: &str) -> Result<Ticket, LotError> {
        self.park_at(registration, EntryTime::now())
    }

    pub fn park_at(&mut self, registration: &str, entry_time: EntryTime) -> Result<Ticket, LotError> {
        let ticket = self.registry.park_at(registration, entry_time)?;
        self.persist();
        Ok(ticket)
    }

    pub fn remove(&mut self, registration: &str) -> Result<Ticket, LotError> {
        let ticket = self.registry.remove(registration)?;
        self.persist();
        Ok(ticket)
    }

    pub fn reset(&mut self) {
        self.registry.reset();
        self.persist();
    }

    fn persist(&mut self) {
        match persist_registry(&self.registry, &mut self.store) {
            Ok(()) => self.last_persist_error = None,
            Err(e) => {
                error!("Failed to persist parking registry: {e}");
                self.last_persist_error = Some(e);
            }
        }
    }
}
