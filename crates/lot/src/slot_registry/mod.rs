//! Slot registry: the single source of truth for which vehicle sits in which
//! numbered slot.
//!
//! ## Allocation policy
//! Vehicles always take the lowest-numbered free slot, found by an ascending
//! scan over `1..=capacity`. A slot freed by an exit is the next one handed
//! out if nothing lower is free.
//!
//! ## Capacity changes
//! Growing always succeeds. Shrinking is refused when a slot that would fall
//! out of range is occupied, so a resize can never orphan a parked vehicle.
//!
//! ## Persistence
//! The registry is pure. `snapshot` encodes it into two text blobs and
//! decodes them back with full invariant checks; the save crate decides when
//! to write them.

pub mod snapshot;
pub mod state;

#[cfg(test)]
mod tests_state;

pub use snapshot::*;
pub use state::*;
