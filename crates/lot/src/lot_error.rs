// ---------------------------------------------------------------------------
// LotError: every way a registry operation can be refused
// ---------------------------------------------------------------------------

use std::fmt;

/// Errors returned by `SlotRegistry` operations.
///
/// None of these are fatal; a refused operation leaves the registry exactly
/// as it was. `Display` yields the message shown to the person at the gate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LotError {
    /// Capacity was zero, negative, above `MAX_CAPACITY`, or not a number.
    InvalidCapacity,
    /// Shrinking would drop an occupied slot out of range.
    CapacityInUse { requested: u32, occupied_slot: u32 },
    /// Registration number was empty after trimming.
    EmptyRegistration,
    /// A vehicle with this registration (any letter case) is already parked.
    AlreadyParked(String),
    /// Every slot is occupied.
    NoSlotAvailable,
    /// No parked vehicle has this registration.
    NotFound(String),
}

impl fmt::Display for LotError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LotError::InvalidCapacity => write!(f, "Please enter a valid number of slots"),
            LotError::CapacityInUse {
                requested,
                occupied_slot,
            } => write!(
                f,
                "Cannot reduce capacity to {requested}: slot {occupied_slot} is occupied"
            ),
            LotError::EmptyRegistration => write!(f, "Please enter a registration number"),
            LotError::AlreadyParked(reg) => {
                write!(f, "Vehicle with registration {reg} is already parked")
            }
            LotError::NoSlotAvailable => write!(f, "No parking slots available"),
            LotError::NotFound(reg) => write!(f, "No vehicle found with registration {reg}"),
        }
    }
}

impl std::error::Error for LotError {}
