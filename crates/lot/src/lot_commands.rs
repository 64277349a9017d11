//! ECS front door for the UI layer.
//!
//! The UI sends `LotCommand` events carrying raw user input. The
//! `apply_lot_commands` system validates and applies them to the
//! `SlotRegistry` resource, answers each with a `LotNotification`, and emits
//! `RegistryChanged` after every successful mutation so views can re-render
//! and the save crate can persist.

use bevy::prelude::*;

use crate::lot_error::LotError;
use crate::slot_registry::{parse_capacity, SlotRegistry};

// =============================================================================
// Events
// =============================================================================

/// An operation requested by the person at the gate.
#[derive(Event, Debug, Clone, PartialEq, Eq)]
pub enum LotCommand {
    /// Resize the lot; the text is parsed with `parse_capacity`.
    SetCapacity(String),
    /// Park the vehicle with this registration.
    Park(String),
    /// Release the slot held by this registration.
    Remove(String),
    /// Clear every ticket, keeping capacity.
    Reset,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NotificationKind {
    Success,
    Error,
    Info,
}

/// User-facing outcome of one command.
#[derive(Event, Debug, Clone, PartialEq, Eq)]
pub struct LotNotification {
    pub text: String,
    pub kind: NotificationKind,
}

impl LotNotification {
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            kind: NotificationKind::Success,
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            kind: NotificationKind::Error,
        }
    }

    pub fn info(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            kind: NotificationKind::Info,
        }
    }
}

impl From<LotError> for LotNotification {
    fn from(err: LotError) -> Self {
        LotNotification::error(err.to_string())
    }
}

/// The registry was mutated this frame.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegistryChanged;

// =============================================================================
// System sets
// =============================================================================

/// Commands are applied before the resulting state is persisted.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum LotSet {
    Apply,
    Persist,
}

// =============================================================================
// Pure command application
// =============================================================================

/// Apply one command, returning the success notification.
pub fn apply_command(
    registry: &mut SlotRegistry,
    command: &LotCommand,
) -> Result<LotNotification, LotError> {
    match command {
        LotCommand::SetCapacity(input) => {
            let capacity = parse_capacity(input)?;
            registry.set_capacity(capacity)?;
            Ok(LotNotification::success(format!(
                "Parking lot now has {capacity} slots"
            )))
        }
        LotCommand::Park(input) => {
            let ticket = registry.park(input)?;
            Ok(LotNotification::success(format!(
                "Vehicle {} parked at slot {}",
                ticket.registration_number(),
                ticket.slot_number()
            )))
        }
        LotCommand::Remove(input) => {
            let ticket = registry.remove(input)?;
            Ok(LotNotification::success(format!(
                "Vehicle {} removed from slot {}",
                ticket.registration_number(),
                ticket.slot_number()
            )))
        }
        LotCommand::Reset => {
            registry.reset();
            Ok(LotNotification::info("Parking system has been reset"))
        }
    }
}

// =============================================================================
// Systems
// =============================================================================

/// Drain pending commands in arrival order.
pub fn apply_lot_commands(
    mut commands_in: EventReader<LotCommand>,
    registry: Option<ResMut<SlotRegistry>>,
    mut notifications: EventWriter<LotNotification>,
    mut changes: EventWriter<RegistryChanged>,
) {
    let Some(mut registry) = registry else {
        if !commands_in.is_empty() {
            warn!(
                "Lot: {} command(s) dropped, no registry has been set up",
                commands_in.len()
            );
            commands_in.clear();
        }
        return;
    };

    for command in commands_in.read() {
        match apply_command(&mut registry, command) {
            Ok(notification) => {
                debug!("Lot: {:?} -> {}", command, notification.text);
                notifications.send(notification);
                changes.send(RegistryChanged);
            }
            Err(err) => {
                debug!("Lot: {:?} refused: {}", command, err);
                notifications.send(err.into());
            }
        }
    }
}

/// Give the lot a fresh registry when nothing was restored during `Startup`.
pub fn insert_default_registry(
    mut commands: Commands,
    registry: Option<Res<SlotRegistry>>,
    config: Res<crate::config::LotConfig>,
) {
    if registry.is_none() {
        info!(
            "Lot: starting with an empty registry of {} slots",
            config.initial_capacity
        );
        commands.insert_resource(SlotRegistry::with_capacity(config.initial_capacity));
    }
}
