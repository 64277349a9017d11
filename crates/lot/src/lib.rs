use bevy::prelude::*;

pub mod config;
pub mod entry_time;
pub mod lot_commands;
pub mod lot_error;
pub mod slot_registry;
pub mod ticket;

#[cfg(test)]
mod test_harness;

pub use config::LotConfig;
pub use entry_time::EntryTime;
pub use lot_commands::{
    apply_command, LotCommand, LotNotification, LotSet, NotificationKind, RegistryChanged,
};
pub use lot_error::LotError;
pub use slot_registry::{parse_capacity, LotStats, SlotDetails, SlotRegistry, SlotStatus};
pub use ticket::Ticket;

/// Registers the registry's events, systems, and configuration.
///
/// A `SlotRegistry` inserted before or during `Startup` (for example by a
/// persistence restore) is kept; otherwise an empty one sized by
/// `LotConfig::initial_capacity` is inserted in `PostStartup`.
pub struct LotPlugin;

impl Plugin for LotPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<LotConfig>()
            .add_event::<LotCommand>()
            .add_event::<LotNotification>()
            .add_event::<RegistryChanged>()
            .configure_sets(Update, (LotSet::Apply, LotSet::Persist).chain())
            .add_systems(PostStartup, lot_commands::insert_default_registry)
            .add_systems(
                Update,
                lot_commands::apply_lot_commands.in_set(LotSet::Apply),
            );
    }
}
