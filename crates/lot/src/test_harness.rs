//! Headless app wrapper for exercising `LotPlugin` end to end.

use bevy::prelude::*;

use crate::{LotCommand, LotConfig, LotNotification, LotPlugin, LotSet, RegistryChanged, SlotRegistry};

/// Everything the plugin reported during the last `update`.
#[derive(Resource, Default)]
pub(crate) struct Observed {
    pub(crate) notifications: Vec<LotNotification>,
    pub(crate) changes: usize,
}

fn observe(
    mut notifications: EventReader<LotNotification>,
    mut changes: EventReader<RegistryChanged>,
    mut observed: ResMut<Observed>,
) {
    observed.notifications.extend(notifications.read().cloned());
    observed.changes += changes.read().count();
}

pub(crate) struct TestLot {
    app: App,
}

impl TestLot {
    pub(crate) fn new() -> Self {
        Self::with_app(App::new())
    }

    pub(crate) fn with_config(config: LotConfig) -> Self {
        let mut app = App::new();
        app.insert_resource(config);
        Self::with_app(app)
    }

    fn with_app(mut app: App) -> Self {
        app.add_plugins(LotPlugin)
            .init_resource::<Observed>()
            .add_systems(Update, observe.after(LotSet::Apply));
        Self { app }
    }

    pub(crate) fn app_mut(&mut self) -> &mut App {
        &mut self.app
    }

    /// Queue commands and run one frame.
    pub(crate) fn run(&mut self, commands: impl IntoIterator<Item = LotCommand>) -> &mut Self {
        {
            let mut observed = self.app.world_mut().resource_mut::<Observed>();
            observed.notifications.clear();
            observed.changes = 0;
        }
        for command in commands {
            self.app.world_mut().send_event(command);
        }
        self.app.update();
        self
    }

    /// Run one frame with no commands.
    pub(crate) fn tick(&mut self) -> &mut Self {
        self.run(std::iter::empty::<LotCommand>())
    }

    pub(crate) fn registry(&self) -> &SlotRegistry {
        self.app.world().resource::<SlotRegistry>()
    }

    pub(crate) fn observed(&self) -> &Observed {
        self.app.world().resource::<Observed>()
    }
}
