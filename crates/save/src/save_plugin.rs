use std::path::PathBuf;

use bevy::prelude::*;
use lot::{LotConfig, LotNotification, LotSet, RegistryChanged, SlotRegistry};
use serde::{Deserialize, Serialize};

use crate::blob_store::BlobStore;
use crate::registry_persist::{persist_registry, restore_registry};

// ---------------------------------------------------------------------------
// Resources
// ---------------------------------------------------------------------------

/// The backend the registry is restored from and persisted to.
///
/// Insert one before the app starts to override the platform default.
#[derive(Resource)]
pub struct LotStore(pub Box<dyn BlobStore + Send + Sync>);

impl LotStore {
    pub fn new(store: impl BlobStore + Send + Sync + 'static) -> Self {
        Self(Box::new(store))
    }
}

/// Directory of the native file store, relative to the working directory.
pub const DEFAULT_DATA_DIR: &str = "lotkeeper_data";

/// Where the native file store lives.
#[derive(Resource, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreConfig {
    pub data_dir: PathBuf,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
        }
    }
}

/// Outcome of the persistence writes made so far.
#[derive(Resource, Debug, Default, Clone, PartialEq, Eq)]
pub struct PersistStatus {
    /// Successful writes of both keys.
    pub writes: u64,
    /// Message of the most recent failed write; cleared by the next success.
    pub last_error: Option<String>,
}

// ---------------------------------------------------------------------------
// Plugin
// ---------------------------------------------------------------------------

/// Restores the registry at startup and writes it back after every frame in
/// which it changed. Requires `LotPlugin`.
pub struct SavePlugin;

impl Plugin for SavePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<StoreConfig>()
            .init_resource::<PersistStatus>()
            .add_systems(
                Startup,
                (open_default_store, restore_registry_on_startup).chain(),
            )
            .add_systems(Update, persist_on_registry_change.in_set(LotSet::Persist));
    }
}

// ---------------------------------------------------------------------------
// Startup
// ---------------------------------------------------------------------------

/// Exclusive so the store is visible to the restore system that follows.
fn open_default_store(world: &mut World) {
    if world.contains_resource::<LotStore>() {
        return;
    }
    let config = world
        .get_resource::<StoreConfig>()
        .cloned()
        .unwrap_or_default();
    let store = platform_store(&config);
    world.insert_resource(store);
}

#[cfg(not(target_arch = "wasm32"))]
fn platform_store(config: &StoreConfig) -> LotStore {
    match crate::file_store::FileStore::open(config.data_dir.clone()) {
        Ok(store) => {
            info!(
                "Save: using file store at {} ({} stale tmp file(s) cleaned)",
                store.dir().display(),
                store.tmp_files_cleaned()
            );
            LotStore::new(store)
        }
        Err(e) => {
            error!(
                "Save: cannot open file store at {}, changes will not survive a restart: {}",
                config.data_dir.display(),
                e
            );
            LotStore::new(crate::blob_store::MemoryStore::new())
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn platform_store(_config: &StoreConfig) -> LotStore {
    info!("Save: using browser localStorage");
    LotStore::new(crate::web_storage::WebStorageStore::new())
}

/// Restored state wins over the empty registry `LotPlugin` would insert in
/// `PostStartup`.
fn restore_registry_on_startup(
    mut commands: Commands,
    store: Option<Res<LotStore>>,
    existing: Option<Res<SlotRegistry>>,
    config: Option<Res<LotConfig>>,
) {
    if existing.is_some() {
        debug!("Save: registry already present, skipping restore");
        return;
    }
    let Some(store) = store else {
        warn!("Save: no store available, skipping restore");
        return;
    };
    let fallback = config
        .map(|c| c.initial_capacity)
        .unwrap_or_else(|| LotConfig::default().initial_capacity);
    commands.insert_resource(restore_registry(store.0.as_ref(), fallback));
}

// ---------------------------------------------------------------------------
// Update
// ---------------------------------------------------------------------------

/// One write per frame no matter how many mutations happened in it.
fn persist_on_registry_change(
    mut changes: EventReader<RegistryChanged>,
    registry: Option<Res<SlotRegistry>>,
    store: Option<ResMut<LotStore>>,
    mut status: ResMut<PersistStatus>,
    mut notifications: EventWriter<LotNotification>,
) {
    if changes.read().count() == 0 {
        return;
    }
    let (Some(registry), Some(mut store)) = (registry, store) else {
        warn!("Save: registry changed but there is no registry or store to persist");
        return;
    };

    match persist_registry(&*registry, store.0.as_mut()) {
        Ok(()) => {
            status.writes += 1;
            status.last_error = None;
        }
        Err(e) => {
            error!("Save: failed to persist parking registry: {}", e);
            notifications.send(LotNotification::error(format!(
                "Failed to save parking data: {e}"
            )));
            status.last_error = Some(e.to_string());
        }
    }
}
