//! Persistence for the parking slot registry.
//!
//! The registry is stored as two text blobs in a key-value `BlobStore`:
//! a directory of checksummed files natively, `localStorage` in the browser.

#[cfg(not(target_arch = "wasm32"))]
mod atomic_write;
pub mod blob_store;
#[cfg(not(target_arch = "wasm32"))]
pub mod file_header;
#[cfg(not(target_arch = "wasm32"))]
pub mod file_store;
mod persistent_lot;
pub mod registry_persist;
mod save_error;
mod save_plugin;

#[cfg(target_arch = "wasm32")]
mod web_storage;

pub use blob_store::{BlobStore, MemoryStore};
#[cfg(not(target_arch = "wasm32"))]
pub use file_store::FileStore;
pub use persistent_lot::PersistentLot;
pub use registry_persist::{load_registry, persist_registry, restore_registry};
pub use save_error::SaveError;
pub use save_plugin::{LotStore, DEFAULT_DATA_DIR, PersistStatus, SavePlugin, StoreConfig};
#[cfg(target_arch = "wasm32")]
pub use web_storage::WebStorageStore;
