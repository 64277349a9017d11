//! Browser `localStorage` backend for WASM builds.
//!
//! Keys are stored verbatim, so a lot saved by the standalone browser page is
//! picked up as-is. The storage handle is looked up per call; it is not
//! `Send`, and the store must live in a bevy resource.

use wasm_bindgen::{JsCast, JsValue};
use web_sys::{DomException, Storage};

use crate::blob_store::BlobStore;
use crate::save_error::SaveError;

#[derive(Debug, Clone, Copy, Default)]
pub struct WebStorageStore;

impl WebStorageStore {
    pub fn new() -> Self {
        Self
    }
}

/// Check whether a JsValue represents a QuotaExceededError.
fn is_quota_exceeded_error(err: &JsValue) -> bool {
    if let Ok(dom_exception) = err.clone().dyn_into::<DomException>() {
        return dom_exception.name() == "QuotaExceededError";
    }
    let s = format!("{:?}", err);
    s.contains("QuotaExceededError") || s.contains("quota")
}

fn local_storage() -> Result<Storage, SaveError> {
    web_sys::window()
        .ok_or_else(|| SaveError::Storage("no window".to_string()))?
        .local_storage()
        .map_err(|e| SaveError::Storage(format!("localStorage error: {:?}", e)))?
        .ok_or_else(|| SaveError::Storage("localStorage not available".to_string()))
}

impl BlobStore for WebStorageStore {
    fn get(&self, key: &str) -> Result<Option<String>, SaveError> {
        local_storage()?
            .get_item(key)
            .map_err(|e| SaveError::Storage(format!("failed to read {key}: {:?}", e)))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), SaveError> {
        local_storage()?.set_item(key, value).map_err(|e| {
            if is_quota_exceeded_error(&e) {
                SaveError::StorageFull
            } else {
                SaveError::Storage(format!("failed to write {key}: {:?}", e))
            }
        })
    }
}
