//! The key-value contract the registry is persisted through, plus the
//! in-memory implementation.

use std::collections::BTreeMap;

use crate::save_error::SaveError;

/// A flat store of text blobs addressed by key.
///
/// `get` returns `Ok(None)` for a key that was never written; any other
/// failure to produce the stored text is an error.
pub trait BlobStore {
    fn get(&self, key: &str) -> Result<Option<String>, SaveError>;

    fn set(&mut self, key: &str, value: &str) -> Result<(), SaveError>;
}

impl<S: BlobStore + ?Sized> BlobStore for Box<S> {
    fn get(&self, key: &str) -> Result<Option<String>, SaveError> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), SaveError> {
        (**self).set(key, value)
    }
}

/// Ordered in-memory store. Used in tests and as the fallback when no
/// durable backend can be opened.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryStore {
    entries: BTreeMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl BlobStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, SaveError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), SaveError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}
