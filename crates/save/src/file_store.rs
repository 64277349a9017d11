//! Directory-backed blob store for native builds.
//!
//! Each key lives in `<dir>/<key>.blob`, written atomically with a checksummed
//! header. Opening the store removes `.tmp` files left behind by writes that
//! were interrupted by a crash.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use bevy::prelude::*;

use crate::atomic_write::atomic_write;
use crate::blob_store::BlobStore;
use crate::file_header::{unwrap_header, wrap_with_header, UnwrapResult};
use crate::save_error::SaveError;

const BLOB_EXTENSION: &str = "blob";

#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
    tmp_files_cleaned: usize,
}

impl FileStore {
    /// Open (creating if needed) the store directory and clean up crash
    /// artifacts.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, SaveError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        let tmp_files_cleaned = clean_tmp_files(&find_tmp_files(&dir)?);
        Ok(Self {
            dir,
            tmp_files_cleaned,
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Number of stale `.tmp` files removed by `open`.
    pub fn tmp_files_cleaned(&self) -> usize {
        self.tmp_files_cleaned
    }

    fn blob_path(&self, key: &str) -> Result<PathBuf, SaveError> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(SaveError::Storage(format!(
                "key {key:?} is not usable as a file name"
            )));
        }
        Ok(self.dir.join(format!("{key}.{BLOB_EXTENSION}")))
    }
}

impl BlobStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, SaveError> {
        let path = self.blob_path(key)?;
        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let payload = match unwrap_header(&bytes)
            .map_err(|e| SaveError::Decode(format!("{}: {e}", path.display())))?
        {
            UnwrapResult::WithHeader { payload, .. } => payload,
            UnwrapResult::Raw(payload) => {
                debug!("Blob {} has no header, reading as raw text", path.display());
                payload
            }
        };

        String::from_utf8(payload.to_vec())
            .map(Some)
            .map_err(|e| SaveError::Decode(format!("{}: not utf-8: {e}", path.display())))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), SaveError> {
        let path = self.blob_path(key)?;
        atomic_write(&path, &wrap_with_header(value.as_bytes()))?;
        Ok(())
    }
}

/// `.tmp` files directly inside `dir`.
fn find_tmp_files(dir: &Path) -> Result<Vec<PathBuf>, SaveError> {
    let mut tmp_files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.extension().is_some_and(|ext| ext == "tmp") {
            tmp_files.push(path);
        }
    }
    Ok(tmp_files)
}

/// Removes all `.tmp` files from the list, logging each removal.
///
/// Returns the number of files successfully removed.
fn clean_tmp_files(tmp_files: &[PathBuf]) -> usize {
    let mut cleaned = 0;
    for path in tmp_files {
        match fs::remove_file(path) {
            Ok(()) => {
                info!("Blob store: cleaned up tmp file: {}", path.display());
                cleaned += 1;
            }
            Err(e) => {
                warn!(
                    "Blob store: failed to remove tmp file {}: {}",
                    path.display(),
                    e
                );
            }
        }
    }
    cleaned
}
