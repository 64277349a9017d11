//! Atomic file write using the write-rename pattern.
//!
//! Bytes go to `{path}.tmp`, are flushed with `sync_all()`, and the temp
//! file is renamed over the final path. A crash mid-write leaves the previous
//! blob intact and at worst a stale `.tmp` that `FileStore::open` removes.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Temp-file path used while `path` is being rewritten.
pub fn tmp_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".tmp");
    PathBuf::from(name)
}

/// Atomically writes `data` to `path`.
///
/// 1. Write to `{path}.tmp`
/// 2. `sync_all()` to flush to disk
/// 3. `rename` temp to final path (atomic on POSIX; near-atomic on Windows)
pub fn atomic_write(path: &Path, data: &[u8]) -> std::io::Result<()> {
    let tmp = tmp_path(path);

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let mut file = File::create(&tmp)?;
    file.write_all(data)?;
    file.sync_all()?;

    fs::rename(&tmp, path)?;

    Ok(())
}
