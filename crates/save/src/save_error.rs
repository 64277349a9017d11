// ---------------------------------------------------------------------------
// SaveError: typed failures for blob store reads and writes
// ---------------------------------------------------------------------------

use std::fmt;

/// Errors that can occur while reading or writing registry blobs.
#[derive(Debug)]
pub enum SaveError {
    /// I/O error (permission denied, disk full, etc.)
    Io(std::io::Error),
    /// The registry could not be turned into text.
    Encode(String),
    /// A stored blob is corrupt, truncated, or not a valid registry.
    Decode(String),
    /// The browser storage backend refused the operation.
    Storage(String),
    /// The browser storage quota is exhausted.
    StorageFull,
}

impl fmt::Display for SaveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SaveError::Io(e) => write!(f, "I/O error: {e}"),
            SaveError::Encode(msg) => write!(f, "Encoding error: {msg}"),
            SaveError::Decode(msg) => write!(f, "Decoding error: {msg}"),
            SaveError::Storage(msg) => write!(f, "Storage error: {msg}"),
            SaveError::StorageFull => write!(
                f,
                "Save failed: storage full. Try clearing old site data in the browser."
            ),
        }
    }
}

impl std::error::Error for SaveError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SaveError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for SaveError {
    fn from(e: std::io::Error) -> Self {
        SaveError::Io(e)
    }
}
