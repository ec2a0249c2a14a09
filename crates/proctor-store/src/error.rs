//! Store error types.
//!
//! These represent failures of the file-backed store. They cross the
//! `KeyValueStore` seam as `anyhow::Error` and can be downcast there.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur when reading or writing collections on disk.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Collection keys must be plain file stems.
    #[error("invalid collection key: {0:?}")]
    InvalidKey(String),

    /// The data directory could not be created or read.
    #[error("data directory unavailable: {}", .path.display())]
    DataDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Reading or writing a collection file failed.
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl StoreError {
    /// Returns `true` if retrying the same call cannot succeed.
    pub fn is_permanent(&self) -> bool {
        matches!(self, StoreError::InvalidKey(_))
    }
}
