//! File-backed key-value store.
//!
//! Each collection is one JSON document at `<data_dir>/<key>.json`. Writes
//! go to a temp file in the same directory and are renamed over the old
//! document, so readers never see a half-written collection.

use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use anyhow::Result;
use tempfile::NamedTempFile;

use proctor_core::store::KeyValueStore;

use crate::error::StoreError;

/// A store rooted at a data directory.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    root: PathBuf,
}

impl JsonFileStore {
    /// Open (and create if needed) the data directory at `root`.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let root = root.into();
        std::fs::create_dir_all(&root).map_err(|source| StoreError::DataDir {
            path: root.clone(),
            source,
        })?;
        tracing::debug!("opened data directory {}", root.display());
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, StoreError> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(StoreError::InvalidKey(key.to_string()));
        }
        Ok(self.root.join(format!("{key}.json")))
    }
}

impl KeyValueStore for JsonFileStore {
    fn name(&self) -> &str {
        "json-file"
    }

    fn read_collection(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key)?;
        match std::fs::read_to_string(&path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StoreError::Io { path, source }.into()),
        }
    }

    fn write_collection(&self, key: &str, value: &str) -> Result<()> {
        let path = self.path_for(key)?;
        let io_err = |source: std::io::Error| StoreError::Io {
            path: path.clone(),
            source,
        };

        let mut tmp = NamedTempFile::new_in(&self.root).map_err(io_err)?;
        tmp.write_all(value.as_bytes()).map_err(io_err)?;
        tmp.as_file().sync_all().map_err(io_err)?;
        tmp.persist(&path).map_err(|e| io_err(e.error))?;

        tracing::debug!(key, bytes = value.len(), "collection written");
        Ok(())
    }
}
