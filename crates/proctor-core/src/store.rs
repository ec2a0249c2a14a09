//! Key-value persistence seam.
//!
//! Collections are stored as whole JSON documents and are always read and
//! rewritten in full. Backends live in `proctor-store`; [`MemoryStore`]
//! is the in-process implementation used by tests and ephemeral sessions.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

use anyhow::Result;

/// Collection key for test definitions.
pub const TESTS_COLLECTION: &str = "tests";

/// Collection key for archived submissions.
pub const SUBMISSIONS_COLLECTION: &str = "submissions";

/// Trait for the persisted key-value medium.
pub trait KeyValueStore: Send + Sync {
    /// Human-readable backend name (e.g. "memory").
    fn name(&self) -> &str;

    /// Read a whole collection document, or `None` if it was never written.
    fn read_collection(&self, key: &str) -> Result<Option<String>>;

    /// Replace a whole collection document.
    fn write_collection(&self, key: &str, value: &str) -> Result<()>;
}

/// A store that keeps documents in memory.
#[derive(Default)]
pub struct MemoryStore {
    documents: Mutex<HashMap<String, String>>,
    /// Number of writes made.
    write_count: AtomicU32,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with raw documents.
    pub fn with_documents<I, K, V>(documents: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            documents: Mutex::new(
                documents
                    .into_iter()
                    .map(|(k, v)| (k.into(), v.into()))
                    .collect(),
            ),
            write_count: AtomicU32::new(0),
        }
    }

    /// Get the number of writes made to this store.
    pub fn write_count(&self) -> u32 {
        self.write_count.load(Ordering::Relaxed)
    }
}

impl KeyValueStore for MemoryStore {
    fn name(&self) -> &str {
        "memory"
    }

    fn read_collection(&self, key: &str) -> Result<Option<String>> {
        let documents = self
            .documents
            .lock()
            .map_err(|_| anyhow::anyhow!("memory store lock poisoned"))?;
        Ok(documents.get(key).cloned())
    }

    fn write_collection(&self, key: &str, value: &str) -> Result<()> {
        self.write_count.fetch_add(1, Ordering::Relaxed);
        let mut documents = self
            .documents
            .lock()
            .map_err(|_| anyhow::anyhow!("memory store lock poisoned"))?;
        documents.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_missing_is_none() {
        let store = MemoryStore::new();
        assert!(store.read_collection(TESTS_COLLECTION).unwrap().is_none());
    }

    #[test]
    fn write_then_read() {
        let store = MemoryStore::new();
        store.write_collection(SUBMISSIONS_COLLECTION, "[]").unwrap();
        assert_eq!(
            store.read_collection(SUBMISSIONS_COLLECTION).unwrap().as_deref(),
            Some("[]")
        );
        assert_eq!(store.write_count(), 1);
    }

    #[test]
    fn prepopulated_documents() {
        let store = MemoryStore::with_documents([(TESTS_COLLECTION, "not json")]);
        assert_eq!(
            store.read_collection(TESTS_COLLECTION).unwrap().as_deref(),
            Some("not json")
        );
        assert_eq!(store.write_count(), 0);
    }
}
