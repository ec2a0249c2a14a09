//! Typed collections over a [`KeyValueStore`].
//!
//! Queries never fail: a missing, unreadable, or malformed collection is
//! treated as empty. Mutations rewrite the whole collection, so they read
//! strictly and refuse to write over anything they could not parse.

use std::sync::Arc;

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::model::TestDefinition;
use crate::scoring::Submission;
use crate::store::{KeyValueStore, SUBMISSIONS_COLLECTION, TESTS_COLLECTION};

fn read_all<T: DeserializeOwned>(store: &dyn KeyValueStore, key: &str) -> Vec<T> {
    let raw = match store.read_collection(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return Vec::new(),
        Err(e) => {
            tracing::warn!("failed to read '{key}' from {} store, using empty: {e:#}", store.name());
            return Vec::new();
        }
    };
    match serde_json::from_str(&raw) {
        Ok(items) => items,
        Err(e) => {
            tracing::warn!("malformed '{key}' collection, using empty: {e}");
            Vec::new()
        }
    }
}

/// Read a collection that is about to be rewritten.
fn read_for_update<T: DeserializeOwned>(store: &dyn KeyValueStore, key: &str) -> Result<Vec<T>> {
    let raw = store
        .read_collection(key)
        .with_context(|| format!("failed to read '{key}' from {} store", store.name()))?;
    match raw {
        Some(raw) => serde_json::from_str(&raw)
            .with_context(|| format!("'{key}' collection is malformed, leaving it untouched")),
        None => Ok(Vec::new()),
    }
}

fn write_all<T: Serialize>(store: &dyn KeyValueStore, key: &str, items: &[T]) -> Result<()> {
    let json = serde_json::to_string(items)
        .with_context(|| format!("failed to serialize '{key}' collection"))?;
    store
        .write_collection(key, &json)
        .with_context(|| format!("failed to write '{key}' collection"))
}

/// The `tests` collection.
#[derive(Clone)]
pub struct TestCatalog {
    store: Arc<dyn KeyValueStore>,
}

impl TestCatalog {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    pub fn list(&self) -> Vec<TestDefinition> {
        read_all(self.store.as_ref(), TESTS_COLLECTION)
    }

    pub fn get(&self, id: &str) -> Option<TestDefinition> {
        self.list().into_iter().find(|t| t.id == id)
    }

    /// Append a test. Ids must be unique within the catalog.
    pub fn add(&self, test: TestDefinition) -> Result<()> {
        let mut tests: Vec<TestDefinition> = read_for_update(self.store.as_ref(), TESTS_COLLECTION)?;
        anyhow::ensure!(
            tests.iter().all(|t| t.id != test.id),
            "a test with id '{}' already exists",
            test.id
        );
        tracing::info!(test_id = %test.id, "adding test '{}'", test.name);
        tests.push(test);
        write_all(self.store.as_ref(), TESTS_COLLECTION, &tests)
    }

    /// Remove a test by id. Returns whether anything was removed.
    pub fn remove(&self, id: &str) -> Result<bool> {
        let mut tests: Vec<TestDefinition> = read_for_update(self.store.as_ref(), TESTS_COLLECTION)?;
        let before = tests.len();
        tests.retain(|t| t.id != id);
        if tests.len() == before {
            return Ok(false);
        }
        write_all(self.store.as_ref(), TESTS_COLLECTION, &tests)?;
        Ok(true)
    }

    /// Case-insensitive substring match over name and description.
    pub fn search(&self, query: &str) -> Vec<TestDefinition> {
        let needle = query.to_lowercase();
        self.list()
            .into_iter()
            .filter(|t| {
                t.name.to_lowercase().contains(&needle)
                    || t.description.to_lowercase().contains(&needle)
            })
            .collect()
    }
}

/// The append-only `submissions` collection.
#[derive(Clone)]
pub struct SubmissionArchive {
    store: Arc<dyn KeyValueStore>,
}

impl SubmissionArchive {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    pub fn list(&self) -> Vec<Submission> {
        read_all(self.store.as_ref(), SUBMISSIONS_COLLECTION)
    }

    pub fn append(&self, submission: &Submission) -> Result<()> {
        let mut submissions: Vec<Submission> =
            read_for_update(self.store.as_ref(), SUBMISSIONS_COLLECTION)?;
        submissions.push(submission.clone());
        write_all(self.store.as_ref(), SUBMISSIONS_COLLECTION, &submissions)
    }

    /// Every attempt at `test_id`, in archive order.
    pub fn for_test(&self, test_id: &str) -> Vec<Submission> {
        self.list()
            .into_iter()
            .filter(|s| s.test_id == test_id)
            .collect()
    }

    /// The most recent attempt at `test_id`.
    pub fn latest_for(&self, test_id: &str) -> Option<Submission> {
        self.for_test(test_id)
            .into_iter()
            .max_by_key(|s| s.submitted_at)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::answers::AnswerState;
    use crate::model::fixtures::{mcq, test_def};
    use crate::scoring::build_submission;
    use crate::store::MemoryStore;
    use chrono::{Duration, Utc};

    fn shared() -> (Arc<MemoryStore>, TestCatalog, SubmissionArchive) {
        let store = Arc::new(MemoryStore::new());
        let catalog = TestCatalog::new(store.clone());
        let archive = SubmissionArchive::new(store.clone());
        (store, catalog, archive)
    }

    #[test]
    fn empty_store_lists_nothing() {
        let (_, catalog, archive) = shared();
        assert!(catalog.list().is_empty());
        assert!(archive.list().is_empty());
    }

    #[test]
    fn malformed_collection_degrades_to_empty() {
        let store = Arc::new(MemoryStore::with_documents([
            (TESTS_COLLECTION, "{not json"),
            (SUBMISSIONS_COLLECTION, "42"),
        ]));
        assert!(TestCatalog::new(store.clone()).list().is_empty());
        assert!(SubmissionArchive::new(store).list().is_empty());
    }

    #[test]
    fn mutations_never_overwrite_unparsable_collections() {
        let test = test_def(vec![mcq("q1", 2, 0)], vec![]);
        let kept = build_submission(&test, AnswerState::unanswered(&test), 30, Utc::now());
        let kept_json = serde_json::to_string(&kept).unwrap();
        let submissions = format!(r#"[{kept_json}, {{"testId": "t1", "mcqScore": 0}}]"#);
        let store = Arc::new(MemoryStore::with_documents([
            (TESTS_COLLECTION, "{not json".to_string()),
            (SUBMISSIONS_COLLECTION, submissions.clone()),
        ]));
        let catalog = TestCatalog::new(store.clone());
        let archive = SubmissionArchive::new(store.clone());

        let fresh = build_submission(&test, AnswerState::unanswered(&test), 60, Utc::now());
        let err = archive.append(&fresh).unwrap_err();
        assert!(format!("{err:#}").contains("malformed"));
        assert!(catalog.add(test.clone()).is_err());
        assert!(catalog.remove("t1").is_err());

        assert_eq!(store.write_count(), 0);
        assert_eq!(
            store.read_collection(SUBMISSIONS_COLLECTION).unwrap(),
            Some(submissions)
        );
        assert_eq!(
            store.read_collection(TESTS_COLLECTION).unwrap().as_deref(),
            Some("{not json")
        );
    }

    #[test]
    fn add_get_remove() {
        let (store, catalog, _) = shared();
        catalog.add(test_def(vec![mcq("q1", 2, 0)], vec![])).unwrap();
        assert_eq!(catalog.get("t1").unwrap().name, "Backend Screening");
        assert!(catalog.add(test_def(vec![], vec![])).is_err());
        assert!(catalog.remove("t1").unwrap());
        assert!(!catalog.remove("t1").unwrap());
        assert!(catalog.get("t1").is_none());
        assert_eq!(store.write_count(), 2);
    }

    #[test]
    fn search_matches_name_and_description() {
        let (_, catalog, _) = shared();
        catalog.add(test_def(vec![], vec![])).unwrap();
        assert_eq!(catalog.search("backend").len(), 1);
        assert_eq!(catalog.search("FUNDAMENTALS").len(), 1);
        assert!(catalog.search("frontend").is_empty());
    }

    #[test]
    fn archive_is_append_only_with_latest_lookup() {
        let (_, _, archive) = shared();
        let test = test_def(vec![mcq("q1", 2, 0)], vec![]);
        let earlier = Utc::now() - Duration::minutes(5);
        let first = build_submission(&test, AnswerState::unanswered(&test), 30, earlier);
        let second = build_submission(&test, AnswerState::unanswered(&test), 60, Utc::now());
        archive.append(&second).unwrap();
        archive.append(&first).unwrap();

        assert_eq!(archive.list().len(), 2);
        assert_eq!(archive.for_test("t1").len(), 2);
        assert_eq!(archive.latest_for("t1").unwrap().time_spent_seconds, 60);
        assert!(archive.latest_for("other").is_none());
    }
}
