//! Durable storage for saved queries.
//!
//! The whole collection lives in one JSON document that is read at startup
//! and rewritten after every mutation:
//!
//! ```json
//! {
//!     "queries": {
//!         "q1": {
//!             "expression": "\"city\" = 'Austin'"
//!         }
//!     }
//! }
//! ```
//!
//! # Save semantics
//!
//! Saving is a side effect, not a commit barrier. A mutation that succeeds in
//! memory but fails to save is kept in memory and reported as
//! [`Error::Persistence`], so the caller can warn that the change may not
//! survive a restart.
//!
//! # Example
//!
//! ```no_run
//! use layer_queries::expression::build;
//! use layer_queries::storage::QueryStore;
//! use std::path::Path;
//!
//! fn main() -> layer_queries::error::Result<()> {
//!     let mut store = QueryStore::open(Path::new("saved_queries.json"))?;
//!     store.upsert("austin", &build("city", "=", "Austin")?)?;
//!     for name in store.list_names() {
//!         println!("{name}");
//!     }
//!     Ok(())
//! }
//! ```

pub mod atomic;

use crate::domain::{Query, QueryCollection, UpsertOutcome};
use crate::error::{Error, PersistenceError, Result, ValidationError};
use serde::de::DeserializeOwned;
use std::io;
use std::path::{Path, PathBuf};

pub use atomic::write_json_atomic;

/// Read and deserialize a JSON document, or `None` if the file does not exist.
pub(crate) fn read_json_document<T: DeserializeOwned>(
    path: &Path,
) -> std::result::Result<Option<T>, PersistenceError> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(source) => {
            return Err(PersistenceError::Read {
                path: path.to_path_buf(),
                source,
            });
        }
    };

    serde_json::from_str(&content)
        .map(Some)
        .map_err(|source| PersistenceError::Malformed {
            path: path.to_path_buf(),
            source,
        })
}

/// Load the query collection stored at `path`.
///
/// A missing file is an empty collection, not an error.
///
/// # Errors
///
/// Returns [`PersistenceError`] if the file exists but cannot be read or is
/// not a valid query document.
pub fn load(path: &Path) -> std::result::Result<QueryCollection, PersistenceError> {
    match read_json_document::<QueryCollection>(path)? {
        Some(queries) => {
            tracing::debug!(path = %path.display(), count = queries.len(), "Loaded saved queries");
            Ok(queries)
        }
        None => {
            tracing::debug!(path = %path.display(), "No query file yet, starting empty");
            Ok(QueryCollection::new())
        }
    }
}

/// Atomically write the query collection to `path`.
///
/// # Errors
///
/// Returns [`PersistenceError`] on any serialization or I/O failure.
pub fn save(path: &Path, queries: &QueryCollection) -> std::result::Result<(), PersistenceError> {
    write_json_atomic(path, queries)?;
    tracing::debug!(path = %path.display(), count = queries.len(), "Saved queries");
    Ok(())
}

/// Query collection bound to the file it persists to.
#[derive(Debug, Clone)]
pub struct QueryStore {
    path: PathBuf,
    queries: QueryCollection,
}

impl QueryStore {
    /// Create an empty store for `path` without touching the filesystem.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            queries: QueryCollection::new(),
        }
    }

    /// Open the store at `path`, loading any saved queries.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Persistence`] if the file exists but cannot be loaded.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let queries = load(&path)?;
        Ok(Self { path, queries })
    }

    /// Open the store at `path`, falling back to an empty collection when the
    /// file cannot be loaded.
    ///
    /// The load error, if any, is returned alongside the store so the caller
    /// can report it. Startup never aborts because of a bad query file.
    pub fn open_or_empty(path: impl Into<PathBuf>) -> (Self, Option<Error>) {
        let path = path.into();
        match load(&path) {
            Ok(queries) => (Self { path, queries }, None),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to load saved queries, continuing with none");
                (Self::new(path), Some(e.into()))
            }
        }
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The in-memory collection
    pub fn queries(&self) -> &QueryCollection {
        &self.queries
    }

    /// Look up a query by name.
    pub fn get(&self, name: &str) -> Option<Query> {
        self.queries.get(name)
    }

    /// Query names in insertion order.
    pub fn list_names(&self) -> Vec<String> {
        self.queries.names().map(str::to_string).collect()
    }

    /// Insert or overwrite the query `name`, then save.
    ///
    /// # Errors
    ///
    /// - [`Error::Validation`] if `name` or `expression` is empty; nothing is
    ///   changed or written.
    /// - [`Error::Persistence`] if saving fails; the in-memory change is kept.
    pub fn upsert(&mut self, name: &str, expression: &str) -> Result<UpsertOutcome> {
        if name.is_empty() {
            return Err(ValidationError::EmptyName.into());
        }
        if expression.is_empty() {
            return Err(ValidationError::EmptyExpression.into());
        }

        let outcome = self.queries.insert(name, expression);
        tracing::info!(name, expression, ?outcome, "Stored query");
        self.save()?;
        Ok(outcome)
    }

    /// Replace the expression of an existing query, then save.
    ///
    /// Unlike [`upsert`](Self::upsert) this never creates a query. The
    /// expression is taken verbatim; it is not required to match the
    /// builder's grammar.
    ///
    /// # Errors
    ///
    /// - [`Error::Validation`] if `expression` is empty.
    /// - [`Error::QueryNotFound`] if `name` is not saved.
    /// - [`Error::Persistence`] if saving fails; the in-memory change is kept.
    pub fn update(&mut self, name: &str, expression: &str) -> Result<()> {
        if expression.is_empty() {
            return Err(ValidationError::EmptyExpression.into());
        }
        if !self.queries.contains(name) {
            return Err(Error::QueryNotFound(name.to_string()));
        }

        self.queries.insert(name, expression);
        tracing::info!(name, expression, "Updated query");
        self.save()
    }

    /// Remove the query `name`, then save.
    ///
    /// # Errors
    ///
    /// - [`Error::QueryNotFound`] if `name` is not saved; nothing is written.
    /// - [`Error::Persistence`] if saving fails; the removal is kept.
    pub fn delete(&mut self, name: &str) -> Result<Query> {
        let removed = self
            .queries
            .remove(name)
            .ok_or_else(|| Error::QueryNotFound(name.to_string()))?;
        tracing::info!(name, "Deleted query");
        self.save()?;
        Ok(removed)
    }

    /// Write the current collection to the backing file.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Persistence`] on any I/O failure.
    pub fn save(&self) -> Result<()> {
        save(&self.path, &self.queries)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store_in(dir: &TempDir) -> QueryStore {
        QueryStore::new(dir.path().join("saved_queries.json"))
    }

    #[test]
    fn load_missing_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let queries = load(&dir.path().join("nope.json")).unwrap();
        assert!(queries.is_empty());
    }

    #[test]
    fn load_malformed_file_is_persistence_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("saved_queries.json");
        std::fs::write(&path, "{ not json").unwrap();

        let err = load(&path).unwrap_err();
        assert!(matches!(err, PersistenceError::Malformed { .. }));
    }

    #[test]
    fn load_wrong_shape_is_persistence_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("saved_queries.json");
        std::fs::write(&path, r#"{"queries": {"q1": "no expression object"}}"#).unwrap();

        assert!(matches!(
            load(&path),
            Err(PersistenceError::Malformed { .. })
        ));
    }

    #[test]
    fn upsert_rejects_empty_name_without_writing() {
        let dir = TempDir::new().unwrap();
        let mut store = store_in(&dir);

        let err = store.upsert("", "\"a\" = 'b'").unwrap_err();
        assert!(matches!(err, Error::Validation(ValidationError::EmptyName)));
        assert!(!store.path().exists());
    }

    #[test]
    fn update_requires_existing_query() {
        let dir = TempDir::new().unwrap();
        let mut store = store_in(&dir);

        let err = store.update("q1", "\"a\" = 'b'").unwrap_err();
        assert!(matches!(err, Error::QueryNotFound(name) if name == "q1"));
        assert!(store.queries().is_empty());
        assert!(!store.path().exists());
    }

    #[test]
    fn update_accepts_free_form_expression() {
        let dir = TempDir::new().unwrap();
        let mut store = store_in(&dir);
        store.upsert("q1", "\"a\" = 'b'").unwrap();

        store.update("q1", "\"a\" IN ('b', 'c')").unwrap();

        assert_eq!(store.get("q1").unwrap().expression, "\"a\" IN ('b', 'c')");
        let reloaded = load(store.path()).unwrap();
        assert_eq!(reloaded.get("q1").unwrap().expression, "\"a\" IN ('b', 'c')");
    }

    #[test]
    fn update_rejects_empty_expression() {
        let dir = TempDir::new().unwrap();
        let mut store = store_in(&dir);
        store.upsert("q1", "\"a\" = 'b'").unwrap();

        let err = store.update("q1", "").unwrap_err();
        assert!(matches!(
            err,
            Error::Validation(ValidationError::EmptyExpression)
        ));
        assert_eq!(store.get("q1").unwrap().expression, "\"a\" = 'b'");
    }

    #[test]
    fn failed_save_keeps_in_memory_change() {
        let dir = TempDir::new().unwrap();
        let mut store = QueryStore::new(dir.path().join("missing").join("saved_queries.json"));

        let err = store.upsert("q1", "\"a\" = 'b'").unwrap_err();
        assert!(matches!(err, Error::Persistence(PersistenceError::Write { .. })));
        assert_eq!(store.list_names(), vec!["q1".to_string()]);
    }

    #[test]
    fn open_or_empty_degrades_on_malformed_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("saved_queries.json");
        std::fs::write(&path, "[1, 2").unwrap();

        let (store, err) = QueryStore::open_or_empty(&path);
        assert!(store.queries().is_empty());
        assert!(matches!(err, Some(Error::Persistence(_))));
        // The bad file is left alone until the next mutation.
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "[1, 2");
    }
}
