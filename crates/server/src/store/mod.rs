//! Flat-file JSON document store.
//!
//! Emulates a tiny document database: one pretty-printed JSON
//! array-of-documents file per named collection under a data directory
//! (`<data_dir>/<name>.json`). Collections support conjunctive-equality
//! queries, shallow-merge updates, and predicate deletes.
//!
//! # Durability model
//!
//! Every mutation reads the whole collection, applies the change in memory,
//! and rewrites the file through a temp-file-then-rename so a crash leaves
//! either the old or the new file, never a torn one. Mutations on one
//! collection are linearized by a per-collection async mutex; writers in
//! *other processes* are not coordinated and can lose updates (last write
//! wins). Missing or unparseable files degrade to an empty collection.

mod collection;

pub use collection::Collection;

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use thiserror::Error;

/// A stored document: a JSON object keyed by field name.
pub type Document = serde_json::Map<String, serde_json::Value>;

/// Errors surfaced by store mutations.
///
/// Reads never fail: absent or corrupt collection files degrade to an empty
/// snapshot, trading strict durability for availability.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Writing the collection file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The collection could not be serialized to JSON.
    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    /// A unique-key insert collided with an existing document.
    #[error("duplicate value for unique key `{key}`")]
    Duplicate {
        /// The field the uniqueness constraint applies to.
        key: String,
    },
}

/// Handle to the data directory, handing out named [`Collection`]s.
///
/// Cheaply cloneable; collection handles are cached so that every clone
/// shares the same per-collection mutation lock.
#[derive(Clone)]
pub struct Database {
    inner: Arc<DatabaseInner>,
}

struct DatabaseInner {
    data_dir: PathBuf,
    collections: Mutex<HashMap<String, Collection>>,
}

impl Database {
    /// Open a database rooted at `data_dir`, creating the directory if needed.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] if the directory cannot be created.
    pub fn open(data_dir: &Path) -> Result<Self, StoreError> {
        std::fs::create_dir_all(data_dir)?;
        Ok(Self {
            inner: Arc::new(DatabaseInner {
                data_dir: data_dir.to_path_buf(),
                collections: Mutex::new(HashMap::new()),
            }),
        })
    }

    /// Get a handle to the named collection.
    pub fn collection(&self, name: &str) -> Collection {
        let mut collections = self
            .inner
            .collections
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        collections
            .entry(name.to_owned())
            .or_insert_with(|| Collection::new(&self.inner.data_dir, name))
            .clone()
    }

    /// The directory backing this database.
    #[must_use]
    pub fn data_dir(&self) -> &Path {
        &self.inner.data_dir
    }
}

/// Build a [`Document`] literal.
///
/// Values are converted through `serde_json::Value::from`, so string slices,
/// owned strings, numbers, booleans, and `Value`s all work.
// Defined under a non-`doc` name and re-exported as `doc`: a plain
// `pub(crate) use doc;` is ambiguous with the builtin `#[doc]` attribute.
macro_rules! doc_impl {
    () => { $crate::store::Document::new() };
    ($($key:literal : $value:expr),+ $(,)?) => {{
        let mut map = $crate::store::Document::new();
        $( map.insert(($key).to_owned(), ::serde_json::Value::from($value)); )+
        map
    }};
}

pub(crate) use doc_impl as doc;
