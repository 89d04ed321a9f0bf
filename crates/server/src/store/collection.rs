//! A single named collection backed by one JSON file.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use asti_core::DocumentId;
use serde_json::Value;
use tokio::sync::Mutex;

use super::{Document, StoreError};

/// Handle to one named collection.
///
/// Clones share the same mutation lock, so `insert`/`update`/`remove` on a
/// collection are linearized no matter how many handles exist. Operations on
/// different collections need no ordering between them.
#[derive(Clone)]
pub struct Collection {
    name: Arc<str>,
    path: Arc<PathBuf>,
    lock: Arc<Mutex<()>>,
}

impl Collection {
    pub(super) fn new(data_dir: &Path, name: &str) -> Self {
        Self {
            name: Arc::from(name),
            path: Arc::new(data_dir.join(format!("{name}.json"))),
            lock: Arc::new(Mutex::new(())),
        }
    }

    /// The collection name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Full snapshot of the collection in insertion order.
    pub async fn all(&self) -> Vec<Document> {
        let _guard = self.lock.lock().await;
        self.read_all().await
    }

    /// All documents where every predicate key equals the document's value.
    ///
    /// Conjunctive equality only; a document missing a predicate key does not
    /// match.
    pub async fn find(&self, predicate: &Document) -> Vec<Document> {
        let _guard = self.lock.lock().await;
        self.read_all()
            .await
            .into_iter()
            .filter(|doc| matches(doc, predicate))
            .collect()
    }

    /// First matching document in stored order, if any.
    pub async fn find_one(&self, predicate: &Document) -> Option<Document> {
        let _guard = self.lock.lock().await;
        self.read_all()
            .await
            .into_iter()
            .find(|doc| matches(doc, predicate))
    }

    /// Insert a document, assigning it a fresh `_id`.
    ///
    /// Returns the stored document including its identifier.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] or [`StoreError::Serialize`] if the rewrite
    /// fails.
    pub async fn insert(&self, doc: Document) -> Result<Document, StoreError> {
        let _guard = self.lock.lock().await;
        self.insert_locked(doc).await
    }

    /// Insert a document, rejecting it if another document already holds the
    /// same value for `key`.
    ///
    /// The existence check and the insert run under the collection lock, so
    /// the uniqueness guarantee holds within this process.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Duplicate`] on a collision, or the underlying
    /// write error.
    pub async fn insert_unique(&self, key: &str, doc: Document) -> Result<Document, StoreError> {
        let _guard = self.lock.lock().await;
        if let Some(value) = doc.get(key) {
            let taken = self
                .read_all()
                .await
                .iter()
                .any(|existing| existing.get(key) == Some(value));
            if taken {
                return Err(StoreError::Duplicate {
                    key: key.to_owned(),
                });
            }
        }
        self.insert_locked(doc).await
    }

    /// Shallow-merge `assignments` into every matching document.
    ///
    /// The file is rewritten only if at least one document changed. Returns
    /// the number of documents updated.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] or [`StoreError::Serialize`] if the rewrite
    /// fails.
    pub async fn update(
        &self,
        predicate: &Document,
        assignments: Document,
    ) -> Result<usize, StoreError> {
        let _guard = self.lock.lock().await;
        let mut docs = self.read_all().await;
        let mut updated = 0;
        for doc in &mut docs {
            if matches(doc, predicate) {
                for (key, value) in &assignments {
                    doc.insert(key.clone(), value.clone());
                }
                updated += 1;
            }
        }
        if updated > 0 {
            self.write_all(&docs).await?;
        }
        Ok(updated)
    }

    /// Delete every matching document. Returns the number removed.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] or [`StoreError::Serialize`] if the rewrite
    /// fails.
    pub async fn remove(&self, predicate: &Document) -> Result<usize, StoreError> {
        let _guard = self.lock.lock().await;
        let docs = self.read_all().await;
        let before = docs.len();
        let remaining: Vec<Document> = docs
            .into_iter()
            .filter(|doc| !matches(doc, predicate))
            .collect();
        let removed = before - remaining.len();
        if removed > 0 {
            self.write_all(&remaining).await?;
        }
        Ok(removed)
    }

    async fn insert_locked(&self, mut doc: Document) -> Result<Document, StoreError> {
        let mut docs = self.read_all().await;
        doc.insert(
            "_id".to_owned(),
            Value::String(DocumentId::generate().into()),
        );
        docs.push(doc.clone());
        self.write_all(&docs).await?;
        Ok(doc)
    }

    /// Read the backing file, degrading to an empty collection on any
    /// missing, unreadable, or unparseable input.
    async fn read_all(&self) -> Vec<Document> {
        let bytes = match tokio::fs::read(self.path.as_ref()).await {
            Ok(bytes) => bytes,
            Err(err) => {
                if err.kind() != std::io::ErrorKind::NotFound {
                    tracing::warn!(collection = %self.name, error = %err, "unreadable collection file, treating as empty");
                }
                return Vec::new();
            }
        };
        match serde_json::from_slice(&bytes) {
            Ok(docs) => docs,
            Err(err) => {
                tracing::warn!(collection = %self.name, error = %err, "corrupt collection file, treating as empty");
                Vec::new()
            }
        }
    }

    /// Rewrite the whole collection via temp file + atomic rename.
    async fn write_all(&self, docs: &[Document]) -> Result<(), StoreError> {
        let bytes = serde_json::to_vec_pretty(docs)?;
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, &bytes).await?;
        tokio::fs::rename(&tmp, self.path.as_ref()).await?;
        Ok(())
    }
}

/// Every key in `predicate` must equal the document's value for that key.
fn matches(doc: &Document, predicate: &Document) -> bool {
    predicate
        .iter()
        .all(|(key, value)| doc.get(key) == Some(value))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::super::{Database, doc};
    use super::*;

    struct TempDir(PathBuf);

    impl TempDir {
        fn new() -> Self {
            let path = std::env::temp_dir().join(format!("asti-store-{}", DocumentId::generate()));
            Self(path)
        }
    }

    impl Drop for TempDir {
        fn drop(&mut self) {
            let _ = std::fs::remove_dir_all(&self.0);
        }
    }

    fn open_db(dir: &TempDir) -> Database {
        Database::open(&dir.0).unwrap()
    }

    #[tokio::test]
    async fn test_insert_assigns_unique_ids() {
        let dir = TempDir::new();
        let col = open_db(&dir).collection("things");

        let a = col.insert(doc! { "n": 1 }).await.unwrap();
        let b = col.insert(doc! { "n": 2 }).await.unwrap();

        let id_a = a.get("_id").unwrap().as_str().unwrap();
        let id_b = b.get("_id").unwrap().as_str().unwrap();
        assert_ne!(id_a, id_b);

        let all = col.all().await;
        assert_eq!(all.len(), 2);
        assert_eq!(all.first().unwrap().get("n"), Some(&Value::from(1)));
    }

    #[tokio::test]
    async fn test_find_is_conjunctive_equality() {
        let dir = TempDir::new();
        let col = open_db(&dir).collection("things");
        col.insert(doc! { "kind": "a", "size": 1 }).await.unwrap();
        col.insert(doc! { "kind": "a", "size": 2 }).await.unwrap();
        col.insert(doc! { "kind": "b", "size": 1 }).await.unwrap();

        assert_eq!(col.find(&doc! { "kind": "a" }).await.len(), 2);
        assert_eq!(col.find(&doc! { "kind": "a", "size": 1 }).await.len(), 1);
        assert_eq!(col.find(&doc! { "kind": "c" }).await.len(), 0);
        // Missing predicate key never matches
        assert_eq!(col.find(&doc! { "missing": Value::Null }).await.len(), 0);
    }

    #[tokio::test]
    async fn test_find_one_returns_first_in_stored_order() {
        let dir = TempDir::new();
        let col = open_db(&dir).collection("things");
        col.insert(doc! { "kind": "a", "pos": "first" }).await.unwrap();
        col.insert(doc! { "kind": "a", "pos": "second" }).await.unwrap();

        let found = col.find_one(&doc! { "kind": "a" }).await.unwrap();
        assert_eq!(found.get("pos"), Some(&Value::from("first")));
        assert!(col.find_one(&doc! { "kind": "z" }).await.is_none());
    }

    #[tokio::test]
    async fn test_update_shallow_merges_and_counts() {
        let dir = TempDir::new();
        let col = open_db(&dir).collection("things");
        col.insert(doc! { "kind": "a", "state": "old" }).await.unwrap();
        col.insert(doc! { "kind": "a", "state": "old" }).await.unwrap();
        col.insert(doc! { "kind": "b", "state": "old" }).await.unwrap();

        let n = col
            .update(&doc! { "kind": "a" }, doc! { "state": "new", "extra": true })
            .await
            .unwrap();
        assert_eq!(n, 2);

        let updated = col.find(&doc! { "state": "new" }).await;
        assert_eq!(updated.len(), 2);
        assert!(updated.iter().all(|d| d.get("extra") == Some(&Value::Bool(true))));

        // No match: nothing changes, count is zero
        let n = col
            .update(&doc! { "kind": "z" }, doc! { "state": "never" })
            .await
            .unwrap();
        assert_eq!(n, 0);
    }

    #[tokio::test]
    async fn test_remove_deletes_all_matches() {
        let dir = TempDir::new();
        let col = open_db(&dir).collection("things");
        col.insert(doc! { "kind": "a" }).await.unwrap();
        col.insert(doc! { "kind": "a" }).await.unwrap();
        col.insert(doc! { "kind": "b" }).await.unwrap();

        assert_eq!(col.remove(&doc! { "kind": "a" }).await.unwrap(), 2);
        assert_eq!(col.remove(&doc! { "kind": "a" }).await.unwrap(), 0);

        let rest = col.all().await;
        assert_eq!(rest.len(), 1);
        assert_eq!(rest.first().unwrap().get("kind"), Some(&Value::from("b")));
    }

    #[tokio::test]
    async fn test_insert_unique_rejects_duplicates() {
        let dir = TempDir::new();
        let col = open_db(&dir).collection("users");
        col.insert_unique("email", doc! { "email": "a@x.com" })
            .await
            .unwrap();

        let err = col
            .insert_unique("email", doc! { "email": "a@x.com" })
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Duplicate { ref key } if key == "email"));

        assert_eq!(col.all().await.len(), 1);
    }

    #[tokio::test]
    async fn test_corrupt_file_degrades_to_empty() {
        let dir = TempDir::new();
        let db = open_db(&dir);
        let col = db.collection("broken");
        col.insert(doc! { "n": 1 }).await.unwrap();

        std::fs::write(db.data_dir().join("broken.json"), b"{not json!").unwrap();
        assert!(col.all().await.is_empty());

        // The store recovers by starting over from the empty state
        col.insert(doc! { "n": 2 }).await.unwrap();
        assert_eq!(col.all().await.len(), 1);
    }

    #[tokio::test]
    async fn test_missing_file_is_empty() {
        let dir = TempDir::new();
        let col = open_db(&dir).collection("nothing");
        assert!(col.all().await.is_empty());
        assert!(col.find(&doc! { "a": 1 }).await.is_empty());
    }

    #[tokio::test]
    async fn test_persists_across_handles() {
        let dir = TempDir::new();
        {
            let col = open_db(&dir).collection("things");
            col.insert(doc! { "n": 1 }).await.unwrap();
        }
        let col = open_db(&dir).collection("things");
        assert_eq!(col.all().await.len(), 1);
    }

    #[tokio::test]
    async fn test_serialized_inserts_lose_nothing() {
        let dir = TempDir::new();
        let db = open_db(&dir);
        let mut handles = Vec::new();
        for n in 0..20 {
            let col = db.collection("things");
            handles.push(tokio::spawn(async move {
                col.insert(doc! { "n": n }).await.unwrap();
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        let all = db.collection("things").all().await;
        assert_eq!(all.len(), 20);
        let mut ids: Vec<&str> = all
            .iter()
            .map(|d| d.get("_id").unwrap().as_str().unwrap())
            .collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), 20);
    }
}
