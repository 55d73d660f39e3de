//! # Favorites Store
//!
//! Whole-file JSON persistence of per-user favorite lists. Every operation
//! loads the full document and every mutation rewrites it completely.
//!
//! Lost-update protection: mutations hold a single per-store async mutex
//! across the load/mutate/persist cycle, so concurrent upserts cannot
//! interleave their reads and writes. The rewrite itself goes through a
//! temporary file followed by a rename, so readers never observe a partially
//! written document.
//!
//! A missing file is an empty store; a file that exists but does not parse is
//! a loud `FavoritesStorage` error, never a silent reset.

use crate::core::error::{GatewayError, GatewayResult};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;
use tracing::debug;

/// A favorite movie as stored per user
///
/// Only the identifier is interpreted; all other fields are carried through
/// untouched.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Movie {
    /// Unique identifier within one user's list (number or string)
    pub id: Value,

    /// Remaining movie fields, passed through as-is
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Movie {
    /// Canonical string form of the identifier, used for dedup and removal
    ///
    /// Numeric and string identifiers compare equal when their text form
    /// matches, so removing `"42"` also removes an entry stored with id `42`.
    pub fn id_text(&self) -> String {
        id_text(&self.id)
    }
}

fn id_text(id: &Value) -> String {
    match id {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// The persisted document: user identifier to favorite list
type FavoritesDoc = HashMap<String, Vec<Movie>>;

/// Persisted favorites store with serialized mutations
pub struct FavoritesStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FavoritesStore {
    /// Create a store backed by the JSON document at `path`
    ///
    /// The file is not created until the first mutation.
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            write_lock: Mutex::new(()),
        }
    }

    /// List a user's favorites; empty if the user or the file does not exist
    pub async fn list(&self, user_id: &str) -> GatewayResult<Vec<Movie>> {
        let doc = self.load().await?;
        Ok(doc.get(user_id).cloned().unwrap_or_default())
    }

    /// Merge `movie` into the user's list by identifier
    ///
    /// Replaces the existing entry in place when the id is already present
    /// (last write wins, untouched entries keep their order), appends
    /// otherwise.
    pub async fn upsert(&self, user_id: &str, movie: Movie) -> GatewayResult<()> {
        let _guard = self.write_lock.lock().await;

        let mut doc = self.load().await?;
        let list = doc.entry(user_id.to_string()).or_default();

        let incoming_id = movie.id_text();
        match list.iter_mut().find(|m| m.id_text() == incoming_id) {
            Some(existing) => *existing = movie,
            None => list.push(movie),
        }

        self.persist(&doc).await?;
        debug!(user_id, movie_id = %incoming_id, "favorite upserted");
        Ok(())
    }

    /// Remove all entries whose identifier matches `movie_id` from the
    /// user's list
    pub async fn remove(&self, user_id: &str, movie_id: &str) -> GatewayResult<()> {
        let _guard = self.write_lock.lock().await;

        let mut doc = self.load().await?;
        if let Some(list) = doc.get_mut(user_id) {
            list.retain(|m| m.id_text() != movie_id);
        }

        self.persist(&doc).await?;
        debug!(user_id, movie_id, "favorite removed");
        Ok(())
    }

    /// Load the full persisted document
    async fn load(&self) -> GatewayResult<FavoritesDoc> {
        let content = match tokio::fs::read(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(FavoritesDoc::new());
            }
            Err(e) => {
                return Err(GatewayError::storage(format!(
                    "failed to read {}: {}",
                    self.path.display(),
                    e
                )));
            }
        };

        serde_json::from_slice(&content).map_err(|e| {
            GatewayError::storage(format!(
                "{} is not a valid favorites document: {}",
                self.path.display(),
                e
            ))
        })
    }

    /// Rewrite the full persisted document atomically (temp file + rename)
    async fn persist(&self, doc: &FavoritesDoc) -> GatewayResult<()> {
        let content = serde_json::to_vec_pretty(doc)
            .map_err(|e| GatewayError::storage(format!("failed to serialize favorites: {}", e)))?;

        let tmp_path = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp_path, &content).await.map_err(|e| {
            GatewayError::storage(format!("failed to write {}: {}", tmp_path.display(), e))
        })?;

        tokio::fs::rename(&tmp_path, &self.path).await.map_err(|e| {
            GatewayError::storage(format!(
                "failed to replace {}: {}",
                self.path.display(),
                e
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::tempdir;

    fn movie(id: Value, title: &str) -> Movie {
        let mut extra = Map::new();
        extra.insert("title".to_string(), json!(title));
        Movie { id, extra }
    }

    #[tokio::test]
    async fn test_missing_file_is_empty_store() {
        let dir = tempdir().unwrap();
        let store = FavoritesStore::new(dir.path().join("favorites.json"));

        assert!(store.list("alice").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_upsert_appends_and_lists() {
        let dir = tempdir().unwrap();
        let store = FavoritesStore::new(dir.path().join("favorites.json"));

        store.upsert("alice", movie(json!(1), "Stalker")).await.unwrap();
        store.upsert("alice", movie(json!(42), "Solaris")).await.unwrap();

        let list = store.list("alice").await.unwrap();
        assert_eq!(list.len(), 2);
        assert_eq!(list[0].id_text(), "1");
        assert_eq!(list[1].id_text(), "42");
    }

    #[tokio::test]
    async fn test_upsert_dedups_last_write_wins() {
        let dir = tempdir().unwrap();
        let store = FavoritesStore::new(dir.path().join("favorites.json"));

        store.upsert("alice", movie(json!(42), "Solaris")).await.unwrap();
        store.upsert("alice", movie(json!(42), "Solaris (1972)")).await.unwrap();

        let list = store.list("alice").await.unwrap();
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].extra.get("title"), Some(&json!("Solaris (1972)")));
    }

    #[tokio::test]
    async fn test_upsert_replaces_in_place() {
        let dir = tempdir().unwrap();
        let store = FavoritesStore::new(dir.path().join("favorites.json"));

        for id in [1, 42, 7] {
            store.upsert("alice", movie(json!(id), "x")).await.unwrap();
        }
        store.upsert("alice", movie(json!(42), "updated")).await.unwrap();

        let ids: Vec<String> = store
            .list("alice")
            .await
            .unwrap()
            .iter()
            .map(Movie::id_text)
            .collect();
        assert_eq!(ids, ["1", "42", "7"]);
    }

    #[tokio::test]
    async fn test_remove_preserves_relative_order() {
        let dir = tempdir().unwrap();
        let store = FavoritesStore::new(dir.path().join("favorites.json"));

        for id in [1, 42, 7] {
            store.upsert("alice", movie(json!(id), "x")).await.unwrap();
        }
        store.remove("alice", "42").await.unwrap();

        let ids: Vec<String> = store
            .list("alice")
            .await
            .unwrap()
            .iter()
            .map(Movie::id_text)
            .collect();
        assert_eq!(ids, ["1", "7"]);
    }

    #[tokio::test]
    async fn test_remove_matches_string_and_numeric_ids() {
        let dir = tempdir().unwrap();
        let store = FavoritesStore::new(dir.path().join("favorites.json"));

        store.upsert("alice", movie(json!("42"), "string id")).await.unwrap();
        store.remove("alice", "42").await.unwrap();

        assert!(store.list("alice").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_users_are_isolated() {
        let dir = tempdir().unwrap();
        let store = FavoritesStore::new(dir.path().join("favorites.json"));

        store.upsert("alice", movie(json!(1), "a")).await.unwrap();
        store.upsert("bob", movie(json!(2), "b")).await.unwrap();
        store.remove("alice", "1").await.unwrap();

        assert!(store.list("alice").await.unwrap().is_empty());
        assert_eq!(store.list("bob").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_malformed_file_fails_loudly() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("favorites.json");
        std::fs::write(&path, b"{not json").unwrap();

        let store = FavoritesStore::new(&path);
        let err = store.list("alice").await.unwrap_err();
        assert!(matches!(err, GatewayError::FavoritesStorage { .. }));

        // The broken file must survive untouched
        assert_eq!(std::fs::read(&path).unwrap(), b"{not json");
    }
}
