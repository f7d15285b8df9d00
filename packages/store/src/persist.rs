//! # Persisted state
//!
//! [`Persisted`] pairs a store state with its storage key. Reads go to the
//! in-memory state; [`Persisted::update`] applies a mutation and writes the
//! whole state back as JSON.
//!
//! The blob is wrapped in a small envelope, `{"state": ..., "version": 0}`, the
//! format device storage already holds for these stores.
//!
//! Store mutations never fail from the caller's point of view: when the write
//! after a mutation fails, the error is logged and the in-memory state stays
//! authoritative until the next successful write. Callers that need the
//! outcome use [`Persisted::flush`].

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{Result, StoreError};
use crate::storage::StateStorage;

/// Version written into every envelope.
pub const STATE_VERSION: u32 = 0;

#[derive(Serialize, Deserialize)]
struct Envelope<T> {
    state: T,
    #[serde(default)]
    version: u32,
}

pub struct Persisted<S, T> {
    storage: S,
    key: String,
    state: T,
}

impl<S: StateStorage, T: Serialize + DeserializeOwned + Default> Persisted<S, T> {
    /// Load the state stored under `key`, or the default state when the key
    /// has never been written.
    pub async fn load(storage: S, key: impl Into<String>) -> Result<Self> {
        let key = key.into();
        let state = match storage.get_item(&key).await? {
            Some(raw) => {
                let envelope: Envelope<T> =
                    serde_json::from_str(&raw).map_err(|source| StoreError::Json {
                        key: key.clone(),
                        source,
                    })?;
                debug!(key = %key, version = envelope.version, "loaded state");
                envelope.state
            }
            None => {
                debug!(key = %key, "no stored state, using default");
                T::default()
            }
        };
        Ok(Self {
            storage,
            key,
            state,
        })
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn state(&self) -> &T {
        &self.state
    }

    /// Apply a mutation, then persist the result.
    pub async fn update<R>(&mut self, f: impl FnOnce(&mut T) -> R) -> R {
        let out = f(&mut self.state);
        if let Err(e) = self.flush().await {
            warn!(key = %self.key, error = %e, "failed to persist state");
        }
        out
    }

    /// Write the current state to storage.
    pub async fn flush(&self) -> Result<()> {
        let envelope = Envelope {
            state: &self.state,
            version: STATE_VERSION,
        };
        let raw = serde_json::to_string(&envelope).map_err(|source| StoreError::Json {
            key: self.key.clone(),
            source,
        })?;
        self.storage.set_item(&self.key, raw).await?;
        debug!(key = %self.key, "persisted state");
        Ok(())
    }

    /// Forget the stored blob and reset to the default state.
    pub async fn clear(&mut self) -> Result<()> {
        self.storage.remove_item(&self.key).await?;
        self.state = T::default();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::file_store::FileStore;
    use crate::memory::MemoryStore;
    use crate::models::NewNote;
    use crate::stores::NotesState;

    fn new_note(title: &str) -> NewNote {
        NewNote {
            subject_id: "s1".to_string(),
            title: title.to_string(),
            content: String::new(),
        }
    }

    #[tokio::test]
    async fn test_missing_key_loads_default() {
        let persisted: Persisted<_, NotesState> =
            Persisted::load(MemoryStore::new(), "study-notes").await.unwrap();
        assert!(persisted.state().notes().is_empty());
        assert_eq!(persisted.key(), "study-notes");
    }

    #[tokio::test]
    async fn test_update_persists_and_reloads() {
        let storage = MemoryStore::new();
        let mut persisted: Persisted<_, NotesState> =
            Persisted::load(storage.clone(), "study-notes").await.unwrap();

        let id = persisted.update(|s| s.add_note(new_note("Vectors"))).await;

        let raw = storage.get_item("study-notes").await.unwrap().unwrap();
        let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(json["version"], 0);
        assert_eq!(json["state"]["notes"][0]["title"], "Vectors");

        let reloaded: Persisted<_, NotesState> =
            Persisted::load(storage, "study-notes").await.unwrap();
        assert_eq!(reloaded.state().notes().get(&id).unwrap().title, "Vectors");
    }

    #[tokio::test]
    async fn test_malformed_blob_is_an_error() {
        let storage = MemoryStore::new();
        storage
            .set_item("study-notes", "not json".to_string())
            .await
            .unwrap();

        let result: Result<Persisted<_, NotesState>> =
            Persisted::load(storage, "study-notes").await;
        assert!(matches!(result, Err(StoreError::Json { key, .. }) if key == "study-notes"));
    }

    #[tokio::test]
    async fn test_clear_resets_state_and_storage() {
        let storage = MemoryStore::new();
        let mut persisted: Persisted<_, NotesState> =
            Persisted::load(storage.clone(), "study-notes").await.unwrap();
        persisted.update(|s| s.add_note(new_note("x"))).await;

        persisted.clear().await.unwrap();
        assert!(persisted.state().notes().is_empty());
        assert!(storage.keys().is_empty());
    }

    #[tokio::test]
    async fn test_failed_write_keeps_in_memory_state() {
        let dir = tempfile::tempdir().unwrap();
        let base = dir.path().join("blocked");
        let mut persisted: Persisted<_, NotesState> =
            Persisted::load(FileStore::new(base.clone()), "study-notes")
                .await
                .unwrap();

        // The base "directory" is now a regular file, so every write fails
        std::fs::write(&base, "").unwrap();
        persisted.update(|s| s.add_note(new_note("kept"))).await;

        assert_eq!(persisted.state().notes().len(), 1);
        assert!(persisted.flush().await.is_err());
    }
}
