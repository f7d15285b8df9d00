use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::error::Result;
use crate::storage::StateStorage;

/// In-memory StateStorage for tests and throwaway sessions.
///
/// Clones share the same map, so several persisted stores can sit on one
/// backend the way they share device storage.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    items: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stored keys, sorted.
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.lock().keys().cloned().collect();
        keys.sort();
        keys
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, String>> {
        self.items.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl StateStorage for MemoryStore {
    async fn get_item(&self, key: &str) -> Result<Option<String>> {
        Ok(self.lock().get(key).cloned())
    }

    async fn set_item(&self, key: &str, value: String) -> Result<()> {
        self.lock().insert(key.to_string(), value);
        Ok(())
    }

    async fn remove_item(&self, key: &str) -> Result<()> {
        self.lock().remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_set_get_remove() {
        let store = MemoryStore::new();
        assert!(store.get_item("k").await.unwrap().is_none());

        store.set_item("k", "v1".to_string()).await.unwrap();
        store.set_item("k", "v2".to_string()).await.unwrap();
        assert_eq!(store.get_item("k").await.unwrap().as_deref(), Some("v2"));

        store.remove_item("k").await.unwrap();
        assert!(store.get_item("k").await.unwrap().is_none());
        // Removing twice is fine
        store.remove_item("k").await.unwrap();
    }

    #[tokio::test]
    async fn test_clones_share_items() {
        let store = MemoryStore::new();
        let other = store.clone();
        store.set_item("b", "1".to_string()).await.unwrap();
        other.set_item("a", "2".to_string()).await.unwrap();

        assert_eq!(store.keys(), ["a", "b"]);
        assert_eq!(other.get_item("b").await.unwrap().as_deref(), Some("1"));
    }
}
