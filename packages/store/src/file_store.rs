//! # Filesystem-backed state storage
//!
//! [`FileStore`] is a [`StateStorage`] implementation that keeps each persisted
//! store as one JSON file. It is what the command-line front end uses to retain
//! subjects, notes and the rest across runs.
//!
//! ## Layout
//!
//! ```text
//! <base_dir>/
//! ├── companion.toml       # optional, see crate::config
//! ├── study-subjects.json
//! ├── study-items.json
//! ├── study-notes.json
//! ├── study-docs.json
//! ├── study-events.json
//! └── study-browser.json
//! ```
//!
//! ## Platform data directories
//!
//! Use [`dirs::data_dir()`] to obtain a platform-appropriate base:
//!
//! | Platform | Path |
//! |----------|------|
//! | macOS | `~/Library/Application Support/studymate/` |
//! | Linux | `~/.local/share/studymate/` |
//! | Windows | `C:\Users\<user>\AppData\Roaming\studymate\` |
//!
//! [`dirs::data_dir()`]: https://docs.rs/dirs/latest/dirs/fn.data_dir.html

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::error::{Result, StoreError};
use crate::storage::StateStorage;

/// Filesystem-backed StateStorage, one `<key>.json` file per key.
#[derive(Clone, Debug)]
pub struct FileStore {
    base: PathBuf,
}

impl FileStore {
    pub fn new(base: PathBuf) -> Self {
        Self { base }
    }

    pub fn base(&self) -> &Path {
        &self.base
    }

    /// Keys become file names; anything outside `[A-Za-z0-9_-]` is replaced
    /// so a key can never escape the base directory.
    fn item_path(&self, key: &str) -> PathBuf {
        let name: String = key
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        self.base.join(format!("{name}.json"))
    }
}

impl StateStorage for FileStore {
    async fn get_item(&self, key: &str) -> Result<Option<String>> {
        let path = self.item_path(key);
        match std::fs::read_to_string(&path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StoreError::io(path, e)),
        }
    }

    async fn set_item(&self, key: &str, value: String) -> Result<()> {
        std::fs::create_dir_all(&self.base).map_err(|e| StoreError::io(&self.base, e))?;
        let path = self.item_path(key);
        // Blobs are replaced atomically
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, value).map_err(|e| StoreError::io(&tmp, e))?;
        std::fs::rename(&tmp, &path).map_err(|e| StoreError::io(&path, e))
    }

    async fn remove_item(&self, key: &str) -> Result<()> {
        let path = self.item_path(key);
        match std::fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StoreError::io(path, e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_file_store_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("nested"));

        assert!(store.get_item("study-notes").await.unwrap().is_none());
        store
            .set_item("study-notes", r#"{"state":{}}"#.to_string())
            .await
            .unwrap();
        assert!(dir.path().join("nested/study-notes.json").exists());

        // Re-open from same directory
        let store2 = FileStore::new(dir.path().join("nested"));
        assert_eq!(
            store2.get_item("study-notes").await.unwrap().as_deref(),
            Some(r#"{"state":{}}"#)
        );

        store2.remove_item("study-notes").await.unwrap();
        assert!(store.get_item("study-notes").await.unwrap().is_none());
        store2.remove_item("study-notes").await.unwrap();
    }

    #[tokio::test]
    async fn test_keys_cannot_escape_base() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().to_path_buf());
        store.set_item("../evil", "x".to_string()).await.unwrap();
        assert!(dir.path().join("___evil.json").exists());
    }

    #[tokio::test]
    async fn test_unreadable_path_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().to_path_buf());
        // A directory where the blob should be
        std::fs::create_dir(dir.path().join("k.json")).unwrap();
        let err = store.get_item("k").await.unwrap_err();
        assert!(matches!(err, StoreError::Io { .. }));
    }
}
