//! JSON file storage implementation.
//!
//! Stores all keys in a single `store.json` object inside the storage root
//! and keeps a small meta marker (version + updated_at) next to it. Writes
//! are held in memory until `commit`, which rewrites the file atomically.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use super::{Result, Storage};
use tokio::fs;
use tracing::debug;

const STORE_FILE: &str = "store.json";

/// File-based JSON storage backend.
pub struct JsonStorage {
    root: PathBuf,
    entries: BTreeMap<String, String>,
    pending: bool,
}

impl JsonStorage {
    /// Open storage rooted at `root`, creating the directory layout if
    /// needed and loading any previously committed entries.
    pub async fn new(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref().to_path_buf();

        fs::create_dir_all(&root).await?;
        fs::create_dir_all(root.join("meta")).await?;

        let entries = read_json(&root.join(STORE_FILE)).await?.unwrap_or_default();

        Ok(Self {
            root,
            entries,
            pending: false,
        })
    }

    /// Storage root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Whether there are uncommitted writes.
    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// Version recorded by the last commit (0 if never committed).
    pub async fn version(&self) -> Result<u64> {
        let meta: Option<serde_json::Value> = read_json(&self.meta_path()).await?;
        Ok(meta
            .and_then(|m| m.get("version").and_then(|v| v.as_u64()))
            .unwrap_or(0))
    }

    fn store_path(&self) -> PathBuf {
        self.root.join(STORE_FILE)
    }

    fn meta_path(&self) -> PathBuf {
        self.root.join("meta").join("store.meta.json")
    }

    /// Read and increment the store version, return the new version.
    async fn bump_version(&self) -> Result<u64> {
        let version = self.version().await.unwrap_or(0) + 1;
        let meta = serde_json::json!({"version": version, "updated_at": chrono::Utc::now()});
        fs::write(self.meta_path(), serde_json::to_string_pretty(&meta)?.as_bytes()).await?;
        Ok(version)
    }
}

#[async_trait::async_trait]
impl Storage for JsonStorage {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    async fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let previous = self.entries.insert(key.to_string(), value.to_string());
        if previous.as_deref() != Some(value) {
            self.pending = true;
        }
        Ok(())
    }

    async fn remove(&mut self, key: &str) -> Result<()> {
        if self.entries.remove(key).is_some() {
            self.pending = true;
        }
        Ok(())
    }

    async fn keys(&self) -> Result<Vec<String>> {
        Ok(self.entries.keys().cloned().collect())
    }

    async fn commit(&mut self, message: &str) -> Result<()> {
        if !self.pending {
            return Ok(());
        }

        let path = self.store_path();
        let tmp = path.with_extension("json.tmp");
        let json = serde_json::to_string_pretty(&self.entries)?;
        fs::write(&tmp, json.as_bytes()).await?;
        fs::rename(&tmp, &path).await?;

        let version = self.bump_version().await?;
        self.pending = false;
        debug!("Committed store v{}: {}", version, message);
        Ok(())
    }

    async fn rollback(&mut self) -> Result<()> {
        self.entries = read_json(&self.store_path()).await?.unwrap_or_default();
        self.pending = false;
        Ok(())
    }
}

async fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<Option<T>> {
    match fs::read_to_string(path).await {
        Ok(json) => {
            let value = serde_json::from_str(&json)?;
            Ok(Some(value))
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_new_creates_layout() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("data");

        let storage = JsonStorage::new(&root).await.unwrap();

        assert!(root.join("meta").is_dir());
        assert!(storage.keys().await.unwrap().is_empty());
        assert_eq!(storage.version().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_commit_persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();

        let mut storage = JsonStorage::new(dir.path()).await.unwrap();
        storage.set("level", "3").await.unwrap();
        storage.set("currentExperience", "17").await.unwrap();
        assert!(storage.is_pending());
        storage.commit("save").await.unwrap();
        assert!(!storage.is_pending());

        let reopened = JsonStorage::new(dir.path()).await.unwrap();
        assert_eq!(reopened.get("level").await.unwrap().as_deref(), Some("3"));
        assert_eq!(reopened.get("currentExperience").await.unwrap().as_deref(), Some("17"));
        assert_eq!(reopened.version().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_uncommitted_writes_are_not_durable() {
        let dir = tempfile::tempdir().unwrap();

        let mut storage = JsonStorage::new(dir.path()).await.unwrap();
        storage.set("level", "2").await.unwrap();
        drop(storage);

        let reopened = JsonStorage::new(dir.path()).await.unwrap();
        assert_eq!(reopened.get("level").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_rollback_restores_committed_state() {
        let dir = tempfile::tempdir().unwrap();

        let mut storage = JsonStorage::new(dir.path()).await.unwrap();
        storage.set("level", "2").await.unwrap();
        storage.commit("first").await.unwrap();

        storage.set("level", "9").await.unwrap();
        storage.remove("level").await.unwrap();
        storage.set("other", "x").await.unwrap();
        storage.rollback().await.unwrap();

        assert_eq!(storage.get("level").await.unwrap().as_deref(), Some("2"));
        assert_eq!(storage.get("other").await.unwrap(), None);
        assert!(!storage.is_pending());
    }

    #[tokio::test]
    async fn test_commit_without_changes_keeps_version() {
        let dir = tempfile::tempdir().unwrap();

        let mut storage = JsonStorage::new(dir.path()).await.unwrap();
        storage.set("level", "1").await.unwrap();
        storage.commit("first").await.unwrap();
        storage.commit("noop").await.unwrap();

        assert_eq!(storage.version().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_rewriting_same_value_is_not_pending() {
        let dir = tempfile::tempdir().unwrap();

        let mut storage = JsonStorage::new(dir.path()).await.unwrap();
        storage.set("level", "4").await.unwrap();
        storage.commit("first").await.unwrap();

        storage.set("level", "4").await.unwrap();
        assert!(!storage.is_pending());
        storage.commit("same").await.unwrap();
        assert_eq!(storage.version().await.unwrap(), 1);

        storage.set("level", "5").await.unwrap();
        assert!(storage.is_pending());
    }

    #[tokio::test]
    async fn test_corrupt_store_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(STORE_FILE), "not json").unwrap();

        let result = JsonStorage::new(dir.path()).await;
        assert!(matches!(result, Err(crate::StorageError::Json(_))));
    }
}
