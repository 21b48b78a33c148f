//! In-memory storage backend.

use std::collections::BTreeMap;

use super::{Result, Storage};

/// Volatile storage for ephemeral sessions and tests.
///
/// Mirrors the commit/rollback behaviour of [`crate::JsonStorage`] without
/// touching the filesystem.
#[derive(Debug, Default, Clone)]
pub struct MemoryStorage {
    committed: BTreeMap<String, String>,
    working: BTreeMap<String, String>,
    commits: usize,
}

impl MemoryStorage {
    /// Create empty storage.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create storage pre-populated with committed entries.
    pub fn with_entries<K, V>(entries: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        let committed: BTreeMap<String, String> = entries
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        Self {
            working: committed.clone(),
            committed,
            commits: 0,
        }
    }

    /// Number of commits that changed something.
    pub fn commits(&self) -> usize {
        self.commits
    }

    /// Committed value under `key`.
    pub fn committed(&self, key: &str) -> Option<&str> {
        self.committed.get(key).map(String::as_str)
    }
}

#[async_trait::async_trait]
impl Storage for MemoryStorage {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.working.get(key).cloned())
    }

    async fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.working.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&mut self, key: &str) -> Result<()> {
        self.working.remove(key);
        Ok(())
    }

    async fn keys(&self) -> Result<Vec<String>> {
        Ok(self.working.keys().cloned().collect())
    }

    async fn commit(&mut self, _message: &str) -> Result<()> {
        if self.working != self.committed {
            self.committed = self.working.clone();
            self.commits += 1;
        }
        Ok(())
    }

    async fn rollback(&mut self) -> Result<()> {
        self.working = self.committed.clone();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_commit_and_rollback() {
        let mut storage = MemoryStorage::new();
        storage.set("level", "2").await.unwrap();
        assert_eq!(storage.committed("level"), None);

        storage.commit("save").await.unwrap();
        assert_eq!(storage.committed("level"), Some("2"));
        assert_eq!(storage.commits(), 1);

        storage.set("level", "5").await.unwrap();
        storage.rollback().await.unwrap();
        assert_eq!(storage.get("level").await.unwrap().as_deref(), Some("2"));
    }

    #[tokio::test]
    async fn test_with_entries_is_committed() {
        let storage = MemoryStorage::with_entries([("level", "4")]);
        assert_eq!(storage.committed("level"), Some("4"));
        assert_eq!(storage.keys().await.unwrap(), vec!["level".to_string()]);
        assert_eq!(storage.commits(), 0);
    }
}
