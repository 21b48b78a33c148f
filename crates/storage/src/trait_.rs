//! Storage trait abstraction.

use async_trait::async_trait;

/// Error type for storage operations.
pub type Result<T> = std::result::Result<T, StorageError>;

/// Errors that can occur during storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Other error
    #[error("{0}")]
    Other(String),
}

/// Durable string key/value storage for session state.
///
/// Values are plain strings; callers own their encoding. Writes become
/// durable on [`Storage::commit`].
#[async_trait]
pub trait Storage: Send + Sync {
    /// Read the value stored under `key`.
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key` (create or overwrite).
    async fn set(&mut self, key: &str, value: &str) -> Result<()>;

    /// Remove `key`. Removing a missing key is not an error.
    async fn remove(&mut self, key: &str) -> Result<()>;

    /// List all keys in sorted order.
    async fn keys(&self) -> Result<Vec<String>>;

    /// Make pending changes durable.
    async fn commit(&mut self, message: &str) -> Result<()>;

    /// Discard pending changes.
    async fn rollback(&mut self) -> Result<()>;
}
