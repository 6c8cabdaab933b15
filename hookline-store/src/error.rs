//! Error types for the storage layer.

use hookline_types::ItemId;
use thiserror::Error;

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Errors that can occur in storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Database error from SQLite.
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Item not found.
    #[error("item not found: {list_key}/{id}")]
    NotFound { list_key: String, id: ItemId },

    /// Invalid data read back from the database.
    #[error("invalid data: {0}")]
    InvalidData(String),

    /// A blocking storage task failed to complete.
    #[error("storage task failed: {0}")]
    Task(String),
}

impl StorageError {
    pub fn not_found(list_key: &str, id: ItemId) -> Self {
        Self::NotFound {
            list_key: list_key.to_string(),
            id,
        }
    }
}
