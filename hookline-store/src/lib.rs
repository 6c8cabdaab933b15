//! Storage layer for Hookline.
//!
//! The hook pipeline never talks to a database directly. It performs its single
//! write, and serves hook queries, through the [`ItemStore`] trait.
//!
//! # Implementations
//!
//! - [`MemoryStore`] keeps items in a `tokio::sync::RwLock`ed map. Used by tests
//!   and embedders that do not need persistence.
//! - [`SqliteStore`] persists items as JSON rows in SQLite. Blocking calls run
//!   on the tokio blocking pool.

mod error;
mod memory;
mod sqlite;

use async_trait::async_trait;
use hookline_types::{Data, Item, ItemId};

pub use error::{StorageError, StorageResult};
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

/// Storage/query execution collaborator.
///
/// Every write is a single call. Transaction handling inside a call is the
/// implementation's concern.
#[async_trait]
pub trait ItemStore: Send + Sync {
    /// Fetches one item, or `None` if the list has no such id.
    async fn get(&self, list_key: &str, id: ItemId) -> StorageResult<Option<Item>>;

    /// Returns every item of a list, oldest first.
    async fn list(&self, list_key: &str) -> StorageResult<Vec<Item>>;

    /// Inserts a new item built from `data` and returns it.
    async fn create(&self, list_key: &str, data: Data) -> StorageResult<Item>;

    /// Merges `data` over the stored item's data (top-level keys) and
    /// returns the updated item.
    async fn update(&self, list_key: &str, id: ItemId, data: Data) -> StorageResult<Item>;

    /// Removes an item and returns the row as it was before removal.
    async fn delete(&self, list_key: &str, id: ItemId) -> StorageResult<Item>;

    /// Number of items in a list.
    async fn count(&self, list_key: &str) -> StorageResult<usize> {
        Ok(self.list(list_key).await?.len())
    }
}

pub(crate) fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
