use crate::{ItemStore, StorageError, StorageResult, now_millis};
use async_trait::async_trait;
use hookline_types::{Data, Item, ItemId};
use std::collections::{BTreeMap, HashMap};
use tokio::sync::RwLock;
use tracing::debug;

/// In-memory item store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    lists: RwLock<HashMap<String, BTreeMap<ItemId, Item>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ItemStore for MemoryStore {
    async fn get(&self, list_key: &str, id: ItemId) -> StorageResult<Option<Item>> {
        let lists = self.lists.read().await;
        Ok(lists.get(list_key).and_then(|items| items.get(&id)).cloned())
    }

    async fn list(&self, list_key: &str) -> StorageResult<Vec<Item>> {
        let lists = self.lists.read().await;
        Ok(lists
            .get(list_key)
            .map(|items| items.values().cloned().collect())
            .unwrap_or_default())
    }

    async fn create(&self, list_key: &str, data: Data) -> StorageResult<Item> {
        let now = now_millis();
        let item = Item {
            id: ItemId::new(),
            list_key: list_key.to_string(),
            data,
            created_at: now,
            modified_at: now,
        };
        self.lists
            .write()
            .await
            .entry(list_key.to_string())
            .or_default()
            .insert(item.id, item.clone());
        debug!(list = %list_key, id = %item.id, "Created item");
        Ok(item)
    }

    async fn update(&self, list_key: &str, id: ItemId, data: Data) -> StorageResult<Item> {
        let mut lists = self.lists.write().await;
        let item = lists
            .get_mut(list_key)
            .and_then(|items| items.get_mut(&id))
            .ok_or_else(|| StorageError::not_found(list_key, id))?;
        for (key, value) in data {
            item.data.insert(key, value);
        }
        item.modified_at = now_millis().max(item.modified_at);
        debug!(list = %list_key, id = %id, "Updated item");
        Ok(item.clone())
    }

    async fn delete(&self, list_key: &str, id: ItemId) -> StorageResult<Item> {
        let removed = self
            .lists
            .write()
            .await
            .get_mut(list_key)
            .and_then(|items| items.remove(&id))
            .ok_or_else(|| StorageError::not_found(list_key, id))?;
        debug!(list = %list_key, id = %id, "Deleted item");
        Ok(removed)
    }

    async fn count(&self, list_key: &str) -> StorageResult<usize> {
        let lists = self.lists.read().await;
        Ok(lists.get(list_key).map_or(0, BTreeMap::len))
    }
}
