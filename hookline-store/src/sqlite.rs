//! SQLite-backed item store.
//!
//! Items are stored as one row per item with the field data as a JSON text
//! column. The list key is a plain column, so every list shares one table.

use crate::{ItemStore, StorageError, StorageResult, now_millis};
use async_trait::async_trait;
use hookline_types::{Data, Item, ItemId, data_from_value};
use rusqlite::{Connection, OptionalExtension, params};
use std::path::Path;
use std::sync::{Arc, Mutex};
use tracing::{debug, info};

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS items (
    id          TEXT PRIMARY KEY,
    list_key    TEXT NOT NULL,
    data        TEXT NOT NULL,
    created_at  INTEGER NOT NULL,
    modified_at INTEGER NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_items_list ON items (list_key, created_at);
";

/// Item store persisted in a SQLite database.
#[derive(Clone)]
pub struct SqliteStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteStore {
    /// Opens (or creates) a database file and applies the schema.
    pub fn open(path: &Path) -> StorageResult<Self> {
        let conn = Connection::open(path)?;
        let mode: String = conn.query_row("PRAGMA journal_mode=WAL", [], |row| row.get(0))?;
        info!("Opened item store at {:?} (journal_mode={})", path, mode);
        Self::init(conn)
    }

    /// Opens a private in-memory database.
    pub fn open_in_memory() -> StorageResult<Self> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> StorageResult<Self> {
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    async fn run<F, T>(&self, f: F) -> StorageResult<T>
    where
        F: FnOnce(&mut Connection) -> StorageResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        tokio::task::spawn_blocking(move || {
            let mut guard = conn
                .lock()
                .map_err(|_| StorageError::Task("connection mutex poisoned".to_string()))?;
            f(&mut *guard)
        })
        .await
        .map_err(|e| StorageError::Task(e.to_string()))?
    }
}

fn parse_data(raw: &str) -> StorageResult<Data> {
    let value: serde_json::Value = serde_json::from_str(raw)?;
    data_from_value(value).map_err(|e| StorageError::InvalidData(e.to_string()))
}

fn read_item(conn: &Connection, list_key: &str, id: ItemId) -> StorageResult<Option<Item>> {
    let row = conn
        .query_row(
            "SELECT data, created_at, modified_at FROM items WHERE list_key = ?1 AND id = ?2",
            params![list_key, id.to_string()],
            |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, i64>(1)?,
                    row.get::<_, i64>(2)?,
                ))
            },
        )
        .optional()?;

    row.map(|(data, created_at, modified_at)| -> StorageResult<Item> {
        Ok(Item {
            id,
            list_key: list_key.to_string(),
            data: parse_data(&data)?,
            created_at,
            modified_at,
        })
    })
    .transpose()
}

#[async_trait]
impl ItemStore for SqliteStore {
    async fn get(&self, list_key: &str, id: ItemId) -> StorageResult<Option<Item>> {
        let list_key = list_key.to_string();
        self.run(move |conn| read_item(conn, &list_key, id)).await
    }

    async fn list(&self, list_key: &str) -> StorageResult<Vec<Item>> {
        let list_key = list_key.to_string();
        self.run(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT id, data, created_at, modified_at FROM items
                 WHERE list_key = ?1 ORDER BY created_at, id",
            )?;
            let rows = stmt
                .query_map(params![list_key], |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, i64>(2)?,
                        row.get::<_, i64>(3)?,
                    ))
                })?
                .collect::<Result<Vec<_>, _>>()?;

            rows.into_iter()
                .map(|(id, data, created_at, modified_at)| -> StorageResult<Item> {
                    let id = ItemId::parse(&id)
                        .map_err(|e| StorageError::InvalidData(format!("bad item id {id}: {e}")))?;
                    Ok(Item {
                        id,
                        list_key: list_key.clone(),
                        data: parse_data(&data)?,
                        created_at,
                        modified_at,
                    })
                })
                .collect::<StorageResult<Vec<Item>>>()
        })
        .await
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
        self.run(move |conn| {
            conn.execute(
                "INSERT INTO items (id, list_key, data, created_at, modified_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    item.id.to_string(),
                    item.list_key,
                    serde_json::to_string(&item.data)?,
                    item.created_at,
                    item.modified_at,
                ],
            )?;
            debug!(list = %item.list_key, id = %item.id, "Created item");
            Ok(item)
        })
        .await
    }

    async fn update(&self, list_key: &str, id: ItemId, data: Data) -> StorageResult<Item> {
        let list_key = list_key.to_string();
        self.run(move |conn| {
            let tx = conn.transaction()?;
            let mut item = read_item(&tx, &list_key, id)?
                .ok_or_else(|| StorageError::not_found(&list_key, id))?;
            for (key, value) in data {
                item.data.insert(key, value);
            }
            item.modified_at = now_millis().max(item.modified_at);
            tx.execute(
                "UPDATE items SET data = ?1, modified_at = ?2 WHERE id = ?3",
                params![serde_json::to_string(&item.data)?, item.modified_at, id.to_string()],
            )?;
            tx.commit()?;
            debug!(list = %list_key, id = %id, "Updated item");
            Ok(item)
        })
        .await
    }

    async fn delete(&self, list_key: &str, id: ItemId) -> StorageResult<Item> {
        let list_key = list_key.to_string();
        self.run(move |conn| {
            let tx = conn.transaction()?;
            let item = read_item(&tx, &list_key, id)?
                .ok_or_else(|| StorageError::not_found(&list_key, id))?;
            tx.execute("DELETE FROM items WHERE id = ?1", params![id.to_string()])?;
            tx.commit()?;
            debug!(list = %list_key, id = %id, "Deleted item");
            Ok(item)
        })
        .await
    }

    async fn count(&self, list_key: &str) -> StorageResult<usize> {
        let list_key = list_key.to_string();
        self.run(move |conn| {
            let n: i64 = conn.query_row(
                "SELECT COUNT(*) FROM items WHERE list_key = ?1",
                params![list_key],
                |row| row.get(0),
            )?;
            usize::try_from(n).map_err(|e| StorageError::InvalidData(e.to_string()))
        })
        .await
    }
}
