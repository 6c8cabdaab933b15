use hookline_store::{ItemStore, MemoryStore, SqliteStore, StorageError};
use hookline_types::{Data, ItemId, data_from_value};
use pretty_assertions::assert_eq;
use serde_json::json;

fn data(value: serde_json::Value) -> Data {
    data_from_value(value).unwrap()
}

async fn create_then_get(store: &dyn ItemStore) {
    let created = store.create("Post", data(json!({"title": "Hello"}))).await.unwrap();
    assert_eq!(created.list_key, "Post");
    assert_eq!(created.created_at, created.modified_at);

    let fetched = store.get("Post", created.id).await.unwrap().unwrap();
    assert_eq!(fetched, created);
}

async fn get_scopes_by_list(store: &dyn ItemStore) {
    let created = store.create("Post", data(json!({"title": "x"}))).await.unwrap();
    assert!(store.get("User", created.id).await.unwrap().is_none());
    assert!(store.get("Post", ItemId::new()).await.unwrap().is_none());
}

async fn update_merges_top_level_keys(store: &dyn ItemStore) {
    let created = store
        .create("Post", data(json!({"title": "Hello", "content": "body"})))
        .await
        .unwrap();

    let updated = store
        .update("Post", created.id, data(json!({"title": "Bye"})))
        .await
        .unwrap();
    assert_eq!(updated.get_str("title"), Some("Bye"));
    assert_eq!(updated.get_str("content"), Some("body"));
    assert_eq!(updated.created_at, created.created_at);
    assert!(updated.modified_at >= created.modified_at);

    let fetched = store.get("Post", created.id).await.unwrap().unwrap();
    assert_eq!(fetched, updated);
}

async fn update_missing_is_not_found(store: &dyn ItemStore) {
    let id = ItemId::new();
    let err = store.update("Post", id, Data::new()).await.unwrap_err();
    assert!(matches!(err, StorageError::NotFound { id: missing, .. } if missing == id));
}

async fn delete_returns_previous_row(store: &dyn ItemStore) {
    let created = store.create("Post", data(json!({"title": "gone"}))).await.unwrap();
    let deleted = store.delete("Post", created.id).await.unwrap();
    assert_eq!(deleted, created);
    assert!(store.get("Post", created.id).await.unwrap().is_none());

    let err = store.delete("Post", created.id).await.unwrap_err();
    assert!(matches!(err, StorageError::NotFound { .. }));
}

async fn list_and_count(store: &dyn ItemStore) {
    assert_eq!(store.count("Tag").await.unwrap(), 0);
    assert!(store.list("Tag").await.unwrap().is_empty());

    let a = store.create("Tag", data(json!({"name": "a"}))).await.unwrap();
    let b = store.create("Tag", data(json!({"name": "b"}))).await.unwrap();
    store.create("Other", data(json!({}))).await.unwrap();

    let items = store.list("Tag").await.unwrap();
    let ids: Vec<ItemId> = items.iter().map(|i| i.id).collect();
    assert_eq!(ids, vec![a.id, b.id]);
    assert_eq!(store.count("Tag").await.unwrap(), 2);
}

// ── MemoryStore ──────────────────────────────────────────────────

#[tokio::test]
async fn memory_create_then_get() {
    create_then_get(&MemoryStore::new()).await;
}

#[tokio::test]
async fn memory_get_scopes_by_list() {
    get_scopes_by_list(&MemoryStore::new()).await;
}

#[tokio::test]
async fn memory_update_merges_top_level_keys() {
    update_merges_top_level_keys(&MemoryStore::new()).await;
}

#[tokio::test]
async fn memory_update_missing_is_not_found() {
    update_missing_is_not_found(&MemoryStore::new()).await;
}

#[tokio::test]
async fn memory_delete_returns_previous_row() {
    delete_returns_previous_row(&MemoryStore::new()).await;
}

#[tokio::test]
async fn memory_list_and_count() {
    list_and_count(&MemoryStore::new()).await;
}

// ── SqliteStore ──────────────────────────────────────────────────

#[tokio::test]
async fn sqlite_create_then_get() {
    create_then_get(&SqliteStore::open_in_memory().unwrap()).await;
}

#[tokio::test]
async fn sqlite_get_scopes_by_list() {
    get_scopes_by_list(&SqliteStore::open_in_memory().unwrap()).await;
}

#[tokio::test]
async fn sqlite_update_merges_top_level_keys() {
    update_merges_top_level_keys(&SqliteStore::open_in_memory().unwrap()).await;
}

#[tokio::test]
async fn sqlite_update_missing_is_not_found() {
    update_missing_is_not_found(&SqliteStore::open_in_memory().unwrap()).await;
}

#[tokio::test]
async fn sqlite_delete_returns_previous_row() {
    delete_returns_previous_row(&SqliteStore::open_in_memory().unwrap()).await;
}

#[tokio::test]
async fn sqlite_list_and_count() {
    list_and_count(&SqliteStore::open_in_memory().unwrap()).await;
}

#[tokio::test]
async fn sqlite_persists_across_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("items.db");

    let id = {
        let store = SqliteStore::open(&path).unwrap();
        store
            .create("Post", data(json!({"title": "durable"})))
            .await
            .unwrap()
            .id
    };

    let store = SqliteStore::open(&path).unwrap();
    let item = store.get("Post", id).await.unwrap().unwrap();
    assert_eq!(item.get_str("title"), Some("durable"));
}
