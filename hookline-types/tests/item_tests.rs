use hookline_types::{FieldKey, Item, ItemId, Operation, Session, data_from_value};
use pretty_assertions::assert_eq;
use serde_json::json;
use std::str::FromStr;

fn make_item(data: serde_json::Value) -> Item {
    Item {
        id: ItemId::new(),
        list_key: "Post".to_string(),
        data: data_from_value(data).unwrap(),
        created_at: 1000,
        modified_at: 1000,
    }
}

// ── Operation ─────────────────────────────────────────────────────

#[test]
fn operation_wire_names() {
    assert_eq!(Operation::Create.to_string(), "create");
    assert_eq!(Operation::Update.to_string(), "update");
    assert_eq!(Operation::Delete.to_string(), "delete");
    assert_eq!(serde_json::to_string(&Operation::Update).unwrap(), "\"update\"");
}

#[test]
fn operation_parse_rejects_unknown() {
    assert_eq!(Operation::from_str("delete").unwrap(), Operation::Delete);
    let err = Operation::from_str("upsert").unwrap_err();
    assert_eq!(err.to_string(), "unknown operation: upsert");
}

#[test]
fn only_update_and_delete_target_existing_items() {
    assert!(!Operation::Create.targets_existing());
    assert!(Operation::Update.targets_existing());
    assert!(Operation::Delete.targets_existing());
}

// ── Item ──────────────────────────────────────────────────────────

#[test]
fn item_typed_accessors() {
    let item = make_item(json!({"title": "Hello", "published": true, "views": 12}));
    assert_eq!(item.get_str("title"), Some("Hello"));
    assert_eq!(item.get_bool("published"), Some(true));
    assert_eq!(item.get_number("views"), Some(12.0));
    assert_eq!(item.get_str("missing"), None);
    assert_eq!(item.get_str("views"), None);
}

#[test]
fn data_from_value_rejects_non_objects() {
    assert!(data_from_value(json!({"a": 1})).is_ok());
    let err = data_from_value(json!([1, 2])).unwrap_err();
    assert_eq!(err.to_string(), "expected a JSON object, got array");
    assert!(data_from_value(json!(null)).is_err());
}

// ── FieldKey / Session ────────────────────────────────────────────

#[test]
fn field_key_compares_with_str() {
    let key = FieldKey::from("email");
    assert_eq!(key, "email");
    assert_eq!(key.as_str(), "email");
    assert_eq!(key.to_string(), "email");
}

#[test]
fn session_defaults_to_null_data() {
    let session = Session::new("user-1");
    assert_eq!(session.data, serde_json::Value::Null);
    let session = session.with_data(json!({"role": "admin"}));
    assert_eq!(session.data["role"], "admin");
}
