use crate::ItemId;
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

/// Field values keyed by field name.
///
/// Used for the raw input of a mutation, the resolved data threaded through
/// the hook pipeline, and the stored data of an item.
pub type Data = serde_json::Map<String, serde_json::Value>;

/// Converts a JSON value into [`Data`], rejecting anything but an object.
pub fn data_from_value(value: serde_json::Value) -> crate::Result<Data> {
    match value {
        serde_json::Value::Object(map) => Ok(map),
        serde_json::Value::Null => Err(crate::Error::NotAnObject("null")),
        serde_json::Value::Bool(_) => Err(crate::Error::NotAnObject("bool")),
        serde_json::Value::Number(_) => Err(crate::Error::NotAnObject("number")),
        serde_json::Value::String(_) => Err(crate::Error::NotAnObject("string")),
        serde_json::Value::Array(_) => Err(crate::Error::NotAnObject("array")),
    }
}

/// A stored row of a list.
///
/// `data` holds the persisted field values. The set of keys is defined by the
/// list's configuration, not by this type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub list_key: String,
    pub data: Data,
    pub created_at: i64,
    pub modified_at: i64,
}

impl Item {
    /// Returns the raw value of a field, if present.
    pub fn get(&self, field: &str) -> Option<&serde_json::Value> {
        self.data.get(field)
    }

    /// Extract a string field.
    pub fn get_str(&self, field: &str) -> Option<&str> {
        self.data.get(field).and_then(|v| v.as_str())
    }

    /// Extract a boolean field.
    pub fn get_bool(&self, field: &str) -> Option<bool> {
        self.data.get(field).and_then(|v| v.as_bool())
    }

    /// Extract a numeric field.
    pub fn get_number(&self, field: &str) -> Option<f64> {
        self.data.get(field).and_then(|v| v.as_f64())
    }
}

/// Name of a field declared on a list.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldKey(String);

impl FieldKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FieldKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for FieldKey {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for FieldKey {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl AsRef<str> for FieldKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for FieldKey {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for FieldKey {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for FieldKey {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}
