use hookline_types::FieldKey;
use serde::{Deserialize, Serialize};

/// Every list known to the data layer, in declaration order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SchemaConfig {
    #[serde(default)]
    pub lists: Vec<ListConfig>,
}

impl SchemaConfig {
    pub fn new(lists: Vec<ListConfig>) -> Self {
        Self { lists }
    }

    /// Looks up a list by key.
    pub fn list(&self, key: &str) -> Option<&ListConfig> {
        self.lists.iter().find(|l| l.key == key)
    }
}

/// Declares a list (an entity collection) and its fields.
///
/// Field order matters: field-level hooks run in this order in every stage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListConfig {
    pub key: String,
    #[serde(default)]
    pub fields: Vec<FieldConfig>,
}

impl ListConfig {
    pub fn new(key: impl Into<String>, fields: Vec<FieldConfig>) -> Self {
        Self {
            key: key.into(),
            fields,
        }
    }

    /// Looks up a field by key.
    pub fn field(&self, key: &str) -> Option<&FieldConfig> {
        self.fields.iter().find(|f| f.key == key)
    }

    /// Field keys in declaration order.
    pub fn field_keys(&self) -> impl Iterator<Item = &FieldKey> {
        self.fields.iter().map(|f| &f.key)
    }
}

/// A field declared on a list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldConfig {
    pub key: FieldKey,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    /// Rejects missing (on create) or empty values.
    #[serde(default)]
    pub required: bool,
    /// Value filled in on create when the input omits the field.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<serde_json::Value>,
    /// Character bounds for text fields.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length: Option<LengthBounds>,
    /// Allowed values. Only meaningful when FieldType is Select.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[serde(alias = "choices")]
    pub options: Option<Vec<String>>,
}

impl FieldConfig {
    fn simple(key: &str, field_type: FieldType) -> Self {
        Self {
            key: FieldKey::new(key),
            field_type,
            required: false,
            default: None,
            length: None,
            options: None,
        }
    }

    /// Shorthand for a text field.
    pub fn text(key: &str) -> Self {
        Self::simple(key, FieldType::Text)
    }

    /// Shorthand for an integer field.
    pub fn integer(key: &str) -> Self {
        Self::simple(key, FieldType::Integer)
    }

    /// Shorthand for a floating point field.
    pub fn float(key: &str) -> Self {
        Self::simple(key, FieldType::Float)
    }

    /// Shorthand for a boolean field.
    pub fn checkbox(key: &str) -> Self {
        Self::simple(key, FieldType::Checkbox)
    }

    /// Shorthand for an RFC 3339 timestamp field.
    pub fn timestamp(key: &str) -> Self {
        Self::simple(key, FieldType::Timestamp)
    }

    /// Shorthand for a secret that is hashed before hooks see it.
    pub fn password(key: &str) -> Self {
        Self::simple(key, FieldType::Password)
    }

    /// Shorthand for an arbitrary JSON field.
    pub fn json(key: &str) -> Self {
        Self::simple(key, FieldType::Json)
    }

    /// Shorthand for a select field with fixed options.
    pub fn select(key: &str, options: &[&str]) -> Self {
        Self {
            options: Some(options.iter().map(|o| (*o).to_string()).collect()),
            ..Self::simple(key, FieldType::Select)
        }
    }

    #[must_use]
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    #[must_use]
    pub fn with_default(mut self, value: serde_json::Value) -> Self {
        self.default = Some(value);
        self
    }

    #[must_use]
    pub fn with_length(mut self, min: Option<usize>, max: Option<usize>) -> Self {
        self.length = Some(LengthBounds { min, max });
        self
    }

    /// True if the field carries any built-in validation rule.
    pub fn has_builtin_validation(&self) -> bool {
        self.required || self.length.is_some()
    }
}

/// Inclusive character-count bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LengthBounds {
    #[serde(default)]
    pub min: Option<usize>,
    #[serde(default)]
    pub max: Option<usize>,
}

/// The storage type of a field.
///
/// Options for select fields live on `FieldConfig` rather than inside this
/// enum so the TOML stays flat: `type = "select"` next to `options = [...]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    Text,
    Integer,
    Float,
    Checkbox,
    Timestamp,
    Select,
    Password,
    Json,
}
