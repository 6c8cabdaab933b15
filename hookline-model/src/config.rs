//! Schema loading from TOML.
//!
//! ```toml
//! [[lists]]
//! key = "Post"
//!
//! [[lists.fields]]
//! key = "title"
//! type = "text"
//! required = true
//! length = { max = 100 }
//!
//! [[lists.fields]]
//! key = "status"
//! type = "select"
//! options = ["draft", "published"]
//! default = "draft"
//! ```

use crate::schema::{FieldType, SchemaConfig};
use std::collections::HashSet;
use std::path::Path;
use thiserror::Error;
use tracing::info;

/// Result type for configuration loading.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Errors raised while loading or checking configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("duplicate list key: {0}")]
    DuplicateList(String),

    #[error("duplicate field key '{field}' on list '{list}'")]
    DuplicateField { list: String, field: String },

    #[error("invalid field '{list}.{field}': {reason}")]
    InvalidField {
        list: String,
        field: String,
        reason: String,
    },

    #[error("unknown list: {0}")]
    UnknownList(String),

    #[error("unknown field '{field}' on list '{list}'")]
    UnknownField { list: String, field: String },
}

impl SchemaConfig {
    /// Parses and checks a schema from TOML text.
    pub fn from_toml_str(contents: &str) -> ConfigResult<Self> {
        let schema: Self = toml::from_str(contents)?;
        schema.validate()?;
        Ok(schema)
    }

    /// Loads a schema from a TOML file.
    pub fn load_from(path: &Path) -> ConfigResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        let schema = Self::from_toml_str(&contents)?;
        info!(
            "Loaded schema from {:?} ({} lists)",
            path,
            schema.lists.len()
        );
        Ok(schema)
    }

    /// Checks key uniqueness and per-field option consistency.
    pub fn validate(&self) -> ConfigResult<()> {
        let mut list_keys = HashSet::new();
        for list in &self.lists {
            if !list_keys.insert(list.key.as_str()) {
                return Err(ConfigError::DuplicateList(list.key.clone()));
            }

            let mut field_keys = HashSet::new();
            for field in &list.fields {
                let invalid = |reason: &str| ConfigError::InvalidField {
                    list: list.key.clone(),
                    field: field.key.to_string(),
                    reason: reason.to_string(),
                };

                if !field_keys.insert(field.key.as_str()) {
                    return Err(ConfigError::DuplicateField {
                        list: list.key.clone(),
                        field: field.key.to_string(),
                    });
                }

                match (field.field_type, &field.options) {
                    (FieldType::Select, None) => return Err(invalid("select requires options")),
                    (FieldType::Select, Some(options)) if options.is_empty() => {
                        return Err(invalid("select options cannot be empty"));
                    }
                    (FieldType::Select, Some(_)) => {}
                    (_, Some(_)) => return Err(invalid("options only apply to select fields")),
                    (_, None) => {}
                }

                if let Some(bounds) = field.length {
                    if field.field_type != FieldType::Text {
                        return Err(invalid("length only applies to text fields"));
                    }
                    if let (Some(min), Some(max)) = (bounds.min, bounds.max) {
                        if min > max {
                            return Err(invalid("length.min is greater than length.max"));
                        }
                    }
                }

                if field.default.is_some() && field.field_type == FieldType::Password {
                    return Err(invalid("password fields cannot declare a default"));
                }
            }
        }
        Ok(())
    }
}
