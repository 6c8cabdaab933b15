use hookline_types::FieldKey;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One message recorded by a `validate_input` hook.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationMessage {
    /// Field the reporting hook was bound to; `None` for list-level hooks.
    pub field_key: Option<FieldKey>,
    pub message: String,
}

impl fmt::Display for ValidationMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.field_key {
            Some(key) => write!(f, "{key}: {}", self.message),
            None => f.write_str(&self.message),
        }
    }
}

/// Collector handed to a single `validate_input` invocation.
///
/// Hooks report problems through [`add_validation_error`](Self::add_validation_error)
/// instead of returning early, so every validator gets to run and the caller
/// sees all problems at once.
#[derive(Debug, Default)]
pub struct ValidationCollector {
    field_key: Option<FieldKey>,
    messages: Vec<ValidationMessage>,
}

impl ValidationCollector {
    /// Creates a collector bound to a field (or to the list when `None`).
    pub fn new(field_key: Option<FieldKey>) -> Self {
        Self {
            field_key,
            messages: Vec::new(),
        }
    }

    /// Records a validation problem. May be called any number of times.
    pub fn add_validation_error(&mut self, message: impl Into<String>) {
        self.messages.push(ValidationMessage {
            field_key: self.field_key.clone(),
            message: message.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Consumes the collector, yielding messages in the order they were added.
    pub fn into_messages(self) -> Vec<ValidationMessage> {
        self.messages
    }
}
