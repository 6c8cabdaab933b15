use serde::{Deserialize, Serialize};

/// Caller identity attached to a mutation request.
///
/// Opaque to the pipeline; hooks may read it to stamp authorship or decide
/// on side effects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub subject: String,
    #[serde(default)]
    pub data: serde_json::Value,
}

impl Session {
    pub fn new(subject: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            data: serde_json::Value::Null,
        }
    }

    /// Attaches arbitrary session data.
    #[must_use]
    pub fn with_data(mut self, data: serde_json::Value) -> Self {
        self.data = data;
        self
    }
}
