//! Error types for the mutation pipeline.

use hookline_model::{HookError, HookStage, ValidationMessage};
use hookline_store::StorageError;
use hookline_types::{FieldKey, ItemId, Operation};
use std::fmt;
use thiserror::Error;

/// Result type for mutation execution.
pub type MutationResult<T> = Result<T, MutationError>;

/// Why a mutation did not complete.
///
/// Faults from `afterOperation` are not here: the write has already
/// committed by then, so they travel on
/// [`MutationOutcome`](crate::MutationOutcome) instead.
#[derive(Debug, Error)]
pub enum MutationError {
    #[error("unknown list: {0}")]
    UnknownList(String),

    #[error("{operation} on list '{list_key}' requires an item id")]
    MissingItemId {
        list_key: String,
        operation: Operation,
    },

    #[error("item not found: {list_key}/{id}")]
    ItemNotFound { list_key: String, id: ItemId },

    #[error("unknown field '{field}' on list '{list_key}'")]
    UnknownField { list_key: String, field: String },

    #[error("invalid value for '{list_key}.{field}': {reason}")]
    InvalidInput {
        list_key: String,
        field: FieldKey,
        reason: String,
    },

    #[error("password hashing failed: {0}")]
    PasswordHash(String),

    /// A `resolveInput` hook failed.
    #[error("{0}")]
    Resolution(HookFault),

    /// One or more `validateInput` hooks reported problems.
    #[error("{0}")]
    Validation(ValidationFailure),

    /// A `validateInput` hook failed outright.
    #[error("{0}")]
    ValidationHook(HookFault),

    /// A `beforeOperation` hook failed; the write was not attempted.
    #[error("{0}")]
    Precondition(HookFault),

    #[error("storage error: {0}")]
    Store(#[from] StorageError),

    #[error("mutation task interrupted: {0}")]
    Interrupted(String),
}

impl MutationError {
    /// The hook fault behind this error, if a hook caused it.
    pub fn hook_fault(&self) -> Option<&HookFault> {
        match self {
            Self::Resolution(f) | Self::ValidationHook(f) | Self::Precondition(f) => Some(f),
            _ => None,
        }
    }

    /// Validation messages, if this is a validation failure.
    pub fn validation(&self) -> Option<&ValidationFailure> {
        match self {
            Self::Validation(v) => Some(v),
            _ => None,
        }
    }
}

/// A fault raised by one hook invocation.
#[derive(Debug)]
pub struct HookFault {
    pub stage: HookStage,
    pub list_key: String,
    /// `None` for list-level hooks.
    pub field_key: Option<FieldKey>,
    pub error: HookError,
}

impl HookFault {
    pub fn new(
        stage: HookStage,
        list_key: &str,
        field_key: Option<&FieldKey>,
        error: HookError,
    ) -> Self {
        Self {
            stage,
            list_key: list_key.to_string(),
            field_key: field_key.cloned(),
            error,
        }
    }
}

impl fmt::Display for HookFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.field_key {
            Some(field) => write!(
                f,
                "{} hook failed for {}.{}: {}",
                self.stage, self.list_key, field, self.error
            ),
            None => write!(
                f,
                "{} hook failed for {}: {}",
                self.stage, self.list_key, self.error
            ),
        }
    }
}

impl std::error::Error for HookFault {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.error)
    }
}

/// Every message collected during `validateInput`, in invocation order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationFailure {
    pub list_key: String,
    pub operation: Operation,
    pub messages: Vec<ValidationMessage>,
}

impl ValidationFailure {
    /// Message texts without field prefixes.
    pub fn message_texts(&self) -> Vec<&str> {
        self.messages.iter().map(|m| m.message.as_str()).collect()
    }
}

impl fmt::Display for ValidationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "invalid data for {} on '{}':",
            self.operation, self.list_key
        )?;
        for message in &self.messages {
            write!(f, "\n  - {message}")?;
        }
        Ok(())
    }
}
