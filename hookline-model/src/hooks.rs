//! The lifecycle hook contract.
//!
//! A [`MutationHooks`] implementation is attached either to a whole list or to
//! one field of a list. The pipeline calls the same four methods on both kinds;
//! `field_key` in the arguments tells them apart.

use crate::context::HookContext;
use crate::validation::ValidationCollector;
use async_trait::async_trait;
use hookline_store::StorageError;
use hookline_types::{Data, FieldKey, Item, Operation};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Result type for hook callbacks.
pub type HookResult<T> = Result<T, HookError>;

/// A fault raised by a hook.
#[derive(Debug, Error)]
pub enum HookError {
    #[error("{0}")]
    Message(String),

    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("hook panicked: {0}")]
    Panicked(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl HookError {
    pub fn msg(message: impl Into<String>) -> Self {
        Self::Message(message.into())
    }
}

/// The four extension points of a mutation, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum HookStage {
    ResolveInput,
    ValidateInput,
    BeforeOperation,
    AfterOperation,
}

impl HookStage {
    pub const ALL: [Self; 4] = [
        Self::ResolveInput,
        Self::ValidateInput,
        Self::BeforeOperation,
        Self::AfterOperation,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ResolveInput => "resolveInput",
            Self::ValidateInput => "validateInput",
            Self::BeforeOperation => "beforeOperation",
            Self::AfterOperation => "afterOperation",
        }
    }
}

impl fmt::Display for HookStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Arguments for [`MutationHooks::resolve_input`].
///
/// `resolved_data` is owned: the hook returns the full replacement, which
/// becomes the next hook's input.
#[derive(Debug)]
pub struct ResolveInputArgs<'a> {
    pub list_key: &'a str,
    pub field_key: Option<&'a FieldKey>,
    pub operation: Operation,
    pub input_data: &'a Data,
    pub resolved_data: Data,
    /// Stored row for update/delete; `None` on create.
    pub item: Option<&'a Item>,
    pub context: &'a HookContext,
}

/// Arguments for [`MutationHooks::validate_input`].
#[derive(Debug, Clone, Copy)]
pub struct ValidateInputArgs<'a> {
    pub list_key: &'a str,
    pub field_key: Option<&'a FieldKey>,
    pub operation: Operation,
    pub input_data: &'a Data,
    pub resolved_data: &'a Data,
    /// Stored row for update/delete; `None` on create.
    pub item: Option<&'a Item>,
    pub context: &'a HookContext,
}

/// Arguments for [`MutationHooks::before_operation`].
#[derive(Debug, Clone, Copy)]
pub struct BeforeOperationArgs<'a> {
    pub list_key: &'a str,
    pub field_key: Option<&'a FieldKey>,
    pub operation: Operation,
    pub input_data: &'a Data,
    pub resolved_data: &'a Data,
    /// Stored row about to be changed; `None` on create.
    pub item: Option<&'a Item>,
    pub context: &'a HookContext,
}

/// Arguments for [`MutationHooks::after_operation`].
#[derive(Debug, Clone, Copy)]
pub struct AfterOperationArgs<'a> {
    pub list_key: &'a str,
    pub field_key: Option<&'a FieldKey>,
    pub operation: Operation,
    pub input_data: &'a Data,
    pub resolved_data: &'a Data,
    /// Row as written; `None` after a delete.
    pub item: Option<&'a Item>,
    /// Row before the write; `None` after a create.
    pub original_item: Option<&'a Item>,
    pub context: &'a HookContext,
}

/// Lifecycle callbacks for a list or a field.
///
/// Every method has a default, so implementations only override the stages
/// they care about:
/// - `resolve_input` passes `resolved_data` through unchanged
/// - `validate_input`, `before_operation` and `after_operation` do nothing
///
/// Returning `Err` from `resolve_input`, `validate_input` or
/// `before_operation` aborts the mutation before anything is written. An
/// `Err` from `after_operation` is reported alongside the committed result.
#[async_trait]
pub trait MutationHooks: Send + Sync {
    /// Transform the data destined for persistence.
    async fn resolve_input(&self, args: ResolveInputArgs<'_>) -> HookResult<Data> {
        Ok(args.resolved_data)
    }

    /// Check the resolved data, reporting problems through `errors`.
    async fn validate_input(
        &self,
        args: ValidateInputArgs<'_>,
        errors: &mut ValidationCollector,
    ) -> HookResult<()> {
        let _ = (args, errors);
        Ok(())
    }

    /// Runs immediately before the write.
    async fn before_operation(&self, args: BeforeOperationArgs<'_>) -> HookResult<()> {
        let _ = args;
        Ok(())
    }

    /// Runs after the write has committed.
    async fn after_operation(&self, args: AfterOperationArgs<'_>) -> HookResult<()> {
        let _ = args;
        Ok(())
    }
}
