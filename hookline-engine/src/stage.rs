//! Per-mutation state machine.
//!
//! ```text
//! Pending → ResolvingInput → Validating → BeforeOperation → Writing → Written → AfterOperation → Completed
//!    │            │              │               │             │
//!    └────────────┴──────────────┴───────────────┴─────────────┴──→ Aborted
//! ```

use hookline_types::{Operation, RequestId};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MutationStage {
    Pending,
    ResolvingInput,
    Validating,
    BeforeOperation,
    Writing,
    Written,
    AfterOperation,
    Completed,
    Aborted,
}

impl MutationStage {
    /// Whether `next` is a legal successor of `self`.
    #[must_use]
    pub fn can_advance_to(self, next: Self) -> bool {
        use MutationStage::*;
        matches!(
            (self, next),
            (Pending, ResolvingInput)
                | (ResolvingInput, Validating)
                | (Validating, BeforeOperation)
                | (BeforeOperation, Writing)
                | (Writing, Written)
                | (Written, AfterOperation)
                | (AfterOperation, Completed)
                | (Pending | ResolvingInput | Validating | BeforeOperation | Writing, Aborted)
        )
    }

    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Aborted)
    }

    /// True once the write may have reached the store. From here on the
    /// mutation runs to completion regardless of the caller.
    #[must_use]
    pub const fn is_committing(self) -> bool {
        matches!(
            self,
            Self::Writing | Self::Written | Self::AfterOperation | Self::Completed
        )
    }
}

impl fmt::Display for MutationStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Tracks the stages a mutation has passed through.
#[derive(Debug)]
pub(crate) struct StageTracker {
    request_id: RequestId,
    list_key: String,
    operation: Operation,
    history: Vec<MutationStage>,
}

impl StageTracker {
    pub(crate) fn new(request_id: RequestId, list_key: &str, operation: Operation) -> Self {
        Self {
            request_id,
            list_key: list_key.to_string(),
            operation,
            history: vec![MutationStage::Pending],
        }
    }

    pub(crate) fn current(&self) -> MutationStage {
        self.history
            .last()
            .copied()
            .unwrap_or(MutationStage::Pending)
    }

    pub(crate) fn advance(&mut self, next: MutationStage) {
        let current = self.current();
        debug_assert!(
            current.can_advance_to(next),
            "illegal mutation stage transition {current} -> {next}"
        );
        debug!(
            request = %self.request_id,
            list = %self.list_key,
            operation = %self.operation,
            "{} -> {}",
            current,
            next
        );
        self.history.push(next);
    }

    pub(crate) fn into_history(self) -> Vec<MutationStage> {
        self.history
    }
}
