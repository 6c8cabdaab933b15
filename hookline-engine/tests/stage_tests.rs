//! Tests for stage.rs and error.rs: the mutation state machine and how
//! failures render.

use hookline_engine::{HookFault, MutationError, MutationStage, ValidationFailure};
use hookline_model::{HookError, HookStage, ValidationMessage};
use hookline_types::{FieldKey, Operation};
use pretty_assertions::assert_eq;
use std::error::Error;

use MutationStage::*;

const ALL: [MutationStage; 9] = [
    Pending,
    ResolvingInput,
    Validating,
    BeforeOperation,
    Writing,
    Written,
    AfterOperation,
    Completed,
    Aborted,
];

// ── State machine ───────────────────────────────────────────────

#[test]
fn happy_path_is_a_linear_chain() {
    let chain = &ALL[..8];
    for pair in chain.windows(2) {
        assert!(pair[0].can_advance_to(pair[1]), "{} -> {}", pair[0], pair[1]);
    }
}

#[test]
fn stages_cannot_be_skipped_or_revisited() {
    assert!(!Pending.can_advance_to(Validating));
    assert!(!Validating.can_advance_to(Writing));
    assert!(!Written.can_advance_to(Completed));
    assert!(!AfterOperation.can_advance_to(ResolvingInput));
    assert!(!Writing.can_advance_to(Writing));
}

#[test]
fn abort_is_only_possible_before_the_write_commits() {
    let abortable: Vec<MutationStage> = ALL
        .into_iter()
        .filter(|stage| stage.can_advance_to(Aborted))
        .collect();
    assert_eq!(
        abortable,
        vec![Pending, ResolvingInput, Validating, BeforeOperation, Writing]
    );
}

#[test]
fn terminal_stages_have_no_successor() {
    for terminal in [Completed, Aborted] {
        assert!(terminal.is_terminal());
        assert!(ALL.iter().all(|next| !terminal.can_advance_to(*next)));
    }
    assert!(!Written.is_terminal());
}

#[test]
fn committing_stages_start_at_writing() {
    let committing: Vec<MutationStage> = ALL.into_iter().filter(|s| s.is_committing()).collect();
    assert_eq!(committing, vec![Writing, Written, AfterOperation, Completed]);
}

#[test]
fn stage_serializes_as_snake_case() {
    assert_eq!(
        serde_json::to_string(&BeforeOperation).unwrap(),
        "\"before_operation\""
    );
}

// ── Error rendering ─────────────────────────────────────────────

#[test]
fn hook_fault_names_stage_list_and_field() {
    let field = FieldKey::new("title");
    let fault = HookFault::new(
        HookStage::BeforeOperation,
        "Post",
        Some(&field),
        HookError::msg("slug taken"),
    );

    assert_eq!(
        fault.to_string(),
        "beforeOperation hook failed for Post.title: slug taken"
    );
    assert_eq!(fault.source().unwrap().to_string(), "slug taken");

    let err = MutationError::Precondition(fault);
    assert_eq!(err.hook_fault().unwrap().stage, HookStage::BeforeOperation);
    assert!(err.validation().is_none());
}

#[test]
fn validation_failure_lists_every_message() {
    let failure = ValidationFailure {
        list_key: "User".to_string(),
        operation: Operation::Update,
        messages: vec![
            ValidationMessage {
                field_key: None,
                message: "account is locked".to_string(),
            },
            ValidationMessage {
                field_key: Some(FieldKey::new("email")),
                message: "email must be a valid email address".to_string(),
            },
        ],
    };

    assert_eq!(
        failure.message_texts(),
        vec!["account is locked", "email must be a valid email address"]
    );
    assert_eq!(
        MutationError::Validation(failure).to_string(),
        "invalid data for update on 'User':\n  - account is locked\n  - email: email must be a valid email address"
    );
}
