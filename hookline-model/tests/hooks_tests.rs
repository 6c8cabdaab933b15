use hookline_model::{
    AfterOperationArgs, BeforeOperationArgs, HookContext, HookError, HookResult, HookStage,
    MutationHooks, ResolveInputArgs, ValidateInputArgs, ValidationCollector,
};
use hookline_store::{MemoryStore, StorageError};
use hookline_types::{Data, FieldKey, ItemId, Operation};
use pretty_assertions::assert_eq;
use serde_json::json;
use std::sync::Arc;

fn context() -> HookContext {
    HookContext::new(Arc::new(MemoryStore::new()))
}

fn data(value: serde_json::Value) -> Data {
    hookline_types::data_from_value(value).unwrap()
}

// ── Default implementations ──────────────────────────────────────

struct NoOpHooks;
impl MutationHooks for NoOpHooks {}

#[test]
fn default_resolve_input_passes_data_through() {
    let ctx = context();
    let input = data(json!({"title": "hello"}));
    let resolved = tokio_test::block_on(NoOpHooks.resolve_input(ResolveInputArgs {
        list_key: "Post",
        field_key: None,
        operation: Operation::Create,
        input_data: &input,
        resolved_data: input.clone(),
        item: None,
        context: &ctx,
    }))
    .unwrap();
    assert_eq!(resolved, input);
}

#[test]
fn default_validate_input_adds_nothing() {
    let ctx = context();
    let input = data(json!({}));
    let mut errors = ValidationCollector::new(None);
    tokio_test::block_on(NoOpHooks.validate_input(
        ValidateInputArgs {
            list_key: "Post",
            field_key: None,
            operation: Operation::Create,
            input_data: &input,
            resolved_data: &input,
            item: None,
            context: &ctx,
        },
        &mut errors,
    ))
    .unwrap();
    assert!(errors.is_empty());
}

#[test]
fn default_before_and_after_operation_succeed() {
    let ctx = context();
    let input = data(json!({}));
    tokio_test::block_on(async {
        NoOpHooks
            .before_operation(BeforeOperationArgs {
                list_key: "Post",
                field_key: None,
                operation: Operation::Delete,
                input_data: &input,
                resolved_data: &input,
                item: None,
                context: &ctx,
            })
            .await
            .unwrap();
        NoOpHooks
            .after_operation(AfterOperationArgs {
                list_key: "Post",
                field_key: None,
                operation: Operation::Delete,
                input_data: &input,
                resolved_data: &input,
                item: None,
                original_item: None,
                context: &ctx,
            })
            .await
            .unwrap();
    });
}

// ── Custom hooks ─────────────────────────────────────────────────

struct TitleRules;

#[async_trait::async_trait]
impl MutationHooks for TitleRules {
    async fn validate_input(
        &self,
        args: ValidateInputArgs<'_>,
        errors: &mut ValidationCollector,
    ) -> HookResult<()> {
        match args.resolved_data.get("title").and_then(|v| v.as_str()) {
            None => errors.add_validation_error("title is required"),
            Some("") => errors.add_validation_error("title cannot be empty"),
            Some(t) if t.len() > 10 => errors.add_validation_error("title too long"),
            Some(_) => {}
        }
        Ok(())
    }
}

#[test]
fn custom_validator_reports_through_collector() {
    let ctx = context();
    let run = |value: serde_json::Value| {
        let resolved = data(value);
        let mut errors = ValidationCollector::new(Some(FieldKey::from("title")));
        tokio_test::block_on(TitleRules.validate_input(
            ValidateInputArgs {
                list_key: "Post",
                field_key: None,
                operation: Operation::Update,
                input_data: &resolved,
                resolved_data: &resolved,
                item: None,
                context: &ctx,
            },
            &mut errors,
        ))
        .unwrap();
        errors.into_messages()
    };

    assert!(run(json!({"title": "ok"})).is_empty());
    let messages = run(json!({"title": ""}));
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].message, "title cannot be empty");
    assert_eq!(messages[0].to_string(), "title: title cannot be empty");
}

#[test]
fn collector_keeps_insertion_order() {
    let mut errors = ValidationCollector::new(None);
    errors.add_validation_error("first");
    errors.add_validation_error("second");
    assert_eq!(errors.len(), 2);
    let messages: Vec<String> = errors.into_messages().into_iter().map(|m| m.message).collect();
    assert_eq!(messages, vec!["first", "second"]);
}

// ── Errors & stages ──────────────────────────────────────────────

#[test]
fn hook_error_display() {
    assert_eq!(HookError::msg("boom").to_string(), "boom");
    let storage: HookError = StorageError::not_found("Post", ItemId::new()).into();
    assert!(storage.to_string().starts_with("storage error: item not found: Post/"));
    let other: HookError = anyhow::anyhow!("mail server down").into();
    assert_eq!(other.to_string(), "mail server down");
}

#[test]
fn stages_use_framework_names_in_order() {
    let names: Vec<&str> = HookStage::ALL.iter().map(|s| s.as_str()).collect();
    assert_eq!(
        names,
        vec!["resolveInput", "validateInput", "beforeOperation", "afterOperation"]
    );
    assert_eq!(
        serde_json::to_string(&HookStage::BeforeOperation).unwrap(),
        "\"beforeOperation\""
    );
}

#[test]
fn context_exposes_session_and_distinct_request_ids() {
    let a = context();
    let b = context().with_session(hookline_types::Session::new("user-1"));
    assert_ne!(a.request_id(), b.request_id());
    assert!(a.session().is_none());
    assert_eq!(b.session().unwrap().subject, "user-1");
}
