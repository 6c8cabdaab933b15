//! Mutation hook pipeline.
//!
//! Runs a create/update/delete through the four hook stages around a single
//! store write:
//!
//! 1. `resolveInput` threads the resolved data through every hook
//! 2. `validateInput` collects messages from every hook, aborts if any
//! 3. `beforeOperation` may veto the write by failing
//! 4. the write itself
//! 5. `afterOperation` faults (panics included) are reported but never undo
//!    the write
//!
//! Stages 1-3 run in the caller's task, so dropping the returned future
//! abandons the mutation before anything is written. The write and stage 5
//! run in a spawned task that finishes even if the caller goes away.

use crate::config::EngineConfig;
use crate::error::{HookFault, MutationError, MutationResult, ValidationFailure};
use crate::registry::{HookRegistry, ListHooks};
use crate::resolve::resolve_field_types;
use crate::stage::{MutationStage, StageTracker};
use futures::FutureExt;
use hookline_model::{
    AfterOperationArgs, BeforeOperationArgs, HookContext, HookError, HookStage, ResolveInputArgs,
    ValidateInputArgs, ValidationCollector, ValidationMessage,
};
use hookline_store::{ItemStore, StorageError};
use hookline_types::{Data, Item, ItemId, Operation};
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tracing::{error, info, warn};

/// A requested mutation.
#[derive(Debug, Clone, PartialEq)]
pub struct MutationRequest {
    pub list_key: String,
    pub operation: Operation,
    /// Target item; required for update and delete.
    pub item_id: Option<ItemId>,
    pub input: Data,
}

impl MutationRequest {
    pub fn create(list_key: &str, input: Data) -> Self {
        Self {
            list_key: list_key.to_string(),
            operation: Operation::Create,
            item_id: None,
            input,
        }
    }

    pub fn update(list_key: &str, id: ItemId, input: Data) -> Self {
        Self {
            list_key: list_key.to_string(),
            operation: Operation::Update,
            item_id: Some(id),
            input,
        }
    }

    pub fn delete(list_key: &str, id: ItemId) -> Self {
        Self {
            list_key: list_key.to_string(),
            operation: Operation::Delete,
            item_id: Some(id),
            input: Data::new(),
        }
    }
}

/// Result of a mutation whose write committed.
#[derive(Debug)]
pub struct MutationOutcome {
    pub operation: Operation,
    /// Row as written; `None` after a delete.
    pub item: Option<Item>,
    /// Row before the write; `None` after a create.
    pub original_item: Option<Item>,
    /// Faults raised by `afterOperation` hooks. The write stands regardless.
    pub after_operation_faults: Vec<HookFault>,
    /// Stages visited, starting at `Pending`.
    pub stages: Vec<MutationStage>,
}

impl MutationOutcome {
    /// True when no `afterOperation` hook failed.
    pub fn is_clean(&self) -> bool {
        self.after_operation_faults.is_empty()
    }
}

/// Executes mutations against a store using a frozen hook registry.
///
/// Cheap to clone; clones share the registry and store.
#[derive(Clone)]
pub struct MutationPipeline {
    registry: Arc<HookRegistry>,
    store: Arc<dyn ItemStore>,
    config: Arc<EngineConfig>,
}

impl MutationPipeline {
    pub fn new(registry: HookRegistry, store: Arc<dyn ItemStore>) -> Self {
        Self::with_config(registry, store, EngineConfig::default())
    }

    pub fn with_config(
        registry: HookRegistry,
        store: Arc<dyn ItemStore>,
        config: EngineConfig,
    ) -> Self {
        Self {
            registry: Arc::new(registry),
            store,
            config: Arc::new(config),
        }
    }

    pub fn registry(&self) -> &HookRegistry {
        &self.registry
    }

    pub fn store(&self) -> &dyn ItemStore {
        self.store.as_ref()
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// A fresh context bound to this pipeline's store, with no session.
    pub fn context(&self) -> HookContext {
        HookContext::new(Arc::clone(&self.store))
    }

    pub async fn create(&self, list_key: &str, input: Data) -> MutationResult<MutationOutcome> {
        self.execute(MutationRequest::create(list_key, input), self.context())
            .await
    }

    pub async fn update(
        &self,
        list_key: &str,
        id: ItemId,
        input: Data,
    ) -> MutationResult<MutationOutcome> {
        self.execute(MutationRequest::update(list_key, id, input), self.context())
            .await
    }

    pub async fn delete(&self, list_key: &str, id: ItemId) -> MutationResult<MutationOutcome> {
        self.execute(MutationRequest::delete(list_key, id), self.context())
            .await
    }

    /// Runs field-type resolution and the `resolveInput` stage only, returning
    /// the data that would be validated. Nothing is validated or written.
    pub async fn resolve_input(
        &self,
        request: &MutationRequest,
        context: &HookContext,
    ) -> MutationResult<Data> {
        let list = self.list(&request.list_key)?;
        let item = self
            .load_target(&request.list_key, request.operation, request.item_id)
            .await?;
        let resolved =
            resolve_field_types(list.config(), request.operation, &request.input, &self.config)?;
        run_resolve_input(
            &list,
            request.operation,
            &request.input,
            resolved,
            item.as_ref(),
            context,
        )
        .await
        .map_err(MutationError::Resolution)
    }

    /// Runs one mutation through the full hook pipeline.
    pub async fn execute(
        &self,
        request: MutationRequest,
        context: HookContext,
    ) -> MutationResult<MutationOutcome> {
        let MutationRequest {
            list_key,
            operation,
            item_id,
            input,
        } = request;
        let list = self.list(&list_key)?;
        let mut tracker = StageTracker::new(context.request_id(), &list_key, operation);

        let original_item = match self.load_target(&list_key, operation, item_id).await {
            Ok(item) => item,
            Err(e) => return Err(abort(&mut tracker, e)),
        };
        let resolved = match resolve_field_types(list.config(), operation, &input, &self.config) {
            Ok(data) => data,
            Err(e) => return Err(abort(&mut tracker, e)),
        };

        tracker.advance(MutationStage::ResolvingInput);
        let resolved = match run_resolve_input(
            &list,
            operation,
            &input,
            resolved,
            original_item.as_ref(),
            &context,
        )
        .await
        {
            Ok(data) => data,
            Err(fault) => return Err(abort(&mut tracker, MutationError::Resolution(fault))),
        };

        tracker.advance(MutationStage::Validating);
        let messages = match run_validate_input(
            &list,
            operation,
            &input,
            &resolved,
            original_item.as_ref(),
            &context,
        )
        .await
        {
            Ok(messages) => messages,
            Err(fault) => return Err(abort(&mut tracker, MutationError::ValidationHook(fault))),
        };
        if !messages.is_empty() {
            let failure = ValidationFailure {
                list_key,
                operation,
                messages,
            };
            return Err(abort(&mut tracker, MutationError::Validation(failure)));
        }

        tracker.advance(MutationStage::BeforeOperation);
        if let Err(fault) = run_before_operation(
            &list,
            operation,
            &input,
            &resolved,
            original_item.as_ref(),
            &context,
        )
        .await
        {
            return Err(abort(&mut tracker, MutationError::Precondition(fault)));
        }

        tracker.advance(MutationStage::Writing);
        let commit = Commit {
            store: Arc::clone(&self.store),
            list,
            context,
            operation,
            input,
            resolved,
            original_item,
            tracker,
        };
        tokio::spawn(commit.run())
            .await
            .map_err(|e| MutationError::Interrupted(e.to_string()))?
    }

    fn list(&self, list_key: &str) -> MutationResult<Arc<ListHooks>> {
        self.registry
            .list(list_key)
            .cloned()
            .ok_or_else(|| MutationError::UnknownList(list_key.to_string()))
    }

    async fn load_target(
        &self,
        list_key: &str,
        operation: Operation,
        item_id: Option<ItemId>,
    ) -> MutationResult<Option<Item>> {
        if !operation.targets_existing() {
            return Ok(None);
        }
        let id = item_id.ok_or_else(|| MutationError::MissingItemId {
            list_key: list_key.to_string(),
            operation,
        })?;
        let item = self
            .store
            .get(list_key, id)
            .await?
            .ok_or_else(|| MutationError::ItemNotFound {
                list_key: list_key.to_string(),
                id,
            })?;
        Ok(Some(item))
    }
}

fn abort(tracker: &mut StageTracker, error: MutationError) -> MutationError {
    let stage = tracker.current();
    tracker.advance(MutationStage::Aborted);
    match &error {
        MutationError::Validation(failure) => {
            info!(
                list = %failure.list_key,
                errors = failure.messages.len(),
                "Mutation rejected by validation"
            );
        }
        other => warn!(%stage, "Mutation aborted: {}", other),
    }
    error
}

/// The write and the `afterOperation` stage, run as one detached task.
struct Commit {
    store: Arc<dyn ItemStore>,
    list: Arc<ListHooks>,
    context: HookContext,
    operation: Operation,
    input: Data,
    resolved: Data,
    original_item: Option<Item>,
    tracker: StageTracker,
}

impl Commit {
    async fn run(mut self) -> MutationResult<MutationOutcome> {
        let list_key = self.list.key();
        let written = match (self.operation, &self.original_item) {
            (Operation::Create, _) => {
                self.store.create(list_key, self.resolved.clone()).await.map(Some)
            }
            (Operation::Update, Some(original)) => self
                .store
                .update(list_key, original.id, self.resolved.clone())
                .await
                .map(Some),
            (Operation::Delete, Some(original)) => {
                self.store.delete(list_key, original.id).await.map(|_| None)
            }
            (operation, None) => Err(StorageError::InvalidData(format!(
                "{operation} without a loaded target item"
            ))),
        };
        let item = match written {
            Ok(item) => item,
            Err(e) => return Err(abort(&mut self.tracker, MutationError::Store(e))),
        };
        self.tracker.advance(MutationStage::Written);

        self.tracker.advance(MutationStage::AfterOperation);
        let faults = run_after_operation(
            &self.list,
            self.operation,
            &self.input,
            &self.resolved,
            item.as_ref(),
            self.original_item.as_ref(),
            &self.context,
        )
        .await;
        for fault in &faults {
            error!(
                request = %self.context.request_id(),
                "afterOperation fault after committed {}: {}",
                self.operation,
                fault
            );
        }

        self.tracker.advance(MutationStage::Completed);
        info!(
            list = %list_key,
            operation = %self.operation,
            faults = faults.len(),
            "Mutation completed"
        );

        Ok(MutationOutcome {
            operation: self.operation,
            item,
            original_item: self.original_item,
            after_operation_faults: faults,
            stages: self.tracker.into_history(),
        })
    }
}

async fn run_resolve_input(
    list: &ListHooks,
    operation: Operation,
    input: &Data,
    mut resolved: Data,
    item: Option<&Item>,
    context: &HookContext,
) -> Result<Data, HookFault> {
    for binding in list.bindings() {
        resolved = binding
            .hooks()
            .resolve_input(ResolveInputArgs {
                list_key: list.key(),
                field_key: binding.field_key(),
                operation,
                input_data: input,
                resolved_data: resolved,
                item,
                context,
            })
            .await
            .map_err(|e| {
                HookFault::new(HookStage::ResolveInput, list.key(), binding.field_key(), e)
            })?;
    }
    Ok(resolved)
}

async fn run_validate_input(
    list: &ListHooks,
    operation: Operation,
    input: &Data,
    resolved: &Data,
    item: Option<&Item>,
    context: &HookContext,
) -> Result<Vec<ValidationMessage>, HookFault> {
    let mut messages = Vec::new();
    for binding in list.bindings() {
        let mut collector = ValidationCollector::new(binding.field_key().cloned());
        binding
            .hooks()
            .validate_input(
                ValidateInputArgs {
                    list_key: list.key(),
                    field_key: binding.field_key(),
                    operation,
                    input_data: input,
                    resolved_data: resolved,
                    item,
                    context,
                },
                &mut collector,
            )
            .await
            .map_err(|e| {
                HookFault::new(HookStage::ValidateInput, list.key(), binding.field_key(), e)
            })?;
        messages.extend(collector.into_messages());
    }
    Ok(messages)
}

async fn run_before_operation(
    list: &ListHooks,
    operation: Operation,
    input: &Data,
    resolved: &Data,
    item: Option<&Item>,
    context: &HookContext,
) -> Result<(), HookFault> {
    for binding in list.bindings() {
        binding
            .hooks()
            .before_operation(BeforeOperationArgs {
                list_key: list.key(),
                field_key: binding.field_key(),
                operation,
                input_data: input,
                resolved_data: resolved,
                item,
                context,
            })
            .await
            .map_err(|e| {
                HookFault::new(HookStage::BeforeOperation, list.key(), binding.field_key(), e)
            })?;
    }
    Ok(())
}

/// Runs every `afterOperation` hook, collecting faults instead of stopping.
/// A panicking hook is recorded as a fault like any other error.
async fn run_after_operation(
    list: &ListHooks,
    operation: Operation,
    input: &Data,
    resolved: &Data,
    item: Option<&Item>,
    original_item: Option<&Item>,
    context: &HookContext,
) -> Vec<HookFault> {
    let mut faults = Vec::new();
    for binding in list.bindings() {
        let call = binding.hooks().after_operation(AfterOperationArgs {
            list_key: list.key(),
            field_key: binding.field_key(),
            operation,
            input_data: input,
            resolved_data: resolved,
            item,
            original_item,
            context,
        });
        let result = match AssertUnwindSafe(call).catch_unwind().await {
            Ok(result) => result,
            Err(payload) => Err(HookError::Panicked(panic_message(payload.as_ref()))),
        };
        if let Err(e) = result {
            faults.push(HookFault::new(
                HookStage::AfterOperation,
                list.key(),
                binding.field_key(),
                e,
            ));
        }
    }
    faults
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|s| (*s).to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "non-string panic payload".to_string())
}
