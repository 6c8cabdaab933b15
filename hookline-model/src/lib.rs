//! List model and hook contract for Hookline.
//!
//! Defines what the mutation pipeline is configured with and what it calls:
//! - [`SchemaConfig`] / [`ListConfig`] / [`FieldConfig`]: lists and their
//!   fields in declaration order, loadable from TOML
//! - [`MutationHooks`]: the four lifecycle callbacks (`resolve_input`,
//!   `validate_input`, `before_operation`, `after_operation`)
//! - [`ValidationCollector`]: per-invocation sink for validation messages
//! - [`HookContext`]: opaque handle passed to every hook
//!
//! The engine crate turns these into an ordered registry and runs them.

mod config;
mod context;
mod hooks;
mod schema;
mod validation;

pub use config::{ConfigError, ConfigResult};
pub use context::HookContext;
pub use hooks::{
    AfterOperationArgs, BeforeOperationArgs, HookError, HookResult, HookStage, MutationHooks,
    ResolveInputArgs, ValidateInputArgs,
};
pub use schema::{FieldConfig, FieldType, LengthBounds, ListConfig, SchemaConfig};
pub use validation::{ValidationCollector, ValidationMessage};
