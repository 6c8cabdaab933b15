//! Mutation hook pipeline for Hookline.
//!
//! Every create, update and delete against a list goes through
//! [`MutationPipeline::execute`]:
//!
//! ```text
//! field-type resolution → resolveInput → validateInput → beforeOperation → write → afterOperation
//! ```
//!
//! Hooks are attached per list or per field through [`HookRegistry::builder`]
//! and run in one fixed order for every stage. See [`registry`] for the rules.

mod builtin;
mod config;
mod error;
mod pipeline;
pub mod registry;
mod resolve;
mod stage;

pub use config::EngineConfig;
pub use error::{HookFault, MutationError, MutationResult, ValidationFailure};
pub use pipeline::{MutationOutcome, MutationPipeline, MutationRequest};
pub use registry::{HookBinding, HookRegistry, HookScope, ListHooks, RegistryBuilder};
pub use resolve::{hash_password, resolve_field_types, verify_password};
pub use stage::MutationStage;
