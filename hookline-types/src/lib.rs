//! Core type definitions for Hookline.
//!
//! This crate defines the request-scoped values that flow through a
//! mutation's hook pipeline:
//! - Item and request identifiers (UUID v7)
//! - [`Operation`]: create, update or delete
//! - [`Item`]: a stored row of a list, with its JSON field data
//! - [`FieldKey`]: the field a field-level hook is bound to
//! - [`Session`]: the optional caller identity carried by a hook context
//!
//! Nothing here knows about hooks or storage; those live in
//! `hookline-model` and `hookline-store`.

mod ids;
mod item;
mod operation;
mod session;

pub use ids::{ItemId, RequestId};
pub use item::{Data, FieldKey, Item, data_from_value};
pub use operation::Operation;
pub use session::Session;

/// Result type alias using the crate's error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in type operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("invalid UUID: {0}")]
    InvalidUuid(#[from] uuid::Error),

    #[error("unknown operation: {0}")]
    UnknownOperation(String),

    #[error("expected a JSON object, got {0}")]
    NotAnObject(&'static str),
}
