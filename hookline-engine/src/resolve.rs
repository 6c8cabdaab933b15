//! Field-type resolution: turns raw input into the initial resolved data.
//!
//! Runs once per mutation, before any `resolveInput` hook. Each declared field
//! type checks (and for some types rewrites) its value:
//! - `timestamp` values are normalized to UTC RFC 3339
//! - `password` values are replaced by an Argon2id PHC hash
//! - on create, declared defaults fill absent fields

use crate::config::EngineConfig;
use crate::error::{MutationError, MutationResult};
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::{Algorithm, Argon2, Params, Version};
use chrono::{DateTime, SecondsFormat, Utc};
use hookline_model::{FieldConfig, FieldType, ListConfig};
use hookline_types::{Data, Operation};
use rand::rngs::OsRng;
use serde_json::Value;

/// Builds the initial resolved data for a mutation.
///
/// Delete mutations carry no data, so their resolved data is always empty.
pub fn resolve_field_types(
    list: &ListConfig,
    operation: Operation,
    input: &Data,
    config: &EngineConfig,
) -> MutationResult<Data> {
    if operation == Operation::Delete {
        return Ok(Data::new());
    }

    let mut resolved = Data::new();
    for (key, value) in input {
        match list.field(key) {
            Some(field) => {
                let value = resolve_value(&list.key, field, value, config)?;
                resolved.insert(key.clone(), value);
            }
            None if config.reject_unknown_fields => {
                return Err(MutationError::UnknownField {
                    list_key: list.key.clone(),
                    field: key.clone(),
                });
            }
            None => {
                resolved.insert(key.clone(), value.clone());
            }
        }
    }

    if operation == Operation::Create {
        for field in &list.fields {
            if let Some(default) = &field.default {
                if !resolved.contains_key(field.key.as_str()) {
                    resolved.insert(field.key.to_string(), default.clone());
                }
            }
        }
    }

    Ok(resolved)
}

fn resolve_value(
    list_key: &str,
    field: &FieldConfig,
    value: &Value,
    config: &EngineConfig,
) -> MutationResult<Value> {
    if value.is_null() {
        return Ok(Value::Null);
    }

    let invalid = |reason: String| MutationError::InvalidInput {
        list_key: list_key.to_string(),
        field: field.key.clone(),
        reason,
    };
    let expected = |what: &str| invalid(format!("expected {what}, got {}", json_kind(value)));

    match field.field_type {
        FieldType::Text => value
            .is_string()
            .then(|| value.clone())
            .ok_or_else(|| expected("a string")),
        FieldType::Integer => (value.is_i64() || value.is_u64())
            .then(|| value.clone())
            .ok_or_else(|| expected("an integer")),
        FieldType::Float => value
            .is_number()
            .then(|| value.clone())
            .ok_or_else(|| expected("a number")),
        FieldType::Checkbox => value
            .is_boolean()
            .then(|| value.clone())
            .ok_or_else(|| expected("a boolean")),
        FieldType::Json => Ok(value.clone()),
        FieldType::Timestamp => {
            let raw = value.as_str().ok_or_else(|| expected("an RFC 3339 string"))?;
            let parsed = DateTime::parse_from_rfc3339(raw)
                .map_err(|e| invalid(format!("invalid timestamp '{raw}': {e}")))?;
            Ok(Value::String(
                parsed
                    .with_timezone(&Utc)
                    .to_rfc3339_opts(SecondsFormat::Millis, true),
            ))
        }
        FieldType::Select => {
            let raw = value.as_str().ok_or_else(|| expected("a string"))?;
            let options = field.options.as_deref().unwrap_or_default();
            if options.iter().any(|o| o == raw) {
                Ok(value.clone())
            } else {
                Err(invalid(format!(
                    "'{raw}' is not one of [{}]",
                    options.join(", ")
                )))
            }
        }
        FieldType::Password => {
            let raw = value.as_str().ok_or_else(|| expected("a string"))?;
            hash_password(raw, config.password_pepper.as_deref()).map(Value::String)
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn password_hasher(pepper: Option<&str>) -> Result<Argon2<'_>, argon2::Error> {
    match pepper {
        Some(pepper) => Argon2::new_with_secret(
            pepper.as_bytes(),
            Algorithm::Argon2id,
            Version::V0x13,
            Params::default(),
        ),
        None => Ok(Argon2::new(
            Algorithm::Argon2id,
            Version::V0x13,
            Params::default(),
        )),
    }
}

/// Hashes a secret with Argon2id into a PHC string, using a fresh OS-random
/// salt. The pepper, if any, is the Argon2 secret.
pub fn hash_password(secret: &str, pepper: Option<&str>) -> MutationResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hasher =
        password_hasher(pepper).map_err(|e| MutationError::PasswordHash(e.to_string()))?;
    let hash = hasher
        .hash_password(secret.as_bytes(), &salt)
        .map_err(|e| MutationError::PasswordHash(e.to_string()))?;
    Ok(hash.to_string())
}

/// Checks a candidate secret against a value produced by [`hash_password`].
/// Malformed stored values never match.
pub fn verify_password(stored: &str, candidate: &str, pepper: Option<&str>) -> bool {
    let Ok(parsed) = PasswordHash::new(stored) else {
        return false;
    };
    password_hasher(pepper)
        .map(|hasher| hasher.verify_password(candidate.as_bytes(), &parsed).is_ok())
        .unwrap_or(false)
}
