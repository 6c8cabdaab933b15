//! Built-in field validation (`required`, `length`), run as the first
//! field-level validator of the field that declares it.

use async_trait::async_trait;
use hookline_model::{
    FieldConfig, HookResult, LengthBounds, MutationHooks, ValidateInputArgs, ValidationCollector,
};
use hookline_types::Operation;
use serde_json::Value;

#[derive(Debug, Clone)]
pub(crate) struct FieldRules {
    required: bool,
    length: Option<LengthBounds>,
}

impl FieldRules {
    /// Returns rules for a field, or `None` if it declares none.
    pub(crate) fn for_field(field: &FieldConfig) -> Option<Self> {
        field.has_builtin_validation().then(|| Self {
            required: field.required,
            length: field.length,
        })
    }

    fn check_required(
        &self,
        key: &str,
        operation: Operation,
        value: Option<&Value>,
    ) -> Option<String> {
        if !self.required {
            return None;
        }
        match value {
            // Updates leave omitted fields untouched.
            None if operation == Operation::Update => None,
            None | Some(Value::Null) => Some(format!("{key} is required")),
            Some(Value::String(s)) if s.is_empty() => Some(format!("{key} cannot be empty")),
            Some(_) => None,
        }
    }

    fn check_length(&self, key: &str, value: Option<&Value>) -> Option<String> {
        let bounds = self.length?;
        let len = value?.as_str()?.chars().count();
        if let Some(min) = bounds.min {
            if len < min {
                return Some(format!("{key} must be at least {min} characters"));
            }
        }
        if let Some(max) = bounds.max {
            if len > max {
                return Some(format!("{key} must be at most {max} characters"));
            }
        }
        None
    }
}

#[async_trait]
impl MutationHooks for FieldRules {
    async fn validate_input(
        &self,
        args: ValidateInputArgs<'_>,
        errors: &mut ValidationCollector,
    ) -> HookResult<()> {
        let Some(key) = args.field_key else {
            return Ok(());
        };
        if args.operation == Operation::Delete {
            return Ok(());
        }

        let value = args.resolved_data.get(key.as_str());
        if let Some(message) = self.check_required(key.as_str(), args.operation, value) {
            errors.add_validation_error(message);
            return Ok(());
        }
        if let Some(message) = self.check_length(key.as_str(), value) {
            errors.add_validation_error(message);
        }
        Ok(())
    }
}
