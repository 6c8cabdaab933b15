//! Hook registry: the frozen, ordered list of hooks per list.
//!
//! Order is fixed when the registry is built and is the same for all four
//! stages:
//! 1. list-level hooks, in registration order
//! 2. for each field in declaration order: built-in field rules (if any),
//!    then that field's hooks in registration order

use crate::builtin::FieldRules;
use hookline_model::{ConfigError, ConfigResult, ListConfig, MutationHooks, SchemaConfig};
use hookline_types::FieldKey;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// Where a hook is attached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HookScope {
    List,
    Field(FieldKey),
}

/// One registered hook and its scope.
#[derive(Clone)]
pub struct HookBinding {
    scope: HookScope,
    hooks: Arc<dyn MutationHooks>,
}

impl HookBinding {
    pub fn scope(&self) -> &HookScope {
        &self.scope
    }

    /// Field this hook is bound to; `None` for list-level hooks.
    pub fn field_key(&self) -> Option<&FieldKey> {
        match &self.scope {
            HookScope::List => None,
            HookScope::Field(key) => Some(key),
        }
    }

    pub fn hooks(&self) -> &dyn MutationHooks {
        self.hooks.as_ref()
    }
}

impl fmt::Debug for HookBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HookBinding")
            .field("scope", &self.scope)
            .finish_non_exhaustive()
    }
}

/// A list's configuration together with its ordered hooks.
#[derive(Debug)]
pub struct ListHooks {
    config: ListConfig,
    bindings: Vec<HookBinding>,
}

impl ListHooks {
    pub fn config(&self) -> &ListConfig {
        &self.config
    }

    pub fn key(&self) -> &str {
        &self.config.key
    }

    /// Hooks in execution order.
    pub fn bindings(&self) -> &[HookBinding] {
        &self.bindings
    }
}

/// Immutable mapping from list key to its ordered hooks.
#[derive(Debug, Default)]
pub struct HookRegistry {
    lists: HashMap<String, Arc<ListHooks>>,
}

impl HookRegistry {
    pub fn builder(schema: SchemaConfig) -> RegistryBuilder {
        RegistryBuilder {
            schema,
            list_hooks: Vec::new(),
            field_hooks: Vec::new(),
        }
    }

    pub fn list(&self, key: &str) -> Option<&Arc<ListHooks>> {
        self.lists.get(key)
    }

    pub fn list_keys(&self) -> impl Iterator<Item = &str> {
        self.lists.keys().map(String::as_str)
    }
}

/// Collects hook registrations before freezing them into a [`HookRegistry`].
pub struct RegistryBuilder {
    schema: SchemaConfig,
    list_hooks: Vec<(String, Arc<dyn MutationHooks>)>,
    field_hooks: Vec<(String, FieldKey, Arc<dyn MutationHooks>)>,
}

impl RegistryBuilder {
    /// Attaches hooks to a whole list.
    #[must_use]
    pub fn list_hooks(mut self, list_key: &str, hooks: Arc<dyn MutationHooks>) -> Self {
        self.list_hooks.push((list_key.to_string(), hooks));
        self
    }

    /// Attaches hooks to one field of a list. Several hooks on the same field
    /// all run, in registration order.
    #[must_use]
    pub fn field_hooks(
        mut self,
        list_key: &str,
        field_key: &str,
        hooks: Arc<dyn MutationHooks>,
    ) -> Self {
        self.field_hooks
            .push((list_key.to_string(), FieldKey::new(field_key), hooks));
        self
    }

    /// Validates the schema and every registration, then freezes the order.
    pub fn build(self) -> ConfigResult<HookRegistry> {
        self.schema.validate()?;

        for (list_key, _) in &self.list_hooks {
            if self.schema.list(list_key).is_none() {
                return Err(ConfigError::UnknownList(list_key.clone()));
            }
        }
        for (list_key, field_key, _) in &self.field_hooks {
            let list = self
                .schema
                .list(list_key)
                .ok_or_else(|| ConfigError::UnknownList(list_key.clone()))?;
            if list.field(field_key.as_str()).is_none() {
                return Err(ConfigError::UnknownField {
                    list: list_key.clone(),
                    field: field_key.to_string(),
                });
            }
        }

        let mut lists = HashMap::new();
        for config in self.schema.lists {
            let mut bindings: Vec<HookBinding> = self
                .list_hooks
                .iter()
                .filter(|(key, _)| *key == config.key)
                .map(|(_, hooks)| HookBinding {
                    scope: HookScope::List,
                    hooks: Arc::clone(hooks),
                })
                .collect();

            for field in &config.fields {
                if let Some(rules) = FieldRules::for_field(field) {
                    bindings.push(HookBinding {
                        scope: HookScope::Field(field.key.clone()),
                        hooks: Arc::new(rules),
                    });
                }
                bindings.extend(
                    self.field_hooks
                        .iter()
                        .filter(|(list, key, _)| *list == config.key && *key == field.key)
                        .map(|(_, key, hooks)| HookBinding {
                            scope: HookScope::Field(key.clone()),
                            hooks: Arc::clone(hooks),
                        }),
                );
            }

            debug!(list = %config.key, hooks = bindings.len(), "Registered list hooks");
            lists.insert(
                config.key.clone(),
                Arc::new(ListHooks { config, bindings }),
            );
        }

        Ok(HookRegistry { lists })
    }
}
