//! Runtime policy hooks.
//!
//! Integrators adjust three decisions without touching configuration files:
//! which capability is required, which entity types get the panel, and
//! which extra keys are immune to bulk overwrite. Each hook is a closure
//! injected when the editor is built.

use crate::config::EditorConfig;
use indexmap::IndexSet;
use std::fmt;
use std::sync::Arc;

type CapabilityHook = Arc<dyn Fn(&str) -> String + Send + Sync>;
type EntityTypeHook = Arc<dyn Fn(&str) -> bool + Send + Sync>;
type ExcludedKeysHook = Arc<dyn Fn(&mut IndexSet<String>) + Send + Sync>;

/// Injected overrides for the editor's access and exclusion decisions.
#[derive(Clone, Default)]
pub struct EditorPolicy {
    capability: Option<CapabilityHook>,
    entity_type: Option<EntityTypeHook>,
    excluded_keys: Option<ExcludedKeysHook>,
}

impl EditorPolicy {
    /// A policy with no overrides: configuration decides everything.
    pub fn new() -> Self {
        Self::default()
    }

    /// Rewrites the required capability. Receives the configured one.
    #[must_use]
    pub fn with_capability(mut self, hook: impl Fn(&str) -> String + Send + Sync + 'static) -> Self {
        self.capability = Some(Arc::new(hook));
        self
    }

    /// Restricts the entity types the panel is offered for.
    #[must_use]
    pub fn with_entity_types(mut self, hook: impl Fn(&str) -> bool + Send + Sync + 'static) -> Self {
        self.entity_type = Some(Arc::new(hook));
        self
    }

    /// Extends the excluded-key set. The hook may add keys; removals of the
    /// built-in keys are undone.
    #[must_use]
    pub fn with_excluded_keys(
        mut self,
        hook: impl Fn(&mut IndexSet<String>) + Send + Sync + 'static,
    ) -> Self {
        self.excluded_keys = Some(Arc::new(hook));
        self
    }

    /// The capability the current user must hold.
    pub fn required_capability(&self, config: &EditorConfig) -> String {
        match &self.capability {
            Some(hook) => hook(&config.capability),
            None => config.capability.clone(),
        }
    }

    /// Whether the panel applies to `entity_type`. Both the configured list
    /// and the hook must agree.
    pub fn entity_type_allowed(&self, config: &EditorConfig, entity_type: &str) -> bool {
        config.allows_entity_type(entity_type)
            && self.entity_type.as_ref().is_none_or(|hook| hook(entity_type))
    }

    /// The final excluded-key set: configured keys, hook additions, and the
    /// built-in defaults.
    pub fn excluded_keys(&self, config: &EditorConfig) -> IndexSet<String> {
        let mut keys = config.excluded_keys.clone();
        if let Some(hook) = &self.excluded_keys {
            hook(&mut keys);
        }
        for key in crate::config::DEFAULT_EXCLUDED_KEYS {
            keys.insert(key.to_string());
        }
        keys
    }
}

impl fmt::Debug for EditorPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EditorPolicy")
            .field("capability", &self.capability.is_some())
            .field("entity_type", &self.entity_type.is_some())
            .field("excluded_keys", &self.excluded_keys.is_some())
            .finish()
    }
}
