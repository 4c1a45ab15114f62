//! Editor configuration. Reads an optional `metapaste.toml` and falls back
//! to built-in defaults.
//!
//! ```toml
//! capability = "manage_options"
//! allowed_entity_types = ["post", "page"]
//! excluded_keys = ["_wp_old_slug"]
//! notice_query_arg = "pmcp_updated"
//! ```
//!
//! Excluded keys listed in the file are added to the defaults
//! (`_edit_lock`, `_edit_last`); they never replace them.

use indexmap::IndexSet;
use metapaste_types::Submission;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use tracing::{info, warn};

/// Default capability required to see and use the panel.
pub const DEFAULT_CAPABILITY: &str = "manage_options";

/// Namespace every anti-forgery token is bound to.
pub const DEFAULT_TOKEN_NAMESPACE: &str = "pmcp_bulk_meta_update";

/// Keys that reconciliation never touches, whatever the configuration says.
pub const DEFAULT_EXCLUDED_KEYS: [&str; 2] = ["_edit_lock", "_edit_last"];

/// Form field and query argument names used by the panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldNames {
    #[serde(default = "default_body_field")]
    pub body: String,
    #[serde(default = "default_apply_field")]
    pub apply: String,
    #[serde(default = "default_token_field")]
    pub token: String,
}

fn default_body_field() -> String {
    "pmcp_bulk_meta".to_string()
}

fn default_apply_field() -> String {
    "pmcp_update".to_string()
}

fn default_token_field() -> String {
    "pmcp_nonce".to_string()
}

impl Default for FieldNames {
    fn default() -> Self {
        Self {
            body: default_body_field(),
            apply: default_apply_field(),
            token: default_token_field(),
        }
    }
}

/// Static editor configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EditorConfig {
    /// Capability the current user must hold (before policy override).
    pub capability: String,
    /// Entity types the panel appears on. `None` means every type.
    pub allowed_entity_types: Option<Vec<String>>,
    /// Keys immune to bulk overwrite.
    pub excluded_keys: IndexSet<String>,
    /// Namespace anti-forgery tokens are bound to.
    pub token_namespace: String,
    pub fields: FieldNames,
    /// Query argument carried by the redirect after a bulk save.
    pub notice_query_arg: String,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            capability: DEFAULT_CAPABILITY.to_string(),
            allowed_entity_types: None,
            excluded_keys: DEFAULT_EXCLUDED_KEYS.iter().map(|k| k.to_string()).collect(),
            token_namespace: DEFAULT_TOKEN_NAMESPACE.to_string(),
            fields: FieldNames::default(),
            notice_query_arg: "pmcp_updated".to_string(),
        }
    }
}

impl EditorConfig {
    /// Loads configuration from `path`.
    /// A missing file yields defaults; an unreadable or invalid file yields
    /// defaults with a warning.
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            info!("No editor config at {:?}, using defaults", path);
            return Self::default();
        }

        match std::fs::read_to_string(path) {
            Ok(contents) => match Self::from_toml(&contents) {
                Ok(config) => {
                    info!("Loaded editor config from {:?}", path);
                    config
                }
                Err(e) => {
                    warn!("Failed to parse editor config {:?}: {}. Using defaults.", path, e);
                    Self::default()
                }
            },
            Err(e) => {
                warn!("Failed to read editor config {:?}: {}", path, e);
                Self::default()
            }
        }
    }

    /// Parses configuration text.
    pub fn from_toml(contents: &str) -> Result<Self, toml::de::Error> {
        toml::from_str::<ConfigFile>(contents).map(ConfigFile::into_config)
    }

    /// Whether `entity_type` is listed (or no list is configured).
    pub fn allows_entity_type(&self, entity_type: &str) -> bool {
        self.allowed_entity_types
            .as_ref()
            .is_none_or(|types| types.iter().any(|t| t == entity_type))
    }

    /// Builds a submission from decoded form fields.
    ///
    /// The apply checkbox counts as set when its value is non-empty and not
    /// `"0"`. A missing body becomes an empty string.
    pub fn submission_from_form(&self, form: &HashMap<String, String>) -> Submission {
        let apply = form
            .get(&self.fields.apply)
            .is_some_and(|v| !v.is_empty() && v != "0");
        Submission {
            body: form.get(&self.fields.body).cloned().unwrap_or_default(),
            apply,
            token: form.get(&self.fields.token).cloned(),
        }
    }
}

/// Raw TOML structure; every field is optional.
#[derive(Deserialize)]
struct ConfigFile {
    capability: Option<String>,
    allowed_entity_types: Option<Vec<String>>,
    #[serde(default)]
    excluded_keys: Vec<String>,
    token_namespace: Option<String>,
    #[serde(default)]
    fields: Option<FieldNames>,
    notice_query_arg: Option<String>,
}

impl ConfigFile {
    fn into_config(self) -> EditorConfig {
        let defaults = EditorConfig::default();
        let mut excluded_keys = defaults.excluded_keys;
        excluded_keys.extend(self.excluded_keys);

        EditorConfig {
            capability: self.capability.unwrap_or(defaults.capability),
            allowed_entity_types: self.allowed_entity_types,
            excluded_keys,
            token_namespace: self.token_namespace.unwrap_or(defaults.token_namespace),
            fields: self.fields.unwrap_or(defaults.fields),
            notice_query_arg: self.notice_query_arg.unwrap_or(defaults.notice_query_arg),
        }
    }
}
