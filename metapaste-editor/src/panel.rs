//! Editor panel renderer.
//!
//! Produces the "Post Meta Copy Paste" box shown on the edit screen: a
//! textarea prefilled with the entity's metadata as JSON, an unchecked
//! "update all meta" checkbox, and a hidden anti-forgery token.
//!
//! Rendering never writes to storage. When the current user lacks the
//! required capability, or the entity type is not allowed, no panel is
//! produced and the caller simply shows nothing.

use crate::config::{EditorConfig, FieldNames};
use crate::error::EditorResult;
use crate::policy::EditorPolicy;
use crate::EditTarget;
use metapaste_host::{CapabilityChecker, MetadataStore, TokenService};
use metapaste_types::EntityId;
use std::fmt::Write as _;
use std::sync::Arc;
use tracing::debug;

pub const PANEL_ID: &str = "pmcp-meta-box";
pub const PANEL_TITLE: &str = "Post Meta Copy Paste";
const BODY_LABEL: &str = "Bulk meta values";
const APPLY_LABEL: &str = "Update all meta?";
const DESCRIPTION: &str = "Checking this box will update all your custom fields based on the \
                           value above when you save/update the post.";
const TEXTAREA_ROWS: u32 = 10;

/// Display payload for one entity's panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetaPanel {
    pub entity_id: EntityId,
    pub entity_type: String,
    /// The whole metadata collection as one JSON text block.
    pub body: String,
    /// Always false when freshly rendered.
    pub apply_checked: bool,
    /// Token bound to the configured namespace.
    pub token: String,
    pub fields: FieldNames,
}

impl MetaPanel {
    pub fn id(&self) -> &'static str {
        PANEL_ID
    }

    pub fn title(&self) -> &'static str {
        PANEL_TITLE
    }

    /// Renders the inner markup of the box. The host supplies the frame.
    pub fn to_html(&self) -> String {
        let body_field = escape_html(&self.fields.body);
        let mut html = String::new();
        let _ = writeln!(
            html,
            r#"<p class="label"><label for="{body_field}">{BODY_LABEL}</label></p>"#
        );
        let _ = writeln!(
            html,
            r#"<p><textarea class="widefat" name="{body_field}" id="{body_field}" rows="{TEXTAREA_ROWS}">{}</textarea></p>"#,
            escape_html(&self.body)
        );
        let checked = if self.apply_checked { r#" checked="checked""# } else { "" };
        let _ = writeln!(
            html,
            r#"<p class="label"><label>{APPLY_LABEL} <input type="checkbox" name="{}" value="1"{checked}/></label></p>"#,
            escape_html(&self.fields.apply)
        );
        let _ = writeln!(html, r#"<p class="description">{DESCRIPTION}</p>"#);
        let _ = writeln!(
            html,
            r#"<input type="hidden" name="{}" value="{}"/>"#,
            escape_html(&self.fields.token),
            escape_html(&self.token)
        );
        html
    }
}

/// Escapes text for use in HTML element content and quoted attributes.
pub(crate) fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#039;"),
            _ => out.push(c),
        }
    }
    out
}

/// Builds [`MetaPanel`]s for callers allowed to see them.
pub struct PanelRenderer {
    store: Arc<dyn MetadataStore>,
    capabilities: Arc<dyn CapabilityChecker>,
    tokens: Arc<dyn TokenService>,
    config: Arc<EditorConfig>,
    policy: EditorPolicy,
}

impl PanelRenderer {
    pub fn new(
        store: Arc<dyn MetadataStore>,
        capabilities: Arc<dyn CapabilityChecker>,
        tokens: Arc<dyn TokenService>,
        config: Arc<EditorConfig>,
        policy: EditorPolicy,
    ) -> Self {
        Self {
            store,
            capabilities,
            tokens,
            config,
            policy,
        }
    }

    /// Whether the current user and the target's type pass both gates.
    pub fn is_visible(&self, target: &EditTarget) -> bool {
        let capability = self.policy.required_capability(&self.config);
        if !self.capabilities.current_user_can(&capability) {
            debug!("Panel hidden for {}: missing capability '{}'", target.id, capability);
            return false;
        }
        if !self.policy.entity_type_allowed(&self.config, &target.entity_type) {
            debug!("Panel hidden for {}: type '{}' not allowed", target.id, target.entity_type);
            return false;
        }
        true
    }

    /// Renders the panel, or `None` when a gate fails.
    pub fn render(&self, target: &EditTarget) -> EditorResult<Option<MetaPanel>> {
        if !self.is_visible(target) {
            return Ok(None);
        }

        let metadata = self.store.all_metadata(target.id)?;
        let body = metadata.to_json_text()?;

        Ok(Some(MetaPanel {
            entity_id: target.id,
            entity_type: target.entity_type.clone(),
            body,
            apply_checked: false,
            token: self.tokens.issue(&self.config.token_namespace),
            fields: self.config.fields.clone(),
        }))
    }
}
