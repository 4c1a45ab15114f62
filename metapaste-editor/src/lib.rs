//! Bulk post-meta editor.
//!
//! Shows an entity's custom metadata as one editable JSON block and, when
//! the operator opts in on save, overwrites the stored metadata from the
//! edited block.
//!
//! - [`PanelRenderer`]: capability/type-gated panel with an anti-forgery token
//! - [`BulkReconciler`]: applies a submission key by key
//! - [`SaveDispatcher`]: in-process save listeners with per-request suppression
//! - [`PostSaveNotice`]: one-time redirect marker and the follow-up notice
//! - [`BulkMetaEditor`]: wires the above from injected host services

mod config;
mod dispatch;
mod editor;
mod error;
mod notice;
mod panel;
mod policy;
mod reconciler;

pub use config::{
    EditorConfig, FieldNames, DEFAULT_CAPABILITY, DEFAULT_EXCLUDED_KEYS, DEFAULT_TOKEN_NAMESPACE,
};
pub use dispatch::{SaveContext, SaveDispatcher, SaveListener, DEFAULT_PRIORITY, EDITOR_PRIORITY};
pub use editor::{BulkMetaEditor, LISTENER_NAME};
pub use error::{EditorError, EditorResult};
pub use notice::{AdminNotice, NoticeKind, PostSaveNotice};
pub use panel::{MetaPanel, PanelRenderer, PANEL_ID, PANEL_TITLE};
pub use policy::EditorPolicy;
pub use reconciler::{BulkReconciler, KeyAction, ReconcileOutcome, ReconcileReport};

use metapaste_types::EntityId;

/// The entity being edited or saved, with the type name the panel is gated on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditTarget {
    pub id: EntityId,
    pub entity_type: String,
}

impl EditTarget {
    pub fn new(id: EntityId, entity_type: impl Into<String>) -> Self {
        Self {
            id,
            entity_type: entity_type.into(),
        }
    }
}
