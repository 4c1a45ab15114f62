//! The bulk meta editor, one coordinator per process or request scope.
//!
//! Owns the renderer, the reconciler, and the notice marker, all built from
//! the same injected host services, configuration, and policy. Hosts wire it
//! into their save pipeline either by calling [`BulkMetaEditor::handle_save`]
//! directly or by registering it on a [`SaveDispatcher`].

use crate::config::EditorConfig;
use crate::dispatch::{SaveContext, SaveDispatcher, SaveListener, EDITOR_PRIORITY};
use crate::error::EditorResult;
use crate::notice::{AdminNotice, PostSaveNotice};
use crate::panel::{MetaPanel, PanelRenderer};
use crate::policy::EditorPolicy;
use crate::reconciler::{BulkReconciler, ReconcileOutcome};
use crate::EditTarget;
use metapaste_host::HostServices;
use metapaste_types::Submission;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::info;

/// Listener name used when suppressing the rest of a save.
pub const LISTENER_NAME: &str = "metapaste.bulk-editor";

pub struct BulkMetaEditor {
    config: Arc<EditorConfig>,
    renderer: PanelRenderer,
    reconciler: BulkReconciler,
    notice: PostSaveNotice,
}

impl BulkMetaEditor {
    pub fn new(services: HostServices, config: EditorConfig, policy: EditorPolicy) -> Self {
        let config = Arc::new(config);
        let excluded = policy.excluded_keys(&config);
        let reconciler = BulkReconciler::new(
            Arc::clone(&services.store),
            Arc::clone(&services.codec),
            Arc::clone(&services.tokens),
            config.token_namespace.clone(),
            excluded,
        );
        let renderer = PanelRenderer::new(
            services.store,
            services.capabilities,
            services.tokens,
            Arc::clone(&config),
            policy,
        );
        let notice = PostSaveNotice::new(config.notice_query_arg.clone());

        Self {
            config,
            renderer,
            reconciler,
            notice,
        }
    }

    /// Builds an editor with default configuration and no policy overrides.
    pub fn with_defaults(services: HostServices) -> Self {
        Self::new(services, EditorConfig::default(), EditorPolicy::new())
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn reconciler(&self) -> &BulkReconciler {
        &self.reconciler
    }

    /// Registers this editor on a dispatcher at [`EDITOR_PRIORITY`].
    pub fn install(self: &Arc<Self>, dispatcher: &mut SaveDispatcher) {
        dispatcher.register(EDITOR_PRIORITY, Arc::clone(self) as Arc<dyn SaveListener>);
    }

    /// Renders the panel for an edit screen, or `None` when it must not be shown.
    pub fn render_panel(&self, target: &EditTarget) -> EditorResult<Option<MetaPanel>> {
        self.renderer.render(target)
    }

    /// Builds a submission from posted form fields.
    pub fn submission_from_form(&self, form: &HashMap<String, String>) -> Submission {
        self.config.submission_from_form(form)
    }

    /// Reconciles one save. On success the rest of the save chain is
    /// suppressed and the next redirect is marked for the notice.
    pub fn handle_save(
        &self,
        target: &EditTarget,
        submission: &Submission,
        ctx: &mut SaveContext,
    ) -> EditorResult<ReconcileOutcome> {
        let outcome = self.reconciler.reconcile(target.id, submission)?;
        if outcome.is_applied() {
            ctx.suppress_remaining(LISTENER_NAME);
            self.notice.mark(ctx);
            info!("Suppressed remaining save listeners for {}", target.id);
        }
        Ok(outcome)
    }

    /// The notice for an admin screen request to `url`, if it carries the marker.
    pub fn admin_notice(&self, url: &str) -> Option<AdminNotice> {
        self.notice.notice_for(url)
    }

    /// Adds the marker to the host's removable query arguments.
    pub fn removable_query_args(&self, existing: Vec<String>) -> Vec<String> {
        self.notice.removable_query_args(existing)
    }

    /// `url` with the marker (and the host's other removable arguments) stripped.
    pub fn displayed_url(&self, url: &str, host_removable: Vec<String>) -> String {
        let removable = self.removable_query_args(host_removable);
        self.notice.displayed_url(url, &removable)
    }
}

impl SaveListener for BulkMetaEditor {
    fn name(&self) -> &str {
        LISTENER_NAME
    }

    fn on_save(
        &self,
        target: &EditTarget,
        submission: &Submission,
        ctx: &mut SaveContext,
    ) -> EditorResult<()> {
        self.handle_save(target, submission, ctx).map(|_| ())
    }
}
