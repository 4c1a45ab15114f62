//! In-process save-event dispatch.
//!
//! Every listener interested in an entity save registers here with a
//! priority. Listeners run lowest priority first. Any listener may suppress
//! the rest of the chain for the current request through its
//! [`SaveContext`]; the bulk editor does so after overwriting metadata so
//! that other integrations do not re-process half-applied data.
//!
//! The context is created per dispatch and dropped with it, so suppression
//! never leaks into another request.

use crate::error::EditorResult;
use crate::EditTarget;
use indexmap::IndexMap;
use metapaste_host::query;
use metapaste_types::Submission;
use std::sync::Arc;
use tracing::{debug, warn};

/// Priority the bulk editor registers at; runs before default listeners.
pub const EDITOR_PRIORITY: i32 = 1;

/// Priority for listeners that do not care about ordering.
pub const DEFAULT_PRIORITY: i32 = 10;

/// Request-scoped state shared by the listeners of one save.
#[derive(Debug, Default)]
pub struct SaveContext {
    suppressed_by: Option<String>,
    redirect_args: IndexMap<String, String>,
    handled_by: Vec<String>,
}

impl SaveContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stops every listener after the current one from running.
    pub fn suppress_remaining(&mut self, by: &str) {
        if self.suppressed_by.is_none() {
            self.suppressed_by = Some(by.to_string());
        }
    }

    pub fn is_suppressed(&self) -> bool {
        self.suppressed_by.is_some()
    }

    /// Name of the listener that suppressed the chain.
    pub fn suppressed_by(&self) -> Option<&str> {
        self.suppressed_by.as_deref()
    }

    /// Requests that the redirect following this save carry `name=value`.
    pub fn add_redirect_arg(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.redirect_args.insert(name.into(), value.into());
    }

    pub fn redirect_args(&self) -> &IndexMap<String, String> {
        &self.redirect_args
    }

    /// Applies the requested redirect arguments to the host's redirect target.
    pub fn redirect_location(&self, location: &str) -> String {
        self.redirect_args
            .iter()
            .fold(location.to_string(), |url, (name, value)| {
                query::add_query_arg(&url, name, value)
            })
    }

    /// Listeners that ran, in order.
    pub fn handled_by(&self) -> &[String] {
        &self.handled_by
    }
}

/// A participant in entity saves.
pub trait SaveListener: Send + Sync {
    /// Stable name used in logs and in [`SaveContext::handled_by`].
    fn name(&self) -> &str;

    fn on_save(
        &self,
        target: &EditTarget,
        submission: &Submission,
        ctx: &mut SaveContext,
    ) -> EditorResult<()>;
}

struct Registration {
    priority: i32,
    listener: Arc<dyn SaveListener>,
}

/// Ordered set of save listeners.
#[derive(Default)]
pub struct SaveDispatcher {
    listeners: Vec<Registration>,
}

impl SaveDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a listener. Equal priorities run in registration order.
    pub fn register(&mut self, priority: i32, listener: Arc<dyn SaveListener>) {
        let at = self
            .listeners
            .iter()
            .position(|r| r.priority > priority)
            .unwrap_or(self.listeners.len());
        self.listeners.insert(at, Registration { priority, listener });
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    /// Runs the listeners for one save and returns the request context.
    ///
    /// A listener error stops the chain and is returned.
    pub fn dispatch(&self, target: &EditTarget, submission: &Submission) -> EditorResult<SaveContext> {
        let mut ctx = SaveContext::new();
        for registration in &self.listeners {
            let name = registration.listener.name();
            if let Some(by) = ctx.suppressed_by() {
                debug!("Save listener '{}' suppressed by '{}' for {}", name, by, target.id);
                break;
            }
            if let Err(e) = registration.listener.on_save(target, submission, &mut ctx) {
                warn!("Save listener '{}' failed for {}: {}", name, target.id, e);
                return Err(e);
            }
            ctx.handled_by.push(name.to_string());
        }
        Ok(ctx)
    }
}
