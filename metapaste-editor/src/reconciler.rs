//! Bulk reconciler - overwrites stored metadata from a submitted text block.
//!
//! Gates, in order: the apply flag must be set, then the anti-forgery token
//! must verify against the fixed namespace. Failing either gate is a silent
//! no-op. Past the gates, every key in the decoded body is applied in
//! document order:
//!
//! - excluded keys are skipped without a read or write;
//! - a list replaces every stored value for the key, in submitted order;
//! - a serialized string is decoded and stored as the single value;
//! - anything else is stored verbatim as the single value (`null` included).
//!
//! Keys absent from the body are left alone.

use indexmap::IndexSet;
use metapaste_host::{MetadataStore, ScalarCodec, TokenService};
use metapaste_types::{EntityId, MetaValue, Submission};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info};

use crate::error::EditorResult;

/// What happened to one submitted key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyAction {
    /// Key is excluded; nothing was read or written.
    Skipped,
    /// All stored values were replaced by `count` submitted values.
    ReplacedList { count: usize },
    /// A serialized string was decoded and stored as the single value.
    SetDecoded,
    /// The submitted value was stored as the single value.
    SetSingle,
}

/// Per-key record of one applied reconciliation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconcileReport {
    pub entity_id: EntityId,
    /// False when the body was not a JSON object and was treated as empty.
    pub body_decoded: bool,
    pub actions: Vec<(String, KeyAction)>,
}

impl ReconcileReport {
    fn new(entity_id: EntityId, body_decoded: bool) -> Self {
        Self {
            entity_id,
            body_decoded,
            actions: Vec::new(),
        }
    }

    /// Keys that were written, in application order.
    pub fn written_keys(&self) -> Vec<&str> {
        self.actions
            .iter()
            .filter(|(_, action)| *action != KeyAction::Skipped)
            .map(|(key, _)| key.as_str())
            .collect()
    }

    /// Keys that were skipped because they are excluded.
    pub fn skipped_keys(&self) -> Vec<&str> {
        self.actions
            .iter()
            .filter(|(_, action)| *action == KeyAction::Skipped)
            .map(|(key, _)| key.as_str())
            .collect()
    }

    pub fn action_for(&self, key: &str) -> Option<&KeyAction> {
        self.actions.iter().find(|(k, _)| k == key).map(|(_, a)| a)
    }
}

/// Result of handing a submission to the reconciler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReconcileOutcome {
    /// The apply flag was not set.
    NotRequested,
    /// The token was missing or did not verify.
    InvalidToken,
    /// Gates passed and the body was applied (possibly as an empty change set).
    Applied(ReconcileReport),
}

impl ReconcileOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied(_))
    }

    pub fn report(&self) -> Option<&ReconcileReport> {
        match self {
            Self::Applied(report) => Some(report),
            _ => None,
        }
    }
}

/// Applies submissions against one host metadata store.
pub struct BulkReconciler {
    store: Arc<dyn MetadataStore>,
    codec: Arc<dyn ScalarCodec>,
    tokens: Arc<dyn TokenService>,
    namespace: String,
    excluded: IndexSet<String>,
}

impl BulkReconciler {
    pub fn new(
        store: Arc<dyn MetadataStore>,
        codec: Arc<dyn ScalarCodec>,
        tokens: Arc<dyn TokenService>,
        namespace: impl Into<String>,
        excluded: IndexSet<String>,
    ) -> Self {
        Self {
            store,
            codec,
            tokens,
            namespace: namespace.into(),
            excluded,
        }
    }

    pub fn excluded_keys(&self) -> &IndexSet<String> {
        &self.excluded
    }

    pub fn is_excluded(&self, key: &str) -> bool {
        self.excluded.contains(key)
    }

    /// Runs both gates and, when they pass, applies the submission.
    ///
    /// Store failures abort the run and propagate; keys already written stay
    /// written, as the host offers no transaction.
    pub fn reconcile(&self, entity: EntityId, submission: &Submission) -> EditorResult<ReconcileOutcome> {
        if !submission.apply {
            debug!("Bulk update not requested for {}", entity);
            return Ok(ReconcileOutcome::NotRequested);
        }

        let token_ok = submission
            .token
            .as_deref()
            .is_some_and(|t| self.tokens.verify(t, &self.namespace));
        if !token_ok {
            debug!("Bulk update for {} ignored: token missing or invalid", entity);
            return Ok(ReconcileOutcome::InvalidToken);
        }

        let changes = submission.changes();
        let mut report = ReconcileReport::new(entity, changes.decoded());

        for (key, value) in changes {
            if self.is_excluded(&key) {
                debug!("Skipping excluded key {} on {}", key, entity);
                report.actions.push((key, KeyAction::Skipped));
                continue;
            }
            let action = self.apply_key(entity, &key, value)?;
            report.actions.push((key, action));
        }

        info!(
            "Bulk meta update applied to {}: {} written, {} skipped",
            entity,
            report.written_keys().len(),
            report.skipped_keys().len()
        );
        Ok(ReconcileOutcome::Applied(report))
    }

    fn apply_key(&self, entity: EntityId, key: &str, value: MetaValue) -> EditorResult<KeyAction> {
        match value {
            Value::Array(items) => {
                // Delete first: a shorter list must not leave stale tail values.
                self.store.delete_all(entity, key)?;
                let count = items.len();
                for item in items {
                    self.store.add_value(entity, key, item)?;
                }
                debug!("Replaced {} with {} values on {}", key, count, entity);
                Ok(KeyAction::ReplacedList { count })
            }
            Value::String(raw) if self.codec.is_serialized(&raw) => {
                match self.codec.deserialize(&raw) {
                    Some(decoded) => {
                        self.store.set_single(entity, key, decoded)?;
                        Ok(KeyAction::SetDecoded)
                    }
                    None => {
                        debug!("Could not decode serialized value for {}; storing raw", key);
                        self.store.set_single(entity, key, Value::String(raw))?;
                        Ok(KeyAction::SetSingle)
                    }
                }
            }
            other => {
                self.store.set_single(entity, key, other)?;
                Ok(KeyAction::SetSingle)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report() -> ReconcileReport {
        let mut report = ReconcileReport::new(EntityId::new(42), true);
        report.actions = vec![
            ("_edit_lock".into(), KeyAction::Skipped),
            ("tags".into(), KeyAction::ReplacedList { count: 2 }),
            ("width".into(), KeyAction::SetDecoded),
            ("_edit_last".into(), KeyAction::Skipped),
            ("color".into(), KeyAction::SetSingle),
        ];
        report
    }

    #[test]
    fn written_keys_keep_application_order() {
        assert_eq!(report().written_keys(), vec!["tags", "width", "color"]);
    }

    #[test]
    fn skipped_keys_are_the_excluded_ones() {
        assert_eq!(report().skipped_keys(), vec!["_edit_lock", "_edit_last"]);
    }

    #[test]
    fn action_for_looks_up_by_key() {
        let report = report();
        assert_eq!(
            report.action_for("tags"),
            Some(&KeyAction::ReplacedList { count: 2 })
        );
        assert_eq!(report.action_for("_edit_lock"), Some(&KeyAction::Skipped));
        assert_eq!(report.action_for("missing"), None);
    }

    #[test]
    fn empty_report_has_no_keys() {
        let report = ReconcileReport::new(EntityId::new(1), false);
        assert!(report.written_keys().is_empty());
        assert!(report.skipped_keys().is_empty());
        assert!(!report.body_decoded);
    }

    #[test]
    fn only_applied_outcomes_carry_a_report() {
        assert!(!ReconcileOutcome::NotRequested.is_applied());
        assert!(ReconcileOutcome::InvalidToken.report().is_none());

        let applied = ReconcileOutcome::Applied(report());
        assert!(applied.is_applied());
        assert_eq!(applied.report().map(|r| r.entity_id), Some(EntityId::new(42)));
    }
}
