//! Save-time submission payload.
//!
//! A [`Submission`] is created from the posted form at save time and consumed
//! once by the reconciler. Its body is expected to be a JSON object mapping
//! metadata keys to values; anything else decodes to an empty [`ChangeSet`].

use crate::MetaValue;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Raw request data posted from the editor panel.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Submission {
    /// The edited JSON text block, exactly as posted.
    pub body: String,
    /// Whether the operator ticked the "update all meta" checkbox.
    pub apply: bool,
    /// Anti-forgery token echoed back from the rendered panel.
    pub token: Option<String>,
}

impl Submission {
    /// Creates a submission carrying only a body. The apply flag is off and
    /// no token is attached.
    pub fn new(body: impl Into<String>) -> Self {
        Self {
            body: body.into(),
            apply: false,
            token: None,
        }
    }

    #[must_use]
    pub fn with_apply(mut self, apply: bool) -> Self {
        self.apply = apply;
        self
    }

    #[must_use]
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Decodes the body into a key → value change set.
    ///
    /// Invalid JSON, an empty body, and any top-level value that is not an
    /// object all yield an empty change set.
    pub fn changes(&self) -> ChangeSet {
        match serde_json::from_str::<Value>(&self.body) {
            Ok(Value::Object(entries)) => ChangeSet {
                entries,
                decoded: true,
            },
            _ => ChangeSet::default(),
        }
    }
}

/// The decoded form of a submission body.
///
/// Keys iterate in the order they appear in the submitted text.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChangeSet {
    entries: Map<String, Value>,
    decoded: bool,
}

impl ChangeSet {
    /// True when the body was a JSON object (possibly empty).
    pub fn decoded(&self) -> bool {
        self.decoded
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&MetaValue> {
        self.entries.get(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}

impl IntoIterator for ChangeSet {
    type Item = (String, MetaValue);
    type IntoIter = serde_json::map::IntoIter;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}
