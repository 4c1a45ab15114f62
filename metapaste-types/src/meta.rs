//! The per-entity metadata collection.
//!
//! The host store allows several values under one key, so the collection is
//! a mapping from key to an ordered list of values. Both the key order and
//! the order inside each list follow insertion order; the JSON form is an
//! object of arrays, e.g. `{"color":["red","blue"]}`.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A single stored metadata value.
///
/// Host stores usually hold strings, but structured values produced by
/// deserializing a stored blob are kept as-is.
pub type MetaValue = serde_json::Value;

/// Ordered key → value-list mapping owned by one entity.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MetadataCollection(IndexMap<String, Vec<MetaValue>>);

impl MetadataCollection {
    /// Creates an empty collection.
    #[must_use]
    pub fn new() -> Self {
        Self(IndexMap::new())
    }

    /// Returns the values stored under `key`, in insertion order.
    pub fn get(&self, key: &str) -> Option<&[MetaValue]> {
        self.0.get(key).map(Vec::as_slice)
    }

    /// Returns the first value stored under `key`.
    pub fn first(&self, key: &str) -> Option<&MetaValue> {
        self.0.get(key).and_then(|values| values.first())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[MetaValue])> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// Number of distinct keys.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Appends a value under `key`, keeping any values already stored.
    pub fn add(&mut self, key: impl Into<String>, value: MetaValue) {
        self.0.entry(key.into()).or_default().push(value);
    }

    /// Removes every value under `key`. Returns the removed values, if any.
    ///
    /// The relative order of the remaining keys is preserved.
    pub fn remove(&mut self, key: &str) -> Option<Vec<MetaValue>> {
        self.0.shift_remove(key)
    }

    /// Replaces whatever is stored under `key` with exactly one value.
    ///
    /// An existing key keeps its position; a new key is appended.
    pub fn set_single(&mut self, key: impl Into<String>, value: MetaValue) {
        let slot = self.0.entry(key.into()).or_default();
        slot.clear();
        slot.push(value);
    }

    /// Serializes the collection as one compact JSON object.
    pub fn to_json_text(&self) -> crate::Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Parses a collection previously produced by [`Self::to_json_text`].
    pub fn from_json_text(text: &str) -> crate::Result<Self> {
        Ok(serde_json::from_str(text)?)
    }
}

impl FromIterator<(String, Vec<MetaValue>)> for MetadataCollection {
    fn from_iter<I: IntoIterator<Item = (String, Vec<MetaValue>)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a MetadataCollection {
    type Item = (&'a String, &'a Vec<MetaValue>);
    type IntoIter = indexmap::map::Iter<'a, String, Vec<MetaValue>>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
