//! Named entry sets and the entry-name rule.

use std::collections::btree_map::{self, BTreeMap};

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{PodError, Result};
use crate::hash::PodHasher;
use crate::types::ContentId;
use crate::value::PodValue;

/// Check an entry name against `^[A-Za-z_]\w*$` (ASCII word characters).
pub fn check_pod_name(name: &str) -> Result<()> {
    let mut chars = name.chars();
    let head_ok = chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_');
    if head_ok && chars.all(|c| c.is_ascii_alphanumeric() || c == '_') {
        Ok(())
    } else {
        Err(PodError::EntryName(name.to_string()))
    }
}

/// A mapping from entry name to value.
///
/// Iteration order is byte-wise by name, which is also the order used for
/// content IDs and canonical JSON.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PodEntries(BTreeMap<String, PodValue>);

impl PodEntries {
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Insert an entry, returning the previous value under that name.
    ///
    /// Names and values are not checked here; see [`PodEntries::check`].
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<PodValue>) -> Option<PodValue> {
        self.0.insert(name.into(), value.into())
    }

    pub fn get(&self, name: &str) -> Option<&PodValue> {
        self.0.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn remove(&mut self, name: &str) -> Option<PodValue> {
        self.0.remove(name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Entries in name order.
    pub fn iter(&self) -> btree_map::Iter<'_, String, PodValue> {
        self.0.iter()
    }

    /// Entry names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Check every name and every value.
    pub fn check(&self) -> Result<()> {
        for (name, value) in &self.0 {
            check_pod_name(name)?;
            value.check().map_err(|e| e.in_entry(name))?;
        }
        Ok(())
    }

    /// Compute the content ID of this entry set.
    pub fn content_id(&self) -> Result<ContentId> {
        PodHasher::new().content_id(self)
    }

    /// Canonical JSON object for these entries.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|e| PodError::ValueFormat(e.to_string()))
    }

    /// Parse and check a JSON entries object.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| PodError::ValueFormat(e.to_string()))
    }

    pub fn into_inner(self) -> BTreeMap<String, PodValue> {
        self.0
    }
}

impl From<BTreeMap<String, PodValue>> for PodEntries {
    fn from(map: BTreeMap<String, PodValue>) -> Self {
        Self(map)
    }
}

impl<K: Into<String>, V: Into<PodValue>> FromIterator<(K, V)> for PodEntries {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

impl<K: Into<String>, V: Into<PodValue>> Extend<(K, V)> for PodEntries {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        self.0.extend(iter.into_iter().map(|(k, v)| (k.into(), v.into())));
    }
}

impl IntoIterator for PodEntries {
    type Item = (String, PodValue);
    type IntoIter = btree_map::IntoIter<String, PodValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a PodEntries {
    type Item = (&'a String, &'a PodValue);
    type IntoIter = btree_map::Iter<'a, String, PodValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl Serialize for PodEntries {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.0.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for PodEntries {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let map = BTreeMap::<String, PodValue>::deserialize(deserializer)?;
        let entries = PodEntries(map);
        for name in entries.names() {
            check_pod_name(name).map_err(serde::de::Error::custom)?;
        }
        Ok(entries)
    }
}
