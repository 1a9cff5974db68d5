//! A single named configuration profile.

use std::collections::btree_map::{self, BTreeMap};

use serde::{Deserialize, Serialize};

/// A flat key/value profile stored under a name in a [`ConfigFile`](crate::ConfigFile).
///
/// Keys are kept sorted, so serialized output is stable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConfigTarget(BTreeMap<String, String>);

impl ConfigTarget {
    /// Creates an empty target.
    pub fn new() -> Self {
        Self::default()
    }

    /// Assigns a value, replacing any previous one.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.0.insert(key.into(), value.into());
        self
    }

    /// Retrieves a value.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// Removes a value. Missing keys are ignored.
    pub fn delete(&mut self, key: &str) -> &mut Self {
        self.0.remove(key);
        self
    }

    /// Returns true if the key is present.
    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Iterates over key/value pairs in key order.
    pub fn iter(&self) -> btree_map::Iter<'_, String, String> {
        self.0.iter()
    }

    /// Number of values stored.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if no values are stored.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<BTreeMap<String, String>> for ConfigTarget {
    fn from(map: BTreeMap<String, String>) -> Self {
        Self(map)
    }
}

impl<K, V> FromIterator<(K, V)> for ConfigTarget
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

impl<'a> IntoIterator for &'a ConfigTarget {
    type Item = (&'a String, &'a String);
    type IntoIter = btree_map::Iter<'a, String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
