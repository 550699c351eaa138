// src/env/variables.rs

//! Ordered, last-write-wins environment variable set.

use std::collections::HashSet;
use std::fmt;

use indexmap::IndexMap;

/// Placeholder printed instead of secret values.
pub const REDACTED: &str = "******";

/// Flat environment handed to the scanner process.
///
/// Keys keep the position of their first insertion; re-inserting a key
/// replaces its value. Keys written through [`insert_secret`] are remembered
/// so that [`redacted`] and `Debug` never print their values.
///
/// [`insert_secret`]: EnvironmentVariableSet::insert_secret
/// [`redacted`]: EnvironmentVariableSet::redacted
#[derive(Clone, Default, PartialEq)]
pub struct EnvironmentVariableSet {
    vars: IndexMap<String, String>,
    secret_keys: HashSet<String>,
}

impl EnvironmentVariableSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the current process environment.
    pub fn from_process() -> Self {
        std::env::vars().collect()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        self.secret_keys.remove(&key);
        self.vars.insert(key, value.into());
    }

    /// Insert a value that must never show up in logs.
    pub fn insert_secret(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        self.vars.insert(key.clone(), value.into());
        self.secret_keys.insert(key);
    }

    /// Overlay a whole layer; later entries win.
    pub fn extend_layer<I, K, V>(&mut self, layer: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        for (k, v) in layer {
            self.insert(k, v);
        }
    }

    /// Overlay another set, carrying over its secret markers.
    pub fn merge(&mut self, other: EnvironmentVariableSet) {
        for (k, v) in other.vars {
            if other.secret_keys.contains(&k) {
                self.insert_secret(k, v);
            } else {
                self.insert(k, v);
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars.get(key).map(String::as_str)
    }

    /// Value for `key` if it is set to something other than whitespace.
    pub fn get_non_blank(&self, key: &str) -> Option<&str> {
        self.get(key).filter(|v| !v.trim().is_empty())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.vars.contains_key(key)
    }

    pub fn is_secret(&self, key: &str) -> bool {
        self.secret_keys.contains(key)
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.vars.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.vars.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Like [`iter`](Self::iter) but with secret values masked.
    pub fn redacted(&self) -> impl Iterator<Item = (&str, &str)> {
        self.vars.iter().map(|(k, v)| {
            if self.secret_keys.contains(k) {
                (k.as_str(), REDACTED)
            } else {
                (k.as_str(), v.as_str())
            }
        })
    }
}

impl fmt::Debug for EnvironmentVariableSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.redacted()).finish()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for EnvironmentVariableSet {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut set = EnvironmentVariableSet::new();
        set.extend_layer(iter);
        set
    }
}
