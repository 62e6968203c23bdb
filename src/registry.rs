//! Named layout, style and text-style definitions.
//!
//! Components reference shared definitions by name instead of repeating them
//! inline. A name stands for one definition: once registered, later
//! registrations under the same name are ignored unless made through
//! [`Registry::replace`].

use std::collections::BTreeMap;

use serde_json::{Map, Value};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Registry {
    entries: BTreeMap<String, Value>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `definition` under `name` unless the name is taken.
    /// Returns whether it was added.
    pub fn register(&mut self, name: &str, definition: Value) -> bool {
        if self.entries.contains_key(name) {
            return false;
        }
        self.entries.insert(name.to_string(), definition);
        true
    }

    /// Register or redefine `name`, returning the previous definition.
    pub fn replace(&mut self, name: &str, definition: Value) -> Option<Value> {
        self.entries.insert(name.to_string(), definition)
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.entries.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Definitions as a JSON object, ordered by name.
    pub fn into_map(self) -> Map<String, Value> {
        self.entries.into_iter().collect()
    }
}
