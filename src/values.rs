//! Insertion-ordered name/value maps.
//!
//! Match results and example URLs must iterate values in the order they were
//! produced, so the plain `HashMap` container is paired with a key list that
//! remembers insertion order.

use std::collections::HashMap;

/// A string map that preserves the order keys were first inserted in.
///
/// Re-inserting an existing key replaces its value but keeps its original
/// position.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValueMap {
    keys: Vec<String>,
    map: HashMap<String, String>,
}

impl ValueMap {
    /// Create a new empty value map
    pub fn new() -> Self {
        Self {
            keys: Vec::new(),
            map: HashMap::new(),
        }
    }

    /// Insert a value, keeping the key's original position on replacement
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        if !self.map.contains_key(&name) {
            self.keys.push(name.clone());
        }
        self.map.insert(name, value.into());
    }

    /// Get a value by name
    pub fn get(&self, name: &str) -> Option<&str> {
        self.map.get(name).map(|v| v.as_str())
    }

    /// Check whether a key is present
    pub fn contains(&self, name: &str) -> bool {
        self.map.contains_key(name)
    }

    /// Iterate `(name, value)` pairs in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.keys.iter().filter_map(move |k| {
            self.map.get(k).map(|v| (k.as_str(), v.as_str()))
        })
    }

    /// Keys in insertion order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.keys.iter().map(|k| k.as_str())
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Whether the map is empty
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Render the map as a JSON array of `{"name": …, "value": …}` pairs.
    ///
    /// An array is used instead of an object so insertion order survives
    /// serialization.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::Value::Array(
            self.iter()
                .map(|(k, v)| serde_json::json!({ "name": k, "value": v }))
                .collect(),
        )
    }
}

impl<'a> IntoIterator for &'a ValueMap {
    type Item = (&'a str, &'a str);
    type IntoIter = Box<dyn Iterator<Item = (&'a str, &'a str)> + 'a>;

    fn into_iter(self) -> Self::IntoIter {
        Box::new(self.iter())
    }
}
