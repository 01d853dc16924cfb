//! The pipeline's attribute store.

use crate::core::Value;
use std::collections::BTreeMap;

/// Named results of stages that were not written to a host.
///
/// Writes overwrite; entries are never removed by the pipeline.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AttributeStore {
    data: BTreeMap<String, Value>,
}

impl AttributeStore {
    /// Creates a new empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Gets a stored value.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.data.get(key)
    }

    /// Checks if a key exists.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.data.contains_key(key)
    }

    /// Stores a value, returning the one it replaced.
    pub fn set(&mut self, key: impl Into<String>, value: Value) -> Option<Value> {
        self.data.insert(key.into(), value)
    }

    /// Returns the number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns true if the store is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Returns all keys in order.
    #[must_use]
    pub fn keys(&self) -> Vec<String> {
        self.data.keys().cloned().collect()
    }

    /// Iterates over entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.data.iter()
    }

    /// Returns the data entries as JSON; object entries are described by
    /// their type name.
    #[must_use]
    pub fn to_dict(&self) -> serde_json::Map<String, serde_json::Value> {
        self.data
            .iter()
            .map(|(key, value)| {
                let json = match value {
                    Value::Data(data) => data.clone(),
                    Value::Object(_) => serde_json::Value::String(value.describe()),
                };
                (key.clone(), json)
            })
            .collect()
    }
}
