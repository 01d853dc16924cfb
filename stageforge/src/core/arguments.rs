//! Named call arguments.

use super::{SharedObject, Value};
use anyhow::{anyhow, Context};
use std::collections::BTreeMap;

/// A mapping from parameter name to value.
///
/// Used both for the arguments declared on a stage and for the concrete
/// arguments handed to a callable after binding.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Arguments {
    values: BTreeMap<String, Value>,
}

impl Arguments {
    /// Creates an empty argument mapping.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an argument.
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(name, value);
        self
    }

    /// Builds arguments from a JSON object; returns `None` for any other JSON.
    #[must_use]
    pub fn from_json(value: serde_json::Value) -> Option<Self> {
        match value {
            serde_json::Value::Object(map) => Some(map.into()),
            _ => None,
        }
    }

    /// Inserts an argument, replacing any previous value.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.values.insert(name.into(), value.into());
    }

    /// Gets an argument.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    /// Checks if an argument is present.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Returns the number of arguments.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true if there are no arguments.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterates over arguments in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.values.iter()
    }

    /// Returns the argument names.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    /// Gets a required argument.
    pub fn require(&self, name: &str) -> anyhow::Result<&Value> {
        self.get(name)
            .ok_or_else(|| anyhow!("missing argument '{name}'"))
    }

    /// Gets a required integer argument.
    pub fn i64(&self, name: &str) -> anyhow::Result<i64> {
        self.require(name)?
            .as_i64()
            .with_context(|| format!("argument '{name}' must be an integer"))
    }

    /// Gets a required numeric argument.
    pub fn f64(&self, name: &str) -> anyhow::Result<f64> {
        self.require(name)?
            .as_f64()
            .with_context(|| format!("argument '{name}' must be a number"))
    }

    /// Gets a required string argument.
    pub fn str(&self, name: &str) -> anyhow::Result<&str> {
        self.require(name)?
            .as_str()
            .with_context(|| format!("argument '{name}' must be a string"))
    }

    /// Gets a required boolean argument.
    pub fn bool(&self, name: &str) -> anyhow::Result<bool> {
        self.require(name)?
            .as_bool()
            .with_context(|| format!("argument '{name}' must be a boolean"))
    }

    /// Gets a required object argument.
    pub fn object(&self, name: &str) -> anyhow::Result<SharedObject> {
        self.require(name)?
            .as_object()
            .cloned()
            .with_context(|| format!("argument '{name}' must be an object"))
    }

    /// Renders the arguments as JSON, describing objects by type.
    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        let map: serde_json::Map<String, serde_json::Value> = self
            .values
            .iter()
            .map(|(k, v)| {
                let rendered = match v {
                    Value::Data(data) => data.clone(),
                    Value::Object(_) => serde_json::Value::String(v.describe()),
                };
                (k.clone(), rendered)
            })
            .collect();
        serde_json::Value::Object(map)
    }
}

impl From<serde_json::Map<String, serde_json::Value>> for Arguments {
    fn from(map: serde_json::Map<String, serde_json::Value>) -> Self {
        map.into_iter().map(|(k, v)| (k, Value::Data(v))).collect()
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Arguments {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl IntoIterator for Arguments {
    type Item = (String, Value);
    type IntoIter = std::collections::btree_map::IntoIter<String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.into_iter()
    }
}
