//! Dynamic values flowing between stages.

use super::SharedObject;
use std::fmt;

/// A value produced or consumed by a stage.
///
/// Plain data is carried as JSON; constructed instances are carried as
/// shared object handles so later stages can call their methods.
#[derive(Clone)]
pub enum Value {
    /// Plain data.
    Data(serde_json::Value),
    /// A handle to a live object.
    Object(SharedObject),
}

impl Value {
    /// The null value.
    #[must_use]
    pub const fn null() -> Self {
        Self::Data(serde_json::Value::Null)
    }

    /// Returns true if this is JSON null.
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Data(serde_json::Value::Null))
    }

    /// Returns the JSON data, if this is plain data.
    #[must_use]
    pub const fn as_data(&self) -> Option<&serde_json::Value> {
        match self {
            Self::Data(data) => Some(data),
            Self::Object(_) => None,
        }
    }

    /// Returns the object handle, if this is an object.
    #[must_use]
    pub const fn as_object(&self) -> Option<&SharedObject> {
        match self {
            Self::Object(object) => Some(object),
            Self::Data(_) => None,
        }
    }

    /// Returns the string, if this is a JSON string.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        self.as_data().and_then(serde_json::Value::as_str)
    }

    /// Returns the integer, if this is a JSON integer.
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        self.as_data().and_then(serde_json::Value::as_i64)
    }

    /// Returns the float, if this is a JSON number.
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        self.as_data().and_then(serde_json::Value::as_f64)
    }

    /// Returns the boolean, if this is a JSON boolean.
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        self.as_data().and_then(serde_json::Value::as_bool)
    }

    /// Renders the value for logs and stage cards.
    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            Self::Data(data) => data.to_string(),
            Self::Object(object) => format!("<{} object>", object.type_name()),
        }
    }
}

impl Default for Value {
    fn default() -> Self {
        Self::null()
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Data(a), Self::Data(b)) => a == b,
            (Self::Object(a), Self::Object(b)) => a.ptr_eq(b),
            _ => false,
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Data(data) => f.debug_tuple("Data").field(data).finish(),
            Self::Object(object) => f.debug_tuple("Object").field(&object.type_name()).finish(),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.describe())
    }
}

impl From<serde_json::Value> for Value {
    fn from(data: serde_json::Value) -> Self {
        Self::Data(data)
    }
}

impl From<SharedObject> for Value {
    fn from(object: SharedObject) -> Self {
        Self::Object(object)
    }
}

macro_rules! value_from_json {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Value {
                fn from(v: $ty) -> Self {
                    Self::Data(serde_json::Value::from(v))
                }
            }
        )*
    };
}

value_from_json!(bool, i32, i64, u32, u64, usize, f64, String, &str);

impl PartialEq<serde_json::Value> for Value {
    fn eq(&self, other: &serde_json::Value) -> bool {
        self.as_data() == Some(other)
    }
}
