//! Objects whose methods and attributes stages can reach by name.

use super::{Arguments, Value};
use parking_lot::Mutex;
use std::fmt;
use std::sync::Arc;

/// A declared parameter of a callable.
#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    /// The parameter name.
    pub name: String,
    /// Value used when the caller supplies nothing.
    pub default: Option<Value>,
}

impl Param {
    /// Creates a required parameter.
    #[must_use]
    pub fn required(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            default: None,
        }
    }

    /// Creates a parameter with a default value.
    #[must_use]
    pub fn optional(name: impl Into<String>, default: impl Into<Value>) -> Self {
        Self {
            name: name.into(),
            default: Some(default.into()),
        }
    }
}

/// The parameters a callable accepts.
///
/// A closed signature lists every accepted parameter; an open signature
/// accepts whatever it is given and is passed the arguments untouched.
#[derive(Debug, Clone, PartialEq)]
pub struct Signature {
    params: Vec<Param>,
    open: bool,
}

impl Signature {
    /// A closed signature with no parameters.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            params: Vec::new(),
            open: false,
        }
    }

    /// A signature that accepts any arguments.
    #[must_use]
    pub const fn open() -> Self {
        Self {
            params: Vec::new(),
            open: true,
        }
    }

    /// Adds a required parameter.
    #[must_use]
    pub fn param(mut self, name: impl Into<String>) -> Self {
        self.params.push(Param::required(name));
        self
    }

    /// Adds a parameter with a default.
    #[must_use]
    pub fn optional(mut self, name: impl Into<String>, default: impl Into<Value>) -> Self {
        self.params.push(Param::optional(name, default));
        self
    }

    /// Returns the declared parameters.
    #[must_use]
    pub fn params(&self) -> &[Param] {
        &self.params
    }

    /// Returns true if the signature accepts arbitrary arguments.
    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.open
    }

    /// Checks whether a parameter is declared.
    #[must_use]
    pub fn accepts(&self, name: &str) -> bool {
        self.open || self.params.iter().any(|p| p.name == name)
    }
}

/// A named method exposed by an object or type.
#[derive(Debug, Clone, PartialEq)]
pub struct MethodSpec {
    /// The method name.
    pub name: String,
    /// The parameters it accepts.
    pub signature: Signature,
}

impl MethodSpec {
    /// Creates a new method spec.
    #[must_use]
    pub fn new(name: impl Into<String>, signature: Signature) -> Self {
        Self {
            name: name.into(),
            signature,
        }
    }
}

/// An object that exposes methods and attributes by name.
///
/// Hosts and constructed instances both implement this trait. Method
/// dispatch is explicit: `methods` declares what can be called and
/// `call_method` performs the call.
pub trait Object: Send {
    /// Returns the object's type name.
    fn type_name(&self) -> &str;

    /// Returns the methods this object exposes.
    fn methods(&self) -> Vec<MethodSpec>;

    /// Invokes a method with bound arguments.
    fn call_method(&mut self, name: &str, args: Arguments) -> anyhow::Result<Value>;

    /// Reads an attribute.
    fn attribute(&self, _name: &str) -> Option<Value> {
        None
    }

    /// Writes an attribute; returns false if the object does not accept it.
    fn set_attribute(&mut self, _name: &str, _value: Value) -> bool {
        false
    }
}

/// A shared, lockable handle to an object.
#[derive(Clone)]
pub struct SharedObject {
    inner: Arc<Mutex<Box<dyn Object>>>,
}

impl SharedObject {
    /// Wraps an object.
    #[must_use]
    pub fn new(object: impl Object + 'static) -> Self {
        Self::from_boxed(Box::new(object))
    }

    /// Wraps an already boxed object.
    #[must_use]
    pub fn from_boxed(object: Box<dyn Object>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(object)),
        }
    }

    /// Returns the object's type name.
    #[must_use]
    pub fn type_name(&self) -> String {
        self.inner.lock().type_name().to_string()
    }

    /// Returns the methods the object exposes.
    #[must_use]
    pub fn methods(&self) -> Vec<MethodSpec> {
        self.inner.lock().methods()
    }

    /// Looks up a method by name.
    #[must_use]
    pub fn method(&self, name: &str) -> Option<MethodSpec> {
        self.methods().into_iter().find(|m| m.name == name)
    }

    /// Calls a method.
    pub fn call(&self, name: &str, args: Arguments) -> anyhow::Result<Value> {
        self.inner.lock().call_method(name, args)
    }

    /// Reads an attribute.
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<Value> {
        self.inner.lock().attribute(name)
    }

    /// Writes an attribute.
    pub fn set_attribute(&self, name: &str, value: Value) -> bool {
        self.inner.lock().set_attribute(name, value)
    }

    /// Returns true if both handles point at the same object.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Debug for SharedObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SharedObject")
            .field("type_name", &self.type_name())
            .finish()
    }
}
