//! Explicit name-to-callable registry.
//!
//! Stages name their targets with strings. The registry maps those names to
//! tagged entries instead of relying on runtime introspection:
//!
//! - `HostMethod`: a method the host object exposes
//! - `Function`: a free function registered by name (names may be dotted,
//!   e.g. `math.add`)
//! - `Constructor`: a registered type, reachable by its type name
//! - `TypeMethod`: a method of a registered type, reachable as `Type.method`

use crate::core::{Arguments, MethodSpec, SharedObject, Signature, TypeRef, Value};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Function type for free functions.
pub type Function = Arc<dyn Fn(Arguments) -> anyhow::Result<Value> + Send + Sync>;

/// A registered free function.
#[derive(Clone)]
pub struct FunctionEntry {
    name: String,
    signature: Signature,
    function: Function,
}

impl FunctionEntry {
    /// Returns the registered name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the declared signature.
    #[must_use]
    pub const fn signature(&self) -> &Signature {
        &self.signature
    }

    /// Calls the function with bound arguments.
    pub fn call(&self, args: Arguments) -> anyhow::Result<Value> {
        (self.function)(args)
    }
}

impl fmt::Debug for FunctionEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FunctionEntry")
            .field("name", &self.name)
            .field("signature", &self.signature)
            .finish_non_exhaustive()
    }
}

/// What a registered name refers to.
#[derive(Debug, Clone)]
pub enum RegistryEntry {
    /// A method of the host object.
    HostMethod(MethodSpec),
    /// A free function.
    Function(FunctionEntry),
    /// A type constructor.
    Constructor(TypeRef),
    /// A method of a type, called on a fresh instance.
    TypeMethod {
        /// The owning type.
        type_ref: TypeRef,
        /// The method.
        method: MethodSpec,
    },
}

impl RegistryEntry {
    /// Returns a short name for the entry kind.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::HostMethod(_) => "host_method",
            Self::Function(_) => "function",
            Self::Constructor(_) => "constructor",
            Self::TypeMethod { .. } => "type_method",
        }
    }
}

/// Registry of named functions and types.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    entries: BTreeMap<String, RegistryEntry>,
    types: BTreeMap<String, TypeRef>,
}

impl Registry {
    /// Creates a new empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a free function.
    pub fn register_function<F>(
        &mut self,
        name: impl Into<String>,
        signature: Signature,
        function: F,
    ) -> &mut Self
    where
        F: Fn(Arguments) -> anyhow::Result<Value> + Send + Sync + 'static,
    {
        let name = name.into();
        let entry = FunctionEntry {
            name: name.clone(),
            signature,
            function: Arc::new(function),
        };
        self.entries.insert(name, RegistryEntry::Function(entry));
        self
    }

    /// Registers a free function, builder style.
    #[must_use]
    pub fn with_function<F>(
        mut self,
        name: impl Into<String>,
        signature: Signature,
        function: F,
    ) -> Self
    where
        F: Fn(Arguments) -> anyhow::Result<Value> + Send + Sync + 'static,
    {
        self.register_function(name, signature, function);
        self
    }

    /// Registers a type and each of its declared methods.
    pub fn register_type(&mut self, type_ref: TypeRef) -> &mut Self {
        let name = type_ref.name().to_string();
        for method in type_ref.methods() {
            self.entries.insert(
                format!("{name}.{}", method.name),
                RegistryEntry::TypeMethod {
                    type_ref: type_ref.clone(),
                    method: method.clone(),
                },
            );
        }
        self.entries
            .insert(name.clone(), RegistryEntry::Constructor(type_ref.clone()));
        self.types.insert(name, type_ref);
        self
    }

    /// Registers a type, builder style.
    #[must_use]
    pub fn with_type(mut self, type_ref: TypeRef) -> Self {
        self.register_type(type_ref);
        self
    }

    /// Looks up an entry by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&RegistryEntry> {
        self.entries.get(name)
    }

    /// Checks if a name is registered.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Looks up a registered type by name.
    #[must_use]
    pub fn type_ref(&self, name: &str) -> Option<&TypeRef> {
        self.types.get(name)
    }

    /// Lists registered names in order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Returns the number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Builds the lookup table for one pipeline: the host's methods layered
    /// over this registry, host first.
    #[must_use]
    pub fn layered_with_host(&self, host: Option<&SharedObject>) -> Self {
        let mut layered = self.clone();
        if let Some(host) = host {
            for method in host.methods() {
                layered
                    .entries
                    .insert(method.name.clone(), RegistryEntry::HostMethod(method));
            }
        }
        layered
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{sample_class, SampleHost};

    fn add_registry() -> Registry {
        Registry::new().with_function("math.add", Signature::empty().param("a").param("b"), |args| {
            Ok(Value::from(args.i64("a")? + args.i64("b")?))
        })
    }

    #[test]
    fn test_registry_creation() {
        let registry = Registry::new();
        assert!(registry.is_empty());
        assert!(registry.get("anything").is_none());
    }

    #[test]
    fn test_register_function() {
        let registry = add_registry();
        let Some(RegistryEntry::Function(entry)) = registry.get("math.add") else {
            panic!("expected a function entry");
        };

        let result = entry.call(Arguments::new().with("a", 2).with("b", 5)).unwrap();
        assert_eq!(result, Value::from(7));
        assert_eq!(entry.name(), "math.add");
    }

    #[test]
    fn test_register_type_adds_constructor_and_methods() {
        let registry = Registry::new().with_type(sample_class());

        assert_eq!(registry.get("SampleClass").unwrap().kind(), "constructor");
        assert_eq!(registry.get("SampleClass.method").unwrap().kind(), "type_method");
        assert!(registry.type_ref("SampleClass").is_some());
        assert!(registry.type_ref("Other").is_none());
    }

    #[test]
    fn test_host_methods_shadow_globals() {
        let registry = Registry::new().with_function("greet", Signature::empty(), |_| {
            Ok(Value::from("global"))
        });
        let host = SharedObject::new(SampleHost::new());

        let layered = registry.layered_with_host(Some(&host));
        assert_eq!(layered.get("greet").unwrap().kind(), "host_method");
        assert_eq!(registry.get("greet").unwrap().kind(), "function");
    }

    #[test]
    fn test_layered_without_host_is_unchanged() {
        let registry = add_registry();
        let layered = registry.layered_with_host(None);
        assert_eq!(layered.len(), registry.len());
    }

    #[test]
    fn test_names_are_sorted() {
        let registry = add_registry().with_type(sample_class());
        let names: Vec<&str> = registry.names().collect();
        let mut sorted = names.clone();
        sorted.sort_unstable();
        assert_eq!(names, sorted);
    }
}
