//! Type references: constructible types carried as first-class values.

use super::{Arguments, MethodSpec, Object, SharedObject, Signature};
use std::fmt;
use std::sync::Arc;

/// Factory function type for constructing instances.
pub type Factory = Arc<dyn Fn(Arguments) -> anyhow::Result<Box<dyn Object>> + Send + Sync>;

/// Describes a constructible type: its constructor and declared methods.
pub struct TypeDescriptor {
    name: String,
    constructor: Signature,
    methods: Vec<MethodSpec>,
    factory: Factory,
}

/// A cloneable handle to a [`TypeDescriptor`].
///
/// Two references are equal only when they point at the same descriptor.
#[derive(Clone)]
pub struct TypeRef {
    descriptor: Arc<TypeDescriptor>,
}

impl TypeRef {
    /// Starts building a type reference.
    #[must_use]
    pub fn builder(name: impl Into<String>) -> TypeBuilder {
        TypeBuilder {
            name: name.into(),
            constructor: Signature::empty(),
            methods: Vec::new(),
        }
    }

    /// Returns the type name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.descriptor.name
    }

    /// Returns the constructor signature.
    #[must_use]
    pub fn constructor(&self) -> &Signature {
        &self.descriptor.constructor
    }

    /// Returns the declared methods.
    #[must_use]
    pub fn methods(&self) -> &[MethodSpec] {
        &self.descriptor.methods
    }

    /// Looks up a declared method.
    ///
    /// This only inspects the descriptor; nothing is constructed or invoked.
    #[must_use]
    pub fn method(&self, name: &str) -> Option<&MethodSpec> {
        self.descriptor.methods.iter().find(|m| m.name == name)
    }

    /// Checks whether the type declares a method.
    #[must_use]
    pub fn has_method(&self, name: &str) -> bool {
        self.method(name).is_some()
    }

    /// Constructs a new instance from bound constructor arguments.
    ///
    /// Defaults are not applied here; bind the arguments against
    /// [`TypeRef::constructor`] first.
    pub fn construct(&self, args: Arguments) -> anyhow::Result<SharedObject> {
        (self.descriptor.factory)(args).map(SharedObject::from_boxed)
    }
}

impl PartialEq for TypeRef {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.descriptor, &other.descriptor)
    }
}

impl fmt::Debug for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeRef")
            .field("name", &self.descriptor.name)
            .field(
                "methods",
                &self.descriptor.methods.iter().map(|m| &m.name).collect::<Vec<_>>(),
            )
            .finish()
    }
}

/// Builder for [`TypeRef`].
#[derive(Debug)]
pub struct TypeBuilder {
    name: String,
    constructor: Signature,
    methods: Vec<MethodSpec>,
}

impl TypeBuilder {
    /// Sets the constructor signature.
    #[must_use]
    pub fn constructor(mut self, signature: Signature) -> Self {
        self.constructor = signature;
        self
    }

    /// Declares a method.
    #[must_use]
    pub fn method(mut self, name: impl Into<String>, signature: Signature) -> Self {
        self.methods.push(MethodSpec::new(name, signature));
        self
    }

    /// Finishes the type with its factory.
    #[must_use]
    pub fn build<T, F>(self, factory: F) -> TypeRef
    where
        T: Object + 'static,
        F: Fn(Arguments) -> anyhow::Result<T> + Send + Sync + 'static,
    {
        let factory: Factory = Arc::new(move |args: Arguments| {
            factory(args).map(|obj| Box::new(obj) as Box<dyn Object>)
        });
        TypeRef {
            descriptor: Arc::new(TypeDescriptor {
                name: self.name,
                constructor: self.constructor,
                methods: self.methods,
                factory,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Value;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Unit;

    impl Object for Unit {
        fn type_name(&self) -> &str {
            "Unit"
        }

        fn methods(&self) -> Vec<MethodSpec> {
            vec![MethodSpec::new("ping", Signature::empty())]
        }

        fn call_method(&mut self, _name: &str, _args: Arguments) -> anyhow::Result<Value> {
            Ok(Value::from("pong"))
        }
    }

    #[test]
    fn test_probe_does_not_construct() {
        let built = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&built);
        let ty = TypeRef::builder("Unit")
            .method("ping", Signature::empty())
            .build(move |_| {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok(Unit)
            });

        assert!(ty.has_method("ping"));
        assert!(!ty.has_method("pong"));
        assert_eq!(built.load(Ordering::SeqCst), 0);

        let instance = ty.construct(Arguments::new()).unwrap();
        assert_eq!(built.load(Ordering::SeqCst), 1);
        assert_eq!(instance.call("ping", Arguments::new()).unwrap(), Value::from("pong"));
    }

    #[test]
    fn test_type_ref_identity() {
        let a = TypeRef::builder("Unit").build(|_| Ok(Unit));
        let b = TypeRef::builder("Unit").build(|_| Ok(Unit));

        assert_eq!(a, a.clone());
        assert_ne!(a, b);
        assert_eq!(a.name(), "Unit");
    }
}
