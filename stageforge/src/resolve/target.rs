//! Target resolution: from a stage to a bound callable.

use super::{arguments, ArgumentMode, Scope};
use crate::core::{Arguments, MethodSpec, SharedObject, Signature, TypeRef, Value};
use crate::errors::{ForgeError, InvocationError, UnresolvedTargetError};
use crate::registry::{FunctionEntry, Registry, RegistryEntry};
use crate::stages::Stage;
use crate::utils::validation::split_path;
use tracing::debug;

/// A callable ready to be invoked with bound arguments.
#[derive(Debug, Clone)]
pub enum BoundCallable {
    /// A method on a live object (the host, a stored object, or a fresh
    /// instance).
    Method {
        /// The receiver.
        object: SharedObject,
        /// The method.
        method: MethodSpec,
        /// Label used in diagnostics.
        target: String,
    },
    /// A registered free function.
    Function(FunctionEntry),
    /// Construction of a new instance.
    Constructor(TypeRef),
}

impl BoundCallable {
    /// Label used in logs and errors.
    #[must_use]
    pub fn target(&self) -> &str {
        match self {
            Self::Method { target, .. } => target,
            Self::Function(entry) => entry.name(),
            Self::Constructor(type_ref) => type_ref.name(),
        }
    }

    /// The signature arguments are bound against.
    #[must_use]
    pub fn signature(&self) -> &Signature {
        match self {
            Self::Method { method, .. } => &method.signature,
            Self::Function(entry) => entry.signature(),
            Self::Constructor(type_ref) => type_ref.constructor(),
        }
    }

    /// Invokes the callable.
    ///
    /// # Errors
    ///
    /// Returns `InvocationError` if the callable fails.
    pub fn invoke(&self, args: Arguments) -> Result<Value, InvocationError> {
        let result = match self {
            Self::Method { object, method, .. } => object.call(&method.name, args),
            Self::Function(entry) => entry.call(args),
            Self::Constructor(type_ref) => type_ref.construct(args).map(Value::Object),
        };
        result.map_err(|err| InvocationError::new(self.target(), err))
    }
}

/// Resolves stage targets against a registry and the current scope.
pub struct Resolver<'a> {
    registry: &'a Registry,
    scope: Scope<'a>,
    mode: ArgumentMode,
}

impl<'a> Resolver<'a> {
    /// Creates a resolver. `registry` should already be layered with the
    /// host's methods.
    #[must_use]
    pub const fn new(registry: &'a Registry, scope: Scope<'a>, mode: ArgumentMode) -> Self {
        Self {
            registry,
            scope,
            mode,
        }
    }

    /// Resolves the stage's target.
    ///
    /// Stages with a type reference construct it, and bind the method on
    /// the fresh instance when one is named. Otherwise the method name is
    /// looked up in the registry (host methods first), then as a dotted
    /// path through stored objects.
    ///
    /// # Errors
    ///
    /// Returns `UnresolvedTarget` if nothing matches, or `Invocation` if a
    /// fresh instance cannot be constructed.
    pub fn resolve(&self, stage: &Stage) -> Result<BoundCallable, ForgeError> {
        match (stage.type_reference(), stage.method_name()) {
            (Some(type_ref), None) => Ok(BoundCallable::Constructor(type_ref.clone())),
            (Some(type_ref), Some(method)) => {
                let spec = type_ref.method(method).cloned().ok_or_else(|| {
                    UnresolvedTargetError::new(
                        method,
                        format!("type '{}' declares no such method", type_ref.name()),
                    )
                })?;
                self.bind_fresh_instance(type_ref, spec)
            }
            (None, Some(method)) => self.resolve_name(method),
            (None, None) => Err(UnresolvedTargetError::new(
                "<empty>",
                "stage names neither a method nor a type",
            )
            .into()),
        }
    }

    /// Binds arguments for a resolved callable.
    ///
    /// # Errors
    ///
    /// Returns `InvocationError` for unknown or missing parameters.
    pub fn bind(
        &self,
        arguments: &Arguments,
        callable: &BoundCallable,
    ) -> Result<Arguments, InvocationError> {
        arguments::bind(
            arguments,
            callable.signature(),
            &self.scope,
            self.mode,
            callable.target(),
        )
    }

    fn resolve_name(&self, name: &str) -> Result<BoundCallable, ForgeError> {
        match self.registry.get(name) {
            Some(RegistryEntry::HostMethod(method)) => {
                let host = self.scope.host().ok_or_else(|| {
                    UnresolvedTargetError::new(name, "host method registered but no host is set")
                })?;
                debug!(name = %name, "Resolved host method");
                Ok(BoundCallable::Method {
                    object: host.clone(),
                    method: method.clone(),
                    target: name.to_string(),
                })
            }
            Some(RegistryEntry::Function(entry)) => {
                debug!(name = %name, "Resolved function");
                Ok(BoundCallable::Function(entry.clone()))
            }
            Some(RegistryEntry::Constructor(type_ref)) => {
                debug!(name = %name, "Resolved constructor");
                Ok(BoundCallable::Constructor(type_ref.clone()))
            }
            Some(RegistryEntry::TypeMethod { type_ref, method }) => {
                self.bind_fresh_instance(type_ref, method.clone())
            }
            None => self.resolve_path(name),
        }
    }

    fn resolve_path(&self, name: &str) -> Result<BoundCallable, ForgeError> {
        let Some((segments, method_name)) = split_path(name) else {
            return Err(UnresolvedTargetError::not_found(name).into());
        };

        let mut segments = segments.into_iter();
        let root = segments.next().unwrap_or_default();
        let mut object = self
            .scope
            .lookup(root)
            .ok_or_else(|| UnresolvedTargetError::new(name, format!("'{root}' is not stored")))?
            .as_object()
            .cloned()
            .ok_or_else(|| UnresolvedTargetError::new(name, format!("'{root}' is not an object")))?;

        for segment in segments {
            object = object
                .attribute(segment)
                .and_then(|value| value.as_object().cloned())
                .ok_or_else(|| {
                    let reason = format!("'{segment}' is not an object attribute");
                    UnresolvedTargetError::new(name, reason)
                })?;
        }

        let method = object.method(method_name).ok_or_else(|| {
            UnresolvedTargetError::new(
                name,
                format!("object of type '{}' has no method '{method_name}'", object.type_name()),
            )
        })?;

        debug!(name = %name, "Resolved method on stored object");
        Ok(BoundCallable::Method {
            object,
            method,
            target: name.to_string(),
        })
    }

    fn bind_fresh_instance(
        &self,
        type_ref: &TypeRef,
        method: MethodSpec,
    ) -> Result<BoundCallable, ForgeError> {
        let target = format!("{}.{}", type_ref.name(), method.name);
        let ctor_args = arguments::bind(
            &Arguments::new(),
            type_ref.constructor(),
            &self.scope,
            self.mode,
            type_ref.name(),
        )?;
        let instance = type_ref
            .construct(ctor_args)
            .map_err(|err| InvocationError::new(type_ref.name(), err))?;

        debug!(callable = %target, "Constructed fresh instance for method call");
        Ok(BoundCallable::Method {
            object: instance,
            method,
            target,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::AttributeStore;
    use crate::testing::{counting_class, sample_class, SampleHost};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn resolve_with(
        registry: &Registry,
        host: Option<&SharedObject>,
        store: &AttributeStore,
        stage: &Stage,
    ) -> Result<BoundCallable, ForgeError> {
        let layered = registry.layered_with_host(host);
        Resolver::new(&layered, Scope::new(host, store), ArgumentMode::Literal).resolve(stage)
    }

    #[test]
    fn test_host_method_resolves_first() {
        let host = SharedObject::new(SampleHost::new());
        let registry = Registry::new().with_function("greet", Signature::empty(), |_| {
            Ok(Value::from("global"))
        });
        let store = AttributeStore::new();

        let callable = resolve_with(&registry, Some(&host), &store, &Stage::call("greet")).unwrap();
        assert!(matches!(callable, BoundCallable::Method { .. }));
        assert_eq!(callable.invoke(Arguments::new()).unwrap(), Value::from("hi"));
    }

    #[test]
    fn test_global_function_without_host() {
        let registry = Registry::new().with_function("ns.greet", Signature::empty(), |_| {
            Ok(Value::from("global"))
        });
        let store = AttributeStore::new();

        let callable = resolve_with(&registry, None, &store, &Stage::call("ns.greet")).unwrap();
        assert_eq!(callable.target(), "ns.greet");
        assert_eq!(callable.invoke(Arguments::new()).unwrap(), Value::from("global"));
    }

    #[test]
    fn test_unknown_name_is_unresolved() {
        let store = AttributeStore::new();
        let stage = Stage::call("missing_method");
        let err = resolve_with(&Registry::new(), None, &store, &stage).unwrap_err();
        assert!(matches!(err, ForgeError::UnresolvedTarget(_)));
    }

    #[test]
    fn test_construction_stage_does_not_construct_at_resolution() {
        let built = Arc::new(AtomicUsize::new(0));
        let ty = counting_class(Arc::clone(&built));
        let store = AttributeStore::new();

        let callable = resolve_with(&Registry::new(), None, &store, &Stage::construct(ty)).unwrap();
        assert!(matches!(callable, BoundCallable::Constructor(_)));
        assert_eq!(built.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_type_method_constructs_fresh_instance() {
        let built = Arc::new(AtomicUsize::new(0));
        let ty = counting_class(Arc::clone(&built));
        let store = AttributeStore::new();
        let stage = Stage::call("count").on_type(ty);

        let first = resolve_with(&Registry::new(), None, &store, &stage).unwrap();
        let second = resolve_with(&Registry::new(), None, &store, &stage).unwrap();
        assert_eq!(built.load(Ordering::SeqCst), 2);
        assert_eq!(first.target(), "Counting.count");

        let BoundCallable::Method { object: a, .. } = first else { panic!("expected method") };
        let BoundCallable::Method { object: b, .. } = second else { panic!("expected method") };
        assert!(!a.ptr_eq(&b));
    }

    #[test]
    fn test_type_without_method_is_unresolved_before_construction() {
        let built = Arc::new(AtomicUsize::new(0));
        let ty = counting_class(Arc::clone(&built));
        let store = AttributeStore::new();
        let stage = Stage::call("nope").on_type(ty);

        let err = resolve_with(&Registry::new(), None, &store, &stage).unwrap_err();
        assert!(matches!(err, ForgeError::UnresolvedTarget(_)));
        assert_eq!(built.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_registered_type_method_by_dotted_name() {
        let registry = Registry::new().with_type(sample_class());
        let store = AttributeStore::new();

        let stage = Stage::call("SampleClass.method");
        let callable = resolve_with(&registry, None, &store, &stage).unwrap();
        assert_eq!(callable.invoke(Arguments::new()).unwrap(), Value::from("Hi"));
    }

    #[test]
    fn test_registered_type_name_is_constructor() {
        let registry = Registry::new().with_type(sample_class());
        let store = AttributeStore::new();

        let callable = resolve_with(&registry, None, &store, &Stage::call("SampleClass")).unwrap();
        assert!(matches!(callable, BoundCallable::Constructor(_)));
    }

    #[test]
    fn test_dotted_path_through_stored_object() {
        let mut store = AttributeStore::new();
        let object = sample_class()
            .construct(Arguments::new().with("param1", "p").with("param2", false))
            .unwrap();
        store.set("object", Value::Object(object));

        let stage = Stage::call("object.object_method");
        let callable = resolve_with(&Registry::new(), None, &store, &stage).unwrap();
        assert_eq!(callable.target(), "object.object_method");
        assert!(callable.invoke(Arguments::new()).is_ok());
    }

    #[test]
    fn test_dotted_path_errors() {
        let mut store = AttributeStore::new();
        store.set("plain", Value::from(1));
        let object = sample_class()
            .construct(Arguments::new().with("param1", Value::null()).with("param2", false))
            .unwrap();
        store.set("object", Value::Object(object));

        for name in ["absent.method", "plain.method", "object.nope", "object.inner.method"] {
            let err = resolve_with(&Registry::new(), None, &store, &Stage::call(name)).unwrap_err();
            assert!(matches!(err, ForgeError::UnresolvedTarget(_)), "{name}");
        }
    }

    #[test]
    fn test_failing_constructor_is_invocation_error() {
        let ty = crate::testing::failing_class();
        let store = AttributeStore::new();

        let stage = Stage::call("run").on_type(ty);
        let err = resolve_with(&Registry::new(), None, &store, &stage).unwrap_err();
        assert!(matches!(err, ForgeError::Invocation(_)));
    }
}
