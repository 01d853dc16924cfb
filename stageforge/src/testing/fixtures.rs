//! Sample hosts, types and registries for tests.

use crate::core::{Arguments, MethodSpec, Object, Signature, TypeRef, Value};
use crate::registry::Registry;
use anyhow::{anyhow, bail};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// A host object with a handful of methods and free-form attributes.
///
/// Methods:
/// - `greet()` returns `"hi"`
/// - `add(a, b)` returns `a + b`
/// - `host_method(param1 = null, param2 = null)` records both parameters as
///   attributes and returns `"host_method(<param1>, <param2>)"`
/// - `m1(message = "default_message")` returns `"m1_return_value=<message>"`
/// - `method_with_object(obj)` calls `obj.method()` and returns its result
///   followed by `>`
/// - `fail()` always fails
#[derive(Debug, Clone)]
pub struct SampleHost {
    attributes: BTreeMap<String, Value>,
    accepts_writes: bool,
}

impl Default for SampleHost {
    fn default() -> Self {
        Self::new()
    }
}

impl SampleHost {
    /// Creates a host that accepts attribute writes.
    #[must_use]
    pub fn new() -> Self {
        Self {
            attributes: BTreeMap::new(),
            accepts_writes: true,
        }
    }

    /// Creates a host that declines attribute writes, so stage results go
    /// to the pipeline store.
    #[must_use]
    pub fn read_only() -> Self {
        Self {
            attributes: BTreeMap::new(),
            accepts_writes: false,
        }
    }

    /// Sets an attribute up front.
    #[must_use]
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }
}

fn text(value: &Value) -> String {
    value.as_str().map_or_else(|| value.to_string(), str::to_string)
}

impl Object for SampleHost {
    fn type_name(&self) -> &str {
        "SampleHost"
    }

    fn methods(&self) -> Vec<MethodSpec> {
        vec![
            MethodSpec::new("greet", Signature::empty()),
            MethodSpec::new("add", Signature::empty().param("a").param("b")),
            MethodSpec::new(
                "host_method",
                Signature::empty()
                    .optional("param1", Value::null())
                    .optional("param2", Value::null()),
            ),
            MethodSpec::new("m1", Signature::empty().optional("message", "default_message")),
            MethodSpec::new("method_with_object", Signature::empty().param("obj")),
            MethodSpec::new("fail", Signature::empty()),
        ]
    }

    fn call_method(&mut self, name: &str, args: Arguments) -> anyhow::Result<Value> {
        match name {
            "greet" => Ok(Value::from("hi")),
            "add" => Ok(Value::from(args.i64("a")? + args.i64("b")?)),
            "host_method" => {
                let param1 = args.require("param1")?.clone();
                let param2 = args.require("param2")?.clone();
                let rendered = format!("host_method({}, {})", text(&param1), text(&param2));
                self.attributes.insert("param1".to_string(), param1);
                self.attributes.insert("param2".to_string(), param2);
                Ok(Value::from(rendered))
            }
            "m1" => Ok(Value::from(format!(
                "m1_return_value={}",
                text(args.require("message")?)
            ))),
            "method_with_object" => {
                let result = args.object("obj")?.call("method", Arguments::new())?;
                Ok(Value::from(format!("{}>", text(&result))))
            }
            "fail" => bail!("host failure"),
            other => Err(anyhow!("SampleHost has no method '{other}'")),
        }
    }

    fn attribute(&self, name: &str) -> Option<Value> {
        self.attributes.get(name).cloned()
    }

    fn set_attribute(&mut self, name: &str, value: Value) -> bool {
        if self.accepts_writes {
            self.attributes.insert(name.to_string(), value);
        }
        self.accepts_writes
    }
}

/// Instance state of [`sample_class`].
#[derive(Debug, Clone)]
pub struct SampleObject {
    param1: Value,
    param2: Value,
    fitted: bool,
}

impl Object for SampleObject {
    fn type_name(&self) -> &str {
        "SampleClass"
    }

    fn methods(&self) -> Vec<MethodSpec> {
        sample_methods()
    }

    fn call_method(&mut self, name: &str, _args: Arguments) -> anyhow::Result<Value> {
        match name {
            "method" => Ok(Value::from("Hi")),
            "object_method" => Ok(Value::from("there!")),
            "fit" => {
                self.fitted = true;
                Ok(Value::from(true))
            }
            other => Err(anyhow!("SampleClass has no method '{other}'")),
        }
    }

    fn attribute(&self, name: &str) -> Option<Value> {
        match name {
            "param1" => Some(self.param1.clone()),
            "param2" => Some(self.param2.clone()),
            "fitted" => Some(Value::from(self.fitted)),
            _ => None,
        }
    }
}

fn sample_methods() -> Vec<MethodSpec> {
    vec![
        MethodSpec::new("method", Signature::empty()),
        MethodSpec::new("object_method", Signature::empty()),
        MethodSpec::new("fit", Signature::empty()),
    ]
}

/// A type named `SampleClass`.
///
/// Constructor: `param1 = null`, `param2 = false`. Methods: `method()`
/// returns `"Hi"`, `object_method()` returns `"there!"`, `fit()` marks the
/// instance fitted and returns `true`.
#[must_use]
pub fn sample_class() -> TypeRef {
    sample_methods()
        .into_iter()
        .fold(
            TypeRef::builder("SampleClass").constructor(
                Signature::empty()
                    .optional("param1", Value::null())
                    .optional("param2", false),
            ),
            |builder, method| builder.method(method.name, method.signature),
        )
        .build(|args| {
            Ok(SampleObject {
                param1: args.require("param1")?.clone(),
                param2: args.require("param2")?.clone(),
                fitted: false,
            })
        })
}

struct Counting {
    built: usize,
}

impl Object for Counting {
    fn type_name(&self) -> &str {
        "Counting"
    }

    fn methods(&self) -> Vec<MethodSpec> {
        vec![MethodSpec::new("count", Signature::empty())]
    }

    fn call_method(&mut self, name: &str, _args: Arguments) -> anyhow::Result<Value> {
        match name {
            "count" => Ok(Value::from(self.built)),
            other => Err(anyhow!("Counting has no method '{other}'")),
        }
    }
}

/// A type named `Counting` that increments `built` on every construction.
///
/// Its `count()` method returns the number of instances built before and
/// including this one.
#[must_use]
pub fn counting_class(built: Arc<AtomicUsize>) -> TypeRef {
    TypeRef::builder("Counting")
        .method("count", Signature::empty())
        .build(move |_args| {
            let built = built.fetch_add(1, Ordering::SeqCst) + 1;
            Ok(Counting { built })
        })
}

struct Never;

impl Object for Never {
    fn type_name(&self) -> &str {
        "Failing"
    }

    fn methods(&self) -> Vec<MethodSpec> {
        Vec::new()
    }

    fn call_method(&mut self, name: &str, _args: Arguments) -> anyhow::Result<Value> {
        Err(anyhow!("Failing has no method '{name}'"))
    }
}

/// A type named `Failing` whose constructor always fails. It declares a
/// `run()` method that can never be reached.
#[must_use]
pub fn failing_class() -> TypeRef {
    TypeRef::builder("Failing")
        .method("run", Signature::empty())
        .build(|_args| -> anyhow::Result<Never> { bail!("constructor failed") })
}

/// A registry with `math.add(a, b)`, `math.mul(a, b)`, `fail()` and the
/// `SampleClass` type.
#[must_use]
pub fn sample_registry() -> Registry {
    Registry::new()
        .with_function("math.add", Signature::empty().param("a").param("b"), |args| {
            Ok(Value::from(args.i64("a")? + args.i64("b")?))
        })
        .with_function("math.mul", Signature::empty().param("a").optional("b", 2), |args| {
            Ok(Value::from(args.i64("a")? * args.i64("b")?))
        })
        .with_function("fail", Signature::empty(), |_| Err(anyhow!("function failure")))
        .with_type(sample_class())
}
