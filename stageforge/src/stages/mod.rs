//! Stage records and their normalization.
//!
//! A [`Stage`] is the canonical, immutable description of one unit of work.
//! Callers rarely build one directly; they hand [`RawStage`] declarations to
//! [`normalize`], which classifies them into stages.

mod normalize;
mod raw;

pub use normalize::{normalize, normalize_all};
pub use raw::{RawStage, StageElement};

use crate::core::{Arguments, TypeRef};
use std::fmt;

/// The canonical record of one stage.
#[derive(Debug, Clone, PartialEq)]
pub struct Stage {
    attribute_name: Option<String>,
    method_name: Option<String>,
    type_reference: Option<TypeRef>,
    arguments: Arguments,
}

impl Stage {
    /// A stage that calls `method`.
    #[must_use]
    pub fn call(method: impl Into<String>) -> Self {
        Self {
            attribute_name: None,
            method_name: Some(method.into()),
            type_reference: None,
            arguments: Arguments::new(),
        }
    }

    /// A stage that constructs an instance of `type_ref`.
    #[must_use]
    pub fn construct(type_ref: TypeRef) -> Self {
        Self {
            attribute_name: None,
            method_name: None,
            type_reference: Some(type_ref),
            arguments: Arguments::new(),
        }
    }

    /// Stores the stage result under `name`.
    #[must_use]
    pub fn store_as(mut self, name: impl Into<String>) -> Self {
        self.attribute_name = Some(name.into());
        self
    }

    /// Resolves the method on a fresh instance of `type_ref`.
    #[must_use]
    pub fn on_type(mut self, type_ref: TypeRef) -> Self {
        self.type_reference = Some(type_ref);
        self
    }

    /// Sets the stage arguments.
    #[must_use]
    pub fn with_arguments(mut self, arguments: Arguments) -> Self {
        self.arguments = arguments;
        self
    }

    pub(crate) const fn from_parts(
        attribute_name: Option<String>,
        method_name: Option<String>,
        type_reference: Option<TypeRef>,
        arguments: Arguments,
    ) -> Self {
        Self {
            attribute_name,
            method_name,
            type_reference,
            arguments,
        }
    }

    /// Name the result is stored under, if any.
    #[must_use]
    pub fn attribute_name(&self) -> Option<&str> {
        self.attribute_name.as_deref()
    }

    /// Name of the callable to invoke, if any.
    #[must_use]
    pub fn method_name(&self) -> Option<&str> {
        self.method_name.as_deref()
    }

    /// The type the stage constructs or calls into, if any.
    #[must_use]
    pub const fn type_reference(&self) -> Option<&TypeRef> {
        self.type_reference.as_ref()
    }

    /// The declared arguments.
    #[must_use]
    pub const fn arguments(&self) -> &Arguments {
        &self.arguments
    }

    /// Returns true for stages that only construct a type.
    #[must_use]
    pub const fn is_construction(&self) -> bool {
        self.method_name.is_none() && self.type_reference.is_some()
    }

    /// Short human-readable label, e.g. `total = add(a, b)`.
    #[must_use]
    pub fn label(&self) -> String {
        let target = match (&self.type_reference, &self.method_name) {
            (Some(ty), Some(method)) => format!("{}.{method}", ty.name()),
            (Some(ty), None) => ty.name().to_string(),
            (None, Some(method)) => method.clone(),
            (None, None) => "<empty>".to_string(),
        };
        let args: Vec<&str> = self.arguments.names().collect();
        let call = format!("{target}({})", args.join(", "));
        match &self.attribute_name {
            Some(attr) => format!("{attr} = {call}"),
            None => call,
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::sample_class;

    #[test]
    fn test_call_stage_label() {
        let stage = Stage::call("add")
            .store_as("total")
            .with_arguments(Arguments::new().with("a", 2).with("b", 3));

        assert_eq!(stage.label(), "total = add(a, b)");
        assert!(!stage.is_construction());
    }

    #[test]
    fn test_construct_stage() {
        let stage = Stage::construct(sample_class());
        assert!(stage.is_construction());
        assert_eq!(stage.to_string(), "SampleClass()");
    }

    #[test]
    fn test_type_method_label() {
        let stage = Stage::call("method").on_type(sample_class());
        assert_eq!(stage.label(), "SampleClass.method()");
    }
}
