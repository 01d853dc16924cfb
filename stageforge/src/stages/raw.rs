//! Raw, positionally-ambiguous stage declarations.

use super::Stage;
use crate::core::{Arguments, TypeRef};
use std::fmt;

/// One element of a tuple-style declaration.
#[derive(Debug, Clone, PartialEq)]
pub enum StageElement {
    /// A method or attribute name.
    Name(String),
    /// A type to construct or call into.
    Type(TypeRef),
    /// Call arguments.
    Arguments(Arguments),
}

impl From<&str> for StageElement {
    fn from(name: &str) -> Self {
        Self::Name(name.to_string())
    }
}

impl From<String> for StageElement {
    fn from(name: String) -> Self {
        Self::Name(name)
    }
}

impl From<TypeRef> for StageElement {
    fn from(type_ref: TypeRef) -> Self {
        Self::Type(type_ref)
    }
}

impl From<&TypeRef> for StageElement {
    fn from(type_ref: &TypeRef) -> Self {
        Self::Type(type_ref.clone())
    }
}

impl From<Arguments> for StageElement {
    fn from(arguments: Arguments) -> Self {
        Self::Arguments(arguments)
    }
}

impl fmt::Display for StageElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Name(name) => write!(f, "'{name}'"),
            Self::Type(type_ref) => f.write_str(type_ref.name()),
            Self::Arguments(arguments) => write!(f, "{}", arguments.to_json()),
        }
    }
}

/// A stage as declared by the caller, before normalization.
///
/// Build one from a string, a type reference, a tuple of up to four
/// elements, or an existing [`Stage`]:
///
/// ```rust,ignore
/// let steps: Vec<RawStage> = vec![
///     "host_method".into(),
///     ("total", "add", Arguments::new().with("a", 2).with("b", 3)).into(),
///     ("object", sample_class.clone()).into(),
/// ];
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum RawStage {
    /// A bare method name.
    Name(String),
    /// An ordered tuple of elements.
    Elements(Vec<StageElement>),
    /// An already-canonical stage.
    Canonical(Stage),
}

impl From<&str> for RawStage {
    fn from(name: &str) -> Self {
        Self::Name(name.to_string())
    }
}

impl From<String> for RawStage {
    fn from(name: String) -> Self {
        Self::Name(name)
    }
}

impl From<TypeRef> for RawStage {
    fn from(type_ref: TypeRef) -> Self {
        Self::Elements(vec![StageElement::Type(type_ref)])
    }
}

impl From<Stage> for RawStage {
    fn from(stage: Stage) -> Self {
        Self::Canonical(stage)
    }
}

impl From<Vec<StageElement>> for RawStage {
    fn from(elements: Vec<StageElement>) -> Self {
        Self::Elements(elements)
    }
}

macro_rules! raw_stage_from_tuple {
    ($($ty:ident $var:ident),+) => {
        impl<$($ty: Into<StageElement>),+> From<($($ty,)+)> for RawStage {
            fn from(($($var,)+): ($($ty,)+)) -> Self {
                Self::Elements(vec![$($var.into()),+])
            }
        }
    };
}

raw_stage_from_tuple!(A a);
raw_stage_from_tuple!(A a, B b);
raw_stage_from_tuple!(A a, B b, C c);
raw_stage_from_tuple!(A a, B b, C c, D d);

impl fmt::Display for RawStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Name(name) => write!(f, "'{name}'"),
            Self::Elements(elements) => {
                let parts: Vec<String> = elements.iter().map(ToString::to_string).collect();
                write!(f, "({})", parts.join(", "))
            }
            Self::Canonical(stage) => write!(f, "Stage[{stage}]"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::sample_class;

    #[test]
    fn test_from_str() {
        assert_eq!(RawStage::from("greet"), RawStage::Name("greet".to_string()));
    }

    #[test]
    fn test_from_tuples() {
        let ty = sample_class();
        let raw = RawStage::from(("result", "method", ty.clone(), Arguments::new()));

        assert_eq!(
            raw,
            RawStage::Elements(vec![
                StageElement::Name("result".to_string()),
                StageElement::Name("method".to_string()),
                StageElement::Type(ty),
                StageElement::Arguments(Arguments::new()),
            ])
        );
    }

    #[test]
    fn test_display() {
        let raw = RawStage::from(("total", "add", Arguments::new().with("a", 2)));
        assert_eq!(raw.to_string(), r#"('total', 'add', {"a":2})"#);
    }
}
