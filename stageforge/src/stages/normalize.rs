//! Classification of raw declarations into canonical stages.

use super::{RawStage, Stage, StageElement};
use crate::core::{Arguments, TypeRef};
use crate::errors::MalformedStageError;
use crate::utils::validation::{is_dotted_path, is_identifier};
use tracing::trace;

/// Maximum number of elements in a tuple declaration.
const MAX_ELEMENTS: usize = 4;

/// Elements of a declaration partitioned by kind, order kept within a kind.
#[derive(Default)]
struct Partition {
    names: Vec<String>,
    type_ref: Option<TypeRef>,
    arguments: Option<Arguments>,
}

/// Normalizes one raw declaration into a canonical [`Stage`].
///
/// Tuple declarations are classified by the kinds of their elements, not
/// by their positions:
///
/// | names | type | result |
/// |-------|------|--------|
/// | 0 | yes | construct the type |
/// | 1 | no  | call the name |
/// | 1 | yes | call the name on the type if declared, else construct and store under it |
/// | 2 | any | store the call of the second name under the first |
///
/// A canonical stage is validated and returned unchanged, so normalizing
/// twice gives the same record.
///
/// # Errors
///
/// Returns `MalformedStageError` if the declaration cannot be classified.
pub fn normalize(raw: impl Into<RawStage>) -> Result<Stage, MalformedStageError> {
    let raw = raw.into();
    let stage = match &raw {
        RawStage::Name(name) => Ok(Stage::call(name.clone())),
        RawStage::Elements(elements) => classify(elements),
        RawStage::Canonical(stage) => Ok(stage.clone()),
    }
    .and_then(|stage| validate(&stage).map(|()| stage))
    .map_err(|err| err.with_declaration(raw.to_string()))?;
    trace!(declaration = %raw, stage = %stage, "Normalized stage");
    Ok(stage)
}

/// Normalizes a list of declarations, failing on the first malformed one.
///
/// # Errors
///
/// Returns `MalformedStageError` carrying the position of the bad entry.
pub fn normalize_all<I, R>(raws: I) -> Result<Vec<Stage>, MalformedStageError>
where
    I: IntoIterator<Item = R>,
    R: Into<RawStage>,
{
    raws.into_iter()
        .enumerate()
        .map(|(position, raw)| normalize(raw).map_err(|err| err.at(position)))
        .collect()
}

fn partition(elements: &[StageElement]) -> Result<Partition, MalformedStageError> {
    if elements.is_empty() {
        return Err(MalformedStageError::new("declaration has no elements"));
    }
    if elements.len() > MAX_ELEMENTS {
        return Err(MalformedStageError::new(format!(
            "declaration has {} elements, at most {MAX_ELEMENTS} are allowed",
            elements.len()
        )));
    }

    let mut parts = Partition::default();
    for element in elements {
        match element {
            StageElement::Name(name) => parts.names.push(name.clone()),
            StageElement::Type(type_ref) => {
                if parts.type_ref.replace(type_ref.clone()).is_some() {
                    return Err(MalformedStageError::new(
                        "declaration has more than one type reference",
                    ));
                }
            }
            StageElement::Arguments(arguments) => {
                if parts.arguments.replace(arguments.clone()).is_some() {
                    return Err(MalformedStageError::new(
                        "declaration has more than one argument mapping",
                    ));
                }
            }
        }
    }
    Ok(parts)
}

fn classify(elements: &[StageElement]) -> Result<Stage, MalformedStageError> {
    let Partition {
        mut names,
        type_ref,
        arguments,
    } = partition(elements)?;
    let arguments = arguments.unwrap_or_default();

    let (attribute_name, method_name) = match (names.len(), &type_ref) {
        (0, Some(_)) => (None, None),
        (0, None) => {
            return Err(MalformedStageError::new(
                "declaration needs a method name or a type reference",
            ));
        }
        (1, None) => (None, names.pop()),
        (1, Some(ty)) => {
            let name = names.remove(0);
            if ty.has_method(&name) {
                (None, Some(name))
            } else {
                (Some(name), None)
            }
        }
        (2, _) => {
            let method = names.pop();
            (names.pop(), method)
        }
        (n, _) => {
            return Err(MalformedStageError::new(format!(
                "declaration has {n} names, at most 2 are allowed"
            )));
        }
    };

    Ok(Stage::from_parts(attribute_name, method_name, type_ref, arguments))
}

fn validate(stage: &Stage) -> Result<(), MalformedStageError> {
    if stage.method_name().is_none() && stage.type_reference().is_none() {
        return Err(MalformedStageError::new(
            "stage needs a method name or a type reference",
        ));
    }
    if let Some(attr) = stage.attribute_name() {
        if !is_identifier(attr) {
            return Err(MalformedStageError::new(format!(
                "'{attr}' is not a valid attribute name"
            )));
        }
    }
    if let Some(method) = stage.method_name() {
        if !is_dotted_path(method) {
            return Err(MalformedStageError::new(format!(
                "'{method}' is not a valid method name"
            )));
        }
    }
    Ok(())
}
