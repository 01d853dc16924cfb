//! Argument binding.

use super::Scope;
use crate::core::{Arguments, Signature, Value};
use crate::errors::InvocationError;
use serde::{Deserialize, Serialize};
use tracing::trace;

/// How string argument values that name stored attributes are treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArgumentMode {
    /// Values are passed through unchanged.
    #[default]
    Literal,
    /// A string equal to the name of a stored attribute is replaced by the
    /// stored value.
    StoredReferences,
}

/// Builds the concrete arguments for a callable.
///
/// Supplied arguments are substituted according to `mode`. For a closed
/// signature, unknown names are rejected and each missing parameter is
/// filled from a host attribute, then a store entry, then its default.
///
/// # Errors
///
/// Returns `InvocationError` for unknown or missing parameters.
pub fn bind(
    arguments: &Arguments,
    signature: &Signature,
    scope: &Scope<'_>,
    mode: ArgumentMode,
    target: &str,
) -> Result<Arguments, InvocationError> {
    let supplied: Arguments = arguments
        .iter()
        .map(|(name, value)| (name.clone(), substitute(value, scope, mode)))
        .collect();

    if signature.is_open() {
        return Ok(supplied);
    }

    if let Some(unknown) = supplied.names().find(|name| !signature.accepts(name)) {
        return Err(InvocationError::msg(
            target,
            format!("unexpected argument '{unknown}'"),
        ));
    }

    let mut bound = Arguments::new();
    for param in signature.params() {
        let value = supplied
            .get(&param.name)
            .cloned()
            .or_else(|| scope.lookup(&param.name))
            .or_else(|| param.default.clone())
            .ok_or_else(|| {
                let message = format!(
                    "parameter '{}' not supplied and not found in host or store",
                    param.name
                );
                InvocationError::msg(target, message)
            })?;
        bound.insert(param.name.clone(), value);
    }

    trace!(callable = %target, arguments = %bound.to_json(), "Bound arguments");
    Ok(bound)
}

fn substitute(value: &Value, scope: &Scope<'_>, mode: ArgumentMode) -> Value {
    match (mode, value.as_str()) {
        (ArgumentMode::StoredReferences, Some(name)) => {
            scope.lookup(name).unwrap_or_else(|| value.clone())
        }
        _ => value.clone(),
    }
}
