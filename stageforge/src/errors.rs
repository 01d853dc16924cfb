//! Error types for the stageforge engine.
//!
//! Each failure kind has its own error struct carrying enough context for
//! diagnostics, and [`ForgeError`] ties them together for callers that only
//! want a single error type.

use std::collections::HashMap;
use thiserror::Error;

/// The main error type for stageforge operations.
#[derive(Debug, Error)]
pub enum ForgeError {
    /// A raw stage declaration could not be classified.
    #[error("{0}")]
    MalformedStage(#[from] MalformedStageError),

    /// A method or type could not be located.
    #[error("{0}")]
    UnresolvedTarget(#[from] UnresolvedTargetError),

    /// A resolved callable failed while running.
    #[error("{0}")]
    Invocation(#[from] InvocationError),

    /// A requested attribute was never stored.
    #[error("{0}")]
    AttributeNotFound(#[from] AttributeNotFoundError),

    /// A stage configuration document could not be loaded.
    #[error("{0}")]
    Config(#[from] ConfigError),

    /// The pipeline is not in a state that allows the operation.
    #[error("{0}")]
    InvalidState(#[from] InvalidStateError),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ForgeError {
    /// Returns the position of the stage that caused the error, if known.
    #[must_use]
    pub fn stage_position(&self) -> Option<usize> {
        match self {
            Self::MalformedStage(err) => err.position,
            Self::UnresolvedTarget(err) => err.position,
            Self::Invocation(err) => err.position,
            _ => None,
        }
    }

    /// Attaches a stage position to errors that carry one.
    #[must_use]
    pub fn at(self, position: usize) -> Self {
        match self {
            Self::MalformedStage(err) => Self::MalformedStage(err.at(position)),
            Self::UnresolvedTarget(err) => Self::UnresolvedTarget(err.at(position)),
            Self::Invocation(err) => Self::Invocation(err.at(position)),
            other => other,
        }
    }

    /// Returns a short, stable name for the failure kind.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::MalformedStage(_) => "MalformedStage",
            Self::UnresolvedTarget(_) => "UnresolvedTarget",
            Self::Invocation(_) => "Invocation",
            Self::AttributeNotFound(_) => "AttributeNotFound",
            Self::Config(_) => "Config",
            Self::InvalidState(_) => "InvalidState",
            Self::Io(_) => "Io",
        }
    }

    /// Converts to a dictionary representation.
    #[must_use]
    pub fn to_dict(&self) -> HashMap<String, serde_json::Value> {
        let mut map = HashMap::new();
        map.insert("type".to_string(), serde_json::json!(self.kind()));
        map.insert("message".to_string(), serde_json::json!(self.to_string()));
        if let Some(position) = self.stage_position() {
            map.insert("position".to_string(), serde_json::json!(position));
        }
        map
    }
}

#[allow(clippy::ref_option)]
fn position_suffix(position: &Option<usize>) -> String {
    position.map_or_else(String::new, |p| format!(" (stage #{p})"))
}

/// Error raised when a raw declaration cannot be turned into a stage.
#[derive(Debug, Clone, Error)]
#[error("Malformed stage{}: {message}", position_suffix(.position))]
pub struct MalformedStageError {
    /// The error message.
    pub message: String,
    /// A rendering of the offending declaration.
    pub declaration: Option<String>,
    /// Position of the declaration in the submitted list.
    pub position: Option<usize>,
}

impl MalformedStageError {
    /// Creates a new malformed stage error.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            declaration: None,
            position: None,
        }
    }

    /// Records the offending declaration.
    #[must_use]
    pub fn with_declaration(mut self, declaration: impl Into<String>) -> Self {
        self.declaration = Some(declaration.into());
        self
    }

    /// Sets the stage position.
    #[must_use]
    pub fn at(mut self, position: usize) -> Self {
        self.position = Some(position);
        self
    }
}

/// Error raised when a stage target cannot be located.
#[derive(Debug, Clone, Error)]
#[error("Unresolved target '{name}'{}: {reason}", position_suffix(.position))]
pub struct UnresolvedTargetError {
    /// The method or type name that failed to resolve.
    pub name: String,
    /// Why resolution failed.
    pub reason: String,
    /// Position of the stage in the pipeline.
    pub position: Option<usize>,
}

impl UnresolvedTargetError {
    /// Creates a new unresolved target error.
    #[must_use]
    pub fn new(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            reason: reason.into(),
            position: None,
        }
    }

    /// Creates the error for a name found nowhere.
    #[must_use]
    pub fn not_found(name: impl Into<String>) -> Self {
        Self::new(name, "not a host method, registered function or type")
    }

    /// Sets the stage position.
    #[must_use]
    pub fn at(mut self, position: usize) -> Self {
        self.position = Some(position);
        self
    }
}

/// Error raised when a resolved callable fails.
#[derive(Debug, Error)]
#[error("Invocation of '{target}' failed{}: {source}", position_suffix(.position))]
pub struct InvocationError {
    /// The callable that was invoked.
    pub target: String,
    /// Position of the stage in the pipeline.
    pub position: Option<usize>,
    /// The underlying failure.
    #[source]
    pub source: anyhow::Error,
}

impl InvocationError {
    /// Wraps a failure raised by a callable.
    #[must_use]
    pub fn new(target: impl Into<String>, source: anyhow::Error) -> Self {
        Self {
            target: target.into(),
            position: None,
            source,
        }
    }

    /// Creates an error from a plain message.
    #[must_use]
    pub fn msg(target: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(target, anyhow::anyhow!(message.into()))
    }

    /// Sets the stage position.
    #[must_use]
    pub fn at(mut self, position: usize) -> Self {
        self.position = Some(position);
        self
    }
}

/// Error raised when reading an attribute that was never stored.
#[derive(Debug, Clone, Error)]
#[error("Attribute not found: '{name}'")]
pub struct AttributeNotFoundError {
    /// The requested name.
    pub name: String,
}

impl AttributeNotFoundError {
    /// Creates a new attribute not found error.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// Errors raised while loading a stage configuration document.
#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    /// The file extension does not map to a supported format.
    #[error("Unsupported configuration format: {path}")]
    UnsupportedFormat {
        /// The offending path.
        path: String,
    },

    /// The document could not be parsed.
    #[error("Failed to parse {format} config: {reason}")]
    Parse {
        /// The format being parsed.
        format: String,
        /// The parser message.
        reason: String,
    },

    /// A stage entry is structurally invalid.
    #[error("Invalid stage entry '{stage}': {reason}")]
    InvalidEntry {
        /// The stage key in the document.
        stage: String,
        /// What is wrong with it.
        reason: String,
    },
}

impl ConfigError {
    /// Creates a parse error.
    #[must_use]
    pub fn parse(format: impl Into<String>, reason: impl ToString) -> Self {
        Self::Parse {
            format: format.into(),
            reason: reason.to_string(),
        }
    }

    /// Creates an invalid entry error.
    #[must_use]
    pub fn invalid_entry(stage: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidEntry {
            stage: stage.into(),
            reason: reason.into(),
        }
    }
}

/// Error raised when an operation is not allowed in the pipeline's state.
#[derive(Debug, Clone, Error)]
#[error("Cannot {operation} while pipeline is {state}")]
pub struct InvalidStateError {
    /// The attempted operation.
    pub operation: String,
    /// The state the pipeline was in.
    pub state: String,
}

impl InvalidStateError {
    /// Creates a new invalid state error.
    #[must_use]
    pub fn new(operation: impl Into<String>, state: impl ToString) -> Self {
        Self {
            operation: operation.into(),
            state: state.to_string(),
        }
    }
}
