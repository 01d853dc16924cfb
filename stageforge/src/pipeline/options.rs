//! Pipeline options.

use crate::resolve::ArgumentMode;
use serde::{Deserialize, Serialize};

fn default_description() -> String {
    "Running pipeline".to_string()
}

/// Options that shape how a pipeline runs and reports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PipelineOptions {
    /// Label used in logs and event payloads.
    pub description: String,
    /// Log per-stage detail at `info` instead of `debug`.
    pub verbose: bool,
    /// How string arguments naming stored attributes are treated.
    pub argument_mode: ArgumentMode,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            description: default_description(),
            verbose: false,
            argument_mode: ArgumentMode::default(),
        }
    }
}

impl PipelineOptions {
    /// Creates default options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Sets verbose logging.
    #[must_use]
    pub const fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Sets the argument mode.
    #[must_use]
    pub const fn with_argument_mode(mut self, mode: ArgumentMode) -> Self {
        self.argument_mode = mode;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults() {
        let options = PipelineOptions::default();
        assert_eq!(options.description, "Running pipeline");
        assert!(!options.verbose);
        assert_eq!(options.argument_mode, ArgumentMode::Literal);
    }

    #[test]
    fn test_deserialize_with_defaults() {
        let json = r#"{"verbose": true, "argument_mode": "stored_references"}"#;
        let options: PipelineOptions = serde_json::from_str(json).unwrap();
        assert_eq!(
            options,
            PipelineOptions::new()
                .with_verbose(true)
                .with_argument_mode(ArgumentMode::StoredReferences)
        );
    }

    #[test]
    fn test_unknown_option_rejected() {
        assert!(serde_json::from_str::<PipelineOptions>(r#"{"colour": "red"}"#).is_err());
    }
}
