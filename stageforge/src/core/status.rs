//! Pipeline state and stage status enums.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The lifecycle state of a pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PipelineState {
    /// Stages may still be added.
    #[default]
    Idle,
    /// Stages are executing.
    Running,
    /// Every stage ran without error.
    Completed,
    /// A stage failed and the run stopped.
    Failed,
}

impl PipelineState {
    /// Returns true once a run has finished, successfully or not.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }
}

impl fmt::Display for PipelineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::Running => write!(f, "running"),
            Self::Completed => write!(f, "completed"),
            Self::Failed => write!(f, "failed"),
        }
    }
}

/// The outcome of a single stage in a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StageStatus {
    /// Stage completed successfully.
    Ok,
    /// Stage failed.
    Fail,
}

impl fmt::Display for StageStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ok => write!(f, "ok"),
            Self::Fail => write!(f, "fail"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pipeline_state_default_and_display() {
        assert_eq!(PipelineState::default(), PipelineState::Idle);
        assert_eq!(PipelineState::Failed.to_string(), "failed");
        assert!(PipelineState::Completed.is_terminal());
        assert!(!PipelineState::Running.is_terminal());
    }

    #[test]
    fn test_stage_status_serialization() {
        let json = serde_json::to_string(&StageStatus::Fail).unwrap();
        assert_eq!(json, "\"fail\"");
    }
}
