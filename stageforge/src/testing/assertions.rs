//! Test assertions for pipeline runs.

use crate::core::{PipelineState, StageStatus, Value};
use crate::pipeline::Pipeline;

/// Asserts that the pipeline completed its last run.
pub fn assert_completed(pipeline: &Pipeline) {
    assert_eq!(
        pipeline.state(),
        PipelineState::Completed,
        "Expected a completed run, history: {:?}",
        pipeline.history()
    );
}

/// Asserts that the pipeline failed its last run.
pub fn assert_failed(pipeline: &Pipeline) {
    assert_eq!(
        pipeline.state(),
        PipelineState::Failed,
        "Expected a failed run, history: {:?}",
        pipeline.history()
    );
}

/// Asserts the status of every executed stage, in order.
pub fn assert_stage_statuses(pipeline: &Pipeline, expected: &[StageStatus]) {
    let actual: Vec<StageStatus> = pipeline.history().iter().map(|r| r.status).collect();
    assert_eq!(actual, expected, "Unexpected stage statuses");
}

/// Asserts that an attribute holds the expected value.
pub fn assert_attribute(pipeline: &Pipeline, name: &str, expected: impl Into<Value>) {
    let expected = expected.into();
    match pipeline.get_attribute(name) {
        Ok(actual) => assert_eq!(actual, expected, "Unexpected value for attribute '{name}'"),
        Err(err) => panic!("Expected attribute '{name}' = {expected}, got error: {err}"),
    }
}

/// Asserts that an attribute was never stored.
pub fn assert_no_attribute(pipeline: &Pipeline, name: &str) {
    if let Ok(value) = pipeline.get_attribute(name) {
        panic!("Expected no attribute '{name}', found {value}");
    }
}
