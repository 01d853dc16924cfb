//! Event sink system for observability.
//!
//! The pipeline reports its progress as named events with JSON payloads:
//!
//! - `pipeline.started`, `pipeline.completed`, `pipeline.failed`
//! - `stage.started`, `stage.completed`, `stage.failed`

mod sink;

pub use sink::{CollectingEventSink, EventSink, LoggingEventSink, NoOpEventSink};

/// Event emitted when a run starts.
pub const PIPELINE_STARTED: &str = "pipeline.started";
/// Event emitted when every stage of a run succeeded.
pub const PIPELINE_COMPLETED: &str = "pipeline.completed";
/// Event emitted when a run stopped on a failed stage.
pub const PIPELINE_FAILED: &str = "pipeline.failed";
/// Event emitted before a stage executes.
pub const STAGE_STARTED: &str = "stage.started";
/// Event emitted after a stage succeeded.
pub const STAGE_COMPLETED: &str = "stage.completed";
/// Event emitted when a stage failed.
pub const STAGE_FAILED: &str = "stage.failed";
