//! Pipeline execution.
//!
//! This module provides:
//! - The [`Pipeline`] execution engine
//! - The attribute store stage results are written to
//! - Pipeline options
//! - Per-stage execution records and stage rendering

mod engine;
mod options;
mod store;
mod trace;


pub use engine::Pipeline;
pub use options::PipelineOptions;
pub use store::AttributeStore;
pub use trace::{render_card, render_cards, StageRecord};
