//! Testing utilities for stageforge pipelines.
//!
//! This module provides:
//! - A sample host object and sample types
//! - A registry preloaded with sample functions
//! - Assertions over pipeline runs

mod assertions;
mod fixtures;

pub use assertions::{
    assert_attribute, assert_completed, assert_failed, assert_no_attribute, assert_stage_statuses,
};
pub use fixtures::{
    counting_class, failing_class, sample_class, sample_registry, SampleHost, SampleObject,
};
