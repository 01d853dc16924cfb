//! Utility functions: identifiers, timestamps and name validation.

mod ids;
pub mod timestamps;
pub mod validation;

pub use ids::{generate_run_id, generate_stage_id};
pub use timestamps::{iso_format, iso_timestamp, now_utc, Timestamp};
