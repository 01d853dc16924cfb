//! Identifier generation.

use rand::Rng;
use uuid::Uuid;

/// Generates a stage identifier: 32 random bits as 8 lowercase hex digits.
#[must_use]
pub fn generate_stage_id() -> String {
    format!("{:08x}", rand::thread_rng().gen::<u32>())
}

/// Generates a run identifier (UUID v4).
#[must_use]
pub fn generate_run_id() -> Uuid {
    Uuid::new_v4()
}
