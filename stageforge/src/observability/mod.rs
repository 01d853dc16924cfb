//! Logging setup.
//!
//! The engine logs through `tracing`; nothing is printed unless the
//! application installs a subscriber. [`init_tracing`] installs a plain
//! `fmt` subscriber for binaries and tests that do not bring their own.

use tracing_subscriber::EnvFilter;

/// Installs a global `fmt` subscriber filtered by `filter`
/// (e.g. `"stageforge=debug"`). `RUST_LOG` takes precedence when set.
///
/// Returns false if a global subscriber was already installed.
pub fn init_tracing(filter: &str) -> bool {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init()
        .is_ok()
}

/// Installs a global subscriber that writes one JSON object per event.
///
/// Returns false if a global subscriber was already installed.
pub fn init_json_tracing(filter: &str) -> bool {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));
    tracing_subscriber::fmt()
        .json()
        .with_env_filter(filter)
        .try_init()
        .is_ok()
}
