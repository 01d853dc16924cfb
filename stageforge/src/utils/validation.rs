//! Validation utilities for stage names.

use regex::Regex;
use std::sync::LazyLock;

static IDENTIFIER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("valid identifier regex"));

static DOTTED_PATH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*(\.[A-Za-z_][A-Za-z0-9_]*)*$")
        .expect("valid dotted path regex")
});

/// Checks that a name is a plain identifier (`total`, `_x1`).
#[must_use]
pub fn is_identifier(name: &str) -> bool {
    IDENTIFIER.is_match(name)
}

/// Checks that a name is an identifier or a dotted identifier path
/// (`fit`, `model.fit`, `ns.sub.fn`).
#[must_use]
pub fn is_dotted_path(name: &str) -> bool {
    DOTTED_PATH.is_match(name)
}

/// Splits a dotted path into its leading segments and final name.
///
/// Returns `None` for names without a dot.
#[must_use]
pub fn split_path(name: &str) -> Option<(Vec<&str>, &str)> {
    let (head, last) = name.rsplit_once('.')?;
    Some((head.split('.').collect(), last))
}
