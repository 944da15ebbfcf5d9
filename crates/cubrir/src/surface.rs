//! Surface extractor
//!
//! Enumerates the public operations an API surface declaration exposes.
//! An operation is public when its `func` declaration name does not
//! start with the underscore private-name convention.

use regex::Regex;
use std::collections::BTreeSet;

/// Matches top-level function declarations: `func name(`
fn func_pattern() -> Regex {
    Regex::new(r"(?m)^func\s+([A-Za-z0-9_]+)\s*\(").expect("valid func pattern")
}

/// Extract the sorted set of public operation names from surface text.
#[must_use]
pub fn parse_public_operations(surface_text: &str) -> BTreeSet<String> {
    let pattern = func_pattern();
    pattern
        .captures_iter(surface_text)
        .map(|caps| caps[1].to_string())
        .filter(|name| !name.starts_with('_'))
        .collect()
}
