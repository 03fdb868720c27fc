//! Categorical coding references embedded in field descriptions.

use once_cell::sync::Lazy;
use regex::Regex;

static DATA_CODING: Lazy<Regex> = Lazy::new(|| Regex::new(r"data-coding\s+([0-9]+)").unwrap());

/// Extract the first `data-coding <digits>` reference from a description.
///
/// Returns the digit run, or an empty string when the description has none.
pub fn extract_coding_reference(description: &str) -> String {
    DATA_CODING
        .captures(description)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .unwrap_or_default()
}
