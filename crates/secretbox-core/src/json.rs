//! JSON well-formedness check.

use serde::de::IgnoredAny;

/// Returns true iff `content` is exactly one syntactically valid JSON value.
///
/// Any top-level value type is accepted. Surrounding whitespace is allowed;
/// trailing content, comments and trailing commas are not. Nothing is
/// allocated for the parsed value.
///
/// Nesting is bounded by `serde_json`'s recursion limit of 128 levels;
/// deeper documents are reported as invalid.
pub fn is_valid_json(content: &str) -> bool {
    serde_json::from_str::<IgnoredAny>(content).is_ok()
}
