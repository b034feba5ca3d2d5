//! Parsing for loosely-typed backend metafields.
//!
//! The commerce backend stores facet values in flexible metafields with no
//! schema enforcement. Observed shapes from live stores:
//!
//! - Facet lists arrive either as a JSON array of strings
//!   (`["dry","oily"]`) or as a comma-separated string (`"dry, oily"`),
//!   depending on how the metafield was authored in the admin.
//! - Boolean flags arrive as real JSON booleans or as the strings
//!   `"true"` / `"false"` (any casing).
//!
//! Every parser here is total: malformed input degrades to an empty list or
//! `false`, never an error. A product with a broken metafield simply stops
//! matching facet filters on that axis.

use serde_json::Value;

/// Parses a multi-value facet metafield into a list of strings.
///
/// Attempts a JSON-array parse first; on failure falls back to splitting on
/// commas. Entries are trimmed and empty entries dropped. Returns an empty
/// vec for `None`, empty input, or input that yields nothing meaningful.
#[must_use]
pub fn parse_list_field(raw: Option<&str>) -> Vec<String> {
    let Some(raw) = raw else {
        return Vec::new();
    };
    let raw = raw.trim();
    if raw.is_empty() {
        return Vec::new();
    }

    if let Ok(values) = serde_json::from_str::<Vec<String>>(raw) {
        return values
            .into_iter()
            .map(|v| v.trim().to_owned())
            .filter(|v| !v.is_empty())
            .collect();
    }

    raw.split(',')
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(ToOwned::to_owned)
        .collect()
}

/// Parses a loose boolean metafield into a strict `bool`.
///
/// Accepts JSON `true`, the strings `"true"` / `"false"` in any casing, and
/// treats everything else (numbers, arrays, nulls, other strings) as `false`.
#[must_use]
pub fn parse_bool_field(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::String(s) => s.trim().eq_ignore_ascii_case("true"),
        _ => false,
    }
}

/// Canonicalizes a facet value for membership comparison.
///
/// Lowercases and strips spaces, underscores, and `&` so that admin-authored
/// variants like `"Fine Lines"`, `"fine_lines"`, and `"fine lines"` all
/// compare equal.
#[must_use]
pub fn normalize_facet(value: &str) -> String {
    value
        .chars()
        .filter(|c| !matches!(c, ' ' | '_' | '&'))
        .flat_map(char::to_lowercase)
        .collect()
}
