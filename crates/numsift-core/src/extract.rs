//! Phone-number-like token extraction and deduplication.
//!
//! Tokens are an optional leading `+` followed by 7 to 15 decimal digits.
//! No numbering-plan validation happens here.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;

static TOKEN_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\+?\d{7,15}").expect("token pattern is valid"));

/// Scans `text` left to right and returns every non-overlapping token match.
pub fn extract(text: &str) -> Vec<String> {
    TOKEN_PATTERN
        .find_iter(text)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Trims each token, drops empties and keeps the first occurrence of each.
pub fn dedupe<I, S>(tokens: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for token in tokens {
        let token = token.as_ref().trim();
        if !token.is_empty() && seen.insert(token.to_string()) {
            out.push(token.to_string());
        }
    }
    out
}

/// `dedupe(extract(text))`.
pub fn extract_distinct(text: &str) -> Vec<String> {
    dedupe(extract(text))
}
