//! Business-name extraction from cleaned OCR text.

// Allow expect() on static regex patterns - these are guaranteed to compile
#![allow(clippy::expect_used)]

use std::sync::LazyLock;

use regex::Regex;

/// Known full business names, most specific first. A containment hit
/// here returns the canonical form and skips the generic rules.
const PRIORITY_NAMES: &[&str] = &[
    "ENISH NIGERIAN RESTAURANT & LOUNGE",
    "ENISH NIGERIAN RESTAURANT",
    "CARGO SHIPPING",
    "JANIBA GINGER LIMITED",
    "GOMAYS PLAZA",
    "MADHOUSE TYRES",
    "MAD HOUSE TYRES",
    "ARIN WINES",
    "GEORGE BINS FUNFAIR",
    "SEACOAST BANK",
    "TORTOISE",
    "VENCHI",
    "FUNFAIR",
    "ENISH",
];

/// Generic suffix rules, most specific first. Each captures the words
/// leading up to a business-type suffix; the first matching rule wins.
static SUFFIX_RULES: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(?i)\b([A-Z][A-Z'\s]*?FURNITURE)\b",
        r"(?i)\b([A-Z][A-Z'\s]*?NIGERIAN\s+RESTAURANT\s*&?\s*LOUNGE)\b",
        r"(?i)\b([A-Z][A-Z'\s]*?RESTAURANT\s*&\s*LOUNGE)\b",
        r"(?i)\b([A-Z][A-Z'\s]*?RESTAURANT)\b",
        r"(?i)\b([A-Z][A-Z'\s]*?HOTEL)\b",
        r"(?i)\b([A-Z][A-Z'\s]*?TYRES)\b",
        r"(?i)\b([A-Z][A-Z'\s]*?BANK)\b",
    ]
    .iter()
    .map(|pattern| Regex::new(pattern).expect("static regex: business suffix rule"))
    .collect()
});

/// Extracts the most likely business name from cleaned OCR text.
///
/// Priority names are checked first by case-insensitive containment
/// and return their canonical form; otherwise the ordered suffix rules
/// apply and the first match is returned uppercased with whitespace
/// normalized. Returns `None` when nothing matches.
#[must_use]
pub fn extract_business_name(text: &str) -> Option<String> {
    let upper = text.to_uppercase();

    for name in PRIORITY_NAMES {
        if upper.contains(name) {
            return Some((*name).to_string());
        }
    }

    for rule in SUFFIX_RULES.iter() {
        if let Some(matched) = rule.captures(&upper).and_then(|c| c.get(1)) {
            let name = matched
                .as_str()
                .split_whitespace()
                .collect::<Vec<_>>()
                .join(" ");
            if !name.is_empty() {
                return Some(name);
            }
        }
    }

    None
}
