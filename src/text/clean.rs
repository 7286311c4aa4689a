//! OCR correction pass.

// Allow expect() on static regex patterns - these are guaranteed to compile
#![allow(clippy::expect_used)]

use std::sync::LazyLock;

use regex::Regex;

/// Ordered correction table. Each pattern is applied once, in order,
/// before whitespace collapse; every replacement is a fixed string so
/// the whole pass stays idempotent.
static CORRECTIONS: LazyLock<Vec<(Regex, &'static str)>> = LazyLock::new(|| {
    vec![
        (Regex::new(r"(?i)\bEN\s+SH\b").expect("static regex: OCR correction"), "ENISH"),
        (
            Regex::new(r"(?i)\bALBANY\s+ROADS\b").expect("static regex: OCR correction"),
            "ALBANY ROAD",
        ),
        (
            Regex::new(r"(?i)\bMAD\s+HOUSE\b").expect("static regex: OCR correction"),
            "MADHOUSE",
        ),
    ]
});

static WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("static regex: whitespace collapse"));

/// Applies the OCR correction table and collapses whitespace.
///
/// Idempotent: `clean(clean(s)) == clean(s)` for any input.
#[must_use]
pub fn clean(text: &str) -> String {
    let mut out = text.to_string();
    for (pattern, replacement) in CORRECTIONS.iter() {
        out = pattern.replace_all(&out, *replacement).into_owned();
    }
    WHITESPACE.replace_all(&out, " ").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("EN SH NIGERIAN", "ENISH NIGERIAN"; "split enish")]
    #[test_case("en sh", "ENISH"; "lowercase split enish")]
    #[test_case("ALBANY ROADS SE5", "ALBANY ROAD SE5"; "plural road")]
    #[test_case("MAD house TYRES", "MADHOUSE TYRES"; "mad house join")]
    #[test_case("  lots   of\n\twhitespace  ", "lots of whitespace"; "whitespace collapse")]
    #[test_case("", ""; "empty")]
    fn test_clean(input: &str, expected: &str) {
        assert_eq!(clean(input), expected);
    }

    #[test]
    fn test_clean_is_idempotent() {
        let once = clean("EN SH  on ALBANY ROADS near MAD house");
        assert_eq!(clean(&once), once);
    }

    #[test]
    fn test_enish_not_recorrected() {
        // The corrected form must not contain the correction trigger.
        assert_eq!(clean("ENISH"), "ENISH");
    }
}
