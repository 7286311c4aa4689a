//! Address, phone, and website extraction.

// Allow expect() on static regex patterns - these are guaranteed to compile
#![allow(clippy::expect_used)]

use std::sync::LazyLock;

use regex::Regex;

static ADDRESS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b\d+\s+[A-Za-z][A-Za-z\s]*?(?:Street|St|Avenue|Ave|Road|Rd|Boulevard|Blvd|Lane|Ln|Drive|Dr|Way|Court|Ct|Plaza|Square|Highway|Hwy|Parkway)\b",
    )
    .expect("static regex: street address")
});

static PHONE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:\+\d{1,3}[\s.-]?)?(?:\(\d{2,4}\)[\s.-]?)?\d{3,4}[\s.-]?\d{3,4}[\s.-]?\d{3,4}")
        .expect("static regex: phone number")
});

static WEBSITE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:https?://)?(?:www\.)?[a-z0-9-]+\.[a-z]{2,}(?:\.[a-z]{2,})?(?:/\S*)?")
        .expect("static regex: website")
});

/// Extracts the first `<number> <words> <street-suffix>` span, if any.
#[must_use]
pub fn extract_address(text: &str) -> Option<String> {
    ADDRESS.find(text).map(|m| m.as_str().trim().to_string())
}

/// Extracts the first phone-number-shaped span, if any.
#[must_use]
pub fn extract_phone(text: &str) -> Option<String> {
    PHONE.find(text).map(|m| m.as_str().trim().to_string())
}

/// Extracts the first website-shaped span, if any.
#[must_use]
pub fn extract_website(text: &str) -> Option<String> {
    WEBSITE.find(text).map(|m| m.as_str().trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("visit 388B at 388 Old Kent Road London", Some("388 Old Kent Road"); "road")]
    #[test_case("52 Old Kent Rd SE1", Some("52 Old Kent Rd"); "abbreviated rd")]
    #[test_case("90 Atekong Drive Calabar", Some("90 Atekong Drive"); "drive")]
    #[test_case("no address here", None; "none")]
    fn test_extract_address(input: &str, expected: Option<&str>) {
        assert_eq!(extract_address(input).as_deref(), expected);
    }

    #[test]
    fn test_extract_phone() {
        assert_eq!(
            extract_phone("call 020 7967 6261 today").as_deref(),
            Some("020 7967 6261")
        );
        assert!(extract_phone("no digits").is_none());
    }

    #[test]
    fn test_extract_website() {
        assert_eq!(
            extract_website("see www.enish.co.uk for menus").as_deref(),
            Some("www.enish.co.uk")
        );
        assert!(extract_website("plain words only").is_none());
    }
}
