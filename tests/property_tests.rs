//! Property-based tests for the pure pipeline components.

// Property tests use expect/unwrap for simplicity - panics are acceptable in tests
#![allow(clippy::expect_used, clippy::unwrap_used)]

use std::time::Duration;

use proptest::prelude::*;
use whereabouts::RateLimiter;
use whereabouts::cache::{CacheKind, cache_key};
use whereabouts::escalation;
use whereabouts::knowledge::known_businesses;
use whereabouts::models::{GeoPoint, Provenance, RecognitionResult, Signals, TextBlock};
use whereabouts::text;

fn valid_point() -> impl Strategy<Value = GeoPoint> {
    (-90.0_f64..=90.0, -180.0_f64..=180.0).prop_map(|(lat, lng)| GeoPoint::new(lat, lng))
}

fn signals_with_text(full_text: &str) -> Signals {
    Signals {
        text: Some(TextBlock::from_full_text(full_text)),
        ..Signals::default()
    }
}

proptest! {
    /// Cleaning is idempotent: a second pass never changes anything.
    #[test]
    fn prop_clean_is_idempotent(input in ".{0,200}") {
        let once = text::clean(&input);
        prop_assert_eq!(text::clean(&once), once);
    }

    /// Cleaned text is trimmed and never contains runs of whitespace.
    #[test]
    fn prop_clean_normalizes_whitespace(input in ".{0,200}") {
        let cleaned = text::clean(&input);
        prop_assert_eq!(cleaned.trim(), cleaned.as_str());
        prop_assert!(!cleaned.contains("  "));
        prop_assert!(!cleaned.contains('\n'));
    }

    /// An extracted business name is already in canonical upper case.
    #[test]
    fn prop_business_name_is_uppercase(input in "[a-zA-Z0-9 &']{0,80}") {
        if let Some(name) = text::extract_business_name(&input) {
            prop_assert_eq!(name.to_uppercase(), name);
        }
    }

    /// The query builder is a pure function of its inputs.
    #[test]
    fn prop_build_query_is_deterministic(
        input in "[a-zA-Z0-9 ]{0,120}",
        point in valid_point(),
    ) {
        let signals = signals_with_text(&input);
        let first = escalation::build_query(&signals, Some(point));
        let second = escalation::build_query(&signals, Some(point));
        prop_assert_eq!(first, second);
    }

    /// A hint always lands in the query as a `near` suffix.
    #[test]
    fn prop_build_query_appends_hint(
        input in "[a-zA-Z]{3,40}",
        point in valid_point(),
    ) {
        let signals = signals_with_text(&input);
        let query = escalation::build_query(&signals, Some(point));
        prop_assert!(query.contains("near"));
        prop_assert!(query.contains(&point.lat.to_string()));
    }

    /// Result confidence stays in `[0, 1]` whatever a detector reported.
    #[test]
    fn prop_result_confidence_clamped(
        raw in -10.0_f32..10.0,
        point in valid_point(),
    ) {
        let result = RecognitionResult::success(Provenance::WebSearch, point, raw);
        let confidence = result.confidence.expect("success carries confidence");
        prop_assert!((0.0..=1.0).contains(&confidence));
    }

    /// Cache keys are stable, hex-encoded, and partitioned by kind.
    #[test]
    fn prop_cache_keys_stable_and_partitioned(input in ".{1,100}") {
        let geocode = cache_key(CacheKind::Geocode, &input);
        prop_assert_eq!(&geocode, &cache_key(CacheKind::Geocode, &input));
        prop_assert_eq!(geocode.len(), 64);
        prop_assert!(geocode.chars().all(|c| c.is_ascii_hexdigit()));
        prop_assert_ne!(geocode, cache_key(CacheKind::PlaceSearch, &input));
    }

    /// Knowledge-base lookups ignore the query's case entirely.
    #[test]
    fn prop_knowledge_lookup_case_insensitive(input in "[a-zA-Z &']{1,60}") {
        let upper = known_businesses().lookup(&input.to_uppercase()).map(|e| &e.name);
        let lower = known_businesses().lookup(&input.to_lowercase()).map(|e| &e.name);
        prop_assert_eq!(upper, lower);
    }

    /// Haversine distance is symmetric and non-negative.
    #[test]
    fn prop_distance_symmetric(a in valid_point(), b in valid_point()) {
        let forward = a.distance_km(&b);
        let backward = b.distance_km(&a);
        prop_assert!(forward >= 0.0);
        prop_assert!((forward - backward).abs() < 1e-6);
    }

    /// A burst never gets more grants than the configured maximum.
    #[test]
    fn prop_rate_limiter_caps_bursts(max in 1_usize..20, attempts in 1_usize..40) {
        let limiter = RateLimiter::new(max, Duration::from_secs(60));
        let granted = (0..attempts)
            .filter(|_| limiter.check("burst-client").is_ok())
            .count();
        prop_assert_eq!(granted, attempts.min(max));
    }
}
