//! The unified result contract.

use super::{GeoPoint, Provenance};
use serde::{Deserialize, Serialize};

/// Place opening hours, as reported by the place-details capability.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OpeningHours {
    /// Whether the place is open right now, when known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub open_now: Option<bool>,
    /// Human-readable per-weekday hours.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub weekday_text: Vec<String>,
}

/// A place near the recognized location, used for enrichment only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NearbyPlace {
    /// Place name.
    pub name: String,
    /// Provider place type, e.g. `"restaurant"`.
    #[serde(rename = "type")]
    pub kind: String,
    /// Distance from the recognized location in meters.
    pub distance_m: f64,
    /// The place's coordinates.
    pub location: GeoPoint,
}

/// The terminal output of the recognition pipeline.
///
/// Serialized as a flat record for the (out-of-scope) presentation
/// layer. Invariants: when `success` is true, `location` and
/// `confidence` are present; `confidence` is always in `[0, 1]`; `kind`
/// is always one of the fixed provenance tags.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecognitionResult {
    /// Whether recognition produced a usable answer.
    pub success: bool,
    /// Which stage produced this result.
    #[serde(rename = "type")]
    pub kind: Provenance,
    /// Best-guess place name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Formatted address.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    /// Coordinates of the answer. Always present when `success` is true.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<GeoPoint>,
    /// Stage-local confidence in `[0, 1]`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f32>,
    /// Place category, e.g. `"Restaurant"`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Free-text description of how the answer was derived.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Provider place identifier, when a resolver supplied one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub place_id: Option<String>,
    /// Convenience map link.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub map_url: Option<String>,
    /// Aggregate rating, when the place search reported one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<f32>,
    /// Opening hours enrichment.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opening_hours: Option<OpeningHours>,
    /// Phone number enrichment.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    /// Website enrichment.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    /// Accessibility flags, e.g. `"Wheelchair Accessible"`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub accessibility: Vec<String>,
    /// Places near the answer, for context.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub nearby_places: Vec<NearbyPlace>,
    /// Failure description. Only present when `success` is false.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl RecognitionResult {
    /// Builds a successful result.
    ///
    /// The confidence is clamped into `[0, 1]` so the range invariant
    /// holds no matter what a detector or resolver reported.
    #[must_use]
    pub fn success(kind: Provenance, location: GeoPoint, confidence: f32) -> Self {
        Self {
            success: true,
            kind,
            name: None,
            address: None,
            location: Some(location),
            confidence: Some(confidence.clamp(0.0, 1.0)),
            category: None,
            description: None,
            place_id: None,
            map_url: Some(format!(
                "https://www.google.com/maps/search/?api=1&query={},{}",
                location.lat, location.lng
            )),
            rating: None,
            opening_hours: None,
            phone_number: None,
            website: None,
            accessibility: Vec::new(),
            nearby_places: Vec::new(),
            error: None,
        }
    }

    /// Builds a failure result.
    ///
    /// `kind` records the stage that gave up; the provenance vocabulary
    /// is fixed even for failures.
    #[must_use]
    pub fn failure(kind: Provenance, error: impl Into<String>) -> Self {
        Self {
            success: false,
            kind,
            name: None,
            address: None,
            location: None,
            confidence: None,
            category: None,
            description: None,
            place_id: None,
            map_url: None,
            rating: None,
            opening_hours: None,
            phone_number: None,
            website: None,
            accessibility: Vec::new(),
            nearby_places: Vec::new(),
            error: Some(error.into()),
        }
    }

    /// Sets the place name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets the formatted address.
    #[must_use]
    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }

    /// Sets the category.
    #[must_use]
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the provider place identifier.
    #[must_use]
    pub fn with_place_id(mut self, place_id: impl Into<String>) -> Self {
        self.place_id = Some(place_id.into());
        self
    }

    /// Sets the rating.
    #[must_use]
    pub const fn with_rating(mut self, rating: f32) -> Self {
        self.rating = Some(rating);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_invariants() {
        let result = RecognitionResult::success(
            Provenance::ExifGeotag,
            GeoPoint::new(51.5, -0.1),
            0.9,
        );
        assert!(result.success);
        assert!(result.location.is_some());
        assert_eq!(result.confidence, Some(0.9));
        assert!(result.error.is_none());
    }

    #[test]
    fn test_confidence_clamped() {
        let high = RecognitionResult::success(Provenance::WebSearch, GeoPoint::new(0.0, 0.0), 1.7);
        assert_eq!(high.confidence, Some(1.0));
        let low = RecognitionResult::success(Provenance::WebSearch, GeoPoint::new(0.0, 0.0), -0.2);
        assert_eq!(low.confidence, Some(0.0));
    }

    #[test]
    fn test_type_field_serialized_as_tag() {
        let result = RecognitionResult::success(
            Provenance::FallbackLocation,
            GeoPoint::new(1.0, 2.0),
            0.3,
        );
        let json = serde_json::to_value(&result).expect("serialize");
        assert_eq!(json["type"], "fallback-location");
        assert_eq!(json["success"], true);
        // Empty enrichment vectors stay off the wire.
        assert!(json.get("nearby_places").is_none());
    }

    #[test]
    fn test_failure_shape() {
        let result = RecognitionResult::failure(Provenance::FallbackLocation, "vision unreachable");
        assert!(!result.success);
        assert!(result.location.is_none());
        assert_eq!(result.error.as_deref(), Some("vision unreachable"));
    }
}
