//! Result provenance tags and the candidate type stages exchange.

use super::GeoPoint;
use serde::{Deserialize, Serialize};

/// Which stage produced a result.
///
/// A fixed vocabulary recorded on every result. Confidence values are
/// only comparable within a provenance, never across them — the stage
/// ordering, not the number, is the priority rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Provenance {
    /// An embedded EXIF GPS tag was present.
    ExifGeotag,
    /// A detected logo matched the logo knowledge base.
    LogoDetection,
    /// A validated place text-search hit.
    WebSearch,
    /// Extracted text was geocoded.
    TextBasedLocation,
    /// Extracted text matched the business knowledge base exactly.
    KnownBusiness,
    /// A landmark detection carried the answer.
    LandmarkDetection,
    /// Nothing usable was found; the hint location was returned.
    FallbackLocation,
    /// The image is a non-location document (payment card, URL shot).
    NonLocationItem,
}

impl Provenance {
    /// Returns the tag as its wire string.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::ExifGeotag => "exif-geotag",
            Self::LogoDetection => "logo-detection",
            Self::WebSearch => "web-search",
            Self::TextBasedLocation => "text-based-location",
            Self::KnownBusiness => "known-business",
            Self::LandmarkDetection => "landmark-detection",
            Self::FallbackLocation => "fallback-location",
            Self::NonLocationItem => "non-location-item",
        }
    }

    /// All tags, in stage order.
    #[must_use]
    pub const fn all() -> [Self; 8] {
        [
            Self::ExifGeotag,
            Self::LogoDetection,
            Self::NonLocationItem,
            Self::WebSearch,
            Self::TextBasedLocation,
            Self::KnownBusiness,
            Self::LandmarkDetection,
            Self::FallbackLocation,
        ]
    }
}

impl std::fmt::Display for Provenance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A candidate answer held between stages.
///
/// The unit the escalation policy and external resolvers exchange. The
/// confidence is stage-local: it only feeds that stage's own
/// terminal/continue decision and the final payload.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchCandidate {
    /// Candidate place name.
    pub name: String,
    /// Formatted address, when known.
    pub address: Option<String>,
    /// Coordinates, when known.
    pub location: Option<GeoPoint>,
    /// Stage-local confidence in `[0, 1]`.
    pub confidence: f32,
    /// Which stage produced the candidate.
    pub provenance: Provenance,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_strings() {
        assert_eq!(Provenance::ExifGeotag.as_str(), "exif-geotag");
        assert_eq!(Provenance::NonLocationItem.as_str(), "non-location-item");
        assert_eq!(Provenance::KnownBusiness.as_str(), "known-business");
    }

    #[test]
    fn test_serde_kebab_case() {
        let json = serde_json::to_string(&Provenance::TextBasedLocation).expect("serialize");
        assert_eq!(json, "\"text-based-location\"");
        let back: Provenance = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, Provenance::TextBasedLocation);
    }

    #[test]
    fn test_all_tags_distinct() {
        let tags = Provenance::all();
        for (i, a) in tags.iter().enumerate() {
            for b in &tags[i + 1..] {
                assert_ne!(a.as_str(), b.as_str());
            }
        }
    }
}
