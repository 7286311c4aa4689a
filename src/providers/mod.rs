//! Capability traits for external resolvers.
//!
//! The pipeline never talks to a provider directly; it depends on
//! these traits so tests substitute deterministic stubs and the Google
//! adapters in [`google`] stay swappable.

pub mod google;

use async_trait::async_trait;

use crate::Result;
use crate::models::{GeoPoint, LandmarkCandidate, LogoCandidate, NearbyPlace, TextBlock};

/// Computer-vision signal detection over raw image bytes.
#[async_trait]
pub trait VisionCapability: Send + Sync {
    /// Detects text in the image, if any.
    async fn detect_text(&self, image: &[u8]) -> Result<Option<TextBlock>>;

    /// Detects brand logos, ordered by detector score.
    async fn detect_logos(&self, image: &[u8]) -> Result<Vec<LogoCandidate>>;

    /// Detects landmarks, ordered by detector score.
    async fn detect_landmarks(&self, image: &[u8]) -> Result<Vec<LandmarkCandidate>>;
}

/// One forward-geocoding answer.
#[derive(Debug, Clone, PartialEq)]
pub struct GeocodeHit {
    /// Resolved coordinates.
    pub location: GeoPoint,
    /// Formatted address of the answer.
    pub formatted_address: String,
    /// Provider place identifier, when available.
    pub place_id: Option<String>,
    /// Precision-derived confidence in `[0, 1]`.
    pub confidence: f32,
}

/// Forward geocoding: free text to coordinates.
#[async_trait]
pub trait Geocoder: Send + Sync {
    /// Geocodes `text`, optionally biased towards `bias`.
    ///
    /// Returns `Ok(None)` on a clean zero-result answer; transport and
    /// provider failures are `Err`.
    async fn geocode(&self, text: &str, bias: Option<GeoPoint>) -> Result<Option<GeocodeHit>>;
}

/// One ranked place-search answer.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaceHit {
    /// Place name.
    pub name: String,
    /// Formatted address.
    pub address: Option<String>,
    /// Place coordinates.
    pub location: GeoPoint,
    /// Aggregate rating on the provider's 0–5 scale.
    pub rating: Option<f32>,
    /// Provider place identifier.
    pub place_id: Option<String>,
}

/// Free-text and proximity place search.
#[async_trait]
pub trait PlaceSearch: Send + Sync {
    /// Searches places matching `query`, optionally biased towards
    /// `bias`. Results come back in provider rank order.
    async fn text_search(&self, query: &str, bias: Option<GeoPoint>) -> Result<Vec<PlaceHit>>;

    /// Lists places around `center` within `radius_m` meters, for
    /// result enrichment.
    async fn nearby(&self, center: GeoPoint, radius_m: u32) -> Result<Vec<NearbyPlace>>;
}

/// Extended attributes for a single place.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlaceDetailsData {
    /// Whether the place is currently open.
    pub open_now: Option<bool>,
    /// Human-readable per-weekday hours.
    pub weekday_text: Vec<String>,
    /// Phone number.
    pub phone_number: Option<String>,
    /// Website.
    pub website: Option<String>,
    /// Whether the entrance is wheelchair accessible.
    pub wheelchair_accessible: Option<bool>,
}

/// Place-details lookup by provider place identifier.
#[async_trait]
pub trait PlaceDetailsLookup: Send + Sync {
    /// Fetches extended attributes for `place_id`.
    async fn details(&self, place_id: &str) -> Result<PlaceDetailsData>;
}
