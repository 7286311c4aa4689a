//! # Whereabouts
//!
//! Photo location recognition pipeline.
//!
//! Whereabouts takes a single photograph (optionally with a hint location)
//! and produces a best-guess physical place: name, address, coordinates,
//! category and a confidence score. No single signal is reliable on its
//! own — EXIF geotags are often absent, OCR is noisy, logos are ambiguous,
//! and landmark detectors only cover famous structures — so the pipeline
//! arbitrates between independent, partially-overlapping signal sources
//! and escalates to costlier resolvers only when the cheap ones fail.
//!
//! ## Architecture
//!
//! - Signal extraction (EXIF GPS + concurrent vision fan-out)
//! - Static knowledge bases (brand/logo and business-name tables)
//! - Text interpretation (OCR cleanup, business-name and address rules)
//! - Escalation policy (pure decision function + query builder)
//! - External resolvers behind capability traits (vision, geocoding,
//!   place search, place details)
//! - TTL/LRU response cache and per-client sliding-window rate limiter
//! - The stage machine in [`pipeline::Pipeline`] tying it all together
//!
//! ## Example
//!
//! ```rust,ignore
//! use whereabouts::{Pipeline, RecognitionRequest, GeoPoint};
//!
//! let result = pipeline.recognize(RecognitionRequest {
//!     image: image_bytes,
//!     hint: Some(GeoPoint { lat: 51.48, lng: -0.08 }),
//!     client_id: Some("mobile-app".to_string()),
//! }).await?;
//! println!("{} ({})", result.name.unwrap_or_default(), result.kind.as_str());
//! ```

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![warn(missing_docs)]
#![forbid(unsafe_code)]
// multiple_crate_versions is inherently crate-level (detects duplicate
// transitive dependencies) and cannot be scoped tighter.
#![allow(clippy::multiple_crate_versions)]

use thiserror::Error as ThisError;

// Module declarations
pub mod cache;
pub mod categorize;
pub mod config;
pub mod escalation;
pub mod extract;
pub mod knowledge;
pub mod models;
pub mod observability;
pub mod pipeline;
pub mod providers;
pub mod ratelimit;
pub mod text;

// Re-exports for convenience
pub use cache::TtlCache;
pub use config::WhereaboutsConfig;
pub use extract::SignalExtractor;
pub use knowledge::{KnowledgeBase, KnowledgeEntry};
pub use models::{
    Detection, GeoPoint, LandmarkCandidate, LogoCandidate, Provenance, RecognitionRequest,
    RecognitionResult, SearchCandidate, Signals, TextBlock,
};
pub use pipeline::Pipeline;
pub use providers::{Geocoder, PlaceDetailsLookup, PlaceSearch, VisionCapability};
pub use ratelimit::RateLimiter;

/// Error type for whereabouts operations.
///
/// Uses `thiserror` for automatic `Display` and `Error` trait
/// implementations.
///
/// # Error Variant Triggers
///
/// | Variant | Raised When |
/// |---------|-------------|
/// | `Configuration` | Missing API keys or malformed config at startup |
/// | `InvalidInput` | Empty image bytes, out-of-range hint coordinates |
/// | `RateLimited` | Client exceeded its sliding-window request budget |
/// | `Provider` | An external capability call failed or timed out |
///
/// `Provider` errors never escape [`pipeline::Pipeline::recognize`]: they
/// are absorbed at stage boundaries and degrade the stage to "no
/// candidate". Total pipeline exhaustion is not an error either — it
/// resolves to a low-confidence fallback result.
#[derive(Debug, ThisError)]
pub enum Error {
    /// Configuration is missing or invalid.
    ///
    /// Raised at startup, never per-request:
    /// - `GOOGLE_MAPS_API_KEY` / vision credentials are absent
    /// - The TOML config file fails to parse
    /// - Timeout or cache settings are out of range
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Invalid input was provided.
    ///
    /// Raised before the pipeline runs:
    /// - No image bytes were provided
    /// - Hint coordinates are outside valid latitude/longitude ranges
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A client exceeded its request budget.
    ///
    /// Surfaced before any external call is made, protecting the
    /// external-call budget.
    #[error("rate limit exceeded for client '{client_id}'")]
    RateLimited {
        /// The client identifier that was throttled.
        client_id: String,
    },

    /// An external capability call failed.
    ///
    /// Covers timeouts, non-success HTTP statuses and malformed
    /// responses from the vision, geocoding and place-search
    /// capabilities. Internal to the pipeline; callers of
    /// [`pipeline::Pipeline::recognize`] never observe it.
    #[error("provider call '{operation}' failed: {cause}")]
    Provider {
        /// The capability operation that failed.
        operation: String,
        /// The underlying cause.
        cause: String,
    },
}

/// Result type alias for whereabouts operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::InvalidInput("no image provided".to_string());
        assert_eq!(err.to_string(), "invalid input: no image provided");

        let err = Error::Provider {
            operation: "geocode".to_string(),
            cause: "timed out".to_string(),
        };
        assert_eq!(err.to_string(), "provider call 'geocode' failed: timed out");

        let err = Error::RateLimited {
            client_id: "mobile".to_string(),
        };
        assert_eq!(err.to_string(), "rate limit exceeded for client 'mobile'");
    }
}
