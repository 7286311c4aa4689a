//! The recognition stage machine.
//!
//! Stages run strictly in order and each one short-circuits when it
//! clears its own threshold; a later stage is only consulted after all
//! earlier ones failed to. Confidence values are stage-local and never
//! renormalized across stages. Any error inside a stage degrades that
//! stage to "no candidate" and the machine moves on; once input
//! validation and rate limiting pass, the caller always gets a
//! structured result.

use std::future::Future;
use std::sync::Arc;

use tokio::time::timeout;

use crate::cache::{CacheKind, TtlCache, cache_key};
use crate::config::WhereaboutsConfig;
use crate::escalation;
use crate::extract::SignalExtractor;
use crate::knowledge::{KnowledgeEntry, known_businesses, known_logos};
use crate::models::{
    GeoPoint, OpeningHours, Provenance, RecognitionRequest, RecognitionResult, SearchCandidate,
};
use crate::providers::{
    GeocodeHit, Geocoder, PlaceDetailsData, PlaceDetailsLookup, PlaceHit, PlaceSearch,
    VisionCapability,
    google::{GoogleMapsClient, GoogleVisionClient},
};
use crate::ratelimit::RateLimiter;
use crate::{Result, categorize, text};

/// Confidence attached to an EXIF geotag answer.
const EXIF_CONFIDENCE: f32 = 0.9;
/// Detector score above which a knowledge-base logo hit is terminal.
const LOGO_TERMINAL_THRESHOLD: f32 = 0.8;
/// Confidence attached to non-location and fallback answers.
const LOW_CONFIDENCE: f32 = 0.3;
/// Confidence attached to a curated business-table hit.
const KNOWN_BUSINESS_CONFIDENCE: f32 = 0.9;
/// Web-search confidence when the hit carries no rating.
const WEB_SEARCH_DEFAULT_CONFIDENCE: f32 = 0.8;
/// Radius used for nearby-places enrichment.
const NEARBY_RADIUS_M: u32 = 200;
/// Nearby places kept on the result.
const MAX_NEARBY_PLACES: usize = 5;

/// The recognition pipeline.
///
/// Holds the signal extractor, the resolver capabilities, the shared
/// response cache and the rate limiter. Cheap to share behind an
/// `Arc`; each [`recognize`](Self::recognize) call is independent.
pub struct Pipeline {
    extractor: SignalExtractor,
    geocoder: Arc<dyn Geocoder>,
    places: Arc<dyn PlaceSearch>,
    details: Arc<dyn PlaceDetailsLookup>,
    geocode_cache: TtlCache<GeocodeHit>,
    search_cache: TtlCache<Vec<PlaceHit>>,
    details_cache: TtlCache<PlaceDetailsData>,
    rate_limiter: RateLimiter,
    config: WhereaboutsConfig,
}

impl Pipeline {
    /// Creates a pipeline over explicit capabilities.
    #[must_use]
    pub fn new(
        config: WhereaboutsConfig,
        vision: Arc<dyn VisionCapability>,
        geocoder: Arc<dyn Geocoder>,
        places: Arc<dyn PlaceSearch>,
        details: Arc<dyn PlaceDetailsLookup>,
    ) -> Self {
        let cache = config.cache;
        Self {
            extractor: SignalExtractor::new(vision, config.timeouts.vision),
            geocoder,
            places,
            details,
            geocode_cache: TtlCache::new(cache.max_keys, cache.ttl),
            search_cache: TtlCache::new(cache.max_keys, cache.ttl),
            details_cache: TtlCache::new(cache.max_keys, cache.ttl),
            rate_limiter: RateLimiter::new(config.rate_limit.max_requests, config.rate_limit.window),
            config,
        }
    }

    /// Creates a pipeline backed by the Google adapters, keyed and
    /// pointed per the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Configuration`] when the configuration
    /// fails validation.
    pub fn from_config(config: WhereaboutsConfig) -> Result<Self> {
        config.validate()?;

        let mut vision = GoogleVisionClient::new();
        if let Some(key) = config.effective_vision_key() {
            vision = vision.with_api_key(key);
        }
        if let Some(endpoint) = &config.vision_endpoint {
            vision = vision.with_endpoint(endpoint.clone());
        }

        let mut maps = GoogleMapsClient::new();
        if let Some(key) = &config.maps_api_key {
            maps = maps.with_api_key(key.clone());
        }
        if let Some(endpoint) = &config.maps_endpoint {
            maps = maps.with_endpoint(endpoint.clone());
        }
        let maps = Arc::new(maps);

        Ok(Self::new(
            config,
            Arc::new(vision),
            maps.clone(),
            maps.clone(),
            maps,
        ))
    }

    /// Recognizes the location shown in a photo.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::InvalidInput`] for an empty image or an
    /// out-of-range hint, and [`crate::Error::RateLimited`] when the
    /// client exhausted its window. Everything downstream of those
    /// checks resolves to a structured [`RecognitionResult`] within
    /// the overall timeout.
    #[tracing::instrument(skip(self, request), fields(
        image_bytes = request.image.len(),
        has_hint = request.hint.is_some(),
    ))]
    pub async fn recognize(&self, request: RecognitionRequest) -> Result<RecognitionResult> {
        request.validate()?;
        let client_id = request.client_id.as_deref().unwrap_or("anonymous");
        self.rate_limiter.check(client_id)?;

        match timeout(self.config.timeouts.overall, self.run(&request)).await {
            Ok(result) => Ok(result),
            Err(_) => {
                tracing::warn!(
                    timeout_ms = %self.config.timeouts.overall.as_millis(),
                    "recognition exceeded the overall timeout"
                );
                Ok(request.hint.map_or_else(
                    || {
                        RecognitionResult::failure(
                            Provenance::FallbackLocation,
                            "recognition timed out and no hint location was provided",
                        )
                    },
                    |hint| {
                        RecognitionResult::success(Provenance::FallbackLocation, hint, LOW_CONFIDENCE)
                            .with_description("Recognition timed out; falling back to the hint location")
                    },
                ))
            },
        }
    }

    async fn run(&self, request: &RecognitionRequest) -> RecognitionResult {
        let signals = self.extractor.extract(&request.image).await;
        let hint = request.hint;

        // Stage 1: an embedded geotag beats everything.
        if let Some(point) = signals.geo_tag {
            tracing::info!(lat = point.lat, lng = point.lng, "resolved from EXIF geotag");
            return RecognitionResult::success(Provenance::ExifGeotag, point, EXIF_CONFIDENCE)
                .with_description("Location from the photo's embedded GPS geotag");
        }

        // With no geotag and no vision, the image content is invisible.
        if !signals.vision_reachable {
            return RecognitionResult::failure(
                Provenance::FallbackLocation,
                "vision capability unreachable and no EXIF geotag present",
            );
        }

        // Stage 2: logo match. A high-score knowledge-base hit is
        // terminal; a lower-score hit is held for stage 6.
        let mut logo_fallback: Option<SearchCandidate> = None;
        for logo in &signals.logos {
            let Some(entry) = known_logos().lookup(&logo.label) else {
                continue;
            };
            if logo.score > LOGO_TERMINAL_THRESHOLD {
                tracing::info!(logo = %logo.label, score = logo.score, "resolved from logo");
                return self.entry_result(Provenance::LogoDetection, entry, logo.score);
            }
            if logo_fallback.is_none() {
                logo_fallback = Some(SearchCandidate {
                    name: entry.name.clone(),
                    address: Some(entry.address.clone()),
                    location: Some(entry.location),
                    confidence: logo.score,
                    provenance: Provenance::LogoDetection,
                });
            }
        }

        // Stage 3: non-location guard.
        let full_text = signals.full_text().to_string();
        if !full_text.is_empty() && escalation::is_non_location_item(&full_text) {
            return hint.map_or_else(
                || {
                    RecognitionResult::failure(
                        Provenance::NonLocationItem,
                        "photo shows a non-location item and no hint location was provided",
                    )
                },
                |hint| {
                    RecognitionResult::success(Provenance::NonLocationItem, hint, LOW_CONFIDENCE)
                        .with_description(
                            "Photo shows a non-location item; using the hint location",
                        )
                },
            );
        }

        // Stage 4: text interpretation.
        let cleaned = text::clean(&full_text);
        let business_name = text::extract_business_name(&cleaned);
        let street_address = text::extract_address(&cleaned);
        // Only a candidate actually in hand counts as confidence;
        // unrecognized logos must not suppress escalation.
        let current_confidence = logo_fallback
            .as_ref()
            .map_or(0.0, |candidate| candidate.confidence);

        if business_name.is_some() || street_address.is_some() {
            // Stage 5: escalate to web search when the policy says so.
            if escalation::should_escalate(&signals, current_confidence) {
                let query = escalation::build_query(&signals, hint);
                tracing::debug!(query = %query, "escalating to web search");
                if let Some((candidate, hit)) = self.web_search(&query, hint).await {
                    let name = business_name.clone().unwrap_or_else(|| candidate.name.clone());
                    return self.finish_web_search(candidate, hit, name, &cleaned).await;
                }
            }

            // Stage 6: curated table, then geocoding, then the held
            // logo candidate.
            if let Some(name) = &business_name {
                if let Some(entry) = known_businesses().lookup(name) {
                    tracing::info!(business = %entry.name, "resolved from curated business table");
                    return self.entry_result(
                        Provenance::KnownBusiness,
                        entry,
                        KNOWN_BUSINESS_CONFIDENCE,
                    );
                }
            }

            let geocode_input = [business_name.as_deref(), street_address.as_deref()]
                .into_iter()
                .flatten()
                .collect::<Vec<_>>()
                .join(" ");
            if let Some(hit) = self.geocode_cached(&geocode_input, hint).await {
                tracing::info!(input = %geocode_input, "resolved by geocoding extracted text");
                let mut result =
                    RecognitionResult::success(Provenance::TextBasedLocation, hit.location, hit.confidence)
                        .with_address(hit.formatted_address)
                        .with_description("Location geocoded from text in the photo");
                if let Some(name) = business_name {
                    result = result.with_category(categorize::from_name(&name)).with_name(name);
                }
                if let Some(place_id) = hit.place_id {
                    result = result.with_place_id(place_id);
                }
                return result;
            }

            if let Some(candidate) = logo_fallback.take() {
                if let Some(location) = candidate.location {
                    tracing::info!(logo = %candidate.name, "falling back to held logo candidate");
                    return Self::candidate_result(candidate, location);
                }
            }
        }

        // Stage 7: landmark, preferring its own coordinates.
        for landmark in &signals.landmarks {
            let Some(location) = landmark.location.or(hint) else {
                continue;
            };
            tracing::info!(landmark = %landmark.label, "resolved from landmark detection");
            return RecognitionResult::success(
                Provenance::LandmarkDetection,
                location,
                landmark.score,
            )
            .with_name(landmark.label.clone())
            .with_category("Landmark")
            .with_description("Recognized landmark in the photo");
        }

        // Stage 8: the hint is all that's left.
        hint.map_or_else(
            || {
                RecognitionResult::failure(
                    Provenance::FallbackLocation,
                    "no usable signal in the photo and no hint location was provided",
                )
            },
            |hint| {
                RecognitionResult::success(Provenance::FallbackLocation, hint, LOW_CONFIDENCE)
                    .with_description("No usable signal in the photo; using the hint location")
            },
        )
    }

    /// Runs the place text search and applies candidate validation:
    /// plausible distance from the hint and name overlap with the
    /// query's first significant token. First candidate passing both
    /// wins.
    async fn web_search(
        &self,
        query: &str,
        hint: Option<GeoPoint>,
    ) -> Option<(SearchCandidate, PlaceHit)> {
        let hits = self.text_search_cached(query, hint).await?;
        let token = first_significant_token(query)?;

        for hit in hits {
            if let Some(hint) = hint {
                let distance = hit.location.distance_km(&hint);
                if distance > self.config.max_hint_distance_km {
                    tracing::debug!(
                        name = %hit.name,
                        distance_km = distance,
                        "rejecting web-search candidate: too far from hint"
                    );
                    continue;
                }
            }
            if !name_overlaps(&hit.name, token) {
                tracing::debug!(name = %hit.name, token, "rejecting web-search candidate: no name overlap");
                continue;
            }

            let confidence = hit
                .rating
                .map_or(WEB_SEARCH_DEFAULT_CONFIDENCE, |rating| {
                    (rating / 5.0).min(0.9)
                });
            let candidate = SearchCandidate {
                name: hit.name.clone(),
                address: hit.address.clone(),
                location: Some(hit.location),
                confidence,
                provenance: Provenance::WebSearch,
            };
            return Some((candidate, hit));
        }
        None
    }

    /// Builds the terminal web-search result and enriches it
    /// best-effort; enrichment failures never change the answer.
    async fn finish_web_search(
        &self,
        candidate: SearchCandidate,
        hit: PlaceHit,
        name: String,
        cleaned_text: &str,
    ) -> RecognitionResult {
        let mut result =
            RecognitionResult::success(Provenance::WebSearch, hit.location, candidate.confidence)
                .with_category(categorize::from_name(&name))
                .with_name(name)
                .with_description("Location found via place search on text in the photo");
        if let Some(address) = candidate.address {
            result = result.with_address(address);
        }
        if let Some(rating) = hit.rating {
            result = result.with_rating(rating);
        }
        if let Some(place_id) = &hit.place_id {
            result = result.with_place_id(place_id.clone());
        }

        if let Some(place_id) = &hit.place_id {
            if let Some(details) = self.details_cached(place_id).await {
                if details.open_now.is_some() || !details.weekday_text.is_empty() {
                    result.opening_hours = Some(OpeningHours {
                        open_now: details.open_now,
                        weekday_text: details.weekday_text,
                    });
                }
                result.phone_number = details.phone_number;
                result.website = details.website;
                if details.wheelchair_accessible == Some(true) {
                    result.accessibility.push("Wheelchair Accessible".to_string());
                }
            }
        }

        // OCR-derived contact details fill any gaps the provider left.
        if result.phone_number.is_none() {
            result.phone_number = text::extract_phone(cleaned_text);
        }
        if result.website.is_none() {
            result.website = text::extract_website(cleaned_text);
        }

        if let Some(center) = result.location {
            if let Some(mut nearby) = self
                .absorb("place_nearby_search", self.places.nearby(center, NEARBY_RADIUS_M))
                .await
            {
                nearby.truncate(MAX_NEARBY_PLACES);
                result.nearby_places = nearby;
            }
        }

        result
    }

    /// Turns a curated knowledge entry into a terminal result.
    fn entry_result(
        &self,
        provenance: Provenance,
        entry: &KnowledgeEntry,
        confidence: f32,
    ) -> RecognitionResult {
        let mut result = RecognitionResult::success(provenance, entry.location, confidence)
            .with_name(entry.name.clone())
            .with_address(entry.address.clone())
            .with_category(entry.category.clone())
            .with_description(entry.description.clone());
        if let Some(rating) = entry.rating {
            result = result.with_rating(rating);
        }
        result.phone_number = entry.phone_number.clone();
        result
    }

    /// Turns a held search candidate into a terminal result.
    fn candidate_result(candidate: SearchCandidate, location: GeoPoint) -> RecognitionResult {
        let mut result =
            RecognitionResult::success(candidate.provenance, location, candidate.confidence)
                .with_category(categorize::from_name(&candidate.name))
                .with_name(candidate.name);
        if let Some(address) = candidate.address {
            result = result.with_address(address);
        }
        result
    }

    async fn geocode_cached(&self, input: &str, bias: Option<GeoPoint>) -> Option<GeocodeHit> {
        if input.trim().is_empty() {
            return None;
        }
        let key = cache_key(CacheKind::Geocode, input);
        if let Some(hit) = self.geocode_cache.get(&key) {
            return Some(hit);
        }
        let hit = self
            .absorb("geocode", self.geocoder.geocode(input, bias))
            .await
            .flatten()?;
        self.geocode_cache.put(key, hit.clone());
        Some(hit)
    }

    async fn text_search_cached(
        &self,
        query: &str,
        bias: Option<GeoPoint>,
    ) -> Option<Vec<PlaceHit>> {
        let key = cache_key(CacheKind::PlaceSearch, query);
        if let Some(hits) = self.search_cache.get(&key) {
            return Some(hits);
        }
        let hits = self
            .absorb("place_text_search", self.places.text_search(query, bias))
            .await?;
        self.search_cache.put(key, hits.clone());
        Some(hits)
    }

    async fn details_cached(&self, place_id: &str) -> Option<PlaceDetailsData> {
        let key = cache_key(CacheKind::PlaceDetails, place_id);
        if let Some(details) = self.details_cache.get(&key) {
            return Some(details);
        }
        let details = self
            .absorb("place_details", self.details.details(place_id))
            .await?;
        self.details_cache.put(key, details.clone());
        Some(details)
    }

    /// Bounds a resolver call by the per-call timeout and absorbs the
    /// failure into "no candidate".
    async fn absorb<T>(
        &self,
        operation: &str,
        call: impl Future<Output = Result<T>>,
    ) -> Option<T> {
        match timeout(self.config.timeouts.resolver, call).await {
            Ok(Ok(value)) => Some(value),
            Ok(Err(e)) => {
                tracing::warn!(operation, error = %e, "resolver call failed; stage degraded");
                None
            },
            Err(_) => {
                tracing::warn!(
                    operation,
                    timeout_ms = %self.config.timeouts.resolver.as_millis(),
                    "resolver call timed out; stage degraded"
                );
                None
            },
        }
    }
}

/// First token of the query longer than two characters that is not
/// purely numeric.
fn first_significant_token(query: &str) -> Option<&str> {
    query
        .split_whitespace()
        .find(|token| token.len() > 2 && !token.chars().all(|c| c.is_ascii_digit()))
}

/// Case-insensitive bidirectional containment between a candidate name
/// and the query token.
fn name_overlaps(name: &str, token: &str) -> bool {
    let name = name.to_lowercase();
    let token = token.to_lowercase();
    name.contains(&token) || token.contains(&name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_significant_token() {
        assert_eq!(first_significant_token("TURKIYE FURNITURE near 51,0"), Some("TURKIYE"));
        assert_eq!(first_significant_token("12 345 ab"), None);
        assert_eq!(first_significant_token(""), None);
    }

    #[test]
    fn test_name_overlap_is_bidirectional() {
        assert!(name_overlaps("Turkiye Furniture Ltd", "turkiye"));
        assert!(name_overlaps("Enish", "enish nigerian"));
        assert!(!name_overlaps("Starbucks", "furniture"));
    }
}
