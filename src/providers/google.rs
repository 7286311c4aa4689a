//! Google Vision and Maps adapters.
//!
//! Thin HTTP clients over the public JSON APIs. Endpoints are
//! configurable so integration tests can point them at local stubs.

use async_trait::async_trait;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::{GeocodeHit, Geocoder, PlaceDetailsData, PlaceDetailsLookup, PlaceHit, PlaceSearch, VisionCapability};
use crate::models::{GeoPoint, LandmarkCandidate, LogoCandidate, NearbyPlace, TextBlock};
use crate::{Error, Result};

/// Bias radius in meters used for location-biased searches.
const SEARCH_BIAS_RADIUS_M: u32 = 5000;

fn provider_error(operation: &str, cause: impl std::fmt::Display) -> Error {
    Error::Provider {
        operation: operation.to_string(),
        cause: cause.to_string(),
    }
}

/// Validates an API key: present, plausible length, safe charset.
///
/// Catches obviously malformed keys before spending a network round
/// trip that would fail with a 403.
fn validate_api_key<'a>(key: Option<&'a str>, operation: &str) -> Result<&'a str> {
    let key = key.ok_or_else(|| provider_error(operation, "API key not configured"))?;
    let well_formed = key.len() >= 20
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if !well_formed {
        return Err(provider_error(operation, "invalid API key format"));
    }
    Ok(key)
}

async fn read_json<T: serde::de::DeserializeOwned>(
    response: reqwest::Response,
    operation: &str,
) -> Result<T> {
    if !response.status().is_success() {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        tracing::error!(operation, status = %status, body = %body, "provider returned error status");
        return Err(provider_error(
            operation,
            format!("status {status}: {body}"),
        ));
    }
    response
        .json::<T>()
        .await
        .map_err(|e| provider_error(operation, e))
}

// ---------------------------------------------------------------------------
// Vision

/// Google Cloud Vision client.
pub struct GoogleVisionClient {
    api_key: Option<String>,
    endpoint: String,
    client: reqwest::Client,
}

impl GoogleVisionClient {
    /// Default API endpoint.
    pub const DEFAULT_ENDPOINT: &'static str = "https://vision.googleapis.com/v1";

    /// Creates a client reading the key from `GOOGLE_VISION_API_KEY`.
    #[must_use]
    pub fn new() -> Self {
        Self {
            api_key: std::env::var("GOOGLE_VISION_API_KEY").ok(),
            endpoint: Self::DEFAULT_ENDPOINT.to_string(),
            client: reqwest::Client::new(),
        }
    }

    /// Sets the API key.
    #[must_use]
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Sets the API endpoint.
    #[must_use]
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    async fn annotate(&self, image: &[u8], feature: &str) -> Result<AnnotateResponse> {
        let operation = "vision_annotate";
        let key = validate_api_key(self.api_key.as_deref(), operation)?;

        let request = json!({
            "requests": [{
                "image": { "content": BASE64.encode(image) },
                "features": [{ "type": feature, "maxResults": 10 }],
            }]
        });

        let response = self
            .client
            .post(format!("{}/images:annotate", self.endpoint))
            .query(&[("key", key)])
            .json(&request)
            .send()
            .await
            .map_err(|e| provider_error(operation, e))?;

        let mut parsed: AnnotateBatchResponse = read_json(response, operation).await?;
        if parsed.responses.is_empty() {
            return Err(provider_error(operation, "empty response batch"));
        }
        let single = parsed.responses.remove(0);
        if let Some(status) = single.error {
            return Err(provider_error(operation, status.message));
        }
        Ok(single)
    }
}

impl Default for GoogleVisionClient {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Deserialize)]
struct AnnotateBatchResponse {
    #[serde(default)]
    responses: Vec<AnnotateResponse>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AnnotateResponse {
    #[serde(default)]
    text_annotations: Vec<TextAnnotation>,
    #[serde(default)]
    logo_annotations: Vec<EntityAnnotation>,
    #[serde(default)]
    landmark_annotations: Vec<EntityAnnotation>,
    error: Option<RpcStatus>,
}

#[derive(Debug, Deserialize)]
struct RpcStatus {
    #[serde(default)]
    message: String,
}

#[derive(Debug, Deserialize)]
struct TextAnnotation {
    #[serde(default)]
    description: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EntityAnnotation {
    #[serde(default)]
    description: String,
    #[serde(default)]
    score: f32,
    #[serde(default)]
    locations: Vec<EntityLocation>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EntityLocation {
    lat_lng: Option<LatLng>,
}

#[derive(Debug, Deserialize)]
struct LatLng {
    latitude: f64,
    longitude: f64,
}

#[async_trait]
impl VisionCapability for GoogleVisionClient {
    async fn detect_text(&self, image: &[u8]) -> Result<Option<TextBlock>> {
        let response = self.annotate(image, "TEXT_DETECTION").await?;
        // The first annotation is the full-image text block.
        Ok(response
            .text_annotations
            .first()
            .filter(|annotation| !annotation.description.trim().is_empty())
            .map(|annotation| TextBlock::from_full_text(annotation.description.clone())))
    }

    async fn detect_logos(&self, image: &[u8]) -> Result<Vec<LogoCandidate>> {
        let response = self.annotate(image, "LOGO_DETECTION").await?;
        Ok(response
            .logo_annotations
            .into_iter()
            .map(|annotation| LogoCandidate {
                label: annotation.description,
                score: annotation.score,
            })
            .collect())
    }

    async fn detect_landmarks(&self, image: &[u8]) -> Result<Vec<LandmarkCandidate>> {
        let response = self.annotate(image, "LANDMARK_DETECTION").await?;
        Ok(response
            .landmark_annotations
            .into_iter()
            .map(|annotation| {
                let location = annotation
                    .locations
                    .first()
                    .and_then(|l| l.lat_lng.as_ref())
                    .map(|ll| GeoPoint::new(ll.latitude, ll.longitude));
                LandmarkCandidate {
                    label: annotation.description,
                    score: annotation.score,
                    location,
                }
            })
            .collect())
    }
}

// ---------------------------------------------------------------------------
// Maps

/// Google Maps client covering geocoding, place search and details.
pub struct GoogleMapsClient {
    api_key: Option<String>,
    endpoint: String,
    client: reqwest::Client,
}

impl GoogleMapsClient {
    /// Default API endpoint.
    pub const DEFAULT_ENDPOINT: &'static str = "https://maps.googleapis.com/maps/api";

    /// Creates a client reading the key from `GOOGLE_MAPS_API_KEY`.
    #[must_use]
    pub fn new() -> Self {
        Self {
            api_key: std::env::var("GOOGLE_MAPS_API_KEY").ok(),
            endpoint: Self::DEFAULT_ENDPOINT.to_string(),
            client: reqwest::Client::new(),
        }
    }

    /// Sets the API key.
    #[must_use]
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Sets the API endpoint.
    #[must_use]
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    async fn get<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
        operation: &str,
    ) -> Result<T> {
        let key = validate_api_key(self.api_key.as_deref(), operation)?;
        let response = self
            .client
            .get(format!("{}/{path}", self.endpoint))
            .query(params)
            .query(&[("key", key)])
            .send()
            .await
            .map_err(|e| provider_error(operation, e))?;
        read_json(response, operation).await
    }
}

impl Default for GoogleMapsClient {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Deserialize)]
struct MapsEnvelope<T> {
    #[serde(default = "String::new")]
    status: String,
    #[serde(default)]
    error_message: Option<String>,
    #[serde(default = "Vec::new")]
    results: Vec<T>,
}

impl<T> MapsEnvelope<T> {
    /// `ZERO_RESULTS` is a clean miss; anything other than `OK` after
    /// that is a provider failure.
    fn into_results(self, operation: &str) -> Result<Vec<T>> {
        match self.status.as_str() {
            "OK" => Ok(self.results),
            "ZERO_RESULTS" => Ok(Vec::new()),
            other => Err(provider_error(
                operation,
                format!(
                    "status {other}: {}",
                    self.error_message.unwrap_or_default()
                ),
            )),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct MapsLatLng {
    lat: f64,
    lng: f64,
}

#[derive(Debug, Deserialize)]
struct Geometry {
    location: MapsLatLng,
    viewport: Option<Viewport>,
}

#[derive(Debug, Deserialize)]
struct Viewport {
    northeast: MapsLatLng,
    southwest: MapsLatLng,
}

#[derive(Debug, Deserialize)]
struct GeocodeResult {
    geometry: Geometry,
    #[serde(default)]
    formatted_address: String,
    place_id: Option<String>,
}

/// Confidence from viewport area: a tighter viewport means a more
/// precise answer.
fn viewport_confidence(viewport: Option<&Viewport>) -> f32 {
    let Some(viewport) = viewport else {
        return 0.7;
    };
    let area = (viewport.northeast.lat - viewport.southwest.lat).abs()
        * (viewport.northeast.lng - viewport.southwest.lng).abs();
    if area < 0.0001 {
        0.95
    } else if area < 0.001 {
        0.9
    } else if area < 0.01 {
        0.85
    } else if area < 0.1 {
        0.8
    } else {
        0.7
    }
}

#[async_trait]
impl Geocoder for GoogleMapsClient {
    async fn geocode(&self, text: &str, bias: Option<GeoPoint>) -> Result<Option<GeocodeHit>> {
        let operation = "geocode";
        let mut params = vec![("address", text.to_string())];
        if let Some(bias) = bias {
            params.push(("location", bias.to_string()));
        }

        let envelope: MapsEnvelope<GeocodeResult> =
            self.get("geocode/json", &params, operation).await?;
        let mut results = envelope.into_results(operation)?;
        if results.is_empty() {
            return Ok(None);
        }
        let first = results.remove(0);
        let confidence = viewport_confidence(first.geometry.viewport.as_ref());
        Ok(Some(GeocodeHit {
            location: GeoPoint::new(first.geometry.location.lat, first.geometry.location.lng),
            formatted_address: first.formatted_address,
            place_id: first.place_id,
            confidence,
        }))
    }
}

#[derive(Debug, Deserialize)]
struct PlaceResult {
    #[serde(default)]
    name: String,
    formatted_address: Option<String>,
    vicinity: Option<String>,
    geometry: Geometry,
    rating: Option<f32>,
    place_id: Option<String>,
    #[serde(default)]
    types: Vec<String>,
}

#[async_trait]
impl PlaceSearch for GoogleMapsClient {
    async fn text_search(&self, query: &str, bias: Option<GeoPoint>) -> Result<Vec<PlaceHit>> {
        let operation = "place_text_search";
        let mut params = vec![("query", query.to_string())];
        if let Some(bias) = bias {
            params.push(("location", bias.to_string()));
            params.push(("radius", SEARCH_BIAS_RADIUS_M.to_string()));
        }

        let envelope: MapsEnvelope<PlaceResult> =
            self.get("place/textsearch/json", &params, operation).await?;
        Ok(envelope
            .into_results(operation)?
            .into_iter()
            .map(|place| PlaceHit {
                location: GeoPoint::new(place.geometry.location.lat, place.geometry.location.lng),
                name: place.name,
                address: place.formatted_address.or(place.vicinity),
                rating: place.rating,
                place_id: place.place_id,
            })
            .collect())
    }

    async fn nearby(&self, center: GeoPoint, radius_m: u32) -> Result<Vec<NearbyPlace>> {
        let operation = "place_nearby_search";
        let params = vec![
            ("location", center.to_string()),
            ("radius", radius_m.to_string()),
        ];

        let envelope: MapsEnvelope<PlaceResult> = self
            .get("place/nearbysearch/json", &params, operation)
            .await?;
        Ok(envelope
            .into_results(operation)?
            .into_iter()
            .map(|place| {
                let location =
                    GeoPoint::new(place.geometry.location.lat, place.geometry.location.lng);
                NearbyPlace {
                    name: place.name,
                    kind: place
                        .types
                        .first()
                        .map_or_else(|| "point_of_interest".to_string(), |t| t.replace('_', " ")),
                    distance_m: center.distance_km(&location) * 1000.0,
                    location,
                }
            })
            .collect())
    }
}

#[derive(Debug, Deserialize)]
struct DetailsEnvelope {
    #[serde(default = "String::new")]
    status: String,
    #[serde(default)]
    error_message: Option<String>,
    result: Option<DetailsResult>,
}

#[derive(Debug, Default, Deserialize)]
struct DetailsResult {
    opening_hours: Option<DetailsOpeningHours>,
    formatted_phone_number: Option<String>,
    website: Option<String>,
    wheelchair_accessible_entrance: Option<bool>,
}

#[derive(Debug, Deserialize)]
struct DetailsOpeningHours {
    open_now: Option<bool>,
    #[serde(default)]
    weekday_text: Vec<String>,
}

#[async_trait]
impl PlaceDetailsLookup for GoogleMapsClient {
    async fn details(&self, place_id: &str) -> Result<PlaceDetailsData> {
        let operation = "place_details";
        let params = vec![
            ("place_id", place_id.to_string()),
            (
                "fields",
                "opening_hours,formatted_phone_number,website,wheelchair_accessible_entrance"
                    .to_string(),
            ),
        ];

        let envelope: DetailsEnvelope =
            self.get("place/details/json", &params, operation).await?;
        if envelope.status != "OK" {
            return Err(provider_error(
                operation,
                format!(
                    "status {}: {}",
                    envelope.status,
                    envelope.error_message.unwrap_or_default()
                ),
            ));
        }
        let result = envelope.result.unwrap_or_default();
        let (open_now, weekday_text) = result
            .opening_hours
            .map_or((None, Vec::new()), |hours| (hours.open_now, hours.weekday_text));
        Ok(PlaceDetailsData {
            open_now,
            weekday_text,
            phone_number: result.formatted_phone_number,
            website: result.website,
            wheelchair_accessible: result.wheelchair_accessible_entrance,
        })
    }
}
