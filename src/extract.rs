//! Image signal extraction: EXIF GPS plus the vision fan-out.

use std::io::Cursor;
use std::sync::Arc;
use std::time::Duration;

use exif::{In, Tag, Value};
use tokio::time::timeout;

use crate::models::{GeoPoint, Signals, TextBlock};
use crate::providers::VisionCapability;

/// Extracts every available signal from an image.
///
/// Extraction itself never fails: a provider error or timeout degrades
/// that signal kind to empty with a warning, and the orchestrator
/// decides what the absence means.
pub struct SignalExtractor {
    vision: Arc<dyn VisionCapability>,
    vision_timeout: Duration,
}

impl SignalExtractor {
    /// Creates an extractor over a vision capability with the given
    /// per-call timeout.
    #[must_use]
    pub fn new(vision: Arc<dyn VisionCapability>, vision_timeout: Duration) -> Self {
        Self {
            vision,
            vision_timeout,
        }
    }

    /// Runs EXIF parsing and the three vision detections, the latter
    /// concurrently with a per-call timeout.
    ///
    /// `vision_reachable` is false only when all three vision calls
    /// failed at the transport level; individual failures just leave
    /// their slot empty.
    pub async fn extract(&self, image: &[u8]) -> Signals {
        let geo_tag = exif_geotag(image);
        if let Some(point) = geo_tag {
            tracing::debug!(lat = point.lat, lng = point.lng, "EXIF geotag present");
        }

        let (text, logos, landmarks) = tokio::join!(
            self.detect_text(image),
            self.detect_logos(image),
            self.detect_landmarks(image),
        );

        let vision_reachable = text.is_ok() || logos.is_ok() || landmarks.is_ok();
        if !vision_reachable {
            tracing::warn!("all vision detections failed; image content is invisible");
        }

        Signals {
            geo_tag,
            text: text.ok().flatten(),
            logos: logos.unwrap_or_default(),
            landmarks: landmarks.unwrap_or_default(),
            vision_reachable,
        }
    }

    async fn detect_text(&self, image: &[u8]) -> Result<Option<TextBlock>, ()> {
        match timeout(self.vision_timeout, self.vision.detect_text(image)).await {
            Ok(Ok(text)) => Ok(text),
            Ok(Err(e)) => {
                tracing::warn!(error = %e, "text detection failed");
                Err(())
            },
            Err(_) => {
                tracing::warn!(timeout_ms = %self.vision_timeout.as_millis(), "text detection timed out");
                Err(())
            },
        }
    }

    async fn detect_logos(&self, image: &[u8]) -> Result<Vec<crate::models::LogoCandidate>, ()> {
        match timeout(self.vision_timeout, self.vision.detect_logos(image)).await {
            Ok(Ok(logos)) => Ok(logos),
            Ok(Err(e)) => {
                tracing::warn!(error = %e, "logo detection failed");
                Err(())
            },
            Err(_) => {
                tracing::warn!(timeout_ms = %self.vision_timeout.as_millis(), "logo detection timed out");
                Err(())
            },
        }
    }

    async fn detect_landmarks(
        &self,
        image: &[u8],
    ) -> Result<Vec<crate::models::LandmarkCandidate>, ()> {
        match timeout(self.vision_timeout, self.vision.detect_landmarks(image)).await {
            Ok(Ok(landmarks)) => Ok(landmarks),
            Ok(Err(e)) => {
                tracing::warn!(error = %e, "landmark detection failed");
                Err(())
            },
            Err(_) => {
                tracing::warn!(
                    timeout_ms = %self.vision_timeout.as_millis(),
                    "landmark detection timed out"
                );
                Err(())
            },
        }
    }
}

/// Parses an EXIF GPS geotag out of raw image bytes.
///
/// Returns `None` when the container has no EXIF data, the GPS fields
/// are absent or malformed, or the decoded coordinates are out of
/// range. Degrees/minutes/seconds rationals are converted to decimal
/// degrees with southern and western hemisphere refs negated.
#[must_use]
pub fn exif_geotag(image: &[u8]) -> Option<GeoPoint> {
    let exif = exif::Reader::new()
        .read_from_container(&mut Cursor::new(image))
        .ok()?;

    let lat = dms_to_decimal(exif.get_field(Tag::GPSLatitude, In::PRIMARY)?)?;
    let lng = dms_to_decimal(exif.get_field(Tag::GPSLongitude, In::PRIMARY)?)?;

    let lat_ref = hemisphere_ref(&exif, Tag::GPSLatitudeRef)?;
    let lng_ref = hemisphere_ref(&exif, Tag::GPSLongitudeRef)?;

    let lat = match lat_ref {
        'N' => lat,
        'S' => -lat,
        _ => return None,
    };
    let lng = match lng_ref {
        'E' => lng,
        'W' => -lng,
        _ => return None,
    };

    let point = GeoPoint::new(lat, lng);
    point.is_valid().then_some(point)
}

fn dms_to_decimal(field: &exif::Field) -> Option<f64> {
    let Value::Rational(ref parts) = field.value else {
        return None;
    };
    if parts.len() < 3 {
        return None;
    }
    let degrees = parts[0].to_f64();
    let minutes = parts[1].to_f64();
    let seconds = parts[2].to_f64();
    Some(degrees + minutes / 60.0 + seconds / 3600.0)
}

fn hemisphere_ref(exif: &exif::Exif, tag: Tag) -> Option<char> {
    let field = exif.get_field(tag, In::PRIMARY)?;
    let Value::Ascii(ref groups) = field.value else {
        return None;
    };
    groups
        .first()
        .and_then(|bytes| bytes.first())
        .map(|byte| byte.to_ascii_uppercase() as char)
}
