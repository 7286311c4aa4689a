//! Detections produced by the signal extractor.

use super::GeoPoint;

/// A block of OCR text recovered from the image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextBlock {
    /// The full detected text, newline-separated as the detector saw it.
    pub full_text: String,
    /// Individual lines, trimmed and non-empty.
    pub lines: Vec<String>,
}

impl TextBlock {
    /// Builds a block from raw detector output, deriving the line list.
    #[must_use]
    pub fn from_full_text(full_text: impl Into<String>) -> Self {
        let full_text = full_text.into();
        let lines = full_text
            .split(['\n', '\r'])
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(ToString::to_string)
            .collect();
        Self { full_text, lines }
    }
}

/// A brand logo the detector believes is present.
#[derive(Debug, Clone, PartialEq)]
pub struct LogoCandidate {
    /// Detector label, e.g. `"Starbucks"`.
    pub label: String,
    /// Detector score in `[0, 1]`.
    pub score: f32,
}

/// A famous structure the detector believes is present.
#[derive(Debug, Clone, PartialEq)]
pub struct LandmarkCandidate {
    /// Detector label, e.g. `"Eiffel Tower"`.
    pub label: String,
    /// Detector score in `[0, 1]`.
    pub score: f32,
    /// The landmark's own coordinates, when the detector knows them.
    pub location: Option<GeoPoint>,
}

/// A single piece of evidence extracted from the image.
///
/// Produced once per request by the signal extractor; immutable and owned
/// by the orchestrator for the request's lifetime.
#[derive(Debug, Clone, PartialEq)]
pub enum Detection {
    /// An embedded EXIF GPS tag.
    GeoTag(GeoPoint),
    /// OCR text.
    Text(TextBlock),
    /// A logo candidate.
    Logo(LogoCandidate),
    /// A landmark candidate.
    Landmark(LandmarkCandidate),
}

/// The joined product of the extraction fan-out.
///
/// Each detection kind fills its own slot; a slow or failed detector
/// leaves its slot empty rather than failing the join. `vision_reachable`
/// is false only when every vision call failed at the transport level,
/// which the pipeline reports as infrastructure failure when no other
/// signal can carry the request.
#[derive(Debug, Clone, Default)]
pub struct Signals {
    /// Embedded geo-tag, if the image carried one.
    pub geo_tag: Option<GeoPoint>,
    /// OCR text, if any was detected.
    pub text: Option<TextBlock>,
    /// Logo candidates, best first.
    pub logos: Vec<LogoCandidate>,
    /// Landmark candidates, best first.
    pub landmarks: Vec<LandmarkCandidate>,
    /// False only when the vision capability was entirely unreachable.
    pub vision_reachable: bool,
}

impl Signals {
    /// Folds a list of detections into slotted form.
    ///
    /// Later geo-tags or text blocks do not replace earlier ones; logos
    /// and landmarks accumulate in arrival order.
    #[must_use]
    pub fn collect(detections: impl IntoIterator<Item = Detection>) -> Self {
        let mut signals = Self {
            vision_reachable: true,
            ..Self::default()
        };
        for detection in detections {
            match detection {
                Detection::GeoTag(point) => {
                    if signals.geo_tag.is_none() {
                        signals.geo_tag = Some(point);
                    }
                }
                Detection::Text(block) => {
                    if signals.text.is_none() {
                        signals.text = Some(block);
                    }
                }
                Detection::Logo(logo) => signals.logos.push(logo),
                Detection::Landmark(landmark) => signals.landmarks.push(landmark),
            }
        }
        signals
    }

    /// The full OCR text, or empty when no text was detected.
    #[must_use]
    pub fn full_text(&self) -> &str {
        self.text.as_ref().map_or("", |t| t.full_text.as_str())
    }

    /// Whether any detection of any kind is present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.geo_tag.is_none()
            && self.text.is_none()
            && self.logos.is_empty()
            && self.landmarks.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_block_lines() {
        let block = TextBlock::from_full_text("ENISH\n\nALBANY ROAD \r\nLONDON");
        assert_eq!(block.lines, vec!["ENISH", "ALBANY ROAD", "LONDON"]);
    }

    #[test]
    fn test_collect_keeps_first_geotag() {
        let signals = Signals::collect(vec![
            Detection::GeoTag(GeoPoint::new(1.0, 2.0)),
            Detection::GeoTag(GeoPoint::new(3.0, 4.0)),
        ]);
        assert_eq!(signals.geo_tag, Some(GeoPoint::new(1.0, 2.0)));
    }

    #[test]
    fn test_collect_accumulates_logos() {
        let signals = Signals::collect(vec![
            Detection::Logo(LogoCandidate {
                label: "Shell".to_string(),
                score: 0.9,
            }),
            Detection::Logo(LogoCandidate {
                label: "BP".to_string(),
                score: 0.4,
            }),
        ]);
        assert_eq!(signals.logos.len(), 2);
        assert_eq!(signals.logos[0].label, "Shell");
    }

    #[test]
    fn test_empty_signals() {
        assert!(Signals::collect(vec![]).is_empty());
    }
}
