//! The inbound request shape.

use super::GeoPoint;
use crate::{Error, Result};

/// A single recognition request.
///
/// Created per incoming call and discarded when the pipeline completes.
#[derive(Debug, Clone)]
pub struct RecognitionRequest {
    /// Raw image bytes.
    pub image: Vec<u8>,
    /// Where the caller believes they are, used for bias and fallbacks.
    pub hint: Option<GeoPoint>,
    /// Client identifier for rate limiting.
    pub client_id: Option<String>,
}

impl RecognitionRequest {
    /// Creates a request with neither hint nor client identifier.
    #[must_use]
    pub const fn new(image: Vec<u8>) -> Self {
        Self {
            image,
            hint: None,
            client_id: None,
        }
    }

    /// Sets the hint location.
    #[must_use]
    pub const fn with_hint(mut self, hint: GeoPoint) -> Self {
        self.hint = Some(hint);
        self
    }

    /// Sets the client identifier.
    #[must_use]
    pub fn with_client_id(mut self, client_id: impl Into<String>) -> Self {
        self.client_id = Some(client_id.into());
        self
    }

    /// Validates the request before the pipeline is invoked.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] when the image is empty or the
    /// hint coordinates are out of range.
    pub fn validate(&self) -> Result<()> {
        if self.image.is_empty() {
            return Err(Error::InvalidInput("no image provided".to_string()));
        }
        if let Some(hint) = &self.hint {
            if !hint.is_valid() {
                return Err(Error::InvalidInput(format!(
                    "hint coordinates out of range: {hint}"
                )));
            }
        }
        Ok(())
    }
}
