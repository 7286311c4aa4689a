//! Configuration management.

use std::time::Duration;

use serde::Deserialize;

use crate::{Error, Result};

/// Main configuration for whereabouts.
#[derive(Debug, Clone)]
pub struct WhereaboutsConfig {
    /// Google Maps API key (geocoding, place search, details).
    pub maps_api_key: Option<String>,
    /// Google Vision API key; falls back to the Maps key when unset.
    pub vision_api_key: Option<String>,
    /// Vision API endpoint override.
    pub vision_endpoint: Option<String>,
    /// Maps API endpoint override.
    pub maps_endpoint: Option<String>,
    /// Stage and call timeouts.
    pub timeouts: TimeoutConfig,
    /// Response cache settings.
    pub cache: CacheConfig,
    /// Per-client rate limiting.
    pub rate_limit: RateLimitConfig,
    /// Reject web-search candidates farther than this from the hint.
    pub max_hint_distance_km: f64,
}

/// Timeout settings.
#[derive(Debug, Clone, Copy)]
pub struct TimeoutConfig {
    /// Per vision detection call.
    pub vision: Duration,
    /// Per resolver call (geocode, place search, details).
    pub resolver: Duration,
    /// Whole-request bound for `recognize`.
    pub overall: Duration,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            vision: Duration::from_secs(8),
            resolver: Duration::from_secs(5),
            overall: Duration::from_secs(30),
        }
    }
}

/// Response cache settings.
#[derive(Debug, Clone, Copy)]
pub struct CacheConfig {
    /// Entry time-to-live.
    pub ttl: Duration,
    /// Maximum number of cached entries.
    pub max_keys: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(3600),
            max_keys: 500,
        }
    }
}

/// Per-client rate limiting settings.
#[derive(Debug, Clone, Copy)]
pub struct RateLimitConfig {
    /// Requests allowed per window per client.
    pub max_requests: usize,
    /// Sliding window length.
    pub window: Duration,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_requests: 30,
            window: Duration::from_secs(60),
        }
    }
}

impl Default for WhereaboutsConfig {
    fn default() -> Self {
        Self {
            maps_api_key: None,
            vision_api_key: None,
            vision_endpoint: None,
            maps_endpoint: None,
            timeouts: TimeoutConfig::default(),
            cache: CacheConfig::default(),
            rate_limit: RateLimitConfig::default(),
            max_hint_distance_km: 500.0,
        }
    }
}

/// Configuration file structure (for TOML parsing).
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFile {
    /// Google Maps API key.
    pub maps_api_key: Option<String>,
    /// Google Vision API key.
    pub vision_api_key: Option<String>,
    /// Vision endpoint override.
    pub vision_endpoint: Option<String>,
    /// Maps endpoint override.
    pub maps_endpoint: Option<String>,
    /// Maximum hint distance in kilometers.
    pub max_hint_distance_km: Option<f64>,
    /// Timeouts section.
    pub timeouts: Option<ConfigFileTimeouts>,
    /// Cache section.
    pub cache: Option<ConfigFileCache>,
    /// Rate limit section.
    pub rate_limit: Option<ConfigFileRateLimit>,
}

/// Timeouts section in config file, all in milliseconds.
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFileTimeouts {
    /// Vision call timeout.
    pub vision_ms: Option<u64>,
    /// Resolver call timeout.
    pub resolver_ms: Option<u64>,
    /// Overall request timeout.
    pub overall_ms: Option<u64>,
}

/// Cache section in config file.
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFileCache {
    /// Entry TTL in seconds.
    pub ttl_secs: Option<u64>,
    /// Maximum cached entries.
    pub max_keys: Option<usize>,
}

/// Rate limit section in config file.
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFileRateLimit {
    /// Requests per window.
    pub max_requests: Option<usize>,
    /// Window length in seconds.
    pub window_secs: Option<u64>,
}

impl WhereaboutsConfig {
    /// Creates a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a file path.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] if the file cannot be read or
    /// parsed.
    pub fn load_from_file(path: &std::path::Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            Error::Configuration(format!("cannot read {}: {e}", path.display()))
        })?;

        let file: ConfigFile = toml::from_str(&contents).map_err(|e| {
            Error::Configuration(format!("cannot parse {}: {e}", path.display()))
        })?;

        Ok(Self::from_config_file(file).with_env_overrides())
    }

    /// Loads configuration from the default location.
    ///
    /// Checks the platform config dir and `~/.config/whereabouts/` in
    /// order; absent files fall back to defaults. Environment
    /// overrides always apply last.
    #[must_use]
    pub fn load_default() -> Self {
        let from_disk = directories::BaseDirs::new().and_then(|base_dirs| {
            let candidates = [
                base_dirs.config_dir().join("whereabouts").join("config.toml"),
                base_dirs
                    .home_dir()
                    .join(".config")
                    .join("whereabouts")
                    .join("config.toml"),
            ];
            candidates
                .iter()
                .filter(|path| path.exists())
                .find_map(|path| Self::load_from_file(path).ok())
        });

        from_disk.unwrap_or_else(|| Self::default().with_env_overrides())
    }

    /// Converts a `ConfigFile` to `WhereaboutsConfig`.
    fn from_config_file(file: ConfigFile) -> Self {
        let defaults = Self::default();
        let mut config = Self {
            maps_api_key: file.maps_api_key,
            vision_api_key: file.vision_api_key,
            vision_endpoint: file.vision_endpoint,
            maps_endpoint: file.maps_endpoint,
            max_hint_distance_km: file
                .max_hint_distance_km
                .unwrap_or(defaults.max_hint_distance_km),
            ..defaults
        };
        if let Some(timeouts) = file.timeouts {
            if let Some(ms) = timeouts.vision_ms {
                config.timeouts.vision = Duration::from_millis(ms);
            }
            if let Some(ms) = timeouts.resolver_ms {
                config.timeouts.resolver = Duration::from_millis(ms);
            }
            if let Some(ms) = timeouts.overall_ms {
                config.timeouts.overall = Duration::from_millis(ms);
            }
        }
        if let Some(cache) = file.cache {
            if let Some(secs) = cache.ttl_secs {
                config.cache.ttl = Duration::from_secs(secs);
            }
            if let Some(max_keys) = cache.max_keys {
                config.cache.max_keys = max_keys;
            }
        }
        if let Some(rate_limit) = file.rate_limit {
            if let Some(max_requests) = rate_limit.max_requests {
                config.rate_limit.max_requests = max_requests;
            }
            if let Some(secs) = rate_limit.window_secs {
                config.rate_limit.window = Duration::from_secs(secs);
            }
        }

        config
    }

    /// Applies environment variable overrides.
    ///
    /// `GOOGLE_MAPS_API_KEY` and `GOOGLE_VISION_API_KEY` take
    /// precedence over file values; `WHEREABOUTS_VISION_ENDPOINT` and
    /// `WHEREABOUTS_MAPS_ENDPOINT` override endpoints for testing.
    #[must_use]
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(key) = std::env::var("GOOGLE_MAPS_API_KEY") {
            self.maps_api_key = Some(key);
        }
        if let Ok(key) = std::env::var("GOOGLE_VISION_API_KEY") {
            self.vision_api_key = Some(key);
        }
        if let Ok(endpoint) = std::env::var("WHEREABOUTS_VISION_ENDPOINT") {
            self.vision_endpoint = Some(endpoint);
        }
        if let Ok(endpoint) = std::env::var("WHEREABOUTS_MAPS_ENDPOINT") {
            self.maps_endpoint = Some(endpoint);
        }
        self
    }

    /// Effective vision API key (dedicated key, else the Maps key).
    #[must_use]
    pub fn effective_vision_key(&self) -> Option<&str> {
        self.vision_api_key
            .as_deref()
            .or(self.maps_api_key.as_deref())
    }

    /// Validates settings that would otherwise fail deep inside a
    /// request.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] when no API key is configured
    /// or a bound is zero.
    pub fn validate(&self) -> Result<()> {
        if self.maps_api_key.is_none() && self.vision_api_key.is_none() {
            return Err(Error::Configuration(
                "no API key configured: set GOOGLE_MAPS_API_KEY".to_string(),
            ));
        }
        if self.cache.max_keys == 0 {
            return Err(Error::Configuration("cache.max_keys must be > 0".to_string()));
        }
        if self.rate_limit.max_requests == 0 {
            return Err(Error::Configuration(
                "rate_limit.max_requests must be > 0".to_string(),
            ));
        }
        if self.timeouts.overall.is_zero() {
            return Err(Error::Configuration(
                "timeouts.overall_ms must be > 0".to_string(),
            ));
        }
        if self.max_hint_distance_km <= 0.0 {
            return Err(Error::Configuration(
                "max_hint_distance_km must be > 0".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = WhereaboutsConfig::default();
        assert_eq!(config.timeouts.vision, Duration::from_secs(8));
        assert_eq!(config.timeouts.resolver, Duration::from_secs(5));
        assert_eq!(config.timeouts.overall, Duration::from_secs(30));
        assert_eq!(config.cache.ttl, Duration::from_secs(3600));
        assert_eq!(config.cache.max_keys, 500);
        assert_eq!(config.rate_limit.max_requests, 30);
        assert!((config.max_hint_distance_km - 500.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        writeln!(
            file,
            r#"
maps_api_key = "AIzaSyTest_key_for_config_parsing_0"

[timeouts]
vision_ms = 2000

[cache]
ttl_secs = 60
max_keys = 10

[rate_limit]
max_requests = 5
window_secs = 30
"#
        )
        .expect("write temp config");

        let config = WhereaboutsConfig::load_from_file(file.path()).expect("load");
        assert_eq!(config.timeouts.vision, Duration::from_millis(2000));
        assert_eq!(config.cache.max_keys, 10);
        assert_eq!(config.rate_limit.max_requests, 5);
        assert_eq!(config.rate_limit.window, Duration::from_secs(30));
        // Untouched sections keep defaults.
        assert_eq!(config.timeouts.overall, Duration::from_secs(30));
    }

    #[test]
    fn test_validate_rejects_missing_key() {
        let config = WhereaboutsConfig::default();
        assert!(matches!(config.validate(), Err(Error::Configuration(_))));
    }

    #[test]
    fn test_validate_rejects_zero_bounds() {
        let config = WhereaboutsConfig {
            maps_api_key: Some("AIzaSyTest_key_for_config_parsing_0".to_string()),
            cache: CacheConfig {
                max_keys: 0,
                ..CacheConfig::default()
            },
            ..WhereaboutsConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_vision_key_falls_back_to_maps_key() {
        let config = WhereaboutsConfig {
            maps_api_key: Some("maps-key".to_string()),
            ..WhereaboutsConfig::default()
        };
        assert_eq!(config.effective_vision_key(), Some("maps-key"));

        let config = WhereaboutsConfig {
            vision_api_key: Some("vision-key".to_string()),
            ..config
        };
        assert_eq!(config.effective_vision_key(), Some("vision-key"));
    }
}
