//! Per-client sliding-window rate limiting.
//!
//! Checked before any external call so a throttled client costs
//! nothing downstream.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::time::{Duration, Instant};

use crate::{Error, Result};

/// Sliding-window rate limiter keyed by client id.
///
/// Each client holds a `VecDeque` of request timestamps; a check
/// prunes stamps older than the window (dropping clients whose deque
/// drains, so the map stays bounded by the live-client count), rejects
/// when the remainder is at the limit, and records otherwise.
/// Prune-check-record is atomic under the mutex.
#[derive(Debug)]
pub struct RateLimiter {
    windows: Mutex<HashMap<String, VecDeque<Instant>>>,
    max_requests: usize,
    window: Duration,
}

impl RateLimiter {
    /// Creates a limiter allowing `max_requests` per `window` per
    /// client.
    #[must_use]
    pub fn new(max_requests: usize, window: Duration) -> Self {
        Self {
            windows: Mutex::new(HashMap::new()),
            max_requests,
            window,
        }
    }

    /// Default settings matching the pipeline config defaults:
    /// 30 requests per 60 seconds.
    #[must_use]
    pub fn default_settings() -> Self {
        Self::new(30, Duration::from_secs(60))
    }

    /// Admits or rejects a request from `client_id`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::RateLimited`] when the client has exhausted
    /// its window. A poisoned lock also rejects: unlike the cache,
    /// failing open here would disable throttling entirely.
    pub fn check(&self, client_id: &str) -> Result<()> {
        let mut windows = self.windows.lock().map_err(|_| Error::RateLimited {
            client_id: client_id.to_string(),
        })?;

        let now = Instant::now();

        // Prune every client's expired stamps and drop drained deques
        // so distinct client ids never accumulate dead map entries.
        windows.retain(|_, stamps| {
            while let Some(front) = stamps.front() {
                if now.duration_since(*front) >= self.window {
                    stamps.pop_front();
                } else {
                    break;
                }
            }
            !stamps.is_empty()
        });

        let stamps = windows.entry(client_id.to_string()).or_default();

        if stamps.len() >= self.max_requests {
            tracing::warn!(client_id, in_window = stamps.len(), "rate limit exceeded");
            return Err(Error::RateLimited {
                client_id: client_id.to_string(),
            });
        }

        stamps.push_back(now);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allows_up_to_limit() {
        let limiter = RateLimiter::new(3, Duration::from_secs(60));
        for _ in 0..3 {
            assert!(limiter.check("a").is_ok());
        }
        assert!(matches!(
            limiter.check("a"),
            Err(Error::RateLimited { .. })
        ));
    }

    #[test]
    fn test_clients_are_independent() {
        let limiter = RateLimiter::new(1, Duration::from_secs(60));
        assert!(limiter.check("a").is_ok());
        assert!(limiter.check("b").is_ok());
        assert!(limiter.check("a").is_err());
    }

    #[test]
    fn test_drained_clients_are_dropped() {
        let limiter = RateLimiter::new(5, Duration::from_millis(10));
        assert!(limiter.check("a").is_ok());
        std::thread::sleep(Duration::from_millis(15));
        assert!(limiter.check("b").is_ok());

        // Client a's stamps all expired, so its map entry is gone.
        let windows = limiter.windows.lock().expect("lock");
        assert_eq!(windows.len(), 1);
        assert!(windows.contains_key("b"));
    }

    #[test]
    fn test_window_expiry_readmits() {
        let limiter = RateLimiter::new(1, Duration::from_millis(10));
        assert!(limiter.check("a").is_ok());
        assert!(limiter.check("a").is_err());
        std::thread::sleep(Duration::from_millis(15));
        assert!(limiter.check("a").is_ok());
    }
}
