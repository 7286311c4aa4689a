//! In-memory TTL cache for resolver responses.
//!
//! Geocoding and place-search answers for the same input are stable
//! over the cache window, so repeated photos of the same storefront
//! skip the network entirely.
//!
//! # Lock Poisoning
//!
//! Lock poisoning is handled with fail-open semantics: a poisoned lock
//! turns a read into a miss and a store into a no-op. The cache is a
//! cost optimization, not a correctness requirement, and a transient
//! panic elsewhere must not take recognition down with it.

use std::num::NonZeroUsize;
use std::sync::RwLock;
use std::time::{Duration, Instant};

use lru::LruCache;
use sha2::{Digest, Sha256};

/// Which resolver a cached value belongs to. Kinds share one cache but
/// never collide because the kind is part of the key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheKind {
    /// Forward-geocoding responses.
    Geocode,
    /// Text and nearby place-search responses.
    PlaceSearch,
    /// Place-details responses.
    PlaceDetails,
}

impl CacheKind {
    /// Stable key prefix for this kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Geocode => "geocode",
            Self::PlaceSearch => "place-search",
            Self::PlaceDetails => "place-details",
        }
    }
}

/// Computes the cache key for an input: hex SHA-256 over
/// `{kind}:{trimmed lowercased input}`.
#[must_use]
pub fn cache_key(kind: CacheKind, input: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(kind.as_str().as_bytes());
    hasher.update(b":");
    hasher.update(input.trim().to_lowercase().as_bytes());
    hex::encode(hasher.finalize())
}

#[derive(Debug, Clone)]
struct CacheEntry<V> {
    value: V,
    stored_at: Instant,
}

/// LRU cache with per-entry TTL.
///
/// Uses `RwLock` for interior mutability; safe to share across async
/// tasks behind an `Arc`. Expired entries are evicted lazily on read,
/// capacity eviction is oldest-first via the LRU order.
pub struct TtlCache<V> {
    cache: RwLock<LruCache<String, CacheEntry<V>>>,
    ttl: Duration,
}

impl<V: Clone> TtlCache<V> {
    /// Creates a cache holding at most `capacity` entries for `ttl`.
    ///
    /// # Panics
    ///
    /// Panics if capacity is 0.
    #[must_use]
    #[allow(clippy::expect_used)] // Documented panic for invalid input
    pub fn new(capacity: usize, ttl: Duration) -> Self {
        let cap = NonZeroUsize::new(capacity).expect("capacity must be > 0");
        Self {
            cache: RwLock::new(LruCache::new(cap)),
            ttl,
        }
    }

    /// Default settings matching the pipeline config defaults:
    /// 500 entries, one hour TTL.
    #[must_use]
    pub fn default_settings() -> Self {
        Self::new(500, Duration::from_secs(3600))
    }

    /// Looks up a key, evicting it when expired.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<V> {
        let entry = {
            let cache = self.cache.read().ok()?;
            cache.peek(key).cloned()
        };
        let entry = entry?;

        if entry.stored_at.elapsed() <= self.ttl {
            return Some(entry.value);
        }

        // Expired: drop it so capacity is not held by dead entries.
        if let Ok(mut cache) = self.cache.write() {
            cache.pop(key);
        }
        None
    }

    /// Stores a value, refreshing the TTL for an existing key.
    pub fn put(&self, key: String, value: V) {
        if let Ok(mut cache) = self.cache.write() {
            cache.put(
                key,
                CacheEntry {
                    value,
                    stored_at: Instant::now(),
                },
            );
        }
    }

    /// Current number of live entries, counting not-yet-evicted
    /// expired ones.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cache.read().map(|cache| cache.len()).unwrap_or(0)
    }

    /// Whether the cache holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<V: Clone> Default for TtlCache<V> {
    fn default() -> Self {
        Self::default_settings()
    }
}

impl<V> std::fmt::Debug for TtlCache<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TtlCache").field("ttl", &self.ttl).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_put_get_round_trip() {
        let cache: TtlCache<String> = TtlCache::new(10, Duration::from_secs(60));
        let key = cache_key(CacheKind::Geocode, "Albany Road");
        cache.put(key.clone(), "hit".to_string());
        assert_eq!(cache.get(&key).as_deref(), Some("hit"));
    }

    #[test]
    fn test_expired_entry_is_evicted_on_read() {
        let cache: TtlCache<u32> = TtlCache::new(10, Duration::from_millis(0));
        cache.put("k".to_string(), 7);
        std::thread::sleep(Duration::from_millis(5));
        assert_eq!(cache.get("k"), None);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_capacity_evicts_oldest() {
        let cache: TtlCache<u32> = TtlCache::new(2, Duration::from_secs(60));
        cache.put("a".to_string(), 1);
        cache.put("b".to_string(), 2);
        cache.put("c".to_string(), 3);
        assert_eq!(cache.get("a"), None);
        assert_eq!(cache.get("b"), Some(2));
        assert_eq!(cache.get("c"), Some(3));
    }

    #[test]
    fn test_cache_key_normalizes_and_separates_kinds() {
        assert_eq!(
            cache_key(CacheKind::Geocode, "  Albany Road "),
            cache_key(CacheKind::Geocode, "albany road")
        );
        assert_ne!(
            cache_key(CacheKind::Geocode, "albany road"),
            cache_key(CacheKind::PlaceSearch, "albany road")
        );
    }
}
