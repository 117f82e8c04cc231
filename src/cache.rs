use dashmap::DashMap;
use std::time::{Duration, Instant};

/// A thread-safe cache with TTL (time-to-live) support.
///
/// Each fetch service owns one instance per endpoint, sized by that
/// endpoint's staleness window. Entries are evicted lazily: an expired entry
/// is removed the next time it is read.
pub struct TtlCache<K, V> {
    data: DashMap<K, CacheEntry<V>>,
    ttl: Duration,
}

struct CacheEntry<V> {
    value: V,
    expires_at: Instant,
}

impl<K, V> TtlCache<K, V>
where
    K: std::hash::Hash + Eq + Clone,
    V: Clone,
{
    /// Create a new cache whose entries live for `ttl`.
    pub fn new(ttl: Duration) -> Self {
        Self {
            data: DashMap::new(),
            ttl,
        }
    }

    /// Get a value if it exists and hasn't expired.
    pub fn get(&self, key: &K) -> Option<V> {
        let entry = self.data.get(key)?;
        if entry.expires_at > Instant::now() {
            Some(entry.value.clone())
        } else {
            drop(entry);
            self.data.remove(key);
            None
        }
    }

    /// Insert a value, replacing any previous entry under the same key.
    pub fn insert(&self, key: K, value: V) {
        let entry = CacheEntry {
            value,
            expires_at: Instant::now() + self.ttl,
        };
        self.data.insert(key, entry);
    }

    /// Drop a single entry, forcing the next read through to the network.
    pub fn remove(&self, key: &K) {
        self.data.remove(key);
    }

    /// Drop every entry.
    pub fn clear(&self) {
        self.data.clear();
    }

    /// Remove expired entries.
    pub fn cleanup(&self) {
        let now = Instant::now();
        self.data.retain(|_, entry| entry.expires_at > now);
    }

    /// Get the number of entries in the cache (including expired ones).
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Check if the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Normalize a free-text location string for use as a cache key.
pub fn normalize_cache_key(location: &str) -> String {
    location.trim().to_lowercase()
}

/// Cache key for coordinate-based lookups.
///
/// Coordinates are rounded to four decimals (about 11 m) so jittery
/// geolocation fixes of the same spot share an entry. The language is part of
/// the key because OpenWeatherMap localizes description fields.
pub fn coord_cache_key(lat: f64, lon: f64, lang: &str) -> String {
    format!("{lat:.4},{lon:.4}:{lang}")
}
