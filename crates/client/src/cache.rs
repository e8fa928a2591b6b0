//! Short-lived GET response cache

use dashmap::DashMap;
use serde_json::Value;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::time::Instant;
use tracing::debug;

pub const DEFAULT_TTL: Duration = Duration::from_secs(5 * 60);

/// Invalidation count of a collection, taken before a request is sent.
///
/// An entry stored under an older generation is never served, so a response
/// that was in flight while its collection changed cannot come back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Generation {
    cleared: u64,
    collection: u64,
}

#[derive(Debug, Clone)]
struct CacheEntry {
    value: Value,
    stored_at: Instant,
    generation: Generation,
}

/// GET responses keyed by path plus sorted query parameters.
///
/// Entries older than the freshness window are treated as absent. A zero
/// window disables caching.
#[derive(Debug)]
pub struct ResponseCache {
    entries: DashMap<String, CacheEntry>,
    generations: DashMap<String, u64>,
    cleared: AtomicU64,
    ttl: Duration,
}

impl Default for ResponseCache {
    fn default() -> Self {
        Self::new(DEFAULT_TTL)
    }
}

impl ResponseCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: DashMap::new(),
            generations: DashMap::new(),
            cleared: AtomicU64::new(0),
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn is_enabled(&self) -> bool {
        !self.ttl.is_zero()
    }

    /// `path?k1=v1&k2=v2` with parameters sorted by name, then value.
    pub fn key(path: &str, query: &[(String, String)]) -> String {
        if query.is_empty() {
            return path.to_string();
        }
        let mut pairs: Vec<&(String, String)> = query.iter().collect();
        pairs.sort();
        let joined = pairs
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect::<Vec<_>>()
            .join("&");
        format!("{}?{}", path, joined)
    }

    /// Current generation of the collection `path` belongs to.
    pub fn generation(&self, path: &str) -> Generation {
        Generation {
            cleared: self.cleared.load(Ordering::Acquire),
            collection: self
                .generations
                .get(collection_of(path))
                .map(|g| *g)
                .unwrap_or(0),
        }
    }

    pub fn get(&self, key: &str) -> Option<Value> {
        if !self.is_enabled() {
            return None;
        }
        let current = self.generation(key);
        let fresh = {
            let entry = self.entries.get(key)?;
            if entry.stored_at.elapsed() < self.ttl && entry.generation == current {
                Some(entry.value.clone())
            } else {
                None
            }
        };
        if fresh.is_none() {
            self.entries.remove(key);
        } else {
            debug!(key, "Cache hit");
        }
        fresh
    }

    /// Store a response fetched under `generation`. Nothing is stored when
    /// the collection has been invalidated since.
    pub fn insert(&self, key: String, value: Value, generation: Generation) {
        if !self.is_enabled() {
            return;
        }
        if generation != self.generation(&key) {
            debug!(key, "Response outlived an invalidation, not cached");
            return;
        }
        self.entries.insert(
            key,
            CacheEntry {
                value,
                stored_at: Instant::now(),
                generation,
            },
        );
    }

    /// Drop every entry under the collection the path belongs to.
    ///
    /// `/api/loans/7/approve` invalidates `/api/loans`, `/api/loans?page=2`,
    /// `/api/loans/7/schedule` and so on.
    pub fn invalidate_collection(&self, path: &str) {
        let prefix = collection_of(path);
        *self.generations.entry(prefix.to_string()).or_insert(0) += 1;
        let before = self.entries.len();
        self.entries.retain(|key, _| !belongs_to(key, prefix));
        let dropped = before.saturating_sub(self.entries.len());
        if dropped > 0 {
            debug!(collection = prefix, dropped, "Cache invalidated");
        }
    }

    pub fn clear(&self) {
        self.cleared.fetch_add(1, Ordering::AcqRel);
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// First two path segments: `/api/loans/7` -> `/api/loans`.
pub fn collection_of(path: &str) -> &str {
    let bare = path.split(['?', '#']).next().unwrap_or(path);
    let mut slashes = bare.match_indices('/').map(|(i, _)| i);
    // skip the leading slash and the one after `api`
    match (slashes.next(), slashes.next(), slashes.next()) {
        (Some(0), Some(_), Some(end)) => &bare[..end],
        _ => bare.trim_end_matches('/'),
    }
}

fn belongs_to(key: &str, prefix: &str) -> bool {
    match key.strip_prefix(prefix) {
        Some(rest) => rest.is_empty() || rest.starts_with('/') || rest.starts_with('?'),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn q(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    fn put(cache: &ResponseCache, key: &str, value: Value) {
        cache.insert(key.to_string(), value, cache.generation(key));
    }

    #[test]
    fn test_key_sorts_query() {
        let a = ResponseCache::key("/api/loans", &q(&[("status", "Active"), ("page", "2")]));
        let b = ResponseCache::key("/api/loans", &q(&[("page", "2"), ("status", "Active")]));
        assert_eq!(a, b);
        assert_eq!(a, "/api/loans?page=2&status=Active");
        assert_eq!(ResponseCache::key("/api/loans", &[]), "/api/loans");
    }

    #[test]
    fn test_collection_of() {
        assert_eq!(collection_of("/api/loans"), "/api/loans");
        assert_eq!(collection_of("/api/loans/7/approve"), "/api/loans");
        assert_eq!(collection_of("/api/loans?page=1"), "/api/loans");
        assert_eq!(collection_of("/api/my-loans"), "/api/my-loans");
    }

    #[test]
    fn test_invalidate_collection_only() {
        let cache = ResponseCache::default();
        put(&cache, "/api/loans?page=1", json!(1));
        put(&cache, "/api/loans/7/schedule", json!(2));
        put(&cache, "/api/loans-archive", json!(3));
        put(&cache, "/api/borrowers", json!(4));

        cache.invalidate_collection("/api/loans/7/approve");
        assert!(cache.get("/api/loans?page=1").is_none());
        assert!(cache.get("/api/loans/7/schedule").is_none());
        assert_eq!(cache.get("/api/loans-archive"), Some(json!(3)));
        assert_eq!(cache.get("/api/borrowers"), Some(json!(4)));
    }

    #[test]
    fn test_response_from_before_invalidation_is_dropped() {
        let cache = ResponseCache::default();
        let before = cache.generation("/api/loans?page=1");
        let other = cache.generation("/api/borrowers");

        cache.invalidate_collection("/api/loans/7/approve");
        cache.insert("/api/loans?page=1".into(), json!("stale"), before);
        cache.insert("/api/borrowers".into(), json!("fresh"), other);

        assert!(cache.get("/api/loans?page=1").is_none());
        assert_eq!(cache.get("/api/borrowers"), Some(json!("fresh")));

        put(&cache, "/api/loans?page=1", json!("refetched"));
        assert_eq!(cache.get("/api/loans?page=1"), Some(json!("refetched")));
    }

    #[test]
    fn test_clear_drops_in_flight_responses() {
        let cache = ResponseCache::default();
        let before = cache.generation("/api/dashboard/metrics");
        cache.clear();
        cache.insert("/api/dashboard/metrics".into(), json!(1), before);
        assert!(cache.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_entries_expire() {
        let cache = ResponseCache::new(Duration::from_secs(300));
        put(&cache, "/api/dashboard/metrics", json!({"activeLoansCount": 1}));

        tokio::time::advance(Duration::from_secs(299)).await;
        assert!(cache.get("/api/dashboard/metrics").is_some());

        tokio::time::advance(Duration::from_secs(2)).await;
        assert!(cache.get("/api/dashboard/metrics").is_none());
        assert!(cache.is_empty());
    }

    #[test]
    fn test_zero_ttl_disables() {
        let cache = ResponseCache::new(Duration::ZERO);
        put(&cache, "/api/loans", json!([]));
        assert!(cache.get("/api/loans").is_none());
        assert_eq!(cache.len(), 0);
    }
}
