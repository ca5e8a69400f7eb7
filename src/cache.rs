//! Route resolution caching.
//!
//! [`RouteCache`] memoises [`RouteMatcher::resolve`](crate::matching::RouteMatcher::resolve)
//! results per path in an LRU so repeated navigation between the same pages
//! (tab switching, back/forward) skips the matcher. It is gated behind the
//! `cache` feature and uses the [`lru`] crate internally.
//!
//! The cache must be cleared whenever the matcher is rebuilt; the
//! [`Shell`](crate::context::Shell) does this when access routes change.
//!
//! # Examples
//!
//! ```
//! use console_navigator::cache::RouteCache;
//! use console_navigator::matching::Resolved;
//! use console_navigator::params::RouteParams;
//!
//! let mut cache = RouteCache::new();
//! let resolved = Resolved { index: 3, params: RouteParams::new(), fallback: false };
//! cache.insert("/dashboard".to_string(), Some(resolved));
//!
//! assert_eq!(cache.get("/dashboard").unwrap().unwrap().index, 3);
//! assert_eq!(cache.stats().hits, 1);
//! ```

use crate::matching::Resolved;
use crate::{debug_log, trace_log};
use lru::LruCache;
use std::num::NonZeroUsize;

/// Counters tracking cache hit/miss rates and invalidations.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: usize,
    pub misses: usize,
    /// Number of full cache invalidations (via [`RouteCache::clear`]).
    pub invalidations: usize,
}

impl CacheStats {
    /// Hit rate as a value in `0.0..=1.0`; `0.0` before any lookup.
    #[allow(clippy::cast_precision_loss)]
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

/// LRU cache from normalized path to resolution result.
///
/// A cached `None` records that the path resolved to nothing.
#[derive(Debug)]
pub struct RouteCache {
    entries: LruCache<String, Option<Resolved>>,
    stats: CacheStats,
}

impl RouteCache {
    const DEFAULT_CAPACITY: usize = 256;

    pub fn new() -> Self {
        Self::with_capacity(Self::DEFAULT_CAPACITY)
    }

    /// Create a cache holding at most `capacity` paths (minimum 1).
    pub fn with_capacity(capacity: usize) -> Self {
        let cap = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: LruCache::new(cap),
            stats: CacheStats::default(),
        }
    }

    /// Drop every entry and count an invalidation.
    pub fn clear(&mut self) {
        let len = self.entries.len();
        self.entries.clear();
        self.stats.invalidations += 1;
        debug_log!(
            "Route cache cleared: {} entries removed ({} total invalidations, hit rate: {:.1}%)",
            len,
            self.stats.invalidations,
            self.stats.hit_rate() * 100.0
        );
    }

    /// Look up `path`. The outer `None` is a cache miss.
    pub fn get(&mut self, path: &str) -> Option<Option<Resolved>> {
        if let Some(entry) = self.entries.get(path) {
            self.stats.hits += 1;
            trace_log!("Route cache hit for '{}'", path);
            Some(entry.clone())
        } else {
            self.stats.misses += 1;
            trace_log!("Route cache miss for '{}'", path);
            None
        }
    }

    pub fn insert(&mut self, path: String, resolved: Option<Resolved>) {
        self.entries.push(path, resolved);
    }

    pub const fn stats(&self) -> &CacheStats {
        &self.stats
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for RouteCache {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::RouteParams;

    fn resolved(index: usize) -> Option<Resolved> {
        Some(Resolved {
            index,
            params: RouteParams::new(),
            fallback: false,
        })
    }

    #[test]
    fn test_miss_then_hit() {
        let mut cache = RouteCache::new();
        assert!(cache.get("/a").is_none());
        cache.insert("/a".to_string(), resolved(1));
        assert_eq!(cache.get("/a"), Some(resolved(1)));
        assert_eq!(cache.stats().hits, 1);
        assert_eq!(cache.stats().misses, 1);
    }

    #[test]
    fn test_negative_entries_are_hits() {
        let mut cache = RouteCache::new();
        cache.insert("/gone".to_string(), None);
        assert_eq!(cache.get("/gone"), Some(None));
    }

    #[test]
    fn test_lru_eviction() {
        let mut cache = RouteCache::with_capacity(2);
        cache.insert("/a".to_string(), resolved(0));
        cache.insert("/b".to_string(), resolved(1));
        cache.get("/a");
        cache.insert("/c".to_string(), resolved(2));

        assert_eq!(cache.len(), 2);
        assert!(cache.get("/b").is_none());
        assert!(cache.get("/a").is_some());
    }

    #[test]
    fn test_clear_counts_invalidation() {
        let mut cache = RouteCache::with_capacity(0);
        cache.insert("/a".to_string(), resolved(0));
        cache.clear();
        assert!(cache.is_empty());
        assert_eq!(cache.stats().invalidations, 1);
    }

    #[test]
    fn test_hit_rate() {
        let mut cache = RouteCache::new();
        cache.get("/a");
        cache.insert("/a".to_string(), resolved(0));
        cache.get("/a");
        assert!((cache.stats().hit_rate() - 0.5).abs() < 0.001);
    }
}
