//! In-memory LRU cache for decoded rasters.
//!
//! Re-rendering a layer with new options (say, a different rescale) should
//! not download and decode the file again. Entries are keyed by resolved URL
//! and hold the decoded samples behind an `Arc`, so a hit is a refcount bump.

use cog_source::DecodedRaster;
use lru::LruCache;
use std::num::NonZeroUsize;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Statistics for the decoded raster cache
#[derive(Debug, Default, Clone, PartialEq)]
pub struct DecodedCacheStats {
    pub hits: u64,
    pub misses: u64,
    pub entries: usize,
    pub samples_cached: u64,
}

impl DecodedCacheStats {
    /// Hit rate as a percentage.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            (self.hits as f64 / total as f64) * 100.0
        }
    }
}

/// LRU cache: URL -> decoded raster.
#[derive(Clone)]
pub struct DecodedRasterCache {
    cache: Arc<RwLock<LruCache<String, DecodedRaster>>>,
    stats: Arc<RwLock<DecodedCacheStats>>,
    capacity: usize,
}

impl DecodedRasterCache {
    /// Create a cache holding at most `capacity` rasters (at least one).
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        let size = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);

        Self {
            cache: Arc::new(RwLock::new(LruCache::new(size))),
            stats: Arc::new(RwLock::new(DecodedCacheStats::default())),
            capacity,
        }
    }

    /// Look up a decoded raster; `None` on miss.
    pub async fn get(&self, url: &str) -> Option<DecodedRaster> {
        let mut cache = self.cache.write().await;
        let found = cache.get(url).cloned();

        let mut stats = self.stats.write().await;
        if found.is_some() {
            stats.hits += 1;
        } else {
            stats.misses += 1;
        }
        found
    }

    /// Look up a decoded raster without recording a hit or miss or
    /// refreshing its LRU position.
    pub async fn peek(&self, url: &str) -> Option<DecodedRaster> {
        self.cache.read().await.peek(url).cloned()
    }

    pub async fn insert(&self, url: String, raster: DecodedRaster) {
        let mut cache = self.cache.write().await;
        let added = raster.pixel_count() as u64;
        let evicted = cache
            .push(url, raster)
            .map(|(_, old)| old.pixel_count() as u64)
            .unwrap_or(0);

        let mut stats = self.stats.write().await;
        stats.entries = cache.len();
        stats.samples_cached = (stats.samples_cached + added).saturating_sub(evicted);
    }

    pub async fn stats(&self) -> DecodedCacheStats {
        let cache = self.cache.read().await;
        let mut stats = self.stats.write().await;
        stats.entries = cache.len();
        stats.clone()
    }

    pub async fn clear(&self) {
        let mut cache = self.cache.write().await;
        cache.clear();
        *self.stats.write().await = DecodedCacheStats::default();
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub async fn len(&self) -> usize {
        self.cache.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.cache.read().await.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cog_source::CrsHints;

    fn raster(width: usize, height: usize) -> DecodedRaster {
        DecodedRaster {
            width,
            height,
            samples: Arc::new(vec![0.0; width * height]),
            raw_bounds: Some(vec![0.0, 0.0, 1.0, 1.0]),
            hints: CrsHints::default(),
            nodata: None,
        }
    }

    #[tokio::test]
    async fn test_hit_and_miss() {
        let cache = DecodedRasterCache::new(4);

        assert!(cache.get("a.tif").await.is_none());
        cache.insert("a.tif".to_string(), raster(3, 2)).await;

        let hit = cache.get("a.tif").await;
        assert_eq!(hit.map(|r| r.pixel_count()), Some(6));

        let stats = cache.stats().await;
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.entries, 1);
        assert_eq!(stats.samples_cached, 6);
        assert!((stats.hit_rate() - 50.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_lru_eviction() {
        let cache = DecodedRasterCache::new(2);
        cache.insert("a".to_string(), raster(1, 1)).await;
        cache.insert("b".to_string(), raster(2, 1)).await;

        // Touch "a" so "b" is least recently used.
        assert!(cache.get("a").await.is_some());
        cache.insert("c".to_string(), raster(3, 1)).await;

        assert!(cache.get("b").await.is_none());
        assert!(cache.get("a").await.is_some());
        assert!(cache.get("c").await.is_some());

        let stats = cache.stats().await;
        assert_eq!(stats.entries, 2);
        assert_eq!(stats.samples_cached, 4);
    }

    #[tokio::test]
    async fn test_peek_leaves_stats_alone() {
        let cache = DecodedRasterCache::new(2);
        assert!(cache.peek("a").await.is_none());
        cache.insert("a".to_string(), raster(2, 2)).await;
        assert_eq!(cache.peek("a").await.map(|r| r.pixel_count()), Some(4));

        let stats = cache.stats().await;
        assert_eq!((stats.hits, stats.misses), (0, 0));
    }

    #[tokio::test]
    async fn test_clear() {
        let cache = DecodedRasterCache::new(2);
        cache.insert("a".to_string(), raster(1, 1)).await;
        cache.clear().await;

        assert!(cache.is_empty().await);
        assert_eq!(cache.stats().await, DecodedCacheStats::default());
    }

    #[test]
    fn test_zero_capacity_is_raised() {
        assert_eq!(DecodedRasterCache::new(0).capacity(), 1);
    }
}
