//! Shared in-memory photo byte cache.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use bytes::Bytes;
use parking_lot::RwLock;
use tracing::trace;

use crate::domain::entities::PhotoId;

/// Thread-safe map from photo id to raw image bytes.
///
/// All reads and writes pass through one lock, so a reader never observes a
/// torn payload and a later `get` always sees an earlier `put`. The map is
/// unbounded: it grows with the set of distinct photos the gallery has seen.
/// Cache operations cannot fail; absence is `None`.
pub struct ImageCache {
    photos: RwLock<HashMap<PhotoId, Bytes>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl ImageCache {
    /// Creates an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self {
            photos: RwLock::new(HashMap::new()),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// Returns the bytes cached for a photo, if any.
    #[must_use]
    pub fn get(&self, key: &PhotoId) -> Option<Bytes> {
        let photos = self.photos.read();
        if let Some(bytes) = photos.get(key) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            trace!(%key, "photo cache hit");
            Some(bytes.clone())
        } else {
            self.misses.fetch_add(1, Ordering::Relaxed);
            trace!(%key, "photo cache miss");
            None
        }
    }

    /// Stores the bytes for a photo, replacing any previous payload.
    pub fn put(&self, key: PhotoId, bytes: Bytes) {
        let mut photos = self.photos.write();
        photos.insert(key, bytes);
    }

    /// Returns the number of cached photos.
    #[must_use]
    pub fn len(&self) -> usize {
        self.photos.read().len()
    }

    /// Returns true if nothing is cached.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.photos.read().is_empty()
    }

    /// Returns hit/miss statistics.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn stats(&self) -> CacheStats {
        let hits = self.hits.load(Ordering::Relaxed);
        let misses = self.misses.load(Ordering::Relaxed);
        let total = hits + misses;
        let hit_rate = if total > 0 {
            (hits as f64 / total as f64) * 100.0
        } else {
            0.0
        };
        CacheStats {
            hits,
            misses,
            hit_rate,
            size: self.len(),
        }
    }
}

impl Default for ImageCache {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ImageCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageCache")
            .field("size", &self.len())
            .finish_non_exhaustive()
    }
}

/// Statistics about cache performance.
#[derive(Debug, Clone)]
pub struct CacheStats {
    /// Number of cache hits.
    pub hits: u64,
    /// Number of cache misses.
    pub misses: u64,
    /// Hit rate as a percentage.
    pub hit_rate: f64,
    /// Current number of cached photos.
    pub size: usize,
}

impl std::fmt::Display for CacheStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Cache: {} photos, {:.1}% hit rate ({} hits, {} misses)",
            self.size, self.hit_rate, self.hits, self.misses
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(1, &[0xFF, 0xD8] ; "jpeg_magic")]
    #[test_case(2, &[] ; "empty_payload")]
    #[test_case(u64::MAX, &[0x00] ; "max_key")]
    fn test_put_then_get_returns_payload(id: u64, payload: &[u8]) {
        let cache = ImageCache::new();
        let key = PhotoId::new(id);

        cache.put(key, Bytes::copy_from_slice(payload));

        assert_eq!(cache.get(&key), Some(Bytes::copy_from_slice(payload)));
    }

    #[test]
    fn test_get_missing_returns_none() {
        let cache = ImageCache::new();
        assert_eq!(cache.get(&PhotoId::new(7)), None);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_put_replaces_last_write_wins() {
        let cache = ImageCache::new();
        let key = PhotoId::new(1);

        cache.put(key, Bytes::from_static(&[1]));
        cache.put(key, Bytes::from_static(&[2]));

        assert_eq!(cache.get(&key), Some(Bytes::from_static(&[2])));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_stats_track_hits_and_misses() {
        let cache = ImageCache::new();
        cache.put(PhotoId::new(1), Bytes::from_static(&[1]));

        let _ = cache.get(&PhotoId::new(1));
        let _ = cache.get(&PhotoId::new(2));

        let stats = cache.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.size, 1);
    }

    #[test]
    fn test_concurrent_readers_and_writers() {
        let cache = std::sync::Arc::new(ImageCache::new());

        let writers: Vec<_> = (0..4u64)
            .map(|w| {
                let cache = cache.clone();
                std::thread::spawn(move || {
                    for i in 0..100u64 {
                        cache.put(PhotoId::new(w * 100 + i), Bytes::from(vec![w as u8]));
                    }
                })
            })
            .collect();

        let readers: Vec<_> = (0..4u64)
            .map(|_| {
                let cache = cache.clone();
                std::thread::spawn(move || {
                    for i in 0..400u64 {
                        let _ = cache.get(&PhotoId::new(i));
                    }
                })
            })
            .collect();

        for handle in writers.into_iter().chain(readers) {
            handle.join().expect("no thread panicked");
        }

        assert_eq!(cache.len(), 400);
    }
}
