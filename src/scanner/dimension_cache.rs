//! In-memory cache of probed image dimensions.
//!
//! Keys are the xxhash of (path + mtime + size), so a file that changes on
//! disk misses the cache and is probed again. Only intrinsic dimensions are
//! stored; layouts are always recomputed.

use std::num::NonZeroUsize;
use std::path::Path;

use lru::LruCache;
use parking_lot::Mutex;
use tracing::{debug, trace};
use xxhash_rust::xxh3::xxh3_64;

/// Default capacity (number of files).
pub const DEFAULT_CAPACITY: usize = 4096;

/// Bump when the meaning of a cached entry changes.
const CACHE_VERSION: u8 = 1;

/// Cache key for dimension lookups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DimensionKey(u64);

impl DimensionKey {
    /// Create a new cache key from file metadata.
    pub fn new(path: &Path, mtime: i64, size: i64) -> Self {
        let path_bytes = path.as_os_str().as_encoded_bytes();
        let mut data = Vec::with_capacity(path_bytes.len() + 17);
        data.push(CACHE_VERSION);
        data.extend_from_slice(path_bytes);
        data.extend_from_slice(&mtime.to_le_bytes());
        data.extend_from_slice(&size.to_le_bytes());
        Self(xxh3_64(&data))
    }
}

/// Bounded LRU of `(width, height)` per file version.
pub struct DimensionCache {
    entries: Mutex<LruCache<DimensionKey, (u32, u32)>>,
}

impl DimensionCache {
    /// Creates a cache holding at most `capacity` entries (minimum 1).
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        debug!(capacity = capacity.get(), "Initialized dimension cache");
        Self {
            entries: Mutex::new(LruCache::new(capacity)),
        }
    }

    pub fn get(&self, key: &DimensionKey) -> Option<(u32, u32)> {
        let hit = self.entries.lock().get(key).copied();
        trace!(?key, hit = hit.is_some(), "dimension cache lookup");
        hit
    }

    pub fn put(&self, key: DimensionKey, dimensions: (u32, u32)) {
        self.entries.lock().put(key, dimensions);
    }

    /// Returns the cached dimensions or probes with `probe` and stores the result.
    ///
    /// The second value is true on a cache hit.
    pub fn get_or_probe(
        &self,
        key: DimensionKey,
        probe: impl FnOnce() -> (u32, u32),
    ) -> ((u32, u32), bool) {
        if let Some(dims) = self.get(&key) {
            return (dims, true);
        }
        // Probe outside the lock; two racing probes of the same file agree.
        let dims = probe();
        self.put(key, dims);
        (dims, false)
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    pub fn clear(&self) {
        self.entries.lock().clear();
    }
}

impl Default for DimensionCache {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_key_changes_on_mtime_and_size() {
        let path = Path::new("/photos/a.jpg");
        let base = DimensionKey::new(path, 1000, 42);
        assert_eq!(base, DimensionKey::new(path, 1000, 42));
        assert_ne!(base, DimensionKey::new(path, 2000, 42));
        assert_ne!(base, DimensionKey::new(path, 1000, 43));
        assert_ne!(base, DimensionKey::new(Path::new("/photos/b.jpg"), 1000, 42));
    }

    #[test]
    fn test_probe_runs_once_per_key() {
        let cache = DimensionCache::new(8);
        let key = DimensionKey::new(Path::new("a.png"), 1, 1);
        let calls = Cell::new(0);

        let probe = || {
            calls.set(calls.get() + 1);
            (640, 480)
        };
        assert_eq!(cache.get_or_probe(key, probe), ((640, 480), false));
        assert_eq!(cache.get_or_probe(key, probe), ((640, 480), true));
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn test_capacity_is_bounded() {
        let cache = DimensionCache::new(4);
        for i in 0..10 {
            cache.put(DimensionKey::new(Path::new("x.png"), i, 0), (1, 1));
        }
        assert_eq!(cache.len(), 4);

        // Oldest entries were evicted.
        assert!(cache
            .get(&DimensionKey::new(Path::new("x.png"), 0, 0))
            .is_none());
        assert!(cache
            .get(&DimensionKey::new(Path::new("x.png"), 9, 0))
            .is_some());

        cache.clear();
        assert!(cache.is_empty());
    }

    #[test]
    fn test_zero_capacity_is_clamped() {
        let cache = DimensionCache::new(0);
        cache.put(DimensionKey::new(Path::new("a.png"), 0, 0), (2, 2));
        assert_eq!(cache.len(), 1);
    }
}
