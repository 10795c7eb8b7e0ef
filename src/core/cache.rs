//! A fixed-capacity, least-recently-used cache for file contents.

use lru::LruCache;
use std::num::NonZeroUsize;
use std::path::PathBuf;

/// Default number of `(path, line cap)` entries kept.
pub const DEFAULT_CACHE_CAPACITY: usize = 100;

/// Cache key: the file path plus the line cap the content was read with.
pub type CacheKey = (PathBuf, usize);

/// Memoizes rendered file contents keyed by `(path, max_lines)`.
///
/// Entries are never revalidated against the filesystem; callers clear the
/// cache when they need fresh reads.
pub struct ContentCache {
    entries: LruCache<CacheKey, String>,
    hits: u64,
    misses: u64,
}

impl ContentCache {
    /// Creates a cache holding at most `capacity` entries (minimum 1).
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: LruCache::new(capacity),
            hits: 0,
            misses: 0,
        }
    }

    /// Returns the cached value for `key`, computing and storing it on a miss.
    /// Storing into a full cache evicts the least recently used entry.
    pub fn get_or_compute<F>(&mut self, key: CacheKey, compute: F) -> String
    where
        F: FnOnce(&CacheKey) -> String,
    {
        if let Some(value) = self.entries.get(&key) {
            self.hits += 1;
            return value.clone();
        }
        self.misses += 1;
        let value = compute(&key);
        if let Some((evicted, _)) = self.entries.push(key, value.clone()) {
            tracing::trace!("Evicted cached content for {}", evicted.0.display());
        }
        value
    }

    /// Checks for `key` without touching its recency.
    pub fn contains(&self, key: &CacheKey) -> bool {
        self.entries.contains(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.entries.cap().get()
    }

    pub fn hits(&self) -> u64 {
        self.hits
    }

    pub fn misses(&self) -> u64 {
        self.misses
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl Default for ContentCache {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(name: &str) -> CacheKey {
        (PathBuf::from(name), 50)
    }

    #[test]
    fn test_second_lookup_is_served_from_cache() {
        let mut cache = ContentCache::new(4);
        let mut calls = 0;
        let first = cache.get_or_compute(key("a"), |_| {
            calls += 1;
            "alpha".to_string()
        });
        let second = cache.get_or_compute(key("a"), |_| {
            calls += 1;
            "changed".to_string()
        });
        assert_eq!(first, "alpha");
        assert_eq!(second, "alpha");
        assert_eq!(calls, 1);
        assert_eq!((cache.hits(), cache.misses()), (1, 1));
    }

    #[test]
    fn test_line_cap_is_part_of_the_key() {
        let mut cache = ContentCache::new(4);
        cache.get_or_compute((PathBuf::from("a"), 10), |_| "ten".to_string());
        let other = cache.get_or_compute((PathBuf::from("a"), 0), |_| "all".to_string());
        assert_eq!(other, "all");
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_least_recently_used_entry_is_evicted() {
        let mut cache = ContentCache::new(2);
        cache.get_or_compute(key("a"), |_| "a".to_string());
        cache.get_or_compute(key("b"), |_| "b".to_string());
        // Touch "a" so "b" becomes the eviction candidate.
        cache.get_or_compute(key("a"), |_| unreachable!());
        cache.get_or_compute(key("c"), |_| "c".to_string());

        assert!(cache.contains(&key("a")));
        assert!(!cache.contains(&key("b")));
        assert!(cache.contains(&key("c")));
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_zero_capacity_is_clamped_to_one() {
        let mut cache = ContentCache::new(0);
        assert_eq!(cache.capacity(), 1);
        cache.get_or_compute(key("a"), |_| "a".to_string());
        cache.get_or_compute(key("b"), |_| "b".to_string());
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_default_capacity() {
        assert_eq!(ContentCache::default().capacity(), DEFAULT_CACHE_CAPACITY);
    }
}
