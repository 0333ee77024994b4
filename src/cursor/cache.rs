//! Bounded line cache with batched FIFO eviction.
//!
//! Overlapping sliding windows revisit nearby coordinates constantly, so the
//! cursor keeps a small query-keyed cache of resolved lines. Eviction is
//! deliberately coarse: nothing is evicted until the cache is full, and then
//! a fixed batch of the oldest-inserted entries goes at once. This is an
//! insertion-order FIFO, not an LRU; a key needed by the immediately
//! following resolve in sliding-window access is always younger than the
//! evicted batch.

use std::collections::{HashMap, VecDeque};

/// Default cache capacity.
pub const DEFAULT_CAPACITY: usize = 1000;

/// Default number of entries evicted per batch.
pub const DEFAULT_EVICT_BATCH: usize = 200;

/// A cached resolution: parsed key, record line, and resolved byte offset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheEntry<K> {
    /// Parsed sort key of the cached line.
    pub key: K,
    /// The record line, newline stripped.
    pub line: String,
    /// Byte offset of the line's first character.
    pub offset: u64,
}

/// Bounded query-keyed cache with insertion-order batched eviction.
///
/// Re-inserting a present key updates its value but does not move its
/// eviction position.
#[derive(Debug)]
pub struct LineCache<K> {
    capacity: usize,
    evict_batch: usize,
    entries: HashMap<u64, CacheEntry<K>>,
    order: VecDeque<u64>,
}

impl<K: Clone> LineCache<K> {
    /// Creates a cache with the reference capacity (1000) and batch (200).
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY, DEFAULT_EVICT_BATCH)
    }

    /// Creates a cache with explicit capacity and eviction batch size.
    ///
    /// `evict_batch` is clamped to at least 1 so a full cache always makes
    /// room.
    pub fn with_capacity(capacity: usize, evict_batch: usize) -> Self {
        LineCache {
            capacity: capacity.max(1),
            evict_batch: evict_batch.clamp(1, capacity.max(1)),
            entries: HashMap::with_capacity(capacity.max(1)),
            order: VecDeque::with_capacity(capacity.max(1)),
        }
    }

    /// Looks up a query coordinate. Never touches the file or the order.
    pub fn get(&self, query: u64) -> Option<&CacheEntry<K>> {
        self.entries.get(&query)
    }

    /// Inserts or updates the entry for a query coordinate.
    ///
    /// Eviction triggers only when the cache is full and a new key arrives,
    /// and then removes the whole oldest batch in one operation.
    pub fn insert(&mut self, query: u64, entry: CacheEntry<K>) {
        if let Some(existing) = self.entries.get_mut(&query) {
            *existing = entry;
            return;
        }

        if self.entries.len() >= self.capacity {
            self.evict();
        }

        self.order.push_back(query);
        self.entries.insert(query, entry);
    }

    fn evict(&mut self) {
        for _ in 0..self.evict_batch {
            match self.order.pop_front() {
                Some(oldest) => {
                    self.entries.remove(&oldest);
                }
                None => break,
            }
        }
    }

    /// Number of cached entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Clone> Default for LineCache<K> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(offset: u64) -> CacheEntry<u64> {
        CacheEntry {
            key: offset,
            line: format!("line-{}", offset),
            offset,
        }
    }

    #[test]
    fn test_get_and_insert() {
        let mut cache = LineCache::new();
        assert!(cache.is_empty());

        cache.insert(100, entry(5));
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get(100).unwrap().offset, 5);
        assert!(cache.get(101).is_none());
    }

    #[test]
    fn test_batch_eviction_removes_oldest() {
        let mut cache = LineCache::with_capacity(10, 4);
        for q in 0..10u64 {
            cache.insert(q, entry(q));
        }
        assert_eq!(cache.len(), 10);

        // The 11th insertion evicts the 4 oldest in one batch.
        cache.insert(10, entry(10));
        assert_eq!(cache.len(), 7);
        for q in 0..4u64 {
            assert!(cache.get(q).is_none(), "{} should have been evicted", q);
        }
        for q in 4..11u64 {
            assert!(cache.get(q).is_some(), "{} should survive", q);
        }
    }

    #[test]
    fn test_no_eviction_until_full() {
        let mut cache = LineCache::with_capacity(5, 2);
        for q in 0..5u64 {
            cache.insert(q, entry(q));
        }
        assert_eq!(cache.len(), 5);
        assert!(cache.get(0).is_some());
    }

    #[test]
    fn test_reinsert_keeps_eviction_position() {
        let mut cache = LineCache::with_capacity(4, 2);
        for q in 0..4u64 {
            cache.insert(q, entry(q));
        }

        // Refresh key 0; its eviction position must not change.
        cache.insert(0, entry(99));
        assert_eq!(cache.get(0).unwrap().offset, 99);
        assert_eq!(cache.len(), 4);

        // Next new key evicts the batch containing key 0.
        cache.insert(7, entry(7));
        assert!(cache.get(0).is_none());
        assert!(cache.get(1).is_none());
        assert!(cache.get(2).is_some());
        assert!(cache.get(7).is_some());
    }

    #[test]
    fn test_get_does_not_refresh() {
        let mut cache = LineCache::with_capacity(3, 1);
        cache.insert(1, entry(1));
        cache.insert(2, entry(2));
        cache.insert(3, entry(3));

        // Reading key 1 must not protect it from FIFO eviction.
        let _ = cache.get(1);
        cache.insert(4, entry(4));
        assert!(cache.get(1).is_none());
    }
}
