//! Bounded FIFO cache of resolved paths

use std::collections::VecDeque;

use waygrid::NodeRef;
use waygrid_common::Vec3;

/// Default number of cached paths
pub const PATH_CACHE_CAPACITY: usize = 10;

/// A cached path keyed by its resolved endpoints
#[derive(Debug, Clone)]
pub struct PathCacheEntry {
    pub start: NodeRef,
    pub end: NodeRef,
    pub waypoints: Vec<Vec3>,
}

/// Fixed-capacity path cache with first-in-first-out eviction.
///
/// Lookups don't refresh an entry's age; once the cache is full the oldest
/// insertion is dropped regardless of how often it was read.
#[derive(Debug)]
pub struct PathCache {
    entries: VecDeque<PathCacheEntry>,
    capacity: usize,
}

impl Default for PathCache {
    fn default() -> Self {
        Self::new()
    }
}

impl PathCache {
    /// Creates a cache with the default capacity
    pub fn new() -> Self {
        Self::with_capacity(PATH_CACHE_CAPACITY)
    }

    /// Creates a cache holding at most `capacity` paths
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Number of cached paths
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when nothing is cached
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drops all cached paths
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// The cached path for the exact `(start, end)` pair, if any
    pub fn get(&self, start: NodeRef, end: NodeRef) -> Option<&PathCacheEntry> {
        self.entries
            .iter()
            .find(|e| e.start == start && e.end == end)
    }

    /// Caches a path, evicting the oldest entry when full.
    ///
    /// A pair already present keeps its original entry and age.
    pub fn insert(&mut self, start: NodeRef, end: NodeRef, waypoints: Vec<Vec3>) {
        if self.capacity == 0 || self.get(start, end).is_some() {
            return;
        }
        if self.entries.len() == self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(PathCacheEntry {
            start,
            end,
            waypoints,
        });
    }
}
