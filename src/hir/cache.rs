//! Per-element memoization guarded by the structural modification stamp.
//!
//! Every entry remembers the stamp that was current when its computation
//! *started*. An entry is served only while the tracker still reports that
//! stamp, so an edit that lands mid-computation leaves a stale entry behind
//! rather than a wrong one.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use tracing::{debug, trace};

use super::cancel::Cancelled;
use super::ids::ElementId;
use super::modification::ModificationTracker;

/// Names one cache slot of an element.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct CacheKey(&'static str);

impl CacheKey {
    pub const fn new(name: &'static str) -> Self {
        Self(name)
    }

    pub fn name(self) -> &'static str {
        self.0
    }
}

struct CachedEntry<V> {
    value: Arc<V>,
    stamp: u64,
}

/// Hit/miss counters, mainly for tests and tracing.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
}

/// A store of values attached to elements.
///
/// Concurrent callers may compute the same entry more than once; the last
/// write wins. Values are recomputed from scratch, never patched.
pub struct CachedValues<V> {
    entries: RwLock<FxHashMap<(ElementId, CacheKey), CachedEntry<V>>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl<V> Default for CachedValues<V> {
    fn default() -> Self {
        Self {
            entries: RwLock::new(FxHashMap::default()),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }
}

impl<V> CachedValues<V> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached value of `(owner, key)` or compute and store it.
    ///
    /// A computation that returns `Err(Cancelled)` stores nothing.
    pub fn get_or_compute(
        &self,
        owner: ElementId,
        key: CacheKey,
        tracker: &ModificationTracker,
        compute: impl FnOnce() -> Result<V, Cancelled>,
    ) -> Result<Arc<V>, Cancelled> {
        self.get_or_compute_matching(owner, key, tracker, |_| true, compute)
    }

    /// Like [`get_or_compute`](Self::get_or_compute), but a fresh entry is
    /// also rejected when `matches` returns `false` for it.
    pub fn get_or_compute_matching(
        &self,
        owner: ElementId,
        key: CacheKey,
        tracker: &ModificationTracker,
        matches: impl FnOnce(&V) -> bool,
        compute: impl FnOnce() -> Result<V, Cancelled>,
    ) -> Result<Arc<V>, Cancelled> {
        let stamp = tracker.structural_modification_count();

        if let Some(entry) = self.entries.read().get(&(owner, key)) {
            if entry.stamp == stamp && matches(&entry.value) {
                self.hits.fetch_add(1, Ordering::Relaxed);
                trace!(?owner, key = key.name(), stamp, "cache hit");
                return Ok(Arc::clone(&entry.value));
            }
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        debug!(?owner, key = key.name(), stamp, "cache miss");

        let value = Arc::new(compute()?);
        self.entries.write().insert(
            (owner, key),
            CachedEntry {
                value: Arc::clone(&value),
                stamp,
            },
        );
        Ok(value)
    }

    /// The cached value, if present and still valid.
    pub fn peek(
        &self,
        owner: ElementId,
        key: CacheKey,
        tracker: &ModificationTracker,
    ) -> Option<Arc<V>> {
        let stamp = tracker.structural_modification_count();
        self.entries
            .read()
            .get(&(owner, key))
            .filter(|entry| entry.stamp == stamp)
            .map(|entry| Arc::clone(&entry.value))
    }

    /// Drop every entry that is stale against the current stamp.
    pub fn retain_valid(&self, tracker: &ModificationTracker) {
        let stamp = tracker.structural_modification_count();
        self.entries.write().retain(|_, entry| entry.stamp == stamp);
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }

    /// Number of stored entries, valid or not.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<V> fmt::Debug for CachedValues<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CachedValues")
            .field("len", &self.len())
            .field("stats", &self.stats())
            .finish()
    }
}
