//! Process-wide modification stamps.

use std::sync::atomic::{AtomicU64, Ordering};

use tracing::debug;

/// Monotonic modification counters shared by every cache entry.
///
/// `structural` advances on edits that can add, remove, or rename a module
/// declaration or reference. `any` advances on every edit, including those
/// inside a code block that leave the structure alone.
#[derive(Debug, Default)]
pub struct ModificationTracker {
    any: AtomicU64,
    structural: AtomicU64,
}

impl ModificationTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn modification_count(&self) -> u64 {
        self.any.load(Ordering::Acquire)
    }

    pub fn structural_modification_count(&self) -> u64 {
        self.structural.load(Ordering::Acquire)
    }

    /// Record an edit that left declarations and references untouched.
    pub fn inc_modification(&self) {
        self.any.fetch_add(1, Ordering::AcqRel);
    }

    /// Record an edit that may change what module references resolve to.
    pub fn inc_structural(&self) {
        self.any.fetch_add(1, Ordering::AcqRel);
        let stamp = self.structural.fetch_add(1, Ordering::AcqRel) + 1;
        debug!(stamp, "structural modification");
    }
}
