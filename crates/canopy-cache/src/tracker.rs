//! The dirty set driving incremental bound recomputation.

use std::collections::BTreeSet;

use canopy_types::ObjectHandle;

/// Tracks which nodes hold a stale cached bound.
///
/// Writers mark nodes here instead of recomputing eagerly; readers drain the
/// set lazily, deepest node first, so each recomputation sees already-valid
/// child bounds. Marks are keyed by canonical handle. A recomputation
/// counter is kept for instrumentation.
#[derive(Debug)]
pub struct DependencyTracker {
    dirty: BTreeSet<ObjectHandle>,
    recomputations: u64,
}

impl DependencyTracker {
    /// A fresh tracker with the root marked, so the first query recomputes
    /// the root bound at least once.
    pub fn new() -> Self {
        let mut dirty = BTreeSet::new();
        dirty.insert(ObjectHandle::root());
        Self {
            dirty,
            recomputations: 0,
        }
    }

    /// Mark a node's cached bound stale.
    pub fn mark(&mut self, handle: ObjectHandle) {
        self.dirty.insert(handle.canonical());
    }

    /// Clear a node's mark, if any.
    pub fn clear(&mut self, handle: &ObjectHandle) {
        self.dirty.remove(&handle.canonical());
    }

    /// Returns `true` if the node is currently marked.
    pub fn is_dirty(&self, handle: &ObjectHandle) -> bool {
        self.dirty.contains(&handle.canonical())
    }

    /// Returns `true` if nothing is marked.
    pub fn is_empty(&self) -> bool {
        self.dirty.is_empty()
    }

    /// The deepest marked node that is `handle` itself or a descendant of
    /// it, or `None` when the subtree is clean.
    ///
    /// Draining deepest-first guarantees progress: recomputing a node may
    /// mark only its parent, which is strictly shallower.
    pub fn deepest_under(&self, handle: &ObjectHandle) -> Option<ObjectHandle> {
        self.dirty
            .iter()
            .filter(|h| h.is_self_or_descendant_of(handle))
            .max_by_key(|h| h.depth())
            .cloned()
    }

    /// Record one bound recomputation.
    pub fn note_recomputation(&mut self) {
        self.recomputations += 1;
    }

    /// Total bound recomputations performed so far.
    pub fn recomputations(&self) -> u64 {
        self.recomputations
    }
}

impl Default for DependencyTracker {
    fn default() -> Self {
        Self::new()
    }
}
