//! Min-ordered frontier of pending tree regions.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use crate::lock::{PolicyMutex, RawMutex};

/// A pending subtree: a lower bound on the best attainable distance for any
/// descriptor reachable under `node` of `tree`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrontierEntry {
    pub bound: u32,
    pub tree: u32,
    pub node: u32,
}

// Reversed lexicographic order on (bound, tree, node): BinaryHeap is a
// max-heap, so this yields the smallest bound on top, with a deterministic
// winner among equal bounds.
impl Ord for FrontierEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.bound, self.tree, self.node)
            .cmp(&(other.bound, other.tree, other.node))
            .reverse()
    }
}

impl PartialOrd for FrontierEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Priority queue of pending subtrees, smallest bound first.
///
/// The heap sits behind a policy-generic mutex, so `push` and `pop` take
/// `&self` and the same type serves single-threaded queries (`NoLock`) and
/// cooperative multi-worker drains (`SharedLock`).
pub struct Frontier<R: RawMutex> {
    heap: PolicyMutex<R, BinaryHeap<FrontierEntry>>,
}

impl<R: RawMutex> Frontier<R> {
    /// Create a frontier pre-sized for `capacity` entries.
    ///
    /// Sizing for roughly `trees * depth` entries avoids reallocation during
    /// a query; a smaller capacity only costs reallocations, never results.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            heap: PolicyMutex::new(BinaryHeap::with_capacity(capacity)),
        }
    }

    /// Insert an entry. O(log n).
    #[inline]
    pub fn push(&self, entry: FrontierEntry) {
        self.heap.lock().push(entry);
    }

    /// Remove and return the entry with the smallest bound, or `None` when
    /// empty. O(log n), no side effect on failure.
    #[inline]
    pub fn pop(&self) -> Option<FrontierEntry> {
        self.heap.lock().pop()
    }

    /// True if no entries are pending.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.heap.lock().is_empty()
    }

    /// Number of pending entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.heap.lock().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lock::NoLock;

    fn entry(bound: u32, tree: u32, node: u32) -> FrontierEntry {
        FrontierEntry { bound, tree, node }
    }

    #[test]
    fn pops_in_ascending_bound_order() {
        let frontier: Frontier<NoLock> = Frontier::with_capacity(8);
        frontier.push(entry(30, 0, 1));
        frontier.push(entry(10, 0, 2));
        frontier.push(entry(20, 1, 0));
        assert_eq!(frontier.pop(), Some(entry(10, 0, 2)));
        assert_eq!(frontier.pop(), Some(entry(20, 1, 0)));
        assert_eq!(frontier.pop(), Some(entry(30, 0, 1)));
        assert_eq!(frontier.pop(), None);
    }

    #[test]
    fn equal_bounds_break_ties_deterministically() {
        let frontier: Frontier<NoLock> = Frontier::with_capacity(8);
        frontier.push(entry(5, 1, 7));
        frontier.push(entry(5, 0, 9));
        frontier.push(entry(5, 0, 3));
        // (bound, tree, node) ascending.
        assert_eq!(frontier.pop(), Some(entry(5, 0, 3)));
        assert_eq!(frontier.pop(), Some(entry(5, 0, 9)));
        assert_eq!(frontier.pop(), Some(entry(5, 1, 7)));
    }

    #[test]
    fn pop_on_empty_has_no_side_effect() {
        let frontier: Frontier<NoLock> = Frontier::with_capacity(0);
        assert_eq!(frontier.pop(), None);
        frontier.push(entry(1, 0, 0));
        assert_eq!(frontier.len(), 1);
        assert_eq!(frontier.pop(), Some(entry(1, 0, 0)));
        assert!(frontier.is_empty());
    }
}
