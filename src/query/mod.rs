//! Budgeted best-bin-first 2-NN queries over a forest.
//!
//! [`two_nearest`] is the plain entry point: sequential execution, squared-L2
//! metric, default frontier capacity. [`TwoNnSearch`] gives full control over
//! the metric, the locking policy, and the parameters, including cooperative
//! multi-worker drains of a single query.

mod accumulator;
mod driver;
mod frontier;

use std::sync::Arc;

pub use accumulator::Top2;
pub use driver::TwoNnSearch;
pub use frontier::{Frontier, FrontierEntry};

use crate::distance::L2;
use crate::kdtree::KdTree;
use crate::lock::NoLock;

/// Sentinel returned where fewer than two descriptors were examined.
pub const INVALID_INDEX: u32 = u32::MAX;

/// Default frontier capacity; comfortably above `trees * depth` for typical
/// forests, so a query does not reallocate mid-search.
pub const DEFAULT_FRONTIER_CAPACITY: usize = 4096;

/// Per-query parameters.
#[derive(Debug, Clone)]
pub struct SearchParams {
    /// Maximum number of descriptors the query may examine. The only
    /// cancellation mechanism; checked at the top of the search loop, so a
    /// leaf scan may overshoot it slightly.
    pub max_examined: usize,

    /// Initial frontier capacity. A performance hint, never a limit.
    pub frontier_capacity: usize,
}

impl SearchParams {
    #[must_use]
    pub fn new(max_examined: usize) -> Self {
        Self {
            max_examined,
            frontier_capacity: DEFAULT_FRONTIER_CAPACITY,
        }
    }
}

/// Find the two nearest descriptors to `query` across the forest, examining
/// at most `max_examined` descriptors.
///
/// Returns the global indices of the best and second-best match by squared
/// L2 distance, or [`INVALID_INDEX`] in either position if fewer than two
/// descriptors were examined (tiny forest, zero budget).
///
/// # Panics
///
/// Fails fast if the forest is empty, if its trees index different
/// descriptor stores, or if `query` does not match the store dimension.
pub fn two_nearest(trees: &[KdTree], query: &[u8], max_examined: usize) -> (u32, u32) {
    TwoNnSearch::<L2, NoLock>::with_options(trees, query, L2, SearchParams::new(max_examined))
        .run()
}

/// Query-time precondition guard.
///
/// The accumulator's indices are only meaningful if every tree addresses one
/// global index space, so all trees must hold the same store (`Arc` pointer
/// identity). Violations are misconfigurations, not recoverable errors.
pub(crate) fn check_forest(trees: &[KdTree], query: &[u8]) {
    assert!(!trees.is_empty(), "forest is empty");
    let store = trees[0].store();
    for tree in trees {
        assert!(
            Arc::ptr_eq(store, tree.store()),
            "all trees in a forest must index the same descriptor store"
        );
    }
    assert_eq!(
        query.len(),
        store.dim(),
        "query has {} components, store dimension is {}",
        query.len(),
        store.dim()
    );
}
