//! The best-bin-first search loop.

use std::sync::atomic::{AtomicUsize, Ordering};

use crate::descriptor::DescriptorStore;
use crate::distance::Metric;
use crate::kdtree::KdTree;
use crate::lock::{PolicyMutex, RawMutex};
use crate::query::accumulator::Top2;
use crate::query::frontier::{Frontier, FrontierEntry};
use crate::query::{check_forest, SearchParams};

/// One 2-nearest-neighbor query over a forest.
///
/// Owns the per-query state: the frontier, the accumulator, and the count of
/// descriptors examined. Generic over the distance metric `M` and the
/// locking policy `R`; with [`crate::lock::NoLock`] the type is `!Sync`, so
/// only [`Self::run`] applies, while [`crate::lock::SharedLock`] additionally
/// allows [`Self::run_parallel`].
///
/// The search is budgeted: it stops once `max_examined` descriptors have
/// been scanned, or earlier when the smallest pending lower bound can no
/// longer beat the current second-best distance. Since a popped entry is the
/// minimum of all pending bounds, that single head-of-loop test discards the
/// entire remaining frontier at once.
pub struct TwoNnSearch<'a, M, R: RawMutex> {
    trees: &'a [KdTree],
    store: &'a DescriptorStore,
    query: &'a [u8],
    metric: M,
    budget: usize,
    frontier: Frontier<R>,
    accumulator: PolicyMutex<R, Top2>,
    examined: AtomicUsize,
    // Workers currently holding a popped entry; emptiness of the frontier
    // alone is not a termination signal while any of these may still push.
    in_flight: AtomicUsize,
}

impl<'a, M: Metric, R: RawMutex> TwoNnSearch<'a, M, R> {
    /// Construct a query with explicit metric and parameters.
    ///
    /// # Panics
    ///
    /// Fails fast if the forest is empty, if any two trees index different
    /// descriptor stores, or if the query length differs from the store
    /// dimension.
    pub fn with_options(
        trees: &'a [KdTree],
        query: &'a [u8],
        metric: M,
        params: SearchParams,
    ) -> Self {
        check_forest(trees, query);
        Self {
            trees,
            store: trees[0].store().as_ref(),
            query,
            metric,
            budget: params.max_examined,
            frontier: Frontier::with_capacity(params.frontier_capacity),
            accumulator: PolicyMutex::new(Top2::new()),
            examined: AtomicUsize::new(0),
            in_flight: AtomicUsize::new(0),
        }
    }

    /// Run the query on the calling thread.
    pub fn run(self) -> (u32, u32) {
        self.seed();
        let mut scratch = Vec::new();
        self.drain(&mut scratch);
        self.accumulator.lock().indices()
    }

    /// Run the query with `workers` threads cooperatively draining one
    /// frontier. Requires a real locking policy.
    ///
    /// # Panics
    ///
    /// Panics if `workers` is zero.
    pub fn run_parallel(self, workers: usize) -> (u32, u32)
    where
        M: Sync,
        R: Sync,
    {
        assert!(workers > 0, "at least one worker is required");
        self.seed();
        let this = &self;
        std::thread::scope(|scope| {
            for _ in 0..workers {
                scope.spawn(move || {
                    let mut scratch = Vec::new();
                    this.drain(&mut scratch);
                });
            }
        });
        self.accumulator.lock().indices()
    }

    /// Push one entry per tree, keyed by the root region's lower bound.
    fn seed(&self) {
        for (tree_id, tree) in self.trees.iter().enumerate() {
            let root = tree.root();
            let bound = self.metric.lower_bound(self.query, tree.region(root));
            self.frontier.push(FrontierEntry {
                bound,
                tree: tree_id as u32,
                node: root,
            });
        }
    }

    /// Pop-descend-scan until the budget is spent, the frontier is drained,
    /// or no pending bound can beat the second-best distance.
    fn drain(&self, scratch: &mut Vec<(u32, u32)>) {
        loop {
            if self.examined.load(Ordering::Relaxed) >= self.budget {
                return;
            }
            self.in_flight.fetch_add(1, Ordering::AcqRel);
            let Some(entry) = self.frontier.pop() else {
                self.in_flight.fetch_sub(1, Ordering::AcqRel);
                if self.in_flight.load(Ordering::Acquire) == 0 && self.frontier.is_empty() {
                    return;
                }
                // Another worker holds an entry and may push siblings.
                std::thread::yield_now();
                continue;
            };
            if entry.bound > self.accumulator.lock().second_distance() {
                // Smallest pending bound cannot improve the result, and
                // distances only tighten, so nothing behind it can either.
                self.in_flight.fetch_sub(1, Ordering::AcqRel);
                return;
            }
            self.traverse_to_leaf(entry, scratch);
            self.in_flight.fetch_sub(1, Ordering::AcqRel);
        }
    }

    /// Descend from `entry` to a leaf, always stepping into the closer child
    /// and pushing the other one back for later, then scan the leaf.
    fn traverse_to_leaf(&self, mut entry: FrontierEntry, scratch: &mut Vec<(u32, u32)>) {
        let tree = &self.trees[entry.tree as usize];
        let mut node = entry.node;
        while !tree.is_leaf(node) {
            let left = tree.left(node);
            let right = tree.right(node);
            let bound_left = self.metric.lower_bound(self.query, tree.region(left));
            let bound_right = self.metric.lower_bound(self.query, tree.region(right));
            if bound_left <= bound_right {
                node = left;
                entry.node = right;
                entry.bound = bound_right;
            } else {
                node = right;
                entry.node = left;
                entry.bound = bound_left;
            }
            self.frontier.push(entry);
        }
        self.scan_leaf(tree, node, scratch);
    }

    /// Compute exact distances for every descriptor in the leaf, then fold
    /// them into the accumulator.
    ///
    /// The distances go through `scratch` so the metric runs outside the
    /// accumulator lock; only the final fold is serialized.
    fn scan_leaf(&self, tree: &KdTree, node: u32, scratch: &mut Vec<(u32, u32)>) {
        let ids = tree.leaf_descriptors(node);
        if ids.is_empty() {
            return;
        }
        scratch.clear();
        for &id in ids {
            let distance = self.metric.distance(self.query, self.store.get(id));
            scratch.push((distance, id));
        }
        self.examined.fetch_add(ids.len(), Ordering::Relaxed);
        let mut accumulator = self.accumulator.lock();
        for &(distance, id) in scratch.iter() {
            accumulator.update(distance, id);
        }
    }
}
