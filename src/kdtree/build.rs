//! Randomized median-split tree construction.
//!
//! Each internal node splits its id range at the index median of one axis,
//! so both halves are always non-empty and depth stays logarithmic. The
//! split axis is drawn uniformly from the `split_candidates` axes with the
//! largest spread, which is what decorrelates the trees of a forest: the
//! same store built with different seeds yields different partitions, and
//! the union of their best bins covers far more of the true neighborhood
//! than any single tree's.

use std::sync::Arc;

use rand::prelude::*;
use smallvec::SmallVec;

use crate::descriptor::DescriptorStore;
use crate::error::{ForestError, Result};
use crate::kdtree::{KdTree, Node, NO_CHILD};

/// Tree construction parameters.
#[derive(Debug, Clone)]
pub struct TreeParams {
    /// Ranges of at most this many descriptors become leaves.
    pub max_leaf_size: usize,

    /// The split axis is drawn from this many top-spread axes.
    pub split_candidates: usize,
}

impl Default for TreeParams {
    fn default() -> Self {
        Self {
            max_leaf_size: 16,
            split_candidates: 5,
        }
    }
}

impl TreeParams {
    fn validate(&self) -> Result<()> {
        if self.max_leaf_size == 0 {
            return Err(ForestError::InvalidParameter(
                "max_leaf_size must be at least 1".to_string(),
            ));
        }
        if self.split_candidates == 0 {
            return Err(ForestError::InvalidParameter(
                "split_candidates must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Build one tree over every descriptor in the store.
pub fn build_tree(store: Arc<DescriptorStore>, params: &TreeParams, seed: u64) -> Result<KdTree> {
    if store.is_empty() {
        return Err(ForestError::EmptyStore);
    }
    let ids: Vec<u32> = (0..store.len() as u32).collect();
    build_with_ids(store, ids, params, seed)
}

/// Build one tree over an explicit subset of descriptor ids.
///
/// Ids must be unique and in range; their order does not matter. Useful for
/// sharded forests where each tree indexes a slice of the store.
pub fn build_tree_over(
    store: Arc<DescriptorStore>,
    ids: &[u32],
    params: &TreeParams,
    seed: u64,
) -> Result<KdTree> {
    if ids.is_empty() {
        return Err(ForestError::EmptySubset);
    }
    for &id in ids {
        if id as usize >= store.len() {
            return Err(ForestError::IdOutOfRange {
                id,
                len: store.len(),
            });
        }
    }
    let mut sorted = ids.to_vec();
    sorted.sort_unstable();
    for pair in sorted.windows(2) {
        if pair[0] == pair[1] {
            return Err(ForestError::DuplicateId(pair[0]));
        }
    }
    build_with_ids(store, ids.to_vec(), params, seed)
}

/// Build `num_trees` independently randomized trees over the whole store.
pub fn build_forest(
    store: Arc<DescriptorStore>,
    num_trees: usize,
    params: &TreeParams,
    seed: u64,
) -> Result<Vec<KdTree>> {
    if num_trees == 0 {
        return Err(ForestError::InvalidParameter(
            "num_trees must be at least 1".to_string(),
        ));
    }
    let mut seeds = StdRng::seed_from_u64(seed);
    (0..num_trees)
        .map(|_| build_tree(Arc::clone(&store), params, seeds.gen()))
        .collect()
}

fn build_with_ids(
    store: Arc<DescriptorStore>,
    ids: Vec<u32>,
    params: &TreeParams,
    seed: u64,
) -> Result<KdTree> {
    params.validate()?;

    let n = ids.len();
    let dim = store.dim();
    // A median-split tree over n ids has at most 2 * ceil(n / leaf) nodes.
    let node_guess = 2 * n.div_ceil(params.max_leaf_size);

    let mut builder = Builder {
        store: &store,
        params,
        rng: StdRng::seed_from_u64(seed),
        nodes: Vec::with_capacity(node_guess),
        bounds_lo: Vec::with_capacity(node_guess * dim),
        bounds_hi: Vec::with_capacity(node_guess * dim),
        ids,
    };
    builder.split_range(0, n);

    let Builder {
        nodes,
        bounds_lo,
        bounds_hi,
        ids,
        ..
    } = builder;
    Ok(KdTree {
        store,
        nodes,
        bounds_lo,
        bounds_hi,
        ids,
    })
}

struct Builder<'a> {
    store: &'a DescriptorStore,
    params: &'a TreeParams,
    rng: StdRng,
    nodes: Vec<Node>,
    bounds_lo: Vec<u8>,
    bounds_hi: Vec<u8>,
    ids: Vec<u32>,
}

impl Builder<'_> {
    /// Build the subtree over `ids[start..end]` and return its handle.
    ///
    /// Allocates the node before recursing, so the first call allocates the
    /// root at handle 0.
    fn split_range(&mut self, start: usize, end: usize) -> u32 {
        let dim = self.store.dim();
        let node = self.nodes.len() as u32;
        self.nodes.push(Node {
            left: NO_CHILD,
            right: NO_CHILD,
            start: start as u32,
            end: end as u32,
        });

        let off = self.bounds_lo.len();
        self.bounds_lo.resize(off + dim, u8::MAX);
        self.bounds_hi.resize(off + dim, 0);
        for i in start..end {
            let descriptor = self.store.get(self.ids[i]);
            for (axis, &c) in descriptor.iter().enumerate() {
                if c < self.bounds_lo[off + axis] {
                    self.bounds_lo[off + axis] = c;
                }
                if c > self.bounds_hi[off + axis] {
                    self.bounds_hi[off + axis] = c;
                }
            }
        }

        if end - start <= self.params.max_leaf_size {
            return node;
        }
        let Some(axis) = self.pick_axis(off, dim) else {
            // Zero spread on every axis: all descriptors identical.
            return node;
        };

        let mid = start + (end - start) / 2;
        let store = self.store;
        self.ids[start..end].select_nth_unstable_by_key(mid - start, |&id| store.get(id)[axis]);

        let left = self.split_range(start, mid);
        let right = self.split_range(mid, end);
        self.nodes[node as usize].left = left;
        self.nodes[node as usize].right = right;
        node
    }

    /// Draw the split axis uniformly from the top-spread candidates.
    fn pick_axis(&mut self, off: usize, dim: usize) -> Option<usize> {
        let mut top: SmallVec<[(u32, usize); 8]> = SmallVec::new();
        for axis in 0..dim {
            let spread = u32::from(self.bounds_hi[off + axis] - self.bounds_lo[off + axis]);
            if spread == 0 {
                continue;
            }
            let pos = top
                .iter()
                .position(|&(s, _)| spread > s)
                .unwrap_or(top.len());
            if pos < self.params.split_candidates {
                top.insert(pos, (spread, axis));
                top.truncate(self.params.split_candidates);
            }
        }
        if top.is_empty() {
            return None;
        }
        Some(top[self.rng.gen_range(0..top.len())].1)
    }
}
