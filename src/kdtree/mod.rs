//! Randomized k-d trees over a shared descriptor store.
//!
//! A tree is a flat arena of nodes referenced by tree-local `u32` handles;
//! the root is always handle 0. Internal nodes have two children; leaves own
//! a contiguous range of one shared descriptor-id array. Every node carries
//! an axis-aligned bounding region (per-dimension `lo`/`hi` bytes) over the
//! descriptors below it, which is what the search core prunes against.
//!
//! Trees are immutable after build and hold their store through an `Arc`, so
//! a forest (a slice of trees sharing one store) can be queried from many
//! threads without locking.

mod build;

use std::sync::Arc;

pub use build::{build_forest, build_tree, build_tree_over, TreeParams};

use crate::descriptor::DescriptorStore;

/// Child-handle sentinel marking a leaf node.
const NO_CHILD: u32 = u32::MAX;

/// Axis-aligned bounding region of a node: per-dimension inclusive bounds.
#[derive(Debug, Clone, Copy)]
pub struct Region<'a> {
    pub lo: &'a [u8],
    pub hi: &'a [u8],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Node {
    left: u32,
    right: u32,
    // Range into `KdTree::ids`; kept for internal nodes too.
    start: u32,
    end: u32,
}

/// An immutable k-d tree over a subset of a descriptor store.
#[derive(Debug, PartialEq, Eq)]
pub struct KdTree {
    store: Arc<DescriptorStore>,
    nodes: Vec<Node>,
    // Per-node bounds, `dim` bytes each, parallel to `nodes`.
    bounds_lo: Vec<u8>,
    bounds_hi: Vec<u8>,
    // Descriptor ids, reordered during build; leaves own ranges of this.
    ids: Vec<u32>,
}

impl KdTree {
    /// Handle of the root node.
    #[inline]
    #[must_use]
    pub fn root(&self) -> u32 {
        0
    }

    /// True if `node` is a leaf.
    #[inline]
    #[must_use]
    pub fn is_leaf(&self, node: u32) -> bool {
        self.nodes[node as usize].left == NO_CHILD
    }

    /// Left child handle of an internal node.
    #[inline]
    #[must_use]
    pub fn left(&self, node: u32) -> u32 {
        debug_assert!(!self.is_leaf(node));
        self.nodes[node as usize].left
    }

    /// Right child handle of an internal node.
    #[inline]
    #[must_use]
    pub fn right(&self, node: u32) -> u32 {
        debug_assert!(!self.is_leaf(node));
        self.nodes[node as usize].right
    }

    /// Bounding region of `node`.
    #[inline]
    #[must_use]
    pub fn region(&self, node: u32) -> Region<'_> {
        let dim = self.store.dim();
        let off = node as usize * dim;
        Region {
            lo: &self.bounds_lo[off..off + dim],
            hi: &self.bounds_hi[off..off + dim],
        }
    }

    /// Global descriptor ids stored in a leaf.
    #[inline]
    #[must_use]
    pub fn leaf_descriptors(&self, node: u32) -> &[u32] {
        debug_assert!(self.is_leaf(node));
        let n = &self.nodes[node as usize];
        &self.ids[n.start as usize..n.end as usize]
    }

    /// The descriptor store this tree indexes.
    ///
    /// Forest consistency is checked by `Arc` pointer identity on this.
    #[inline]
    #[must_use]
    pub fn store(&self) -> &Arc<DescriptorStore> {
        &self.store
    }

    /// Number of nodes in the tree.
    #[inline]
    #[must_use]
    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    /// Number of descriptors this tree indexes.
    #[inline]
    #[must_use]
    pub fn num_descriptors(&self) -> usize {
        self.ids.len()
    }
}
