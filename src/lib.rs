//! thicket: budgeted best-bin-first 2-NN search over k-d tree forests.
//!
//! A forest of independently randomized k-d trees indexes one shared store
//! of fixed-length byte descriptors. A query finds the two closest indexed
//! descriptors (by squared distance) across all trees while examining at
//! most a fixed number of candidates, spending that budget on the most
//! promising regions first:
//!
//! - [`descriptor`]: flat append-only store of `u8` descriptors.
//! - [`distance`]: integral metrics with exact and region-lower-bound forms.
//! - [`kdtree`]: randomized median-split trees with per-node byte bounds.
//! - [`query`]: the search core — top-2 accumulator, priority frontier,
//!   best-bin-first driver, and the precondition-checked entry point.
//! - [`lock`]: injected locking policies, so the same query structures run
//!   single-threaded or shared by cooperating worker threads.
//!
//! # Critical nuances
//!
//! **The search is an approximation.** The budget caps how many descriptors
//! are examined; with a budget at or above the number of indexed descriptors
//! the result matches a brute-force scan, below it the search degrades
//! gracefully, returning the best pair found in the regions explored so far.
//!
//! **The accumulator ignores ties with the best.** A candidate at exactly
//! the best distance never takes the runner-up slot. This keeps the two
//! returned indices distinct and makes multi-tree re-scans of one descriptor
//! harmless, but a true tie can go unreported; see [`query::Top2`].
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use thicket::{build_forest, two_nearest, DescriptorStore, TreeParams};
//!
//! let mut store = DescriptorStore::new(2)?;
//! for d in [[0u8, 0], [10, 0], [0, 10], [200, 200]] {
//!     store.push(&d)?;
//! }
//! let forest = build_forest(Arc::new(store), 2, &TreeParams::default(), 42)?;
//!
//! let (best, second) = two_nearest(&forest, &[1, 0], usize::MAX);
//! assert_eq!((best, second), (0, 1));
//! # Ok::<(), thicket::ForestError>(())
//! ```

pub mod descriptor;
pub mod distance;
pub mod error;
pub mod kdtree;
pub mod lock;
pub mod query;

pub use descriptor::{DescriptorStore, MAX_DIMENSION};
pub use distance::{Metric, L1, L2};
pub use error::{ForestError, Result};
pub use kdtree::{build_forest, build_tree, build_tree_over, KdTree, Region, TreeParams};
pub use lock::{NoLock, SharedLock};
pub use query::{two_nearest, SearchParams, TwoNnSearch, INVALID_INDEX};
