//! Error types for thicket.
//!
//! Only construction-time problems are recoverable. Query-time precondition
//! violations (empty forest, mixed descriptor stores) are programming errors
//! and fail fast with a panic instead of flowing through this enum.

use thiserror::Error;

/// Convenience alias for build/configuration results.
pub type Result<T> = std::result::Result<T, ForestError>;

/// Errors that can occur while filling a descriptor store or building trees.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ForestError {
    /// Descriptor dimension outside the supported range.
    #[error("descriptor dimension must be in 1..={max}, got {got}")]
    InvalidDimension { got: usize, max: usize },

    /// Descriptor component count does not match the store dimension.
    #[error("descriptor has {got} components, store dimension is {expected}")]
    DimensionMismatch { got: usize, expected: usize },

    /// The store cannot hold another descriptor without exhausting the
    /// 32-bit index space.
    #[error("descriptor store is full (index space exhausted)")]
    StoreFull,

    /// Attempted to build a tree over an empty descriptor store.
    #[error("descriptor store is empty")]
    EmptyStore,

    /// Attempted to build a tree over an empty id subset.
    #[error("descriptor id subset is empty")]
    EmptySubset,

    /// The same descriptor id appears twice in a tree's id subset.
    #[error("duplicate descriptor id {0} in tree subset")]
    DuplicateId(u32),

    /// A descriptor id in a subset does not exist in the store.
    #[error("descriptor id {id} out of range for store of {len} descriptors")]
    IdOutOfRange { id: u32, len: usize },

    /// Invalid build parameter.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
}
