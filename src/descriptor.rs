//! Flat storage for fixed-length byte descriptors.
//!
//! Descriptors are stored contiguously (structure-of-arrays) and addressed by
//! a forest-wide `u32` index. The store is append-only: trees built over it
//! borrow it through an `Arc` and assume indices never move.

use crate::error::{ForestError, Result};

/// Upper bound on descriptor dimension.
///
/// Chosen so every distance this crate computes fits in `u32` without
/// overflow: `65_536 * 255^2 < u32::MAX` for squared L2, and the L1 sum is
/// far smaller still.
pub const MAX_DIMENSION: usize = 65_536;

/// Append-only store of fixed-length `u8` descriptors.
///
/// `u32::MAX` is reserved as the invalid-index sentinel, so the store holds
/// at most `u32::MAX` descriptors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DescriptorStore {
    data: Vec<u8>,
    dim: usize,
}

impl DescriptorStore {
    /// Create an empty store for descriptors of `dim` components.
    pub fn new(dim: usize) -> Result<Self> {
        if dim == 0 || dim > MAX_DIMENSION {
            return Err(ForestError::InvalidDimension {
                got: dim,
                max: MAX_DIMENSION,
            });
        }
        Ok(Self {
            data: Vec::new(),
            dim,
        })
    }

    /// Create an empty store pre-sized for `count` descriptors.
    pub fn with_capacity(dim: usize, count: usize) -> Result<Self> {
        let mut store = Self::new(dim)?;
        store.data.reserve(count.saturating_mul(dim));
        Ok(store)
    }

    /// Append one descriptor and return its global index.
    pub fn push(&mut self, descriptor: &[u8]) -> Result<u32> {
        if descriptor.len() != self.dim {
            return Err(ForestError::DimensionMismatch {
                got: descriptor.len(),
                expected: self.dim,
            });
        }
        if self.len() >= u32::MAX as usize {
            return Err(ForestError::StoreFull);
        }
        let index = self.len() as u32;
        self.data.extend_from_slice(descriptor);
        Ok(index)
    }

    /// Descriptor components at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of range.
    #[inline]
    #[must_use]
    pub fn get(&self, index: u32) -> &[u8] {
        let off = index as usize * self.dim;
        &self.data[off..off + self.dim]
    }

    /// Number of descriptors stored.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len() / self.dim
    }

    /// True if no descriptors have been pushed.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Components per descriptor.
    #[inline]
    #[must_use]
    pub fn dim(&self) -> usize {
        self.dim
    }
}
