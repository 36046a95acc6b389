//! Distance metrics over byte descriptors.
//!
//! Every metric comes in two forms: an exact descriptor-to-descriptor
//! distance, and an admissible lower bound from a descriptor to a node's
//! bounding region. The lower bound is what makes best-bin-first ordering
//! meaningful: a frontier entry's bound must never exceed the true distance
//! to any descriptor stored under that node, otherwise the head-of-loop
//! cutoff would discard reachable nearest neighbors.
//!
//! All distances are non-negative integers. With dimensions capped at
//! [`crate::descriptor::MAX_DIMENSION`], no sum here can overflow `u32`.

use crate::kdtree::Region;

/// A distance metric with an exact form and a region lower bound.
///
/// Implementations must be admissible:
/// `lower_bound(q, region(node)) <= distance(q, d)` for every descriptor `d`
/// stored under `node`.
pub trait Metric {
    /// Exact distance between two descriptors of equal length.
    fn distance(&self, a: &[u8], b: &[u8]) -> u32;

    /// Lower bound on `distance(query, d)` for any `d` inside `region`.
    fn lower_bound(&self, query: &[u8], region: Region<'_>) -> u32;
}

/// Squared Euclidean distance. The default metric.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct L2;

impl Metric for L2 {
    #[inline]
    fn distance(&self, a: &[u8], b: &[u8]) -> u32 {
        l2_squared(a, b)
    }

    #[inline]
    fn lower_bound(&self, query: &[u8], region: Region<'_>) -> u32 {
        l2_squared_to_region(query, region)
    }
}

/// Manhattan (L1) distance.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct L1;

impl Metric for L1 {
    #[inline]
    fn distance(&self, a: &[u8], b: &[u8]) -> u32 {
        l1(a, b)
    }

    #[inline]
    fn lower_bound(&self, query: &[u8], region: Region<'_>) -> u32 {
        l1_to_region(query, region)
    }
}

/// Squared Euclidean distance between two byte slices of equal length.
#[inline]
#[must_use]
pub fn l2_squared(a: &[u8], b: &[u8]) -> u32 {
    debug_assert_eq!(a.len(), b.len());
    a.iter()
        .zip(b.iter())
        .map(|(&x, &y)| {
            let d = i32::from(x) - i32::from(y);
            (d * d) as u32
        })
        .sum()
}

/// Manhattan distance between two byte slices of equal length.
#[inline]
#[must_use]
pub fn l1(a: &[u8], b: &[u8]) -> u32 {
    debug_assert_eq!(a.len(), b.len());
    a.iter()
        .zip(b.iter())
        .map(|(&x, &y)| (i32::from(x) - i32::from(y)).unsigned_abs())
        .sum()
}

/// Squared Euclidean distance from `query` to the nearest point of `region`.
///
/// Per axis, the closest point inside the region is the query component
/// clamped to `[lo, hi]`; a component already inside contributes zero.
#[inline]
#[must_use]
pub fn l2_squared_to_region(query: &[u8], region: Region<'_>) -> u32 {
    debug_assert_eq!(query.len(), region.lo.len());
    query
        .iter()
        .zip(region.lo.iter().zip(region.hi.iter()))
        .map(|(&c, (&lo, &hi))| {
            let d = axis_excess(c, lo, hi);
            (d * d) as u32
        })
        .sum()
}

/// Manhattan distance from `query` to the nearest point of `region`.
#[inline]
#[must_use]
pub fn l1_to_region(query: &[u8], region: Region<'_>) -> u32 {
    debug_assert_eq!(query.len(), region.lo.len());
    query
        .iter()
        .zip(region.lo.iter().zip(region.hi.iter()))
        .map(|(&c, (&lo, &hi))| axis_excess(c, lo, hi) as u32)
        .sum()
}

/// How far component `c` lies outside the interval `[lo, hi]`.
#[inline]
fn axis_excess(c: u8, lo: u8, hi: u8) -> i32 {
    if c < lo {
        i32::from(lo) - i32::from(c)
    } else if c > hi {
        i32::from(c) - i32::from(hi)
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn l2_known_values() {
        assert_eq!(l2_squared(&[0, 0], &[3, 4]), 25);
        assert_eq!(l2_squared(&[255], &[0]), 255 * 255);
        assert_eq!(l2_squared(&[7, 7, 7], &[7, 7, 7]), 0);
    }

    #[test]
    fn l1_known_values() {
        assert_eq!(l1(&[0, 0], &[3, 4]), 7);
        assert_eq!(l1(&[255], &[0]), 255);
        assert_eq!(l1(&[7, 7, 7], &[7, 7, 7]), 0);
    }

    #[test]
    fn region_bound_is_zero_inside() {
        let region = Region {
            lo: &[10, 10],
            hi: &[20, 20],
        };
        assert_eq!(l2_squared_to_region(&[15, 10], region), 0);
        assert_eq!(l1_to_region(&[20, 12], region), 0);
    }

    #[test]
    fn region_bound_clamps_per_axis() {
        let region = Region {
            lo: &[10, 10],
            hi: &[20, 20],
        };
        // 4 below on axis 0, 5 above on axis 1.
        assert_eq!(l2_squared_to_region(&[6, 25], region), 16 + 25);
        assert_eq!(l1_to_region(&[6, 25], region), 4 + 5);
    }

    #[test]
    fn degenerate_region_is_a_point() {
        let region = Region {
            lo: &[42],
            hi: &[42],
        };
        assert_eq!(l2_squared_to_region(&[50], region), 64);
        assert_eq!(l2_squared_to_region(&[42], region), 0);
    }
}
