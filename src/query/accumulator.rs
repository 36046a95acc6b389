//! Best-two tracking for a single query.

use crate::query::INVALID_INDEX;

/// Tracks the best and second-best (distance, index) pairs seen so far.
///
/// Both slots start at the sentinel (`u32::MAX` distance, [`INVALID_INDEX`]);
/// distances only tighten across a query's lifetime.
///
/// ## Tie policy
///
/// A candidate whose distance equals the current best is discarded instead of
/// being promoted to the runner-up slot. This keeps the two stored indices
/// distinct and makes re-scanning the same descriptor from another tree of
/// the forest a no-op, at the cost of under-reporting a genuinely distinct
/// descriptor tied with the best. Deliberate, and relied upon by callers that
/// ratio-test `distance0` against `distance1`.
///
/// Updates are not internally synchronized; the driver serializes them
/// through its locking policy.
#[derive(Debug, Clone)]
pub struct Top2 {
    distance: [u32; 2],
    index: [u32; 2],
}

impl Top2 {
    #[must_use]
    pub fn new() -> Self {
        Self {
            distance: [u32::MAX; 2],
            index: [INVALID_INDEX; 2],
        }
    }

    /// Fold one (distance, index) candidate into the best-two state.
    ///
    /// `distance` must be a real distance, i.e. below the `u32::MAX`
    /// sentinel; the store's dimension cap guarantees that for every metric
    /// in this crate.
    pub fn update(&mut self, distance: u32, index: u32) {
        debug_assert!(distance < u32::MAX);
        if distance < self.distance[0] {
            self.distance[1] = self.distance[0];
            self.index[1] = self.index[0];
            self.distance[0] = distance;
            self.index[0] = index;
        } else if distance != self.distance[0] && distance < self.distance[1] {
            self.distance[1] = distance;
            self.index[1] = index;
        }
        // Cheap invariants, kept on in release builds.
        assert!(self.distance[0] < self.distance[1]);
        assert!(self.index[0] != self.index[1]);
    }

    /// Best and second-best distances, `u32::MAX` where unset.
    #[inline]
    #[must_use]
    pub fn distances(&self) -> (u32, u32) {
        (self.distance[0], self.distance[1])
    }

    /// Best and second-best indices, [`INVALID_INDEX`] where unset.
    #[inline]
    #[must_use]
    pub fn indices(&self) -> (u32, u32) {
        (self.index[0], self.index[1])
    }

    /// The second-best distance; the frontier cutoff tests against this.
    #[inline]
    #[must_use]
    pub fn second_distance(&self) -> u32 {
        self.distance[1]
    }
}

impl Default for Top2 {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_at_sentinel() {
        let acc = Top2::new();
        assert_eq!(acc.distances(), (u32::MAX, u32::MAX));
        assert_eq!(acc.indices(), (INVALID_INDEX, INVALID_INDEX));
    }

    #[test]
    fn two_updates_fill_both_slots_ordered() {
        let mut acc = Top2::new();
        acc.update(40, 1);
        acc.update(10, 0);
        assert_eq!(acc.distances(), (10, 40));
        assert_eq!(acc.indices(), (0, 1));
    }

    #[test]
    fn better_candidate_demotes_the_best() {
        let mut acc = Top2::new();
        acc.update(10, 0);
        acc.update(40, 1);
        acc.update(5, 2);
        assert_eq!(acc.distances(), (5, 10));
        assert_eq!(acc.indices(), (2, 0));
    }

    #[test]
    fn middle_candidate_replaces_only_second() {
        let mut acc = Top2::new();
        acc.update(10, 0);
        acc.update(40, 1);
        acc.update(20, 2);
        assert_eq!(acc.distances(), (10, 20));
        assert_eq!(acc.indices(), (0, 2));
    }

    #[test]
    fn tie_with_best_is_discarded() {
        let mut acc = Top2::new();
        acc.update(10, 0);
        acc.update(10, 1);
        assert_eq!(acc.distances(), (10, u32::MAX));
        assert_eq!(acc.indices(), (0, INVALID_INDEX));
    }

    #[test]
    fn rescan_of_same_descriptor_is_a_noop() {
        let mut acc = Top2::new();
        acc.update(10, 0);
        acc.update(25, 1);
        // Same descriptor reached again through another tree.
        acc.update(10, 0);
        acc.update(25, 1);
        assert_eq!(acc.distances(), (10, 25));
        assert_eq!(acc.indices(), (0, 1));
    }

    #[test]
    fn worse_candidate_changes_nothing() {
        let mut acc = Top2::new();
        acc.update(10, 0);
        acc.update(20, 1);
        acc.update(30, 2);
        assert_eq!(acc.distances(), (10, 20));
        assert_eq!(acc.indices(), (0, 1));
    }

    #[test]
    fn zero_distance_is_a_valid_best() {
        let mut acc = Top2::new();
        acc.update(0, 3);
        acc.update(1, 4);
        assert_eq!(acc.distances(), (0, 1));
        assert_eq!(acc.indices(), (3, 4));
    }
}
