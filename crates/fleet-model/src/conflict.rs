// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

//! The conflict relation between rides.
//!
//! Two rides conflict iff their half-open windows share an instant, i.e.
//! `!(end_i <= start_j || end_j <= start_i)`. Conflicting rides can never be
//! served by the same car. The relation is materialized once, over all
//! unordered pairs, into one bitset row per ride so that solvers can test a
//! ride against the whole set of rides already on a car with a single
//! disjointness check.

use crate::index::{CarIndex, RideIndex};
use fixedbitset::FixedBitSet;
use fleet_core::math::interval::ClosedOpenInterval;
use num_traits::PrimInt;

/// The symmetric, irreflexive conflict relation of a ride set.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConflictGraph {
    rows: Vec<FixedBitSet>,
    num_conflicts: usize,
}

impl ConflictGraph {
    /// Builds the conflict graph of `rides` in `O(n²)`.
    pub fn new<T>(rides: &[ClosedOpenInterval<T>]) -> Self
    where
        T: PrimInt,
    {
        let n = rides.len();
        let mut rows = vec![FixedBitSet::with_capacity(n); n];
        let mut num_conflicts = 0;

        for i in 0..n {
            for j in (i + 1)..n {
                if rides[i].intersects(rides[j]) {
                    rows[i].insert(j);
                    rows[j].insert(i);
                    num_conflicts += 1;
                }
            }
        }

        Self {
            rows,
            num_conflicts,
        }
    }

    /// Returns the number of rides (vertices).
    #[inline]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Returns the number of conflicting unordered pairs (edges).
    #[inline]
    pub fn num_conflicts(&self) -> usize {
        self.num_conflicts
    }

    /// Returns `true` if rides `a` and `b` overlap.
    ///
    /// # Panics
    ///
    /// Panics if `a` is out of bounds.
    #[inline]
    pub fn conflicts(&self, a: RideIndex, b: RideIndex) -> bool {
        let index = a.get();
        debug_assert!(
            index < self.len(),
            "called `ConflictGraph::conflicts` with ride index out of bounds: the len is {} but the index is {}",
            self.len(),
            index
        );
        self.rows[index].contains(b.get())
    }

    /// Returns the bitset of rides conflicting with `ride`.
    #[inline]
    pub fn row(&self, ride: RideIndex) -> &FixedBitSet {
        let index = ride.get();
        debug_assert!(
            index < self.len(),
            "called `ConflictGraph::row` with ride index out of bounds: the len is {} but the index is {}",
            self.len(),
            index
        );
        &self.rows[index]
    }

    /// Iterates over the rides conflicting with `ride` in ascending order.
    #[inline]
    pub fn neighbors(&self, ride: RideIndex) -> impl Iterator<Item = RideIndex> + '_ {
        self.row(ride).ones().map(RideIndex::new)
    }

    /// Returns the number of rides conflicting with `ride`.
    #[inline]
    pub fn degree(&self, ride: RideIndex) -> usize {
        self.row(ride).count_ones(..)
    }

    /// Returns the largest degree in the graph, `0` for an empty graph.
    pub fn max_degree(&self) -> usize {
        self.rows
            .iter()
            .map(|row| row.count_ones(..))
            .max()
            .unwrap_or(0)
    }

    /// Returns the first pair of conflicting rides that share a car in
    /// `cars`, or `None` if the assignment respects the no-overlap constraint.
    ///
    /// `cars[i]` is the car serving ride `i`.
    pub fn find_violation(&self, cars: &[CarIndex]) -> Option<(RideIndex, RideIndex)> {
        debug_assert_eq!(
            cars.len(),
            self.len(),
            "called `ConflictGraph::find_violation` with an assignment of the wrong length"
        );

        self.rows.iter().enumerate().find_map(|(i, row)| {
            row.ones()
                .filter(|&j| j > i)
                .find(|&j| cars[i] == cars[j])
                .map(|j| (RideIndex::new(i), RideIndex::new(j)))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn iv(s: i64, e: i64) -> ClosedOpenInterval<i64> {
        ClosedOpenInterval::new(s, e)
    }

    fn ri(i: usize) -> RideIndex {
        RideIndex::new(i)
    }

    fn ci(i: usize) -> CarIndex {
        CarIndex::new(i)
    }

    #[test]
    fn test_touching_rides_do_not_conflict() {
        let g = ConflictGraph::new(&[iv(0, 10), iv(10, 20)]);
        assert_eq!(g.num_conflicts(), 0);
        assert!(!g.conflicts(ri(0), ri(1)));
        assert_eq!(g.max_degree(), 0);
    }

    #[test]
    fn test_overlap_is_symmetric_and_irreflexive() {
        let g = ConflictGraph::new(&[iv(0, 10), iv(5, 15), iv(20, 30)]);
        assert_eq!(g.len(), 3);
        assert_eq!(g.num_conflicts(), 1);
        assert!(g.conflicts(ri(0), ri(1)));
        assert!(g.conflicts(ri(1), ri(0)));
        assert!(!g.conflicts(ri(0), ri(0)));
        assert!(!g.conflicts(ri(0), ri(2)));
        assert_eq!(g.degree(ri(2)), 0);
    }

    #[test]
    fn test_neighbors_and_degree() {
        let g = ConflictGraph::new(&[iv(0, 10), iv(0, 10), iv(0, 10), iv(50, 60)]);
        let n0: Vec<_> = g.neighbors(ri(0)).collect();
        assert_eq!(n0, vec![ri(1), ri(2)]);
        assert_eq!(g.degree(ri(1)), 2);
        assert_eq!(g.num_conflicts(), 3);
        assert_eq!(g.max_degree(), 2);
    }

    #[test]
    fn test_find_violation() {
        let g = ConflictGraph::new(&[iv(0, 10), iv(5, 15), iv(10, 20)]);
        assert_eq!(g.find_violation(&[ci(0), ci(1), ci(0)]), None);
        assert_eq!(
            g.find_violation(&[ci(0), ci(0), ci(1)]),
            Some((ri(0), ri(1)))
        );
    }

    #[test]
    fn test_empty_graph() {
        let g = ConflictGraph::new::<i64>(&[]);
        assert!(g.is_empty());
        assert_eq!(g.max_degree(), 0);
        assert_eq!(g.find_violation(&[]), None);
    }
}
