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

//! Sweep-line routines over sets of half-open intervals.

use crate::math::interval::ClosedOpenInterval;
use num_traits::PrimInt;

/// Returns the stabbing number of `intervals` (the largest number of
/// intervals that contain one common instant) together with an instant at
/// which it is attained. Returns `None` when no interval is non-empty.
///
/// Start and end instants are swept in ascending order. On equal instants
/// ends are processed before starts, since `[a, t)` and `[t, b)` share no
/// instant. Empty intervals never contribute. Runs in `O(n log n)`.
///
/// # Examples
///
/// ```rust
/// # use fleet_core::algorithm::max_overlap_witness;
/// # use fleet_core::math::interval::ClosedOpenInterval;
/// let rides = [
///     ClosedOpenInterval::new(0, 10),
///     ClosedOpenInterval::new(5, 15),
///     ClosedOpenInterval::new(10, 20),
/// ];
/// assert_eq!(max_overlap_witness(&rides), Some((2, 5)));
/// ```
pub fn max_overlap_witness<T>(intervals: &[ClosedOpenInterval<T>]) -> Option<(usize, T)>
where
    T: PrimInt,
{
    // (instant, delta): delta is -1 for an end and +1 for a start so that the
    // natural tuple ordering processes ends first on ties.
    let mut events: Vec<(T, i8)> = Vec::with_capacity(intervals.len() * 2);
    for iv in intervals.iter().filter(|iv| !iv.is_empty()) {
        events.push((iv.start(), 1));
        events.push((iv.end(), -1));
    }
    events.sort_unstable();

    let mut active: usize = 0;
    let mut best: Option<(usize, T)> = None;
    for (instant, delta) in events {
        if delta > 0 {
            active += 1;
            if best.map_or(true, |(count, _)| active > count) {
                best = Some((active, instant));
            }
        } else {
            debug_assert!(active > 0, "called `max_overlap_witness` with unbalanced events");
            active -= 1;
        }
    }
    best
}

/// Counts the intervals that contain `instant`.
#[inline]
pub fn active_at<T>(intervals: &[ClosedOpenInterval<T>], instant: T) -> usize
where
    T: PrimInt,
{
    intervals
        .iter()
        .filter(|iv| iv.contains_point(instant))
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, Rng, SeedableRng};

    type IntegerType = i64;

    fn iv(s: IntegerType, e: IntegerType) -> ClosedOpenInterval<IntegerType> {
        ClosedOpenInterval::new(s, e)
    }

    fn max_overlap(intervals: &[ClosedOpenInterval<IntegerType>]) -> usize {
        max_overlap_witness(intervals).map_or(0, |(count, _)| count)
    }

    #[test]
    fn test_max_overlap_empty_and_single() {
        assert_eq!(max_overlap_witness::<IntegerType>(&[]), None);
        assert_eq!(max_overlap_witness(&[iv(3, 4)]), Some((1, 3)));
        assert_eq!(max_overlap_witness(&[iv(3, 3)]), None);
    }

    #[test]
    fn test_max_overlap_touching_intervals_do_not_stack() {
        assert_eq!(max_overlap(&[iv(0, 10), iv(10, 20)]), 1);
        assert_eq!(max_overlap(&[iv(10, 20), iv(0, 10), iv(20, 30)]), 1);
    }

    #[test]
    fn test_max_overlap_nested_and_identical() {
        assert_eq!(max_overlap(&[iv(0, 10), iv(0, 10), iv(0, 10)]), 3);
        assert_eq!(max_overlap(&[iv(0, 100), iv(10, 20), iv(15, 30), iv(40, 50)]), 3);
    }

    #[test]
    fn test_max_overlap_witness_point_is_covered() {
        let rides = [iv(0, 10), iv(5, 15), iv(12, 30), iv(13, 14)];
        let (count, at) = max_overlap_witness(&rides).unwrap();
        assert_eq!(count, 3);
        assert_eq!(active_at(&rides, at), 3);
    }

    #[test]
    fn test_max_overlap_matches_point_scan() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..50 {
            let n = rng.gen_range(1..40);
            let rides: Vec<_> = (0..n)
                .map(|_| {
                    let s = rng.gen_range(0..200);
                    iv(s, s + rng.gen_range(1..50))
                })
                .collect();
            let brute = (0..260).map(|t| active_at(&rides, t)).max().unwrap();
            assert_eq!(max_overlap(&rides), brute);
        }
    }
}
