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

use num_traits::PrimInt;

/// A half-open time window `[start, end)`.
///
/// Rides occupy their car from `start` up to, but not including, `end`, so a
/// ride ending at `t` and a ride starting at `t` never compete for the same car.
///
/// # Invariants
///
/// `start_inclusive <= end_exclusive`.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ClosedOpenInterval<T>
where
    T: PrimInt,
{
    start_inclusive: T,
    end_exclusive: T,
}

impl<T> ClosedOpenInterval<T>
where
    T: PrimInt,
{
    /// Creates a new interval.
    ///
    /// # Panics
    ///
    /// Panics if `start_inclusive > end_exclusive`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use fleet_core::math::interval::ClosedOpenInterval;
    /// let iv = ClosedOpenInterval::new(0, 10);
    /// assert_eq!(iv.len(), 10);
    /// ```
    #[inline]
    pub fn new(start_inclusive: T, end_exclusive: T) -> Self {
        assert!(
            start_inclusive <= end_exclusive,
            "Invalid interval: start_inclusive must be less than or equal to end_exclusive"
        );
        Self {
            start_inclusive,
            end_exclusive,
        }
    }

    #[inline]
    pub fn new_unchecked(start_inclusive: T, end_exclusive: T) -> Self {
        debug_assert!(
            start_inclusive <= end_exclusive,
            "Invalid interval: start_inclusive must be less than or equal to end_exclusive"
        );
        Self {
            start_inclusive,
            end_exclusive,
        }
    }

    #[inline(always)]
    pub const fn start(&self) -> T {
        self.start_inclusive
    }

    #[inline(always)]
    pub const fn end(&self) -> T {
        self.end_exclusive
    }

    /// Returns `true` if the two intervals share at least one instant.
    ///
    /// Touching intervals (`a.end == b.start`) do not intersect.
    ///
    /// ```rust
    /// # use fleet_core::math::interval::ClosedOpenInterval;
    /// let a = ClosedOpenInterval::new(0, 10);
    /// assert!(a.intersects(ClosedOpenInterval::new(5, 15)));
    /// assert!(!a.intersects(ClosedOpenInterval::new(10, 20)));
    /// ```
    #[inline]
    pub fn intersects(&self, other: Self) -> bool {
        self.start_inclusive < other.end_exclusive && other.start_inclusive < self.end_exclusive
    }

    #[inline]
    pub fn contains_point(&self, value: T) -> bool {
        self.start_inclusive <= value && value < self.end_exclusive
    }

    /// Returns `end - start`.
    #[inline]
    pub fn len(&self) -> T {
        self.end_exclusive - self.start_inclusive
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.start_inclusive == self.end_exclusive
    }
}

impl<T> std::fmt::Debug for ClosedOpenInterval<T>
where
    T: PrimInt + std::fmt::Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClosedOpenInterval")
            .field("start_inclusive", &self.start_inclusive)
            .field("end_exclusive", &self.end_exclusive)
            .finish()
    }
}

impl<T> std::fmt::Display for ClosedOpenInterval<T>
where
    T: PrimInt + std::fmt::Display,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}, {})", self.start_inclusive, self.end_exclusive)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_construction_valid_and_empty() {
        let iv = ClosedOpenInterval::new(10, 20);
        assert_eq!((iv.start(), iv.end(), iv.len()), (10, 20, 10));
        assert!(!iv.is_empty());
        assert!(ClosedOpenInterval::new(10, 10).is_empty());
    }

    #[test]
    #[should_panic(expected = "Invalid interval")]
    fn test_new_panics_on_reversed_bounds() {
        ClosedOpenInterval::new(10, 5);
    }

    #[test]
    fn test_intersects_is_strict_at_boundaries() {
        let a = ClosedOpenInterval::new(0, 10);
        assert!(a.intersects(ClosedOpenInterval::new(9, 12)));
        assert!(a.intersects(ClosedOpenInterval::new(-5, 1)));
        assert!(a.intersects(ClosedOpenInterval::new(2, 3)));
        assert!(!a.intersects(ClosedOpenInterval::new(10, 20)));
        assert!(!a.intersects(ClosedOpenInterval::new(-5, 0)));
    }

    #[test]
    fn test_contains_point_half_open() {
        let iv = ClosedOpenInterval::new(0, 10);
        assert!(iv.contains_point(0));
        assert!(iv.contains_point(9));
        assert!(!iv.contains_point(10));
        assert!(!iv.contains_point(-1));
    }

    #[test]
    fn test_display() {
        let iv = ClosedOpenInterval::new(3, 7);
        assert_eq!(format!("{}", iv), "[3, 7)");
    }
}
