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

use crate::branching::decision::Decision;

/// A frame-structured LIFO stack of pending decisions.
///
/// Decisions of all open levels live in one vector; `frames` marks where each
/// level starts. Popping a frame truncates the vector back to that index.
#[derive(Clone, Debug, Default)]
pub struct SearchStack<T> {
    entries: Vec<Decision<T>>,
    /// `frames[i]` is the index in `entries` where depth `i` began.
    frames: Vec<usize>,
}

impl<T> SearchStack<T>
where
    T: Copy,
{
    #[inline]
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            frames: Vec::new(),
        }
    }

    /// Sized for `num_rides` levels of at most `num_cars` decisions each.
    #[inline]
    pub fn preallocated(num_rides: usize, num_cars: usize) -> Self {
        Self {
            entries: Vec::with_capacity(num_rides.saturating_mul(num_cars)),
            frames: Vec::with_capacity(num_rides.saturating_add(1)),
        }
    }

    #[inline]
    pub fn ensure_capacity(&mut self, num_rides: usize, num_cars: usize) {
        let entry_capacity = num_rides.saturating_mul(num_cars);
        let frame_capacity = num_rides.saturating_add(1);

        if self.entries.capacity() < entry_capacity {
            self.entries.reserve(entry_capacity - self.entries.len());
        }
        if self.frames.capacity() < frame_capacity {
            self.frames.reserve(frame_capacity - self.frames.len());
        }
    }

    #[inline]
    pub fn num_entries(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    /// Returns `true` if no frame is open (search exhausted).
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    #[inline]
    pub fn push_frame(&mut self) {
        self.frames.push(self.entries.len());
    }

    /// Pops the innermost frame and drops its remaining decisions.
    #[inline]
    pub fn pop_frame(&mut self) -> Option<()> {
        let start = self.frames.pop()?;
        self.entries.truncate(start);
        Some(())
    }

    #[inline]
    pub fn push(&mut self, decision: Decision<T>) {
        self.entries.push(decision);
    }

    #[inline]
    pub fn extend<I>(&mut self, iter: I)
    where
        I: IntoIterator<Item = Decision<T>>,
    {
        self.entries.extend(iter);
    }

    /// Pops the most recently pushed decision.
    #[inline]
    pub fn pop(&mut self) -> Option<Decision<T>> {
        self.entries.pop()
    }

    #[inline]
    pub fn reset(&mut self) {
        self.entries.clear();
        self.frames.clear();
    }

    /// Returns `true` if the innermost level has no decisions left.
    #[inline]
    pub fn is_current_level_empty(&self) -> bool {
        match self.frames.last() {
            Some(&start) => self.entries.len() == start,
            None => true,
        }
    }

    #[inline]
    pub fn current_frame_entries(&self) -> &[Decision<T>] {
        match self.frames.last() {
            Some(&start) => &self.entries[start..],
            None => &[],
        }
    }
}

impl<T> std::fmt::Display for SearchStack<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "SearchStack(entries: {}, frames: {})",
            self.entries.len(),
            self.frames.len()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fleet_model::index::{CarIndex, RideIndex};

    fn d(ride: usize, car: usize) -> Decision<i64> {
        Decision::new(RideIndex::new(ride), CarIndex::new(car), 0)
    }

    #[test]
    fn test_empty_stack() {
        let s = SearchStack::<i64>::new();
        assert!(s.is_empty());
        assert!(s.is_current_level_empty());
        assert!(s.current_frame_entries().is_empty());
        assert_eq!(format!("{}", s), "SearchStack(entries: 0, frames: 0)");
    }

    #[test]
    fn test_lifo_within_frame() {
        let mut s = SearchStack::preallocated(3, 2);
        s.push_frame();
        s.extend([d(0, 0), d(0, 1)]);
        assert_eq!(s.current_frame_entries().len(), 2);
        assert_eq!(s.pop(), Some(d(0, 1)));
        assert_eq!(s.pop(), Some(d(0, 0)));
        assert!(s.is_current_level_empty());
    }

    #[test]
    fn test_pop_frame_discards_remaining_decisions() {
        let mut s = SearchStack::new();
        s.push_frame();
        s.push(d(0, 0));
        s.push_frame();
        s.extend([d(1, 0), d(1, 1)]);
        assert_eq!(s.depth(), 2);

        assert_eq!(s.pop_frame(), Some(()));
        assert_eq!(s.num_entries(), 1);
        assert_eq!(s.current_frame_entries(), &[d(0, 0)]);

        assert_eq!(s.pop_frame(), Some(()));
        assert_eq!(s.pop_frame(), None);
        assert_eq!(s.num_entries(), 0);
    }

    #[test]
    fn test_reset_and_capacity() {
        let mut s = SearchStack::<i64>::new();
        s.ensure_capacity(4, 3);
        s.push_frame();
        s.push(d(0, 0));
        s.reset();
        assert!(s.is_empty());
        assert_eq!(s.num_entries(), 0);
    }
}
