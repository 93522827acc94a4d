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

use crate::state::SearchState;
use fleet_model::index::{CarIndex, RideIndex};
use num_traits::{PrimInt, Signed};

/// One undoable mutation of the search state: `ride_index` was put on
/// `car_index` while `previous_used_cars` cars were in use.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct TrailEntry<T> {
    duration: T,
    previous_used_cars: usize,
    ride_index: RideIndex,
    car_index: CarIndex,
}

impl<T> TrailEntry<T>
where
    T: Copy,
{
    #[inline]
    pub fn duration(&self) -> T {
        self.duration
    }

    #[inline]
    pub fn previous_used_cars(&self) -> usize {
        self.previous_used_cars
    }

    #[inline]
    pub fn ride_index(&self) -> RideIndex {
        self.ride_index
    }

    #[inline]
    pub fn car_index(&self) -> CarIndex {
        self.car_index
    }
}

impl<T> std::fmt::Display for TrailEntry<T>
where
    T: std::fmt::Display,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "TrailEntry(ride: {}, car: {}, duration: {}, prev_used_cars: {})",
            self.ride_index.get(),
            self.car_index.get(),
            self.duration,
            self.previous_used_cars
        )
    }
}

/// A linear undo log with frame markers for backtracking.
///
/// Usage per decision level:
/// 1. `push_frame()` before descending,
/// 2. `apply_assignment(...)` for the mutation of that level,
/// 3. `backtrack(state)` to undo everything recorded since the frame.
///
/// Rolling back a frame of `k` entries costs `O(k)`.
#[derive(Debug, Clone, Default)]
pub struct SearchTrail<T> {
    entries: Vec<TrailEntry<T>>,
    /// `frames[i]` is the index in `entries` where depth `i` began.
    frames: Vec<usize>,
}

impl<T> SearchTrail<T> {
    #[inline]
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            frames: Vec::new(),
        }
    }

    /// Reserves room for one entry per ride plus the root frame.
    #[inline]
    pub fn preallocated(num_rides: usize) -> Self {
        Self {
            entries: Vec::with_capacity(num_rides),
            frames: Vec::with_capacity(num_rides + 1),
        }
    }

    pub fn ensure_capacity(&mut self, num_rides: usize) {
        if self.entries.capacity() < num_rides {
            self.entries.reserve(num_rides - self.entries.len());
        }
        if self.frames.capacity() < num_rides + 1 {
            self.frames.reserve(num_rides + 1 - self.frames.len());
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

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Marks the start of a new decision level.
    #[inline]
    pub fn push_frame(&mut self) {
        self.frames.push(self.entries.len());
    }

    /// Puts `ride_index` on `car_index` and records how to undo it.
    ///
    /// # Panics
    ///
    /// In debug builds, panics if the ride is already assigned.
    pub fn apply_assignment(
        &mut self,
        state: &mut SearchState<T>,
        ride_index: RideIndex,
        car_index: CarIndex,
        duration: T,
    ) where
        T: PrimInt + Signed,
    {
        debug_assert!(
            !state.is_ride_assigned(ride_index),
            "called `SearchTrail::apply_assignment` with ride {} which is already assigned",
            ride_index.get()
        );

        self.entries.push(TrailEntry {
            duration,
            previous_used_cars: state.num_used_cars(),
            ride_index,
            car_index,
        });
        state.assign_ride(ride_index, car_index, duration);
    }

    /// Undoes every entry of the innermost frame and pops it.
    /// Returns `false` if there was no frame to pop.
    pub fn backtrack(&mut self, state: &mut SearchState<T>) -> bool
    where
        T: PrimInt + Signed,
    {
        let Some(start) = self.frames.pop() else {
            return false;
        };

        while self.entries.len() > start {
            if let Some(entry) = self.entries.pop() {
                state.unassign_ride(
                    entry.ride_index,
                    entry.car_index,
                    entry.duration,
                    entry.previous_used_cars,
                );
            }
        }
        true
    }

    /// Clears entries and frames but keeps the allocations.
    #[inline]
    pub fn reset(&mut self) {
        self.entries.clear();
        self.frames.clear();
    }

    #[inline]
    pub fn allocated_memory_bytes(&self) -> usize {
        self.entries.capacity() * std::mem::size_of::<TrailEntry<T>>()
            + self.frames.capacity() * std::mem::size_of::<usize>()
    }
}

impl<T> std::fmt::Display for SearchTrail<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "SearchTrail(entries: {}, frames: {})",
            self.entries.len(),
            self.frames.len()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fleet_model::model::Model;

    fn model() -> Model<i64> {
        Model::from_rides([(0, 10), (5, 15), (20, 30)]).unwrap()
    }

    #[test]
    fn test_backtrack_restores_state_frame_by_frame() {
        let m = model();
        let mut state = SearchState::new(&m, 2);
        let mut trail = SearchTrail::preallocated(m.num_rides());

        trail.push_frame();
        trail.apply_assignment(&mut state, RideIndex::new(0), CarIndex::new(0), 10);
        trail.push_frame();
        trail.apply_assignment(&mut state, RideIndex::new(1), CarIndex::new(1), 10);

        assert_eq!(trail.depth(), 2);
        assert_eq!(trail.num_entries(), 2);
        assert_eq!(state.num_used_cars(), 2);

        assert!(trail.backtrack(&mut state));
        assert_eq!(state.num_used_cars(), 1);
        assert_eq!(state.num_assigned_rides(), 1);
        assert_eq!(state.car_load(CarIndex::new(1)), 0);

        assert!(trail.backtrack(&mut state));
        assert_eq!(state.num_used_cars(), 0);
        assert_eq!(state.remaining_duration(), 30);
        assert!(trail.is_empty());
        assert!(!trail.backtrack(&mut state));
    }

    #[test]
    fn test_frame_with_multiple_entries() {
        let m = model();
        let mut state = SearchState::new(&m, 2);
        let mut trail = SearchTrail::new();

        trail.push_frame();
        trail.apply_assignment(&mut state, RideIndex::new(0), CarIndex::new(0), 10);
        trail.apply_assignment(&mut state, RideIndex::new(2), CarIndex::new(0), 10);
        assert_eq!(state.car_load(CarIndex::new(0)), 20);

        trail.backtrack(&mut state);
        assert_eq!(state.num_assigned_rides(), 0);
        assert_eq!(state.car_load(CarIndex::new(0)), 0);
    }

    #[test]
    fn test_reset_keeps_capacity() {
        let mut trail = SearchTrail::<i64>::preallocated(8);
        let bytes = trail.allocated_memory_bytes();
        trail.push_frame();
        trail.reset();
        assert_eq!(trail.depth(), 0);
        assert_eq!(trail.allocated_memory_bytes(), bytes);
        assert_eq!(format!("{}", trail), "SearchTrail(entries: 0, frames: 0)");
    }
}
