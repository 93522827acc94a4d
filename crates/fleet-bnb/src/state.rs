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

//! Search state for the balancing branch-and-bound.
//!
//! `SearchState` tracks a partial ride to car assignment while the tree is
//! explored. It is mutated in place by the trail and restored on backtrack,
//! so every field must be recoverable from a `TrailEntry`.
//!
//! Tracked per car:
//! - its accumulated busy time (`car_loads`),
//! - the set of rides it serves (`car_members`), which together with a row of
//!   the conflict graph answers "can ride r still go on car c" with a single
//!   bitset disjointness test.
//!
//! Cars are opened in index order: cars `0..num_used_cars` serve at least one
//! ride and all others are empty. The branching relies on this to offer only
//! the first empty car, since empty cars are interchangeable.

use fixedbitset::FixedBitSet;
use fleet_model::{
    index::{CarIndex, RideIndex},
    model::Model,
    solution::{spread, Solution},
};
use num_traits::{PrimInt, Signed};

#[derive(Debug, Clone)]
pub struct SearchState<T> {
    car_loads: Vec<T>,
    car_members: Vec<FixedBitSet>,
    ride_cars: Vec<CarIndex>,
    assigned_rides: FixedBitSet,
    remaining_duration: T,
    num_assigned_rides: usize,
    num_used_cars: usize,
}

impl<T> SearchState<T>
where
    T: PrimInt + Signed,
{
    /// Creates the root state for balancing `model` over `num_cars` cars:
    /// nothing assigned, every car empty.
    pub fn new(model: &Model<T>, num_cars: usize) -> Self {
        let num_rides = model.num_rides();
        Self {
            car_loads: vec![T::zero(); num_cars],
            car_members: vec![FixedBitSet::with_capacity(num_rides); num_cars],
            ride_cars: vec![CarIndex::new(0); num_rides],
            assigned_rides: FixedBitSet::with_capacity(num_rides),
            remaining_duration: model.total_duration(),
            num_assigned_rides: 0,
            num_used_cars: 0,
        }
    }

    #[inline]
    pub fn num_cars(&self) -> usize {
        self.car_loads.len()
    }

    #[inline]
    pub fn num_rides(&self) -> usize {
        self.ride_cars.len()
    }

    #[inline]
    pub fn num_assigned_rides(&self) -> usize {
        self.num_assigned_rides
    }

    /// Returns `true` once every ride is on a car.
    #[inline]
    pub fn is_complete(&self) -> bool {
        self.num_assigned_rides == self.ride_cars.len()
    }

    /// Number of cars serving at least one ride.
    #[inline]
    pub fn num_used_cars(&self) -> usize {
        self.num_used_cars
    }

    /// Total duration of the rides not yet assigned.
    #[inline]
    pub fn remaining_duration(&self) -> T {
        self.remaining_duration
    }

    #[inline]
    pub fn car_loads(&self) -> &[T] {
        &self.car_loads
    }

    /// Returns the busy time accumulated on `car_index`.
    ///
    /// # Panics
    ///
    /// Panics if `car_index` is not in `0..num_cars()`.
    #[inline]
    pub fn car_load(&self, car_index: CarIndex) -> T {
        let index = car_index.get();
        debug_assert!(
            index < self.num_cars(),
            "called `SearchState::car_load` with car index out of bounds: the len is {} but the index is {}",
            self.num_cars(),
            index
        );

        self.car_loads[index]
    }

    /// Returns the rides currently served by `car_index`.
    ///
    /// # Panics
    ///
    /// Panics if `car_index` is not in `0..num_cars()`.
    #[inline]
    pub fn car_members(&self, car_index: CarIndex) -> &FixedBitSet {
        &self.car_members[car_index.get()]
    }

    /// Returns `true` if `ride_index` is already on a car.
    ///
    /// # Panics
    ///
    /// Panics if `ride_index` is not in `0..num_rides()`.
    #[inline]
    pub fn is_ride_assigned(&self, ride_index: RideIndex) -> bool {
        let index = ride_index.get();
        debug_assert!(
            index < self.num_rides(),
            "called `SearchState::is_ride_assigned` with ride index out of bounds: the len is {} but the index is {}",
            self.num_rides(),
            index
        );

        self.assigned_rides.contains(index)
    }

    /// Returns the car serving `ride_index`, if it is assigned.
    #[inline]
    pub fn car_for_ride(&self, ride_index: RideIndex) -> Option<CarIndex> {
        if self.is_ride_assigned(ride_index) {
            Some(self.ride_cars[ride_index.get()])
        } else {
            None
        }
    }

    /// Iterates over the rides that still need a car, in index order.
    #[inline]
    pub fn unassigned_rides(&self) -> impl Iterator<Item = RideIndex> + '_ {
        self.assigned_rides.zeroes().map(RideIndex::new)
    }

    /// The cars a branching step may try: every car already in use, and the
    /// first empty car if there is one.
    #[inline]
    pub fn open_cars(&self) -> impl Iterator<Item = CarIndex> {
        let end = (self.num_used_cars + 1).min(self.num_cars());
        (0..end).map(CarIndex::new)
    }

    /// Returns `true` if `ride_index` can join `car_index` without
    /// overlapping any ride the car already serves. Does not look at the
    /// car opening order; see [`SearchState::open_cars`].
    #[inline]
    pub fn fits(&self, model: &Model<T>, ride_index: RideIndex, car_index: CarIndex) -> bool {
        model
            .conflicts()
            .row(ride_index)
            .is_disjoint(&self.car_members[car_index.get()])
    }

    /// Counts the open cars that can still take `ride_index`.
    #[inline]
    pub fn num_feasible_cars(&self, model: &Model<T>, ride_index: RideIndex) -> usize {
        self.open_cars()
            .filter(|&car| self.fits(model, ride_index, car))
            .count()
    }

    /// Largest and smallest car load, `(max, min)`.
    #[inline]
    pub fn load_extremes(&self) -> (T, T) {
        let max = self.car_loads.iter().copied().max().unwrap_or_else(T::zero);
        let min = self.car_loads.iter().copied().min().unwrap_or_else(T::zero);
        (max, min)
    }

    /// Puts `ride_index` on `car_index`, adding `duration` to the car load.
    ///
    /// # Panics
    ///
    /// In debug builds, panics if the ride is already assigned or the car
    /// index is out of bounds.
    #[inline]
    pub fn assign_ride(&mut self, ride_index: RideIndex, car_index: CarIndex, duration: T) {
        let (ride, car) = (ride_index.get(), car_index.get());
        debug_assert!(
            car < self.num_cars(),
            "called `SearchState::assign_ride` with car index out of bounds: the len is {} but the index is {}",
            self.num_cars(),
            car
        );
        debug_assert!(
            !self.assigned_rides.contains(ride),
            "called `SearchState::assign_ride` with ride {} already assigned",
            ride
        );

        self.assigned_rides.insert(ride);
        self.car_members[car].insert(ride);
        self.ride_cars[ride] = car_index;
        self.car_loads[car] = self.car_loads[car] + duration;
        self.remaining_duration = self.remaining_duration - duration;
        self.num_assigned_rides += 1;
        if car == self.num_used_cars {
            self.num_used_cars += 1;
        }

        debug_assert!(self.num_assigned_rides <= self.num_rides());
        debug_assert!(self.num_used_cars <= self.num_cars());
    }

    /// Reverts [`SearchState::assign_ride`].
    ///
    /// # Panics
    ///
    /// In debug builds, panics if the ride is not on `car_index`.
    #[inline]
    pub fn unassign_ride(
        &mut self,
        ride_index: RideIndex,
        car_index: CarIndex,
        duration: T,
        previous_used_cars: usize,
    ) {
        let (ride, car) = (ride_index.get(), car_index.get());
        debug_assert!(
            self.assigned_rides.contains(ride) && self.ride_cars[ride] == car_index,
            "called `SearchState::unassign_ride` with ride {} which is not on car {}",
            ride,
            car
        );

        self.assigned_rides.set(ride, false);
        self.car_members[car].set(ride, false);
        self.car_loads[car] = self.car_loads[car] - duration;
        self.remaining_duration = self.remaining_duration + duration;
        self.num_assigned_rides -= 1;
        self.num_used_cars = previous_used_cars;
    }

    /// The spread of the current car loads.
    #[inline]
    pub fn current_spread(&self) -> T {
        spread(&self.car_loads)
    }

    /// Snapshots a complete state as a solution with the given objective.
    pub fn to_solution(&self, objective_value: T) -> Result<Solution<T>, IncompleteStateError> {
        if !self.is_complete() {
            return Err(IncompleteStateError {
                assigned: self.num_assigned_rides,
                total: self.num_rides(),
            });
        }

        Ok(Solution::new(
            objective_value,
            self.ride_cars.clone(),
            self.car_loads.clone(),
        ))
    }
}

impl<T> std::fmt::Display for SearchState<T>
where
    T: PrimInt + Signed + std::fmt::Display,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "SearchState(assigned: {}/{}, used_cars: {}/{}, remaining: {})",
            self.num_assigned_rides,
            self.num_rides(),
            self.num_used_cars,
            self.num_cars(),
            self.remaining_duration
        )
    }
}

/// Error returned when converting an incomplete state into a solution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IncompleteStateError {
    pub assigned: usize,
    pub total: usize,
}

impl std::fmt::Display for IncompleteStateError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "search state is incomplete: {} of {} rides assigned",
            self.assigned, self.total
        )
    }
}

impl std::error::Error for IncompleteStateError {}

impl<T> TryFrom<&SearchState<T>> for Solution<T>
where
    T: PrimInt + Signed,
{
    type Error = IncompleteStateError;

    fn try_from(state: &SearchState<T>) -> Result<Self, Self::Error> {
        state.to_solution(state.current_spread())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model() -> Model<i64> {
        // 0 and 1 overlap, 2 follows both
        Model::from_rides([(0, 10), (5, 15), (20, 25)]).unwrap()
    }

    #[test]
    fn test_root_state() {
        let m = model();
        let s = SearchState::new(&m, 2);
        assert_eq!(s.num_cars(), 2);
        assert_eq!(s.num_rides(), 3);
        assert_eq!(s.num_used_cars(), 0);
        assert_eq!(s.remaining_duration(), 25);
        assert!(!s.is_complete());
        assert_eq!(s.open_cars().collect::<Vec<_>>(), vec![CarIndex::new(0)]);
        assert_eq!(s.unassigned_rides().count(), 3);
    }

    #[test]
    fn test_assign_and_unassign_restore_state() {
        let m = model();
        let mut s = SearchState::new(&m, 2);
        s.assign_ride(RideIndex::new(0), CarIndex::new(0), 10);

        assert_eq!(s.num_used_cars(), 1);
        assert_eq!(s.car_load(CarIndex::new(0)), 10);
        assert_eq!(s.remaining_duration(), 15);
        assert_eq!(s.car_for_ride(RideIndex::new(0)), Some(CarIndex::new(0)));
        assert!(!s.fits(&m, RideIndex::new(1), CarIndex::new(0)));
        assert!(s.fits(&m, RideIndex::new(2), CarIndex::new(0)));
        assert_eq!(s.num_feasible_cars(&m, RideIndex::new(1)), 1);

        s.unassign_ride(RideIndex::new(0), CarIndex::new(0), 10, 0);
        assert_eq!(s.num_used_cars(), 0);
        assert_eq!(s.car_load(CarIndex::new(0)), 0);
        assert_eq!(s.remaining_duration(), 25);
        assert_eq!(s.car_for_ride(RideIndex::new(0)), None);
        assert!(s.car_members(CarIndex::new(0)).is_clear());
    }

    #[test]
    fn test_open_cars_is_capped_by_num_cars() {
        let m = model();
        let mut s = SearchState::new(&m, 2);
        s.assign_ride(RideIndex::new(0), CarIndex::new(0), 10);
        s.assign_ride(RideIndex::new(1), CarIndex::new(1), 10);
        assert_eq!(s.open_cars().count(), 2);
    }

    #[test]
    fn test_conversion_to_solution() {
        let m = model();
        let mut s = SearchState::new(&m, 2);
        s.assign_ride(RideIndex::new(0), CarIndex::new(0), 10);
        assert!(Solution::try_from(&s).is_err());

        s.assign_ride(RideIndex::new(1), CarIndex::new(1), 10);
        s.assign_ride(RideIndex::new(2), CarIndex::new(0), 5);
        let solution = Solution::try_from(&s).unwrap();
        assert_eq!(solution.car_durations(), &[15, 10]);
        assert_eq!(solution.objective_value(), 5);
        assert!(solution.validate(&m).is_ok());
    }

    #[test]
    fn test_load_extremes() {
        let m = model();
        let mut s = SearchState::new(&m, 3);
        assert_eq!(s.load_extremes(), (0, 0));
        s.assign_ride(RideIndex::new(0), CarIndex::new(0), 10);
        s.assign_ride(RideIndex::new(1), CarIndex::new(1), 10);
        assert_eq!(s.load_extremes(), (10, 0));
        assert_eq!(s.current_spread(), 10);
    }
}
