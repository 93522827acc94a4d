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

//! Spread objective: busiest car minus idlest car.
//!
//! Let `K` be the number of cars, `T` the total ride duration, `R` the
//! duration not assigned yet and `L_max`/`L_min` the largest and smallest
//! current car load. Loads only grow and always sum to `T` in the end, so
//! every completion satisfies
//!
//! - `max load >= max(L_max, ceil(T / K))`
//! - `min load <= min(L_min + R, floor(T / K))`
//!
//! and the spread is at least the difference of the two, clamped at zero.
//!
//! `lower_bound` also runs a forward check once all cars are open: a ride
//! that overlaps some ride on every car can never be placed.

use crate::{eval::evaluator::ObjectiveEvaluator, state::SearchState};
use fleet_model::{
    index::{CarIndex, RideIndex},
    model::Model,
    solution::spread,
};
use fleet_search::num::SolverNumeric;
use std::marker::PhantomData;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SpreadEvaluator<T> {
    _phantom: PhantomData<T>,
}

impl<T> SpreadEvaluator<T> {
    #[inline]
    pub fn new() -> Self {
        Self {
            _phantom: PhantomData,
        }
    }
}

/// `max(0, max(max_load, ceil(total / k)) - min(min_load + remaining, floor(total / k)))`.
#[inline]
pub fn spread_lower_bound<T>(max_load: T, min_load: T, remaining: T, total: T, k: usize) -> Option<T>
where
    T: SolverNumeric,
{
    if k == 0 {
        return None;
    }
    let k = T::from_usize(k)?;
    let floor = total / k;
    let ceil = if total % k == T::zero() {
        floor
    } else {
        floor + T::one()
    };

    let high = max_load.max(ceil);
    let low = (min_load + remaining).min(floor);
    Some((high - low).max(T::zero()))
}

impl<T> ObjectiveEvaluator<T> for SpreadEvaluator<T>
where
    T: SolverNumeric,
{
    fn name(&self) -> &str {
        "SpreadEvaluator"
    }

    #[inline]
    fn objective(&self, car_loads: &[T]) -> T {
        spread(car_loads)
    }

    fn evaluate_assignment(
        &mut self,
        model: &Model<T>,
        state: &SearchState<T>,
        ride_index: RideIndex,
        car_index: CarIndex,
    ) -> Option<T> {
        let duration = model.ride_duration(ride_index);
        let target = car_index.get();

        let mut max_load = T::min_value();
        let mut min_load = T::max_value();
        for (car, &load) in state.car_loads().iter().enumerate() {
            let load = if car == target { load + duration } else { load };
            max_load = max_load.max(load);
            min_load = min_load.min(load);
        }

        spread_lower_bound(
            max_load,
            min_load,
            state.remaining_duration() - duration,
            model.total_duration(),
            state.num_cars(),
        )
    }

    fn lower_bound(&mut self, model: &Model<T>, state: &SearchState<T>) -> Option<T> {
        if state.num_used_cars() == state.num_cars()
            && state
                .unassigned_rides()
                .any(|ride| state.num_feasible_cars(model, ride) == 0)
        {
            return None;
        }

        let (max_load, min_load) = state.load_extremes();
        spread_lower_bound(
            max_load,
            min_load,
            state.remaining_duration(),
            model.total_duration(),
            state.num_cars(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bound_at_root_is_rounding_gap() {
        // total 25 over 2 cars: max >= 13, min <= 12
        assert_eq!(spread_lower_bound(0i64, 0, 25, 25, 2), Some(1));
        assert_eq!(spread_lower_bound(0i64, 0, 20, 20, 2), Some(0));
        assert_eq!(spread_lower_bound(0i64, 0, 20, 20, 0), None);
    }

    #[test]
    fn test_bound_uses_current_loads() {
        // loads [30, 0], 10 remaining of total 40 over 2 cars
        // max >= 30, min <= min(0 + 10, 20) = 10
        assert_eq!(spread_lower_bound(30i64, 0, 10, 40, 2), Some(20));
    }

    #[test]
    fn test_evaluate_assignment_and_lower_bound() {
        let m = Model::from_rides([(0i64, 10), (5, 15), (20, 30)]).unwrap();
        let mut e = SpreadEvaluator::new();
        let mut s = SearchState::new(&m, 2);

        assert_eq!(e.lower_bound(&m, &s), Some(0));

        // ride 0 on car 0: loads [10, 0], remaining 20, total 30 => max 15, min 15
        assert_eq!(
            e.evaluate_assignment(&m, &s, RideIndex::new(0), CarIndex::new(0)),
            Some(0)
        );

        s.assign_ride(RideIndex::new(0), CarIndex::new(0), 10);
        s.assign_ride(RideIndex::new(2), CarIndex::new(0), 10);
        // loads [20, 0], remaining 10 => max 20, min <= 10
        assert_eq!(e.lower_bound(&m, &s), Some(10));
        assert_eq!(e.objective(&[20, 10]), 10);
    }

    #[test]
    fn test_forward_check_detects_unplaceable_ride() {
        // three mutually overlapping rides cannot go on two cars
        let m = Model::from_rides([(0i64, 10), (0, 10), (0, 10)]).unwrap();
        let mut e = SpreadEvaluator::new();
        let mut s = SearchState::new(&m, 2);
        s.assign_ride(RideIndex::new(0), CarIndex::new(0), 10);
        assert!(e.lower_bound(&m, &s).is_some());
        s.assign_ride(RideIndex::new(1), CarIndex::new(1), 10);
        assert_eq!(e.lower_bound(&m, &s), None);
    }
}
