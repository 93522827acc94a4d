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

use crate::{
    index::{CarIndex, RideIndex},
    model::Model,
};
use num_traits::{PrimInt, Signed};
use std::fmt::Display;

/// Returns `max - min` over `durations`, or zero if there are none.
#[inline]
pub fn spread<T>(durations: &[T]) -> T
where
    T: PrimInt,
{
    match (durations.iter().max(), durations.iter().min()) {
        (Some(&max), Some(&min)) => max - min,
        _ => T::zero(),
    }
}

/// A ride to car assignment.
///
/// `cars[r]` is the car serving ride `r`, and `car_durations[c]` is the total
/// busy time of car `c`. The objective value is the spread of the car
/// durations, i.e. busiest minus idlest car.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Solution<T> {
    objective_value: T,
    cars: Vec<CarIndex>,
    car_durations: Vec<T>,
}

/// The ways a [`Solution`] can disagree with a [`Model`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SolutionError<T> {
    #[error("solution assigns {actual} rides but the model has {expected}")]
    RideCountMismatch { expected: usize, actual: usize },
    #[error("{first} and {second} overlap but are both served by {car}")]
    Conflict {
        first: RideIndex,
        second: RideIndex,
        car: CarIndex,
    },
    #[error("{car} reports a busy time of {actual} but its rides sum to {expected}")]
    DurationMismatch {
        car: CarIndex,
        expected: T,
        actual: T,
    },
    #[error("objective value {actual} differs from the spread {expected}")]
    ObjectiveMismatch { expected: T, actual: T },
}

impl<T> Solution<T>
where
    T: PrimInt + Signed,
{
    /// Constructs a new `Solution`.
    ///
    /// # Panics
    ///
    /// Panics if a ride is assigned to a car without a duration entry.
    pub fn new(objective_value: T, cars: Vec<CarIndex>, car_durations: Vec<T>) -> Self {
        assert!(
            cars.iter().all(|c| c.get() < car_durations.len()),
            "called Solution::new with a car index out of range: car_durations.len() = {}",
            car_durations.len()
        );

        Self {
            objective_value,
            cars,
            car_durations,
        }
    }

    /// Builds a solution from a per-ride car assignment, deriving the busy
    /// time of each of the `num_cars` cars and the spread.
    ///
    /// # Panics
    ///
    /// Panics if `cars` does not cover every ride of `model` or names a car
    /// outside `0..num_cars`.
    pub fn from_assignment(model: &Model<T>, num_cars: usize, cars: Vec<CarIndex>) -> Self {
        assert_eq!(
            cars.len(),
            model.num_rides(),
            "called Solution::from_assignment with {} cars for {} rides",
            cars.len(),
            model.num_rides()
        );

        let mut car_durations = vec![T::zero(); num_cars];
        for (car, &duration) in cars.iter().zip(model.ride_durations()) {
            car_durations[car.get()] = car_durations[car.get()] + duration;
        }

        Self::new(spread(&car_durations), cars, car_durations)
    }

    /// Returns the car serving `ride_index`.
    ///
    /// # Panics
    ///
    /// Panics if `ride_index` is out of bounds.
    #[inline]
    pub fn car_for_ride(&self, ride_index: RideIndex) -> CarIndex {
        let index = ride_index.get();
        debug_assert!(
            index < self.num_rides(),
            "called `Solution::car_for_ride` with ride index out of bounds: the len is {} but the index is {}",
            self.num_rides(),
            index
        );
        self.cars[index]
    }

    /// Returns the total busy time of `car_index`.
    #[inline]
    pub fn car_duration(&self, car_index: CarIndex) -> T {
        let index = car_index.get();
        debug_assert!(
            index < self.num_cars(),
            "called `Solution::car_duration` with car index out of bounds: the len is {} but the index is {}",
            self.num_cars(),
            index
        );
        self.car_durations[index]
    }

    #[inline]
    pub fn num_rides(&self) -> usize {
        self.cars.len()
    }

    #[inline]
    pub fn num_cars(&self) -> usize {
        self.car_durations.len()
    }

    /// Returns the objective value, the spread for balanced assignments.
    #[inline]
    pub fn objective_value(&self) -> T {
        self.objective_value
    }

    #[inline]
    pub fn cars(&self) -> &[CarIndex] {
        &self.cars
    }

    #[inline]
    pub fn car_durations(&self) -> &[T] {
        &self.car_durations
    }

    /// Returns busiest minus idlest car, recomputed from the durations.
    #[inline]
    pub fn spread(&self) -> T {
        spread(&self.car_durations)
    }

    /// Iterates over the rides served by `car_index` in input order.
    pub fn rides_on_car(&self, car_index: CarIndex) -> impl Iterator<Item = RideIndex> + '_ {
        self.cars
            .iter()
            .enumerate()
            .filter(move |(_, &c)| c == car_index)
            .map(|(r, _)| RideIndex::new(r))
    }

    /// Checks the solution against `model`: every ride assigned, no two
    /// overlapping rides on one car, car durations and objective consistent.
    pub fn validate(&self, model: &Model<T>) -> Result<(), SolutionError<T>> {
        if self.num_rides() != model.num_rides() {
            return Err(SolutionError::RideCountMismatch {
                expected: model.num_rides(),
                actual: self.num_rides(),
            });
        }

        if let Some((first, second)) = model.conflicts().find_violation(&self.cars) {
            return Err(SolutionError::Conflict {
                first,
                second,
                car: self.cars[first.get()],
            });
        }

        let mut expected = vec![T::zero(); self.num_cars()];
        for (car, &duration) in self.cars.iter().zip(model.ride_durations()) {
            expected[car.get()] = expected[car.get()] + duration;
        }
        for (car, (&exp, &actual)) in expected.iter().zip(&self.car_durations).enumerate() {
            if exp != actual {
                return Err(SolutionError::DurationMismatch {
                    car: CarIndex::new(car),
                    expected: exp,
                    actual,
                });
            }
        }

        let spread = self.spread();
        if spread != self.objective_value {
            return Err(SolutionError::ObjectiveMismatch {
                expected: spread,
                actual: self.objective_value,
            });
        }

        Ok(())
    }
}

impl<T> std::fmt::Display for Solution<T>
where
    T: PrimInt + Signed + Display,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Solution Summary")?;
        writeln!(f, "   Objective Value: {}", self.objective_value)?;
        writeln!(f, "   Cars: {}", self.num_cars())?;
        writeln!(f)?;

        if self.num_cars() == 0 {
            writeln!(f, "   (No cars in use)")?;
            return Ok(());
        }

        writeln!(f, "   {:<10} | {:<10} | {:<12}", "Car", "Rides", "Busy Time")?;
        writeln!(f, "   {:-<10}-+-{:-<10}-+-{:-<12}", "", "", "")?;
        for (car, duration) in self.car_durations.iter().enumerate() {
            let rides = self.cars.iter().filter(|c| c.get() == car).count();
            writeln!(f, "   {:<10} | {:<10} | {:<12}", car, rides, duration)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ci(i: usize) -> CarIndex {
        CarIndex::new(i)
    }

    fn ri(i: usize) -> RideIndex {
        RideIndex::new(i)
    }

    #[test]
    fn test_from_assignment_derives_durations_and_spread() {
        let model = Model::<i64>::from_rides([(0, 10), (5, 15), (10, 30)]).unwrap();
        let sol = Solution::from_assignment(&model, 2, vec![ci(0), ci(1), ci(0)]);
        assert_eq!(sol.car_durations(), &[30, 10]);
        assert_eq!(sol.objective_value(), 20);
        assert_eq!(sol.spread(), 20);
        assert_eq!(sol.num_cars(), 2);
        assert_eq!(sol.num_rides(), 3);
        assert_eq!(sol.car_for_ride(ri(2)), ci(0));
        assert_eq!(sol.car_duration(ci(1)), 10);
        assert!(sol.validate(&model).is_ok());
    }

    #[test]
    fn test_rides_on_car() {
        let model = Model::<i64>::from_rides([(0, 10), (5, 15), (10, 30)]).unwrap();
        let sol = Solution::from_assignment(&model, 2, vec![ci(0), ci(1), ci(0)]);
        let rides: Vec<_> = sol.rides_on_car(ci(0)).collect();
        assert_eq!(rides, vec![ri(0), ri(2)]);
    }

    #[test]
    fn test_empty_car_counts_towards_spread() {
        let model = Model::<i64>::from_rides([(0, 10)]).unwrap();
        let sol = Solution::from_assignment(&model, 2, vec![ci(0)]);
        assert_eq!(sol.car_durations(), &[10, 0]);
        assert_eq!(sol.objective_value(), 10);
    }

    #[test]
    fn test_validate_detects_conflict() {
        let model = Model::<i64>::from_rides([(0, 10), (5, 15)]).unwrap();
        let sol = Solution::from_assignment(&model, 1, vec![ci(0), ci(0)]);
        assert_eq!(
            sol.validate(&model),
            Err(SolutionError::Conflict {
                first: ri(0),
                second: ri(1),
                car: ci(0)
            })
        );
    }

    #[test]
    fn test_validate_detects_bad_durations_and_objective() {
        let model = Model::<i64>::from_rides([(0, 10), (10, 20)]).unwrap();

        let sol = Solution::new(0, vec![ci(0), ci(0)], vec![15]);
        assert!(matches!(
            sol.validate(&model),
            Err(SolutionError::DurationMismatch { expected: 20, actual: 15, .. })
        ));

        let sol = Solution::new(3, vec![ci(0), ci(0)], vec![20]);
        assert_eq!(
            sol.validate(&model),
            Err(SolutionError::ObjectiveMismatch {
                expected: 0,
                actual: 3
            })
        );

        let sol = Solution::new(0, vec![ci(0)], vec![10]);
        assert!(matches!(
            sol.validate(&model),
            Err(SolutionError::RideCountMismatch { expected: 2, actual: 1 })
        ));
    }

    #[test]
    #[should_panic(expected = "called Solution::new with a car index out of range")]
    fn test_new_panics_on_unknown_car() {
        let _ = Solution::new(0i64, vec![ci(0), ci(2)], vec![1, 1]);
    }

    #[test]
    fn test_spread_helper() {
        assert_eq!(spread::<i64>(&[]), 0);
        assert_eq!(spread(&[4i64, 9, 6]), 5);
    }

    #[test]
    fn test_display_formatting_example() {
        let sol = Solution::new(5i64, vec![ci(0), ci(1), ci(1)], vec![20, 15]);
        let mut expected = String::new();
        expected.push_str("Solution Summary\n");
        expected.push_str("   Objective Value: 5\n");
        expected.push_str("   Cars: 2\n");
        expected.push('\n');
        expected.push_str("   Car        | Rides      | Busy Time   \n");
        expected.push_str("   -----------+------------+-------------\n");
        expected.push_str("   0          | 1          | 20          \n");
        expected.push_str("   1          | 2          | 15          \n");
        assert_eq!(format!("{}", sol), expected);
    }
}
