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

//! Phase 1: the minimum number of cars.
//!
//! Rides are taken in start order and each one goes to the car that became
//! free the earliest, if that car is free by the ride's start; otherwise a new
//! car is opened. A min-heap of car release times makes this O(N log N). The
//! number of cars opened equals the stabbing number of the ride set, which is
//! a lower bound for every conflict-free assignment, so the result is always
//! optimal.
//!
//! The sweep never needs the time budget in practice. It still honours it:
//! if the budget runs out mid-sweep, the one-car-per-ride assignment is
//! returned as a feasible, unproven answer.

use fleet_model::{index::CarIndex, model::Model, solution::Solution};
use fleet_search::{
    num::SolverNumeric,
    result::SolverOutcome,
    stats::{SolverStatistics, SolverStatisticsBuilder},
};
use log::{debug, warn};
use std::{cmp::Reverse, collections::BinaryHeap, time::Duration};

/// Rides between two clock reads.
const CLOCK_CHECK_MASK: usize = 1023;

/// Computes the smallest number of cars that can serve every ride of `model`
/// without overlap, together with a witness assignment.
///
/// The number of cars is `solution.num_cars()` of the returned solution.
/// `time_budget` of `None` means unbounded.
pub fn solve_minimum_cars<T>(model: &Model<T>, time_budget: Option<Duration>) -> SolverOutcome<T>
where
    T: SolverNumeric,
{
    let start_time = std::time::Instant::now();
    let num_rides = model.num_rides();

    let mut cars = vec![CarIndex::new(0); num_rides];
    let mut release_times: BinaryHeap<Reverse<(T, usize)>> = BinaryHeap::new();
    let mut num_cars = 0usize;

    for (processed, &ride_index) in model.rides_by_start().iter().enumerate() {
        if let Some(budget) = time_budget {
            if (processed & CLOCK_CHECK_MASK) == 0 && start_time.elapsed() >= budget {
                warn!(
                    "feasibility sweep hit its time budget after {} of {} rides",
                    processed, num_rides
                );
                return one_car_per_ride(model, statistics(start_time, processed as u64));
            }
        }

        let ride = model.ride(ride_index);
        let car = match release_times.peek() {
            Some(&Reverse((release, car))) if release <= ride.start() => {
                release_times.pop();
                car
            }
            _ => {
                num_cars += 1;
                num_cars - 1
            }
        };

        cars[ride_index.get()] = CarIndex::new(car);
        release_times.push(Reverse((ride.end(), car)));
    }

    debug_assert_eq!(
        num_cars,
        model.stabbing_number(),
        "the sweep must open exactly as many cars as rides overlap at the busiest instant"
    );
    debug!("feasibility sweep: {} rides need {} cars", num_rides, num_cars);

    let solution = Solution::from_assignment(model, num_cars, cars);
    SolverOutcome::optimal(solution, statistics(start_time, num_rides as u64))
}

/// The trivial assignment: every ride gets its own car.
fn one_car_per_ride<T>(model: &Model<T>, statistics: SolverStatistics) -> SolverOutcome<T>
where
    T: SolverNumeric,
{
    let num_rides = model.num_rides();
    let cars = (0..num_rides).map(CarIndex::new).collect();
    let solution = Solution::from_assignment(model, num_rides, cars);
    SolverOutcome::aborted(Some(solution), "time limit reached", statistics)
}

fn statistics(start_time: std::time::Instant, rides_processed: u64) -> SolverStatistics {
    SolverStatisticsBuilder::new()
        .solutions_found(1)
        .nodes_explored(rides_processed)
        .used_threads(1)
        .solve_duration(start_time.elapsed())
        .build()
}
