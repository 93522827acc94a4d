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

//! Randomised checks of the assignment pipeline against independent
//! reference computations.

use fleet_model::{generate::RideGenerator, model::Model};
use fleet_search::result::SolveStatus;
use fleet_solver::{
    balancing::solve_balanced_assignment, feasibility::solve_minimum_cars, pipeline::Pipeline,
};
use rand::{rngs::StdRng, Rng, SeedableRng};
use std::time::Duration;

type Ride = (i64, i64);

fn random_rides(rng: &mut StdRng, num_rides: usize, horizon: i64) -> Vec<Ride> {
    RideGenerator::new(num_rides)
        .durations(5, 60)
        .horizon(horizon)
        .generate(rng)
        .unwrap()
}

/// Maximum number of rides active at one instant. Ends are processed before
/// starts at the same instant.
fn sweep_max_overlap(rides: &[Ride]) -> usize {
    let mut events: Vec<(i64, i32)> = rides
        .iter()
        .flat_map(|&(start, end)| [(start, 1), (end, -1)])
        .collect();
    events.sort_unstable();

    let mut active = 0i32;
    let mut peak = 0i32;
    for (_, delta) in events {
        active += delta;
        peak = peak.max(active);
    }
    peak as usize
}

fn overlap(a: Ride, b: Ride) -> bool {
    !(a.1 <= b.0 || b.1 <= a.0)
}

fn assert_conflict_free(rides: &[Ride], cars: &[usize]) {
    for i in 0..rides.len() {
        for j in (i + 1)..rides.len() {
            if overlap(rides[i], rides[j]) {
                assert_ne!(
                    cars[i], cars[j],
                    "rides {:?} and {:?} overlap but share car {}",
                    rides[i], rides[j], cars[i]
                );
            }
        }
    }
}

/// Minimum spread over all assignments of `rides` to exactly `num_cars` cars.
/// Empty cars count with duration zero.
fn exhaustive_min_spread(rides: &[Ride], num_cars: usize) -> Option<i64> {
    fn recurse(
        rides: &[Ride],
        index: usize,
        cars: &mut Vec<usize>,
        loads: &mut Vec<i64>,
        best: &mut Option<i64>,
    ) {
        if index == rides.len() {
            let spread = loads.iter().max().unwrap() - loads.iter().min().unwrap();
            if best.map_or(true, |b| spread < b) {
                *best = Some(spread);
            }
            return;
        }
        for car in 0..loads.len() {
            let clashes = (0..index).any(|j| cars[j] == car && overlap(rides[j], rides[index]));
            if clashes {
                continue;
            }
            cars.push(car);
            loads[car] += rides[index].1 - rides[index].0;
            recurse(rides, index + 1, cars, loads, best);
            loads[car] -= rides[index].1 - rides[index].0;
            cars.pop();
        }
    }

    let mut best = None;
    recurse(
        rides,
        0,
        &mut Vec::with_capacity(rides.len()),
        &mut vec![0; num_cars],
        &mut best,
    );
    best
}

#[test]
fn test_num_cars_equals_independent_sweep() {
    let mut rng = StdRng::seed_from_u64(1);
    for _ in 0..200 {
        let num_rides = rng.gen_range(1..=60);
        let rides = random_rides(&mut rng, num_rides, 300);
        let model = Model::from_rides(rides.iter().copied()).unwrap();

        let outcome = solve_minimum_cars(&model, None);
        assert_eq!(outcome.status(), SolveStatus::Optimal);
        let solution = outcome.solution().unwrap();
        assert_eq!(solution.num_cars(), sweep_max_overlap(&rides));

        let cars: Vec<usize> = solution.cars().iter().map(|c| c.get()).collect();
        assert_conflict_free(&rides, &cars);
    }
}

#[test]
fn test_adding_a_ride_never_decreases_num_cars() {
    let mut rng = StdRng::seed_from_u64(2);
    for _ in 0..100 {
        let num_rides = rng.gen_range(1..=30);
        let mut rides = random_rides(&mut rng, num_rides, 200);
        let model = Model::from_rides(rides.iter().copied()).unwrap();
        let before = solve_minimum_cars(&model, None)
            .solution()
            .unwrap()
            .num_cars();

        rides.extend(random_rides(&mut rng, 1, 200));
        let model = Model::from_rides(rides.iter().copied()).unwrap();
        let after = solve_minimum_cars(&model, None)
            .solution()
            .unwrap()
            .num_cars();

        assert!(after >= before, "{} cars before, {} after", before, after);
    }
}

#[test]
fn test_balanced_assignments_are_valid_and_optimal() {
    let mut rng = StdRng::seed_from_u64(3);
    for _ in 0..40 {
        let num_rides = rng.gen_range(1..=8);
        let rides = random_rides(&mut rng, num_rides, 120);
        let result = Pipeline::new().run(rides.iter().copied()).unwrap();

        assert_eq!(result.num_cars(), sweep_max_overlap(&rides));
        assert_conflict_free(&rides, &result.assignment());

        let total: i64 = rides.iter().map(|&(s, e)| e - s).sum();
        assert_eq!(result.car_durations().iter().sum::<i64>(), total);
        assert_eq!(result.car_durations().len(), result.num_cars());

        assert_eq!(result.balancing_status(), SolveStatus::Optimal);
        assert_eq!(
            Some(result.spread()),
            exhaustive_min_spread(&rides, result.num_cars()),
            "rides: {:?}",
            rides
        );
    }
}

#[test]
fn test_rerunning_gives_the_same_objectives() {
    let mut rng = StdRng::seed_from_u64(4);
    for _ in 0..10 {
        let rides = random_rides(&mut rng, 10, 150);
        let first = Pipeline::new().run(rides.iter().copied()).unwrap();
        let second = Pipeline::new().run(rides.iter().copied()).unwrap();
        assert_eq!(first.num_cars(), second.num_cars());
        assert_eq!(first.spread(), second.spread());
    }
}

#[test]
fn test_time_limited_results_stay_valid() {
    let mut rng = StdRng::seed_from_u64(5);
    for _ in 0..5 {
        let rides = random_rides(&mut rng, 40, 240);
        let model = Model::from_rides(rides.iter().copied()).unwrap();
        let result = Pipeline::new()
            .with_time_limit(Duration::from_millis(20))
            .run_model(&model)
            .unwrap();

        assert!(result.balancing_status().has_solution());
        assert_conflict_free(&rides, &result.assignment());
        assert!(result.solution().validate(&model).is_ok());
        let total: i64 = rides.iter().map(|&(s, e)| e - s).sum();
        assert_eq!(result.car_durations().iter().sum::<i64>(), total);
    }
}

#[test]
fn test_spare_car_is_balanced_optimally() {
    let mut rng = StdRng::seed_from_u64(6);
    for _ in 0..10 {
        let rides = random_rides(&mut rng, 7, 100);
        let model = Model::from_rides(rides.iter().copied()).unwrap();
        let num_cars = model.stabbing_number() + 1;

        let outcome = solve_balanced_assignment(&model, num_cars, None, None);
        assert_eq!(outcome.status(), SolveStatus::Optimal);
        let solution = outcome.solution().unwrap();
        assert_eq!(solution.num_cars(), num_cars);
        assert_eq!(
            Some(solution.spread()),
            exhaustive_min_spread(&rides, num_cars)
        );
    }
}

#[test]
fn test_too_few_cars_is_no_solution() {
    let rides = [(0i64, 10), (2, 8), (4, 6)];
    let model = Model::from_rides(rides).unwrap();
    let outcome = solve_balanced_assignment(&model, 2, None, None);
    assert_eq!(outcome.status(), SolveStatus::NoSolution);
}
