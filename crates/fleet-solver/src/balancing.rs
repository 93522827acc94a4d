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

//! Phase 2: balancing the car durations.
//!
//! The three branching strategies of `fleet_bnb` run as a portfolio over the
//! same model and car count and share one incumbent. Each prunes with the
//! spread bound, so whichever strategy finishes its tree first proves the
//! optimum for all of them.
//!
//! A warm start (typically the phase 1 witness) seeds the incumbent. With a
//! warm start the phase can never end without a solution: when the budget
//! runs out, the best assignment known so far is returned as feasible.

use fleet_bnb::{
    branching::{
        chronological::ChronologicalBuilder, constrained::MostConstrainedBuilder,
        longest::LongestRideFirstBuilder,
    },
    eval::spread::SpreadEvaluator,
    portfolio::BnbPortfolioSolver,
};
use fleet_model::{model::Model, solution::Solution};
use fleet_search::{
    num::SolverNumeric, result::SolverOutcome, stats::SolverStatisticsBuilder,
};
use log::{debug, warn};
use std::time::Duration;

use crate::solver::SolverBuilder;

/// Finds a conflict-free assignment of the rides of `model` to `num_cars`
/// cars that minimises the spread of the car durations.
///
/// `time_budget` of `None` searches until optimality is proven. A
/// `warm_start` that does not fit `model` and `num_cars` is ignored.
pub fn solve_balanced_assignment<T>(
    model: &Model<T>,
    num_cars: usize,
    time_budget: Option<Duration>,
    warm_start: Option<Solution<T>>,
) -> SolverOutcome<T>
where
    T: SolverNumeric,
{
    if num_cars < model.stabbing_number() {
        debug!(
            "{} cars cannot serve {} overlapping rides",
            num_cars,
            model.stabbing_number()
        );
        return SolverOutcome::infeasible(SolverStatisticsBuilder::new().build());
    }

    let num_rides = model.num_rides();
    let mut builder = SolverBuilder::<T>::new()
        .add_solver(BnbPortfolioSolver::preallocated(
            num_rides,
            num_cars,
            MostConstrainedBuilder::preallocated(num_cars),
            SpreadEvaluator::new(),
        ))
        .add_solver(BnbPortfolioSolver::preallocated(
            num_rides,
            num_cars,
            LongestRideFirstBuilder::preallocated(num_rides, num_cars),
            SpreadEvaluator::new(),
        ))
        .add_solver(BnbPortfolioSolver::preallocated(
            num_rides,
            num_cars,
            ChronologicalBuilder::preallocated(num_cars),
            SpreadEvaluator::new(),
        ));

    if let Some(limit) = time_budget {
        builder = builder.with_time_limit(limit);
    }

    if let Some(solution) = warm_start {
        match as_balancing_seed(model, num_cars, solution) {
            Some(seed) => {
                debug!("balancing warm start with spread {}", seed.objective_value());
                builder = builder.with_initial_solution(seed);
            }
            None => warn!("ignoring a warm start that does not fit {} cars", num_cars),
        }
    }

    builder.build().solve(model, num_cars)
}

/// Recomputes the car durations of `solution` for `num_cars` cars. Returns
/// `None` if it is not a valid assignment for `model` with that many cars.
fn as_balancing_seed<T>(
    model: &Model<T>,
    num_cars: usize,
    solution: Solution<T>,
) -> Option<Solution<T>>
where
    T: SolverNumeric,
{
    if solution.num_rides() != model.num_rides()
        || solution.cars().iter().any(|car| car.get() >= num_cars)
    {
        return None;
    }

    let seed = Solution::from_assignment(model, num_cars, solution.cars().to_vec());
    seed.validate(model).ok().map(|_| seed)
}
