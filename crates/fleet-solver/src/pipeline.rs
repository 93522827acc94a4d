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

//! # Two-Phase Assignment Pipeline
//!
//! Validates the rides, finds the minimum number of cars and then balances
//! the car durations at that number. The overall time budget is split
//! between the phases by `phase_split`; the balancing phase receives
//! whatever the feasibility phase left unused.
//!
//! Both phases report a [`SolveStatus`]. A `Feasible` status is a usable,
//! valid result that is merely not proven optimal. Only a phase that ends
//! without any assignment fails the pipeline.

use crate::{
    balancing::solve_balanced_assignment,
    config::PipelineConfig,
    error::{AssignError, Phase},
    feasibility::solve_minimum_cars,
};
use fleet_model::{model::Model, solution::Solution};
use fleet_search::{num::SolverNumeric, result::SolveStatus};
use log::{debug, info};
use std::time::{Duration, Instant};

/// The share of the time budget given to the feasibility phase by default.
pub const DEFAULT_PHASE_SPLIT: f64 = 0.3;

/// The output of a successful pipeline run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RideAssignment<T> {
    solution: Solution<T>,
    feasibility_status: SolveStatus,
    balancing_status: SolveStatus,
}

impl<T> RideAssignment<T>
where
    T: SolverNumeric,
{
    /// The number of cars used.
    #[inline]
    pub fn num_cars(&self) -> usize {
        self.solution.num_cars()
    }

    /// The car of every ride, aligned with the input order.
    pub fn assignment(&self) -> Vec<usize> {
        self.solution.cars().iter().map(|car| car.get()).collect()
    }

    /// The total busy time of every car, indexed by car.
    #[inline]
    pub fn car_durations(&self) -> &[T] {
        self.solution.car_durations()
    }

    #[inline]
    pub fn spread(&self) -> T {
        self.solution.spread()
    }

    /// Whether the number of cars is proven minimal.
    #[inline]
    pub fn feasibility_status(&self) -> SolveStatus {
        self.feasibility_status
    }

    /// Whether the spread is proven minimal for that number of cars.
    #[inline]
    pub fn balancing_status(&self) -> SolveStatus {
        self.balancing_status
    }

    #[inline]
    pub fn is_proven_optimal(&self) -> bool {
        self.feasibility_status == SolveStatus::Optimal
            && self.balancing_status == SolveStatus::Optimal
    }

    #[inline]
    pub fn solution(&self) -> &Solution<T> {
        &self.solution
    }

    #[inline]
    pub fn into_solution(self) -> Solution<T> {
        self.solution
    }
}

impl<T> std::fmt::Display for RideAssignment<T>
where
    T: SolverNumeric,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "RideAssignment(cars: {} [{}], spread: {} [{}])",
            self.num_cars(),
            self.feasibility_status,
            self.spread(),
            self.balancing_status
        )
    }
}

/// Runs both phases with a shared time budget.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pipeline {
    time_limit: Option<Duration>,
    phase_split: f64,
    warm_start: bool,
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new()
    }
}

impl Pipeline {
    /// A pipeline without a time limit: both phases run to optimality.
    #[inline]
    pub fn new() -> Self {
        Self {
            time_limit: None,
            phase_split: DEFAULT_PHASE_SPLIT,
            warm_start: true,
        }
    }

    #[inline]
    pub fn from_config(config: &PipelineConfig) -> Self {
        Self::new()
            .with_time_limit(config.time_limit())
            .with_phase_split(config.phase_split)
            .with_warm_start(config.warm_start)
    }

    #[inline]
    pub fn with_time_limit(mut self, time_limit: Duration) -> Self {
        self.time_limit = Some(time_limit);
        self
    }

    /// # Panics
    ///
    /// Panics if `phase_split` is not strictly between 0 and 1.
    #[inline]
    pub fn with_phase_split(mut self, phase_split: f64) -> Self {
        assert!(
            phase_split > 0.0 && phase_split < 1.0,
            "called `Pipeline::with_phase_split` with {}, expected a value in (0, 1)",
            phase_split
        );
        self.phase_split = phase_split;
        self
    }

    #[inline]
    pub fn with_warm_start(mut self, warm_start: bool) -> Self {
        self.warm_start = warm_start;
        self
    }

    #[inline]
    pub fn time_limit(&self) -> Option<Duration> {
        self.time_limit
    }

    #[inline]
    pub fn phase_split(&self) -> f64 {
        self.phase_split
    }

    /// Validates `rides` and assigns them to cars.
    pub fn run<T, I>(&self, rides: I) -> Result<RideAssignment<T>, AssignError>
    where
        T: SolverNumeric,
        I: IntoIterator<Item = (T, T)>,
    {
        let model = Model::from_rides(rides)?;
        self.run_model(&model)
    }

    /// Assigns the rides of an already validated model to cars.
    pub fn run_model<T>(&self, model: &Model<T>) -> Result<RideAssignment<T>, AssignError>
    where
        T: SolverNumeric,
    {
        let start_time = Instant::now();
        let feasibility_budget = self
            .time_limit
            .map(|limit| limit.mul_f64(self.phase_split));

        let feasibility = solve_minimum_cars(model, feasibility_budget);
        let feasibility_status = feasibility.status();
        let witness = feasibility
            .result
            .into_solution()
            .ok_or(AssignError::SearchTimeoutNoSolution {
                phase: Phase::Feasibility,
            })?;
        let num_cars = witness.num_cars();
        info!(
            "feasibility: {} rides need {} cars ({})",
            model.num_rides(),
            num_cars,
            feasibility_status
        );

        let balancing_budget = self
            .time_limit
            .map(|limit| limit.saturating_sub(start_time.elapsed()));
        debug!("balancing budget: {:?}", balancing_budget);

        let seed = self.warm_start.then_some(witness);
        let balancing = solve_balanced_assignment(model, num_cars, balancing_budget, seed);
        let balancing_status = balancing.status();
        let solution = balancing
            .result
            .into_solution()
            .ok_or(AssignError::SearchTimeoutNoSolution {
                phase: Phase::Balancing,
            })?;
        info!(
            "balancing: spread {} over {} cars ({}, {} nodes)",
            solution.spread(),
            num_cars,
            balancing_status,
            balancing.statistics.nodes_explored
        );

        Ok(RideAssignment {
            solution,
            feasibility_status,
            balancing_status,
        })
    }
}

/// Assigns `rides` to the fewest cars and balances their durations, using the
/// time budget and phase split of `config`.
pub fn assign_rides<T, I>(rides: I, config: &PipelineConfig) -> Result<RideAssignment<T>, AssignError>
where
    T: SolverNumeric,
    I: IntoIterator<Item = (T, T)>,
{
    Pipeline::from_config(config).run(rides)
}

#[cfg(test)]
mod tests {
    use super::*;

    type I = i64;

    #[test]
    fn test_sequential_rides_share_one_car() {
        let result = Pipeline::new().run::<I, _>([(0, 10), (10, 20)]).unwrap();
        assert_eq!(result.num_cars(), 1);
        assert_eq!(result.assignment(), vec![0, 0]);
        assert_eq!(result.car_durations(), &[20]);
        assert_eq!(result.spread(), 0);
        assert!(result.is_proven_optimal());
    }

    #[test]
    fn test_overlapping_rides_are_balanced() {
        let result = Pipeline::new().run::<I, _>([(0, 10), (5, 15)]).unwrap();
        assert_eq!(result.num_cars(), 2);
        assert_eq!(result.car_durations().iter().sum::<I>(), 20);
        assert_eq!(result.spread(), 0);
        assert_ne!(result.assignment()[0], result.assignment()[1]);
    }

    #[test]
    fn test_invalid_ride_is_rejected() {
        let err = Pipeline::new().run::<I, _>([(10, 5)]).unwrap_err();
        assert!(matches!(err, AssignError::InvalidTask(_)));

        let err = Pipeline::new()
            .run::<I, _>(std::iter::empty())
            .unwrap_err();
        assert!(matches!(err, AssignError::InvalidTask(_)));
    }

    #[test]
    fn test_time_limited_run_still_returns_a_valid_assignment() {
        let rides: Vec<(I, I)> = (0..12).map(|i| (i * 7 % 50, i * 7 % 50 + 20 + i)).collect();
        let model = Model::from_rides(rides.iter().copied()).unwrap();
        let result = Pipeline::new()
            .with_time_limit(Duration::from_millis(50))
            .run(rides)
            .unwrap();
        assert!(result.solution().validate(&model).is_ok());
        assert!(result.balancing_status().has_solution());
    }

    #[test]
    fn test_balancing_without_time_or_warm_start_has_no_solution() {
        let err = Pipeline::new()
            .with_time_limit(Duration::ZERO)
            .with_warm_start(false)
            .run::<I, _>([(0, 10), (5, 15), (20, 30)])
            .unwrap_err();
        assert_eq!(
            err,
            AssignError::SearchTimeoutNoSolution {
                phase: Phase::Balancing
            }
        );
    }

    #[test]
    fn test_warm_start_survives_an_exhausted_budget() {
        let rides: [(I, I); 3] = [(0, 10), (5, 15), (20, 30)];
        let model = Model::from_rides(rides).unwrap();
        let result = Pipeline::new()
            .with_time_limit(Duration::ZERO)
            .run_model(&model)
            .unwrap();
        assert_eq!(result.feasibility_status(), SolveStatus::Feasible);
        assert!(result.balancing_status().has_solution());
        assert!(!result.is_proven_optimal());
        assert!(result.solution().validate(&model).is_ok());
    }

    #[test]
    fn test_from_config() {
        let config = PipelineConfig {
            max_running_time_in_seconds: 2.0,
            phase_split: 0.5,
            warm_start: false,
            ..PipelineConfig::default()
        };
        let pipeline = Pipeline::from_config(&config);
        assert_eq!(pipeline.time_limit(), Some(Duration::from_secs(2)));
        assert_eq!(pipeline.phase_split(), 0.5);

        let result = assign_rides::<I, _>([(0, 10), (0, 10), (0, 10)], &config).unwrap();
        assert_eq!(result.num_cars(), 3);
        assert_eq!(result.car_durations(), &[10, 10, 10]);
    }

    #[test]
    #[should_panic(expected = "with_phase_split")]
    fn test_phase_split_out_of_range_panics() {
        let _ = Pipeline::new().with_phase_split(1.5);
    }
}
