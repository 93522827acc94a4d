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

//! # Portfolio-Orchestrated Solver
//!
//! Runs several balancing strategies in parallel on the same model and car
//! count, lets them compete through one shared incumbent, and enforces the
//! global limits with per-thread monitors.
//!
//! ## Highlights
//!
//! - Portfolio execution:
//!   - Every `PortfolioSolver<T>` runs in its own thread of a
//!     `std::thread::scope`.
//!   - Each thread gets a `CompositeMonitor<T>` made of an interrupt monitor,
//!     a solution counter and, if configured, a time limit.
//!   - The first member to prove optimality raises the stop flag.
//! - Shared state:
//!   - `SharedIncumbent<T>` holds the best solution (atomic bound + snapshot).
//!   - An optional initial solution seeds the incumbent at every solve.
//! - Outcome construction:
//!   - Optimality beats infeasibility beats an aborted run; an aborted run
//!     that knows a solution reports it as feasible.
//!
//! ## Usage
//!
//! ```rust
//! use fleet_bnb::{
//!     branching::chronological::ChronologicalBuilder, eval::spread::SpreadEvaluator,
//!     portfolio::BnbPortfolioSolver,
//! };
//! use fleet_model::model::Model;
//! use fleet_solver::solver::SolverBuilder;
//!
//! let model = Model::<i64>::from_rides([(0, 10), (5, 15)]).unwrap();
//! let mut solver = SolverBuilder::<i64>::new()
//!     .with_time_limit(std::time::Duration::from_secs(5))
//!     .add_solver(BnbPortfolioSolver::new(
//!         ChronologicalBuilder::new(),
//!         SpreadEvaluator::new(),
//!     ))
//!     .build();
//!
//! let outcome = solver.solve(&model, 2);
//! assert!(outcome.is_optimal());
//! ```

use fleet_model::{model::Model, solution::Solution};
use fleet_search::{
    incumbent::SharedIncumbent,
    monitor::{
        composite::CompositeMonitor, interrupt::InterruptMonitor, solution::SolutionMonitor,
        time_limit::TimeLimitMonitor,
    },
    num::SolverNumeric,
    portfolio::{PortfolioSolver, PortfolioSolverContext, PortfolioSolverResult},
    result::{SolverOutcome, SolverResult, TerminationReason},
    stats::{SolverStatistics, SolverStatisticsBuilder},
};
use log::{debug, info};
use std::{
    sync::atomic::{AtomicBool, AtomicU64, Ordering},
    time::Instant,
};

/// Clock check mask of the per-thread time limit. A balancing step costs far
/// more than reading the clock, so every step checks it.
const TIME_LIMIT_CLOCK_CHECK_MASK: u64 = 0;

pub struct Solver<'a, T> {
    portfolio_solver: Vec<Box<dyn PortfolioSolver<T> + 'a>>,
    incumbent: SharedIncumbent<T>,
    initial_solution: Option<Solution<T>>,
    global_solution_count: AtomicU64,
    /// Raised once any member proves optimality.
    stop_signal: AtomicBool,
    solution_limit: Option<u64>,
    time_limit: Option<std::time::Duration>,
}

impl<'a, T> Solver<'a, T>
where
    T: SolverNumeric,
{
    #[inline]
    pub fn add_solver<S>(&mut self, solver: S)
    where
        S: PortfolioSolver<T> + 'a,
    {
        self.portfolio_solver.push(Box::new(solver));
    }

    #[inline]
    pub fn add_solver_boxed(&mut self, solver: Box<dyn PortfolioSolver<T> + 'a>) {
        self.portfolio_solver.push(solver);
    }

    #[inline]
    pub fn num_solvers(&self) -> usize {
        self.portfolio_solver.len()
    }

    /// The incumbent of the last solve.
    #[inline]
    pub fn incumbent(&self) -> &SharedIncumbent<T> {
        &self.incumbent
    }

    #[inline]
    pub fn solution_limit(&self) -> Option<u64> {
        self.solution_limit
    }

    #[inline]
    pub fn time_limit(&self) -> Option<std::time::Duration> {
        self.time_limit
    }

    /// Runs every portfolio member on `model` with `num_cars` cars.
    ///
    /// # Panics
    ///
    /// Panics if no portfolio solver was added, or if a member thread panics.
    pub fn solve(&mut self, model: &Model<T>, num_cars: usize) -> SolverOutcome<T> {
        assert!(
            !self.portfolio_solver.is_empty(),
            "called `Solver::solve` with no portfolio solvers added"
        );

        let start_time = Instant::now();

        self.stop_signal.store(false, Ordering::Relaxed);
        self.global_solution_count.store(0, Ordering::Relaxed);
        self.incumbent = match &self.initial_solution {
            Some(solution) => SharedIncumbent::with_solution(solution.clone()),
            None => SharedIncumbent::new(),
        };

        let results = self.run_portfolio_parallel(model, num_cars, start_time);
        self.construct_outcome(start_time, results)
    }

    fn run_portfolio_parallel(
        &mut self,
        model: &Model<T>,
        num_cars: usize,
        start_time: Instant,
    ) -> Vec<PortfolioSolverResult<T>> {
        let solution_limit = self.solution_limit;
        let time_limit = self.time_limit;
        let incumbent = &self.incumbent;
        let global_solution_count = &self.global_solution_count;
        let stop_signal = &self.stop_signal;

        let mut results = Vec::with_capacity(self.portfolio_solver.len());

        std::thread::scope(|scope| {
            let mut handles = Vec::with_capacity(self.portfolio_solver.len());

            for solver in self.portfolio_solver.iter_mut() {
                let handle = scope.spawn(move || {
                    let mut monitor = CompositeMonitor::<T>::with_capacity(3);
                    monitor.add_monitor(InterruptMonitor::new(stop_signal));
                    monitor.add_monitor(SolutionMonitor::new(global_solution_count, solution_limit));
                    if let Some(limit) = time_limit {
                        // The budget counts from the start of `solve`, not of this thread.
                        let remaining = limit.saturating_sub(start_time.elapsed());
                        monitor.add_monitor(TimeLimitMonitor::with_clock_check_mask(
                            remaining,
                            TIME_LIMIT_CLOCK_CHECK_MASK,
                        ));
                    }

                    let ctx = PortfolioSolverContext::new(model, num_cars, incumbent, &mut monitor);
                    let result = solver.invoke(ctx);

                    if matches!(result.result(), SolverResult::Optimal(_)) {
                        debug!(
                            "portfolio solver '{}' proved optimality, stopping the others",
                            solver.name()
                        );
                        stop_signal.store(true, Ordering::Relaxed);
                    }

                    result
                });
                handles.push(handle);
            }

            for handle in handles {
                results.push(handle.join().expect("portfolio solver thread panicked"));
            }
        });

        results
    }

    /// The best solution among the thread results and the shared incumbent.
    fn find_best_solution(&self, results: &[PortfolioSolverResult<T>]) -> Option<Solution<T>> {
        let thread_solutions = results.iter().filter_map(|r| r.result().solution());
        let incumbent_snapshot = self.incumbent.snapshot();

        thread_solutions
            .chain(incumbent_snapshot.as_ref())
            .min_by_key(|s| s.objective_value())
            .cloned()
    }

    fn build_statistics(
        &self,
        start_time: std::time::Instant,
        results: &[PortfolioSolverResult<T>],
    ) -> SolverStatistics {
        let nodes_explored = results
            .iter()
            .fold(0u64, |acc, r| acc.saturating_add(r.nodes_explored()));

        SolverStatisticsBuilder::new()
            .solutions_found(self.global_solution_count.load(Ordering::Relaxed))
            .nodes_explored(nodes_explored)
            .used_threads(results.len())
            .solve_duration(start_time.elapsed())
            .build()
    }

    fn construct_outcome(
        &self,
        start_time: std::time::Instant,
        results: Vec<PortfolioSolverResult<T>>,
    ) -> SolverOutcome<T> {
        let stats = self.build_statistics(start_time, &results);
        let best_solution = self.find_best_solution(&results);
        let optimality_proven = results
            .iter()
            .any(|r| matches!(r.result(), SolverResult::Optimal(_)));

        let outcome = match best_solution {
            Some(solution) if optimality_proven => SolverOutcome::optimal(solution, stats),
            Some(solution) => {
                let reason = self.determine_abort_reason(&results);
                SolverOutcome::aborted(Some(solution), reason, stats)
            }
            None if results
                .iter()
                .any(|r| matches!(r.result(), SolverResult::Infeasible)) =>
            {
                SolverOutcome::infeasible(stats)
            }
            None => {
                let reason = self.determine_abort_reason(&results);
                SolverOutcome::aborted(None, reason, stats)
            }
        };

        info!(
            "portfolio finished: {} ({}) after {:.3}s",
            outcome.status(),
            outcome.reason,
            outcome.statistics.solve_duration.as_secs_f64()
        );
        outcome
    }

    fn determine_abort_reason(&self, results: &[PortfolioSolverResult<T>]) -> String {
        if let Some(msg) = results.iter().find_map(|res| match res.termination_reason() {
            TerminationReason::Aborted(msg) => Some(msg.clone()),
            _ => None,
        }) {
            return msg;
        }

        if self.stop_signal.load(Ordering::Relaxed) {
            return "stop signal received".to_string();
        }

        "search space exhausted without proof".to_string()
    }
}

impl<'a, T> std::fmt::Debug for Solver<'a, T>
where
    T: SolverNumeric,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<&str> = self.portfolio_solver.iter().map(|s| s.name()).collect();
        f.debug_struct("Solver")
            .field("portfolio_solver", &names)
            .field("solution_limit", &self.solution_limit)
            .field("time_limit", &self.time_limit)
            .finish()
    }
}

pub struct SolverBuilder<'a, T> {
    portfolio_solver: Vec<Box<dyn PortfolioSolver<T> + 'a>>,
    initial_solution: Option<Solution<T>>,
    solution_limit: Option<u64>,
    time_limit: Option<std::time::Duration>,
}

impl<'a, T> Default for SolverBuilder<'a, T>
where
    T: SolverNumeric,
{
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<'a, T> SolverBuilder<'a, T>
where
    T: SolverNumeric,
{
    #[inline]
    pub fn new() -> Self {
        Self {
            portfolio_solver: Vec::new(),
            initial_solution: None,
            solution_limit: None,
            time_limit: None,
        }
    }

    #[inline]
    pub fn with_solution_limit(mut self, limit: u64) -> Self {
        self.solution_limit = Some(limit);
        self
    }

    #[inline]
    pub fn with_time_limit(mut self, limit: std::time::Duration) -> Self {
        self.time_limit = Some(limit);
        self
    }

    /// Seeds the incumbent with `solution` at the start of every solve. The
    /// solution must belong to the model and car count later passed to
    /// `Solver::solve`.
    #[inline]
    pub fn with_initial_solution(mut self, solution: Solution<T>) -> Self {
        self.initial_solution = Some(solution);
        self
    }

    #[inline]
    pub fn add_solver<S>(mut self, solver: S) -> Self
    where
        S: PortfolioSolver<T> + 'a,
    {
        self.portfolio_solver.push(Box::new(solver));
        self
    }

    #[inline]
    pub fn build(self) -> Solver<'a, T> {
        Solver {
            portfolio_solver: self.portfolio_solver,
            incumbent: SharedIncumbent::new(),
            initial_solution: self.initial_solution,
            global_solution_count: AtomicU64::new(0),
            stop_signal: AtomicBool::new(false),
            solution_limit: self.solution_limit,
            time_limit: self.time_limit,
        }
    }
}
