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
    monitor::tree_search_monitor::TreeSearchMonitor, state::SearchState,
    stats::BnbSolverStatistics,
};
use fleet_model::{model::Model, solution::Solution};
use log::{debug, info};
use num_traits::{PrimInt, Signed};
use std::time::{Duration, Instant};

/// Periodically logs search progress at `info` level.
///
/// The clock is only read when `steps & clock_check_mask == 0`.
#[derive(Debug, Clone)]
pub struct LogTreeSearchMonitor<T>
where
    T: std::fmt::Display + PrimInt + Signed,
{
    start_time: Instant,
    last_log_time: Instant,
    log_interval: Duration,
    clock_check_mask: u64,
    best_objective: Option<T>,
}

impl<T> LogTreeSearchMonitor<T>
where
    T: std::fmt::Display + PrimInt + Signed,
{
    pub fn new(log_interval: Duration, clock_check_mask: u64) -> Self {
        Self {
            start_time: Instant::now(),
            last_log_time: Instant::now(),
            log_interval,
            clock_check_mask,
            best_objective: None,
        }
    }

    #[inline(always)]
    fn best_as_string(&self) -> String {
        match &self.best_objective {
            Some(obj) => format!("{}", obj),
            None => "Inf".to_string(),
        }
    }

    fn log_line(&mut self, state: &SearchState<T>, stats: &BnbSolverStatistics) {
        let now = Instant::now();
        info!(
            "{:>7.1}s | nodes {:>12} | depth {:>5}/{:<5} | best {:>10} | spread {:>10} | backtracks {:>10} | pruned {:>10}",
            now.duration_since(self.start_time).as_secs_f32(),
            stats.nodes_explored,
            state.num_assigned_rides(),
            state.num_rides(),
            self.best_as_string(),
            state.current_spread(),
            stats.backtracks,
            stats.prunings_bound.saturating_add(stats.prunings_infeasible),
        );
        self.last_log_time = now;
    }
}

impl<T> Default for LogTreeSearchMonitor<T>
where
    T: std::fmt::Display + PrimInt + Signed,
{
    fn default() -> Self {
        Self::new(Duration::from_secs(1), 4095)
    }
}

impl<T> std::fmt::Display for LogTreeSearchMonitor<T>
where
    T: std::fmt::Display + PrimInt + Signed,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "LogTreeSearchMonitor(log_interval: {}ms, clock_check_mask: {})",
            self.log_interval.as_millis(),
            self.clock_check_mask
        )
    }
}

impl<T> TreeSearchMonitor<T> for LogTreeSearchMonitor<T>
where
    T: std::fmt::Display + PrimInt + Signed,
{
    fn name(&self) -> &str {
        "LogTreeSearchMonitor"
    }

    fn on_enter_search(&mut self, model: &Model<T>, _statistics: &BnbSolverStatistics) {
        self.start_time = Instant::now();
        self.last_log_time = self.start_time;
        self.best_objective = None;
        info!(
            "branch-and-bound started: {} rides, stabbing number {}",
            model.num_rides(),
            model.stabbing_number()
        );
    }

    fn on_step(&mut self, state: &SearchState<T>, statistics: &BnbSolverStatistics) {
        if (statistics.steps & self.clock_check_mask) == 0
            && self.last_log_time.elapsed() >= self.log_interval
        {
            self.log_line(state, statistics);
        }
    }

    fn on_solution_found(&mut self, solution: &Solution<T>, statistics: &BnbSolverStatistics) {
        let objective = solution.objective_value();
        debug!(
            "new incumbent with spread {} after {} nodes",
            objective, statistics.nodes_explored
        );
        self.best_objective = Some(objective);
    }

    fn on_exit_search(&mut self, statistics: &BnbSolverStatistics) {
        info!(
            "branch-and-bound finished: best {}, {} nodes, {} solutions",
            self.best_as_string(),
            statistics.nodes_explored,
            statistics.solutions_found
        );
    }
}
