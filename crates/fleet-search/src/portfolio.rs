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

//! Solvers that run side by side in a parallel portfolio.
//!
//! Every portfolio member receives a [`PortfolioSolverContext`] with the model,
//! the number of cars to balance over, the incumbent shared with the other
//! members and its own monitor.

use crate::{
    incumbent::SharedIncumbent,
    monitor::search_monitor::SearchMonitor,
    result::{SolverResult, TerminationReason},
};
use fleet_model::{model::Model, solution::Solution};
use num_traits::{PrimInt, Signed};

pub struct PortfolioSolverContext<'a, T>
where
    T: PrimInt + Signed,
{
    pub model: &'a Model<T>,
    pub num_cars: usize,
    pub incumbent: &'a SharedIncumbent<T>,
    pub monitor: &'a mut dyn SearchMonitor<T>,
}

impl<'a, T> PortfolioSolverContext<'a, T>
where
    T: PrimInt + Signed,
{
    #[inline(always)]
    pub fn new(
        model: &'a Model<T>,
        num_cars: usize,
        incumbent: &'a SharedIncumbent<T>,
        monitor: &'a mut dyn SearchMonitor<T>,
    ) -> Self {
        Self {
            model,
            num_cars,
            incumbent,
            monitor,
        }
    }
}

impl<'a, T> std::fmt::Debug for PortfolioSolverContext<'a, T>
where
    T: PrimInt + Signed + std::fmt::Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PortfolioSolverContext")
            .field("model", &self.model)
            .field("num_cars", &self.num_cars)
            .field("incumbent", &self.incumbent.upper_bound())
            .field("monitor", &self.monitor.name())
            .finish()
    }
}

impl<'a, T> std::fmt::Display for PortfolioSolverContext<'a, T>
where
    T: PrimInt + Signed + std::fmt::Display,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "PortfolioSolverContext(model: {}, num_cars: {}, monitor: {})",
            self.model,
            self.num_cars,
            self.monitor.name(),
        )
    }
}

/// What a single portfolio member reports back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortfolioSolverResult<T> {
    result: SolverResult<T>,
    termination_reason: TerminationReason,
    nodes_explored: u64,
}

impl<T> PortfolioSolverResult<T> {
    #[inline]
    pub fn optimal(solution: Solution<T>) -> Self {
        Self {
            result: SolverResult::Optimal(solution),
            termination_reason: TerminationReason::OptimalityProven,
            nodes_explored: 0,
        }
    }

    #[inline]
    pub fn infeasible() -> Self {
        Self {
            result: SolverResult::Infeasible,
            termination_reason: TerminationReason::InfeasibilityProven,
            nodes_explored: 0,
        }
    }

    /// An aborted run: `Feasible` with a solution, `Unknown` without.
    #[inline]
    pub fn aborted<R>(solution: Option<Solution<T>>, reason: R) -> Self
    where
        R: Into<String>,
    {
        let result = match solution {
            Some(sol) => SolverResult::Feasible(sol),
            None => SolverResult::Unknown,
        };

        Self {
            result,
            termination_reason: TerminationReason::Aborted(reason.into()),
            nodes_explored: 0,
        }
    }

    /// Attaches the number of nodes the member explored.
    #[inline]
    pub fn with_nodes_explored(mut self, nodes_explored: u64) -> Self {
        self.nodes_explored = nodes_explored;
        self
    }

    #[inline]
    pub fn result(&self) -> &SolverResult<T> {
        &self.result
    }

    #[inline]
    pub fn termination_reason(&self) -> &TerminationReason {
        &self.termination_reason
    }

    #[inline]
    pub fn nodes_explored(&self) -> u64 {
        self.nodes_explored
    }

    #[inline]
    pub fn into_parts(self) -> (SolverResult<T>, TerminationReason) {
        (self.result, self.termination_reason)
    }
}

impl<T> std::fmt::Display for PortfolioSolverResult<T>
where
    T: PrimInt + Signed + std::fmt::Display,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "PortfolioSolverResult(result: {}, termination_reason: {})",
            self.result, self.termination_reason
        )
    }
}

/// A solver that can be run as one member of a parallel portfolio.
pub trait PortfolioSolver<T>: Send
where
    T: PrimInt + Signed,
{
    fn invoke<'a>(&mut self, context: PortfolioSolverContext<'a, T>) -> PortfolioSolverResult<T>;
    fn name(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;
    use fleet_model::index::CarIndex;

    #[test]
    fn test_aborted_without_solution_is_unknown() {
        let r = PortfolioSolverResult::<i64>::aborted(None, "stop");
        assert_eq!(r.result(), &SolverResult::Unknown);
        assert_eq!(
            r.termination_reason(),
            &TerminationReason::Aborted("stop".to_string())
        );
    }

    #[test]
    fn test_aborted_with_solution_is_feasible() {
        let sol = Solution::new(2i64, vec![CarIndex::new(0)], vec![2]);
        let r = PortfolioSolverResult::aborted(Some(sol.clone()), "time").with_nodes_explored(12);
        assert_eq!(r.result(), &SolverResult::Feasible(sol));
        assert_eq!(r.nodes_explored(), 12);
    }

    #[test]
    fn test_display() {
        let r = PortfolioSolverResult::<i64>::infeasible();
        assert_eq!(
            format!("{}", r),
            "PortfolioSolverResult(result: Infeasible, termination_reason: Infeasibility Proven)"
        );
    }
}
