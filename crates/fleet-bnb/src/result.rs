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

use crate::stats::BnbSolverStatistics;
use fleet_model::solution::Solution;
use fleet_search::{
    portfolio::PortfolioSolverResult,
    result::{SolverOutcome, SolverResult, TerminationReason},
    stats::SolverStatisticsBuilder,
};
use num_traits::{PrimInt, Signed};

/// Result of a branch-and-bound run.
#[derive(Debug, Clone)]
pub struct BnbSolverOutcome<T> {
    result: SolverResult<T>,
    termination_reason: TerminationReason,
    statistics: BnbSolverStatistics,
}

impl<T> BnbSolverOutcome<T> {
    #[inline]
    pub fn optimal(solution: Solution<T>, statistics: BnbSolverStatistics) -> Self {
        Self {
            result: SolverResult::Optimal(solution),
            termination_reason: TerminationReason::OptimalityProven,
            statistics,
        }
    }

    #[inline]
    pub fn infeasible(statistics: BnbSolverStatistics) -> Self {
        Self {
            result: SolverResult::Infeasible,
            termination_reason: TerminationReason::InfeasibilityProven,
            statistics,
        }
    }

    /// A run stopped by a monitor: `Feasible` if it holds a solution,
    /// `Unknown` otherwise.
    #[inline]
    pub fn aborted<R>(
        solution: Option<Solution<T>>,
        reason: R,
        statistics: BnbSolverStatistics,
    ) -> Self
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
            statistics,
        }
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
    pub fn statistics(&self) -> &BnbSolverStatistics {
        &self.statistics
    }

    /// Converts into the solver-agnostic outcome of a single-threaded run.
    pub fn into_solver_outcome(self) -> SolverOutcome<T> {
        let statistics = SolverStatisticsBuilder::new()
            .solutions_found(self.statistics.solutions_found)
            .nodes_explored(self.statistics.nodes_explored)
            .used_threads(1)
            .solve_duration(self.statistics.time_total)
            .build();
        SolverOutcome::new(self.result, self.termination_reason, statistics)
    }
}

impl<T> std::fmt::Display for BnbSolverOutcome<T>
where
    T: PrimInt + Signed + std::fmt::Display,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Result:      {}", self.result)?;
        writeln!(f, "Termination: {}", self.termination_reason)?;
        write!(f, "{}", self.statistics)
    }
}

impl<T> From<BnbSolverOutcome<T>> for PortfolioSolverResult<T>
where
    T: PrimInt + Signed,
{
    fn from(val: BnbSolverOutcome<T>) -> Self {
        let nodes = val.statistics.nodes_explored;
        let result = match (val.termination_reason, val.result) {
            (TerminationReason::OptimalityProven, SolverResult::Optimal(solution)) => {
                PortfolioSolverResult::optimal(solution)
            }
            (TerminationReason::OptimalityProven, _) => panic!(
                "called `BnbSolverOutcome::into()` with inconsistent state: termination reason is OptimalityProven but result is not Optimal"
            ),
            (TerminationReason::InfeasibilityProven, _) => PortfolioSolverResult::infeasible(),
            (TerminationReason::Aborted(reason), SolverResult::Feasible(solution)) => {
                PortfolioSolverResult::aborted(Some(solution), reason)
            }
            (TerminationReason::Aborted(reason), _) => PortfolioSolverResult::aborted(None, reason),
        };
        result.with_nodes_explored(nodes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fleet_model::index::CarIndex;

    type I = i64;

    fn solution() -> Solution<I> {
        Solution::new(0, vec![CarIndex::new(0)], vec![10])
    }

    #[test]
    fn test_into_portfolio_infeasible() {
        let outcome = BnbSolverOutcome::<I>::infeasible(BnbSolverStatistics::default());
        let portfolio: PortfolioSolverResult<I> = outcome.into();
        assert_eq!(portfolio.result(), &SolverResult::Infeasible);
        assert_eq!(
            portfolio.termination_reason(),
            &TerminationReason::InfeasibilityProven
        );
    }

    #[test]
    fn test_into_portfolio_aborted_without_solution_is_unknown() {
        let outcome =
            BnbSolverOutcome::<I>::aborted(None, "time limit reached", BnbSolverStatistics::default());
        let portfolio: PortfolioSolverResult<I> = outcome.into();
        assert_eq!(portfolio.result(), &SolverResult::Unknown);
        assert_eq!(
            portfolio.termination_reason(),
            &TerminationReason::Aborted("time limit reached".to_string())
        );
    }

    #[test]
    fn test_into_portfolio_carries_nodes() {
        let stats = BnbSolverStatistics {
            nodes_explored: 17,
            ..Default::default()
        };
        let portfolio: PortfolioSolverResult<I> = BnbSolverOutcome::optimal(solution(), stats).into();
        assert_eq!(portfolio.result(), &SolverResult::Optimal(solution()));
        assert_eq!(portfolio.nodes_explored(), 17);
    }

    #[test]
    #[should_panic(expected = "termination reason is OptimalityProven but result is not Optimal")]
    fn test_into_portfolio_panics_on_inconsistent_state() {
        let inconsistent = BnbSolverOutcome::<I> {
            result: SolverResult::Infeasible,
            termination_reason: TerminationReason::OptimalityProven,
            statistics: BnbSolverStatistics::default(),
        };
        let _portfolio: PortfolioSolverResult<I> = inconsistent.into();
    }

    #[test]
    fn test_into_solver_outcome() {
        let outcome = BnbSolverOutcome::aborted(
            Some(solution()),
            "time limit reached",
            BnbSolverStatistics::default(),
        )
        .into_solver_outcome();
        assert!(outcome.is_feasible());
        assert_eq!(outcome.statistics.used_threads, 1);
    }
}
