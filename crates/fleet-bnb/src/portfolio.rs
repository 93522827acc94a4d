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
    bnb::BnbSolver,
    branching::decision::DecisionBuilder,
    eval::evaluator::ObjectiveEvaluator,
    monitor::{
        composite::CompositeTreeSearchMonitor, log::LogTreeSearchMonitor, wrapper::WrapperMonitor,
    },
};
use fleet_search::{
    monitor::search_monitor::SearchMonitor,
    num::SolverNumeric,
    portfolio::{PortfolioSolver, PortfolioSolverContext, PortfolioSolverResult},
};
use log::{log_enabled, Level};

/// Runs a `BnbSolver` with a fixed builder and evaluator as one member of a
/// parallel portfolio.
#[derive(Clone)]
pub struct BnbPortfolioSolver<T, B, E>
where
    T: SolverNumeric,
    B: DecisionBuilder<T, E>,
    E: ObjectiveEvaluator<T>,
{
    inner: BnbSolver<T>,
    decision_builder: B,
    evaluator: E,
    name: String,
}

impl<T, B, E> BnbPortfolioSolver<T, B, E>
where
    T: SolverNumeric,
    B: DecisionBuilder<T, E>,
    E: ObjectiveEvaluator<T>,
{
    #[inline]
    pub fn new(decision_builder: B, evaluator: E) -> Self {
        Self::with_solver(BnbSolver::new(), decision_builder, evaluator)
    }

    #[inline]
    pub fn preallocated(num_rides: usize, num_cars: usize, decision_builder: B, evaluator: E) -> Self {
        Self::with_solver(
            BnbSolver::preallocated(num_rides, num_cars),
            decision_builder,
            evaluator,
        )
    }

    fn with_solver(inner: BnbSolver<T>, decision_builder: B, evaluator: E) -> Self {
        let name = format!(
            "BnbPortfolioSolver({}, {})",
            decision_builder.name(),
            evaluator.name()
        );
        Self {
            inner,
            decision_builder,
            evaluator,
            name,
        }
    }

    #[inline]
    pub fn inner(&self) -> &BnbSolver<T> {
        &self.inner
    }

    #[inline]
    pub fn decision_builder(&self) -> &B {
        &self.decision_builder
    }

    #[inline]
    pub fn evaluator(&self) -> &E {
        &self.evaluator
    }
}

impl<T, B, E> PortfolioSolver<T> for BnbPortfolioSolver<T, B, E>
where
    T: SolverNumeric,
    B: DecisionBuilder<T, E> + Send,
    E: ObjectiveEvaluator<T> + Send,
{
    fn invoke<'a>(&mut self, context: PortfolioSolverContext<'a, T>) -> PortfolioSolverResult<T> {
        let monitor = member_monitor(context.monitor, log_enabled!(Level::Debug));
        let outcome = self.inner.solve_with_incumbent(
            context.model,
            context.num_cars,
            &mut self.decision_builder,
            &mut self.evaluator,
            monitor,
            context.incumbent,
        );

        outcome.into()
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// The tree monitor of one portfolio member: the portfolio's monitor, plus
/// periodic progress lines when `log_progress` is set.
fn member_monitor<'a, T>(
    monitor: &'a mut dyn SearchMonitor<T>,
    log_progress: bool,
) -> CompositeTreeSearchMonitor<'a, T>
where
    T: SolverNumeric + 'a,
{
    let mut composite = CompositeTreeSearchMonitor::with_capacity(1 + log_progress as usize);
    composite.add_monitor(WrapperMonitor::new(monitor));
    if log_progress {
        composite.add_monitor(LogTreeSearchMonitor::default());
    }
    composite
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{branching::longest::LongestRideFirstBuilder, eval::spread::SpreadEvaluator};
    use fleet_model::model::Model;
    use fleet_search::{
        incumbent::SharedIncumbent,
        monitor::interrupt::InterruptMonitor,
        result::{SolverResult, TerminationReason},
    };
    use std::sync::atomic::AtomicBool;

    type IntegerType = i64;

    #[test]
    fn test_portfolio_member_finds_optimum() {
        // (0,12) clashes with (2,6) and (7,9); (13,20) clashes with (14,18).
        let model = Model::<IntegerType>::from_rides([
            (0, 12),
            (2, 6),
            (7, 9),
            (13, 20),
            (14, 18),
        ])
        .unwrap();

        let mut member = BnbPortfolioSolver::preallocated(
            model.num_rides(),
            2,
            LongestRideFirstBuilder::new(),
            SpreadEvaluator::new(),
        );
        assert_eq!(
            member.name(),
            "BnbPortfolioSolver(LongestRideFirstBuilder, SpreadEvaluator)"
        );

        let incumbent = SharedIncumbent::<IntegerType>::new();
        let stop = AtomicBool::new(false);
        let mut monitor = InterruptMonitor::new(&stop);
        let context = PortfolioSolverContext::new(&model, 2, &incumbent, &mut monitor);
        let result = member.invoke(context);

        match result.result() {
            SolverResult::Optimal(solution) => {
                // best split is {12 + 4, 4 + 2 + 7}
                assert_eq!(solution.objective_value(), 3);
                assert!(solution.validate(&model).is_ok());
            }
            other => panic!("expected Optimal, got {:?}", other),
        }
        assert_eq!(
            result.termination_reason(),
            &TerminationReason::OptimalityProven
        );
        assert!(result.nodes_explored() > 0);
        assert_eq!(incumbent.upper_bound(), 3);
    }

    #[test]
    fn test_member_monitor_adds_progress_logging() {
        let stop = AtomicBool::new(false);
        let mut interrupt = InterruptMonitor::<IntegerType>::new(&stop);
        assert_eq!(member_monitor(&mut interrupt, false).len(), 1);
        assert_eq!(member_monitor(&mut interrupt, true).len(), 2);
    }

    #[test]
    fn test_logging_member_monitor_keeps_the_optimum() {
        let model = Model::<IntegerType>::from_rides([(0, 10), (5, 15), (12, 18)]).unwrap();
        let stop = AtomicBool::new(false);
        let mut interrupt = InterruptMonitor::new(&stop);

        let mut solver = BnbSolver::new();
        let outcome = solver.solve(
            &model,
            2,
            &mut LongestRideFirstBuilder::new(),
            &mut SpreadEvaluator::new(),
            member_monitor(&mut interrupt, true),
        );
        match outcome.result() {
            SolverResult::Optimal(solution) => assert!(solution.validate(&model).is_ok()),
            other => panic!("expected Optimal, got {:?}", other),
        }
    }
}
