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

//! Branch-and-bound engine for balancing rides over a fixed number of cars.
//!
//! `BnbSolver` owns the reusable trail and decision stack; every call to
//! `solve` runs a `BnbSolverSearchSession` that walks the tree depth first,
//! one ride per level. A `DecisionBuilder` decides which ride to branch on
//! and in which order its cars are tried, an `ObjectiveEvaluator` bounds
//! partial assignments, and a `TreeSearchMonitor` observes the run and may
//! stop it.
//!
//! Nodes are pruned as soon as their bound reaches the best known objective.
//! When the tree is exhausted, the best solution seen (locally or through the
//! shared incumbent) is optimal; with no solution at all the model is proven
//! infeasible for the given number of cars. After every run the trail and
//! stack are cleared but keep their capacity.

use crate::{
    branching::decision::{Decision, DecisionBuilder},
    eval::{self, evaluator::ObjectiveEvaluator},
    incumbent::{IncumbentStore, NoSharedIncumbent, SharedIncumbentAdapter},
    monitor::tree_search_monitor::{PruneReason, TreeSearchMonitor},
    result::BnbSolverOutcome,
    stack::SearchStack,
    state::SearchState,
    stats::BnbSolverStatistics,
    trail::SearchTrail,
};
use fleet_model::{model::Model, solution::Solution};
use fleet_search::{
    incumbent::SharedIncumbent, monitor::search_monitor::SearchCommand, num::SolverNumeric,
};
use num_traits::{PrimInt, Signed};

/// The execution engine. Tree construction is delegated to a
/// `DecisionBuilder` and bounding to an `ObjectiveEvaluator`.
#[derive(Clone, Debug)]
pub struct BnbSolver<T>
where
    T: PrimInt + Signed,
{
    trail: SearchTrail<T>,
    stack: SearchStack<T>,
}

impl<T> Default for BnbSolver<T>
where
    T: PrimInt + Signed,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T> BnbSolver<T>
where
    T: PrimInt + Signed,
{
    #[inline]
    pub fn new() -> Self {
        Self {
            trail: SearchTrail::new(),
            stack: SearchStack::new(),
        }
    }

    /// Creates a solver whose trail and stack can hold a search over
    /// `num_rides` rides and `num_cars` cars without reallocating.
    ///
    /// The solver grows its buffers on demand anyway; this only moves the
    /// allocation to construction time.
    #[inline]
    pub fn preallocated(num_rides: usize, num_cars: usize) -> Self {
        Self {
            trail: SearchTrail::preallocated(num_rides),
            stack: SearchStack::preallocated(num_rides, num_cars),
        }
    }

    /// Balances `model` over `num_cars` cars as a standalone, single
    /// threaded search.
    #[inline]
    pub fn solve<B, E, S>(
        &mut self,
        model: &Model<T>,
        num_cars: usize,
        builder: &mut B,
        evaluator: &mut E,
        monitor: S,
    ) -> BnbSolverOutcome<T>
    where
        B: DecisionBuilder<T, E>,
        E: ObjectiveEvaluator<T>,
        S: TreeSearchMonitor<T>,
        T: SolverNumeric,
    {
        let backing = NoSharedIncumbent::new();
        self.solve_internal(model, num_cars, builder, evaluator, monitor, backing)
    }

    /// Balances `model` over `num_cars` cars, pruning against and publishing
    /// to `incumbent`. A solution already held by the incumbent acts as a warm
    /// start.
    #[inline]
    pub fn solve_with_incumbent<B, E, S>(
        &mut self,
        model: &Model<T>,
        num_cars: usize,
        builder: &mut B,
        evaluator: &mut E,
        monitor: S,
        incumbent: &SharedIncumbent<T>,
    ) -> BnbSolverOutcome<T>
    where
        B: DecisionBuilder<T, E>,
        E: ObjectiveEvaluator<T>,
        S: TreeSearchMonitor<T>,
        T: SolverNumeric,
    {
        let backing = SharedIncumbentAdapter::new(incumbent);
        self.solve_internal(model, num_cars, builder, evaluator, monitor, backing)
    }

    /// # Panics
    ///
    /// In debug builds, panics if the evaluator reports a bound above the
    /// brute-force optimum of a small model.
    #[inline(always)]
    fn solve_internal<B, E, S, I>(
        &mut self,
        model: &Model<T>,
        num_cars: usize,
        builder: &mut B,
        evaluator: &mut E,
        mut monitor: S,
        backing: I,
    ) -> BnbSolverOutcome<T>
    where
        B: DecisionBuilder<T, E>,
        E: ObjectiveEvaluator<T>,
        S: TreeSearchMonitor<T>,
        I: IncumbentStore<T>,
        T: SolverNumeric,
    {
        debug_assert!(
            eval::validation::is_admissible_evaluator_exhaustive(
                evaluator, model, num_cars, 10_000
            ),
            "ObjectiveEvaluator '{}' is not admissible: a bound exceeds the optimum",
            evaluator.name()
        );

        let session = BnbSolverSearchSession::new(
            self,
            model,
            num_cars,
            builder,
            evaluator,
            &mut monitor,
            backing,
        );
        let outcome = session.run();
        self.reset();
        outcome
    }

    /// Clears the trail and stack, keeping their allocations.
    #[inline]
    fn reset(&mut self) {
        self.trail.reset();
        self.stack.reset();
    }
}

/// How the main loop ended.
enum SessionEnd {
    Exhausted,
    Aborted(String),
}

/// State and logic of a single search run.
struct BnbSolverSearchSession<'a, T, B, E, S, I>
where
    T: SolverNumeric,
    I: IncumbentStore<T>,
{
    solver: &'a mut BnbSolver<T>,
    model: &'a Model<T>,
    builder: &'a mut B,
    evaluator: &'a mut E,
    monitor: &'a mut S,
    incumbent: I,
    state: SearchState<T>,
    best_objective: T,
    best_solution: Option<Solution<T>>,
    stats: BnbSolverStatistics,
    start_time: std::time::Instant,
}

impl<'a, T, B, E, S, I> std::fmt::Debug for BnbSolverSearchSession<'a, T, B, E, S, I>
where
    T: SolverNumeric,
    I: IncumbentStore<T>,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BnbSolverSearchSession")
            .field("state", &self.state)
            .field("best_objective", &self.best_objective)
            .field("best_solution", &self.best_solution)
            .field("stats", &self.stats)
            .finish()
    }
}

impl<'a, T, B, E, S, I> BnbSolverSearchSession<'a, T, B, E, S, I>
where
    T: SolverNumeric,
    B: DecisionBuilder<T, E>,
    E: ObjectiveEvaluator<T>,
    S: TreeSearchMonitor<T>,
    I: IncumbentStore<T>,
{
    #[inline]
    fn new(
        solver: &'a mut BnbSolver<T>,
        model: &'a Model<T>,
        num_cars: usize,
        builder: &'a mut B,
        evaluator: &'a mut E,
        monitor: &'a mut S,
        incumbent: I,
    ) -> Self {
        let best_objective = incumbent.initial_upper_bound();
        Self {
            solver,
            model,
            builder,
            evaluator,
            monitor,
            incumbent,
            state: SearchState::new(model, num_cars),
            best_objective,
            best_solution: None,
            stats: BnbSolverStatistics::default(),
            start_time: std::time::Instant::now(),
        }
    }

    fn run(mut self) -> BnbSolverOutcome<T> {
        self.monitor.on_enter_search(self.model, &self.stats);

        if !self.initialize() {
            self.stats.set_total_time(self.start_time.elapsed());
            self.monitor.on_exit_search(&self.stats);
            return BnbSolverOutcome::infeasible(self.stats);
        }

        let end = loop {
            self.best_objective = self.incumbent.tighten(self.best_objective);
            self.monitor.on_step(&self.state, &self.stats);
            self.stats.on_step();

            if let SearchCommand::Terminate(msg) =
                self.monitor.search_command(&self.state, &self.stats)
            {
                break SessionEnd::Aborted(msg);
            }

            if self.solver.stack.is_current_level_empty() {
                if self.solver.stack.depth() <= 1 {
                    break SessionEnd::Exhausted;
                }
                self.backtrack_step();
            } else {
                self.process_next_decision();
            }
        };

        self.stats.set_total_time(self.start_time.elapsed());
        self.monitor.on_exit_search(&self.stats);
        self.finalize(end)
    }

    /// Picks the better of the local best and the store's best.
    fn best_overall(&self) -> Option<Solution<T>> {
        match (self.best_solution.clone(), self.incumbent.best_known()) {
            (Some(local), Some(shared)) => {
                if shared.objective_value() < local.objective_value() {
                    Some(shared)
                } else {
                    Some(local)
                }
            }
            (local, shared) => local.or(shared),
        }
    }

    fn finalize(self, end: SessionEnd) -> BnbSolverOutcome<T> {
        let best = self.best_overall();
        match end {
            SessionEnd::Exhausted => match best {
                Some(solution) => BnbSolverOutcome::optimal(solution, self.stats),
                None => BnbSolverOutcome::infeasible(self.stats),
            },
            SessionEnd::Aborted(msg) => BnbSolverOutcome::aborted(best, msg, self.stats),
        }
    }

    /// Sets up the root frame and its decisions. Returns `false` if the
    /// model is structurally infeasible for the number of cars.
    fn initialize(&mut self) -> bool {
        let (num_rides, num_cars) = (self.model.num_rides(), self.state.num_cars());
        if num_cars < self.model.stabbing_number() {
            self.stats.on_pruning_infeasible();
            return false;
        }

        self.solver.trail.ensure_capacity(num_rides);
        self.solver.stack.ensure_capacity(num_rides, num_cars);
        self.builder.prepare(self.model);

        // Root frame. Must exist before any decision is pushed.
        self.solver.trail.push_frame();
        self.solver.stack.push_frame();
        self.stats.on_node_explored();

        if self.state.is_complete() {
            self.handle_complete_solution();
            return true;
        }

        let Some(root_bound) = self.evaluator.lower_bound(self.model, &self.state) else {
            self.stats.on_pruning_infeasible();
            self.monitor
                .on_prune(&self.state, PruneReason::Infeasible, &self.stats);
            return true;
        };
        self.stats.set_root_lower_bound(root_bound.into());
        self.monitor
            .on_lower_bound_computed(&self.state, root_bound, &self.stats);

        if root_bound >= self.best_objective {
            self.stats.on_pruning_bound();
            self.monitor
                .on_prune(&self.state, PruneReason::BoundDominated, &self.stats);
            return true;
        }

        self.enqueue_decisions();
        true
    }

    #[inline]
    fn enqueue_decisions(&mut self) {
        let decisions = self
            .builder
            .next_decision(self.evaluator, self.model, &self.state);

        let count_before = self.solver.stack.num_entries();
        self.solver.stack.extend(decisions);
        let count = self.solver.stack.num_entries() - count_before;

        self.monitor
            .on_decisions_enqueued(&self.state, count, &self.stats);
    }

    #[inline]
    fn backtrack_step(&mut self) {
        self.stats.on_backtrack();
        self.monitor.on_backtrack(&self.state, &self.stats);

        self.solver.trail.backtrack(&mut self.state);
        self.solver.stack.pop_frame();
    }

    #[inline(always)]
    fn process_next_decision(&mut self) {
        let Some(decision) = self.solver.stack.pop() else {
            return;
        };
        self.stats.on_decision_generated();

        // The incumbent may have improved since the decision was enqueued.
        if decision.bound() >= self.best_objective {
            self.stats.on_pruning_bound();
            self.monitor
                .on_prune(&self.state, PruneReason::BoundDominated, &self.stats);
            return;
        }

        self.descend(decision);
    }

    #[inline(always)]
    fn descend(&mut self, decision: Decision<T>) {
        let ride_index = decision.ride_index();
        let duration = self.model.ride_duration(ride_index);

        self.solver.trail.push_frame();
        self.solver.trail.apply_assignment(
            &mut self.state,
            ride_index,
            decision.car_index(),
            duration,
        );
        self.solver.stack.push_frame();

        self.stats.on_node_explored();
        self.stats.on_depth_update(self.solver.stack.depth() as u64);
        self.monitor.on_descend(&self.state, decision, &self.stats);

        if self.state.is_complete() {
            self.handle_complete_solution();
            return;
        }

        if self.should_backtrack_after_expand() {
            self.backtrack_step();
        }
    }

    fn handle_complete_solution(&mut self) {
        let objective = self.evaluator.objective(self.state.car_loads());
        if objective >= self.best_objective {
            self.stats.on_pruning_bound();
            self.monitor
                .on_prune(&self.state, PruneReason::BoundDominated, &self.stats);
            return;
        }

        match self.state.to_solution(objective) {
            Ok(solution) => {
                self.best_objective = objective;
                self.incumbent.on_solution_found(&solution);
                self.stats.on_solution_found();
                self.monitor.on_solution_found(&solution, &self.stats);
                self.best_solution = Some(solution);
            }
            Err(_) => {
                self.stats.on_pruning_infeasible();
                self.monitor
                    .on_prune(&self.state, PruneReason::Infeasible, &self.stats);
            }
        }
    }

    /// Bounds the freshly entered node and, if it survives, enqueues its
    /// children. Returns `true` if the node must be left again.
    #[inline(always)]
    fn should_backtrack_after_expand(&mut self) -> bool {
        let Some(lower_bound) = self.evaluator.lower_bound(self.model, &self.state) else {
            self.stats.on_pruning_infeasible();
            self.monitor
                .on_prune(&self.state, PruneReason::Infeasible, &self.stats);
            return true;
        };

        self.monitor
            .on_lower_bound_computed(&self.state, lower_bound, &self.stats);

        if lower_bound >= self.best_objective {
            self.stats.on_pruning_bound();
            self.monitor
                .on_prune(&self.state, PruneReason::BoundDominated, &self.stats);
            return true;
        }

        self.enqueue_decisions();
        false
    }
}
