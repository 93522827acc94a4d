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

use crate::state::SearchState;
use fleet_model::{
    index::{CarIndex, RideIndex},
    model::Model,
};
use fleet_search::num::SolverNumeric;

/// Scores decisions and bounds the objective of partial assignments.
///
/// The engine calls
/// - `evaluate_assignment` while generating decisions, to attach a bound to
///   every child before it is explored,
/// - `lower_bound` after descending into a node, to decide whether the
///   subtree can still beat the incumbent,
/// - `objective` on complete assignments.
///
/// Bounds must be admissible: never larger than the objective of any
/// complete assignment reachable from the node. The engine prunes when
/// `bound >= best_objective`. `None` marks a branch as infeasible.
pub trait ObjectiveEvaluator<T>
where
    T: SolverNumeric,
{
    fn name(&self) -> &str;

    /// Objective value of the car loads of a complete assignment.
    fn objective(&self, car_loads: &[T]) -> T;

    /// Lower bound on the objective after putting `ride_index` on
    /// `car_index` in `state`. The caller guarantees the move is feasible.
    fn evaluate_assignment(
        &mut self,
        model: &Model<T>,
        state: &SearchState<T>,
        ride_index: RideIndex,
        car_index: CarIndex,
    ) -> Option<T>;

    /// Lower bound on the objective of every completion of `state`.
    fn lower_bound(&mut self, model: &Model<T>, state: &SearchState<T>) -> Option<T>;
}

impl<T> std::fmt::Debug for dyn ObjectiveEvaluator<T>
where
    T: SolverNumeric,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ObjectiveEvaluator({})", self.name())
    }
}

impl<T> std::fmt::Display for dyn ObjectiveEvaluator<T>
where
    T: SolverNumeric,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ObjectiveEvaluator({})", self.name())
    }
}
