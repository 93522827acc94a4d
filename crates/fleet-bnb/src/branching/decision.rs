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

use crate::{eval::evaluator::ObjectiveEvaluator, state::SearchState};
use fleet_model::{
    index::{CarIndex, RideIndex},
    model::Model,
};
use fleet_search::num::SolverNumeric;
use std::iter::FusedIterator;

/// A decision to put a ride on a car, together with the evaluator's lower
/// bound on the objective of any completion that contains it.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Decision<T> {
    bound: T,
    ride_index: RideIndex,
    car_index: CarIndex,
}

impl<T> std::fmt::Display for Decision<T>
where
    T: std::fmt::Display,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Decision(ride: {}, car: {}, bound: {})",
            self.ride_index, self.car_index, self.bound
        )
    }
}

impl<T> Decision<T>
where
    T: Copy,
{
    #[inline(always)]
    pub const fn new(ride_index: RideIndex, car_index: CarIndex, bound: T) -> Self {
        Self {
            bound,
            ride_index,
            car_index,
        }
    }

    /// Builds the decision `ride_index -> car_index` if it is admissible in
    /// `state`:
    /// - the ride is not assigned yet,
    /// - the car is open, i.e. already in use or the first empty car,
    /// - the ride overlaps none of the rides on the car,
    /// - the evaluator does not reject it.
    ///
    /// Restricting new rides to the first empty car removes the symmetry
    /// between empty cars: relabelling cars never produces a new schedule.
    ///
    /// # Panics
    ///
    /// In debug builds, panics if either index is out of bounds.
    #[inline]
    pub fn try_new<E>(
        ride_index: RideIndex,
        car_index: CarIndex,
        model: &Model<T>,
        state: &SearchState<T>,
        evaluator: &mut E,
    ) -> Option<Self>
    where
        T: SolverNumeric,
        E: ObjectiveEvaluator<T>,
    {
        debug_assert!(
            ride_index.get() < model.num_rides(),
            "called `Decision::try_new` with ride index out of bounds: the len is {} but the index is {}",
            model.num_rides(),
            ride_index.get()
        );
        debug_assert!(
            car_index.get() < state.num_cars(),
            "called `Decision::try_new` with car index out of bounds: the len is {} but the index is {}",
            state.num_cars(),
            car_index.get()
        );

        if state.is_ride_assigned(ride_index) {
            return None;
        }
        if car_index.get() > state.num_used_cars() {
            return None;
        }
        if !state.fits(model, ride_index, car_index) {
            return None;
        }

        let bound = evaluator.evaluate_assignment(model, state, ride_index, car_index)?;
        Some(Self::new(ride_index, car_index, bound))
    }

    #[inline(always)]
    pub const fn ride_index(&self) -> RideIndex {
        self.ride_index
    }

    #[inline(always)]
    pub const fn car_index(&self) -> CarIndex {
        self.car_index
    }

    /// Lower bound on the objective once this decision is applied.
    #[inline(always)]
    pub const fn bound(&self) -> T {
        self.bound
    }
}

/// The iterator handed out by the builders in this crate: a buffer of
/// candidates sorted best first, yielded in reverse.
pub type CandidateIter<'a, T> =
    std::iter::Copied<std::iter::Rev<std::slice::Iter<'a, Decision<T>>>>;

/// Pushes every admissible decision for `ride_index` onto `candidates`.
#[inline]
pub(crate) fn collect_ride_decisions<T, E>(
    candidates: &mut Vec<Decision<T>>,
    ride_index: RideIndex,
    model: &Model<T>,
    state: &SearchState<T>,
    evaluator: &mut E,
) where
    T: SolverNumeric,
    E: ObjectiveEvaluator<T>,
{
    for car_index in state.open_cars() {
        if let Some(decision) = Decision::try_new(ride_index, car_index, model, state, evaluator) {
            candidates.push(decision);
        }
    }
}

/// Generates the children of a search node.
///
/// Every call branches on a single unassigned ride and yields one decision
/// per car that can take it, so each level of the tree assigns exactly one
/// ride and the tree is complete. The engine stores decisions on a LIFO
/// stack: the decision yielded **last** is explored first.
pub trait DecisionBuilder<T, E>
where
    T: SolverNumeric,
    E: ObjectiveEvaluator<T>,
{
    type DecisionIterator<'a>: Iterator<Item = Decision<T>> + FusedIterator + 'a
    where
        Self: 'a,
        T: 'a,
        E: 'a;

    fn name(&self) -> &str;

    /// Called once before the search starts on `model`.
    fn prepare(&mut self, _model: &Model<T>) {}

    fn next_decision<'a>(
        &'a mut self,
        evaluator: &'a mut E,
        model: &'a Model<T>,
        search_state: &'a SearchState<T>,
    ) -> Self::DecisionIterator<'a>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::eval::spread::SpreadEvaluator;

    fn model() -> Model<i64> {
        Model::from_rides([(0, 10), (5, 15), (20, 30)]).unwrap()
    }

    #[test]
    fn test_try_new_rejects_conflicting_car() {
        let m = model();
        let mut state = SearchState::new(&m, 2);
        let mut evaluator = SpreadEvaluator::new();
        state.assign_ride(RideIndex::new(0), CarIndex::new(0), 10);

        let r1 = RideIndex::new(1);
        assert!(Decision::try_new(r1, CarIndex::new(0), &m, &state, &mut evaluator).is_none());
        assert!(Decision::try_new(r1, CarIndex::new(1), &m, &state, &mut evaluator).is_some());
    }

    #[test]
    fn test_try_new_only_opens_first_empty_car() {
        let m = model();
        let state = SearchState::new(&m, 3);
        let mut evaluator = SpreadEvaluator::new();
        let r0 = RideIndex::new(0);

        assert!(Decision::try_new(r0, CarIndex::new(0), &m, &state, &mut evaluator).is_some());
        assert!(Decision::try_new(r0, CarIndex::new(1), &m, &state, &mut evaluator).is_none());
        assert!(Decision::try_new(r0, CarIndex::new(2), &m, &state, &mut evaluator).is_none());
    }

    #[test]
    fn test_try_new_rejects_assigned_ride() {
        let m = model();
        let mut state = SearchState::new(&m, 2);
        let mut evaluator = SpreadEvaluator::new();
        state.assign_ride(RideIndex::new(2), CarIndex::new(0), 10);
        assert!(Decision::try_new(
            RideIndex::new(2),
            CarIndex::new(1),
            &m,
            &state,
            &mut evaluator
        )
        .is_none());
    }

    #[test]
    fn test_collect_ride_decisions() {
        let m = model();
        let mut state = SearchState::new(&m, 2);
        let mut evaluator = SpreadEvaluator::new();
        state.assign_ride(RideIndex::new(0), CarIndex::new(0), 10);

        let mut out = Vec::new();
        collect_ride_decisions(&mut out, RideIndex::new(2), &m, &state, &mut evaluator);
        let cars: Vec<_> = out.iter().map(|d| d.car_index().get()).collect();
        assert_eq!(cars, vec![0, 1]);
    }

    #[test]
    fn test_display() {
        let d = Decision::new(RideIndex::new(1), CarIndex::new(0), 7i64);
        assert_eq!(
            format!("{}", d),
            "Decision(ride: RideIndex(1), car: CarIndex(0), bound: 7)"
        );
    }
}
