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

//! Most-constrained-ride branching.
//!
//! Picks the unassigned ride with the fewest cars left that can take it
//! (ties: longer ride, then lower index). A ride with no car left yields no
//! decisions, which turns the node into a dead end immediately instead of
//! several levels deeper.

use crate::{
    branching::decision::{collect_ride_decisions, CandidateIter, Decision, DecisionBuilder},
    eval::evaluator::ObjectiveEvaluator,
    state::SearchState,
};
use fleet_model::model::Model;
use fleet_search::num::SolverNumeric;
use std::cmp::Reverse;

#[derive(Debug, Clone, Default)]
pub struct MostConstrainedBuilder<T> {
    candidates: Vec<Decision<T>>,
}

impl<T> MostConstrainedBuilder<T> {
    pub fn new() -> Self {
        Self {
            candidates: Vec::new(),
        }
    }

    pub fn preallocated(num_cars: usize) -> Self {
        Self {
            candidates: Vec::with_capacity(num_cars),
        }
    }
}

impl<T, E> DecisionBuilder<T, E> for MostConstrainedBuilder<T>
where
    T: SolverNumeric,
    E: ObjectiveEvaluator<T>,
{
    type DecisionIterator<'a>
        = CandidateIter<'a, T>
    where
        Self: 'a,
        T: 'a,
        E: 'a;

    fn name(&self) -> &str {
        "MostConstrainedBuilder"
    }

    fn next_decision<'a>(
        &'a mut self,
        evaluator: &'a mut E,
        model: &'a Model<T>,
        state: &'a SearchState<T>,
    ) -> Self::DecisionIterator<'a> {
        self.candidates.clear();

        let next_ride = state.unassigned_rides().min_by_key(|&ride| {
            (
                state.num_feasible_cars(model, ride),
                Reverse(model.ride_duration(ride)),
                ride.get(),
            )
        });

        if let Some(ride) = next_ride {
            collect_ride_decisions(&mut self.candidates, ride, model, state, evaluator);
            self.candidates.sort_by_key(|d| {
                (
                    d.bound(),
                    state.car_load(d.car_index()),
                    d.car_index().get(),
                )
            });
        }

        self.candidates.iter().rev().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::eval::spread::SpreadEvaluator;
    use fleet_model::index::{CarIndex, RideIndex};

    #[test]
    fn test_picks_ride_with_fewest_options() {
        // ride 0 and ride 1 overlap, ride 2 is free
        let m = Model::from_rides([(0i64, 10), (5, 15), (20, 22)]).unwrap();
        let mut state = SearchState::new(&m, 2);
        state.assign_ride(RideIndex::new(0), CarIndex::new(0), 10);
        let mut evaluator = SpreadEvaluator::new();
        let mut builder = MostConstrainedBuilder::new();

        let decisions: Vec<_> = builder
            .next_decision(&mut evaluator, &m, &state)
            .collect();
        // ride 1 only fits car 1, ride 2 fits both
        assert_eq!(decisions.len(), 1);
        assert_eq!(decisions[0].ride_index(), RideIndex::new(1));
        assert_eq!(decisions[0].car_index(), CarIndex::new(1));
    }

    #[test]
    fn test_dead_end_yields_nothing() {
        let m = Model::from_rides([(0i64, 10), (0, 10), (0, 10)]).unwrap();
        let mut state = SearchState::new(&m, 2);
        state.assign_ride(RideIndex::new(0), CarIndex::new(0), 10);
        state.assign_ride(RideIndex::new(1), CarIndex::new(1), 10);
        let mut evaluator = SpreadEvaluator::new();
        let mut builder = MostConstrainedBuilder::preallocated(2);

        assert_eq!(
            builder.next_decision(&mut evaluator, &m, &state).count(),
            0
        );
    }
}
