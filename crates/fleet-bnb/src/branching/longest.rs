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

//! Longest-ride-first branching.
//!
//! Places long rides while every car still has room to absorb them, which is
//! the classic LPT intuition for load balancing. Cars are tried by the bound
//! the evaluator attaches to the move, then by load, so the child that keeps
//! the loads closest together is explored first.

use crate::{
    branching::decision::{collect_ride_decisions, CandidateIter, Decision, DecisionBuilder},
    eval::evaluator::ObjectiveEvaluator,
    state::SearchState,
};
use fleet_model::{index::RideIndex, model::Model};
use fleet_search::num::SolverNumeric;
use std::cmp::Reverse;

#[derive(Debug, Clone, Default)]
pub struct LongestRideFirstBuilder<T> {
    order: Vec<RideIndex>,
    candidates: Vec<Decision<T>>,
}

impl<T> LongestRideFirstBuilder<T> {
    pub fn new() -> Self {
        Self {
            order: Vec::new(),
            candidates: Vec::new(),
        }
    }

    pub fn preallocated(num_rides: usize, num_cars: usize) -> Self {
        Self {
            order: Vec::with_capacity(num_rides),
            candidates: Vec::with_capacity(num_cars),
        }
    }
}

impl<T, E> DecisionBuilder<T, E> for LongestRideFirstBuilder<T>
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
        "LongestRideFirstBuilder"
    }

    /// Ranks rides by duration, longest first; ties keep start order.
    fn prepare(&mut self, model: &Model<T>) {
        self.order.clear();
        self.order.extend_from_slice(model.rides_by_start());
        self.order
            .sort_by_key(|&ride| Reverse(model.ride_duration(ride)));
    }

    fn next_decision<'a>(
        &'a mut self,
        evaluator: &'a mut E,
        model: &'a Model<T>,
        state: &'a SearchState<T>,
    ) -> Self::DecisionIterator<'a> {
        if self.order.len() != model.num_rides() {
            <Self as DecisionBuilder<T, E>>::prepare(self, model);
        }
        self.candidates.clear();

        let next_ride = self
            .order
            .iter()
            .copied()
            .find(|&ride| !state.is_ride_assigned(ride));

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
