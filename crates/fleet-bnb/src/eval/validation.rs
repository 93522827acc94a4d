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

//! Admissibility check for objective evaluators.
//!
//! Pruning is only correct if bounds never exceed the objective of a
//! reachable complete assignment. For small models this harness enumerates
//! every ride to car mapping, keeps the conflict-free ones and compares their
//! objectives against the bounds the evaluator reports at the root. It is a
//! development aid: the engine runs it in debug builds and models with more
//! than `max_assignments` mappings are skipped.

use crate::{eval::evaluator::ObjectiveEvaluator, state::SearchState};
use fleet_model::{
    index::{CarIndex, RideIndex},
    model::Model,
};
use fleet_search::num::SolverNumeric;

/// Returns the smallest objective over all conflict-free assignments of
/// `model` onto `num_cars` cars, or `None` if none exists or the model has
/// more than `max_assignments` mappings.
pub fn brute_force_optimum<T, E>(
    evaluator: &E,
    model: &Model<T>,
    num_cars: usize,
    max_assignments: usize,
) -> Option<T>
where
    T: SolverNumeric,
    E: ObjectiveEvaluator<T>,
{
    let num_rides = model.num_rides();
    let total = u32::try_from(num_rides)
        .ok()
        .and_then(|n| num_cars.checked_pow(n))?;
    if num_cars == 0 || total > max_assignments {
        return None;
    }

    let mut cars = vec![0usize; num_rides];
    let mut loads = vec![T::zero(); num_cars];
    let mut best: Option<T> = None;

    loop {
        let valid = (0..num_rides).all(|a| {
            model
                .conflicts()
                .neighbors(RideIndex::new(a))
                .all(|b| cars[a] != cars[b.get()])
        });
        if valid {
            loads.iter_mut().for_each(|l| *l = T::zero());
            for (ride, &car) in cars.iter().enumerate() {
                loads[car] = loads[car] + model.ride_duration(RideIndex::new(ride));
            }
            let objective = evaluator.objective(&loads);
            best = Some(best.map_or(objective, |b| b.min(objective)));
        }

        // odometer increment
        let mut position = 0;
        loop {
            if position == num_rides {
                return best;
            }
            cars[position] += 1;
            if cars[position] < num_cars {
                break;
            }
            cars[position] = 0;
            position += 1;
        }
    }
}

/// Checks that the root bound and the bound of the first root decision are
/// admissible on `model`. Returns `true` when no violation is found or the
/// model is too large to enumerate.
pub fn is_admissible_evaluator_exhaustive<T, E>(
    evaluator: &mut E,
    model: &Model<T>,
    num_cars: usize,
    max_assignments: usize,
) -> bool
where
    T: SolverNumeric,
    E: ObjectiveEvaluator<T>,
{
    if model.num_rides() == 0 || num_cars == 0 {
        return true;
    }

    let optimum = brute_force_optimum(evaluator, model, num_cars, max_assignments);
    let Some(optimum) = optimum else {
        return true;
    };

    let root = SearchState::new(model, num_cars);
    let root_ok = match evaluator.lower_bound(model, &root) {
        Some(bound) => bound <= optimum,
        None => false,
    };

    // Relabelling cars puts ride 0 on car 0 in some optimal assignment.
    let first_ok = match evaluator.evaluate_assignment(
        model,
        &root,
        RideIndex::new(0),
        CarIndex::new(0),
    ) {
        Some(bound) => bound <= optimum,
        None => false,
    };

    root_ok && first_ok
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::eval::spread::SpreadEvaluator;

    #[test]
    fn test_brute_force_optimum() {
        let m = Model::from_rides([(0i64, 10), (5, 15), (20, 24)]).unwrap();
        let e = SpreadEvaluator::new();
        // loads {10 + 4, 10} or {10, 10 + 4}: spread 4
        assert_eq!(brute_force_optimum(&e, &m, 2, 10_000), Some(4));
        // one car cannot hold the overlapping pair
        assert_eq!(brute_force_optimum(&e, &m, 1, 10_000), None);
        // too many mappings
        assert_eq!(brute_force_optimum(&e, &m, 2, 4), None);
    }

    #[test]
    fn test_spread_evaluator_is_admissible_on_small_models() {
        let instances: [&[(i64, i64)]; 4] = [
            &[(0, 10), (10, 20)],
            &[(0, 10), (5, 15), (12, 30), (16, 18)],
            &[(0, 3), (1, 9), (2, 4), (5, 11), (8, 13)],
            &[(0, 10), (0, 10), (0, 10)],
        ];
        for rides in instances {
            let m = Model::from_rides(rides.iter().copied()).unwrap();
            let mut e = SpreadEvaluator::new();
            for k in m.stabbing_number()..=m.stabbing_number() + 1 {
                assert!(is_admissible_evaluator_exhaustive(&mut e, &m, k, 100_000));
            }
        }
    }
}
