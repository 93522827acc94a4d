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

//! Incumbent handling for branch-and-bound.
//!
//! `IncumbentStore<T>` abstracts over where the best known objective lives:
//! - `NoSharedIncumbent<T>`: local only, starts at `T::max_value()`.
//! - `SharedIncumbentAdapter<'a, T>`: mirrors a `SharedIncumbent` that other
//!   portfolio members also publish to. `tighten(x)` returns `min(shared, x)`.
//!
//! When a search exhausts its tree without improving on a shared bound, the
//! shared solution is the optimum. `best_known` hands it back so the session
//! can report it as such.

use fleet_model::solution::Solution;
use fleet_search::{incumbent::SharedIncumbent, num::SolverNumeric};
use std::marker::PhantomData;

pub trait IncumbentStore<T>
where
    T: SolverNumeric,
{
    /// The bound to start pruning against.
    fn initial_upper_bound(&self) -> T;
    /// Combines the local best objective with the stored one.
    fn tighten(&self, current_local_best: T) -> T;
    /// Publishes a new solution.
    fn on_solution_found(&self, solution: &Solution<T>);
    /// The best solution held by the store, if any.
    fn best_known(&self) -> Option<Solution<T>>;
}

#[repr(transparent)]
#[derive(Debug)]
pub struct NoSharedIncumbent<T>(PhantomData<T>);

impl<T> Default for NoSharedIncumbent<T>
where
    T: SolverNumeric,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T> NoSharedIncumbent<T>
where
    T: SolverNumeric,
{
    #[inline(always)]
    pub fn new() -> Self {
        Self(PhantomData)
    }
}

impl<T> IncumbentStore<T> for NoSharedIncumbent<T>
where
    T: SolverNumeric,
{
    #[inline(always)]
    fn initial_upper_bound(&self) -> T {
        T::max_value()
    }

    #[inline(always)]
    fn tighten(&self, current_local_best: T) -> T {
        current_local_best
    }

    #[inline(always)]
    fn on_solution_found(&self, _: &Solution<T>) {}

    #[inline(always)]
    fn best_known(&self) -> Option<Solution<T>> {
        None
    }
}

#[repr(transparent)]
#[derive(Debug, Clone)]
pub struct SharedIncumbentAdapter<'a, T> {
    inner: &'a SharedIncumbent<T>,
}

impl<'a, T> SharedIncumbentAdapter<'a, T> {
    #[inline(always)]
    pub fn new(inner: &'a SharedIncumbent<T>) -> Self {
        Self { inner }
    }
}

impl<'a, T> IncumbentStore<T> for SharedIncumbentAdapter<'a, T>
where
    T: SolverNumeric,
{
    #[inline(always)]
    fn initial_upper_bound(&self) -> T {
        self.inner.upper_bound().into()
    }

    #[inline(always)]
    fn tighten(&self, current_local_best: T) -> T {
        let shared: T = self.inner.upper_bound().into();
        shared.min(current_local_best)
    }

    #[inline(always)]
    fn on_solution_found(&self, solution: &Solution<T>) {
        self.inner.try_install(solution);
    }

    #[inline(always)]
    fn best_known(&self) -> Option<Solution<T>> {
        self.inner.snapshot()
    }
}
