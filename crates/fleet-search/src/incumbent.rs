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

//! # Shared Incumbent
//!
//! The best solution found so far by any thread of a portfolio. The objective
//! of the incumbent is mirrored in an `AtomicI64` so that searches can tighten
//! their pruning bound without taking a lock; the solution itself lives behind
//! a `Mutex` and is the source of truth.
//!
//! `i64::MAX` in the atomic means that no solution has been installed yet.
//!
//! ```rust
//! use fleet_search::incumbent::SharedIncumbent;
//! use fleet_model::{index::CarIndex, solution::Solution};
//!
//! let inc: SharedIncumbent<i64> = SharedIncumbent::new();
//! let candidate = Solution::new(10, vec![CarIndex::new(0)], vec![10]);
//! assert!(inc.try_install(&candidate));
//! assert_eq!(inc.upper_bound(), 10);
//! ```

use fleet_model::solution::Solution;
use num_traits::{PrimInt, Signed};
use std::sync::{
    atomic::{AtomicI64, Ordering},
    Mutex, MutexGuard, PoisonError,
};

/// A concurrent holder for the best (incumbent) solution found during search.
///
/// The upper bound is read and written with `Ordering::Relaxed`. It only
/// serves to skip obviously worse candidates early; installation itself is
/// decided under the mutex.
#[derive(Debug)]
pub struct SharedIncumbent<T> {
    upper_bound: AtomicI64,
    solution: Mutex<Option<Solution<T>>>,
}

impl<T> Default for SharedIncumbent<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> std::fmt::Display for SharedIncumbent<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Incumbent(upper_bound: {})", self.upper_bound())
    }
}

impl<T> SharedIncumbent<T> {
    /// Creates a new shared incumbent with no solution installed.
    #[inline]
    pub fn new() -> Self {
        SharedIncumbent {
            upper_bound: AtomicI64::new(i64::MAX),
            solution: Mutex::new(None),
        }
    }

    /// Creates a shared incumbent seeded with `solution`.
    #[inline]
    pub fn with_solution(solution: Solution<T>) -> Self
    where
        T: PrimInt + Signed + Into<i64>,
    {
        SharedIncumbent {
            upper_bound: AtomicI64::new(solution.objective_value().into()),
            solution: Mutex::new(Some(solution)),
        }
    }

    /// Returns the current upper bound, `i64::MAX` if empty.
    #[inline]
    pub fn upper_bound(&self) -> i64 {
        self.upper_bound.load(Ordering::Relaxed)
    }

    /// Returns the current upper bound converted to `T`.
    #[inline]
    pub fn upper_bound_as(&self) -> Result<T, <T as TryFrom<i64>>::Error>
    where
        T: TryFrom<i64>,
    {
        T::try_from(self.upper_bound())
    }

    /// Returns `true` if a solution has been installed.
    #[inline]
    pub fn has_solution(&self) -> bool {
        self.upper_bound() != i64::MAX || self.lock().is_some()
    }

    /// Returns a clone of the current incumbent, if any.
    #[inline]
    pub fn snapshot(&self) -> Option<Solution<T>>
    where
        T: Clone,
    {
        self.lock().clone()
    }

    /// Attempts to install `candidate` as the new incumbent. Only strictly
    /// better candidates (lower objective) are installed.
    #[inline]
    pub fn try_install(&self, candidate: &Solution<T>) -> bool
    where
        T: PrimInt + Signed + Into<i64>,
    {
        let candidate_objective: i64 = candidate.objective_value().into();
        if candidate_objective >= self.upper_bound() {
            return false;
        }

        let mut guard = self.lock();
        // Re-check against the solution under the lock; the atomic may be stale.
        if let Some(current) = guard.as_ref() {
            let current_objective: i64 = current.objective_value().into();
            if candidate_objective >= current_objective {
                return false;
            }
        }

        *guard = Some(candidate.clone());
        self.upper_bound
            .store(candidate_objective, Ordering::Relaxed);
        true
    }

    #[inline]
    fn lock(&self) -> MutexGuard<'_, Option<Solution<T>>> {
        // The slot is only ever replaced whole, so a poisoned lock still holds a valid value.
        self.solution.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
