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

//! # Solution Count Monitor
//!
//! Counts improving solutions in a shared `AtomicU64`. Several monitors,
//! typically one per portfolio thread, can share the counter so that an
//! optional limit applies to the portfolio as a whole.

use crate::monitor::search_monitor::{SearchCommand, SearchMonitor};
use fleet_model::{model::Model, solution::Solution};
use num_traits::{PrimInt, Signed};
use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Debug)]
pub struct SolutionMonitor<'a, T> {
    solutions_found: &'a AtomicU64,
    solution_limit: Option<u64>,
    _phantom: std::marker::PhantomData<T>,
}

impl<'a, T> SolutionMonitor<'a, T> {
    #[inline]
    pub fn new(solutions_found: &'a AtomicU64, solution_limit: Option<u64>) -> Self {
        Self {
            solutions_found,
            solution_limit,
            _phantom: std::marker::PhantomData,
        }
    }

    #[inline]
    pub fn with_limit(solutions_found: &'a AtomicU64, limit: u64) -> Self {
        Self::new(solutions_found, Some(limit))
    }

    #[inline]
    pub fn without_limit(solutions_found: &'a AtomicU64) -> Self {
        Self::new(solutions_found, None)
    }

    #[inline]
    fn reached_limit(&self) -> bool {
        self.solution_limit
            .is_some_and(|limit| self.solutions_found.load(Ordering::Relaxed) >= limit)
    }
}

impl<'a, T> SearchMonitor<T> for SolutionMonitor<'a, T>
where
    T: PrimInt + Signed,
{
    fn name(&self) -> &str {
        "SolutionMonitor"
    }

    fn on_enter_search(&mut self, _model: &Model<T>) {}

    fn on_exit_search(&mut self) {}

    fn on_solution_found(&mut self, _solution: &Solution<T>) {
        self.solutions_found.fetch_add(1, Ordering::Relaxed);
    }

    fn on_step(&mut self) {}

    fn search_command(&self) -> SearchCommand {
        if self.reached_limit() {
            SearchCommand::Terminate("global solution limit reached".to_string())
        } else {
            SearchCommand::Continue
        }
    }
}

#[cfg(test)]
mod tests {
    use super::SolutionMonitor;
    use crate::monitor::search_monitor::{SearchCommand, SearchMonitor};
    use fleet_model::{index::CarIndex, solution::Solution};
    use std::sync::{atomic::AtomicU64, Arc};
    use std::thread;

    fn dummy_solution(objective: i64) -> Solution<i64> {
        Solution::new(objective, vec![CarIndex::new(0)], vec![objective])
    }

    #[test]
    fn test_terminates_at_limit() {
        let counter = AtomicU64::new(0);
        let mut monitor = SolutionMonitor::<i64>::with_limit(&counter, 2);
        assert_eq!(monitor.search_command(), SearchCommand::Continue);
        monitor.on_solution_found(&dummy_solution(10));
        assert_eq!(monitor.search_command(), SearchCommand::Continue);
        monitor.on_solution_found(&dummy_solution(5));
        assert!(matches!(monitor.search_command(), SearchCommand::Terminate(_)));
    }

    #[test]
    fn test_without_limit_only_counts() {
        let counter = AtomicU64::new(0);
        let mut monitor = SolutionMonitor::<i64>::without_limit(&counter);
        for obj in 0..100 {
            monitor.on_solution_found(&dummy_solution(obj));
        }
        assert_eq!(counter.into_inner(), 100);
    }

    #[test]
    fn test_monitors_share_global_counter_across_threads() {
        let counter = Arc::new(AtomicU64::new(0));
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let c = Arc::clone(&counter);
                thread::spawn(move || {
                    let mut m = SolutionMonitor::<i64>::with_limit(c.as_ref(), 10);
                    for obj in 0..3 {
                        m.on_solution_found(&dummy_solution(obj));
                    }
                    m.search_command()
                })
            })
            .collect();

        let commands: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert!(commands
            .iter()
            .any(|c| matches!(c, SearchCommand::Terminate(_))));
    }
}
