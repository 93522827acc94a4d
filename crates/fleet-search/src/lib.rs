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

//! # Fleet Search
//!
//! Building blocks shared by every solver of the fleet workspace, independent
//! of the search technique behind them.
//!
//! - `result`: The tri-state outcome of a solve (optimal, feasible but not
//!   proven optimal, no solution) with its termination reason.
//! - `stats`: Aggregated solver statistics.
//! - `incumbent`: A thread-safe holder of the best solution found so far.
//! - `monitor`: Search monitors that observe a search and can stop it
//!   (time budgets, solution limits, cross-thread stop flags).
//! - `portfolio`: The trait implemented by solvers that run inside a parallel
//!   portfolio and share one incumbent.
//! - `num`: The numeric bound used across the solver crates.

pub mod incumbent;
pub mod monitor;
pub mod num;
pub mod portfolio;
pub mod result;
pub mod stats;
