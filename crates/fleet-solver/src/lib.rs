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

//! # Fleet Solver
//!
//! Assigns rides to the smallest number of cars such that no car serves two
//! overlapping rides, then balances the busy time of those cars.
//!
//! ## Modules
//!
//! - `feasibility`: Minimum number of cars via a sweep over the rides.
//! - `balancing`: Portfolio of branch-and-bound strategies minimising the
//!   spread of car durations at a fixed number of cars.
//! - `solver`: Generic portfolio orchestrator with a builder, per-thread
//!   monitor stacks, shared incumbent and unified outcome construction.
//! - `pipeline`: Both phases in sequence under one time budget.
//! - `config`: JSON pipeline configuration.
//! - `report`: JSON schedule report.
//! - `error`: Pipeline errors.
//!
//! ## Usage
//!
//! ```rust
//! use fleet_solver::pipeline::Pipeline;
//!
//! let result = Pipeline::new().run([(0i64, 10), (5, 15)]).unwrap();
//! assert_eq!(result.num_cars(), 2);
//! assert_eq!(result.spread(), 0);
//! ```

pub mod balancing;
pub mod config;
pub mod error;
pub mod feasibility;
pub mod pipeline;
pub mod report;
pub mod solver;
