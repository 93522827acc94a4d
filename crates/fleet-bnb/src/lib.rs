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

//! Fleet-BnB: branch-and-bound balancing of rides over cars
//!
//! Given a `fleet_model::Model<T>` and a number of cars, the solver searches
//! for a conflict-free ride to car assignment whose car durations are as even
//! as possible. Branching, evaluation, monitoring, and incumbent handling are
//! separate so strategies can be swapped without touching the engine.
//!
//! Core flow
//! - Provide a `Model<T>` and the number of cars.
//! - Choose a `branching::DecisionBuilder`.
//! - Choose an `eval::ObjectiveEvaluator`, usually `SpreadEvaluator`.
//! - Run `bnb::BnbSolver` directly, or as a member of a portfolio through
//!   `portfolio::BnbPortfolioSolver`.
//!
//! Assumptions and guarantees
//! - Bounds must be admissible, i.e. never above the objective of any
//!   completion; pruning relies on it.
//! - New rides only ever open the first empty car, so car relabelling never
//!   yields duplicate subtrees.
//! - Deterministic for deterministic builders and evaluators without a shared
//!   incumbent.
//!
//! Module map
//! - `bnb`: engine and search session.
//! - `branching`: decision builders.
//! - `eval`: objective interface, spread evaluator, validation helpers.
//! - `incumbent`: local or shared best-known objective.
//! - `monitor`: tree-search monitors.
//! - `portfolio`: adapter to the `fleet_search` portfolio API.
//! - `result`: outcomes with termination reasons.
//! - `stack`, `trail`, `state`: search bookkeeping.
//! - `stats`: counters and timing.

pub mod bnb;
pub mod branching;
pub mod eval;
pub mod incumbent;
pub mod monitor;
pub mod portfolio;
pub mod result;
pub mod stack;
pub mod state;
pub mod stats;
pub mod trail;
