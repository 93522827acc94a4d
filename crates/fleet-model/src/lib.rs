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

//! # Fleet Model
//!
//! The domain model of the ride assignment problem: a fixed, offline set of
//! rides (half-open time windows) that must be served by interchangeable cars
//! such that no car serves two overlapping rides.
//!
//! ## Architecture
//!
//! * **`index`**: Strongly typed `RideIndex` and `CarIndex`.
//! * **`model`**: The immutable `Model` and its validating `ModelBuilder`.
//!   Invalid rides (`start >= end`) and empty ride sets are rejected here,
//!   before any solver sees the data.
//! * **`conflict`**: The `ConflictGraph`, computed once over all ride pairs and
//!   shared by every solver.
//! * **`solution`**: A ride to car assignment with its per-car busy time and spread.
//! * **`loading`**: A text loader for ride instances.
//! * **`generate`**: Seeded random instance generation for experiments and tests.

pub mod conflict;
pub mod generate;
pub mod index;
pub mod loading;
pub mod model;
pub mod solution;
