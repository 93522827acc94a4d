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

use crate::{conflict::ConflictGraph, index::RideIndex};
use fleet_core::{
    algorithm::{active_at, max_overlap_witness},
    math::interval::ClosedOpenInterval,
};
use num_traits::{PrimInt, Signed};
use std::fmt::{Debug, Display};

/// Represents the size of the balancing search tree in log space.
///
/// Assigning `N` rides one by one to `K` cars yields `K^k` nodes at depth
/// `k`, so the whole tree has `Σ_{k=0..N} K^k` nodes. The value is far beyond
/// any integer type for realistic instances and is stored as `log10`.
#[repr(transparent)]
#[derive(Clone, Copy, PartialEq, PartialOrd)]
pub struct Complexity {
    log_val: f64,
}

impl Complexity {
    /// Calculates the complexity for a given number of rides and cars.
    pub fn new(num_rides: usize, num_cars: usize) -> Self {
        if num_rides == 0 || num_cars == 0 {
            return Complexity { log_val: 0.0 };
        }

        let branching_log = (num_cars as f64).log10();
        let log10_add = |a: f64, b: f64| -> f64 {
            let max = a.max(b);
            let min = a.min(b);
            max + (1.0 + 10.0_f64.powf(min - max)).log10()
        };

        let mut level_log = 0.0;
        let mut total_log = 0.0;
        for _ in 0..num_rides {
            level_log += branching_log;
            total_log = log10_add(total_log, level_log);
        }

        Complexity { log_val: total_log }
    }

    /// Returns the percentage of the search tree covered by `nodes_explored`
    /// nodes, or `None` if the tree size is not representable.
    pub fn coverage(&self, nodes_explored: u64) -> Option<f64> {
        if self.log_val > 15.0 {
            return Some(0.0);
        }
        let total_size = 10.0_f64.powf(self.log_val);
        if total_size == 0.0 {
            return None;
        }
        Some((nodes_explored as f64 / total_size) * 100.0)
    }

    #[inline]
    pub fn exponent(&self) -> u64 {
        self.log_val.floor() as u64
    }

    #[inline]
    pub fn mantissa(&self) -> f64 {
        10.0_f64.powf(self.log_val - self.log_val.floor())
    }

    /// Returns the raw `log10` value.
    #[inline]
    pub fn raw(&self) -> f64 {
        self.log_val
    }
}

impl std::fmt::Display for Complexity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.2} × 10^{}", self.mantissa(), self.exponent())
    }
}

impl std::fmt::Debug for Complexity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Complexity({})", self)
    }
}

/// The reasons a ride set is rejected before solving.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ModelError<T> {
    /// No rides were supplied.
    #[error("the ride set is empty")]
    EmptyRideSet,
    /// A ride does not start strictly before it ends.
    #[error("ride {index} is invalid: start {start} is not before end {end}")]
    InvalidRide { index: usize, start: T, end: T },
    /// The sum of all ride durations does not fit into the time type.
    #[error("the total ride duration overflows the time type")]
    DurationOverflow,
}

/// The immutable, validated ride set consumed by every solver.
///
/// Data is laid out per ride (`rides[i]`, `durations[i]`) and indexed by
/// `RideIndex`, which is the ride's position in the input sequence. The
/// conflict graph and the stabbing number are derived once at build time.
///
/// Construction goes through [`ModelBuilder::build`], which guarantees:
/// - at least one ride,
/// - `start < end` for every ride,
/// - the total duration fits into `T`.
#[derive(Clone)]
pub struct Model<T>
where
    T: PrimInt + Signed,
{
    rides: Vec<ClosedOpenInterval<T>>,     // len = num_rides
    durations: Vec<T>,                     // len = num_rides
    rides_by_start: Vec<RideIndex>,        // len = num_rides
    total_duration: T,
    stabbing_number: usize,
    busiest_instant: T,
    conflicts: ConflictGraph,
}

impl<T> Model<T>
where
    T: PrimInt + Signed,
{
    /// Builds a model directly from `(start, end)` pairs.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use fleet_model::model::Model;
    /// let model = Model::<i64>::from_rides([(0, 10), (5, 15)]).unwrap();
    /// assert_eq!(model.num_rides(), 2);
    /// assert_eq!(model.stabbing_number(), 2);
    /// ```
    pub fn from_rides<I>(rides: I) -> Result<Self, ModelError<T>>
    where
        I: IntoIterator<Item = (T, T)>,
    {
        let mut builder = ModelBuilder::new();
        builder.add_rides(rides);
        builder.build()
    }

    #[inline]
    pub fn num_rides(&self) -> usize {
        self.rides.len()
    }

    /// Returns the time window of a ride.
    ///
    /// # Panics
    ///
    /// Panics if `ride_index` is out of bounds.
    #[inline]
    pub fn ride(&self, ride_index: RideIndex) -> ClosedOpenInterval<T> {
        let index = ride_index.get();
        debug_assert!(
            index < self.num_rides(),
            "called `Model::ride` with ride index out of bounds: the len is {} but the index is {}",
            self.num_rides(),
            index
        );
        self.rides[index]
    }

    #[inline]
    pub fn rides(&self) -> &[ClosedOpenInterval<T>] {
        &self.rides
    }

    /// Returns `end - start` of a ride.
    ///
    /// # Panics
    ///
    /// Panics if `ride_index` is out of bounds.
    #[inline]
    pub fn ride_duration(&self, ride_index: RideIndex) -> T {
        let index = ride_index.get();
        debug_assert!(
            index < self.num_rides(),
            "called `Model::ride_duration` with ride index out of bounds: the len is {} but the index is {}",
            self.num_rides(),
            index
        );
        self.durations[index]
    }

    #[inline]
    pub fn ride_durations(&self) -> &[T] {
        &self.durations
    }

    /// Returns the sum of all ride durations.
    #[inline]
    pub fn total_duration(&self) -> T {
        self.total_duration
    }

    /// Returns ride indices ordered by `(start, end, index)`.
    #[inline]
    pub fn rides_by_start(&self) -> &[RideIndex] {
        &self.rides_by_start
    }

    /// Returns the maximum number of rides active at one instant. This is the
    /// minimum number of cars any valid assignment needs.
    #[inline]
    pub fn stabbing_number(&self) -> usize {
        self.stabbing_number
    }

    /// Returns the earliest instant at which `stabbing_number` rides are active.
    #[inline]
    pub fn busiest_instant(&self) -> T {
        self.busiest_instant
    }

    #[inline]
    pub fn conflicts(&self) -> &ConflictGraph {
        &self.conflicts
    }

    /// Returns `true` if the two rides overlap and need different cars.
    #[inline]
    pub fn rides_conflict(&self, a: RideIndex, b: RideIndex) -> bool {
        self.conflicts.conflicts(a, b)
    }

    /// Returns the size of the balancing search space for `num_cars` cars.
    #[inline]
    pub fn complexity(&self, num_cars: usize) -> Complexity {
        Complexity::new(self.num_rides(), num_cars)
    }
}

impl<T> std::fmt::Debug for Model<T>
where
    T: PrimInt + Signed + Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Model")
            .field("rides", &self.rides)
            .field("durations", &self.durations)
            .field("total_duration", &self.total_duration)
            .field("stabbing_number", &self.stabbing_number)
            .field("busiest_instant", &self.busiest_instant)
            .field("num_conflicts", &self.conflicts.num_conflicts())
            .finish()
    }
}

impl<T> std::fmt::Display for Model<T>
where
    T: PrimInt + Signed + Display,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Model(num_rides: {}, num_conflicts: {}, stabbing_number: {})",
            self.num_rides(),
            self.conflicts.num_conflicts(),
            self.stabbing_number
        )
    }
}

/// Collects rides and validates them into a [`Model`].
///
/// Rides are stored as given and checked only in [`ModelBuilder::build`],
/// which reports the first offending ride by its input position.
///
/// # Examples
///
/// ```rust
/// # use fleet_model::model::{ModelBuilder, ModelError};
/// let mut builder = ModelBuilder::<i64>::new();
/// builder.add_ride(0, 10).add_ride(10, 5);
/// assert_eq!(
///     builder.build().unwrap_err(),
///     ModelError::InvalidRide { index: 1, start: 10, end: 5 }
/// );
/// ```
#[derive(Clone, Debug, Default)]
pub struct ModelBuilder<T> {
    rides: Vec<(T, T)>,
}

impl<T> ModelBuilder<T>
where
    T: PrimInt + Signed,
{
    #[inline]
    pub fn new() -> Self {
        Self { rides: Vec::new() }
    }

    #[inline]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            rides: Vec::with_capacity(capacity),
        }
    }

    #[inline]
    pub fn num_rides(&self) -> usize {
        self.rides.len()
    }

    /// Appends a ride `[start, end)`.
    #[inline]
    pub fn add_ride(&mut self, start: T, end: T) -> &mut Self {
        self.rides.push((start, end));
        self
    }

    /// Appends all rides from `rides`.
    pub fn add_rides<I>(&mut self, rides: I) -> &mut Self
    where
        I: IntoIterator<Item = (T, T)>,
    {
        self.rides.extend(rides);
        self
    }

    /// Validates the rides and builds the model, including its conflict graph.
    pub fn build(self) -> Result<Model<T>, ModelError<T>> {
        if self.rides.is_empty() {
            return Err(ModelError::EmptyRideSet);
        }

        let mut rides = Vec::with_capacity(self.rides.len());
        let mut durations = Vec::with_capacity(self.rides.len());
        let mut total_duration = T::zero();

        for (index, &(start, end)) in self.rides.iter().enumerate() {
            if start >= end {
                return Err(ModelError::InvalidRide { index, start, end });
            }
            let interval = ClosedOpenInterval::new_unchecked(start, end);
            let duration = interval.len();
            total_duration = total_duration
                .checked_add(&duration)
                .ok_or(ModelError::DurationOverflow)?;
            rides.push(interval);
            durations.push(duration);
        }

        let mut rides_by_start: Vec<RideIndex> = RideIndex::range(rides.len()).collect();
        rides_by_start.sort_by_key(|r| (rides[r.get()].start(), rides[r.get()].end(), r.get()));

        // Every ride is non-empty, so the sweep always finds a witness.
        let (stabbing_number, busiest_instant) =
            max_overlap_witness(&rides).unwrap_or((0, T::zero()));
        debug_assert_eq!(active_at(&rides, busiest_instant), stabbing_number);
        let conflicts = ConflictGraph::new(&rides);

        Ok(Model {
            rides,
            durations,
            rides_by_start,
            total_duration,
            stabbing_number,
            busiest_instant,
            conflicts,
        })
    }
}

impl<T> std::fmt::Display for ModelBuilder<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ModelBuilder(num_rides: {})", self.rides.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type IntegerType = i64;

    fn ri(i: usize) -> RideIndex {
        RideIndex::new(i)
    }

    #[test]
    fn test_build_derives_durations_and_total() {
        let model = Model::<IntegerType>::from_rides([(0, 10), (5, 15), (20, 27)]).unwrap();
        assert_eq!(model.num_rides(), 3);
        assert_eq!(model.ride_durations(), &[10, 10, 7]);
        assert_eq!(model.total_duration(), 27);
        assert_eq!(model.ride(ri(2)), ClosedOpenInterval::new(20, 27));
        assert_eq!(model.ride_duration(ri(1)), 10);
    }

    #[test]
    fn test_build_rejects_empty_ride_set() {
        let builder = ModelBuilder::<IntegerType>::new();
        assert_eq!(builder.build().unwrap_err(), ModelError::EmptyRideSet);
    }

    #[test]
    fn test_build_rejects_reversed_and_zero_length_rides() {
        let err = Model::<IntegerType>::from_rides([(0, 10), (10, 5)]).unwrap_err();
        assert_eq!(
            err,
            ModelError::InvalidRide {
                index: 1,
                start: 10,
                end: 5
            }
        );

        let err = Model::<IntegerType>::from_rides([(4, 4)]).unwrap_err();
        assert!(matches!(err, ModelError::InvalidRide { index: 0, .. }));
        assert_eq!(
            err.to_string(),
            "ride 0 is invalid: start 4 is not before end 4"
        );
    }

    #[test]
    fn test_build_rejects_duration_overflow() {
        let max = IntegerType::MAX;
        let err = Model::<IntegerType>::from_rides([(0, max), (0, max)]).unwrap_err();
        assert_eq!(err, ModelError::DurationOverflow);
    }

    #[test]
    fn test_rides_by_start_orders_by_start_then_end() {
        let model =
            Model::<IntegerType>::from_rides([(30, 40), (0, 20), (0, 10), (15, 16)]).unwrap();
        assert_eq!(model.rides_by_start(), &[ri(2), ri(1), ri(3), ri(0)]);
    }

    #[test]
    fn test_stabbing_number_and_conflicts() {
        let model = Model::<IntegerType>::from_rides([(0, 10), (10, 20)]).unwrap();
        assert_eq!(model.stabbing_number(), 1);
        assert!(!model.rides_conflict(ri(0), ri(1)));

        let model = Model::<IntegerType>::from_rides([(0, 10), (0, 10), (0, 10)]).unwrap();
        assert_eq!(model.stabbing_number(), 3);
        assert_eq!(model.conflicts().num_conflicts(), 3);
    }

    #[test]
    fn test_busiest_instant_is_where_the_peak_starts() {
        let model =
            Model::<IntegerType>::from_rides([(0, 10), (5, 15), (12, 30), (13, 14)]).unwrap();
        assert_eq!(model.stabbing_number(), 3);
        assert_eq!(model.busiest_instant(), 13);

        // Back-to-back rides never stack, so the first start is the peak.
        let model = Model::<IntegerType>::from_rides([(10, 20), (0, 10)]).unwrap();
        assert_eq!(model.busiest_instant(), 0);
    }

    #[test]
    fn test_complexity_grows_with_cars() {
        let model = Model::<IntegerType>::from_rides([(0, 10), (5, 15), (7, 9)]).unwrap();
        // One car: a single path of four nodes including the root.
        assert!((model.complexity(1).raw() - 4.0_f64.log10()).abs() < 1e-9);
        assert!(model.complexity(3).raw() > model.complexity(2).raw());
        assert_eq!(Complexity::new(0, 4).raw(), 0.0);
    }

    #[test]
    fn test_display() {
        let model = Model::<IntegerType>::from_rides([(0, 10), (5, 15)]).unwrap();
        assert_eq!(
            format!("{}", model),
            "Model(num_rides: 2, num_conflicts: 1, stabbing_number: 2)"
        );
    }
}
