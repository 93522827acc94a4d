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

//! Random ride instances.
//!
//! Rides start uniformly in `[0, horizon)` and last uniformly
//! `[min_duration, max_duration)` time units. The defaults describe one day in
//! minutes with rides between a quarter of an hour and two hours.

use crate::model::{Model, ModelBuilder, ModelError};
use num_traits::{PrimInt, Signed};
use rand::{distributions::uniform::SampleUniform, rngs::StdRng, Rng, SeedableRng};
use std::fmt::Debug;

/// Rejected generator parameters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GeneratorError<T> {
    #[error("the number of rides must be positive")]
    NoRides,
    #[error("the minimum ride duration must be positive, got {0}")]
    NonPositiveDuration(T),
    #[error("the duration range [{min}, {max}) is empty")]
    EmptyDurationRange { min: T, max: T },
    #[error("the horizon must be positive, got {0}")]
    NonPositiveHorizon(T),
    #[error("generated rides are invalid: {0}")]
    Model(#[from] ModelError<T>),
}

/// Generates random ride sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RideGenerator<T> {
    num_rides: usize,
    min_duration: T,
    max_duration: T,
    horizon: T,
}

impl<T> RideGenerator<T>
where
    T: PrimInt + Signed + SampleUniform + Debug,
{
    /// Creates a generator for `num_rides` rides with the default day profile
    /// (horizon 1440, durations in `[15, 120)`).
    pub fn new(num_rides: usize) -> Self {
        Self {
            num_rides,
            min_duration: <T as num_traits::NumCast>::from(15).unwrap_or_else(T::one),
            max_duration: <T as num_traits::NumCast>::from(120).unwrap_or_else(T::max_value),
            horizon: <T as num_traits::NumCast>::from(1440).unwrap_or_else(T::max_value),
        }
    }

    #[inline]
    pub fn durations(mut self, min_duration: T, max_duration: T) -> Self {
        self.min_duration = min_duration;
        self.max_duration = max_duration;
        self
    }

    #[inline]
    pub fn horizon(mut self, horizon: T) -> Self {
        self.horizon = horizon;
        self
    }

    #[inline]
    pub fn num_rides(&self) -> usize {
        self.num_rides
    }

    fn validate(&self) -> Result<(), GeneratorError<T>> {
        if self.num_rides == 0 {
            return Err(GeneratorError::NoRides);
        }
        if self.min_duration <= T::zero() {
            return Err(GeneratorError::NonPositiveDuration(self.min_duration));
        }
        if self.max_duration <= self.min_duration {
            return Err(GeneratorError::EmptyDurationRange {
                min: self.min_duration,
                max: self.max_duration,
            });
        }
        if self.horizon <= T::zero() {
            return Err(GeneratorError::NonPositiveHorizon(self.horizon));
        }
        Ok(())
    }

    /// Draws `(start, end)` pairs from `rng`.
    pub fn generate<R>(&self, rng: &mut R) -> Result<Vec<(T, T)>, GeneratorError<T>>
    where
        R: Rng + ?Sized,
    {
        self.validate()?;
        Ok((0..self.num_rides)
            .map(|_| {
                let start = rng.gen_range(T::zero()..self.horizon);
                let duration = rng.gen_range(self.min_duration..self.max_duration);
                (start, start.saturating_add(duration))
            })
            .collect())
    }

    /// Draws a validated model from a generator seeded with `seed`.
    pub fn generate_model(&self, seed: u64) -> Result<Model<T>, GeneratorError<T>> {
        let mut rng = StdRng::seed_from_u64(seed);
        let rides = self.generate(&mut rng)?;
        let mut builder = ModelBuilder::with_capacity(rides.len());
        builder.add_rides(rides);
        Ok(builder.build()?)
    }
}
