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

//! # Pipeline Configuration
//!
//! `PipelineConfig` is read from JSON. Every key is optional; missing keys
//! take the defaults below.
//!
//! ```json
//! {
//!     "nb_rides": 20,
//!     "min_ride_duration": 15,
//!     "max_ride_duration": 120,
//!     "horizon": 1440,
//!     "max_running_time_in_seconds": 30,
//!     "phase_split": 0.3,
//!     "seed": 42,
//!     "output": "schedule.json",
//!     "warm_start": true
//! }
//! ```
//!
//! `phase_split` is the share of `max_running_time_in_seconds` given to the
//! feasibility phase; the balancing phase gets the rest.

use serde::{Deserialize, Serialize};
use std::{
    fs::File,
    io::{BufReader, Read},
    path::{Path, PathBuf},
    time::Duration,
};

/// The error type for reading and validating a configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Malformed configuration: {0}")]
    Json(#[from] serde_json::Error),
    #[error("nb_rides must be positive")]
    NoRides,
    #[error("ride durations must lie in a non-empty range of positive values, got [{min}, {max})")]
    InvalidDurationRange { min: i64, max: i64 },
    #[error("the horizon must be positive, got {0}")]
    InvalidHorizon(i64),
    #[error("max_running_time_in_seconds must be positive and finite, got {0}")]
    InvalidRunningTime(f64),
    #[error("phase_split must lie strictly between 0 and 1, got {0}")]
    InvalidPhaseSplit(f64),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Number of rides to generate when no instance is given.
    pub nb_rides: usize,
    pub min_ride_duration: i64,
    /// Exclusive upper end of the generated ride durations.
    pub max_ride_duration: i64,
    /// Generated rides start in `[0, horizon)`. One day in minutes by default.
    pub horizon: i64,
    /// Wall-clock budget for both phases together.
    pub max_running_time_in_seconds: f64,
    pub phase_split: f64,
    /// Seed for ride generation. `None` draws one from the OS.
    pub seed: Option<u64>,
    /// Where the schedule report is written.
    #[serde(alias = "save_plot_filename")]
    pub output: Option<PathBuf>,
    /// Seed the balancing search with the feasibility witness.
    pub warm_start: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            nb_rides: 20,
            min_ride_duration: 15,
            max_ride_duration: 120,
            horizon: 1440,
            max_running_time_in_seconds: 30.0,
            phase_split: 0.3,
            seed: None,
            output: None,
            warm_start: true,
        }
    }
}

impl PipelineConfig {
    /// Reads and validates a configuration from a JSON file.
    pub fn from_path<P>(path: P) -> Result<Self, ConfigError>
    where
        P: AsRef<Path>,
    {
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file))
    }

    /// Reads and validates a configuration from any JSON reader.
    pub fn from_reader<R>(reader: R) -> Result<Self, ConfigError>
    where
        R: Read,
    {
        let config: PipelineConfig = serde_json::from_reader(reader)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and validates a configuration from a JSON string.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Result<Self, ConfigError> {
        let config: PipelineConfig = serde_json::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.nb_rides == 0 {
            return Err(ConfigError::NoRides);
        }
        if self.min_ride_duration <= 0 || self.min_ride_duration >= self.max_ride_duration {
            return Err(ConfigError::InvalidDurationRange {
                min: self.min_ride_duration,
                max: self.max_ride_duration,
            });
        }
        if self.horizon <= 0 {
            return Err(ConfigError::InvalidHorizon(self.horizon));
        }
        if !self.max_running_time_in_seconds.is_finite() || self.max_running_time_in_seconds <= 0.0
        {
            return Err(ConfigError::InvalidRunningTime(
                self.max_running_time_in_seconds,
            ));
        }
        if !(self.phase_split > 0.0 && self.phase_split < 1.0) {
            return Err(ConfigError::InvalidPhaseSplit(self.phase_split));
        }
        Ok(())
    }

    #[inline]
    pub fn time_limit(&self) -> Duration {
        Duration::from_secs_f64(self.max_running_time_in_seconds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_keys_take_defaults() {
        let config = PipelineConfig::from_str("{}").unwrap();
        assert_eq!(config, PipelineConfig::default());
        assert_eq!(config.phase_split, 0.3);
        assert_eq!(config.time_limit(), Duration::from_secs(30));
    }

    #[test]
    fn test_reads_legacy_keys() {
        let config = PipelineConfig::from_str(
            r#"{
                "nb_rides": 50,
                "min_ride_duration": 10,
                "max_ride_duration": 60,
                "max_running_time_in_seconds": 5,
                "save_plot_filename": "rides.json"
            }"#,
        )
        .unwrap();
        assert_eq!(config.nb_rides, 50);
        assert_eq!(config.min_ride_duration, 10);
        assert_eq!(config.max_ride_duration, 60);
        assert_eq!(config.time_limit(), Duration::from_secs(5));
        assert_eq!(config.output, Some(PathBuf::from("rides.json")));
        assert!(config.warm_start);
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(matches!(
            PipelineConfig::from_str(r#"{"nb_rides": 0}"#),
            Err(ConfigError::NoRides)
        ));
        assert!(matches!(
            PipelineConfig::from_str(r#"{"min_ride_duration": 30, "max_ride_duration": 30}"#),
            Err(ConfigError::InvalidDurationRange { min: 30, max: 30 })
        ));
        assert!(matches!(
            PipelineConfig::from_str(r#"{"horizon": 0}"#),
            Err(ConfigError::InvalidHorizon(0))
        ));
        assert!(matches!(
            PipelineConfig::from_str(r#"{"max_running_time_in_seconds": 0}"#),
            Err(ConfigError::InvalidRunningTime(_))
        ));
        assert!(matches!(
            PipelineConfig::from_str(r#"{"phase_split": 1.0}"#),
            Err(ConfigError::InvalidPhaseSplit(_))
        ));
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(
            PipelineConfig::from_str("{ nb_rides: 3 }"),
            Err(ConfigError::Json(_))
        ));
    }
}
