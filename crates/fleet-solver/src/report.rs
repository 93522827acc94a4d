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

//! JSON schedule report.
//!
//! Only built from a successful [`RideAssignment`], so a run that fails in
//! either phase never leaves a report behind.

use crate::pipeline::RideAssignment;
use fleet_model::{index::RideIndex, model::Model};
use fleet_search::num::SolverNumeric;
use serde::{Deserialize, Serialize};
use std::{
    fs::File,
    io::{BufWriter, Write},
    path::Path,
};

#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Could not serialize report: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RideEntry {
    pub start: i64,
    pub end: i64,
    pub car: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleReport {
    pub num_cars: usize,
    pub spread: i64,
    /// `"optimal"` or `"feasible"`.
    pub feasibility_status: String,
    pub balancing_status: String,
    pub car_durations: Vec<i64>,
    pub rides: Vec<RideEntry>,
}

impl ScheduleReport {
    /// # Panics
    ///
    /// Panics if `assignment` was not computed for `model`.
    pub fn new<T>(model: &Model<T>, assignment: &RideAssignment<T>) -> Self
    where
        T: SolverNumeric,
    {
        let cars = assignment.assignment();
        assert_eq!(
            cars.len(),
            model.num_rides(),
            "called `ScheduleReport::new` with an assignment for another model"
        );

        let rides = cars
            .iter()
            .enumerate()
            .map(|(i, &car)| {
                let ride = model.ride(RideIndex::new(i));
                RideEntry {
                    start: ride.start().into(),
                    end: ride.end().into(),
                    car,
                }
            })
            .collect();

        Self {
            num_cars: assignment.num_cars(),
            spread: assignment.spread().into(),
            feasibility_status: assignment.feasibility_status().to_string(),
            balancing_status: assignment.balancing_status().to_string(),
            car_durations: assignment
                .car_durations()
                .iter()
                .map(|&d| d.into())
                .collect(),
            rides,
        }
    }

    pub fn to_json(&self) -> Result<String, ReportError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn write_to<W>(&self, writer: W) -> Result<(), ReportError>
    where
        W: Write,
    {
        let mut writer = BufWriter::new(writer);
        serde_json::to_writer_pretty(&mut writer, self)?;
        writer.write_all(b"\n")?;
        writer.flush()?;
        Ok(())
    }

    pub fn write_to_path<P>(&self, path: P) -> Result<(), ReportError>
    where
        P: AsRef<Path>,
    {
        self.write_to(File::create(path)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::Pipeline;

    #[test]
    fn test_report_matches_assignment() {
        let model = Model::<i64>::from_rides([(0, 10), (10, 20), (5, 8)]).unwrap();
        let assignment = Pipeline::new().run_model(&model).unwrap();
        let report = ScheduleReport::new(&model, &assignment);

        assert_eq!(report.num_cars, 2);
        assert_eq!(report.feasibility_status, "optimal");
        assert_eq!(report.rides.len(), 3);
        assert_eq!(report.rides[2], RideEntry { start: 5, end: 8, car: report.rides[2].car });
        assert_eq!(report.car_durations.iter().sum::<i64>(), 23);
        assert_eq!(
            report.spread,
            report.car_durations.iter().max().unwrap() - report.car_durations.iter().min().unwrap()
        );
    }

    #[test]
    fn test_json_round_trip() {
        let model = Model::<i64>::from_rides([(0, 10), (5, 15)]).unwrap();
        let assignment = Pipeline::new().run_model(&model).unwrap();
        let report = ScheduleReport::new(&model, &assignment);

        let mut buffer = Vec::new();
        report.write_to(&mut buffer).unwrap();
        let parsed: ScheduleReport = serde_json::from_slice(&buffer).unwrap();
        assert_eq!(parsed, report);
        assert!(report.to_json().unwrap().contains("\"balancing_status\": \"optimal\""));
    }
}
