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

use clap::Parser;
use fleet_model::{
    generate::{GeneratorError, RideGenerator},
    loading::{LoadError, RideLoader},
    model::Model,
};
use fleet_solver::{
    config::{ConfigError, PipelineConfig},
    error::AssignError,
    pipeline::Pipeline,
    report::{ReportError, ScheduleReport},
};
use log::{error, info, LevelFilter};
use std::path::PathBuf;

type Time = i64;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("Failed to read the configuration, more details: {0}")]
    Config(#[from] ConfigError),
    #[error("Failed to load the instance, more details: {0}")]
    Load(#[from] LoadError<Time>),
    #[error("Failed to generate rides, more details: {0}")]
    Generate(#[from] GeneratorError<Time>),
    #[error("{0}")]
    Assign(#[from] AssignError),
    #[error("Failed to write the report, more details: {0}")]
    Report(#[from] ReportError),
}

/// Assigns rides to the fewest cars and balances the cars' busy time.
///
/// Rides are read from `--instance` or, without one, generated at random from
/// the configuration. Command line options override the configuration file.
#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// JSON configuration file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Ride instance in text format: the number of rides, then one
    /// `start end` pair per line. Lines starting with `#` are ignored.
    #[arg(long, verbatim_doc_comment)]
    instance: Option<PathBuf>,

    /// Number of rides to generate when no instance is given.
    #[arg(long)]
    rides: Option<usize>,

    /// Wall-clock budget in seconds for both phases together.
    #[arg(long)]
    time_limit: Option<f64>,

    /// Share of the time budget given to finding the minimum number of cars.
    #[arg(long)]
    phase_split: Option<f64>,

    /// Seed for ride generation.
    #[arg(long)]
    seed: Option<u64>,

    /// Where to write the JSON schedule report. Printed to stdout otherwise.
    #[arg(long)]
    output: Option<PathBuf>,

    /// Log search progress.
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    fn into_config(self) -> Result<(PipelineConfig, Option<PathBuf>), CliError> {
        let mut config = match &self.config {
            Some(path) => PipelineConfig::from_path(path)?,
            None => PipelineConfig::default(),
        };

        if let Some(rides) = self.rides {
            config.nb_rides = rides;
        }
        if let Some(time_limit) = self.time_limit {
            config.max_running_time_in_seconds = time_limit;
        }
        if let Some(phase_split) = self.phase_split {
            config.phase_split = phase_split;
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }
        if self.output.is_some() {
            config.output = self.output;
        }
        config.validate()?;

        Ok((config, self.instance))
    }
}

fn configure_logging(verbose: bool) {
    let level_filter = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    env_logger::Builder::new()
        .filter_level(level_filter)
        .parse_default_env()
        .init();
}

fn load_model(config: &PipelineConfig, instance: Option<PathBuf>) -> Result<Model<Time>, CliError> {
    if let Some(path) = instance {
        info!("loading rides from {}", path.display());
        return Ok(RideLoader::new().from_path(path)?);
    }

    let seed = config.seed.unwrap_or_else(rand::random);
    info!("generating {} rides with seed {}", config.nb_rides, seed);
    let model = RideGenerator::new(config.nb_rides)
        .durations(config.min_ride_duration, config.max_ride_duration)
        .horizon(config.horizon)
        .generate_model(seed)?;
    Ok(model)
}

fn run() -> Result<(), CliError> {
    let args = Args::parse();
    configure_logging(args.verbose);

    let (config, instance) = args.into_config()?;
    let model = load_model(&config, instance)?;
    info!(
        "{} rides, at most {} at once (first reached at t = {})",
        model.num_rides(),
        model.stabbing_number(),
        model.busiest_instant()
    );

    let assignment = Pipeline::from_config(&config).run_model(&model)?;
    info!(
        "{} rides on {} cars ({}), spread {} ({})",
        model.num_rides(),
        assignment.num_cars(),
        assignment.feasibility_status(),
        assignment.spread(),
        assignment.balancing_status()
    );

    let report = ScheduleReport::new(&model, &assignment);
    match &config.output {
        Some(path) => {
            report.write_to_path(path)?;
            info!("report written to {}", path.display());
        }
        None => report.write_to(std::io::stdout().lock())?,
    }
    Ok(())
}

fn main() {
    match run() {
        Ok(()) => {}
        Err(e) => {
            error!("Execution failed, error: {e}");
            std::process::exit(1);
        }
    }
}
