//! The report run: load, aggregate, write the trend table, print the peak year.
//!
//! A run is one forward pass through [`Stage`]s. Any failure ends the run
//! and is returned to the caller; the [`Session`] is dropped on every path.

use std::path::PathBuf;
use std::time::Instant;

use serde::Serialize;

use crate::algorithm::aggregate_trends;
use crate::config::{PeakOutput, TrendsConfig};
use crate::error::Result;
use crate::models::{TrendReport, TrendRow};
use crate::reader::load_viewing_records;
use crate::schema::trend_schema;
use crate::session::Session;
use crate::utils::logging::print_table;
use crate::writer::write_csv;

/// Name given to the session of a report run
pub const SESSION_NAME: &str = "watch-trends";

/// Progress of a run, in order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum Stage {
    Start,
    Loaded,
    Aggregated,
    Written,
    Printed,
    Stopped,
}

/// What a completed run did
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub input_path: PathBuf,
    pub output_path: PathBuf,
    /// Set when the peak table was also written to a file
    pub peak_path: Option<PathBuf>,
    pub rows_read: usize,
    pub partitions: usize,
    pub nulled_values: usize,
    pub distinct_years: usize,
    pub peak: Option<TrendRow>,
    pub elapsed_ms: u128,
    pub stage: Stage,
}

fn enter(stage: &mut Stage, next: Stage) {
    log::debug!("Run stage {:?} -> {:?}", stage, next);
    *stage = next;
}

/// Execute a full report run
pub fn run(config: &TrendsConfig) -> Result<RunSummary> {
    let start = Instant::now();
    let mut stage = Stage::Start;

    let session = Session::start(SESSION_NAME, config)?;

    let (dataset, report) = session.install(|| -> Result<_> {
        let dataset = load_viewing_records(config)?;
        enter(&mut stage, Stage::Loaded);

        let report = aggregate_trends(&dataset)?;
        enter(&mut stage, Stage::Aggregated);
        Ok((dataset, report))
    })?;

    write_csv(&trend_schema(), &[report.trend_batch()?], &config.output_path)?;
    enter(&mut stage, Stage::Written);

    let peak_path = emit_peak(&report, &config.peak_output)?;
    enter(&mut stage, Stage::Printed);

    drop(session);
    enter(&mut stage, Stage::Stopped);

    let summary = RunSummary {
        input_path: config.input_path.clone(),
        output_path: config.output_path.clone(),
        peak_path,
        rows_read: dataset.num_rows(),
        partitions: dataset.num_partitions(),
        nulled_values: dataset.nulled_values,
        distinct_years: report.distinct_years(),
        peak: report.peak,
        elapsed_ms: start.elapsed().as_millis(),
        stage,
    };

    match serde_json::to_string(&summary) {
        Ok(json) => log::info!("Run summary: {json}"),
        Err(e) => log::warn!("Could not serialize run summary: {e}"),
    }

    Ok(summary)
}

/// Print the peak-year table and, if configured, persist it
fn emit_peak(report: &TrendReport, output: &PeakOutput) -> Result<Option<PathBuf>> {
    let peak = report.peak_batch()?;
    print_table("Peak year:", std::slice::from_ref(&peak))?;

    match output {
        PeakOutput::Console => Ok(None),
        PeakOutput::ConsoleAndCsv(path) => {
            write_csv(&trend_schema(), &[peak], path)?;
            Ok(Some(path.clone()))
        }
    }
}
