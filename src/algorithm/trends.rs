//! Movies-watched-per-year aggregation
//!
//! Each partition is counted on its own (in parallel on the current rayon
//! pool), the partial counts are merged, and the merged table is sorted by
//! year. The peak year is picked from the merged table, never from the raw
//! records.

use std::cmp::Reverse;

use arrow::array::{Array, AsArray};
use arrow::datatypes::Int32Type;
use arrow::record_batch::RecordBatch;
use itertools::Itertools;
use rayon::prelude::*;
use rustc_hash::FxHashMap;

use crate::error::{Error, Result};
use crate::models::{TrendReport, TrendRow};
use crate::reader::LoadedDataset;
use crate::schema::columns;

type YearCounts = FxHashMap<Option<i32>, i64>;

/// Count the rows of one partition per `WatchedYear`
fn count_partition(batch: &RecordBatch) -> Result<YearCounts> {
    let column = batch
        .column_by_name(columns::WATCHED_YEAR)
        .ok_or_else(|| Error::ColumnNotFound {
            column: columns::WATCHED_YEAR.to_string(),
        })?;
    let years = column
        .as_primitive_opt::<Int32Type>()
        .ok_or_else(|| {
            anyhow::anyhow!(
                "Column {} has type {}, expected Int32",
                columns::WATCHED_YEAR,
                column.data_type()
            )
        })?;

    let mut counts = YearCounts::default();
    if years.null_count() == 0 {
        for year in years.values().iter() {
            *counts.entry(Some(*year)).or_insert(0) += 1;
        }
    } else {
        for year in years.iter() {
            *counts.entry(year).or_insert(0) += 1;
        }
    }
    Ok(counts)
}

fn merge_counts(mut left: YearCounts, right: YearCounts) -> YearCounts {
    for (year, count) in right {
        *left.entry(year).or_insert(0) += count;
    }
    left
}

/// Group all partitions by year and count rows, ascending by year
///
/// Rows without a year form their own group, sorted first.
pub fn count_by_year(batches: &[RecordBatch]) -> Result<Vec<TrendRow>> {
    let merged = batches
        .par_iter()
        .map(count_partition)
        .try_reduce(YearCounts::default, |left, right| Ok(merge_counts(left, right)))?;

    Ok(merged
        .into_iter()
        .map(|(year, count)| TrendRow::new(year, count))
        .sorted_by_key(|row| row.watched_year)
        .collect_vec())
}

/// The row with the highest count in a trend table
///
/// The table is sorted by count descending and the first row taken. The
/// sort is stable, so among tied counts the row that comes first in
/// `trend` (the earliest year for an ascending table) wins. Returns `None`
/// for an empty table.
#[must_use]
pub fn peak_year(trend: &[TrendRow]) -> Option<TrendRow> {
    trend
        .iter()
        .copied()
        .sorted_by_key(|row| Reverse(row.movies_watched))
        .next()
}

/// Build the trend table and the peak year of a loaded dataset
pub fn aggregate_trends(dataset: &LoadedDataset) -> Result<TrendReport> {
    let trend = count_by_year(&dataset.batches)?;
    let peak = peak_year(&trend);
    let rows_counted = trend
        .iter()
        .map(|row| usize::try_from(row.movies_watched).unwrap_or(0))
        .sum();

    log::info!(
        "Aggregated {} rows into {} years from {} partitions",
        rows_counted,
        trend.len(),
        dataset.num_partitions()
    );
    match &peak {
        Some(peak) => log::debug!(
            "Peak year {:?} with {} movies watched",
            peak.watched_year,
            peak.movies_watched
        ),
        None => log::debug!("No rows to aggregate, peak year is empty"),
    }

    Ok(TrendReport {
        trend,
        peak,
        rows_counted,
    })
}
