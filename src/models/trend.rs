//! Per-year trend rows and the report built from them.

use arrow::record_batch::RecordBatch;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::schema::trend_fields;

/// Number of movies watched in one year
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrendRow {
    /// Year of viewing; `None` groups the rows whose year was missing or unparseable
    #[serde(rename = "WatchedYear")]
    pub watched_year: Option<i32>,
    #[serde(rename = "MoviesWatched")]
    pub movies_watched: i64,
}

impl TrendRow {
    #[must_use]
    pub const fn new(watched_year: Option<i32>, movies_watched: i64) -> Self {
        Self {
            watched_year,
            movies_watched,
        }
    }

    /// Build a `RecordBatch` with the trend schema from a slice of rows
    pub fn to_record_batch(rows: &[Self]) -> Result<RecordBatch> {
        serde_arrow::to_record_batch(&trend_fields(), &rows)
            .map_err(|e| anyhow::anyhow!("Serialization error: {}", e))
    }

    /// Read rows back from a batch with the trend schema
    pub fn from_record_batch(batch: &RecordBatch) -> Result<Vec<Self>> {
        serde_arrow::from_record_batch::<Vec<Self>>(batch)
            .map_err(|e| anyhow::anyhow!("Failed to deserialize trend rows: {}", e))
    }
}

/// Output of the trend aggregation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrendReport {
    /// One row per distinct year, ascending by year with the null year first
    pub trend: Vec<TrendRow>,
    /// Row with the highest count; `None` when there was no input
    pub peak: Option<TrendRow>,
    /// Number of input rows that were counted
    pub rows_counted: usize,
}

impl TrendReport {
    /// The trend table as a single batch
    pub fn trend_batch(&self) -> Result<RecordBatch> {
        TrendRow::to_record_batch(&self.trend)
    }

    /// The peak-year table as a batch of zero or one row
    pub fn peak_batch(&self) -> Result<RecordBatch> {
        TrendRow::to_record_batch(self.peak.as_slice())
    }

    #[must_use]
    pub fn distinct_years(&self) -> usize {
        self.trend.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.trend.is_empty()
    }
}
