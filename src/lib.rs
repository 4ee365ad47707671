//! Movie-watching trends: counts viewing records per year from a CSV file,
//! writes the per-year table as CSV and reports the peak year.

pub mod algorithm;
pub mod config;
pub mod error;
pub mod models;
pub mod pipeline;
pub mod reader;
pub mod schema;
pub mod session;
pub mod utils;
pub mod writer;

// Re-export the most common types for easier use
pub use config::{ParsePolicy, PeakOutput, TrendsConfig};
pub use error::{Error, Result};
pub use models::{TrendReport, TrendRow, ViewingRecord};
pub use pipeline::{RunSummary, Stage, run};
pub use reader::{LoadedDataset, load_viewing_records};
pub use session::Session;

// Arrow types
pub use arrow::record_batch::RecordBatch;

pub use algorithm::{aggregate_trends, count_by_year, peak_year};
pub use writer::write_csv;
