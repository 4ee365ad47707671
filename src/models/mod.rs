//! Domain models for the trend report
//!
//! Typed views over the Arrow batches: one viewing record per input row, and
//! the per-year rows derived from them.

pub mod trend;
pub mod viewing;

pub use trend::{TrendReport, TrendRow};
pub use viewing::ViewingRecord;
