//! Aggregations over loaded viewing records

pub mod trends;

pub use trends::{aggregate_trends, count_by_year, peak_year};
