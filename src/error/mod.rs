//! Error handling for the trend report.
//!
//! Domain failures are described by [`Error`]; every fallible operation
//! returns [`Result`], an `anyhow` result, so Arrow and I/O failures can be
//! wrapped with context naming the file involved.

pub mod util;

use std::path::PathBuf;

/// Domain errors raised while loading, aggregating or writing viewing data
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The input file does not exist
    #[error("Input file not found: {}", .path.display())]
    InputNotFound { path: PathBuf },

    /// The path exists but is not a regular file
    #[error("Path is not a file: {}", .path.display())]
    NotAFile { path: PathBuf },

    /// The directory an output file should be written into does not exist
    #[error("Output directory does not exist: {}", .path.display())]
    OutputDirectoryMissing { path: PathBuf },

    /// A column required by an operation is missing from a batch
    #[error("Column not found: {column}")]
    ColumnNotFound { column: String },

    /// The file header does not match the expected schema
    #[error("Schema mismatch in {}: {details}", .path.display())]
    SchemaMismatch { path: PathBuf, details: String },

    /// A field could not be parsed into its declared type under strict parsing
    #[error("Malformed value in column '{column}': {message}")]
    MalformedField { column: String, message: String },

    /// The execution session could not be created
    #[error("Session error: {0}")]
    Session(String),
}

/// Result type used across the crate
pub type Result<T> = anyhow::Result<T>;
