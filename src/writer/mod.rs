//! Writing result tables as CSV.
//!
//! All partitions of a result are concatenated into one batch and written to
//! a single file with a header row. An existing file at the destination is
//! truncated and replaced.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::time::Instant;

use anyhow::Context;
use arrow::compute::concat_batches;
use arrow::csv::WriterBuilder;
use arrow::datatypes::SchemaRef;
use arrow::record_batch::RecordBatch;

use crate::error::Result;
use crate::error::util::ensure_writable_parent;
use crate::utils::logging::log_operation_complete;

/// Concatenate partitions into a single batch with `schema`
///
/// An empty slice yields an empty batch, so the header is still written.
pub fn coalesce(schema: &SchemaRef, batches: &[RecordBatch]) -> Result<RecordBatch> {
    concat_batches(schema, batches).with_context(|| "Failed to coalesce result partitions")
}

/// Write `batches` to `path` as one header-bearing, comma-delimited file
///
/// Returns the number of data rows written.
pub fn write_csv(schema: &SchemaRef, batches: &[RecordBatch], path: &Path) -> Result<usize> {
    let start = Instant::now();
    log::info!("Writing CSV to {}", path.display());

    ensure_writable_parent(path)?;
    let single = coalesce(schema, batches)?;

    let file = File::create(path)
        .with_context(|| format!("Failed to create output file {}", path.display()))?;
    let mut buffered = BufWriter::new(file);
    {
        let mut writer = WriterBuilder::new()
            .with_header(true)
            .with_delimiter(b',')
            .build(&mut buffered);
        writer
            .write(&single)
            .with_context(|| format!("Failed to write CSV rows to {}", path.display()))?;
    }
    buffered
        .flush()
        .with_context(|| format!("Failed to flush {}", path.display()))?;

    log_operation_complete("Wrote", path, single.num_rows(), Some(start.elapsed()));
    Ok(single.num_rows())
}
