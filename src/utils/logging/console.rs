//! Console output utilities

use arrow::record_batch::RecordBatch;
use arrow::util::pretty::pretty_format_batches;

use crate::error::Result;

/// Render batches as a bordered table
///
/// A batch without rows still renders its header, so an empty result prints
/// the column names and nothing else.
pub fn format_table(batches: &[RecordBatch]) -> Result<String> {
    let table = pretty_format_batches(batches)
        .map_err(|e| anyhow::anyhow!("Failed to format table: {}", e))?;
    Ok(table.to_string())
}

/// Print a titled table to standard output
pub fn print_table(title: &str, batches: &[RecordBatch]) -> Result<()> {
    let table = format_table(batches)?;
    println!("{title}");
    println!("{table}");
    Ok(())
}
