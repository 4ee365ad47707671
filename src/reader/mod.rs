//! Module for loading the viewing CSV into Arrow record batches.
//!
//! The file is scanned with every column as text, then each partition is
//! cast into the declared schema in parallel. The configured [`ParsePolicy`]
//! applies at both steps. A permissive scan pads short rows with nulls and
//! drops fields past the last column; permissive casting turns values that
//! do not parse into nulls. Strict mode fails the load on any of these.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use anyhow::Context;
use arrow::array::{Array, ArrayRef, AsArray, BooleanBuilder, StringArray, StringBuilder};
use arrow::compute::{CastOptions, cast_with_options};
use arrow::csv::ReaderBuilder;
use arrow::csv::reader::Format;
use arrow::datatypes::{DataType, Field, SchemaRef};
use arrow::record_batch::RecordBatch;
use rayon::prelude::*;

use crate::config::{ParsePolicy, TrendsConfig};
use crate::error::util::safe_open_file;
use crate::error::{Error, Result};
use crate::models::ViewingRecord;
use crate::schema::{SchemaCompatibilityReport, check_header, raw_text_schema, viewing_schema};
use crate::utils::logging::{create_spinner, finish_and_clear, log_operation_complete};

/// Viewing records loaded from one file, split into partitions
#[derive(Debug)]
pub struct LoadedDataset {
    /// File the records were read from
    pub source: PathBuf,
    /// Schema shared by every batch
    pub schema: SchemaRef,
    /// One batch per partition
    pub batches: Vec<RecordBatch>,
    /// How the file header compared to the expected columns
    pub header_report: SchemaCompatibilityReport,
    /// Number of values nulled because they did not parse
    pub nulled_values: usize,
    /// Number of rows whose fields past the last column were dropped
    pub trimmed_rows: usize,
}

impl LoadedDataset {
    /// Wrap batches that are already in the viewing schema
    #[must_use]
    pub fn from_batches(source: impl Into<PathBuf>, batches: Vec<RecordBatch>) -> Self {
        Self {
            source: source.into(),
            schema: viewing_schema(),
            batches,
            header_report: SchemaCompatibilityReport {
                compatible: true,
                issues: Vec::new(),
            },
            nulled_values: 0,
            trimmed_rows: 0,
        }
    }

    #[must_use]
    pub fn num_rows(&self) -> usize {
        self.batches.iter().map(RecordBatch::num_rows).sum()
    }

    #[must_use]
    pub fn num_partitions(&self) -> usize {
        self.batches.len()
    }

    /// Deserialize every partition into typed records
    pub fn records(&self) -> Result<Vec<ViewingRecord>> {
        let mut records = Vec::with_capacity(self.num_rows());
        for batch in &self.batches {
            records.extend(ViewingRecord::from_batch(batch)?);
        }
        Ok(records)
    }
}

/// Read the header names of a delimited file
pub fn read_header(path: &Path, delimiter: u8) -> Result<Vec<String>> {
    let file = safe_open_file(path, "reading the CSV header")?;
    let (schema, _) = Format::default()
        .with_header(true)
        .with_delimiter(delimiter)
        .infer_schema(file, Some(0))
        .with_context(|| format!("Failed to read CSV header of {}", path.display()))?;

    Ok(schema.fields().iter().map(|f| f.name().clone()).collect())
}

/// Load the viewing records at `config.input_path`
pub fn load_viewing_records(config: &TrendsConfig) -> Result<LoadedDataset> {
    load_viewing_records_from(&config.input_path, config)
}

/// Load viewing records from `path` using the parse settings of `config`
pub fn load_viewing_records_from(path: &Path, config: &TrendsConfig) -> Result<LoadedDataset> {
    let start = Instant::now();
    log::info!("Reading viewing records from {}", path.display());

    let header = read_header(path, config.delimiter)?;
    let header_report = check_header(&header, &viewing_schema());
    if !header_report.compatible {
        match config.parse_policy {
            ParsePolicy::Strict => {
                return Err(Error::SchemaMismatch {
                    path: path.to_path_buf(),
                    details: header_report.describe(),
                }
                .into());
            }
            ParsePolicy::Permissive => log::warn!(
                "Header of {} differs from expected columns, reading by position ({})",
                path.display(),
                header_report.describe()
            ),
        }
    }

    let file = safe_open_file(path, "loading viewing records")?;
    let spinner = create_spinner(Some("Scanning viewing records"));
    let scanned = match config.parse_policy {
        ParsePolicy::Strict => scan_strict(file, config),
        ParsePolicy::Permissive => scan_flexible(file, config),
    }
    .with_context(|| format!("Failed to scan CSV file {}", path.display()));
    finish_and_clear(&spinner);
    let (raw_batches, trimmed_rows) = scanned?;

    if trimmed_rows > 0 {
        log::warn!(
            "{trimmed_rows} rows of {} had more than {} fields, extra fields dropped",
            path.display(),
            raw_text_schema().fields().len()
        );
    }

    let schema = viewing_schema();
    let parsed = raw_batches
        .par_iter()
        .map(|raw| parse_batch(raw, &schema, config.parse_policy))
        .collect::<Result<Vec<_>>>()?;

    let nulled_values = parsed.iter().map(|(_, nulled)| nulled).sum::<usize>();
    if nulled_values > 0 {
        log::warn!(
            "{nulled_values} values in {} did not parse and were read as null",
            path.display()
        );
    }

    let dataset = LoadedDataset {
        source: path.to_path_buf(),
        schema,
        batches: parsed.into_iter().map(|(batch, _)| batch).collect(),
        header_report,
        nulled_values,
        trimmed_rows,
    };

    log_operation_complete(
        "Loaded",
        path,
        dataset.num_rows(),
        Some(start.elapsed()),
    );
    log::debug!(
        "Viewing records split into {} partitions",
        dataset.num_partitions()
    );

    Ok(dataset)
}

/// Scan with the Arrow CSV reader, which rejects rows of the wrong width
fn scan_strict(file: File, config: &TrendsConfig) -> Result<(Vec<RecordBatch>, usize)> {
    let reader = ReaderBuilder::new(raw_text_schema())
        .with_header(true)
        .with_delimiter(config.delimiter)
        .with_batch_size(config.batch_size)
        .build(file)?;

    let batches = reader.collect::<std::result::Result<Vec<_>, _>>()?;
    Ok((batches, 0))
}

/// Scan rows of any width into all-text batches
///
/// Missing trailing fields become nulls and fields past the last column are
/// dropped. Returns the batches and the number of rows that were cut.
fn scan_flexible(file: File, config: &TrendsConfig) -> Result<(Vec<RecordBatch>, usize)> {
    let schema = raw_text_schema();
    let width = schema.fields().len();

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(config.delimiter)
        .has_headers(true)
        .flexible(true)
        .from_reader(BufReader::new(file));

    let mut builders: Vec<StringBuilder> = (0..width).map(|_| StringBuilder::new()).collect();
    let mut batches = Vec::new();
    let mut buffered = 0;
    let mut trimmed = 0;
    let mut record = csv::StringRecord::new();

    while reader.read_record(&mut record)? {
        if record.len() > width {
            trimmed += 1;
        }
        for (index, builder) in builders.iter_mut().enumerate() {
            builder.append_option(record.get(index));
        }

        buffered += 1;
        if buffered == config.batch_size {
            batches.push(finish_text_batch(&schema, &mut builders)?);
            buffered = 0;
        }
    }
    if buffered > 0 {
        batches.push(finish_text_batch(&schema, &mut builders)?);
    }

    Ok((batches, trimmed))
}

fn finish_text_batch(schema: &SchemaRef, builders: &mut [StringBuilder]) -> Result<RecordBatch> {
    let columns = builders
        .iter_mut()
        .map(|builder| Arc::new(builder.finish()) as ArrayRef)
        .collect();
    RecordBatch::try_new(Arc::clone(schema), columns)
        .with_context(|| "Failed to assemble scanned text batch")
}

/// Cast one all-text batch into `schema`
///
/// Returns the typed batch and the number of values nulled by permissive casting.
pub fn parse_batch(
    raw: &RecordBatch,
    schema: &SchemaRef,
    policy: ParsePolicy,
) -> Result<(RecordBatch, usize)> {
    let mut nulled = 0;
    let mut columns: Vec<ArrayRef> = Vec::with_capacity(schema.fields().len());

    for (field, column) in schema.fields().iter().zip(raw.columns()) {
        let (parsed, column_nulled) = parse_column(column, field, policy)?;
        nulled += column_nulled;
        columns.push(parsed);
    }

    let batch = RecordBatch::try_new(Arc::clone(schema), columns)
        .with_context(|| "Failed to assemble typed viewing batch")?;
    Ok((batch, nulled))
}

fn parse_column(column: &ArrayRef, field: &Field, policy: ParsePolicy) -> Result<(ArrayRef, usize)> {
    let text = column
        .as_string_opt::<i32>()
        .ok_or_else(|| Error::ColumnNotFound {
            column: format!("{} (as text)", field.name()),
        })?;

    let is_text = field.data_type() == &DataType::Utf8;
    // Blank fields are nulls; non-text values are trimmed before parsing
    let cleaned: StringArray = text
        .iter()
        .map(|value| {
            value
                .filter(|s| !s.trim().is_empty())
                .map(|s| if is_text { s } else { s.trim() })
        })
        .collect();

    if is_text {
        return Ok((Arc::new(cleaned), 0));
    }
    if field.data_type() == &DataType::Boolean {
        return parse_boolean(&cleaned, field, policy);
    }

    let options = CastOptions {
        safe: policy == ParsePolicy::Permissive,
        ..CastOptions::default()
    };
    let parsed = cast_with_options(&cleaned, field.data_type(), &options).map_err(|e| {
        anyhow::Error::from(Error::MalformedField {
            column: field.name().clone(),
            message: e.to_string(),
        })
    })?;

    let nulled = parsed.null_count().saturating_sub(cleaned.null_count());
    Ok((parsed, nulled))
}

/// Only `true` and `false` are booleans, in any letter case
fn parse_boolean(text: &StringArray, field: &Field, policy: ParsePolicy) -> Result<(ArrayRef, usize)> {
    let mut nulled = 0;
    let mut values = BooleanBuilder::with_capacity(text.len());

    for value in text {
        let parsed = match value {
            None => None,
            Some(s) if s.eq_ignore_ascii_case("true") => Some(true),
            Some(s) if s.eq_ignore_ascii_case("false") => Some(false),
            Some(s) => match policy {
                ParsePolicy::Strict => {
                    return Err(Error::MalformedField {
                        column: field.name().clone(),
                        message: format!("'{s}' is not a boolean"),
                    }
                    .into());
                }
                ParsePolicy::Permissive => {
                    nulled += 1;
                    None
                }
            },
        };
        values.append_option(parsed);
    }

    Ok((Arc::new(values.finish()), nulled))
}
