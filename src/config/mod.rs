//! Configuration for a trend report run.

use std::path::{Path, PathBuf};

/// Input dataset read when no other path is configured
pub const DEFAULT_INPUT_PATH: &str = "input/movie_ratings_data.csv";

/// Trend table written when no other path is configured
pub const DEFAULT_OUTPUT_PATH: &str = "Outputs/movie_watching_trends.csv";

/// Default number of rows per loaded partition
pub const DEFAULT_BATCH_SIZE: usize = 8192;

/// How fields that do not parse into their declared type are handled
///
/// Blank fields are null under either policy. Booleans are only `true` or
/// `false`, in any letter case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParsePolicy {
    /// Null the offending field and keep the row; short rows are padded with
    /// nulls and fields past the last column are dropped
    #[default]
    Permissive,
    /// Fail the run on the first field that does not parse or row of the wrong width
    Strict,
}

/// Where the peak-year table goes
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PeakOutput {
    /// Print to standard output only
    #[default]
    Console,
    /// Print to standard output and also write a CSV at the given path
    ConsoleAndCsv(PathBuf),
}

/// Configuration for the trend report
#[derive(Debug, Clone)]
pub struct TrendsConfig {
    /// CSV file of viewing records
    pub input_path: PathBuf,
    /// Destination of the trend table, overwritten on every run
    pub output_path: PathBuf,
    /// Destination of the peak-year table
    pub peak_output: PeakOutput,
    /// Handling of malformed fields
    pub parse_policy: ParsePolicy,
    /// Rows per partition when loading
    pub batch_size: usize,
    /// Worker threads for the session pool; `None` uses the number of CPUs
    pub worker_threads: Option<usize>,
    /// Field delimiter of the input file
    pub delimiter: u8,
}

impl Default for TrendsConfig {
    fn default() -> Self {
        Self {
            input_path: PathBuf::from(DEFAULT_INPUT_PATH),
            output_path: PathBuf::from(DEFAULT_OUTPUT_PATH),
            peak_output: PeakOutput::default(),
            parse_policy: ParsePolicy::default(),
            batch_size: DEFAULT_BATCH_SIZE,
            worker_threads: None,
            delimiter: b',',
        }
    }
}

impl TrendsConfig {
    /// Create a configuration reading `input_path` and writing `output_path`
    #[must_use]
    pub fn new(input_path: impl AsRef<Path>, output_path: impl AsRef<Path>) -> Self {
        Self {
            input_path: input_path.as_ref().to_path_buf(),
            output_path: output_path.as_ref().to_path_buf(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_peak_output(mut self, peak_output: PeakOutput) -> Self {
        self.peak_output = peak_output;
        self
    }

    #[must_use]
    pub fn with_parse_policy(mut self, parse_policy: ParsePolicy) -> Self {
        self.parse_policy = parse_policy;
        self
    }

    /// Set the partition size; zero is clamped to one row
    #[must_use]
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    #[must_use]
    pub fn with_worker_threads(mut self, threads: usize) -> Self {
        self.worker_threads = Some(threads);
        self
    }

    #[must_use]
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Number of worker threads the session pool should start
    #[must_use]
    pub fn effective_worker_threads(&self) -> usize {
        self.worker_threads.unwrap_or_else(num_cpus::get).max(1)
    }
}
