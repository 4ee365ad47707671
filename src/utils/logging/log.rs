//! Logging utilities

use std::path::Path;
use std::time::Duration;

/// Log the completion of an operation on a file with its row count
///
/// Throughput is included when `elapsed` is known.
pub fn log_operation_complete(operation: &str, path: &Path, rows: usize, elapsed: Option<Duration>) {
    let Some(duration) = elapsed else {
        log::info!("{operation} {rows} rows ({})", path.display());
        return;
    };

    let seconds = duration.as_secs_f64();
    if seconds > 0.0 {
        #[allow(clippy::cast_precision_loss)]
        let rate = rows as f64 / seconds;
        log::info!(
            "{operation} {rows} rows ({}) in {duration:?}, {rate:.0} rows/s",
            path.display()
        );
    } else {
        log::info!("{operation} {rows} rows ({}) in {duration:?}", path.display());
    }
}
