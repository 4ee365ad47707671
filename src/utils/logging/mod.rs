//! Utilities for logging, console output, and progress tracking

pub mod console;
pub mod log;
pub mod progress;

pub use console::{format_table, print_table};
pub use self::log::log_operation_complete;
pub use progress::{create_spinner, finish_and_clear};
