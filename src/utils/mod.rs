//! Shared helpers for logging and console output

pub mod logging;
