//! Utility functions for error handling
//!
//! Path checks that turn the common failure modes of opening the input and
//! creating the output into domain errors with the offending path attached.

use std::fs;
use std::io;
use std::path::Path;

use anyhow::Context;

use crate::error::{Error, Result};

/// Safely open a file with rich error information
///
/// # Arguments
/// * `path` - The path to the file to open
/// * `purpose` - Why the file is being opened (for error context)
pub fn safe_open_file(path: &Path, purpose: &str) -> Result<fs::File> {
    if !path.exists() {
        return Err(Error::InputNotFound {
            path: path.to_path_buf(),
        })
        .with_context(|| format!("Needed for: {purpose}"));
    }

    if !path.is_file() {
        return Err(Error::NotAFile {
            path: path.to_path_buf(),
        })
        .with_context(|| format!("Expected a file for: {purpose}"));
    }

    fs::File::open(path).map_err(|e| {
        let context = match e.kind() {
            io::ErrorKind::PermissionDenied => {
                format!("Permission denied opening {}", path.display())
            }
            _ => format!("Failed to open {} for: {purpose}", path.display()),
        };
        anyhow::Error::new(e).context(context)
    })
}

/// Check that the directory an output file will be created in exists
///
/// The directory is never created here; a missing parent is reported as
/// [`Error::OutputDirectoryMissing`].
pub fn ensure_writable_parent(path: &Path) -> Result<()> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        // Relative file name in the working directory
        _ => return Ok(()),
    };

    if !parent.is_dir() {
        return Err(Error::OutputDirectoryMissing {
            path: parent.to_path_buf(),
        }
        .into());
    }

    Ok(())
}
