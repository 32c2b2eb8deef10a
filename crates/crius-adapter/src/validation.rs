//! Ephemeris data-path validation.
//!
//! The engine silently accepts any data path and only fails much later, at
//! the first computation that needs a missing file. crius validates the
//! path up front so a misconfigured deployment fails at adapter
//! construction instead.

use std::path::{Path, PathBuf};

use tracing::warn;

use crate::AdapterError;

/// Extension of the engine's data files.
const DATA_FILE_EXTENSION: &str = "se1";

/// Data files smaller than this are almost certainly truncated.
const MIN_PLAUSIBLE_FILE_SIZE: u64 = 1024;

/// Validates that `path` exists, is a directory, and contains at least one
/// `.se1` data file.
///
/// Implausibly small data files are logged at WARN level but do not fail
/// validation; the engine itself is the authority on file contents.
///
/// # Errors
///
/// Returns [`AdapterError::EphemerisPath`] describing the first problem
/// found.
pub fn validate_ephemeris_path(path: &Path) -> Result<(), AdapterError> {
    if path.as_os_str().is_empty() {
        return Err(AdapterError::EphemerisPath("path is empty".to_string()));
    }
    if !path.exists() {
        return Err(AdapterError::EphemerisPath(format!(
            "path does not exist: {}",
            path.display()
        )));
    }
    if !path.is_dir() {
        return Err(AdapterError::EphemerisPath(format!(
            "path is not a directory: {}",
            path.display()
        )));
    }

    let data_files = find_ephemeris_files(path);
    if data_files.is_empty() {
        return Err(AdapterError::EphemerisPath(format!(
            "no .{DATA_FILE_EXTENSION} files found in: {}",
            path.display()
        )));
    }

    for file in &data_files {
        let size = std::fs::metadata(file).map(|m| m.len()).unwrap_or(0);
        if size < MIN_PLAUSIBLE_FILE_SIZE {
            warn!(
                path = %file.display(),
                size,
                "ephemeris data file is implausibly small"
            );
        }
    }

    Ok(())
}

/// Finds all engine data files under `path`, sorted by name.
///
/// Returns an empty list when the path does not exist or is not a
/// directory.
#[must_use]
pub fn find_ephemeris_files(path: &Path) -> Vec<PathBuf> {
    let Ok(entries) = std::fs::read_dir(path) else {
        return Vec::new();
    };

    let mut files: Vec<PathBuf> = entries
        .flatten()
        .map(|entry| entry.path())
        .filter(|p| {
            p.is_file()
                && p.extension()
                    .is_some_and(|ext| ext.eq_ignore_ascii_case(DATA_FILE_EXTENSION))
        })
        .collect();

    files.sort();
    files
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
