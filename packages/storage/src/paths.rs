#![allow(clippy::module_name_repetitions)]
//! Canonical locations and names for run record files.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};

/// Environment variable overriding the runs directory.
pub const RUNS_DIR_ENV: &str = "CITYSCALE_RUNS_DIR";

/// Prefix shared by every run record file name.
pub const RUN_FILE_PREFIX: &str = "run_";

/// Extension of run record files.
pub const RUN_FILE_EXTENSION: &str = "json";

/// Returns the runs directory: `$CITYSCALE_RUNS_DIR` if set, otherwise
/// `runs/` relative to the working directory.
#[must_use]
pub fn default_runs_dir() -> PathBuf {
    std::env::var_os(RUNS_DIR_ENV)
        .filter(|v| !v.is_empty())
        .map_or_else(|| PathBuf::from("runs"), PathBuf::from)
}

/// File name for a run saved at `timestamp`, e.g. `run_20250101T093000Z.json`.
///
/// The compact UTC timestamp sorts lexicographically in time order.
#[must_use]
pub fn run_file_name(timestamp: DateTime<Utc>) -> String {
    format!(
        "{RUN_FILE_PREFIX}{}.{RUN_FILE_EXTENSION}",
        timestamp.format("%Y%m%dT%H%M%SZ")
    )
}

/// Returns `true` if `path` looks like a run record file.
#[must_use]
pub fn is_run_file(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| {
            n.starts_with(RUN_FILE_PREFIX)
                && Path::new(n)
                    .extension()
                    .is_some_and(|e| e == RUN_FILE_EXTENSION)
        })
}

/// Ensures a directory exists, creating it if necessary.
///
/// # Errors
///
/// Returns an I/O error if the directory cannot be created.
pub fn ensure_dir(path: &Path) -> std::io::Result<()> {
    if !path.exists() {
        std::fs::create_dir_all(path)?;
    }
    Ok(())
}
