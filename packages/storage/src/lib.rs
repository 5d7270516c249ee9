#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Timestamped JSON run records.
//!
//! Each simulation run is written to its own file,
//! `run_<UTC timestamp>.json`, inside a runs directory. Because the
//! timestamp is compact and zero-padded, sorting file names in reverse
//! lists the most recent run first.

pub mod paths;

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use cityscale_emissions_models::{CitySummary, SectorEmissionResult};
use cityscale_forecast_models::{ForecastRow, Scenario, UrbanModifiers};
use serde::{Deserialize, Serialize, de::DeserializeOwned};

/// Errors from reading or writing run records.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// I/O error (directory creation, file read/write).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization or parsing failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// City inputs that produced a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunMetadata {
    /// City name.
    pub city_name: String,
    /// Base-year population.
    pub population: f64,
    /// Annual population growth.
    pub population_growth: f64,
    /// Base-year GDP per capita.
    pub gdp_per_capita: f64,
    /// Annual GDP-per-capita growth.
    pub gdp_growth: f64,
    /// First forecast year.
    #[serde(default)]
    pub start_year: Option<i32>,
    /// Last forecast year.
    #[serde(default)]
    pub end_year: Option<i32>,
    /// Scenarios that were forecast.
    #[serde(default)]
    pub scenarios: Vec<Scenario>,
}

/// Everything stored for one simulation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunRecord {
    /// City inputs.
    pub meta: RunMetadata,
    /// Urban-form modifiers applied to the forecast.
    pub urban_modifiers: Option<UrbanModifiers>,
    /// Base-year city summary.
    pub base_summary: CitySummary,
    /// Base-year sector results.
    pub base_sector_results: Vec<SectorEmissionResult>,
    /// Forecast rows.
    pub forecast: Vec<ForecastRow>,
}

/// Writes `payload` to a new run file named for the current UTC time.
///
/// # Errors
///
/// Returns [`StorageError`] if the directory cannot be created or the
/// file cannot be written.
pub fn save_run<T: Serialize>(run_dir: &Path, payload: &T) -> Result<PathBuf, StorageError> {
    save_run_at(run_dir, payload, Utc::now())
}

/// Writes `payload` to a run file named for `timestamp`.
///
/// An existing file with the same name is overwritten.
///
/// # Errors
///
/// See [`save_run`].
pub fn save_run_at<T: Serialize>(
    run_dir: &Path,
    payload: &T,
    timestamp: DateTime<Utc>,
) -> Result<PathBuf, StorageError> {
    paths::ensure_dir(run_dir)?;
    let full_path = run_dir.join(paths::run_file_name(timestamp));
    let json = serde_json::to_string_pretty(payload)?;
    std::fs::write(&full_path, json)?;
    log::info!("Saved run to {}", full_path.display());
    Ok(full_path)
}

/// Lists run files in `run_dir`, most recent first.
///
/// Returns an empty list if the directory does not exist.
///
/// # Errors
///
/// Returns [`StorageError::Io`] if the directory cannot be read.
pub fn list_runs(run_dir: &Path) -> Result<Vec<PathBuf>, StorageError> {
    if !run_dir.exists() {
        return Ok(Vec::new());
    }

    let mut runs = Vec::new();
    for entry in std::fs::read_dir(run_dir)? {
        let path = entry?.path();
        if path.is_file() && paths::is_run_file(&path) {
            runs.push(path);
        }
    }

    runs.sort_by(|a, b| b.file_name().cmp(&a.file_name()));
    Ok(runs)
}

/// Reads and deserializes a run file.
///
/// # Errors
///
/// Returns [`StorageError`] if the file cannot be read or parsed as `T`.
pub fn load_run<T: DeserializeOwned>(path: &Path) -> Result<T, StorageError> {
    let text = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&text)?)
}
