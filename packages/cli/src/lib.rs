#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Library half of the `cityscale` command-line tool.
//!
//! [`config`] loads the TOML simulation settings; [`simulation`] runs the
//! full inventory and forecast pipeline and produces a
//! [`cityscale_storage::RunRecord`].

pub mod config;
pub mod simulation;

use std::path::PathBuf;

use cityscale_emissions::EmissionsError;
use cityscale_forecast::ForecastError;
use cityscale_io::LoadError;
use cityscale_report::ReportError;
use cityscale_storage::StorageError;

/// Errors surfaced by CLI commands.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// The config file could not be read.
    #[error("Failed to read config {}: {source}", path.display())]
    ReadConfig {
        /// Config file path.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The config is not valid TOML or has wrongly typed values.
    #[error("Invalid config: {0}")]
    Toml(#[from] toml::de::Error),

    /// An input table could not be loaded.
    #[error(transparent)]
    Load(#[from] LoadError),

    /// The pre-flight validation pass found blocking errors.
    #[error("Validation failed:\n  {}", .0.join("\n  "))]
    Validation(Vec<String>),

    /// The base-year inventory could not be computed.
    #[error(transparent)]
    Emissions(#[from] EmissionsError),

    /// The forecast could not be computed.
    #[error(transparent)]
    Forecast(#[from] ForecastError),

    /// A run record could not be stored or read.
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// A table export failed.
    #[error(transparent)]
    Report(#[from] ReportError),

    /// An output file could not be created.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
