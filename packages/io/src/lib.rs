#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Loading activity and emission factor tables from CSV files.
//!
//! This is where untyped tabular input becomes typed records. Column
//! presence is checked here, so code downstream of an
//! [`ActivityTable`]/[`FactorTable`] never has to. Empty numeric cells
//! load as `NaN` and are reported by the emissions validation pass rather
//! than rejected here.
//!
//! Also provides [`geo::load_geojson_bounds`], a bounding-box helper for
//! city boundary files.

pub mod geo;

use std::io::Read;
use std::path::Path;
use std::str::FromStr as _;

use cityscale_emissions_models::{ActivityTable, FactorRecord, FactorTable, Sector};

/// Columns an activity file must contain.
pub const REQUIRED_ACTIVITY_COLUMNS: [&str; 2] = ["sector", "activity"];

/// Columns an emission factor file must contain.
pub const REQUIRED_FACTOR_COLUMNS: [&str; 4] = ["sector", "co2_factor", "ch4_factor", "n2o_factor"];

/// Errors that can occur while loading input tables.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// Required columns are absent from the header row.
    #[error("{table} missing columns: {}", .columns.join(", "))]
    MissingColumns {
        /// Which table was being loaded.
        table: &'static str,
        /// Missing column names, sorted.
        columns: Vec<String>,
    },

    /// A row has an empty sector cell.
    #[error("{table} row {row}: sector values cannot be empty")]
    EmptySector {
        /// Which table was being loaded.
        table: &'static str,
        /// 1-based data row number.
        row: usize,
    },

    /// A sector cell does not name a known sector.
    #[error("{table} row {row}: unknown sector '{value}'")]
    UnknownSector {
        /// Which table was being loaded.
        table: &'static str,
        /// 1-based data row number.
        row: usize,
        /// The unrecognized value.
        value: String,
    },

    /// A numeric cell could not be parsed.
    #[error("{table} row {row}: invalid number '{value}' in column {column}")]
    InvalidNumber {
        /// Which table was being loaded.
        table: &'static str,
        /// 1-based data row number.
        row: usize,
        /// Column name.
        column: &'static str,
        /// The unparseable value.
        value: String,
    },

    /// The file extension is not supported.
    #[error("Unsupported file format: {0}. Use CSV.")]
    UnsupportedFormat(String),

    /// CSV parsing failed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// `GeoJSON` parsing failed.
    #[error("GeoJSON error: {0}")]
    GeoJson(#[from] geojson::Error),
}

/// Loads an activity table from a `.csv` file.
///
/// # Errors
///
/// Returns [`LoadError`] if the file is not CSV, cannot be read, lacks a
/// required column, or contains an unknown sector or malformed number.
pub fn load_activity_csv(path: &Path) -> Result<ActivityTable, LoadError> {
    ensure_csv(path)?;
    let table = read_activity_csv(std::fs::File::open(path)?)?;
    log::info!(
        "Loaded {} activity row(s) from {}",
        table.len(),
        path.display()
    );
    Ok(table)
}

/// Loads an emission factor table from a `.csv` file.
///
/// # Errors
///
/// Returns [`LoadError`] under the same conditions as
/// [`load_activity_csv`].
pub fn load_factor_csv(path: &Path) -> Result<FactorTable, LoadError> {
    ensure_csv(path)?;
    let table = read_factor_csv(std::fs::File::open(path)?)?;
    log::info!(
        "Loaded {} emission factor row(s) from {}",
        table.len(),
        path.display()
    );
    Ok(table)
}

/// Parses an activity table from CSV data with a header row.
///
/// # Errors
///
/// See [`load_activity_csv`].
pub fn read_activity_csv(reader: impl Read) -> Result<ActivityTable, LoadError> {
    const TABLE: &str = "activity";

    let mut rdr = csv_reader(reader);
    let idx = column_indices(&mut rdr, TABLE, &REQUIRED_ACTIVITY_COLUMNS)?;

    let mut table = ActivityTable::new();
    for (i, record) in rdr.records().enumerate() {
        let record = record?;
        let row = i + 1;
        let sector = parse_sector(TABLE, row, record.get(idx[0]).unwrap_or(""))?;
        let activity = parse_number(TABLE, row, "activity", record.get(idx[1]).unwrap_or(""))?;
        table.push(sector, activity);
    }
    Ok(table)
}

/// Parses an emission factor table from CSV data with a header row.
///
/// # Errors
///
/// See [`load_activity_csv`].
pub fn read_factor_csv(reader: impl Read) -> Result<FactorTable, LoadError> {
    const TABLE: &str = "factors";

    let mut rdr = csv_reader(reader);
    let idx = column_indices(&mut rdr, TABLE, &REQUIRED_FACTOR_COLUMNS)?;

    let mut table = FactorTable::new();
    for (i, record) in rdr.records().enumerate() {
        let record = record?;
        let row = i + 1;
        let cell = |n: usize| record.get(idx[n]).unwrap_or("");
        table.push(FactorRecord {
            sector: parse_sector(TABLE, row, cell(0))?,
            co2_factor: parse_number(TABLE, row, "co2_factor", cell(1))?,
            ch4_factor: parse_number(TABLE, row, "ch4_factor", cell(2))?,
            n2o_factor: parse_number(TABLE, row, "n2o_factor", cell(3))?,
        });
    }
    Ok(table)
}

/// Builds the canonical five-sector activity table from manual entries.
#[must_use]
pub fn manual_input_to_activity(
    residential_energy: f64,
    transport_activity: f64,
    industrial_output: f64,
    waste_activity: f64,
    grid_energy: f64,
) -> ActivityTable {
    ActivityTable::new()
        .with(Sector::Residential, residential_energy)
        .with(Sector::Transport, transport_activity)
        .with(Sector::Industry, industrial_output)
        .with(Sector::Waste, waste_activity)
        .with(Sector::Energy, grid_energy)
}

fn ensure_csv(path: &Path) -> Result<(), LoadError> {
    let is_csv = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("csv"));
    if is_csv {
        Ok(())
    } else {
        Err(LoadError::UnsupportedFormat(path.display().to_string()))
    }
}

fn csv_reader<R: Read>(reader: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader)
}

/// Resolves the position of each required column, reporting every missing
/// one at once.
fn column_indices<R: Read>(
    rdr: &mut csv::Reader<R>,
    table: &'static str,
    required: &[&str],
) -> Result<Vec<usize>, LoadError> {
    let headers = rdr.headers()?.clone();
    let mut indices = Vec::with_capacity(required.len());
    let mut missing = Vec::new();

    for column in required {
        match headers.iter().position(|h| h == *column) {
            Some(i) => indices.push(i),
            None => missing.push((*column).to_string()),
        }
    }

    if missing.is_empty() {
        Ok(indices)
    } else {
        missing.sort();
        Err(LoadError::MissingColumns {
            table,
            columns: missing,
        })
    }
}

fn parse_sector(table: &'static str, row: usize, value: &str) -> Result<Sector, LoadError> {
    if value.is_empty() {
        return Err(LoadError::EmptySector { table, row });
    }
    Sector::from_str(value).map_err(|_| LoadError::UnknownSector {
        table,
        row,
        value: value.to_string(),
    })
}

fn parse_number(
    table: &'static str,
    row: usize,
    column: &'static str,
    value: &str,
) -> Result<f64, LoadError> {
    if value.is_empty() {
        return Ok(f64::NAN);
    }
    value.parse::<f64>().map_err(|_| LoadError::InvalidNumber {
        table,
        row,
        column,
        value: value.to_string(),
    })
}
