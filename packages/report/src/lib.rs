#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Human-readable summaries and CSV exports of simulation results.
//!
//! The text summary is the body of a city report: headline totals, the
//! per-sector breakdown, and one highlight line per scenario for the final
//! forecast year. CSV exports use the same column names as the in-memory
//! tables.

use std::io::Write;

use cityscale_emissions_models::{CitySummary, SectorEmissionResult};
use cityscale_forecast_models::ForecastRow;

/// Errors that can occur while exporting tables.
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    /// CSV serialization failed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// I/O error while flushing output.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Returns the final-year row of each scenario, in the order scenarios
/// first appear in `forecast`.
#[must_use]
pub fn scenario_highlights(forecast: &[ForecastRow]) -> Vec<&ForecastRow> {
    let mut latest: Vec<&ForecastRow> = Vec::new();

    for row in forecast {
        match latest.iter_mut().find(|r| r.scenario == row.scenario) {
            Some(existing) if row.year >= existing.year => *existing = row,
            Some(_) => {}
            None => latest.push(row),
        }
    }

    latest
}

/// Formats one highlight line, e.g.
/// `2050 Mitigation: 1234.57 (-18.20% vs baseline)`.
#[must_use]
pub fn highlight_line(row: &ForecastRow) -> String {
    format!(
        "{} {}: {:.2} ({:.2}% vs baseline)",
        row.year, row.scenario, row.total_co2e, row.change_vs_baseline_pct
    )
}

/// Renders the plain-text city report.
#[must_use]
pub fn render_summary(
    city_name: &str,
    summary: &CitySummary,
    sectors: &[SectorEmissionResult],
    forecast: &[ForecastRow],
) -> String {
    let mut lines = vec![
        format!("CityScale Report: {city_name}"),
        String::new(),
        format!("Total CO2e: {:.2}", summary.total_co2e),
        format!("Per capita CO2e: {:.6}", summary.per_capita_co2e),
        format!("Per GDP CO2e: {:.8}", summary.per_gdp_co2e),
        String::new(),
        "Sector Emissions".to_string(),
    ];

    lines.extend(
        sectors
            .iter()
            .map(|s| format!("{}: {:.2}", s.sector, s.co2e)),
    );

    lines.push(String::new());
    lines.push("Scenario Highlights".to_string());
    lines.extend(scenario_highlights(forecast).into_iter().map(highlight_line));

    let mut text = lines.join("\n");
    text.push('\n');
    text
}

/// Writes sector results as CSV with a header row.
///
/// # Errors
///
/// Returns [`ReportError`] if a row cannot be serialized or written.
pub fn write_sector_csv<W: Write>(
    writer: W,
    sectors: &[SectorEmissionResult],
) -> Result<(), ReportError> {
    write_rows(writer, sectors)?;
    log::debug!("Wrote {} sector row(s)", sectors.len());
    Ok(())
}

/// Writes forecast rows as CSV with a header row.
///
/// # Errors
///
/// Returns [`ReportError`] if a row cannot be serialized or written.
pub fn write_forecast_csv<W: Write>(writer: W, forecast: &[ForecastRow]) -> Result<(), ReportError> {
    write_rows(writer, forecast)?;
    log::debug!("Wrote {} forecast row(s)", forecast.len());
    Ok(())
}

fn write_rows<W: Write, T: serde::Serialize>(writer: W, rows: &[T]) -> Result<(), ReportError> {
    let mut wtr = csv::Writer::from_writer(writer);
    for row in rows {
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    Ok(())
}
