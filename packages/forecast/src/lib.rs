#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Multi-year emissions forecasting under growth and mitigation scenarios.
//!
//! For every scenario and every year of the horizon, the base activity is
//! grown with population and GDP, adjusted for urban form, discounted by
//! the scenario, and run through the emissions engine. The resulting rows
//! are then compared against the baseline scenario year by year.

pub mod drivers;
pub mod scenario;
pub mod urban_form;

use std::collections::BTreeMap;

use cityscale_emissions::{EmissionsError, aggregate_emissions, compute_sector_emissions};
use cityscale_emissions_models::{ActivityTable, FactorTable};
use cityscale_forecast_models::{
    ForecastHorizon, ForecastRow, GrowthAssumptions, Scenario, UrbanModifiers,
};
use cityscale_math::{YearRangeError, safe_divide, year_range};

use crate::drivers::{EconomicDriver, PopulationDriver, scale_activity_for_growth};
use crate::scenario::apply_scenario;
use crate::urban_form::apply_urban_form_modifiers;

/// Errors that abort a forecast. No partial forecast is returned.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ForecastError {
    /// The horizon ends before it starts.
    #[error(transparent)]
    InvalidYearRange(#[from] YearRangeError),

    /// No scenario is marked or named as the baseline.
    #[error("No baseline scenario supplied; relative change cannot be computed")]
    MissingBaseline,

    /// The emissions engine rejected the adjusted tables.
    #[error("Forecast for scenario '{scenario}' in {year} failed: {source}")]
    Emissions {
        /// Scenario being computed.
        scenario: String,
        /// Year being computed.
        year: i32,
        /// Underlying engine error.
        source: EmissionsError,
    },
}

/// Forecasts emissions for every scenario over the horizon.
///
/// Rows come out scenario by scenario in input order, years ascending
/// within each scenario. `change_vs_baseline_pct` compares each row with
/// the first baseline scenario's total for the same year; baseline rows
/// carry exactly `0.0`, as do rows for years whose baseline total is zero.
///
/// # Errors
///
/// * [`ForecastError::InvalidYearRange`] if `end_year < start_year`.
/// * [`ForecastError::MissingBaseline`] if no scenario is a baseline.
/// * [`ForecastError::Emissions`] if a sector has no emission factor.
pub fn forecast_scenarios(
    base_activity: &ActivityTable,
    base_factors: &FactorTable,
    growth: &GrowthAssumptions,
    horizon: ForecastHorizon,
    scenarios: &[Scenario],
    urban_modifiers: Option<&UrbanModifiers>,
) -> Result<Vec<ForecastRow>, ForecastError> {
    let years = year_range(horizon.start_year, horizon.end_year)?;
    let reference = scenarios
        .iter()
        .position(Scenario::is_baseline)
        .ok_or(ForecastError::MissingBaseline)?;

    let population = PopulationDriver::from(growth);
    let economy = EconomicDriver::from(growth);

    let mut cells: Vec<(usize, ForecastRow)> = Vec::new();
    for (index, scenario) in scenarios.iter().enumerate() {
        for year in years.clone() {
            let t = year - horizon.start_year;
            let population_t = population.value_at(t);
            let gdp_t = population_t * economy.gdp_per_capita_at(t);

            let mut scaled = scale_activity_for_growth(
                base_activity,
                population.growth_factor(t),
                economy.growth_factor(t),
            );
            if let Some(modifiers) = urban_modifiers {
                scaled = apply_urban_form_modifiers(&scaled, modifiers);
            }

            let (activity, factors) = apply_scenario(&scaled, base_factors, scenario);
            let sectors = compute_sector_emissions(&activity, &factors, None).map_err(|source| {
                ForecastError::Emissions {
                    scenario: scenario.name.clone(),
                    year,
                    source,
                }
            })?;
            let summary = aggregate_emissions(&sectors, population_t, gdp_t);

            log::debug!(
                "[{}] {year}: total_co2e={:.2} population={population_t:.0}",
                scenario.name,
                summary.total_co2e
            );

            cells.push((
                index,
                ForecastRow {
                    year,
                    scenario: scenario.name.clone(),
                    total_co2e: summary.total_co2e,
                    per_capita_co2e: summary.per_capita_co2e,
                    per_gdp_co2e: summary.per_gdp_co2e,
                    population: population_t,
                    gdp: gdp_t,
                    change_vs_baseline_pct: 0.0,
                },
            ));
        }
    }

    let baseline_totals: BTreeMap<i32, f64> = cells
        .iter()
        .filter(|(index, _)| *index == reference)
        .map(|(_, row)| (row.year, row.total_co2e))
        .collect();

    let rows: Vec<ForecastRow> = cells
        .into_iter()
        .map(|(index, mut row)| {
            row.change_vs_baseline_pct = if scenarios[index].is_baseline() {
                0.0
            } else {
                let baseline = baseline_totals.get(&row.year).copied().unwrap_or(0.0);
                safe_divide(row.total_co2e - baseline, baseline) * 100.0
            };
            row
        })
        .collect();

    log::info!(
        "Forecast complete: {} rows ({} scenario(s), {}-{})",
        rows.len(),
        scenarios.len(),
        horizon.start_year,
        horizon.end_year
    );

    Ok(rows)
}
