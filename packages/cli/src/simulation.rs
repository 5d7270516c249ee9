//! The end-to-end run: validate, base-year inventory, urban form, forecast.

use std::path::Path;

use cityscale_emissions::validation::{ValidationReport, validate_activity, validate_factors};
use cityscale_emissions::{aggregate_emissions, compute_sector_emissions};
use cityscale_emissions_models::{ActivityTable, FactorTable};
use cityscale_forecast::drivers::DriverProjection;
use cityscale_forecast::{ForecastError, forecast_scenarios};
use cityscale_forecast::urban_form::calculate_urban_modifiers;
use cityscale_math::year_range;
use cityscale_storage::{RunMetadata, RunRecord};

use crate::CliError;
use crate::config::SimulationConfig;

/// Loaded inputs for one run.
#[derive(Debug, Clone)]
pub struct SimulationInputs {
    /// Simulation settings.
    pub config: SimulationConfig,
    /// Base-year activity.
    pub activity: ActivityTable,
    /// Emission factors.
    pub factors: FactorTable,
}

impl SimulationInputs {
    /// Pairs a config with activity read from `activity_path`, or the
    /// config's manual activity when no path is given, and factors read
    /// from `factors_path`.
    ///
    /// # Errors
    ///
    /// Returns [`CliError::Load`] if either CSV file cannot be loaded.
    pub fn load(
        config: SimulationConfig,
        activity_path: Option<&Path>,
        factors_path: &Path,
    ) -> Result<Self, CliError> {
        let activity = match activity_path {
            Some(path) => cityscale_io::load_activity_csv(path)?,
            None => config.manual_activity(),
        };
        let factors = cityscale_io::load_factor_csv(factors_path)?;
        Ok(Self {
            config,
            activity,
            factors,
        })
    }

    /// Runs every pre-flight check: scalar config values, activity and
    /// factors.
    #[must_use]
    pub fn validate(&self) -> ValidationReport {
        let mut report = self.config.validate();
        report.merge(validate_activity(&self.activity));
        report.merge(validate_factors(&self.factors));
        report
    }
}

/// Runs the full pipeline and returns the record to store.
///
/// Validation warnings are logged; validation errors abort before any
/// computation.
///
/// # Errors
///
/// * [`CliError::Validation`] if the pre-flight checks fail.
/// * [`CliError::Emissions`] if an activity sector has no factor.
/// * [`CliError::Forecast`] if the horizon is inverted.
pub fn run_simulation(inputs: &SimulationInputs) -> Result<RunRecord, CliError> {
    let report = inputs.validate();
    report.log_warnings();
    if !report.is_ok() {
        return Err(CliError::Validation(report.errors));
    }

    let config = &inputs.config;
    let growth = config.city_statistics().growth_assumptions();

    let base_sector_results =
        compute_sector_emissions(&inputs.activity, &inputs.factors, config.gwp_overrides())?;
    let gdp_total = growth.population * growth.gdp_per_capita;
    let base_summary = aggregate_emissions(&base_sector_results, growth.population, gdp_total);
    log::info!(
        "Base-year inventory for {}: {:.2} t CO2e",
        config.city.name,
        base_summary.total_co2e
    );

    let urban_modifiers = calculate_urban_modifiers(&config.urban_form);
    let scenarios = config.scenarios();
    let forecast = forecast_scenarios(
        &inputs.activity,
        &inputs.factors,
        &growth,
        config.horizon,
        &scenarios,
        Some(&urban_modifiers),
    )?;

    Ok(RunRecord {
        meta: RunMetadata {
            city_name: config.city.name.clone(),
            population: growth.population,
            population_growth: growth.population_growth,
            gdp_per_capita: growth.gdp_per_capita,
            gdp_growth: growth.gdp_growth,
            start_year: Some(config.horizon.start_year),
            end_year: Some(config.horizon.end_year),
            scenarios,
        },
        urban_modifiers: Some(urban_modifiers),
        base_summary,
        base_sector_results,
        forecast,
    })
}

/// Projects population and GDP for every year of the configured horizon.
///
/// # Errors
///
/// Returns [`CliError::Forecast`] if the horizon is inverted.
pub fn project_drivers(config: &SimulationConfig) -> Result<Vec<DriverProjection>, CliError> {
    let years: Vec<i32> = year_range(config.horizon.start_year, config.horizon.end_year)
        .map_err(ForecastError::from)?
        .collect();
    Ok(config
        .city_statistics()
        .projection(&years, config.horizon.start_year))
}

#[cfg(test)]
mod tests {
    use cityscale_emissions_models::Sector;
    use cityscale_forecast_models::ForecastHorizon;

    use super::*;
    use crate::config::{default_config, parse_config};

    fn unit_factors() -> FactorTable {
        Sector::all()
            .iter()
            .fold(FactorTable::new(), |t, s| t.with(*s, 1.0, 0.0, 0.0))
    }

    fn inputs(config: SimulationConfig) -> SimulationInputs {
        SimulationInputs {
            activity: config.manual_activity(),
            factors: unit_factors(),
            config,
        }
    }

    #[test]
    fn default_run_forecasts_baseline_and_mitigation() {
        let record = run_simulation(&inputs(default_config().unwrap())).unwrap();

        assert_eq!(record.forecast.len(), 2 * 26);
        assert_eq!(record.base_sector_results.len(), 5);
        assert_eq!(record.meta.city_name, "Sample City");
        assert!(record.urban_modifiers.is_some());
        for row in record.forecast.iter().filter(|r| r.scenario == "Baseline") {
            assert!(row.change_vs_baseline_pct == 0.0);
        }
        assert!(
            record
                .forecast
                .iter()
                .filter(|r| r.scenario == "Mitigation")
                .all(|r| r.change_vs_baseline_pct < 0.0)
        );
    }

    #[test]
    fn base_summary_uses_population_times_gdp_per_capita() {
        let mut config = default_config().unwrap();
        config.horizon = ForecastHorizon::new(2025, 2025);

        let record = run_simulation(&inputs(config)).unwrap();

        let expected_total: f64 = record.base_sector_results.iter().map(|r| r.co2e).sum();
        let expected_per_gdp = expected_total / (1_500_000.0 * 18_000.0);
        assert!((record.base_summary.total_co2e - expected_total).abs() < 1e-6);
        assert!((record.base_summary.per_gdp_co2e - expected_per_gdp).abs() < 1e-12);
    }

    #[test]
    fn validation_errors_abort_the_run() {
        let mut sim = inputs(default_config().unwrap());
        sim.activity = ActivityTable::new().with(Sector::Waste, -1.0);

        let err = run_simulation(&sim).unwrap_err();

        assert!(matches!(err, CliError::Validation(ref errors) if !errors.is_empty()));
    }

    #[test]
    fn duplicate_activity_sectors_do_not_block_the_run() {
        let mut sim = inputs(default_config().unwrap());
        sim.activity = ActivityTable::new()
            .with(Sector::Waste, 10.0)
            .with(Sector::Waste, 5.0);

        let record = run_simulation(&sim).unwrap();

        assert_eq!(record.base_sector_results.len(), 2);
        assert!((record.base_summary.total_co2e - 15.0).abs() < 1e-9);
        assert!(!record.forecast.is_empty());
    }

    #[test]
    fn driver_projection_matches_forecast_rows() {
        let config = default_config().unwrap();
        let record = run_simulation(&inputs(config.clone())).unwrap();

        let projection = project_drivers(&config).unwrap();

        assert_eq!(projection.len(), 26);
        assert_eq!(projection[0].year, 2025);
        assert!((projection[0].gdp - 1_500_000.0 * 18_000.0).abs() < 1e-3);
        let last = record
            .forecast
            .iter()
            .find(|r| r.year == 2050 && r.scenario == "Baseline")
            .unwrap();
        assert!((projection[25].population - last.population).abs() < 1e-6);
        assert!((projection[25].gdp - last.gdp).abs() < 1e-3);
    }

    #[test]
    fn driver_projection_rejects_inverted_horizon() {
        let config = parse_config("[horizon]\nstart_year = 2030\nend_year = 2025\n").unwrap();
        assert!(matches!(project_drivers(&config), Err(CliError::Forecast(_))));
    }

    #[test]
    fn missing_factor_is_reported() {
        let mut sim = inputs(default_config().unwrap());
        sim.factors = FactorTable::new().with(Sector::Residential, 1.0, 0.0, 0.0);

        let err = run_simulation(&sim).unwrap_err();

        assert!(matches!(err, CliError::Emissions(_)));
    }

    #[test]
    fn inverted_horizon_is_a_forecast_error() {
        let config = parse_config("[horizon]\nstart_year = 2030\nend_year = 2025\n").unwrap();

        let err = run_simulation(&inputs(config)).unwrap_err();

        assert!(matches!(err, CliError::Forecast(_)));
    }
}
