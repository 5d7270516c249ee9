//! Simulation configuration loaded from TOML.
//!
//! The embedded `config/default.toml` supplies every value. A user file is
//! layered on top key by key, so it only needs to name what it changes.

use std::collections::BTreeMap;
use std::path::Path;

use cityscale_emissions::validation::{ValidationReport, ensure_non_negative_fields};
use cityscale_emissions_models::{ActivityTable, GwpOverrides};
use cityscale_forecast::drivers::{CityStatistics, EconomicDriver, PopulationDriver, SectorActivity};
use cityscale_forecast_models::{ForecastHorizon, Scenario, UrbanFormParameters};
use serde::{Deserialize, Serialize};

use crate::CliError;

/// Built-in defaults, embedded at compile time.
pub const DEFAULT_CONFIG: &str = include_str!("../config/default.toml");

/// City identity and growth inputs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CityConfig {
    /// City name.
    pub name: String,
    /// Base-year population.
    pub population: f64,
    /// Annual population growth as a fraction.
    pub population_growth: f64,
    /// Base-year GDP per capita.
    pub gdp_per_capita: f64,
    /// Annual GDP-per-capita growth as a fraction.
    pub gdp_growth: f64,
    /// Energy use per unit GDP, reported with driver projections.
    #[serde(default)]
    pub energy_intensity: f64,
}

/// Everything a simulation run needs besides the emission factors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// City inputs.
    pub city: CityConfig,
    /// Forecast years.
    pub horizon: ForecastHorizon,
    /// The mitigation scenario compared against the baseline.
    pub mitigation: Scenario,
    /// Built-environment inputs.
    pub urban_form: UrbanFormParameters,
    /// Manual sector activity, used when no activity file is given.
    pub activity: SectorActivity,
    /// GWP overrides for the base-year inventory.
    #[serde(default)]
    pub gwp: GwpOverrides,
}

impl SimulationConfig {
    /// The city's growth drivers and manual activity.
    #[must_use]
    pub fn city_statistics(&self) -> CityStatistics {
        CityStatistics {
            city_name: self.city.name.clone(),
            population_driver: PopulationDriver {
                initial_population: self.city.population,
                annual_growth_rate: self.city.population_growth,
            },
            economic_driver: EconomicDriver {
                gdp_per_capita: self.city.gdp_per_capita,
                gdp_growth_rate: self.city.gdp_growth,
                energy_intensity: self.city.energy_intensity,
            },
            sector_activity: self.activity,
        }
    }

    /// The manual activity as a five-sector table.
    #[must_use]
    pub fn manual_activity(&self) -> ActivityTable {
        let a = &self.activity;
        cityscale_io::manual_input_to_activity(
            a.residential_energy,
            a.transport_activity,
            a.industrial_output,
            a.waste_activity,
            a.grid_energy,
        )
    }

    /// Scenarios to forecast: the baseline, then the configured mitigation.
    #[must_use]
    pub fn scenarios(&self) -> Vec<Scenario> {
        vec![
            Scenario::baseline(),
            Scenario {
                baseline: false,
                ..self.mitigation.clone()
            },
        ]
    }

    /// GWP overrides, or `None` when no key is set.
    #[must_use]
    pub fn gwp_overrides(&self) -> Option<&GwpOverrides> {
        (!self.gwp.is_empty()).then_some(&self.gwp)
    }

    /// Checks scalar inputs that cannot be negative.
    #[must_use]
    pub fn validate(&self) -> ValidationReport {
        let values = BTreeMap::from([
            ("population", self.city.population),
            ("gdp_per_capita", self.city.gdp_per_capita),
            ("density_per_km2", self.urban_form.density_per_km2),
        ]);
        ValidationReport {
            errors: ensure_non_negative_fields(
                &values,
                &["population", "gdp_per_capita", "density_per_km2"],
            ),
            warnings: Vec::new(),
        }
    }
}

/// Returns the built-in configuration.
///
/// # Errors
///
/// Returns [`CliError::Toml`] only if the embedded defaults are malformed.
pub fn default_config() -> Result<SimulationConfig, CliError> {
    parse_config("")
}

/// Parses a user config layered over the built-in defaults.
///
/// # Errors
///
/// Returns [`CliError::Toml`] if `text` is not valid TOML or a value has
/// the wrong type.
pub fn parse_config(text: &str) -> Result<SimulationConfig, CliError> {
    let mut table: toml::Table = toml::de::from_str(DEFAULT_CONFIG)?;
    let overrides: toml::Table = toml::de::from_str(text)?;
    merge_tables(&mut table, overrides);
    Ok(toml::Value::Table(table).try_into()?)
}

/// Loads the config at `path`, or the defaults when `path` is `None`.
///
/// # Errors
///
/// Returns [`CliError::ReadConfig`] if the file cannot be read, or
/// [`CliError::Toml`] if it cannot be parsed.
pub fn load_config(path: Option<&Path>) -> Result<SimulationConfig, CliError> {
    let Some(path) = path else {
        return default_config();
    };
    let text = std::fs::read_to_string(path).map_err(|source| CliError::ReadConfig {
        path: path.to_path_buf(),
        source,
    })?;
    let config = parse_config(&text)?;
    log::info!("Loaded config from {}", path.display());
    Ok(config)
}

fn merge_tables(base: &mut toml::Table, overrides: toml::Table) {
    for (key, value) in overrides {
        if let toml::Value::Table(incoming) = value {
            if let Some(toml::Value::Table(existing)) = base.get_mut(&key) {
                merge_tables(existing, incoming);
                continue;
            }
            base.insert(key, toml::Value::Table(incoming));
        } else {
            base.insert(key, value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_matches_documented_values() {
        let config = default_config().unwrap();

        assert_eq!(config.city.name, "Sample City");
        assert!((config.city.population - 1_500_000.0).abs() < f64::EPSILON);
        assert_eq!(config.horizon, ForecastHorizon::new(2025, 2050));
        assert!((config.mitigation.energy_efficiency - 0.20).abs() < f64::EPSILON);
        assert!((config.mitigation.renewable_share - 0.30).abs() < f64::EPSILON);
        assert!((config.mitigation.modal_shift - 0.15).abs() < f64::EPSILON);
        assert!((config.mitigation.industry_efficiency - 0.10).abs() < f64::EPSILON);
        assert!((config.mitigation.waste_reduction - 0.15).abs() < f64::EPSILON);
        assert_eq!(config.urban_form, UrbanFormParameters::default());
        assert_eq!(config.activity, SectorActivity::synthetic());
        assert!(config.gwp.is_empty());
        assert!(config.gwp_overrides().is_none());
    }

    #[test]
    fn city_statistics_carry_city_inputs() {
        let config = parse_config("[city]\nenergy_intensity = 0.4\n").unwrap();

        let stats = config.city_statistics();
        let growth = stats.growth_assumptions();

        assert_eq!(stats.city_name, "Sample City");
        assert!((growth.population - 1_500_000.0).abs() < f64::EPSILON);
        assert!((growth.population_growth - 0.015).abs() < f64::EPSILON);
        assert!((growth.gdp_per_capita - 18_000.0).abs() < f64::EPSILON);
        assert!((growth.gdp_growth - 0.02).abs() < f64::EPSILON);
        assert!((stats.economic_driver.energy_intensity - 0.4).abs() < f64::EPSILON);
    }

    #[test]
    fn manual_activity_lists_every_sector_once() {
        let table = default_config().unwrap().manual_activity();

        assert_eq!(table.len(), 5);
        assert!(table.duplicate_sectors().is_empty());
        assert!(
            (table.activity(cityscale_emissions_models::Sector::Transport).unwrap() - 800_000_000.0)
                .abs()
                < f64::EPSILON
        );
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let config = parse_config(
            "[city]\nname = \"Springfield\"\n\n[horizon]\nend_year = 2030\n",
        )
        .unwrap();

        assert_eq!(config.city.name, "Springfield");
        assert!((config.city.gdp_per_capita - 18_000.0).abs() < f64::EPSILON);
        assert_eq!(config.horizon, ForecastHorizon::new(2025, 2030));
        assert!((config.mitigation.modal_shift - 0.15).abs() < f64::EPSILON);
    }

    #[test]
    fn gwp_overrides_accept_either_case() {
        let config = parse_config("[gwp]\nCH4 = 30.0\nn2o = 273.0\n").unwrap();

        let gwp = config.gwp_overrides().unwrap();
        assert_eq!(gwp.ch4, Some(30.0));
        assert_eq!(gwp.n2o, Some(273.0));
        assert_eq!(gwp.co2, None);
    }

    #[test]
    fn scenarios_put_baseline_first() {
        let config = parse_config("[mitigation]\nname = \"Net Zero\"\n").unwrap();

        let scenarios = config.scenarios();

        assert_eq!(scenarios.len(), 2);
        assert!(scenarios[0].is_baseline());
        assert_eq!(scenarios[1].name, "Net Zero");
        assert!(!scenarios[1].is_baseline());
    }

    #[test]
    fn rejects_wrong_types() {
        let err = parse_config("[city]\npopulation = \"many\"\n").unwrap_err();
        assert!(matches!(err, CliError::Toml(_)));
    }

    #[test]
    fn validate_flags_negative_scalars() {
        let config = parse_config("[city]\npopulation = -5.0\n").unwrap();

        let report = config.validate();

        assert!(!report.is_ok());
        assert_eq!(report.errors.len(), 1);
        assert!(report.errors[0].contains("population"));
    }

    #[test]
    fn load_config_without_path_uses_defaults() {
        assert_eq!(load_config(None).unwrap(), default_config().unwrap());
    }

    #[test]
    fn load_config_reports_missing_file() {
        let path = std::env::temp_dir().join(format!("cityscale-{}.toml", uuid::Uuid::new_v4()));
        let err = load_config(Some(&path)).unwrap_err();
        assert!(matches!(err, CliError::ReadConfig { .. }));
    }
}
