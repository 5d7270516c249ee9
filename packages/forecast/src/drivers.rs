//! Demographic and economic growth drivers.
//!
//! Population and GDP per capita compound annually from a base year.
//! [`CityStatistics`] bundles both drivers with a city's base-year sector
//! activity and can project the drivers over a list of years.

use cityscale_emissions_models::{ActivityTable, Sector};
use cityscale_forecast_models::GrowthAssumptions;
use serde::{Deserialize, Serialize};

/// Compounding population growth from a base-year value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PopulationDriver {
    /// Population in the base year.
    pub initial_population: f64,
    /// Annual growth rate as a fraction.
    pub annual_growth_rate: f64,
}

impl PopulationDriver {
    /// `(1 + rate)^years_from_base`.
    #[must_use]
    pub fn growth_factor(&self, years_from_base: i32) -> f64 {
        (1.0 + self.annual_growth_rate).powi(years_from_base)
    }

    /// Population `years_from_base` years after the base year.
    #[must_use]
    pub fn value_at(&self, years_from_base: i32) -> f64 {
        self.initial_population * self.growth_factor(years_from_base)
    }
}

/// Compounding GDP-per-capita growth from a base-year value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EconomicDriver {
    /// GDP per capita in the base year.
    pub gdp_per_capita: f64,
    /// Annual growth rate of GDP per capita as a fraction.
    pub gdp_growth_rate: f64,
    /// Energy use per unit GDP. Carried through projections unchanged.
    #[serde(default)]
    pub energy_intensity: f64,
}

impl EconomicDriver {
    /// `(1 + gdp_growth_rate)^years_from_base`.
    #[must_use]
    pub fn growth_factor(&self, years_from_base: i32) -> f64 {
        (1.0 + self.gdp_growth_rate).powi(years_from_base)
    }

    /// GDP per capita `years_from_base` years after the base year.
    #[must_use]
    pub fn gdp_per_capita_at(&self, years_from_base: i32) -> f64 {
        self.gdp_per_capita * self.growth_factor(years_from_base)
    }
}

impl From<&GrowthAssumptions> for PopulationDriver {
    fn from(growth: &GrowthAssumptions) -> Self {
        Self {
            initial_population: growth.population,
            annual_growth_rate: growth.population_growth,
        }
    }
}

impl From<&GrowthAssumptions> for EconomicDriver {
    fn from(growth: &GrowthAssumptions) -> Self {
        Self {
            gdp_per_capita: growth.gdp_per_capita,
            gdp_growth_rate: growth.gdp_growth,
            energy_intensity: 0.0,
        }
    }
}

/// Base-year activity for the five canonical sectors.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SectorActivity {
    /// Residential energy use.
    pub residential_energy: f64,
    /// Transport activity.
    pub transport_activity: f64,
    /// Industrial output.
    pub industrial_output: f64,
    /// Waste handled.
    pub waste_activity: f64,
    /// Grid energy supplied.
    pub grid_energy: f64,
}

impl SectorActivity {
    /// Sample activity for a mid-sized city.
    #[must_use]
    pub const fn synthetic() -> Self {
        Self {
            residential_energy: 1_200_000.0,
            transport_activity: 800_000_000.0,
            industrial_output: 450_000.0,
            waste_activity: 180_000.0,
            grid_energy: 2_300_000.0,
        }
    }
}

/// Driver values for one projected year.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DriverProjection {
    /// Calendar year.
    pub year: i32,
    /// Projected population.
    pub population: f64,
    /// Projected GDP per capita.
    pub gdp_per_capita: f64,
    /// `population * gdp_per_capita`.
    pub gdp: f64,
    /// Energy intensity (constant over the projection).
    pub energy_intensity: f64,
}

/// A city's name, growth drivers and base-year activity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CityStatistics {
    /// City name.
    pub city_name: String,
    /// Population driver.
    pub population_driver: PopulationDriver,
    /// Economic driver.
    pub economic_driver: EconomicDriver,
    /// Base-year sector activity.
    pub sector_activity: SectorActivity,
}

impl CityStatistics {
    /// Growth assumptions equivalent to this city's drivers.
    #[must_use]
    pub const fn growth_assumptions(&self) -> GrowthAssumptions {
        GrowthAssumptions {
            population: self.population_driver.initial_population,
            population_growth: self.population_driver.annual_growth_rate,
            gdp_per_capita: self.economic_driver.gdp_per_capita,
            gdp_growth: self.economic_driver.gdp_growth_rate,
        }
    }

    /// Projects the drivers for each of `years`, measured from `base_year`.
    #[must_use]
    pub fn projection(&self, years: &[i32], base_year: i32) -> Vec<DriverProjection> {
        years
            .iter()
            .map(|&year| {
                let dt = year - base_year;
                let population = self.population_driver.value_at(dt);
                let gdp_per_capita = self.economic_driver.gdp_per_capita_at(dt);
                DriverProjection {
                    year,
                    population,
                    gdp_per_capita,
                    gdp: population * gdp_per_capita,
                    energy_intensity: self.economic_driver.energy_intensity,
                }
            })
            .collect()
    }
}

/// Scales base activity for growth: consumption sectors (residential,
/// transport, waste) follow `pop_scale`; production sectors (industry,
/// energy) follow the mean of `pop_scale` and `gdp_scale`.
#[must_use]
pub fn scale_activity_for_growth(
    activity: &ActivityTable,
    pop_scale: f64,
    gdp_scale: f64,
) -> ActivityTable {
    let production_scale = f64::midpoint(pop_scale, gdp_scale);
    activity.scaled_by(|sector| {
        Some(match sector {
            Sector::Residential | Sector::Transport | Sector::Waste => pop_scale,
            Sector::Industry | Sector::Energy => production_scale,
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn city() -> CityStatistics {
        CityStatistics {
            city_name: "Sample City".to_string(),
            population_driver: PopulationDriver {
                initial_population: 1000.0,
                annual_growth_rate: 0.1,
            },
            economic_driver: EconomicDriver {
                gdp_per_capita: 50.0,
                gdp_growth_rate: 0.2,
                energy_intensity: 0.7,
            },
            sector_activity: SectorActivity::synthetic(),
        }
    }

    #[test]
    fn drivers_compound_annually() {
        let city = city();
        assert!((city.population_driver.value_at(0) - 1000.0).abs() < 1e-9);
        assert!((city.population_driver.value_at(2) - 1210.0).abs() < 1e-9);
        assert!((city.economic_driver.gdp_per_capita_at(1) - 60.0).abs() < 1e-9);
    }

    #[test]
    fn projection_computes_gdp_per_year() {
        let rows = city().projection(&[2025, 2026], 2025);

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].year, 2026);
        assert!((rows[0].gdp - 50_000.0).abs() < 1e-6);
        assert!((rows[1].gdp - 1100.0 * 60.0).abs() < 1e-6);
        assert!((rows[1].energy_intensity - 0.7).abs() < f64::EPSILON);
    }

    #[test]
    fn synthetic_activity_is_the_sample_city() {
        let activity = SectorActivity::synthetic();
        assert!((activity.residential_energy - 1_200_000.0).abs() < f64::EPSILON);
        assert!((activity.transport_activity - 800_000_000.0).abs() < f64::EPSILON);
        assert!((activity.industrial_output - 450_000.0).abs() < f64::EPSILON);
        assert!((activity.waste_activity - 180_000.0).abs() < f64::EPSILON);
        assert!((activity.grid_energy - 2_300_000.0).abs() < f64::EPSILON);
    }

    #[test]
    fn growth_scaling_is_asymmetric() {
        let activity = ActivityTable::new()
            .with(Sector::Residential, 100.0)
            .with(Sector::Waste, 100.0)
            .with(Sector::Industry, 100.0)
            .with(Sector::Energy, 100.0);

        let scaled = scale_activity_for_growth(&activity, 1.2, 1.6);

        assert!((scaled.activity(Sector::Residential).unwrap() - 120.0).abs() < 1e-9);
        assert!((scaled.activity(Sector::Waste).unwrap() - 120.0).abs() < 1e-9);
        assert!((scaled.activity(Sector::Industry).unwrap() - 140.0).abs() < 1e-9);
        assert!((scaled.activity(Sector::Energy).unwrap() - 140.0).abs() < 1e-9);
    }

    #[test]
    fn growth_assumptions_mirror_drivers() {
        let growth = city().growth_assumptions();
        assert!((growth.population - 1000.0).abs() < f64::EPSILON);
        assert!((growth.gdp_growth - 0.2).abs() < f64::EPSILON);
    }
}
