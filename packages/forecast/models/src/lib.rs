#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Scenario, urban-form and forecast row types.
//!
//! A [`Scenario`] bundles five mitigation intensities. Urban form is
//! described by [`UrbanFormParameters`] and turned into per-sector
//! [`UrbanModifiers`] using the tuning constants in
//! [`UrbanFormCoefficients`]. The forecast itself is a flat list of
//! [`ForecastRow`]s, one per scenario and year.

use cityscale_emissions_models::Sector;
use cityscale_math::clamp_unit;
use serde::{Deserialize, Serialize};

/// Name given to the reference scenario by [`Scenario::baseline`].
pub const BASELINE_SCENARIO_NAME: &str = "Baseline";

/// A named bundle of mitigation intensities, each a fraction in `[0, 1]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    /// Display name, also the scenario key in forecast rows.
    pub name: String,
    /// Marks the zero-change reference scenario explicitly.
    #[serde(default)]
    pub baseline: bool,
    /// Reduction of residential and grid energy activity.
    #[serde(default)]
    pub energy_efficiency: f64,
    /// Share of grid energy that is emission-free.
    #[serde(default)]
    pub renewable_share: f64,
    /// Reduction of transport activity.
    #[serde(default)]
    pub modal_shift: f64,
    /// Reduction of industrial activity.
    #[serde(default)]
    pub industry_efficiency: f64,
    /// Reduction of waste activity.
    #[serde(default)]
    pub waste_reduction: f64,
}

impl Scenario {
    /// A scenario with every intensity at zero.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            baseline: false,
            energy_efficiency: 0.0,
            renewable_share: 0.0,
            modal_shift: 0.0,
            industry_efficiency: 0.0,
            waste_reduction: 0.0,
        }
    }

    /// The explicit zero-mitigation reference scenario.
    #[must_use]
    pub fn baseline() -> Self {
        Self {
            baseline: true,
            ..Self::new(BASELINE_SCENARIO_NAME)
        }
    }

    /// Whether this scenario is the reference for relative change.
    ///
    /// True when flagged, or when the name is `"baseline"` in any case.
    #[must_use]
    pub fn is_baseline(&self) -> bool {
        self.baseline || self.name.eq_ignore_ascii_case("baseline")
    }

    /// Returns a copy with every intensity clamped into `[0, 1]`.
    #[must_use]
    pub fn normalized(&self) -> Self {
        Self {
            name: self.name.clone(),
            baseline: self.baseline,
            energy_efficiency: clamp_unit(self.energy_efficiency),
            renewable_share: clamp_unit(self.renewable_share),
            modal_shift: clamp_unit(self.modal_shift),
            industry_efficiency: clamp_unit(self.industry_efficiency),
            waste_reduction: clamp_unit(self.waste_reduction),
        }
    }

    /// Activity multiplier this scenario applies to `sector`.
    ///
    /// Uses the intensities as stored; call [`Self::normalized`] first.
    #[must_use]
    pub fn activity_multiplier(&self, sector: Sector) -> f64 {
        match sector {
            Sector::Residential | Sector::Energy => 1.0 - self.energy_efficiency,
            Sector::Transport => 1.0 - self.modal_shift,
            Sector::Industry => 1.0 - self.industry_efficiency,
            Sector::Waste => 1.0 - self.waste_reduction,
        }
    }
}

/// Built-environment inputs for the urban-form modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UrbanFormParameters {
    /// Residents per square kilometre.
    pub density_per_km2: f64,
    /// Compactness of the built form, in `[0, 1]`.
    pub compactness_index: f64,
    /// Share of residents with good transit access, in `[0, 1]`.
    pub transit_access_index: f64,
}

impl Default for UrbanFormParameters {
    fn default() -> Self {
        Self {
            density_per_km2: 4000.0,
            compactness_index: 0.5,
            transit_access_index: 0.5,
        }
    }
}

/// An inclusive `(lower, upper)` clamp band.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Band {
    /// Lower bound.
    pub min: f64,
    /// Upper bound.
    pub max: f64,
}

impl Band {
    /// Creates a band.
    #[must_use]
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Returns `true` if `value` lies inside the band.
    #[must_use]
    pub fn contains(&self, value: f64) -> bool {
        (self.min..=self.max).contains(&value)
    }
}

/// Empirical tuning constants of the urban-form model.
///
/// The defaults are policy values and must be kept as-is for results to
/// stay comparable across runs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UrbanFormCoefficients {
    /// Slope applied to `ln(1 + density / density_scale)`.
    pub density_slope: f64,
    /// Density divisor inside the logarithm.
    pub density_scale: f64,
    /// Densities below this floor are raised to it.
    pub density_floor: f64,
    /// Band for the density effect.
    pub density_band: Band,
    /// Slope applied to the compactness index for transport.
    pub compactness_slope: f64,
    /// Band for the compactness effect.
    pub compactness_band: Band,
    /// Slope applied to the transit access index.
    pub transit_slope: f64,
    /// Band for the transit effect.
    pub transit_band: Band,
    /// Band for the combined transport modifier.
    pub transport_band: Band,
    /// Slope applied to the compactness index for buildings.
    pub building_slope: f64,
    /// Band for the building modifier.
    pub building_band: Band,
}

impl Default for UrbanFormCoefficients {
    fn default() -> Self {
        Self {
            density_slope: 0.08,
            density_scale: 1000.0,
            density_floor: 1.0,
            density_band: Band::new(0.65, 1.05),
            compactness_slope: 0.2,
            compactness_band: Band::new(0.75, 1.05),
            transit_slope: 0.25,
            transit_band: Band::new(0.70, 1.05),
            transport_band: Band::new(0.45, 1.10),
            building_slope: 0.1,
            building_band: Band::new(0.80, 1.05),
        }
    }
}

/// Multiplicative activity adjustments derived from urban form.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UrbanModifiers {
    /// Multiplier for transport activity.
    pub transport: f64,
    /// Multiplier for residential activity.
    pub residential: f64,
    /// Multiplier for grid energy activity.
    pub energy: f64,
}

impl UrbanModifiers {
    /// Modifiers that leave every sector unchanged.
    pub const NEUTRAL: Self = Self {
        transport: 1.0,
        residential: 1.0,
        energy: 1.0,
    };

    /// Multiplier for `sector`, or `None` if urban form does not affect it.
    #[must_use]
    pub const fn for_sector(&self, sector: Sector) -> Option<f64> {
        match sector {
            Sector::Transport => Some(self.transport),
            Sector::Residential => Some(self.residential),
            Sector::Energy => Some(self.energy),
            Sector::Industry | Sector::Waste => None,
        }
    }
}

/// Demographic and economic starting point and growth rates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GrowthAssumptions {
    /// Population in the first forecast year.
    pub population: f64,
    /// Annual population growth as a fraction (e.g. `0.015`).
    pub population_growth: f64,
    /// GDP per capita in the first forecast year.
    pub gdp_per_capita: f64,
    /// Annual GDP-per-capita growth as a fraction.
    pub gdp_growth: f64,
}

/// Inclusive forecast year range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForecastHorizon {
    /// First forecast year, also the growth base year.
    pub start_year: i32,
    /// Last forecast year (inclusive).
    pub end_year: i32,
}

impl ForecastHorizon {
    /// Creates a horizon. The range is checked when forecasting.
    #[must_use]
    pub const fn new(start_year: i32, end_year: i32) -> Self {
        Self {
            start_year,
            end_year,
        }
    }
}

/// One (scenario, year) cell of a forecast.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastRow {
    /// Calendar year.
    pub year: i32,
    /// Scenario name.
    pub scenario: String,
    /// Total CO2e for the year.
    pub total_co2e: f64,
    /// CO2e per resident.
    pub per_capita_co2e: f64,
    /// CO2e per unit of GDP.
    pub per_gdp_co2e: f64,
    /// Projected population.
    pub population: f64,
    /// Projected GDP.
    pub gdp: f64,
    /// Percentage change of `total_co2e` against the baseline scenario in
    /// the same year. Exactly `0.0` for baseline rows.
    pub change_vs_baseline_pct: f64,
}
