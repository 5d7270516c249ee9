//! Factor join, GWP weighting and aggregation.

use cityscale_emissions_models::{
    ActivityTable, CitySummary, FactorTable, GwpOverrides, GwpValues, SectorEmissionResult,
};
use cityscale_math::safe_divide;

use crate::EmissionsError;

/// Computes per-sector emissions for every activity row.
///
/// Each activity row is joined to the first factor row of the same sector.
/// Gas masses are `activity * factor`; CO2e weights them with the default
/// GWP values, replaced per key by `gwp_overrides`. Rows are returned by
/// CO2e descending, ties keeping activity order.
///
/// # Errors
///
/// Returns [`EmissionsError::MissingFactors`] listing every activity
/// sector without a factor row. No partial result is produced.
pub fn compute_sector_emissions(
    activity: &ActivityTable,
    factors: &FactorTable,
    gwp_overrides: Option<&GwpOverrides>,
) -> Result<Vec<SectorEmissionResult>, EmissionsError> {
    let gwp = gwp_overrides.map_or_else(GwpValues::default, |o| {
        GwpValues::default().with_overrides(o)
    });

    let missing: Vec<_> = activity
        .iter()
        .filter(|r| factors.get(r.sector).is_none())
        .map(|r| r.sector)
        .collect();
    if !missing.is_empty() {
        return Err(EmissionsError::MissingFactors { sectors: missing });
    }

    let mut results: Vec<SectorEmissionResult> = activity
        .iter()
        .filter_map(|r| {
            let factor = factors.get(r.sector)?;
            let co2 = r.activity * factor.co2_factor;
            let ch4 = r.activity * factor.ch4_factor;
            let n2o = r.activity * factor.n2o_factor;
            Some(SectorEmissionResult {
                sector: r.sector,
                activity: r.activity,
                co2,
                ch4,
                n2o,
                co2e: gwp.co2e(co2, ch4, n2o),
            })
        })
        .collect();

    // Stable sort keeps join order among equal values.
    results.sort_by(|a, b| b.co2e.total_cmp(&a.co2e));

    log::debug!(
        "Computed emissions for {} sector(s) (GWP CH4={}, N2O={})",
        results.len(),
        gwp.ch4,
        gwp.n2o
    );

    Ok(results)
}

/// Aggregates sector rows into city totals and intensity ratios.
///
/// Per-capita and per-GDP ratios are `0.0` when the respective
/// denominator is zero.
#[must_use]
pub fn aggregate_emissions(
    sector_results: &[SectorEmissionResult],
    population: f64,
    gdp: f64,
) -> CitySummary {
    let total_co2e: f64 = sector_results.iter().map(|r| r.co2e).sum();
    CitySummary {
        total_co2e,
        per_capita_co2e: safe_divide(total_co2e, population),
        per_gdp_co2e: safe_divide(total_co2e, gdp),
    }
}
