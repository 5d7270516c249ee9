//! Urban-form modifiers for transport and building-related activity.
//!
//! Denser, more compact cities with better transit access travel less per
//! resident and heat less floor area. The response curves and clamp bands
//! come from [`UrbanFormCoefficients`].

use cityscale_emissions_models::ActivityTable;
use cityscale_forecast_models::{UrbanFormCoefficients, UrbanFormParameters, UrbanModifiers};
use cityscale_math::clamp;

/// Derives urban modifiers using the default coefficients.
#[must_use]
pub fn calculate_urban_modifiers(params: &UrbanFormParameters) -> UrbanModifiers {
    calculate_urban_modifiers_with(params, &UrbanFormCoefficients::default())
}

/// Derives urban modifiers using custom coefficients.
#[must_use]
pub fn calculate_urban_modifiers_with(
    params: &UrbanFormParameters,
    coefficients: &UrbanFormCoefficients,
) -> UrbanModifiers {
    let c = coefficients;

    let density = params.density_per_km2.max(c.density_floor);
    let density_effect = clamp(
        1.0 - c.density_slope * (density / c.density_scale).ln_1p(),
        c.density_band.min,
        c.density_band.max,
    );
    let compactness_effect = clamp(
        1.0 - c.compactness_slope * params.compactness_index,
        c.compactness_band.min,
        c.compactness_band.max,
    );
    let transit_effect = clamp(
        1.0 - c.transit_slope * params.transit_access_index,
        c.transit_band.min,
        c.transit_band.max,
    );

    let transport = clamp(
        density_effect * compactness_effect * transit_effect,
        c.transport_band.min,
        c.transport_band.max,
    );
    let building = clamp(
        1.0 - c.building_slope * params.compactness_index,
        c.building_band.min,
        c.building_band.max,
    );

    log::debug!(
        "Urban form effects: density={density_effect:.4} compactness={compactness_effect:.4} \
         transit={transit_effect:.4} -> transport={transport:.4} building={building:.4}"
    );

    UrbanModifiers {
        transport,
        residential: building,
        energy: building,
    }
}

/// Multiplies the activity of each sector covered by `modifiers`.
/// Other sectors are copied unchanged.
#[must_use]
pub fn apply_urban_form_modifiers(
    activity: &ActivityTable,
    modifiers: &UrbanModifiers,
) -> ActivityTable {
    activity.scaled_by(|sector| modifiers.for_sector(sector))
}

#[cfg(test)]
mod tests {
    use cityscale_emissions_models::Sector;

    use super::*;

    #[test]
    fn modifiers_stay_in_reasonable_range() {
        let params = UrbanFormParameters {
            density_per_km2: 8000.0,
            compactness_index: 0.7,
            transit_access_index: 0.8,
        };

        let modifiers = calculate_urban_modifiers(&params);

        assert!((0.45..=1.10).contains(&modifiers.transport));
        assert!((0.80..=1.05).contains(&modifiers.residential));
        assert!((modifiers.residential - modifiers.energy).abs() < f64::EPSILON);
    }

    #[test]
    fn default_parameters_match_reference_values() {
        let modifiers = calculate_urban_modifiers(&UrbanFormParameters::default());

        let density_effect = 1.0 - 0.08 * (4.0_f64).ln_1p();
        let expected_transport = density_effect * 0.9 * 0.875;
        assert!((modifiers.transport - expected_transport).abs() < 1e-12);
        assert!((modifiers.residential - 0.95).abs() < 1e-12);
    }

    #[test]
    fn modifiers_bounded_over_parameter_grid() {
        let coefficients = UrbanFormCoefficients::default();
        for density in [0.0, 1.0, 50.0, 1000.0, 4000.0, 20_000.0, 1e9] {
            for step in 0..=10 {
                let index = f64::from(step) / 10.0;
                let modifiers = calculate_urban_modifiers(&UrbanFormParameters {
                    density_per_km2: density,
                    compactness_index: index,
                    transit_access_index: 1.0 - index,
                });
                assert!(coefficients.transport_band.contains(modifiers.transport));
                assert!(coefficients.building_band.contains(modifiers.residential));
                assert!(coefficients.building_band.contains(modifiers.energy));
            }
        }
    }

    #[test]
    fn sprawl_raises_transport_above_dense_core() {
        let sprawl = calculate_urban_modifiers(&UrbanFormParameters {
            density_per_km2: 300.0,
            compactness_index: 0.1,
            transit_access_index: 0.05,
        });
        let core = calculate_urban_modifiers(&UrbanFormParameters {
            density_per_km2: 15_000.0,
            compactness_index: 0.9,
            transit_access_index: 0.9,
        });
        assert!(sprawl.transport > core.transport);
    }

    #[test]
    fn apply_changes_covered_sectors_only() {
        let activity = ActivityTable::new()
            .with(Sector::Transport, 100.0)
            .with(Sector::Residential, 200.0)
            .with(Sector::Industry, 300.0);
        let modifiers = UrbanModifiers {
            transport: 0.8,
            residential: 0.9,
            energy: 1.0,
        };

        let out = apply_urban_form_modifiers(&activity, &modifiers);

        assert!((out.activity(Sector::Transport).unwrap() - 80.0).abs() < 1e-9);
        assert!((out.activity(Sector::Residential).unwrap() - 180.0).abs() < 1e-9);
        assert!((out.activity(Sector::Industry).unwrap() - 300.0).abs() < 1e-9);
    }
}
