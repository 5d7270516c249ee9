//! Applying mitigation scenarios to activity and factor tables.

use cityscale_emissions_models::{ActivityTable, FactorTable, Sector};
use cityscale_forecast_models::Scenario;

/// Applies `scenario` to the given tables, returning adjusted copies.
///
/// The scenario is normalized first. Activity rows are discounted per
/// sector by [`Scenario::activity_multiplier`]; the energy sector's three
/// gas factors are multiplied by `1 - renewable_share`. Sectors missing
/// from a table are simply not touched.
#[must_use]
pub fn apply_scenario(
    activity: &ActivityTable,
    factors: &FactorTable,
    scenario: &Scenario,
) -> (ActivityTable, FactorTable) {
    let scenario = scenario.normalized();

    let adjusted_activity =
        activity.scaled_by(|sector| Some(scenario.activity_multiplier(sector)));
    let adjusted_factors =
        factors.scaled_sector(Sector::Energy, 1.0 - scenario.renewable_share);

    (adjusted_activity, adjusted_factors)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_inputs() -> (ActivityTable, FactorTable) {
        let activity = ActivityTable::new()
            .with(Sector::Residential, 1000.0)
            .with(Sector::Transport, 2000.0)
            .with(Sector::Industry, 500.0)
            .with(Sector::Waste, 200.0)
            .with(Sector::Energy, 800.0);
        let factors = Sector::all()
            .iter()
            .fold(FactorTable::new(), |t, s| t.with(*s, 1.0, 0.0, 0.0));
        (activity, factors)
    }

    #[test]
    fn reduces_targeted_sectors() {
        let (activity, factors) = base_inputs();
        let scenario = Scenario {
            energy_efficiency: 0.1,
            modal_shift: 0.2,
            renewable_share: 0.3,
            ..Scenario::new("mit")
        };

        let (out_activity, out_factors) = apply_scenario(&activity, &factors, &scenario);

        assert!((out_activity.activity(Sector::Transport).unwrap() - 1600.0).abs() < 1e-9);
        assert!((out_activity.activity(Sector::Residential).unwrap() - 900.0).abs() < 1e-9);
        assert!((out_activity.activity(Sector::Energy).unwrap() - 720.0).abs() < 1e-9);
        assert!((out_activity.activity(Sector::Industry).unwrap() - 500.0).abs() < 1e-9);
        assert!((out_factors.get(Sector::Energy).unwrap().co2_factor - 0.7).abs() < 1e-9);
        assert!((out_factors.get(Sector::Transport).unwrap().co2_factor - 1.0).abs() < 1e-9);
    }

    #[test]
    fn zero_scenario_is_identity() {
        let (activity, factors) = base_inputs();

        let (out_activity, out_factors) =
            apply_scenario(&activity, &factors, &Scenario::new("noop"));

        assert_eq!(out_activity, activity);
        assert_eq!(out_factors, factors);
    }

    #[test]
    fn absent_sectors_are_untouched() {
        let activity = ActivityTable::new().with(Sector::Waste, 50.0);
        let factors = FactorTable::new().with(Sector::Waste, 2.0, 0.1, 0.0);
        let scenario = Scenario {
            modal_shift: 0.5,
            renewable_share: 0.9,
            ..Scenario::new("transport-only")
        };

        let (out_activity, out_factors) = apply_scenario(&activity, &factors, &scenario);

        assert_eq!(out_activity, activity);
        assert_eq!(out_factors, factors);
    }

    #[test]
    fn out_of_range_intensities_are_clamped() {
        let (activity, factors) = base_inputs();
        let scenario = Scenario {
            waste_reduction: 1.8,
            industry_efficiency: -0.5,
            renewable_share: 2.0,
            ..Scenario::new("clamped")
        };

        let (out_activity, out_factors) = apply_scenario(&activity, &factors, &scenario);

        assert!(out_activity.activity(Sector::Waste).unwrap().abs() < 1e-9);
        assert!((out_activity.activity(Sector::Industry).unwrap() - 500.0).abs() < 1e-9);
        assert!(out_factors.get(Sector::Energy).unwrap().co2_factor.abs() < 1e-9);
    }

    #[test]
    fn inputs_are_not_modified() {
        let (activity, factors) = base_inputs();
        let before = (activity.clone(), factors.clone());
        let scenario = Scenario {
            energy_efficiency: 0.5,
            renewable_share: 0.5,
            ..Scenario::new("half")
        };

        let _ = apply_scenario(&activity, &factors, &scenario);

        assert_eq!((activity, factors), before);
    }
}
