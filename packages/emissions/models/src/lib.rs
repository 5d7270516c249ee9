#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Sector, activity, emission factor and emission result types.
//!
//! These are the immutable value records that flow through the emissions
//! engine. Tables are ordered sequences of typed records keyed by
//! [`Sector`]; every transformation produces a new table rather than
//! editing one in place.

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Default global warming potential of carbon dioxide.
pub const DEFAULT_GWP_CO2: f64 = 1.0;
/// Default 100-year global warming potential of methane.
pub const DEFAULT_GWP_CH4: f64 = 28.0;
/// Default 100-year global warming potential of nitrous oxide.
pub const DEFAULT_GWP_N2O: f64 = 265.0;

/// An economic activity category that drives emissions.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Sector {
    /// Household energy use.
    Residential,
    /// Passenger and freight movement.
    Transport,
    /// Industrial output.
    Industry,
    /// Solid waste and wastewater.
    Waste,
    /// Grid energy supply.
    Energy,
}

impl Sector {
    /// Returns all sectors in canonical order.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Residential,
            Self::Transport,
            Self::Industry,
            Self::Waste,
            Self::Energy,
        ]
    }
}

/// Global warming potential weights used to convert gas masses to CO2e.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GwpValues {
    /// Weight applied to CO2.
    pub co2: f64,
    /// Weight applied to CH4.
    pub ch4: f64,
    /// Weight applied to N2O.
    pub n2o: f64,
}

impl Default for GwpValues {
    fn default() -> Self {
        Self {
            co2: DEFAULT_GWP_CO2,
            ch4: DEFAULT_GWP_CH4,
            n2o: DEFAULT_GWP_N2O,
        }
    }
}

impl GwpValues {
    /// Returns a copy with every key present in `overrides` replaced.
    #[must_use]
    pub fn with_overrides(self, overrides: &GwpOverrides) -> Self {
        Self {
            co2: overrides.co2.unwrap_or(self.co2),
            ch4: overrides.ch4.unwrap_or(self.ch4),
            n2o: overrides.n2o.unwrap_or(self.n2o),
        }
    }

    /// Weighted CO2-equivalent of the given gas masses, summed left to
    /// right without fused multiply-add.
    #[must_use]
    #[allow(clippy::suboptimal_flops)]
    pub fn co2e(&self, co2: f64, ch4: f64, n2o: f64) -> f64 {
        co2 * self.co2 + ch4 * self.ch4 + n2o * self.n2o
    }
}

/// Per-gas overrides for [`GwpValues`]. Unset keys keep their defaults.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct GwpOverrides {
    /// Override for the CO2 weight.
    #[serde(default, rename = "CO2", alias = "co2")]
    pub co2: Option<f64>,
    /// Override for the CH4 weight.
    #[serde(default, rename = "CH4", alias = "ch4")]
    pub ch4: Option<f64>,
    /// Override for the N2O weight.
    #[serde(default, rename = "N2O", alias = "n2o")]
    pub n2o: Option<f64>,
}

impl GwpOverrides {
    /// Returns `true` if no key is overridden.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.co2.is_none() && self.ch4.is_none() && self.n2o.is_none()
    }
}

/// Throughput of one sector (energy consumed, tonnes of waste, ...).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ActivityRecord {
    /// Sector the activity belongs to.
    pub sector: Sector,
    /// Activity quantity in the sector's native unit.
    pub activity: f64,
}

/// Ordered activity rows, expected to hold at most one row per sector.
///
/// Duplicates are representable so that the validation pass can report
/// them; the engine assumes validated input.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActivityTable {
    records: Vec<ActivityRecord>,
}

impl ActivityTable {
    /// Creates an empty table.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            records: Vec::new(),
        }
    }

    /// Wraps an existing list of records, preserving their order.
    #[must_use]
    pub const fn from_records(records: Vec<ActivityRecord>) -> Self {
        Self { records }
    }

    /// Appends a row.
    pub fn push(&mut self, sector: Sector, activity: f64) {
        self.records.push(ActivityRecord { sector, activity });
    }

    /// Returns a copy of this table with a row appended.
    #[must_use]
    pub fn with(mut self, sector: Sector, activity: f64) -> Self {
        self.push(sector, activity);
        self
    }

    /// All rows in insertion order.
    #[must_use]
    pub fn records(&self) -> &[ActivityRecord] {
        &self.records
    }

    /// Iterates the rows in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, ActivityRecord> {
        self.records.iter()
    }

    /// Number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns `true` if the table has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Activity of the first row for `sector`, if any.
    #[must_use]
    pub fn activity(&self, sector: Sector) -> Option<f64> {
        self.records
            .iter()
            .find(|r| r.sector == sector)
            .map(|r| r.activity)
    }

    /// Returns `true` if any row belongs to `sector`.
    #[must_use]
    pub fn contains(&self, sector: Sector) -> bool {
        self.records.iter().any(|r| r.sector == sector)
    }

    /// Returns a new table where each row's activity is multiplied by the
    /// factor `multiplier` yields for it. Rows for which it yields `None`
    /// are copied unchanged.
    #[must_use]
    pub fn scaled_by(&self, multiplier: impl Fn(Sector) -> Option<f64>) -> Self {
        self.records
            .iter()
            .map(|r| ActivityRecord {
                sector: r.sector,
                activity: multiplier(r.sector).map_or(r.activity, |m| r.activity * m),
            })
            .collect()
    }

    /// Sectors that appear more than once, each listed once in order of
    /// their second appearance.
    #[must_use]
    pub fn duplicate_sectors(&self) -> Vec<Sector> {
        duplicates(self.records.iter().map(|r| r.sector))
    }
}

impl FromIterator<ActivityRecord> for ActivityTable {
    fn from_iter<T: IntoIterator<Item = ActivityRecord>>(iter: T) -> Self {
        Self {
            records: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a ActivityTable {
    type Item = &'a ActivityRecord;
    type IntoIter = std::slice::Iter<'a, ActivityRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

/// Emissions per unit of activity for one sector.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FactorRecord {
    /// Sector the factors apply to.
    pub sector: Sector,
    /// CO2 emitted per unit activity.
    pub co2_factor: f64,
    /// CH4 emitted per unit activity.
    pub ch4_factor: f64,
    /// N2O emitted per unit activity.
    pub n2o_factor: f64,
}

impl FactorRecord {
    /// Returns a copy with all three gas factors multiplied by `multiplier`.
    #[must_use]
    pub fn scaled(self, multiplier: f64) -> Self {
        Self {
            co2_factor: self.co2_factor * multiplier,
            ch4_factor: self.ch4_factor * multiplier,
            n2o_factor: self.n2o_factor * multiplier,
            ..self
        }
    }
}

/// Ordered emission factor rows.
///
/// If a sector appears more than once, lookups use the first occurrence.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FactorTable {
    records: Vec<FactorRecord>,
}

impl FactorTable {
    /// Creates an empty table.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            records: Vec::new(),
        }
    }

    /// Wraps an existing list of records, preserving their order.
    #[must_use]
    pub const fn from_records(records: Vec<FactorRecord>) -> Self {
        Self { records }
    }

    /// Appends a row.
    pub fn push(&mut self, record: FactorRecord) {
        self.records.push(record);
    }

    /// Returns a copy of this table with a row appended.
    #[must_use]
    pub fn with(mut self, sector: Sector, co2_factor: f64, ch4_factor: f64, n2o_factor: f64) -> Self {
        self.push(FactorRecord {
            sector,
            co2_factor,
            ch4_factor,
            n2o_factor,
        });
        self
    }

    /// All rows in insertion order.
    #[must_use]
    pub fn records(&self) -> &[FactorRecord] {
        &self.records
    }

    /// Iterates the rows in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, FactorRecord> {
        self.records.iter()
    }

    /// Number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns `true` if the table has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// First factor row for `sector`.
    #[must_use]
    pub fn get(&self, sector: Sector) -> Option<&FactorRecord> {
        self.records.iter().find(|r| r.sector == sector)
    }

    /// Returns a new table where every row for `sector` has its three gas
    /// factors multiplied by `multiplier`.
    #[must_use]
    pub fn scaled_sector(&self, sector: Sector, multiplier: f64) -> Self {
        self.records
            .iter()
            .map(|r| {
                if r.sector == sector {
                    r.scaled(multiplier)
                } else {
                    *r
                }
            })
            .collect()
    }

    /// Sectors that appear more than once.
    #[must_use]
    pub fn duplicate_sectors(&self) -> Vec<Sector> {
        duplicates(self.records.iter().map(|r| r.sector))
    }
}

impl FromIterator<FactorRecord> for FactorTable {
    fn from_iter<T: IntoIterator<Item = FactorRecord>>(iter: T) -> Self {
        Self {
            records: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a FactorTable {
    type Item = &'a FactorRecord;
    type IntoIter = std::slice::Iter<'a, FactorRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

fn duplicates(sectors: impl Iterator<Item = Sector>) -> Vec<Sector> {
    let mut seen = Vec::with_capacity(Sector::all().len());
    let mut dupes = Vec::new();
    for sector in sectors {
        if seen.contains(&sector) {
            if !dupes.contains(&sector) {
                dupes.push(sector);
            }
        } else {
            seen.push(sector);
        }
    }
    dupes
}

/// Emissions computed for one sector.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SectorEmissionResult {
    /// Sector the row describes.
    pub sector: Sector,
    /// Activity the emissions were derived from.
    pub activity: f64,
    /// CO2 mass.
    pub co2: f64,
    /// CH4 mass.
    pub ch4: f64,
    /// N2O mass.
    pub n2o: f64,
    /// GWP-weighted CO2-equivalent.
    pub co2e: f64,
}

/// City-level totals and intensity ratios.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CitySummary {
    /// Sum of CO2e across all sectors.
    pub total_co2e: f64,
    /// Total CO2e divided by population (0 when population is 0).
    pub per_capita_co2e: f64,
    /// Total CO2e divided by GDP (0 when GDP is 0).
    pub per_gdp_co2e: f64,
}

#[cfg(test)]
mod tests {
    use std::str::FromStr as _;

    use super::*;

    #[test]
    fn sector_names_round_trip() {
        for sector in Sector::all() {
            let parsed = Sector::from_str(sector.as_ref()).unwrap();
            assert_eq!(parsed, *sector);
        }
        assert_eq!(Sector::from_str("Transport").unwrap(), Sector::Transport);
        assert!(Sector::from_str("aviation").is_err());
    }

    #[test]
    fn sector_serializes_snake_case() {
        let json = serde_json::to_string(&Sector::Residential).unwrap();
        assert_eq!(json, "\"residential\"");
    }

    #[test]
    fn co2e_is_a_plain_left_to_right_sum() {
        let gwp = GwpValues::default();
        let (co2, ch4, n2o) = (0.1, 0.2, 0.3);

        let expected = co2 * gwp.co2 + ch4 * gwp.ch4 + n2o * gwp.n2o;

        assert_eq!(gwp.co2e(co2, ch4, n2o).to_bits(), expected.to_bits());
        assert!((gwp.co2e(100.0, 10.0, 1.0) - (100.0 + 10.0 * gwp.ch4 + gwp.n2o)).abs() < 1e-9);
    }

    #[test]
    fn gwp_overrides_replace_only_set_keys() {
        let gwp = GwpValues::default().with_overrides(&GwpOverrides {
            ch4: Some(34.0),
            ..GwpOverrides::default()
        });
        assert!((gwp.co2 - DEFAULT_GWP_CO2).abs() < f64::EPSILON);
        assert!((gwp.ch4 - 34.0).abs() < f64::EPSILON);
        assert!((gwp.n2o - DEFAULT_GWP_N2O).abs() < f64::EPSILON);
    }

    #[test]
    fn gwp_overrides_accept_gas_formula_keys() {
        let overrides: GwpOverrides = serde_json::from_str(r#"{"CH4": 30.0}"#).unwrap();
        assert_eq!(overrides.ch4, Some(30.0));
        assert!(overrides.co2.is_none());
        assert!(!overrides.is_empty());
    }

    #[test]
    fn factor_table_lookup_uses_first_occurrence() {
        let factors = FactorTable::new()
            .with(Sector::Energy, 1.0, 0.0, 0.0)
            .with(Sector::Energy, 5.0, 0.0, 0.0);
        assert!((factors.get(Sector::Energy).unwrap().co2_factor - 1.0).abs() < f64::EPSILON);
        assert_eq!(factors.duplicate_sectors(), vec![Sector::Energy]);
    }

    #[test]
    fn activity_scaled_by_leaves_unmatched_rows() {
        let activity = ActivityTable::new()
            .with(Sector::Transport, 100.0)
            .with(Sector::Waste, 50.0);
        let scaled =
            activity.scaled_by(|s| (s == Sector::Transport).then_some(0.5));
        assert!((scaled.activity(Sector::Transport).unwrap() - 50.0).abs() < f64::EPSILON);
        assert!((scaled.activity(Sector::Waste).unwrap() - 50.0).abs() < f64::EPSILON);
        assert!((activity.activity(Sector::Transport).unwrap() - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn activity_table_serializes_as_list() {
        let activity = ActivityTable::new().with(Sector::Industry, 10.0);
        let json = serde_json::to_string(&activity).unwrap();
        assert_eq!(json, r#"[{"sector":"industry","activity":10.0}]"#);
    }
}
