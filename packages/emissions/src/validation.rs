//! Pre-flight validation of activity and factor tables.
//!
//! Range problems (negative or empty values) are reported as messages
//! rather than errors so a caller can show every finding at once before
//! deciding whether to run the engine. Warnings are advisory and never
//! block execution.

use std::collections::BTreeMap;

use cityscale_emissions_models::{ActivityTable, FactorRecord, FactorTable, Sector};

/// Errors and warnings produced by a validation pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    /// Findings that must block the computation.
    pub errors: Vec<String>,
    /// Advisory findings.
    pub warnings: Vec<String>,
}

impl ValidationReport {
    /// Returns `true` if there are no blocking errors.
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }

    /// Appends the findings of `other` to this report.
    pub fn merge(&mut self, other: Self) {
        self.errors.extend(other.errors);
        self.warnings.extend(other.warnings);
    }

    /// Logs every warning at `warn` level.
    pub fn log_warnings(&self) {
        for warning in &self.warnings {
            log::warn!("{warning}");
        }
    }
}

/// Validates an activity table.
///
/// Errors: empty (`NaN`) values, negative values.
/// Warnings: duplicate sectors, zero activity.
#[must_use]
pub fn validate_activity(activity: &ActivityTable) -> ValidationReport {
    let mut report = ValidationReport::default();

    let dupes = activity.duplicate_sectors();
    if !dupes.is_empty() {
        report.warnings.push(format!(
            "Duplicate sectors in activity table: {}",
            join(&dupes)
        ));
    }

    if activity.iter().any(|r| r.activity.is_nan()) {
        report
            .errors
            .push("Activity values cannot be empty".to_string());
    }

    if activity.iter().any(|r| r.activity < 0.0) {
        report
            .errors
            .push("Activity values must be non-negative".to_string());
    }

    if activity.iter().any(|r| r.activity == 0.0) {
        report
            .warnings
            .push("Some activities are zero; this may understate emissions".to_string());
    }

    report
}

/// Validates an emission factor table.
///
/// Errors: empty (`NaN`) or negative values, reported per factor column.
/// Warnings: duplicate sectors (the first row is used).
#[must_use]
pub fn validate_factors(factors: &FactorTable) -> ValidationReport {
    let mut report = ValidationReport::default();

    let columns: [(&str, fn(&FactorRecord) -> f64); 3] = [
        ("co2_factor", |r| r.co2_factor),
        ("ch4_factor", |r| r.ch4_factor),
        ("n2o_factor", |r| r.n2o_factor),
    ];

    for (name, value) in columns {
        if factors.iter().any(|r| value(r).is_nan()) {
            report.errors.push(format!("Column has null values: {name}"));
        }
        if factors.iter().any(|r| value(r) < 0.0) {
            report
                .errors
                .push(format!("Column has negative factors: {name}"));
        }
    }

    if !factors.duplicate_sectors().is_empty() {
        report
            .warnings
            .push("Duplicate sectors in factor table; first match will be used".to_string());
    }

    report
}

/// Checks that each named scalar is present and non-negative.
///
/// Returns one message per offending field, in `fields` order.
#[must_use]
pub fn ensure_non_negative_fields(values: &BTreeMap<&str, f64>, fields: &[&str]) -> Vec<String> {
    fields
        .iter()
        .filter_map(|field| match values.get(field) {
            None => Some(format!("Missing value: {field}")),
            Some(v) if v.is_nan() => Some(format!("Missing value: {field}")),
            Some(v) if *v < 0.0 => Some(format!("Negative value is not allowed: {field}")),
            Some(_) => None,
        })
        .collect()
}

fn join(sectors: &[Sector]) -> String {
    sectors
        .iter()
        .map(Sector::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
