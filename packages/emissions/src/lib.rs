#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Sector emissions engine.
//!
//! Joins activity quantities to emission factors per [`Sector`], weights
//! the resulting gas masses by global warming potential, and aggregates
//! them into city-level totals and intensity ratios.
//!
//! The engine assumes its input already passed the [`validation`]
//! pre-flight checks (non-negative activity and factors). The only
//! condition it enforces itself is that every activity row has a factor
//! row to join against.

pub mod engine;
pub mod validation;

pub use cityscale_emissions_models::Sector;
pub use engine::{aggregate_emissions, compute_sector_emissions};

/// Errors that abort an emissions computation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EmissionsError {
    /// One or more activity rows reference a sector with no factor row.
    #[error("Missing emission factors for sectors: {}", format_sectors(.sectors))]
    MissingFactors {
        /// Offending sectors in activity order.
        sectors: Vec<Sector>,
    },
}

fn format_sectors(sectors: &[Sector]) -> String {
    sectors
        .iter()
        .map(Sector::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
