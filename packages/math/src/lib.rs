#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Numeric helpers shared by the emissions and forecast engines.
//!
//! Everything here is a pure function over plain numbers: range clamping,
//! division that degrades to zero instead of producing infinities, and
//! inclusive year ranges for forecast horizons.

use std::ops::RangeInclusive;

/// Error returned when a year range ends before it starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("end_year must be >= start_year (got start_year={start_year}, end_year={end_year})")]
pub struct YearRangeError {
    /// First year of the requested range.
    pub start_year: i32,
    /// Last year of the requested range.
    pub end_year: i32,
}

/// Clamps `value` into `[minimum, maximum]`.
///
/// `NaN` inputs collapse to `minimum` so that downstream multipliers stay
/// finite.
#[must_use]
pub fn clamp(value: f64, minimum: f64, maximum: f64) -> f64 {
    if value.is_nan() {
        return minimum;
    }
    value.max(minimum).min(maximum)
}

/// Clamps `value` into the unit interval `[0, 1]`.
#[must_use]
pub fn clamp_unit(value: f64) -> f64 {
    clamp(value, 0.0, 1.0)
}

/// Divides `numerator` by `denominator`, returning `0.0` when the
/// denominator is zero.
#[must_use]
pub fn safe_divide(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        0.0
    } else {
        numerator / denominator
    }
}

/// Returns the inclusive range `start_year..=end_year`.
///
/// # Errors
///
/// Returns [`YearRangeError`] if `end_year < start_year`.
pub const fn year_range(
    start_year: i32,
    end_year: i32,
) -> Result<RangeInclusive<i32>, YearRangeError> {
    if end_year < start_year {
        return Err(YearRangeError {
            start_year,
            end_year,
        });
    }
    Ok(start_year..=end_year)
}
