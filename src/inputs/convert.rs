//! Unit boundary between user-entered rates and the engine
//!
//! The engine consumes every rate as a fraction (0.08, not 8). Anything that
//! reads rates from people or files goes through here first.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{DcfError, Result};

/// Unit that incoming rates are expressed in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RateUnit {
    /// 0.08 means 8%
    #[default]
    Fraction,
    /// 8 means 8%
    Percent,
}

impl RateUnit {
    pub fn to_fraction(self, value: f64) -> f64 {
        match self {
            RateUnit::Fraction => value,
            RateUnit::Percent => value / 100.0,
        }
    }
}

impl fmt::Display for RateUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RateUnit::Fraction => write!(f, "fraction"),
            RateUnit::Percent => write!(f, "percent"),
        }
    }
}

impl FromStr for RateUnit {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fraction" | "decimal" => Ok(RateUnit::Fraction),
            "percent" | "pct" | "%" => Ok(RateUnit::Percent),
            other => Err(format!("Unknown rate unit: {}", other)),
        }
    }
}

/// Convert an already-numeric rate series to fractions
pub fn convert_rates(values: &[f64], unit: RateUnit) -> Vec<f64> {
    values.iter().map(|&v| unit.to_fraction(v)).collect()
}

/// Parse a comma-separated rate series such as `"8, 7.5, 7, 6, 5"`.
///
/// Empty entries are skipped. Series length is left to the validator.
pub fn parse_rate_series(field: &'static str, text: &str, unit: RateUnit) -> Result<Vec<f64>> {
    text.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(|item| {
            item.parse::<f64>()
                .map(|v| unit.to_fraction(v))
                .map_err(|_| {
                    DcfError::validation(field, format!("'{}' is not a number", item))
                })
        })
        .collect()
}
