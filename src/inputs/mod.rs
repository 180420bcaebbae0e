//! Valuation inputs: historical actuals, forward rate assumptions and
//! valuation assumptions

mod convert;
mod request;
pub mod loader;

pub use convert::{convert_rates, parse_rate_series, RateUnit};
pub use request::{DcfRequest, RateField};
pub use loader::{load_rate_table, RateTable};

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::valuation::{self, ValuationResult};

/// Base-year (period 0) actuals
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoricalSnapshot {
    pub revenue: f64,
    pub cogs: f64,
    pub sgna: f64,
    pub rnd: f64,
    pub share_count: f64,
}

impl HistoricalSnapshot {
    /// Base-year gross margin, or None without revenue
    pub fn gross_margin(&self) -> Option<f64> {
        if self.revenue == 0.0 {
            return None;
        }
        Some((self.revenue - self.cogs) / self.revenue)
    }

    /// Base-year EBIT
    pub fn ebit(&self) -> f64 {
        self.revenue - self.cogs - self.sgna - self.rnd
    }
}

/// Year-over-year growth for the two revenue streams
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RevenueAssumptions {
    pub commercial_growth_rates: Vec<f64>,
    pub government_growth_rates: Vec<f64>,
}

/// Margin and expense rates, all as fractions of projected revenue
/// (tax rate applies to EBIT)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CostAssumptions {
    pub gross_margins: Vec<f64>,
    pub rnd_rates: Vec<f64>,
    pub sgna_rates: Vec<f64>,
    pub tax_rates: Vec<f64>,
}

/// Free-cash-flow adjustments as fractions of projected revenue
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FcfAssumptions {
    pub da_rates: Vec<f64>,
    pub capex_rates: Vec<f64>,
    pub nwc_rates: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValuationAssumptions {
    /// Discount rate (fraction)
    pub wacc: f64,
    /// Perpetuity growth rate (fraction), must stay below `wacc`
    pub perp_growth_rate: f64,
    /// Multiple applied to final-period EBIT
    pub exit_multiple: f64,
    pub cash_balance: f64,
    pub debt: f64,
}

/// Complete input bundle for one valuation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DcfInputs {
    pub historical: HistoricalSnapshot,
    pub revenue: RevenueAssumptions,
    pub costs: CostAssumptions,
    pub fcf: FcfAssumptions,
    pub valuation: ValuationAssumptions,
}

impl DcfInputs {
    /// Run the input validator without computing anything
    pub fn validate(&self) -> Result<&Self> {
        valuation::validate(
            &self.historical,
            &self.revenue,
            &self.costs,
            &self.fcf,
            &self.valuation,
        )?;
        Ok(self)
    }

    pub fn compute(&self) -> Result<ValuationResult> {
        valuation::compute(
            &self.historical,
            &self.revenue,
            &self.costs,
            &self.fcf,
            &self.valuation,
        )
    }

    /// Replace all nine rate series with those from a loaded rate table
    pub fn with_rate_table(mut self, table: RateTable) -> Self {
        self.revenue = table.revenue;
        self.costs = table.costs;
        self.fcf = table.fcf;
        self
    }
}
