//! Flat request record as submitted by form/API callers

use serde::{Deserialize, Serialize};

use super::convert::{convert_rates, parse_rate_series, RateUnit};
use super::{
    CostAssumptions, DcfInputs, FcfAssumptions, HistoricalSnapshot, RevenueAssumptions,
    ValuationAssumptions,
};
use crate::error::{DcfError, Result};
use crate::valuation::FORECAST_PERIODS;

/// A rate series as supplied by a caller: numbers or a comma-separated string.
///
/// Any other JSON shape lands in `Other` and is rejected by field name when
/// the request is converted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RateField {
    Values(Vec<f64>),
    Text(String),
    Other(serde_json::Value),
}

impl RateField {
    fn to_fractions(&self, field: &'static str, unit: RateUnit) -> Result<Vec<f64>> {
        match self {
            RateField::Values(values) => Ok(convert_rates(values, unit)),
            RateField::Text(text) => parse_rate_series(field, text, unit),
            RateField::Other(value) => Err(DcfError::validation(
                field,
                format!(
                    "must be an array of {} numbers or a comma-separated string, got {}",
                    FORECAST_PERIODS, value
                ),
            )),
        }
    }
}

impl From<Vec<f64>> for RateField {
    fn from(values: Vec<f64>) -> Self {
        RateField::Values(values)
    }
}

/// One valuation request with every field optional.
///
/// Missing fields are reported by [`DcfRequest::into_inputs`] rather than by
/// the deserializer, so the caller gets the field name back.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DcfRequest {
    /// Optional label carried through batch runs
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    // Historical
    #[serde(alias = "revenue")]
    pub revenue2024: Option<f64>,
    #[serde(alias = "cogs")]
    pub cogs2024: Option<f64>,
    #[serde(alias = "sgna")]
    pub sgna2024: Option<f64>,
    #[serde(alias = "rnd")]
    pub rnd2024: Option<f64>,
    pub share_count: Option<f64>,

    // Revenue projections
    pub commercial_growth_rates: Option<RateField>,
    pub government_growth_rates: Option<RateField>,

    // Cost projections
    pub gross_margins: Option<RateField>,
    pub rnd_rates: Option<RateField>,
    pub sgna_rates: Option<RateField>,
    pub tax_rates: Option<RateField>,

    // Free cash flow projections
    pub da_rates: Option<RateField>,
    pub capex_rates: Option<RateField>,
    pub nwc_rates: Option<RateField>,

    // Valuation inputs
    pub wacc: Option<f64>,
    pub perp_growth_rate: Option<f64>,
    pub exit_multiple: Option<f64>,
    pub cash_balance: Option<f64>,
    pub debt: Option<f64>,
}

fn required<T: Clone>(value: &Option<T>, field: &'static str) -> Result<T> {
    value
        .clone()
        .ok_or_else(|| DcfError::validation(field, "missing required field"))
}

fn required_rates(
    value: &Option<RateField>,
    field: &'static str,
    unit: RateUnit,
) -> Result<Vec<f64>> {
    match value {
        Some(rates) => rates.to_fractions(field, unit),
        None => Err(DcfError::validation(field, "missing required field")),
    }
}

impl DcfRequest {
    /// Build the fixed-schema input bundle, converting rates from `unit`.
    ///
    /// Only presence and parseability are checked here; numeric
    /// preconditions belong to the validator.
    pub fn into_inputs(&self, unit: RateUnit) -> Result<DcfInputs> {
        let historical = HistoricalSnapshot {
            revenue: required(&self.revenue2024, "revenue2024")?,
            cogs: required(&self.cogs2024, "cogs2024")?,
            sgna: required(&self.sgna2024, "sgna2024")?,
            rnd: required(&self.rnd2024, "rnd2024")?,
            share_count: required(&self.share_count, "shareCount")?,
        };

        let revenue = RevenueAssumptions {
            commercial_growth_rates: required_rates(
                &self.commercial_growth_rates,
                "commercialGrowthRates",
                unit,
            )?,
            government_growth_rates: required_rates(
                &self.government_growth_rates,
                "governmentGrowthRates",
                unit,
            )?,
        };

        let costs = CostAssumptions {
            gross_margins: required_rates(&self.gross_margins, "grossMargins", unit)?,
            rnd_rates: required_rates(&self.rnd_rates, "rndRates", unit)?,
            sgna_rates: required_rates(&self.sgna_rates, "sgnaRates", unit)?,
            tax_rates: required_rates(&self.tax_rates, "taxRates", unit)?,
        };

        let fcf = FcfAssumptions {
            da_rates: required_rates(&self.da_rates, "daRates", unit)?,
            capex_rates: required_rates(&self.capex_rates, "capexRates", unit)?,
            nwc_rates: required_rates(&self.nwc_rates, "nwcRates", unit)?,
        };

        let valuation = ValuationAssumptions {
            wacc: unit.to_fraction(required(&self.wacc, "wacc")?),
            perp_growth_rate: unit.to_fraction(required(&self.perp_growth_rate, "perpGrowthRate")?),
            exit_multiple: required(&self.exit_multiple, "exitMultiple")?,
            cash_balance: required(&self.cash_balance, "cashBalance")?,
            debt: required(&self.debt, "debt")?,
        };

        Ok(DcfInputs {
            historical,
            revenue,
            costs,
            fcf,
            valuation,
        })
    }

    /// Label for logs and batch output
    pub fn label(&self, index: usize) -> String {
        self.id.clone().unwrap_or_else(|| format!("#{}", index + 1))
    }
}

impl From<&DcfInputs> for DcfRequest {
    fn from(inputs: &DcfInputs) -> Self {
        Self {
            id: None,
            revenue2024: Some(inputs.historical.revenue),
            cogs2024: Some(inputs.historical.cogs),
            sgna2024: Some(inputs.historical.sgna),
            rnd2024: Some(inputs.historical.rnd),
            share_count: Some(inputs.historical.share_count),
            commercial_growth_rates: Some(inputs.revenue.commercial_growth_rates.clone().into()),
            government_growth_rates: Some(inputs.revenue.government_growth_rates.clone().into()),
            gross_margins: Some(inputs.costs.gross_margins.clone().into()),
            rnd_rates: Some(inputs.costs.rnd_rates.clone().into()),
            sgna_rates: Some(inputs.costs.sgna_rates.clone().into()),
            tax_rates: Some(inputs.costs.tax_rates.clone().into()),
            da_rates: Some(inputs.fcf.da_rates.clone().into()),
            capex_rates: Some(inputs.fcf.capex_rates.clone().into()),
            nwc_rates: Some(inputs.fcf.nwc_rates.clone().into()),
            wacc: Some(inputs.valuation.wacc),
            perp_growth_rate: Some(inputs.valuation.perp_growth_rate),
            exit_multiple: Some(inputs.valuation.exit_multiple),
            cash_balance: Some(inputs.valuation.cash_balance),
            debt: Some(inputs.valuation.debt),
        }
    }
}
