//! Input validation run before any arithmetic

use super::FORECAST_PERIODS;
use crate::error::{DcfError, Result};
use crate::inputs::{
    CostAssumptions, FcfAssumptions, HistoricalSnapshot, RevenueAssumptions, ValuationAssumptions,
};

fn check_series(field: &'static str, series: &[f64]) -> Result<()> {
    if series.len() != FORECAST_PERIODS {
        return Err(DcfError::validation(
            field,
            format!(
                "must be an array of {} numbers, got {}",
                FORECAST_PERIODS,
                series.len()
            ),
        ));
    }

    if let Some((i, v)) = series.iter().enumerate().find(|(_, v)| !v.is_finite()) {
        return Err(DcfError::validation(
            field,
            format!("entry {} is {}, expected a finite number", i + 1, v),
        ));
    }

    Ok(())
}

/// Check structural and numeric preconditions on a full input bundle.
///
/// Series are checked first, then share count, WACC, perpetuity growth, and
/// finally the WACC/growth ordering.
pub fn validate(
    historical: &HistoricalSnapshot,
    revenue: &RevenueAssumptions,
    costs: &CostAssumptions,
    fcf: &FcfAssumptions,
    valuation: &ValuationAssumptions,
) -> Result<()> {
    let series: [(&'static str, &[f64]); 9] = [
        ("commercialGrowthRates", revenue.commercial_growth_rates.as_slice()),
        ("governmentGrowthRates", revenue.government_growth_rates.as_slice()),
        ("grossMargins", costs.gross_margins.as_slice()),
        ("rndRates", costs.rnd_rates.as_slice()),
        ("sgnaRates", costs.sgna_rates.as_slice()),
        ("taxRates", costs.tax_rates.as_slice()),
        ("daRates", fcf.da_rates.as_slice()),
        ("capexRates", fcf.capex_rates.as_slice()),
        ("nwcRates", fcf.nwc_rates.as_slice()),
    ];
    for (field, values) in series {
        check_series(field, values)?;
    }

    let share_count = historical.share_count;
    if !share_count.is_finite() || share_count <= 0.0 {
        return Err(DcfError::validation(
            "shareCount",
            format!("must be greater than 0, got {}", share_count),
        ));
    }

    let wacc = valuation.wacc;
    if !wacc.is_finite() || wacc <= 0.0 {
        return Err(DcfError::validation(
            "wacc",
            format!("WACC must be a positive number, got {}", wacc),
        ));
    }

    let growth = valuation.perp_growth_rate;
    if !growth.is_finite() {
        return Err(DcfError::validation(
            "perpGrowthRate",
            format!("perpetuity growth rate must be a valid number, got {}", growth),
        ));
    }

    if wacc <= growth {
        return Err(DcfError::validation(
            "wacc",
            format!(
                "WACC ({}) must be greater than perpetuity growth rate ({})",
                wacc, growth
            ),
        ));
    }

    Ok(())
}
