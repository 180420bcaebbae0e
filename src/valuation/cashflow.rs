//! Unlevered free cash flow per forecast period

use serde::{Deserialize, Serialize};

use super::operating::OperatingLine;
use crate::inputs::{CostAssumptions, FcfAssumptions};

/// Free-cash-flow bridge from EBIT for one period
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CashFlowLine {
    pub tax: f64,
    pub nopat: f64,
    pub da: f64,
    pub capex: f64,
    pub nwc_change: f64,
    pub ufcf: f64,
}

impl CashFlowLine {
    /// UFCF = NOPAT + D&A - capex - change in NWC
    pub fn new(
        line: &OperatingLine,
        tax_rate: f64,
        da_rate: f64,
        capex_rate: f64,
        nwc_rate: f64,
    ) -> Self {
        let nopat = line.ebit * (1.0 - tax_rate);
        let da = line.revenue * da_rate;
        let capex = line.revenue * capex_rate;
        let nwc_change = line.revenue * nwc_rate;

        Self {
            tax: line.ebit - nopat,
            nopat,
            da,
            capex,
            nwc_change,
            ufcf: nopat + da - capex - nwc_change,
        }
    }
}

/// Cash-flow lines per period; stops at the shortest input
pub fn project_cash_flows(
    lines: &[OperatingLine],
    costs: &CostAssumptions,
    fcf: &FcfAssumptions,
) -> Vec<CashFlowLine> {
    lines
        .iter()
        .zip(&costs.tax_rates)
        .zip(&fcf.da_rates)
        .zip(&fcf.capex_rates)
        .zip(&fcf.nwc_rates)
        .map(|((((line, &tax), &da), &capex), &nwc)| CashFlowLine::new(line, tax, da, capex, nwc))
        .collect()
}
