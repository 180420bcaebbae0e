//! Operating model: EBIT per forecast period

use serde::{Deserialize, Serialize};

use crate::inputs::CostAssumptions;

/// Operating line items for one period
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct OperatingLine {
    pub revenue: f64,
    pub cogs: f64,
    pub rnd: f64,
    pub sgna: f64,
    pub ebit: f64,
}

impl OperatingLine {
    /// Derive one period's operating lines from revenue and that period's rates
    pub fn new(revenue: f64, gross_margin: f64, rnd_rate: f64, sgna_rate: f64) -> Self {
        let cogs = revenue * (1.0 - gross_margin);
        let rnd = revenue * rnd_rate;
        let sgna = revenue * sgna_rate;

        Self {
            revenue,
            cogs,
            rnd,
            sgna,
            ebit: revenue - cogs - rnd - sgna,
        }
    }
}

/// Operating lines per period; stops at the shortest of revenues and rate series
pub fn project_operating(revenues: &[f64], costs: &CostAssumptions) -> Vec<OperatingLine> {
    revenues
        .iter()
        .zip(&costs.gross_margins)
        .zip(&costs.rnd_rates)
        .zip(&costs.sgna_rates)
        .map(|(((&revenue, &gross), &rnd), &sgna)| OperatingLine::new(revenue, gross, rnd, sgna))
        .collect()
}
