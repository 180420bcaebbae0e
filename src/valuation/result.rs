//! Valuation output structures

use std::io::Write;

use serde::{Deserialize, Serialize};

use super::Projection;
use crate::error::{DcfError, Result};

/// One column of the DCF table: every line item for a forecast period
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodRow {
    /// 1-based forecast period
    pub period: u32,
    pub revenue: f64,
    pub cogs: f64,
    pub rnd: f64,
    pub sgna: f64,
    pub ebit: f64,
    pub tax: f64,
    pub nopat: f64,
    pub da: f64,
    pub capex: f64,
    pub nwc_change: f64,
    pub ufcf: f64,
    pub discount_factor: f64,
    pub pv_ufcf: f64,
}

/// Full valuation output. Built once by the engine and never modified.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValuationResult {
    pub projected_revenues: Projection,
    #[serde(rename = "projectedEBIT")]
    pub projected_ebit: Projection,
    pub projected_free_cash_flows: Projection,

    // Terminal values (undiscounted, end of final period)
    pub terminal_value: f64,
    pub terminal_value_exit_multiple: f64,

    // Perpetuity-growth method
    pub enterprise_value: f64,
    pub equity_value: f64,
    pub share_price: f64,
    pub perp_price: f64,

    // Exit-multiple method
    pub enterprise_value_exit_multiple: f64,
    pub equity_value_exit_multiple: f64,
    pub exit_multiple_price: f64,

    // Discounting detail
    pub pv_free_cash_flows: Projection,
    pub sum_pv_free_cash_flows: f64,
    pub pv_terminal_value: f64,
    pub pv_terminal_value_exit_multiple: f64,

    pub schedule: Vec<PeriodRow>,
}

/// Headline figures for display
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValuationSummary {
    pub perp_price: f64,
    pub exit_multiple_price: f64,
    pub enterprise_value: f64,
    pub enterprise_value_exit_multiple: f64,
    pub equity_value: f64,
    pub equity_value_exit_multiple: f64,
}

impl ValuationResult {
    /// Final guard against NaN/Infinity reaching the caller
    pub fn check_finite(&self) -> Result<()> {
        let outputs = [
            ("sharePrice", self.share_price),
            ("perpPrice", self.perp_price),
            ("exitMultiplePrice", self.exit_multiple_price),
            ("enterpriseValue", self.enterprise_value),
            ("equityValue", self.equity_value),
            ("enterpriseValueExitMultiple", self.enterprise_value_exit_multiple),
            ("equityValueExitMultiple", self.equity_value_exit_multiple),
        ];

        for (name, value) in outputs {
            if !value.is_finite() {
                return Err(DcfError::calculation(
                    name,
                    value,
                    "result is not a finite number, check the inputs",
                ));
            }
        }
        Ok(())
    }

    pub fn summary(&self) -> ValuationSummary {
        ValuationSummary {
            perp_price: self.perp_price,
            exit_multiple_price: self.exit_multiple_price,
            enterprise_value: self.enterprise_value,
            enterprise_value_exit_multiple: self.enterprise_value_exit_multiple,
            equity_value: self.equity_value,
            equity_value_exit_multiple: self.equity_value_exit_multiple,
        }
    }

    /// Write the per-period schedule as CSV with a header row
    pub fn write_schedule_csv<W: Write>(&self, writer: W) -> std::result::Result<(), csv::Error> {
        let mut wtr = csv::Writer::from_writer(writer);
        for row in &self.schedule {
            wtr.serialize(row)?;
        }
        wtr.flush()?;
        Ok(())
    }
}

/// Package a computed result, rejecting it if any headline output is non-finite
pub fn assemble(result: ValuationResult) -> Result<ValuationResult> {
    result.check_finite()?;
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inputs::fixtures::flat_inputs;

    #[test]
    fn test_non_finite_output_named() {
        let mut result = flat_inputs().compute().unwrap();
        result.exit_multiple_price = f64::NAN;
        let err = assemble(result).unwrap_err();
        assert!(err.is_calculation());
        assert_eq!(err.field(), "exitMultiplePrice");
    }

    #[test]
    fn test_non_finite_equity_named() {
        let mut result = flat_inputs().compute().unwrap();
        result.equity_value_exit_multiple = f64::NEG_INFINITY;
        assert_eq!(result.check_finite().unwrap_err().field(), "equityValueExitMultiple");
    }

    #[test]
    fn test_json_uses_wire_names() {
        let result = flat_inputs().compute().unwrap();
        let json = serde_json::to_value(&result).unwrap();
        assert!(json["projectedEBIT"].is_array());
        assert!(json["projectedFreeCashFlows"].is_array());
        assert!(json["terminalValueExitMultiple"].is_number());
        assert!(json["perpPrice"].is_number());
        assert!(json["schedule"][0]["pvUfcf"].is_number());
    }

    #[test]
    fn test_schedule_csv() {
        let result = flat_inputs().compute().unwrap();
        let mut buf = Vec::new();
        result.write_schedule_csv(&mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let mut lines = text.lines();
        assert!(lines.next().unwrap().starts_with("period,revenue,cogs"));
        assert_eq!(lines.count(), 5);
    }
}
