//! Batch runner for many independent valuations
//!
//! Each request is converted and valued on its own; one bad request never
//! affects the others.

use rayon::prelude::*;
use serde::Serialize;

use crate::error::Result;
use crate::inputs::{DcfRequest, RateUnit};
use crate::valuation::ValuationResult;

/// Outcome of one request in a batch
#[derive(Debug, Clone)]
pub struct BatchOutcome {
    pub label: String,
    pub result: Result<ValuationResult>,
}

/// Flat batch summary row for CSV output
#[derive(Debug, Clone, Serialize)]
pub struct BatchSummaryRow {
    pub id: String,
    pub status: &'static str,
    pub perp_price: Option<f64>,
    pub exit_multiple_price: Option<f64>,
    pub enterprise_value: Option<f64>,
    pub enterprise_value_exit_multiple: Option<f64>,
    pub equity_value: Option<f64>,
    pub equity_value_exit_multiple: Option<f64>,
    pub error: Option<String>,
}

impl From<&BatchOutcome> for BatchSummaryRow {
    fn from(outcome: &BatchOutcome) -> Self {
        match &outcome.result {
            Ok(result) => Self {
                id: outcome.label.clone(),
                status: "ok",
                perp_price: Some(result.perp_price),
                exit_multiple_price: Some(result.exit_multiple_price),
                enterprise_value: Some(result.enterprise_value),
                enterprise_value_exit_multiple: Some(result.enterprise_value_exit_multiple),
                equity_value: Some(result.equity_value),
                equity_value_exit_multiple: Some(result.equity_value_exit_multiple),
                error: None,
            },
            Err(e) => Self {
                id: outcome.label.clone(),
                status: "error",
                perp_price: None,
                exit_multiple_price: None,
                enterprise_value: None,
                enterprise_value_exit_multiple: None,
                equity_value: None,
                equity_value_exit_multiple: None,
                error: Some(e.to_string()),
            },
        }
    }
}

/// Values batches of requests with a fixed rate unit
#[derive(Debug, Clone, Default)]
pub struct ValuationRunner {
    unit: RateUnit,
}

impl ValuationRunner {
    pub fn new(unit: RateUnit) -> Self {
        Self { unit }
    }

    pub fn unit(&self) -> RateUnit {
        self.unit
    }

    /// Convert and value a single request
    pub fn run(&self, request: &DcfRequest) -> Result<ValuationResult> {
        request.into_inputs(self.unit)?.compute()
    }

    /// Value all requests in parallel, preserving input order
    pub fn run_batch(&self, requests: &[DcfRequest]) -> Vec<BatchOutcome> {
        requests
            .par_iter()
            .enumerate()
            .map(|(i, request)| {
                let label = request.label(i);
                let result = self.run(request);
                if let Err(e) = &result {
                    log::warn!("Valuation {} failed: {}", label, e);
                }
                BatchOutcome { label, result }
            })
            .collect()
    }
}

/// Write batch outcomes as a CSV summary
pub fn write_batch_csv<W: std::io::Write>(
    outcomes: &[BatchOutcome],
    writer: W,
) -> std::result::Result<(), csv::Error> {
    let mut wtr = csv::Writer::from_writer(writer);
    for outcome in outcomes {
        wtr.serialize(BatchSummaryRow::from(outcome))?;
    }
    wtr.flush()?;
    Ok(())
}
