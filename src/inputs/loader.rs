//! CSV and JSON loaders for valuation inputs
//!
//! Rate tables hold one row per forecast period:
//! `period,commercial_growth,government_growth,gross_margin,rnd_rate,sgna_rate,tax_rate,da_rate,capex_rate,nwc_rate`

use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use super::convert::RateUnit;
use super::request::DcfRequest;
use super::{CostAssumptions, DcfInputs, FcfAssumptions, RevenueAssumptions};
use crate::error::InputError;

/// Raw CSV row matching the rate table columns
#[derive(Debug, Deserialize)]
struct RateRow {
    period: u32,
    commercial_growth: f64,
    government_growth: f64,
    gross_margin: f64,
    rnd_rate: f64,
    sgna_rate: f64,
    tax_rate: f64,
    da_rate: f64,
    capex_rate: f64,
    nwc_rate: f64,
}

/// All nine rate series read from a table, already in fractions
#[derive(Debug, Clone, PartialEq)]
pub struct RateTable {
    pub revenue: RevenueAssumptions,
    pub costs: CostAssumptions,
    pub fcf: FcfAssumptions,
}

/// Read a rate table from any reader.
///
/// Rows must be numbered 1, 2, 3... in order. The row count is not checked
/// here; a short or long table is reported by the validator.
pub fn read_rate_table<R: Read>(reader: R, unit: RateUnit) -> Result<RateTable, InputError> {
    let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);

    let mut table = RateTable {
        revenue: RevenueAssumptions {
            commercial_growth_rates: Vec::new(),
            government_growth_rates: Vec::new(),
        },
        costs: CostAssumptions {
            gross_margins: Vec::new(),
            rnd_rates: Vec::new(),
            sgna_rates: Vec::new(),
            tax_rates: Vec::new(),
        },
        fcf: FcfAssumptions {
            da_rates: Vec::new(),
            capex_rates: Vec::new(),
            nwc_rates: Vec::new(),
        },
    };

    for (i, result) in reader.deserialize::<RateRow>().enumerate() {
        let row = result?;
        let expected = i as u32 + 1;
        if row.period != expected {
            return Err(InputError::Format(format!(
                "Rate table row {} has period {}, expected {}",
                i + 1,
                row.period,
                expected
            )));
        }

        let f = |v: f64| unit.to_fraction(v);
        table.revenue.commercial_growth_rates.push(f(row.commercial_growth));
        table.revenue.government_growth_rates.push(f(row.government_growth));
        table.costs.gross_margins.push(f(row.gross_margin));
        table.costs.rnd_rates.push(f(row.rnd_rate));
        table.costs.sgna_rates.push(f(row.sgna_rate));
        table.costs.tax_rates.push(f(row.tax_rate));
        table.fcf.da_rates.push(f(row.da_rate));
        table.fcf.capex_rates.push(f(row.capex_rate));
        table.fcf.nwc_rates.push(f(row.nwc_rate));
    }

    log::debug!(
        "Loaded rate table with {} periods",
        table.revenue.commercial_growth_rates.len()
    );

    Ok(table)
}

/// Load a rate table from a CSV file
pub fn load_rate_table(path: &Path, unit: RateUnit) -> Result<RateTable, InputError> {
    let file = File::open(path)?;
    read_rate_table(file, unit)
}

/// Read one JSON request and convert it to an input bundle
pub fn read_inputs<R: Read>(reader: R, unit: RateUnit) -> Result<DcfInputs, InputError> {
    let request: DcfRequest = serde_json::from_reader(reader)?;
    Ok(request.into_inputs(unit)?)
}

/// Load one JSON request file as an input bundle
pub fn load_inputs(path: &Path, unit: RateUnit) -> Result<DcfInputs, InputError> {
    let file = File::open(path)?;
    read_inputs(file, unit)
}

/// Load a JSON array of requests (a single object is accepted too)
pub fn load_requests(path: &Path) -> Result<Vec<DcfRequest>, InputError> {
    let file = File::open(path)?;
    let value: serde_json::Value = serde_json::from_reader(file)?;
    let requests = match value {
        serde_json::Value::Array(_) => serde_json::from_value(value)?,
        other => vec![serde_json::from_value(other)?],
    };
    Ok(requests)
}
