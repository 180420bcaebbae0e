//! DCF Valuation - discounted-cash-flow equity valuation engine
//!
//! This library provides:
//! - Two-stream revenue projection over a five-period forecast
//! - Operating (EBIT) and unlevered free-cash-flow models
//! - Perpetuity-growth and exit-multiple terminal values
//! - Enterprise, equity and per-share values under both methods
//! - Input loading with explicit percent/fraction conversion
//! - Parallel batch valuation

pub mod error;
pub mod inputs;
pub mod valuation;
pub mod runner;

// Re-export commonly used types
pub use error::{DcfError, InputError, Result};
pub use inputs::{
    CostAssumptions, DcfInputs, DcfRequest, FcfAssumptions, HistoricalSnapshot, RateUnit,
    RevenueAssumptions, ValuationAssumptions,
};
pub use valuation::{compute, PeriodRow, ValuationResult, ValuationSummary, FORECAST_PERIODS};
pub use runner::ValuationRunner;
