//! DCF valuation engine

mod validate;
mod revenue;
mod operating;
mod cashflow;
mod terminal;
mod result;
mod engine;

pub use validate::validate;
pub use revenue::project_revenues;
pub use operating::{project_operating, OperatingLine};
pub use cashflow::{project_cash_flows, CashFlowLine};
pub use terminal::{
    discount_factor, exit_multiple_terminal_value, per_share, perpetuity_terminal_value,
    present_value,
};
pub use result::{PeriodRow, ValuationResult, ValuationSummary};
pub use engine::compute;

/// Number of explicit forecast periods
pub const FORECAST_PERIODS: usize = 5;

/// Share of base revenue assigned to the commercial stream; the remainder is
/// government. Fixed modelling assumption.
pub const COMMERCIAL_REVENUE_SHARE: f64 = 0.5;

/// One value per forecast period
pub type Projection = [f64; FORECAST_PERIODS];
