//! Terminal values and discounting
//!
//! Both terminal values are anchored at the end of the final forecast
//! period and discounted over the same number of periods as the final cash
//! flow.

use crate::error::{DcfError, Result};

/// Gordon-growth terminal value: `final_fcf * (1 + g) / (wacc - g)`.
///
/// Checks WACC and the rate ordering on its own so it is safe to call
/// without the input validator having run first.
pub fn perpetuity_terminal_value(final_fcf: f64, perp_growth_rate: f64, wacc: f64) -> Result<f64> {
    if !wacc.is_finite() || wacc <= 0.0 {
        return Err(DcfError::calculation(
            "wacc",
            wacc,
            format!("WACC ({}) must be a positive finite number", wacc),
        ));
    }

    if wacc <= perp_growth_rate {
        return Err(DcfError::calculation(
            "wacc",
            wacc,
            format!(
                "WACC ({}) must be greater than perpetuity growth rate ({}) for the terminal value calculation",
                wacc, perp_growth_rate
            ),
        ));
    }

    let denominator = wacc - perp_growth_rate;
    if denominator <= 0.0 || !denominator.is_finite() {
        return Err(DcfError::calculation(
            "terminalValueDenominator",
            denominator,
            format!(
                "WACC ({}) - growth rate ({}) is not a positive finite number",
                wacc, perp_growth_rate
            ),
        ));
    }

    let terminal_value = final_fcf * (1.0 + perp_growth_rate) / denominator;
    if !terminal_value.is_finite() {
        return Err(DcfError::calculation(
            "terminalValue",
            terminal_value,
            "terminal value is not finite, check WACC and growth rate",
        ));
    }

    Ok(terminal_value)
}

/// Exit-multiple terminal value: `final_ebit * multiple`. A zero multiple is
/// allowed and gives zero.
pub fn exit_multiple_terminal_value(final_ebit: f64, exit_multiple: f64) -> f64 {
    final_ebit * exit_multiple
}

/// `1 / (1 + rate)^periods`
pub fn discount_factor(rate: f64, periods_ahead: u32) -> f64 {
    1.0 / (1.0 + rate).powi(periods_ahead as i32)
}

/// Present value of a cash flow realised `periods_ahead` periods from now
pub fn present_value(cash_flow: f64, rate: f64, periods_ahead: u32) -> Result<f64> {
    if rate <= -1.0 {
        return Err(DcfError::calculation(
            "discountRate",
            rate,
            format!("discount rate ({}) must be greater than -1", rate),
        ));
    }

    let pv = cash_flow / (1.0 + rate).powi(periods_ahead as i32);
    if !pv.is_finite() {
        return Err(DcfError::calculation(
            "presentValue",
            pv,
            format!(
                "present value of {} at rate {} over {} periods is not finite",
                cash_flow, rate, periods_ahead
            ),
        ));
    }

    Ok(pv)
}

/// Equity value per share.
///
/// Re-checks the share count independently of the validator.
pub fn per_share(equity_value: f64, share_count: f64) -> Result<f64> {
    if share_count.is_nan() || share_count <= 0.0 {
        return Err(DcfError::calculation(
            "shareCount",
            share_count,
            "shareCount must be greater than 0 to calculate share price",
        ));
    }
    Ok(equity_value / share_count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_perpetuity_value() {
        let tv = perpetuity_terminal_value(320.0, 0.02, 0.10).unwrap();
        assert_relative_eq!(tv, 4080.0, epsilon = 1e-9);
    }

    #[test]
    fn test_perpetuity_rejects_wacc_at_growth() {
        let err = perpetuity_terminal_value(320.0, 0.05, 0.05).unwrap_err();
        assert!(err.is_calculation());
        let msg = err.to_string();
        assert!(msg.contains("0.05"));

        let err = perpetuity_terminal_value(320.0, 0.08, 0.05).unwrap_err();
        assert!(err.is_calculation());
    }

    #[test]
    fn test_perpetuity_rejects_non_positive_wacc() {
        // Ordering holds here but a negative WACC is still meaningless
        let err = perpetuity_terminal_value(320.0, -0.6, -0.5).unwrap_err();
        assert!(err.is_calculation());
        assert_eq!(err.field(), "wacc");
        assert!(err.to_string().contains("positive"));

        let err = perpetuity_terminal_value(320.0, -0.02, 0.0).unwrap_err();
        assert_eq!(err.field(), "wacc");
        assert!(perpetuity_terminal_value(320.0, -0.02, f64::NAN).is_err());
    }

    #[test]
    fn test_perpetuity_rejects_non_finite_rates() {
        assert!(perpetuity_terminal_value(320.0, f64::NEG_INFINITY, 0.10).is_err());
        assert!(perpetuity_terminal_value(320.0, 0.02, f64::INFINITY).is_err());
        assert!(perpetuity_terminal_value(f64::INFINITY, 0.02, 0.10).is_err());
    }

    #[test]
    fn test_perpetuity_tiny_spread_is_finite() {
        let tv = perpetuity_terminal_value(320.0, 0.02, 0.02 + 1e-12).unwrap();
        assert!(tv.is_finite());
        assert!(tv > 1e14);
    }

    #[test]
    fn test_exit_multiple_zero() {
        assert_eq!(exit_multiple_terminal_value(400.0, 0.0), 0.0);
        assert_relative_eq!(exit_multiple_terminal_value(400.0, 8.0), 3200.0);
        assert_relative_eq!(exit_multiple_terminal_value(-50.0, 6.0), -300.0);
    }

    #[test]
    fn test_present_value() {
        assert_relative_eq!(present_value(110.0, 0.10, 1).unwrap(), 100.0, epsilon = 1e-9);
        assert_relative_eq!(present_value(121.0, 0.10, 2).unwrap(), 100.0, epsilon = 1e-9);
        assert_relative_eq!(present_value(50.0, 0.10, 0).unwrap(), 50.0);
    }

    #[test]
    fn test_present_value_rate_floor() {
        let err = present_value(100.0, -1.0, 3).unwrap_err();
        assert_eq!(err.field(), "discountRate");
        assert!(present_value(100.0, -0.5, 1).is_ok());
    }

    #[test]
    fn test_present_value_non_finite() {
        let err = present_value(f64::NAN, 0.1, 1).unwrap_err();
        assert_eq!(err.field(), "presentValue");
    }

    #[test]
    fn test_discount_factor_matches_present_value() {
        for year in 1..=5 {
            let df = discount_factor(0.08, year);
            assert_relative_eq!(df * 250.0, present_value(250.0, 0.08, year).unwrap(), epsilon = 1e-9);
        }
    }

    #[test]
    fn test_per_share_guard() {
        assert_relative_eq!(per_share(1000.0, 100.0).unwrap(), 10.0);
        assert_eq!(per_share(1000.0, 0.0).unwrap_err().field(), "shareCount");
        assert_eq!(per_share(1000.0, -5.0).unwrap_err().field(), "shareCount");
        assert_eq!(per_share(1000.0, f64::NAN).unwrap_err().field(), "shareCount");
    }
}
