//! Single-pass valuation pipeline
//!
//! validate -> revenue -> operating -> free cash flow -> terminal and
//! discounting -> assemble. No stage feeds back into an earlier one.

use log::debug;

use super::cashflow::project_cash_flows;
use super::operating::project_operating;
use super::result::{assemble, PeriodRow, ValuationResult};
use super::revenue::project_revenues;
use super::terminal::{
    discount_factor, exit_multiple_terminal_value, per_share, perpetuity_terminal_value,
    present_value,
};
use super::validate::validate;
use super::{Projection, FORECAST_PERIODS};
use crate::error::Result;
use crate::inputs::{
    CostAssumptions, FcfAssumptions, HistoricalSnapshot, RevenueAssumptions, ValuationAssumptions,
};

/// Compute a full DCF valuation.
///
/// Pure function of its inputs: the same bundle always yields the same
/// result, and on failure nothing partial is returned.
pub fn compute(
    historical: &HistoricalSnapshot,
    revenue: &RevenueAssumptions,
    costs: &CostAssumptions,
    fcf: &FcfAssumptions,
    valuation: &ValuationAssumptions,
) -> Result<ValuationResult> {
    validate(historical, revenue, costs, fcf, valuation)?;

    let revenues = project_revenues(
        historical.revenue,
        &revenue.commercial_growth_rates,
        &revenue.government_growth_rates,
    );
    // Validated series have exactly FORECAST_PERIODS entries
    let projected_revenues: Projection = std::array::from_fn(|i| revenues[i]);
    debug!("Projected revenues: {:?}", projected_revenues);

    let operating = project_operating(&projected_revenues, costs);
    let projected_ebit: Projection = std::array::from_fn(|i| operating[i].ebit);
    debug!("Projected EBIT: {:?}", projected_ebit);

    let cash_flows = project_cash_flows(&operating, costs, fcf);
    let projected_free_cash_flows: Projection = std::array::from_fn(|i| cash_flows[i].ufcf);
    debug!("Projected UFCF: {:?}", projected_free_cash_flows);

    let last = FORECAST_PERIODS - 1;
    let wacc = valuation.wacc;
    let terminal_value = perpetuity_terminal_value(
        projected_free_cash_flows[last],
        valuation.perp_growth_rate,
        wacc,
    )?;
    let terminal_value_exit_multiple =
        exit_multiple_terminal_value(projected_ebit[last], valuation.exit_multiple);
    debug!(
        "Terminal values: perpetuity={:.2} exit_multiple={:.2}",
        terminal_value, terminal_value_exit_multiple
    );

    let mut pv_free_cash_flows = [0.0; FORECAST_PERIODS];
    for (i, pv) in pv_free_cash_flows.iter_mut().enumerate() {
        *pv = present_value(projected_free_cash_flows[i], wacc, i as u32 + 1)?;
    }
    let sum_pv_free_cash_flows: f64 = pv_free_cash_flows.iter().sum();

    let horizon = FORECAST_PERIODS as u32;
    let pv_terminal_value = present_value(terminal_value, wacc, horizon)?;
    let pv_terminal_value_exit_multiple =
        present_value(terminal_value_exit_multiple, wacc, horizon)?;

    let enterprise_value = sum_pv_free_cash_flows + pv_terminal_value;
    let enterprise_value_exit_multiple = sum_pv_free_cash_flows + pv_terminal_value_exit_multiple;

    let net_cash = valuation.cash_balance - valuation.debt;
    let equity_value = enterprise_value + net_cash;
    let equity_value_exit_multiple = enterprise_value_exit_multiple + net_cash;

    let share_price = per_share(equity_value, historical.share_count)?;
    let exit_multiple_price = per_share(equity_value_exit_multiple, historical.share_count)?;
    debug!(
        "Share price: perpetuity={:.4} exit_multiple={:.4}",
        share_price, exit_multiple_price
    );

    let schedule = operating
        .iter()
        .zip(&cash_flows)
        .enumerate()
        .map(|(i, (op, cf))| PeriodRow {
            period: i as u32 + 1,
            revenue: op.revenue,
            cogs: op.cogs,
            rnd: op.rnd,
            sgna: op.sgna,
            ebit: op.ebit,
            tax: cf.tax,
            nopat: cf.nopat,
            da: cf.da,
            capex: cf.capex,
            nwc_change: cf.nwc_change,
            ufcf: cf.ufcf,
            discount_factor: discount_factor(wacc, i as u32 + 1),
            pv_ufcf: pv_free_cash_flows[i],
        })
        .collect();

    assemble(ValuationResult {
        projected_revenues,
        projected_ebit,
        projected_free_cash_flows,
        terminal_value,
        terminal_value_exit_multiple,
        enterprise_value,
        equity_value,
        share_price,
        perp_price: share_price,
        enterprise_value_exit_multiple,
        equity_value_exit_multiple,
        exit_multiple_price,
        pv_free_cash_flows,
        sum_pv_free_cash_flows,
        pv_terminal_value,
        pv_terminal_value_exit_multiple,
        schedule,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inputs::fixtures::flat_inputs;
    use crate::inputs::DcfInputs;
    use approx::assert_relative_eq;

    fn run(inputs: &DcfInputs) -> Result<ValuationResult> {
        compute(
            &inputs.historical,
            &inputs.revenue,
            &inputs.costs,
            &inputs.fcf,
            &inputs.valuation,
        )
    }

    #[test]
    fn test_flat_scenario() {
        let result = run(&flat_inputs()).unwrap();

        for i in 0..FORECAST_PERIODS {
            assert_relative_eq!(result.projected_revenues[i], 1000.0);
            assert_relative_eq!(result.projected_ebit[i], 400.0, epsilon = 1e-9);
            assert_relative_eq!(result.projected_free_cash_flows[i], 320.0, epsilon = 1e-9);
        }

        assert_relative_eq!(result.terminal_value, 320.0 * 1.02 / 0.08, epsilon = 1e-6);
        assert_relative_eq!(result.terminal_value, 4080.0, epsilon = 1e-6);

        let pv_fcf: f64 = (1..=5).map(|i| 320.0 / 1.10_f64.powi(i)).sum();
        let expected_ev = pv_fcf + 4080.0 / 1.10_f64.powi(5);
        assert_relative_eq!(result.enterprise_value, expected_ev, epsilon = 1e-6);
        assert_relative_eq!(result.equity_value, expected_ev, epsilon = 1e-6);
        assert_relative_eq!(result.share_price, expected_ev / 100.0, epsilon = 1e-8);
        assert_eq!(result.share_price, result.perp_price);

        // Exit multiple: 400 * 8 = 3200
        assert_relative_eq!(result.terminal_value_exit_multiple, 3200.0, epsilon = 1e-6);
        let expected_ev_exit = pv_fcf + 3200.0 / 1.10_f64.powi(5);
        assert_relative_eq!(result.enterprise_value_exit_multiple, expected_ev_exit, epsilon = 1e-6);
        assert_relative_eq!(result.exit_multiple_price, expected_ev_exit / 100.0, epsilon = 1e-8);
    }

    #[test]
    fn test_flat_scenario_known_price() {
        // 320 * annuity(10%, 5) + 4080 / 1.1^5 = 1213.05 + 2533.36
        let result = run(&flat_inputs()).unwrap();
        assert_relative_eq!(result.enterprise_value, 3746.41, epsilon = 0.01);
        assert_relative_eq!(result.perp_price, 37.4641, epsilon = 0.0001);
    }

    #[test]
    fn test_deterministic() {
        let inputs = flat_inputs();
        let a = run(&inputs).unwrap();
        let b = run(&inputs).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.share_price.to_bits(), b.share_price.to_bits());
        assert_eq!(a.enterprise_value.to_bits(), b.enterprise_value.to_bits());
    }

    #[test]
    fn test_cash_and_debt_adjust_equity() {
        let mut inputs = flat_inputs();
        inputs.valuation.cash_balance = 500.0;
        inputs.valuation.debt = 200.0;
        let base = run(&flat_inputs()).unwrap();
        let result = run(&inputs).unwrap();

        assert_relative_eq!(result.enterprise_value, base.enterprise_value);
        assert_relative_eq!(result.equity_value, base.equity_value + 300.0, epsilon = 1e-9);
        assert_relative_eq!(
            result.equity_value_exit_multiple,
            base.equity_value_exit_multiple + 300.0,
            epsilon = 1e-9
        );
        assert_relative_eq!(result.perp_price, base.perp_price + 3.0, epsilon = 1e-9);
    }

    #[test]
    fn test_wacc_not_above_growth_fails_validation() {
        for (wacc, growth) in [(0.05, 0.05), (0.05, 0.06), (0.02, 0.10)] {
            let mut inputs = flat_inputs();
            inputs.valuation.wacc = wacc;
            inputs.valuation.perp_growth_rate = growth;
            let err = run(&inputs).unwrap_err();
            assert!(err.is_validation());
        }
    }

    #[test]
    fn test_wrong_series_length_fails_validation() {
        let mut inputs = flat_inputs();
        inputs.costs.tax_rates = vec![0.2; 6];
        let err = run(&inputs).unwrap_err();
        assert!(err.is_validation());
        assert_eq!(err.field(), "taxRates");
    }

    #[test]
    fn test_zero_exit_multiple() {
        let mut inputs = flat_inputs();
        inputs.valuation.exit_multiple = 0.0;
        let result = run(&inputs).unwrap();

        assert_eq!(result.terminal_value_exit_multiple, 0.0);
        assert_eq!(result.pv_terminal_value_exit_multiple, 0.0);
        assert!(result.exit_multiple_price.is_finite());
        assert_relative_eq!(
            result.enterprise_value_exit_multiple,
            result.sum_pv_free_cash_flows
        );
    }

    #[test]
    fn test_tiny_spread_stays_finite() {
        let mut inputs = flat_inputs();
        inputs.valuation.perp_growth_rate = 0.02;
        inputs.valuation.wacc = 0.02 + 1e-9;
        let result = run(&inputs).unwrap();
        assert!(result.terminal_value.is_finite());
        assert!(result.share_price.is_finite());
        assert!(result.share_price > 1e9);
    }

    #[test]
    fn test_zero_share_count_never_divides() {
        let mut inputs = flat_inputs();
        inputs.historical.share_count = 0.0;
        let err = run(&inputs).unwrap_err();
        assert_eq!(err.field(), "shareCount");
    }

    #[test]
    fn test_non_finite_cash_caught_by_assembler() {
        let mut inputs = flat_inputs();
        inputs.valuation.cash_balance = f64::NAN;
        let err = run(&inputs).unwrap_err();
        assert!(err.is_calculation());
        assert_eq!(err.field(), "sharePrice");
    }

    #[test]
    fn test_non_finite_exit_multiple_caught() {
        let mut inputs = flat_inputs();
        inputs.valuation.exit_multiple = f64::INFINITY;
        let err = run(&inputs).unwrap_err();
        assert!(err.is_calculation());
    }

    #[test]
    fn test_growth_and_costs_flow_through() {
        let mut inputs = flat_inputs();
        inputs.revenue.commercial_growth_rates = vec![0.10; 5];
        inputs.revenue.government_growth_rates = vec![0.05; 5];
        inputs.costs.rnd_rates = vec![0.05; 5];
        inputs.costs.sgna_rates = vec![0.10; 5];
        inputs.fcf.da_rates = vec![0.03; 5];
        inputs.fcf.capex_rates = vec![0.04; 5];
        inputs.fcf.nwc_rates = vec![0.01; 5];
        let result = run(&inputs).unwrap();

        let rev_1 = 500.0 * 1.10 + 500.0 * 1.05;
        assert_relative_eq!(result.projected_revenues[0], rev_1, epsilon = 1e-9);
        let ebit_1 = rev_1 * (0.4 - 0.05 - 0.10);
        assert_relative_eq!(result.projected_ebit[0], ebit_1, epsilon = 1e-9);
        let ufcf_1 = ebit_1 * 0.8 + rev_1 * (0.03 - 0.04 - 0.01);
        assert_relative_eq!(result.projected_free_cash_flows[0], ufcf_1, epsilon = 1e-9);

        for w in result.projected_revenues.windows(2) {
            assert!(w[1] > w[0]);
        }
    }

    #[test]
    fn test_schedule_matches_vectors() {
        let mut inputs = flat_inputs();
        inputs.revenue.commercial_growth_rates = vec![0.2, 0.1, 0.0, -0.1, 0.05];
        let result = run(&inputs).unwrap();

        assert_eq!(result.schedule.len(), FORECAST_PERIODS);
        for (i, row) in result.schedule.iter().enumerate() {
            assert_eq!(row.period, i as u32 + 1);
            assert_eq!(row.revenue, result.projected_revenues[i]);
            assert_eq!(row.ebit, result.projected_ebit[i]);
            assert_eq!(row.ufcf, result.projected_free_cash_flows[i]);
            assert_relative_eq!(row.pv_ufcf, row.ufcf * row.discount_factor, epsilon = 1e-9);
        }
        assert_relative_eq!(
            result.sum_pv_free_cash_flows,
            result.pv_free_cash_flows.iter().sum::<f64>()
        );
    }

    #[test]
    fn test_negative_growth_perpetuity() {
        let mut inputs = flat_inputs();
        inputs.valuation.perp_growth_rate = -0.02;
        let result = run(&inputs).unwrap();
        assert_relative_eq!(result.terminal_value, 320.0 * 0.98 / 0.12, epsilon = 1e-6);
    }
}
