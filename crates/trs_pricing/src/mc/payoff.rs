//! Leg evaluation along one simulated (or deterministic) path.

use trs_models::trs::{ResetState, TotalReturnSwap};

/// Discounted totals of one path through the swap.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub(crate) struct PathOutcome {
    /// Present value at zero spread: asset leg minus the funding leg's
    /// rate component.
    pub pv_zero_spread: f64,
    /// Spread annuity: the PV picked up per unit of spread. The full
    /// value is linear in the spread,
    /// `pv(s) = side * (pv_zero_spread - s * annuity)`.
    pub annuity: f64,
    /// Number of reset events that fired before final settlement.
    pub resets: usize,
}

impl PathOutcome {
    /// Present value at the given spread, before the side sign.
    pub(crate) fn pv_at(&self, spread: f64) -> f64 {
        self.pv_zero_spread - spread * self.annuity
    }
}

/// Walks the observation schedule once, applying the reset state machine
/// and discounting both legs.
///
/// `basket_values` holds the simulated basket level at each schedule
/// date, `accruals` the funding-leg accrual fractions and `dfs` the
/// discount factors at the schedule dates. The share count is fixed at
/// inception (`notional / initial_basket`); the funding leg accrues on
/// the reference value in force during each period, so resets rebase the
/// effective notional. The final date always settles the outstanding
/// return, whatever the reset policy.
pub(crate) fn evaluate_swap_on_path(
    swap: &TotalReturnSwap,
    initial_basket: f64,
    basket_values: &[f64],
    accruals: &[f64],
    dfs: &[f64],
) -> PathOutcome {
    debug_assert_eq!(basket_values.len(), accruals.len());
    debug_assert_eq!(basket_values.len(), dfs.len());

    let policy = &swap.asset_leg().reset_policy;
    let shares = swap.notional() / initial_basket;
    let mut state = ResetState::new(initial_basket);

    let n = basket_values.len();
    let mut pv_asset = 0.0;
    let mut pv_funding_rate = 0.0;
    let mut annuity = 0.0;
    let mut resets = 0;

    let mut df_prev = 1.0;
    for i in 0..n {
        let df = dfs[i];
        let effective_notional = shares * state.reference();

        // Funding at the simple forward implied by the discount curve:
        // rate * accrual collapses to the df ratio.
        pv_funding_rate += effective_notional * (df_prev / df - 1.0) * df;
        annuity += effective_notional * accruals[i] * df;

        let price = basket_values[i];
        if i == n - 1 {
            // Final settlement of the outstanding return.
            pv_asset += shares * (price - state.reference()) * df;
        } else if let Some(event) = state.observe(price, policy) {
            pv_asset += shares * (event.new_reference - event.previous_reference) * df;
            resets += 1;
        }

        df_prev = df;
    }

    PathOutcome {
        pv_zero_spread: pv_asset - pv_funding_rate,
        annuity,
        resets,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use trs_core::types::{BasketId, Currency, Date, DayCountConvention, Ticker};
    use trs_models::basket::Basket;
    use trs_models::schedules::Frequency;
    use trs_models::trs::{ResetPolicy, Side};

    fn swap(reset_policy: ResetPolicy) -> TotalReturnSwap {
        TotalReturnSwap::new(
            "TRS-1",
            Basket::new(BasketId::new("B"))
                .with_component(Ticker::new("AAA"), 1.0)
                .unwrap(),
            reset_policy,
            0.0,
            DayCountConvention::Act365Fixed,
            1_000_000.0,
            Currency::USD,
            Side::ReceiveTotalReturn,
            Date::from_ymd(2020, 6, 15).unwrap(),
            Date::from_ymd(2021, 6, 15).unwrap(),
            Frequency::Quarterly,
        )
        .unwrap()
    }

    /// Flat curve fixture: quarterly times and matching discount factors.
    fn fixture(rate: f64) -> (Vec<f64>, Vec<f64>, Vec<f64>) {
        let times: Vec<f64> = vec![0.25, 0.5, 0.75, 1.0];
        let accruals = vec![0.25; 4];
        let dfs = times.iter().map(|t| (-rate * t).exp()).collect();
        (times, accruals, dfs)
    }

    #[test]
    fn test_zero_vol_periodic_trs_is_par_at_zero_spread() {
        let swap = swap(ResetPolicy::Periodic);
        let rate = 0.005;
        let (times, accruals, dfs) = fixture(rate);
        // Deterministic forward path at the funding rate.
        let basket_values: Vec<f64> = times.iter().map(|t| 100.0 * (rate * t).exp()).collect();

        let outcome = evaluate_swap_on_path(&swap, 100.0, &basket_values, &accruals, &dfs);
        // Asset growth at the funding rate nets exactly against funding.
        assert_relative_eq!(outcome.pv_at(0.0), 0.0, epsilon = 1e-6);
        assert_eq!(outcome.resets, 3); // every non-final observation
    }

    #[test]
    fn test_threshold_band_moves_emit_no_reset() {
        let swap = swap(ResetPolicy::Threshold { threshold: 0.10 });
        let (_, accruals, dfs) = fixture(0.0);
        // +5% then -5% around the reference, flat into settlement.
        let basket_values = vec![105.0, 95.0, 100.0, 100.0];

        let outcome = evaluate_swap_on_path(&swap, 100.0, &basket_values, &accruals, &dfs);
        assert_eq!(outcome.resets, 0);
        // Final settles at the unchanged reference: no asset PV, and at
        // zero rate the funding rate component is zero too.
        assert_relative_eq!(outcome.pv_at(0.0), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_threshold_breach_emits_exactly_one_reset() {
        let swap = swap(ResetPolicy::Threshold { threshold: 0.10 });
        let (_, accruals, dfs) = fixture(0.0);
        // +15% fires one reset; later moves stay inside the new band.
        let basket_values = vec![115.0, 118.0, 112.0, 115.0];

        let outcome = evaluate_swap_on_path(&swap, 100.0, &basket_values, &accruals, &dfs);
        assert_eq!(outcome.resets, 1);
        // Total asset PV at zero rates is the full move: 15 + (115-115)=15
        // per 100 of reference on 10_000 shares.
        assert_relative_eq!(outcome.pv_zero_spread, 10_000.0 * 15.0, epsilon = 1e-9);
    }

    #[test]
    fn test_annuity_scales_with_effective_notional() {
        let swap = swap(ResetPolicy::Periodic);
        let (_, accruals, dfs) = fixture(0.0);
        // Basket doubles immediately and stays; funding accrues on the
        // rebased notional from the second period on.
        let basket_values = vec![200.0, 200.0, 200.0, 200.0];

        let outcome = evaluate_swap_on_path(&swap, 100.0, &basket_values, &accruals, &dfs);
        // Periods: 1 at 1_000_000, then 3 at 2_000_000, each * 0.25.
        assert_relative_eq!(
            outcome.annuity,
            0.25 * (1_000_000.0 + 3.0 * 2_000_000.0),
            epsilon = 1e-9
        );
    }

    #[test]
    fn test_pv_is_linear_in_spread() {
        let swap = swap(ResetPolicy::Periodic);
        let (times, accruals, dfs) = fixture(0.005);
        let basket_values: Vec<f64> = times.iter().map(|t| 100.0 * (0.02 * t).exp()).collect();
        let outcome = evaluate_swap_on_path(&swap, 100.0, &basket_values, &accruals, &dfs);

        let pv0 = outcome.pv_at(0.0);
        let pv1 = outcome.pv_at(0.001);
        let pv2 = outcome.pv_at(0.002);
        assert_relative_eq!(pv0 - pv1, pv1 - pv2, epsilon = 1e-9);
    }
}
