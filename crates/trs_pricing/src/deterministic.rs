//! Direct-formula pricing: deterministic forwards instead of simulation.
//!
//! Under zero volatility every asset rides its risk-neutral forward, so
//! the swap's legs evaluate on the deterministic forward path with the
//! same reset mechanics as a simulated one. This pricer is used both
//! stand-alone and as the convergence reference for the Monte Carlo
//! engine.

use tracing::debug;

use trs_core::curves::{CurveError, PillarCurve, YieldCurve};
use trs_models::gbm::CorrelatedGbm;
use trs_models::trs::TotalReturnSwap;

use crate::context::{AssetCurves, MarketView};
use crate::error::SimulationError;
use crate::mc::McEstimate;

// Internal reuse of the path evaluator keeps the two pricers consistent.
use crate::mc::evaluate_swap_on_path;

/// Forward price of one underlying at time `t`: spot grown at the
/// discount curve's zero rate net of dividend and repo carry.
///
/// ```text
/// F(t) = S * exp((r(t) - q(t) - b(t)) * t) = S / Df(t) * exp(-(q + b) * t)
/// ```
pub fn forward_price(
    spot: f64,
    t: f64,
    discount: &PillarCurve<f64>,
    carry: &AssetCurves,
) -> Result<f64, CurveError> {
    let df = discount.discount_factor(t)?;
    let mut integrated_carry = 0.0;
    for curve in [&carry.dividend, &carry.repo].into_iter().flatten() {
        integrated_carry += curve.rate_at(t)? * t;
    }
    Ok(spot / df * (-integrated_carry).exp())
}

/// A deterministic price with the matching fair spread.
#[derive(Clone, Debug, PartialEq)]
pub struct DeterministicPrice {
    /// Present value on the deterministic forward path.
    pub price: f64,
    /// Spread zeroing the price, when the annuity supports the solve.
    pub fair_spread: Option<f64>,
}

/// Prices a TRS on the deterministic forward path.
///
/// Equivalent to the Monte Carlo engine under a zero-volatility model;
/// see the convergence tests in `tests/convergence.rs`.
pub struct DeterministicTrsPricer;

impl DeterministicTrsPricer {
    /// Prices the swap. The model contributes spots and the asset order;
    /// volatilities and correlation are ignored.
    pub fn price(
        swap: &TotalReturnSwap,
        model: &CorrelatedGbm,
        view: &MarketView,
    ) -> Result<DeterministicPrice, SimulationError> {
        model.check_basket(&swap.asset_leg().basket)?;

        let schedule = swap.schedule()?;
        let times = schedule.times_from(view.as_of(), view.day_count());
        if times.first().copied().unwrap_or(0.0) <= 0.0 {
            return Err(SimulationError::InvalidConfig {
                reason: "first observation at or before the valuation date".to_string(),
            });
        }
        let accruals = schedule.accruals(swap.funding_leg().day_count);

        let weights: Vec<f64> = swap
            .asset_leg()
            .basket
            .components()
            .iter()
            .map(|(_, w)| *w)
            .collect();
        let spots = model.initial_state();
        let initial_basket: f64 = weights.iter().zip(spots.iter()).map(|(w, s)| w * s).sum();

        let empty_curves = AssetCurves::default();
        let mut dfs = Vec::with_capacity(times.len());
        let mut basket_values = Vec::with_capacity(times.len());
        for &t in &times {
            dfs.push(view.discount().discount_factor(t)?);
            let mut value = 0.0;
            for (a, (&weight, &spot)) in weights.iter().zip(spots.iter()).enumerate() {
                let carry = view.asset_curves().get(a).unwrap_or(&empty_curves);
                value += weight * forward_price(spot, t, view.discount(), carry)?;
            }
            basket_values.push(value);
        }

        let outcome = evaluate_swap_on_path(swap, initial_basket, &basket_values, &accruals, &dfs);
        let price = swap.side().sign() * outcome.pv_at(swap.funding_leg().spread);
        let fair_spread = if outcome.annuity.abs() > 1e-9 {
            Some(outcome.pv_zero_spread / outcome.annuity)
        } else {
            None
        };

        debug!(trade = swap.trade_id(), price, "deterministic pricing complete");
        Ok(DeterministicPrice { price, fair_spread })
    }

    /// Wraps the deterministic price in the Monte Carlo result shape
    /// (zero standard error), for callers that consume both engines
    /// uniformly.
    pub fn price_as_estimate(
        swap: &TotalReturnSwap,
        model: &CorrelatedGbm,
        view: &MarketView,
    ) -> Result<McEstimate, SimulationError> {
        let det = Self::price(swap, model, view)?;
        Ok(McEstimate {
            price: det.price,
            std_error: 0.0,
            confidence_level: 1.0,
            half_width: 0.0,
            fair_spread: det.fair_spread,
            n_paths: 1,
            warnings: Vec::new(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::sync::Arc;
    use trs_core::curves::Interpolation;
    use trs_core::types::{BasketId, Currency, Date, DayCountConvention, Ticker};
    use trs_models::basket::Basket;
    use trs_models::gbm::GbmAsset;
    use trs_models::schedules::Frequency;
    use trs_models::trs::{ResetPolicy, Side};

    fn flat(rate: f64) -> Arc<PillarCurve<f64>> {
        Arc::new(
            PillarCurve::new(
                vec![0.5, 30.0],
                vec![rate, rate],
                Interpolation::LogLinearDiscount,
            )
            .unwrap(),
        )
    }

    #[test]
    fn test_forward_price_flat_rate() {
        let discount = flat(0.005);
        let forward = forward_price(100.0, 1.0, &discount, &AssetCurves::default()).unwrap();
        assert_relative_eq!(forward, 100.0 * (0.005_f64).exp(), epsilon = 1e-10);
    }

    #[test]
    fn test_forward_price_with_carry() {
        let discount = flat(0.05);
        let carry = AssetCurves {
            dividend: Some(flat(0.02)),
            repo: Some(flat(0.01)),
        };
        let forward = forward_price(100.0, 2.0, &discount, &carry).unwrap();
        assert_relative_eq!(forward, 100.0 * (0.02_f64 * 2.0).exp(), epsilon = 1e-10);
    }

    #[test]
    fn test_flat_rate_trs_is_par() {
        let swap = TotalReturnSwap::new(
            "TRS-1",
            Basket::new(BasketId::new("B"))
                .with_component(Ticker::new("AAA"), 1.0)
                .unwrap(),
            ResetPolicy::Periodic,
            0.0,
            DayCountConvention::Act365Fixed,
            1_000_000.0,
            Currency::USD,
            Side::ReceiveTotalReturn,
            Date::from_ymd(2020, 6, 15).unwrap(),
            Date::from_ymd(2021, 6, 15).unwrap(),
            Frequency::Quarterly,
        )
        .unwrap();
        let view = MarketView::new(
            Date::from_ymd(2020, 6, 15).unwrap(),
            DayCountConvention::Act365Fixed,
            flat(0.005),
            vec![AssetCurves::default()],
        );
        let model = CorrelatedGbm::single(GbmAsset::new(Ticker::new("AAA"), 100.0, 0.0).unwrap());

        let result = DeterministicTrsPricer::price(&swap, &model, &view).unwrap();
        assert_relative_eq!(result.price, 0.0, epsilon = 1e-4);
        // Fair spread of a par swap is (numerically) zero.
        assert_relative_eq!(result.fair_spread.unwrap(), 0.0, epsilon = 1e-9);
    }
}
