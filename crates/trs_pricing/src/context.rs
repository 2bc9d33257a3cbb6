//! The curve view a pricing run reads from.

use std::sync::Arc;

use trs_core::curves::{CurveError, PillarCurve, YieldCurve};
use trs_core::types::{Date, DayCountConvention};

/// Carry curves for one underlying.
///
/// Missing curves mean zero carry of that kind.
#[derive(Clone, Debug, Default)]
pub struct AssetCurves {
    /// Continuously compounded dividend yield curve.
    pub dividend: Option<Arc<PillarCurve<f64>>>,
    /// Continuously compounded repo rate curve.
    pub repo: Option<Arc<PillarCurve<f64>>>,
}

impl AssetCurves {
    /// Forward carry rate over `[t1, t2]` implied by the average-rate
    /// curves: `(q(t2)*t2 - q(t1)*t1) / (t2 - t1)` per curve, summed over
    /// dividend and repo.
    pub fn carry_forward(&self, t1: f64, t2: f64) -> Result<f64, CurveError> {
        let mut carry = 0.0;
        for curve in [&self.dividend, &self.repo].into_iter().flatten() {
            let q1 = if t1 > 0.0 { curve.rate_at(t1)? } else { 0.0 };
            let q2 = curve.rate_at(t2)?;
            carry += (q2 * t2 - q1 * t1) / (t2 - t1);
        }
        Ok(carry)
    }
}

/// The resolved curves a single pricing run prices against: the
/// discount curve for the trade's settlement currency plus per-asset
/// carry curves, in the model's asset order.
///
/// Built by the orchestration layer from its market containers; the view
/// only holds `Arc`s, so constructing one never re-bootstraps anything.
#[derive(Clone, Debug)]
pub struct MarketView {
    as_of: Date,
    day_count: DayCountConvention,
    discount: Arc<PillarCurve<f64>>,
    asset_curves: Vec<AssetCurves>,
}

impl MarketView {
    /// Creates a view.
    ///
    /// `asset_curves` must be in the same order as the model's assets;
    /// the engine validates lengths against the model before simulating.
    pub fn new(
        as_of: Date,
        day_count: DayCountConvention,
        discount: Arc<PillarCurve<f64>>,
        asset_curves: Vec<AssetCurves>,
    ) -> Self {
        Self {
            as_of,
            day_count,
            discount,
            asset_curves,
        }
    }

    /// Returns the valuation date.
    pub fn as_of(&self) -> Date {
        self.as_of
    }

    /// Returns the day count used to turn dates into curve times.
    pub fn day_count(&self) -> DayCountConvention {
        self.day_count
    }

    /// Returns the discount curve.
    pub fn discount(&self) -> &Arc<PillarCurve<f64>> {
        &self.discount
    }

    /// Returns the per-asset carry curves.
    pub fn asset_curves(&self) -> &[AssetCurves] {
        &self.asset_curves
    }

    /// Risk-neutral drift of asset `i` over `[t1, t2]`: the discount
    /// forward rate minus dividend and repo carry.
    pub fn drift(&self, asset: usize, t1: f64, t2: f64) -> Result<f64, CurveError> {
        let funding = self.discount.forward_rate(t1, t2)?;
        let carry = self
            .asset_curves
            .get(asset)
            .map(|c| c.carry_forward(t1, t2))
            .transpose()?
            .unwrap_or(0.0);
        Ok(funding - carry)
    }
}
