//! FX forward curve built from covered interest parity.

use super::error::CurveError;
use super::pillar::PillarCurve;
use super::traits::YieldCurve;
use num_traits::Float;

/// An fx forward curve: spot plus domestic and foreign discount curves.
///
/// The forward at time `t` follows covered interest parity:
///
/// ```text
/// fx(t) = spot * Df_foreign(t) / Df_domestic(t)
/// ```
///
/// where `spot` is quoted BASE/QUOTE, the foreign curve discounts the base
/// currency and the domestic curve discounts the quote currency. The curve
/// owns both leg curves; it is rebuilt wholesale when either dependency
/// changes.
///
/// # Example
///
/// ```
/// use trs_core::curves::{FxForwardCurve, Interpolation, PillarCurve};
///
/// let domestic = PillarCurve::new(vec![1.0, 2.0], vec![0.05, 0.05],
///     Interpolation::LogLinearDiscount).unwrap();
/// let foreign = PillarCurve::new(vec![1.0, 2.0], vec![0.01, 0.01],
///     Interpolation::LogLinearDiscount).unwrap();
/// let curve = FxForwardCurve::new(1.10, domestic, foreign);
///
/// // Higher domestic rates pull the forward above spot.
/// assert!(curve.fx_rate(1.0).unwrap() > 1.10);
/// ```
#[derive(Debug, Clone)]
pub struct FxForwardCurve<T: Float> {
    spot: T,
    domestic: PillarCurve<T>,
    foreign: PillarCurve<T>,
}

impl<T: Float> FxForwardCurve<T> {
    /// Creates an fx forward curve from spot and the two discount legs.
    pub fn new(spot: T, domestic: PillarCurve<T>, foreign: PillarCurve<T>) -> Self {
        Self {
            spot,
            domestic,
            foreign,
        }
    }

    /// Returns the spot rate.
    #[inline]
    pub fn spot(&self) -> T {
        self.spot
    }

    /// Returns the domestic (quote currency) discount curve.
    #[inline]
    pub fn domestic(&self) -> &PillarCurve<T> {
        &self.domestic
    }

    /// Returns the foreign (base currency) discount curve.
    #[inline]
    pub fn foreign(&self) -> &PillarCurve<T> {
        &self.foreign
    }

    /// Returns the fx forward at time `t`.
    ///
    /// # Errors
    ///
    /// `CurveError::OutOfDomain` if `t < 0`.
    pub fn fx_rate(&self, t: T) -> Result<T, CurveError> {
        let df_d = self.domestic.discount_factor(t)?;
        let df_f = self.foreign.discount_factor(t)?;
        Ok(self.spot * df_f / df_d)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curves::Interpolation;
    use approx::assert_relative_eq;

    fn flat_pillar(rate: f64) -> PillarCurve<f64> {
        PillarCurve::new(
            vec![1.0, 5.0],
            vec![rate, rate],
            Interpolation::LogLinearDiscount,
        )
        .unwrap()
    }

    #[test]
    fn test_spot_at_origin() {
        let curve = FxForwardCurve::new(1.25, flat_pillar(0.03), flat_pillar(0.01));
        assert_relative_eq!(curve.fx_rate(0.0).unwrap(), 1.25);
    }

    #[test]
    fn test_covered_interest_parity() {
        let curve = FxForwardCurve::new(1.10, flat_pillar(0.05), flat_pillar(0.01));
        // fx(t) = spot * exp((r_d - r_f) * t)
        let expected = 1.10 * (0.04_f64 * 2.0).exp();
        assert_relative_eq!(curve.fx_rate(2.0).unwrap(), expected, epsilon = 1e-12);
    }

    #[test]
    fn test_equal_rates_hold_forward_at_spot() {
        let curve = FxForwardCurve::new(0.95, flat_pillar(0.02), flat_pillar(0.02));
        assert_relative_eq!(curve.fx_rate(3.0).unwrap(), 0.95, epsilon = 1e-12);
    }

    #[test]
    fn test_negative_time_rejected() {
        let curve = FxForwardCurve::new(1.0, flat_pillar(0.02), flat_pillar(0.02));
        assert!(curve.fx_rate(-0.5).is_err());
    }
}
