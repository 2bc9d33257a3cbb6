//! Yield curve trait definition.

use super::error::CurveError;
use num_traits::Float;

/// Generic yield curve trait for discount factor and rate calculations.
///
/// Implementations are generic over `T: Float` so the same code serves
/// `f64` and `f32`.
///
/// # Contract
///
/// - `discount_factor(t)` returns the discount factor D(t) for maturity t
/// - `zero_rate(t)` returns the continuously compounded zero rate r(t)
/// - `forward_rate(t1, t2)` returns the forward rate between t1 and t2
///
/// # Invariants
///
/// - D(0) = 1
/// - D(t) > 0 for all t >= 0
/// - D(t1) >= D(t2) for t1 <= t2 (no-arbitrage)
///
/// # Example
///
/// ```
/// use trs_core::curves::{FlatCurve, YieldCurve};
///
/// let curve = FlatCurve::new(0.05_f64);
/// let df = curve.discount_factor(1.0).unwrap();
/// assert!((df - 0.951229).abs() < 1e-5);
///
/// let fwd = curve.forward_rate(1.0, 2.0).unwrap();
/// assert!((fwd - 0.05).abs() < 1e-10);
/// ```
pub trait YieldCurve<T: Float> {
    /// Returns the discount factor for maturity `t`.
    ///
    /// # Errors
    ///
    /// `CurveError::OutOfDomain` if `t < 0`.
    fn discount_factor(&self, t: T) -> Result<T, CurveError>;

    /// Returns the continuously compounded zero rate for maturity `t`.
    ///
    /// Default implementation: `r(t) = -ln(D(t)) / t`.
    ///
    /// # Errors
    ///
    /// `CurveError::OutOfDomain` if `t <= 0`.
    fn zero_rate(&self, t: T) -> Result<T, CurveError> {
        if t <= T::zero() {
            return Err(CurveError::OutOfDomain {
                t: t.to_f64().unwrap_or(0.0),
            });
        }
        let df = self.discount_factor(t)?;
        Ok(-df.ln() / t)
    }

    /// Returns the forward rate between `t1` and `t2`.
    ///
    /// Default implementation: `f(t1, t2) = -ln(D(t2) / D(t1)) / (t2 - t1)`.
    ///
    /// # Errors
    ///
    /// `CurveError::OutOfDomain` if `t2 <= t1` or either time is negative.
    fn forward_rate(&self, t1: T, t2: T) -> Result<T, CurveError> {
        let dt = t2 - t1;
        if dt <= T::zero() {
            return Err(CurveError::OutOfDomain {
                t: dt.to_f64().unwrap_or(0.0),
            });
        }
        let df1 = self.discount_factor(t1)?;
        let df2 = self.discount_factor(t2)?;
        Ok(-(df2 / df1).ln() / dt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct MockCurve {
        rate: f64,
    }

    impl YieldCurve<f64> for MockCurve {
        fn discount_factor(&self, t: f64) -> Result<f64, CurveError> {
            if t < 0.0 {
                return Err(CurveError::OutOfDomain { t });
            }
            Ok((-self.rate * t).exp())
        }
    }

    #[test]
    fn test_default_zero_rate() {
        let curve = MockCurve { rate: 0.05 };
        assert!((curve.zero_rate(1.0).unwrap() - 0.05).abs() < 1e-10);
    }

    #[test]
    fn test_default_zero_rate_rejects_origin() {
        let curve = MockCurve { rate: 0.05 };
        assert!(matches!(
            curve.zero_rate(0.0),
            Err(CurveError::OutOfDomain { .. })
        ));
    }

    #[test]
    fn test_default_forward_rate() {
        let curve = MockCurve { rate: 0.05 };
        assert!((curve.forward_rate(1.0, 2.0).unwrap() - 0.05).abs() < 1e-10);
    }

    #[test]
    fn test_default_forward_rate_reversed_interval() {
        let curve = MockCurve { rate: 0.05 };
        assert!(curve.forward_rate(2.0, 1.0).is_err());
    }
}
