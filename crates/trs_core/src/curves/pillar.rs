//! Pillar-based curve with injected interpolation.

use super::error::CurveError;
use super::traits::YieldCurve;
use crate::math::interpolators::{Interpolator, LinearInterpolator};
use num_traits::Float;

/// Interpolation rule for pillar curves.
///
/// Injected at construction so the interpolation policy can change without
/// touching any bootstrapper.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Interpolation {
    /// Linear interpolation on continuously compounded zero rates.
    LinearZero,

    /// Linear interpolation on log discount factors; equivalent to a
    /// constant forward rate between pillars.
    #[default]
    LogLinearDiscount,
}

/// A curve calibrated on pillar points.
///
/// Stores (time, zero rate) pillars measured in year fractions from the
/// curve's as-of origin. Interpolates between pillars according to the
/// injected [`Interpolation`] rule; extrapolates flat beyond the last
/// pillar and before the first. Queries at negative times fail with
/// [`CurveError::OutOfDomain`] and are never clamped.
///
/// The same type carries the repo and dividend curve families, queried as
/// rates via [`PillarCurve::rate_at`].
///
/// # Example
///
/// ```
/// use trs_core::curves::{Interpolation, PillarCurve, YieldCurve};
///
/// let curve: PillarCurve<f64> = PillarCurve::new(
///     vec![0.25, 0.5, 1.0, 2.0, 5.0],
///     vec![0.02, 0.025, 0.03, 0.035, 0.04],
///     Interpolation::LinearZero,
/// ).unwrap();
///
/// let df = curve.discount_factor(0.75).unwrap();
/// assert!(df > 0.0 && df < 1.0);
///
/// // Flat extrapolation beyond the last pillar
/// assert!((curve.zero_rate(10.0).unwrap() - 0.04).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct PillarCurve<T: Float> {
    times: Vec<T>,
    values: Vec<T>,
    interpolation: Interpolation,
}

impl<T: Float> PillarCurve<T> {
    /// Constructs a pillar curve.
    ///
    /// # Errors
    ///
    /// - `CurveError::InsufficientPillars`: fewer than one pillar, or
    ///   mismatched lengths
    /// - `CurveError::InvalidPillar`: non-positive or non-increasing times
    pub fn new(
        times: Vec<T>,
        values: Vec<T>,
        interpolation: Interpolation,
    ) -> Result<Self, CurveError> {
        if times.is_empty() || times.len() != values.len() {
            return Err(CurveError::InsufficientPillars {
                got: times.len().min(values.len()),
                need: 1,
            });
        }
        for i in 0..times.len() {
            if times[i] <= T::zero() || (i > 0 && times[i] <= times[i - 1]) {
                return Err(CurveError::InvalidPillar {
                    t: times[i].to_f64().unwrap_or(f64::NAN),
                });
            }
        }
        Ok(Self {
            times,
            values,
            interpolation,
        })
    }

    /// Returns the pillar times.
    #[inline]
    pub fn times(&self) -> &[T] {
        &self.times
    }

    /// Returns the pillar values (continuously compounded rates).
    #[inline]
    pub fn values(&self) -> &[T] {
        &self.values
    }

    /// Returns the interpolation rule.
    #[inline]
    pub fn interpolation(&self) -> Interpolation {
        self.interpolation
    }

    /// Returns the pillar time domain as `(first, last)`.
    #[inline]
    pub fn domain(&self) -> (T, T) {
        (self.times[0], self.times[self.times.len() - 1])
    }

    /// Returns the interpolated pillar value at `t` (flat outside the
    /// pillar span).
    ///
    /// This is the native query for rate-valued curve families (repo,
    /// dividend): the value IS the curve level, with no discounting
    /// transform applied.
    ///
    /// # Errors
    ///
    /// `CurveError::OutOfDomain` if `t < 0`.
    pub fn rate_at(&self, t: T) -> Result<T, CurveError> {
        if t < T::zero() {
            return Err(CurveError::OutOfDomain {
                t: t.to_f64().unwrap_or(f64::NAN),
            });
        }
        let (t_min, t_max) = self.domain();
        if t <= t_min {
            return Ok(self.values[0]);
        }
        if t >= t_max {
            return Ok(self.values[self.values.len() - 1]);
        }
        if self.times.len() == 1 {
            return Ok(self.values[0]);
        }
        let interp = LinearInterpolator::new(&self.times, &self.values)?;
        Ok(interp.interpolate(t)?)
    }

    /// Interpolated log discount factor for the LogLinearDiscount rule.
    fn log_df_at(&self, t: T) -> Result<T, CurveError> {
        let (t_min, t_max) = self.domain();
        if t <= t_min {
            return Ok(-self.values[0] * t);
        }
        if t >= t_max {
            // Flat forward beyond the last pillar at the terminal zero rate.
            let last = self.values[self.values.len() - 1];
            return Ok(-last * t);
        }
        let log_dfs: Vec<T> = self
            .times
            .iter()
            .zip(self.values.iter())
            .map(|(&time, &rate)| -rate * time)
            .collect();
        let interp = LinearInterpolator::new(&self.times, &log_dfs)?;
        Ok(interp.interpolate(t)?)
    }
}

impl<T: Float> YieldCurve<T> for PillarCurve<T> {
    fn discount_factor(&self, t: T) -> Result<T, CurveError> {
        if t < T::zero() {
            return Err(CurveError::OutOfDomain {
                t: t.to_f64().unwrap_or(f64::NAN),
            });
        }
        if t == T::zero() {
            return Ok(T::one());
        }
        match self.interpolation {
            Interpolation::LinearZero => {
                let rate = self.rate_at(t)?;
                Ok((-rate * t).exp())
            }
            Interpolation::LogLinearDiscount => Ok(self.log_df_at(t)?.exp()),
        }
    }

    fn zero_rate(&self, t: T) -> Result<T, CurveError> {
        if t <= T::zero() {
            return Err(CurveError::OutOfDomain {
                t: t.to_f64().unwrap_or(f64::NAN),
            });
        }
        match self.interpolation {
            Interpolation::LinearZero => self.rate_at(t),
            Interpolation::LogLinearDiscount => Ok(-self.log_df_at(t)? / t),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    fn sample_curve(interpolation: Interpolation) -> PillarCurve<f64> {
        PillarCurve::new(
            vec![0.5, 1.0, 2.0],
            vec![0.02, 0.03, 0.04],
            interpolation,
        )
        .unwrap()
    }

    // ========================================
    // Construction
    // ========================================

    #[test]
    fn test_new_rejects_empty() {
        let result = PillarCurve::<f64>::new(vec![], vec![], Interpolation::LinearZero);
        assert!(matches!(
            result,
            Err(CurveError::InsufficientPillars { .. })
        ));
    }

    #[test]
    fn test_new_rejects_unsorted() {
        let result =
            PillarCurve::new(vec![1.0, 0.5], vec![0.02, 0.03], Interpolation::LinearZero);
        assert!(matches!(result, Err(CurveError::InvalidPillar { .. })));
    }

    #[test]
    fn test_new_rejects_negative_time() {
        let result =
            PillarCurve::new(vec![-0.5, 1.0], vec![0.02, 0.03], Interpolation::LinearZero);
        assert!(matches!(result, Err(CurveError::InvalidPillar { .. })));
    }

    #[test]
    fn test_single_pillar_is_flat() {
        let curve =
            PillarCurve::new(vec![1.0], vec![0.03], Interpolation::LogLinearDiscount).unwrap();
        assert_relative_eq!(curve.rate_at(0.1).unwrap(), 0.03);
        assert_relative_eq!(curve.rate_at(5.0).unwrap(), 0.03);
    }

    // ========================================
    // Interpolation
    // ========================================

    #[test]
    fn test_linear_zero_at_pillars() {
        let curve = sample_curve(Interpolation::LinearZero);
        assert_relative_eq!(curve.zero_rate(0.5).unwrap(), 0.02);
        assert_relative_eq!(curve.zero_rate(1.0).unwrap(), 0.03);
        assert_relative_eq!(curve.zero_rate(2.0).unwrap(), 0.04);
    }

    #[test]
    fn test_linear_zero_midpoint() {
        let curve = sample_curve(Interpolation::LinearZero);
        assert_relative_eq!(curve.zero_rate(0.75).unwrap(), 0.025, epsilon = 1e-12);
    }

    #[test]
    fn test_log_linear_matches_pillar_dfs() {
        let curve = sample_curve(Interpolation::LogLinearDiscount);
        for (&t, &r) in curve.times().iter().zip(curve.values().iter()) {
            let df = curve.discount_factor(t).unwrap();
            assert_relative_eq!(df, (-r * t).exp(), epsilon = 1e-12);
        }
    }

    #[test]
    fn test_log_linear_constant_forward_between_pillars() {
        let curve = PillarCurve::new(
            vec![1.0, 2.0],
            vec![0.03, 0.04],
            Interpolation::LogLinearDiscount,
        )
        .unwrap();
        let fwd_a = curve.forward_rate(1.0, 1.5).unwrap();
        let fwd_b = curve.forward_rate(1.5, 2.0).unwrap();
        assert_relative_eq!(fwd_a, fwd_b, epsilon = 1e-10);
    }

    #[test]
    fn test_swapping_interpolation_changes_only_queries() {
        // Same pillars, both rules agree at the pillar points.
        let linear = sample_curve(Interpolation::LinearZero);
        let loglin = sample_curve(Interpolation::LogLinearDiscount);
        for &t in &[0.5, 1.0, 2.0] {
            assert_relative_eq!(
                linear.discount_factor(t).unwrap(),
                loglin.discount_factor(t).unwrap(),
                epsilon = 1e-12
            );
        }
    }

    // ========================================
    // Extrapolation and domain
    // ========================================

    #[test]
    fn test_flat_extrapolation_beyond_last_pillar() {
        let curve = sample_curve(Interpolation::LinearZero);
        assert_relative_eq!(curve.zero_rate(10.0).unwrap(), 0.04);
    }

    #[test]
    fn test_flat_extrapolation_before_first_pillar() {
        let curve = sample_curve(Interpolation::LinearZero);
        assert_relative_eq!(curve.zero_rate(0.1).unwrap(), 0.02);
    }

    #[test]
    fn test_negative_time_fails_not_clamps() {
        let curve = sample_curve(Interpolation::LogLinearDiscount);
        assert!(matches!(
            curve.discount_factor(-0.1),
            Err(CurveError::OutOfDomain { .. })
        ));
        assert!(matches!(
            curve.rate_at(-0.1),
            Err(CurveError::OutOfDomain { .. })
        ));
    }

    #[test]
    fn test_discount_factor_at_origin_is_one() {
        let curve = sample_curve(Interpolation::LogLinearDiscount);
        assert_relative_eq!(curve.discount_factor(0.0).unwrap(), 1.0);
    }

    proptest! {
        // Discount factors stay positive and below one for positive rates.
        #[test]
        fn prop_df_in_unit_interval(t in 0.01_f64..30.0) {
            let curve = sample_curve(Interpolation::LogLinearDiscount);
            let df = curve.discount_factor(t).unwrap();
            prop_assert!(df > 0.0 && df < 1.0);
        }
    }
}
