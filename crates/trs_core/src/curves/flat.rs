//! Flat (constant rate) curve.

use super::error::CurveError;
use super::traits::YieldCurve;
use num_traits::Float;

/// A curve with a single constant continuously compounded rate.
///
/// Useful for test fixtures and for contexts quoted as one flat level
/// (e.g. a flat repo assumption).
///
/// # Example
///
/// ```
/// use trs_core::curves::{FlatCurve, YieldCurve};
///
/// let curve = FlatCurve::new(0.005_f64);
/// assert!((curve.zero_rate(3.0).unwrap() - 0.005).abs() < 1e-15);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlatCurve<T: Float> {
    rate: T,
}

impl<T: Float> FlatCurve<T> {
    /// Creates a flat curve at the given rate.
    pub fn new(rate: T) -> Self {
        Self { rate }
    }

    /// Returns the constant rate.
    #[inline]
    pub fn rate(&self) -> T {
        self.rate
    }
}

impl<T: Float> YieldCurve<T> for FlatCurve<T> {
    fn discount_factor(&self, t: T) -> Result<T, CurveError> {
        if t < T::zero() {
            return Err(CurveError::OutOfDomain {
                t: t.to_f64().unwrap_or(f64::NAN),
            });
        }
        Ok((-self.rate * t).exp())
    }
}
