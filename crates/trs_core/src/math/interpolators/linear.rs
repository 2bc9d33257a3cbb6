//! Piecewise linear interpolation.

use super::Interpolator;
use crate::types::InterpolationError;
use num_traits::Float;

/// Piecewise linear interpolator over strictly increasing abscissae.
///
/// Generic over `T: Float` like the rest of the numerics layer.
///
/// # Example
///
/// ```
/// use trs_core::math::interpolators::{Interpolator, LinearInterpolator};
///
/// let interp = LinearInterpolator::new(&[0.0, 1.0, 2.0], &[0.0, 2.0, 4.0]).unwrap();
/// assert_eq!(interp.domain(), (0.0, 2.0));
/// assert_eq!(interp.interpolate(0.5).unwrap(), 1.0);
/// ```
#[derive(Debug, Clone)]
pub struct LinearInterpolator<T: Float> {
    xs: Vec<T>,
    ys: Vec<T>,
}

impl<T: Float> LinearInterpolator<T> {
    /// Constructs an interpolator from x and y data points.
    ///
    /// # Errors
    ///
    /// - `InterpolationError::InvalidInput`: mismatched lengths or
    ///   non-increasing abscissae
    /// - `InterpolationError::InsufficientData`: fewer than 2 points
    pub fn new(xs: &[T], ys: &[T]) -> Result<Self, InterpolationError> {
        if xs.len() != ys.len() {
            return Err(InterpolationError::InvalidInput(format!(
                "xs and ys must have same length: got {} and {}",
                xs.len(),
                ys.len()
            )));
        }
        if xs.len() < 2 {
            return Err(InterpolationError::InsufficientData {
                got: xs.len(),
                need: 2,
            });
        }
        for i in 1..xs.len() {
            if xs[i] <= xs[i - 1] {
                return Err(InterpolationError::InvalidInput(
                    "abscissae must be strictly increasing".to_string(),
                ));
            }
        }
        Ok(Self {
            xs: xs.to_vec(),
            ys: ys.to_vec(),
        })
    }

    /// Returns the abscissae.
    #[inline]
    pub fn xs(&self) -> &[T] {
        &self.xs
    }

    /// Returns the ordinates.
    #[inline]
    pub fn ys(&self) -> &[T] {
        &self.ys
    }
}

impl<T: Float> Interpolator<T> for LinearInterpolator<T> {
    fn interpolate(&self, x: T) -> Result<T, InterpolationError> {
        let (min, max) = self.domain();
        if x < min || x > max {
            return Err(InterpolationError::OutOfBounds {
                x: x.to_f64().unwrap_or(f64::NAN),
                min: min.to_f64().unwrap_or(f64::NAN),
                max: max.to_f64().unwrap_or(f64::NAN),
            });
        }

        // Find the bracketing segment; xs is strictly increasing.
        let idx = match self
            .xs
            .iter()
            .position(|&xi| xi >= x)
        {
            Some(0) => return Ok(self.ys[0]),
            Some(i) => i,
            None => return Ok(self.ys[self.ys.len() - 1]),
        };

        let (x0, x1) = (self.xs[idx - 1], self.xs[idx]);
        let (y0, y1) = (self.ys[idx - 1], self.ys[idx]);
        let w = (x - x0) / (x1 - x0);
        Ok(y0 + w * (y1 - y0))
    }

    fn domain(&self) -> (T, T) {
        (self.xs[0], self.xs[self.xs.len() - 1])
    }
}
