//! Interpolation over sorted abscissae.

mod linear;

pub use linear::LinearInterpolator;

use crate::types::InterpolationError;
use num_traits::Float;

/// Common interface for 1-D interpolators.
///
/// Implementations own their (x, y) data and evaluate at arbitrary points
/// within the abscissa domain.
pub trait Interpolator<T: Float> {
    /// Evaluates the interpolant at `x`.
    ///
    /// # Errors
    ///
    /// Returns `InterpolationError::OutOfBounds` when `x` lies outside the
    /// abscissa domain.
    fn interpolate(&self, x: T) -> Result<T, InterpolationError>;

    /// Returns the abscissa domain as `(min, max)`.
    fn domain(&self) -> (T, T);
}
