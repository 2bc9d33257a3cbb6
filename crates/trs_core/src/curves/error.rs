//! Curve error types.

use crate::types::InterpolationError;
use thiserror::Error;

/// Curve construction and query errors.
///
/// Domain violations surface as typed failures and are never silently
/// clamped.
///
/// # Examples
///
/// ```
/// use trs_core::curves::CurveError;
///
/// let err = CurveError::OutOfDomain { t: -0.5 };
/// assert!(format!("{}", err).contains("-0.5"));
/// ```
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CurveError {
    /// Query before the curve's as-of origin (t < 0).
    #[error("Out of domain: t = {t} precedes the curve origin")]
    OutOfDomain {
        /// The offending query time
        t: f64,
    },

    /// Not enough pillars for construction.
    #[error("Insufficient pillars: got {got}, need {need}")]
    InsufficientPillars {
        /// Number of pillars provided
        got: usize,
        /// Minimum number required
        need: usize,
    },

    /// A pillar time is non-positive or unordered.
    #[error("Invalid pillar at t = {t}")]
    InvalidPillar {
        /// The offending pillar time
        t: f64,
    },

    /// Wrapped interpolation error.
    #[error("Interpolation error: {0}")]
    Interpolation(#[from] InterpolationError),
}
