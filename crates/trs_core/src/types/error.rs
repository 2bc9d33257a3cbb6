//! Error types for the foundation layer.
//!
//! This module provides:
//! - `DateError`: errors from date construction and parsing
//! - `TenorError`: errors from tenor parsing
//! - `CurrencyError`: errors from currency parsing and pairing
//! - `InterpolationError`: errors from interpolation operations
//! - `SolverError`: errors from root-finding solvers

use thiserror::Error;

/// Date construction and parsing errors.
///
/// # Examples
///
/// ```
/// use trs_core::types::DateError;
///
/// let err = DateError::InvalidDate { year: 2024, month: 2, day: 30 };
/// assert_eq!(format!("{}", err), "Invalid date: 2024-2-30");
/// ```
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DateError {
    /// Invalid date components (e.g. February 30th).
    #[error("Invalid date: {year}-{month}-{day}")]
    InvalidDate {
        /// Year component
        year: i32,
        /// Month component (1-12)
        month: u32,
        /// Day component (1-31)
        day: u32,
    },

    /// Failed to parse a date string.
    #[error("Date parse error: {0}")]
    ParseError(String),

    /// Date arithmetic overflowed the representable range.
    #[error("Date arithmetic out of range")]
    OutOfRange,
}

/// Tenor parsing errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TenorError {
    /// The string is not of the form `<count><unit>` (e.g. "3M", "10Y").
    #[error("Tenor parse error: {0:?}")]
    ParseError(String),

    /// The unit suffix is not one of D, W, M, Y.
    #[error("Unknown tenor unit: {0:?}")]
    UnknownUnit(char),
}

/// Currency parsing and pairing errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CurrencyError {
    /// Unknown ISO 4217 code.
    #[error("Unknown currency code: {0:?}")]
    UnknownCurrency(String),

    /// Base and quote currencies of a pair are identical.
    #[error("Base and quote currency are both {0}")]
    SameCurrency(String),
}

/// Interpolation errors.
///
/// # Examples
///
/// ```
/// use trs_core::types::InterpolationError;
///
/// let err = InterpolationError::InsufficientData { got: 1, need: 2 };
/// assert_eq!(format!("{}", err), "Insufficient data: got 1, need 2");
/// ```
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InterpolationError {
    /// Query point outside the abscissa domain.
    #[error("Out of bounds: {x} not in [{min}, {max}]")]
    OutOfBounds {
        /// The query point
        x: f64,
        /// Minimum valid value
        min: f64,
        /// Maximum valid value
        max: f64,
    },

    /// Not enough data points for construction.
    #[error("Insufficient data: got {got}, need {need}")]
    InsufficientData {
        /// Number of points provided
        got: usize,
        /// Minimum number required
        need: usize,
    },

    /// Invalid input data (mismatched lengths, unordered abscissae).
    #[error("Invalid interpolation input: {0}")]
    InvalidInput(String),
}

/// Root-finding solver errors.
///
/// Solvers enforce an iteration cap and surface non-convergence as a typed
/// failure rather than looping indefinitely.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SolverError {
    /// `f(a)` and `f(b)` have the same sign, so no root is bracketed.
    #[error("No root bracketed in [{a}, {b}]")]
    NoBracket {
        /// Left bracket endpoint
        a: f64,
        /// Right bracket endpoint
        b: f64,
    },

    /// The iteration cap was reached before convergence.
    #[error("Solver failed to converge within {max_iterations} iterations (residual {residual})")]
    MaxIterationsExceeded {
        /// The configured iteration cap
        max_iterations: usize,
        /// Residual |f(x)| at the last iterate
        residual: f64,
    },

    /// The derivative vanished during a Newton step.
    #[error("Derivative vanished at x = {x}")]
    ZeroDerivative {
        /// The iterate at which the derivative vanished
        x: f64,
    },
}
