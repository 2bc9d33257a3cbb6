//! Model and instrument error types.

use thiserror::Error;

/// Stochastic model errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ModelError {
    /// Correlation/covariance matrix is not positive definite, so the
    /// Cholesky factorization failed.
    #[error("Matrix is not positive definite (pivot {pivot})")]
    NotPositiveDefinite {
        /// Index of the failing pivot
        pivot: usize,
    },

    /// Matrix has the wrong number of elements for its dimension.
    #[error("Invalid matrix dimensions: expected {expected} elements, got {got}")]
    InvalidDimensions {
        /// Expected element count (dim * dim)
        expected: usize,
        /// Actual element count
        got: usize,
    },

    /// A diagonal element of a correlation matrix is not 1.
    #[error("Diagonal element {index} is {value}, expected 1.0")]
    InvalidDiagonal {
        /// Row/column index
        index: usize,
        /// Actual value
        value: f64,
    },

    /// Matrix is not symmetric.
    #[error("Matrix is not symmetric at ({i}, {j})")]
    NotSymmetric {
        /// Row index
        i: usize,
        /// Column index
        j: usize,
    },

    /// Correlation outside [-1, 1].
    #[error("Correlation at ({i}, {j}) is {value}, must be in [-1, 1]")]
    OutOfRange {
        /// Row index
        i: usize,
        /// Column index
        j: usize,
        /// Actual value
        value: f64,
    },

    /// Model asset list does not match the basket it should drive.
    #[error("Model/basket mismatch: {reason}")]
    BasketMismatch {
        /// Description of the mismatch
        reason: String,
    },

    /// A model parameter is out of its valid range.
    #[error("Invalid model parameter: {reason}")]
    InvalidParameter {
        /// Description of the violation
        reason: String,
    },
}

/// Instrument construction errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InstrumentError {
    /// A basket listed the same ticker twice.
    #[error("Duplicate ticker {ticker:?} in basket")]
    DuplicateTicker {
        /// The repeated ticker symbol
        ticker: String,
    },

    /// A basket has no components.
    #[error("Basket has no components")]
    EmptyBasket,

    /// Reset threshold must be positive.
    #[error("Invalid reset threshold {threshold}")]
    InvalidThreshold {
        /// The offending threshold
        threshold: f64,
    },

    /// A trade field is out of its valid range.
    #[error("Invalid trade parameter: {reason}")]
    InvalidTrade {
        /// Description of the violation
        reason: String,
    },

    /// The book is frozen; no further trades can be appended.
    #[error("Book {name:?} is frozen")]
    BookFrozen {
        /// The book's name
        name: String,
    },
}

/// Schedule generation errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ScheduleError {
    /// End date does not follow the start date.
    #[error("Invalid schedule range: {start} .. {end}")]
    InvalidRange {
        /// Schedule start (ISO 8601)
        start: String,
        /// Schedule end (ISO 8601)
        end: String,
    },

    /// Date arithmetic failed while rolling periods.
    #[error("Date arithmetic failed: {0}")]
    DateArithmetic(String),
}
