//! Orchestration error types.

use thiserror::Error;

use trs_market::error::MarketError;
use trs_pricing::error::SimulationError;

/// Run-level orchestration failures.
///
/// These are configuration-class errors: surfaced before any cell is
/// priced, so a failed run emits no partial results. Cell-level failures
/// (calibration, simulation) are isolated into the result table instead.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum OrchestrationError {
    /// Parallel flag/label arrays disagree in length.
    #[error("Arity mismatch: {array} has {got} entries, expected {expected}")]
    ArityMismatch {
        /// The offending array
        array: String,
        /// Its length
        got: usize,
        /// The length of the reference array
        expected: usize,
    },

    /// A scenario referenced a label with no registered entry.
    #[error("Unknown {kind} label {label:?}")]
    UnknownLabel {
        /// Which set was missing the label (context, model, setting)
        kind: String,
        /// The unresolved label
        label: String,
    },

    /// A selected instrument id is not in the book.
    #[error("Unknown instrument {id:?}")]
    UnknownInstrument {
        /// The unresolved trade id
        id: String,
    },

    /// The book must be frozen before pricing.
    #[error("Book {name:?} is not frozen")]
    UnfrozenBook {
        /// The book's name
        name: String,
    },

    /// No pricer bound for a product type.
    #[error("Unsupported product {product:?}")]
    UnsupportedProduct {
        /// The unbound product type
        product: String,
    },

    /// Wrapped market resolution failure.
    #[error("Market error: {0}")]
    Market(#[from] MarketError),

    /// Wrapped pricing failure.
    #[error("Simulation error: {0}")]
    Simulation(#[from] SimulationError),
}
