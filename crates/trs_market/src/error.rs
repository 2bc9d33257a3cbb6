//! Market data error types.

use trs_core::curves::CurveError;
use trs_core::types::SolverError;

use crate::quotes::QuoteKind;
use thiserror::Error;

/// Quote and sheet construction errors.
///
/// Configuration-class failures: surfaced immediately, never retried.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum QuoteError {
    /// The same quote kind was added twice to one instrument.
    #[error("Duplicate quote kind {kind:?} on instrument {instrument:?}")]
    DuplicateQuoteKind {
        /// The repeated kind
        kind: QuoteKind,
        /// The instrument label
        instrument: String,
    },

    /// Sheets with different as-of dates cannot merge.
    #[error("As-of mismatch: {left} vs {right}")]
    AsOfMismatch {
        /// Receiving sheet's as-of date (ISO 8601)
        left: String,
        /// Incoming sheet's as-of date (ISO 8601)
        right: String,
    },

    /// An instrument with the same identity already exists and the merge
    /// policy rejects overlap.
    #[error("Duplicate instrument identity {instrument:?}")]
    DuplicateInstrument {
        /// The instrument label
        instrument: String,
    },
}

/// Curve calibration errors.
///
/// Surfaced with the offending pillar or instrument identity so the caller
/// can decide whether to skip the scenario or abort the run. Cloneable so
/// a failed bootstrap can be memoized alongside successful ones.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CalibrationError {
    /// The sheet carries no instruments for this curve family.
    #[error("No calibration instruments in sheet")]
    EmptySheet,

    /// An instrument lacks the requested quote kind.
    #[error("Missing {kind:?} quote on instrument {instrument:?}")]
    MissingQuote {
        /// The requested kind
        kind: QuoteKind,
        /// The instrument label
        instrument: String,
    },

    /// Sequential calibration failed at a specific pillar.
    ///
    /// Covers non-convergent root-finds and non-monotonic or non-positive
    /// discount factors.
    #[error("Bootstrap failed at pillar {pillar:?}: {reason}")]
    BootstrapFailure {
        /// Label and maturity of the offending pillar
        pillar: String,
        /// Failure description
        reason: String,
    },

    /// Wrapped solver error outside any single pillar's context.
    #[error("Solver error: {0}")]
    Solver(#[from] SolverError),

    /// Wrapped curve construction error.
    #[error("Curve error: {0}")]
    Curve(#[from] CurveError),
}

/// Market container errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MarketError {
    /// No sheet and bootstrapper registered for the key.
    #[error("Unknown market key {key}")]
    UnknownKey {
        /// Debug rendering of the key
        key: String,
    },

    /// Curve resolution failed during bootstrap.
    #[error("Calibration error: {0}")]
    Calibration(#[from] CalibrationError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_quote_kind_display() {
        let err = QuoteError::DuplicateQuoteKind {
            kind: QuoteKind::Mid,
            instrument: "USD.ZC.1Y".to_string(),
        };
        assert!(format!("{}", err).contains("USD.ZC.1Y"));
    }

    #[test]
    fn test_bootstrap_failure_names_pillar() {
        let err = CalibrationError::BootstrapFailure {
            pillar: "USD.SWAP.10Y @ 2030-06-15".to_string(),
            reason: "non-monotonic discount factor".to_string(),
        };
        let text = format!("{}", err);
        assert!(text.contains("USD.SWAP.10Y"));
        assert!(text.contains("non-monotonic"));
    }

    #[test]
    fn test_market_error_from_calibration() {
        let err: MarketError = CalibrationError::EmptySheet.into();
        assert!(matches!(err, MarketError::Calibration(_)));
    }
}
