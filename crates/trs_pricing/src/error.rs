//! Pricing engine error types.

use thiserror::Error;

use trs_core::curves::CurveError;
use trs_models::error::{ModelError, ScheduleError};

/// Simulation and pricing errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SimulationError {
    /// Invalid engine configuration.
    #[error("Invalid simulation config: {reason}")]
    InvalidConfig {
        /// Description of the violation
        reason: String,
    },

    /// Model-level failure: basket mismatch, non-positive-definite
    /// covariance, bad parameters.
    #[error("Model error: {0}")]
    Model(#[from] ModelError),

    /// Curve query failed during discounting or drift construction.
    #[error("Curve error: {0}")]
    Curve(#[from] CurveError),

    /// Schedule generation failed for the instrument.
    #[error("Schedule error: {0}")]
    Schedule(#[from] ScheduleError),

    /// The run was cancelled between path batches; partial results are
    /// discarded.
    #[error("Simulation cancelled")]
    Cancelled,
}

/// Non-fatal diagnostics attached to a result rather than raised.
#[derive(Debug, Clone, PartialEq)]
pub enum NumericalWarning {
    /// The Monte Carlo standard error is large relative to the price.
    HighStandardError {
        /// Standard error of the estimate
        std_error: f64,
        /// The point estimate it accompanies
        price: f64,
    },
    /// The fair-spread annuity was too small to divide by.
    DegenerateAnnuity {
        /// The annuity magnitude observed
        annuity: f64,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_error_wraps() {
        let err: SimulationError = ModelError::NotPositiveDefinite { pivot: 1 }.into();
        assert!(matches!(err, SimulationError::Model(_)));
    }

    #[test]
    fn test_cancelled_display() {
        assert_eq!(format!("{}", SimulationError::Cancelled), "Simulation cancelled");
    }
}
