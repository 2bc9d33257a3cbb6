//! Solver configuration types.

use num_traits::Float;

/// Configuration for root-finding algorithms.
///
/// Shared across all solver implementations: convergence tolerance and the
/// iteration cap that turns a non-convergent search into a typed failure.
///
/// # Example
///
/// ```
/// use trs_core::math::solvers::SolverConfig;
///
/// let config: SolverConfig<f64> = SolverConfig::default();
/// assert!(config.tolerance < 1e-8);
/// assert!(config.max_iterations >= 50);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolverConfig<T: Float> {
    /// Convergence tolerance; the solver stops when `|f(x)| < tolerance`.
    pub tolerance: T,

    /// Iteration cap; exceeding it yields `SolverError::MaxIterationsExceeded`.
    pub max_iterations: usize,
}

impl<T: Float> Default for SolverConfig<T> {
    /// Defaults: `tolerance = 1e-12`, `max_iterations = 100`.
    fn default() -> Self {
        Self {
            tolerance: T::from(1e-12).unwrap(),
            max_iterations: 100,
        }
    }
}

impl<T: Float> SolverConfig<T> {
    /// Creates a configuration with explicit values.
    ///
    /// # Panics
    ///
    /// Panics if `tolerance <= 0` or `max_iterations == 0`.
    pub fn new(tolerance: T, max_iterations: usize) -> Self {
        assert!(tolerance > T::zero(), "tolerance must be positive");
        assert!(max_iterations > 0, "max_iterations must be > 0");
        Self {
            tolerance,
            max_iterations,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default() {
        let config: SolverConfig<f64> = SolverConfig::default();
        assert_eq!(config.max_iterations, 100);
        assert!(config.tolerance > 0.0);
    }

    #[test]
    #[should_panic(expected = "tolerance must be positive")]
    fn test_new_rejects_zero_tolerance() {
        let _ = SolverConfig::new(0.0_f64, 100);
    }
}
