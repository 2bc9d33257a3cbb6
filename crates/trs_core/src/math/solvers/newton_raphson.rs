//! Newton-Raphson root-finding solver.

use super::SolverConfig;
use crate::types::SolverError;
use num_traits::Float;

/// Newton-Raphson root finder with a user-supplied derivative.
///
/// Quadratic convergence near the root; prefer [`super::BrentSolver`] when
/// no derivative is available or the initial guess is poor.
///
/// # Example
///
/// ```
/// use trs_core::math::solvers::{NewtonRaphsonSolver, SolverConfig};
///
/// let solver = NewtonRaphsonSolver::new(SolverConfig::default());
/// let root = solver
///     .find_root(|x: f64| x * x - 2.0, |x| 2.0 * x, 1.0)
///     .unwrap();
/// assert!((root - std::f64::consts::SQRT_2).abs() < 1e-10);
/// ```
#[derive(Debug, Clone)]
pub struct NewtonRaphsonSolver<T: Float> {
    config: SolverConfig<T>,
}

impl<T: Float> NewtonRaphsonSolver<T> {
    /// Creates a new solver with the given configuration.
    pub fn new(config: SolverConfig<T>) -> Self {
        Self { config }
    }

    /// Finds a root of `f` starting from `x0`, using derivative `df`.
    ///
    /// # Errors
    ///
    /// - `SolverError::ZeroDerivative`: `df` vanished at an iterate
    /// - `SolverError::MaxIterationsExceeded`: iteration cap reached
    pub fn find_root<F, D>(&self, f: F, df: D, x0: T) -> Result<T, SolverError>
    where
        F: Fn(T) -> T,
        D: Fn(T) -> T,
    {
        let mut x = x0;
        for _ in 0..self.config.max_iterations {
            let fx = f(x);
            if fx.abs() < self.config.tolerance {
                return Ok(x);
            }
            let dfx = df(x);
            if dfx == T::zero() {
                return Err(SolverError::ZeroDerivative {
                    x: x.to_f64().unwrap_or(f64::NAN),
                });
            }
            x = x - fx / dfx;
        }
        Err(SolverError::MaxIterationsExceeded {
            max_iterations: self.config.max_iterations,
            residual: f(x).abs().to_f64().unwrap_or(f64::NAN),
        })
    }
}
