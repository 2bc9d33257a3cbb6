//! Brent's method root-finding solver.

use super::SolverConfig;
use crate::types::SolverError;
use num_traits::Float;

/// Brent's method root finder.
///
/// Combines bisection, secant and inverse quadratic interpolation for
/// robust derivative-free root finding. Converges for any continuous
/// function given a valid bracket, falling back to bisection whenever an
/// interpolated step would be unreliable.
///
/// # Example
///
/// ```
/// use trs_core::math::solvers::{BrentSolver, SolverConfig};
///
/// let solver = BrentSolver::new(SolverConfig::default());
/// let f = |x: f64| x * x * x - x - 2.0;
/// let root = solver.find_root(f, 1.0, 2.0).unwrap();
/// assert!(f(root).abs() < 1e-10);
/// ```
#[derive(Debug, Clone)]
pub struct BrentSolver<T: Float> {
    config: SolverConfig<T>,
}

impl<T: Float> BrentSolver<T> {
    /// Creates a new Brent solver with the given configuration.
    pub fn new(config: SolverConfig<T>) -> Self {
        Self { config }
    }

    /// Creates a solver with the default configuration.
    pub fn with_defaults() -> Self {
        Self {
            config: SolverConfig::default(),
        }
    }

    /// Finds a root of `f` in the bracket `[a, b]`.
    ///
    /// # Errors
    ///
    /// - `SolverError::NoBracket`: `f(a)` and `f(b)` have the same sign
    /// - `SolverError::MaxIterationsExceeded`: iteration cap reached
    pub fn find_root<F>(&self, f: F, a: T, b: T) -> Result<T, SolverError>
    where
        F: Fn(T) -> T,
    {
        let mut a = a;
        let mut b = b;
        let mut fa = f(a);
        let mut fb = f(b);

        if fa * fb > T::zero() {
            return Err(SolverError::NoBracket {
                a: a.to_f64().unwrap_or(f64::NAN),
                b: b.to_f64().unwrap_or(f64::NAN),
            });
        }

        // Keep |f(b)| <= |f(a)| so b is the best iterate.
        if fa.abs() < fb.abs() {
            std::mem::swap(&mut a, &mut b);
            std::mem::swap(&mut fa, &mut fb);
        }

        let mut c = a;
        let mut fc = fa;
        let mut d = b - a;
        let mut e = d;

        let two = T::from(2.0).unwrap();
        let three = T::from(3.0).unwrap();

        for _ in 0..self.config.max_iterations {
            if fb.abs() < self.config.tolerance {
                return Ok(b);
            }

            let tol = self.config.tolerance;
            let m = (c - b) / two;
            if m.abs() <= tol {
                return Ok(b);
            }

            let use_bisection;
            if fa != fc && fb != fc {
                // Inverse quadratic interpolation
                let r = fb / fc;
                let s = fb / fa;
                let t = fa / fc;

                let p = s * (t * (r - t) * (c - b) - (T::one() - r) * (b - a));
                let q = (t - T::one()) * (r - T::one()) * (s - T::one());

                if p.abs() < (three * m * q).abs() / two && p.abs() < (e * q).abs() / two {
                    e = d;
                    d = p / q;
                    use_bisection = false;
                } else {
                    use_bisection = true;
                }
            } else if fa != fb {
                // Secant step
                let s = fb / fa;
                let step = s * (a - b) / (s - T::one());
                if step.abs() < (three * m).abs() / two {
                    e = d;
                    d = step;
                    use_bisection = false;
                } else {
                    use_bisection = true;
                }
            } else {
                use_bisection = true;
            }

            if use_bisection {
                d = m;
                e = m;
            }

            a = b;
            fa = fb;
            b = b + d;
            fb = f(b);

            // Maintain the bracket: c stays on the opposite side of the root.
            if (fb > T::zero()) == (fc > T::zero()) {
                c = a;
                fc = fa;
                d = b - a;
                e = d;
            }
            if fa.abs() < fb.abs() {
                std::mem::swap(&mut a, &mut b);
                std::mem::swap(&mut fa, &mut fb);
            }
        }

        Err(SolverError::MaxIterationsExceeded {
            max_iterations: self.config.max_iterations,
            residual: fb.abs().to_f64().unwrap_or(f64::NAN),
        })
    }
}
