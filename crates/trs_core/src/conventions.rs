//! Explicit market-convention configuration.
//!
//! Conventions are plain data threaded through bootstrapper and curve
//! construction. There is no process-global convention state: every
//! component that needs a day count, an interpolation rule or solver
//! tolerances receives them from a [`MarketConventions`] value owned by
//! the caller.

use crate::curves::Interpolation;
use crate::math::solvers::SolverConfig;
use crate::types::DayCountConvention;

/// Conventions governing curve construction.
///
/// # Example
///
/// ```
/// use trs_core::conventions::MarketConventions;
/// use trs_core::types::DayCountConvention;
///
/// let conventions = MarketConventions::default();
/// assert_eq!(conventions.discount_day_count, DayCountConvention::Act365Fixed);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct MarketConventions {
    /// Day count for discount and projection curve pillars.
    pub discount_day_count: DayCountConvention,

    /// Day count for carry (repo, dividend) curve pillars.
    pub carry_day_count: DayCountConvention,

    /// Day count for swap fixed-leg accruals.
    pub swap_day_count: DayCountConvention,

    /// Interpolation rule injected into bootstrapped curves.
    pub interpolation: Interpolation,

    /// Root-find tolerance for calibration solvers.
    pub solver_tolerance: f64,

    /// Root-find iteration cap for calibration solvers.
    pub solver_max_iterations: usize,
}

impl Default for MarketConventions {
    fn default() -> Self {
        Self {
            discount_day_count: DayCountConvention::Act365Fixed,
            carry_day_count: DayCountConvention::Act365Fixed,
            swap_day_count: DayCountConvention::Thirty360E,
            interpolation: Interpolation::LogLinearDiscount,
            solver_tolerance: 1e-12,
            solver_max_iterations: 100,
        }
    }
}

impl MarketConventions {
    /// Returns the solver configuration implied by the tolerances.
    pub fn solver_config(&self) -> SolverConfig<f64> {
        SolverConfig::new(self.solver_tolerance, self.solver_max_iterations)
    }
}
