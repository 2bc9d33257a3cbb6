//! The Monte Carlo pricing engine.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use rayon::prelude::*;
use tracing::debug;

use trs_core::curves::YieldCurve;
use trs_models::gbm::CorrelatedGbm;
use trs_models::trs::TotalReturnSwap;

use super::config::McConfig;
use super::payoff::{evaluate_swap_on_path, PathOutcome};
use super::stats::{two_sided_quantile, Accumulator};
use crate::context::MarketView;
use crate::error::{NumericalWarning, SimulationError};
use crate::rng::SimRng;

/// Cooperative cancellation token checked between path batches.
///
/// Cancelling discards all partial work: the run fails with
/// [`SimulationError::Cancelled`] rather than reporting a partial price.
#[derive(Clone, Debug, Default)]
pub struct CancellationToken {
    flag: Arc<AtomicBool>,
}

impl CancellationToken {
    /// Creates an uncancelled token.
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests cancellation.
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    /// Returns true once cancellation was requested.
    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}

/// A Monte Carlo estimate with its sampling diagnostics.
#[derive(Clone, Debug, PartialEq)]
pub struct McEstimate {
    /// Present value point estimate.
    pub price: f64,
    /// Standard error of the estimate.
    pub std_error: f64,
    /// Two-sided confidence level of `half_width`.
    pub confidence_level: f64,
    /// Confidence half-width at the configured level.
    pub half_width: f64,
    /// Spread that zeroes the expected dirty price, when the annuity
    /// supports the solve.
    pub fair_spread: Option<f64>,
    /// Number of paths behind the estimate.
    pub n_paths: usize,
    /// Non-fatal diagnostics attached to the result.
    pub warnings: Vec<NumericalWarning>,
}

impl McEstimate {
    /// Returns the confidence interval `(low, high)`.
    pub fn confidence_interval(&self) -> (f64, f64) {
        (self.price - self.half_width, self.price + self.half_width)
    }
}

/// Monte Carlo pricing engine for the TRS family.
///
/// # Reproducibility
///
/// Path batches derive independent random streams from
/// (seed, batch index), so the estimate is identical for a given seed no
/// matter how the batches land on worker threads. Antithetic variates
/// pair each path with its mirrored increments.
///
/// # Example
///
/// ```no_run
/// use trs_pricing::mc::{McConfig, McEngine};
/// # fn doc(swap: &trs_models::trs::TotalReturnSwap,
/// #        model: &trs_models::gbm::CorrelatedGbm,
/// #        view: &trs_pricing::context::MarketView) {
/// let engine = McEngine::new(McConfig::builder().n_paths(100_000).seed(42).build().unwrap());
/// let estimate = engine.price(swap, model, view).unwrap();
/// println!("{} +/- {}", estimate.price, estimate.half_width);
/// # }
/// ```
pub struct McEngine {
    config: McConfig,
}

impl McEngine {
    /// Creates an engine; the configuration is validated once here.
    pub fn new(config: McConfig) -> Self {
        Self { config }
    }

    /// Returns the engine configuration.
    pub fn config(&self) -> &McConfig {
        &self.config
    }

    /// Prices a swap without a cancellation token.
    pub fn price(
        &self,
        swap: &TotalReturnSwap,
        model: &CorrelatedGbm,
        view: &MarketView,
    ) -> Result<McEstimate, SimulationError> {
        self.price_cancellable(swap, model, view, None)
    }

    /// Prices a swap, checking the token between path batches.
    pub fn price_cancellable(
        &self,
        swap: &TotalReturnSwap,
        model: &CorrelatedGbm,
        view: &MarketView,
        cancel: Option<&CancellationToken>,
    ) -> Result<McEstimate, SimulationError> {
        self.config.validate()?;
        model.check_basket(&swap.asset_leg().basket)?;

        // Schedule-driven time grid.
        let schedule = swap.schedule()?;
        let times = schedule.times_from(view.as_of(), view.day_count());
        if times.first().copied().unwrap_or(0.0) <= 0.0 {
            return Err(SimulationError::InvalidConfig {
                reason: "first observation at or before the valuation date".to_string(),
            });
        }
        let accruals = schedule.accruals(swap.funding_leg().day_count);

        let n_steps = times.len();
        let n_assets = model.n_assets();

        // Deterministic per-step inputs off the pricing context.
        let mut dfs = Vec::with_capacity(n_steps);
        let mut drifts = vec![0.0; n_steps * n_assets];
        let mut t_prev = 0.0;
        for (i, &t) in times.iter().enumerate() {
            dfs.push(view.discount().discount_factor(t)?);
            for a in 0..n_assets {
                drifts[i * n_assets + a] = view.drift(a, t_prev, t)?;
            }
            t_prev = t;
        }

        let spots = model.initial_state();
        let weights: Vec<f64> = swap
            .asset_leg()
            .basket
            .components()
            .iter()
            .map(|(_, w)| *w)
            .collect();
        let initial_basket: f64 = weights.iter().zip(spots.iter()).map(|(w, s)| w * s).sum();
        if initial_basket <= 0.0 {
            return Err(SimulationError::InvalidConfig {
                reason: format!("initial basket value {initial_basket} must be positive"),
            });
        }

        let spread = swap.funding_leg().spread;
        let side = swap.side().sign();
        let n_paths = self.config.n_paths();
        let batch_size = self.config.batch_size().min(n_paths);
        let n_batches = n_paths.div_ceil(batch_size);
        let antithetic = self.config.antithetic();
        let seed = self.config.seed();

        let worker = |batch: usize| -> Result<Accumulator, SimulationError> {
            if let Some(token) = cancel {
                if token.is_cancelled() {
                    return Err(SimulationError::Cancelled);
                }
            }

            let start = batch * batch_size;
            let count = batch_size.min(n_paths - start);
            let mut rng = SimRng::from_seed(SimRng::batch_seed(seed, batch as u64));

            let mut z = vec![0.0; n_steps * n_assets];
            let mut w = vec![0.0; n_assets];
            let mut states = vec![0.0; n_assets];
            let mut basket_values = vec![0.0; n_steps];
            let mut acc = Accumulator::default();

            for _ in 0..count {
                rng.fill_normal(&mut z);

                let mut run = |sign: f64,
                               states: &mut [f64],
                               w: &mut [f64],
                               basket_values: &mut [f64]|
                 -> PathOutcome {
                    states.copy_from_slice(&spots);
                    let mut t_prev = 0.0;
                    for i in 0..n_steps {
                        let dt = times[i] - t_prev;
                        model.cholesky().transform(&z[i * n_assets..(i + 1) * n_assets], w);
                        if sign < 0.0 {
                            for value in w.iter_mut() {
                                *value = -*value;
                            }
                        }
                        model.evolve_step(
                            states,
                            &drifts[i * n_assets..(i + 1) * n_assets],
                            dt,
                            w,
                        );
                        basket_values[i] = weights
                            .iter()
                            .zip(states.iter())
                            .map(|(wt, s)| wt * s)
                            .sum();
                        t_prev = times[i];
                    }
                    evaluate_swap_on_path(swap, initial_basket, basket_values, &accruals, &dfs)
                };

                let outcome = if antithetic {
                    let first = run(1.0, &mut states, &mut w, &mut basket_values);
                    let second = run(-1.0, &mut states, &mut w, &mut basket_values);
                    PathOutcome {
                        pv_zero_spread: 0.5 * (first.pv_zero_spread + second.pv_zero_spread),
                        annuity: 0.5 * (first.annuity + second.annuity),
                        resets: first.resets + second.resets,
                    }
                } else {
                    run(1.0, &mut states, &mut w, &mut basket_values)
                };

                acc.push(
                    side * outcome.pv_at(spread),
                    outcome.pv_zero_spread,
                    outcome.annuity,
                );
            }
            Ok(acc)
        };

        // Embarrassingly parallel across batches: private accumulators,
        // merged only at the end.
        let accumulators: Result<Vec<Accumulator>, SimulationError> =
            (0..n_batches).into_par_iter().map(worker).collect();
        let total = accumulators?
            .into_iter()
            .fold(Accumulator::default(), Accumulator::merge);

        if let Some(token) = cancel {
            if token.is_cancelled() {
                return Err(SimulationError::Cancelled);
            }
        }

        let price = total.mean();
        let std_error = total.std_error();
        let quantile = two_sided_quantile(self.config.confidence_level());

        let mut warnings = Vec::new();
        let mean_annuity = total.sum_annuity / total.n as f64;
        let fair_spread = if mean_annuity.abs() > 1e-9 {
            Some(total.sum_zero_spread / total.sum_annuity)
        } else {
            warnings.push(NumericalWarning::DegenerateAnnuity {
                annuity: mean_annuity,
            });
            None
        };
        if std_error > self.config.std_error_warn_ratio() * price.abs() && std_error > 0.0 {
            warnings.push(NumericalWarning::HighStandardError { std_error, price });
        }

        debug!(
            trade = swap.trade_id(),
            n_paths,
            n_batches,
            price,
            std_error,
            "monte carlo pricing complete"
        );

        Ok(McEstimate {
            price,
            std_error,
            confidence_level: self.config.confidence_level(),
            half_width: quantile * std_error,
            fair_spread,
            n_paths,
            warnings,
        })
    }
}
