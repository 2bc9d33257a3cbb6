//! Correlated multi-asset geometric Brownian motion.
//!
//! Each asset follows `dS = mu * S * dt + sigma * S * dW` with the exact
//! log-space step
//!
//! ```text
//! S(t+dt) = S(t) * exp((mu - 0.5*sigma^2)*dt + sigma*sqrt(dt)*dW)
//! ```
//!
//! Drifts arrive per step from the pricing context's curves (forward rate
//! minus dividend and repo carry); the model owns spots, volatilities and
//! the correlation structure.

use trs_core::types::Ticker;

use crate::basket::Basket;
use crate::correlation::{CholeskyFactor, CorrelationMatrix};
use crate::error::ModelError;

/// Per-asset model parameters.
#[derive(Clone, Debug, PartialEq)]
pub struct GbmAsset {
    /// Underlying identity; must match the basket the model drives.
    pub ticker: Ticker,
    /// Initial spot price (positive).
    pub spot: f64,
    /// Annualized lognormal volatility (non-negative).
    pub volatility: f64,
}

impl GbmAsset {
    /// Creates asset parameters with validation.
    ///
    /// # Errors
    ///
    /// `ModelError::InvalidParameter` for non-positive spot or negative
    /// volatility.
    pub fn new(ticker: Ticker, spot: f64, volatility: f64) -> Result<Self, ModelError> {
        if spot <= 0.0 {
            return Err(ModelError::InvalidParameter {
                reason: format!("spot {spot} must be positive for {ticker}"),
            });
        }
        if volatility < 0.0 {
            return Err(ModelError::InvalidParameter {
                reason: format!("volatility {volatility} must be non-negative for {ticker}"),
            });
        }
        Ok(Self {
            ticker,
            spot,
            volatility,
        })
    }
}

/// Joint lognormal dynamics for a basket of assets.
///
/// # Example
///
/// ```
/// use trs_core::types::Ticker;
/// use trs_models::correlation::CorrelationMatrix;
/// use trs_models::gbm::{CorrelatedGbm, GbmAsset};
///
/// let model = CorrelatedGbm::new(
///     vec![
///         GbmAsset::new(Ticker::new("AAA"), 100.0, 0.2).unwrap(),
///         GbmAsset::new(Ticker::new("BBB"), 50.0, 0.3).unwrap(),
///     ],
///     CorrelationMatrix::new(&[1.0, 0.4, 0.4, 1.0], 2).unwrap(),
/// ).unwrap();
///
/// assert_eq!(model.n_assets(), 2);
/// ```
#[derive(Clone, Debug)]
pub struct CorrelatedGbm {
    assets: Vec<GbmAsset>,
    correlation: CorrelationMatrix,
    cholesky: CholeskyFactor,
}

impl CorrelatedGbm {
    /// Creates the joint model, factorizing the correlation matrix once.
    ///
    /// # Errors
    ///
    /// - `ModelError::InvalidDimensions`: correlation dimension differs
    ///   from the asset count
    /// - `ModelError::NotPositiveDefinite`: factorization failed
    pub fn new(
        assets: Vec<GbmAsset>,
        correlation: CorrelationMatrix,
    ) -> Result<Self, ModelError> {
        if correlation.dim() != assets.len() {
            return Err(ModelError::InvalidDimensions {
                expected: assets.len() * assets.len(),
                got: correlation.dim() * correlation.dim(),
            });
        }
        let cholesky = correlation.cholesky()?;
        Ok(Self {
            assets,
            correlation,
            cholesky,
        })
    }

    /// Single-asset model with no correlation structure.
    pub fn single(asset: GbmAsset) -> Self {
        let correlation = CorrelationMatrix::identity(1);
        let cholesky = correlation.cholesky().expect("identity is positive definite");
        Self {
            assets: vec![asset],
            correlation,
            cholesky,
        }
    }

    /// Returns the asset count.
    pub fn n_assets(&self) -> usize {
        self.assets.len()
    }

    /// Returns the per-asset parameters.
    pub fn assets(&self) -> &[GbmAsset] {
        &self.assets
    }

    /// Returns the correlation matrix.
    pub fn correlation(&self) -> &CorrelationMatrix {
        &self.correlation
    }

    /// Returns the Cholesky factor for increment correlation.
    pub fn cholesky(&self) -> &CholeskyFactor {
        &self.cholesky
    }

    /// Initial state vector: the spots in asset order.
    pub fn initial_state(&self) -> Vec<f64> {
        self.assets.iter().map(|a| a.spot).collect()
    }

    /// Checks the model matches a basket: same count, same tickers in the
    /// same order.
    ///
    /// # Errors
    ///
    /// `ModelError::BasketMismatch` describing the first discrepancy.
    pub fn check_basket(&self, basket: &Basket) -> Result<(), ModelError> {
        if basket.len() != self.assets.len() {
            return Err(ModelError::BasketMismatch {
                reason: format!(
                    "model has {} assets, basket {} has {}",
                    self.assets.len(),
                    basket.id(),
                    basket.len()
                ),
            });
        }
        for (asset, (ticker, _)) in self.assets.iter().zip(basket.components()) {
            if asset.ticker != *ticker {
                return Err(ModelError::BasketMismatch {
                    reason: format!(
                        "model asset {} does not match basket component {}",
                        asset.ticker, ticker
                    ),
                });
            }
        }
        Ok(())
    }

    /// Advances every asset one step in place.
    ///
    /// `drifts` carries the per-asset risk-neutral drift for the step and
    /// `correlated_dw` the already-correlated standard normal increments.
    ///
    /// # Panics
    ///
    /// Panics on slice length mismatch; the engine sizes buffers once.
    pub fn evolve_step(
        &self,
        states: &mut [f64],
        drifts: &[f64],
        dt: f64,
        correlated_dw: &[f64],
    ) {
        let n = self.assets.len();
        assert_eq!(states.len(), n, "state length must match asset count");
        assert_eq!(drifts.len(), n, "drift length must match asset count");
        assert_eq!(correlated_dw.len(), n, "increment length must match asset count");

        let sqrt_dt = dt.sqrt();
        for i in 0..n {
            let sigma = self.assets[i].volatility;
            let log_increment =
                (drifts[i] - 0.5 * sigma * sigma) * dt + sigma * sqrt_dt * correlated_dw[i];
            states[i] *= log_increment.exp();
        }
    }
}
