//! Monte Carlo configuration.

use crate::error::SimulationError;

/// Maximum number of simulation paths allowed.
pub const MAX_PATHS: usize = 10_000_000;

/// Immutable Monte Carlo configuration.
///
/// Time stepping follows the instrument's observation schedule, so the
/// configuration carries only sampling parameters. Use
/// [`McConfig::builder`] to construct instances.
///
/// # Examples
///
/// ```rust
/// use trs_pricing::mc::McConfig;
///
/// let config = McConfig::builder()
///     .n_paths(100_000)
///     .seed(42)
///     .antithetic(true)
///     .build()
///     .unwrap();
///
/// assert_eq!(config.n_paths(), 100_000);
/// assert!(config.antithetic());
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct McConfig {
    n_paths: usize,
    seed: u64,
    antithetic: bool,
    confidence_level: f64,
    batch_size: usize,
    std_error_warn_ratio: f64,
}

impl McConfig {
    /// Creates a configuration builder.
    #[inline]
    pub fn builder() -> McConfigBuilder {
        McConfigBuilder::default()
    }

    /// Returns the number of simulation paths.
    #[inline]
    pub fn n_paths(&self) -> usize {
        self.n_paths
    }

    /// Returns the run seed.
    #[inline]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Returns whether antithetic variates are enabled.
    #[inline]
    pub fn antithetic(&self) -> bool {
        self.antithetic
    }

    /// Returns the two-sided confidence level in (0, 1).
    #[inline]
    pub fn confidence_level(&self) -> f64 {
        self.confidence_level
    }

    /// Returns the number of paths per parallel batch.
    #[inline]
    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Standard-error-to-price ratio above which a
    /// [`crate::error::NumericalWarning::HighStandardError`] attaches to
    /// the result.
    #[inline]
    pub fn std_error_warn_ratio(&self) -> f64 {
        self.std_error_warn_ratio
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), SimulationError> {
        if self.n_paths == 0 || self.n_paths > MAX_PATHS {
            return Err(SimulationError::InvalidConfig {
                reason: format!("n_paths {} not in [1, {MAX_PATHS}]", self.n_paths),
            });
        }
        if !(0.0..1.0).contains(&self.confidence_level) || self.confidence_level <= 0.0 {
            return Err(SimulationError::InvalidConfig {
                reason: format!("confidence level {} not in (0, 1)", self.confidence_level),
            });
        }
        if self.batch_size == 0 {
            return Err(SimulationError::InvalidConfig {
                reason: "batch size must be positive".to_string(),
            });
        }
        Ok(())
    }
}

/// Builder for [`McConfig`].
#[derive(Clone, Debug)]
pub struct McConfigBuilder {
    n_paths: usize,
    seed: u64,
    antithetic: bool,
    confidence_level: f64,
    batch_size: usize,
    std_error_warn_ratio: f64,
}

impl Default for McConfigBuilder {
    fn default() -> Self {
        Self {
            n_paths: 10_000,
            seed: 0,
            antithetic: false,
            confidence_level: 0.95,
            batch_size: 1_024,
            std_error_warn_ratio: 0.05,
        }
    }
}

impl McConfigBuilder {
    /// Sets the number of simulation paths.
    pub fn n_paths(mut self, n_paths: usize) -> Self {
        self.n_paths = n_paths;
        self
    }

    /// Sets the run seed.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Enables or disables antithetic variates.
    pub fn antithetic(mut self, antithetic: bool) -> Self {
        self.antithetic = antithetic;
        self
    }

    /// Sets the two-sided confidence level.
    pub fn confidence_level(mut self, level: f64) -> Self {
        self.confidence_level = level;
        self
    }

    /// Sets the paths-per-batch granularity for the worker pool.
    pub fn batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    /// Sets the standard-error warning ratio.
    pub fn std_error_warn_ratio(mut self, ratio: f64) -> Self {
        self.std_error_warn_ratio = ratio;
        self
    }

    /// Builds and validates the configuration.
    pub fn build(self) -> Result<McConfig, SimulationError> {
        let config = McConfig {
            n_paths: self.n_paths,
            seed: self.seed,
            antithetic: self.antithetic,
            confidence_level: self.confidence_level,
            batch_size: self.batch_size,
            std_error_warn_ratio: self.std_error_warn_ratio,
        };
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults() {
        let config = McConfig::builder().build().unwrap();
        assert_eq!(config.n_paths(), 10_000);
        assert_eq!(config.confidence_level(), 0.95);
        assert!(!config.antithetic());
    }

    #[test]
    fn test_zero_paths_rejected() {
        let result = McConfig::builder().n_paths(0).build();
        assert!(matches!(result, Err(SimulationError::InvalidConfig { .. })));
    }

    #[test]
    fn test_too_many_paths_rejected() {
        let result = McConfig::builder().n_paths(MAX_PATHS + 1).build();
        assert!(matches!(result, Err(SimulationError::InvalidConfig { .. })));
    }

    #[test]
    fn test_bad_confidence_rejected() {
        let result = McConfig::builder().confidence_level(1.0).build();
        assert!(matches!(result, Err(SimulationError::InvalidConfig { .. })));
    }
}
