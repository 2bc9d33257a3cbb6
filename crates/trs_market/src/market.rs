//! Generic keyed market container with memoized, single-flight curve
//! resolution.

use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, OnceLock, RwLock};

use tracing::debug;

use crate::bootstrap::Bootstrap;
use crate::bump::{BumpDirection, BumpSpec};
use crate::error::{CalibrationError, MarketError};
use crate::quotes::DataQuoteSheet;

/// Contract for market keys: cheap equality, hashing and cloning.
///
/// Heterogeneous key families (currency, reference rate, ticker, currency
/// pair, basket) are just different instantiations of this contract; there
/// is no per-key-type container subclassing.
pub trait MarketKey: Eq + Hash + Clone + fmt::Debug + Send + Sync + 'static {}

impl<K: Eq + Hash + Clone + fmt::Debug + Send + Sync + 'static> MarketKey for K {}

/// Memoization slot for one resolved curve: filled at most once per
/// (key, sheet-version, direction).
type CurveSlot<C> = Arc<OnceLock<Result<Arc<C>, CalibrationError>>>;

struct Entry<C> {
    sheet: Arc<DataQuoteSheet>,
    bootstrapper: Arc<dyn Bootstrap<C>>,
    bumps: Vec<BumpSpec>,
    base: CurveSlot<C>,
    bumped_up: CurveSlot<C>,
    bumped_down: CurveSlot<C>,
}

impl<C> Entry<C> {
    fn slot(&self, direction: BumpDirection) -> CurveSlot<C> {
        match direction {
            BumpDirection::Up => Arc::clone(&self.bumped_up),
            BumpDirection::Down => Arc::clone(&self.bumped_down),
        }
    }
}

/// A keyed mapping from instrument identity to bootstrapped curve.
///
/// Each key owns its calibration inputs (sheet + bootstrapper), an ordered
/// bump list and the memoized curves resolved from them. Resolution is
/// lazy: the bootstrap runs on the first [`Market::resolve`] for a key and
/// the result is cached until [`Market::add_sheet`] replaces the inputs.
///
/// # Concurrency
///
/// All methods take `&self`. Distinct keys resolve without contention
/// beyond a brief registry read-lock; concurrent resolution of the *same*
/// key is coalesced so the bootstrap executes at most once per
/// (key, sheet-version) — late arrivals block on the in-flight
/// computation and share its result. The market exclusively owns its
/// curves and hands out `Arc` clones.
///
/// # Example
///
/// ```
/// use trs_core::conventions::MarketConventions;
/// use trs_core::types::{Currency, Date};
/// use trs_market::bootstrap::DiscountBootstrap;
/// use trs_market::market::Market;
/// use trs_market::quotes::{Compounding, DataQuoteSheet, InstrumentKind, QuoteInstrument, QuoteKind};
///
/// let as_of = Date::from_ymd(2020, 6, 15).unwrap();
/// let mut sheet = DataQuoteSheet::new(as_of);
/// sheet.add_instrument(
///     QuoteInstrument::new(
///         "USD.ZC.1Y",
///         InstrumentKind::ZeroCoupon { compounding: Compounding::Continuous },
///         Date::from_ymd(2021, 6, 15).unwrap(),
///     )
///     .add_quote(QuoteKind::Mid, 0.005)
///     .unwrap(),
/// );
///
/// let market = Market::new();
/// market.add_sheet(Currency::USD, sheet, DiscountBootstrap::new(MarketConventions::default()));
///
/// let first = market.resolve(&Currency::USD).unwrap();
/// let second = market.resolve(&Currency::USD).unwrap();
/// assert!(std::sync::Arc::ptr_eq(&first, &second)); // memoized
/// assert_eq!(market.bootstrap_count(), 1);
/// ```
pub struct Market<K: MarketKey, C> {
    entries: RwLock<HashMap<K, Entry<C>>>,
    bootstrap_runs: AtomicUsize,
}

impl<K: MarketKey, C: Send + Sync + 'static> Market<K, C> {
    /// Creates an empty market.
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            bootstrap_runs: AtomicUsize::new(0),
        }
    }

    /// Registers or replaces a key's calibration inputs.
    ///
    /// Replacing invalidates every memoized curve for the key (base and
    /// bumped); registered bumps survive, since they are perturbations of
    /// whatever sheet is current.
    pub fn add_sheet(
        &self,
        key: K,
        sheet: DataQuoteSheet,
        bootstrapper: impl Bootstrap<C> + 'static,
    ) {
        let mut entries = self.entries.write().expect("market registry poisoned");
        let bumps = entries.remove(&key).map(|e| e.bumps).unwrap_or_default();
        entries.insert(
            key,
            Entry {
                sheet: Arc::new(sheet),
                bootstrapper: Arc::new(bootstrapper),
                bumps,
                base: Arc::new(OnceLock::new()),
                bumped_up: Arc::new(OnceLock::new()),
                bumped_down: Arc::new(OnceLock::new()),
            },
        );
    }

    /// Appends a bump specification to the key's ordered bump list.
    ///
    /// Multiple registrations compose: bumped resolution applies them
    /// sequentially in registration order. Registering a bump invalidates
    /// memoized bumped curves but never the base curve.
    ///
    /// # Errors
    ///
    /// `MarketError::UnknownKey` when no sheet is registered for the key.
    pub fn set_bump(&self, key: &K, spec: BumpSpec) -> Result<(), MarketError> {
        let mut entries = self.entries.write().expect("market registry poisoned");
        let entry = entries.get_mut(key).ok_or_else(|| MarketError::UnknownKey {
            key: format!("{:?}", key),
        })?;
        entry.bumps.push(spec);
        entry.bumped_up = Arc::new(OnceLock::new());
        entry.bumped_down = Arc::new(OnceLock::new());
        Ok(())
    }

    /// Returns the ordered bump list registered for the key.
    pub fn bumps(&self, key: &K) -> Result<Vec<BumpSpec>, MarketError> {
        let entries = self.entries.read().expect("market registry poisoned");
        entries
            .get(key)
            .map(|e| e.bumps.clone())
            .ok_or_else(|| MarketError::UnknownKey {
                key: format!("{:?}", key),
            })
    }

    /// Returns the registered sheet for the key.
    pub fn sheet(&self, key: &K) -> Result<Arc<DataQuoteSheet>, MarketError> {
        let entries = self.entries.read().expect("market registry poisoned");
        entries
            .get(key)
            .map(|e| Arc::clone(&e.sheet))
            .ok_or_else(|| MarketError::UnknownKey {
                key: format!("{:?}", key),
            })
    }

    /// Returns true when the key has registered calibration inputs.
    pub fn contains(&self, key: &K) -> bool {
        self.entries
            .read()
            .expect("market registry poisoned")
            .contains_key(key)
    }

    /// Returns all registered keys.
    pub fn keys(&self) -> Vec<K> {
        self.entries
            .read()
            .expect("market registry poisoned")
            .keys()
            .cloned()
            .collect()
    }

    /// Resolves the base (unbumped) curve for a key, bootstrapping on
    /// demand and memoizing the result.
    ///
    /// # Errors
    ///
    /// - `MarketError::UnknownKey`: no sheet registered
    /// - `MarketError::Calibration`: the bootstrap failed (the failure is
    ///   memoized alongside successes)
    pub fn resolve(&self, key: &K) -> Result<Arc<C>, MarketError> {
        let (slot, sheet, bootstrapper) = {
            let entries = self.entries.read().expect("market registry poisoned");
            let entry = entries.get(key).ok_or_else(|| MarketError::UnknownKey {
                key: format!("{:?}", key),
            })?;
            (
                Arc::clone(&entry.base),
                Arc::clone(&entry.sheet),
                Arc::clone(&entry.bootstrapper),
            )
        };

        // Single flight: the first caller runs the bootstrap, concurrent
        // callers block on the OnceLock and share the result.
        let result = slot.get_or_init(|| {
            self.bootstrap_runs.fetch_add(1, Ordering::SeqCst);
            debug!(key = ?key, "bootstrapping base curve");
            bootstrapper.bootstrap(&sheet).map(Arc::new)
        });
        result.clone().map_err(MarketError::from)
    }

    /// Resolves the curve for a key with its registered bumps applied in
    /// the given direction.
    ///
    /// Re-bootstraps against the bumped sheet and caches per direction;
    /// the base cached curve is never touched, so base and bumped
    /// resolutions can proceed concurrently. With no bumps registered this
    /// is the base resolution.
    pub fn resolve_bumped(
        &self,
        key: &K,
        direction: BumpDirection,
    ) -> Result<Arc<C>, MarketError> {
        let (slot, sheet, bootstrapper, bumps) = {
            let entries = self.entries.read().expect("market registry poisoned");
            let entry = entries.get(key).ok_or_else(|| MarketError::UnknownKey {
                key: format!("{:?}", key),
            })?;
            if entry.bumps.is_empty() {
                drop(entries);
                return self.resolve(key);
            }
            (
                entry.slot(direction),
                Arc::clone(&entry.sheet),
                Arc::clone(&entry.bootstrapper),
                entry.bumps.clone(),
            )
        };

        let result = slot.get_or_init(|| {
            self.bootstrap_runs.fetch_add(1, Ordering::SeqCst);
            debug!(key = ?key, ?direction, bumps = bumps.len(), "bootstrapping bumped curve");
            let mut bumped = (*sheet).clone();
            for spec in &bumps {
                bumped = spec.apply(&bumped, direction);
            }
            bootstrapper.bootstrap(&bumped).map(Arc::new)
        });
        result.clone().map_err(MarketError::from)
    }

    /// Runs the key's registered bootstrapper against a caller-supplied
    /// sheet, uncached.
    ///
    /// Ladder scenarios use this to rebuild curves from per-pillar bumped
    /// sheets without disturbing the memoized resolutions.
    pub fn bootstrap_with(&self, key: &K, sheet: &DataQuoteSheet) -> Result<Arc<C>, MarketError> {
        let bootstrapper = {
            let entries = self.entries.read().expect("market registry poisoned");
            let entry = entries.get(key).ok_or_else(|| MarketError::UnknownKey {
                key: format!("{:?}", key),
            })?;
            Arc::clone(&entry.bootstrapper)
        };
        self.bootstrap_runs.fetch_add(1, Ordering::SeqCst);
        Ok(Arc::new(bootstrapper.bootstrap(sheet)?))
    }

    /// Returns how many bootstrap executions this market has performed.
    ///
    /// Cache behaviour is observable through this counter: repeated
    /// resolutions of an unmodified key leave it unchanged.
    pub fn bootstrap_count(&self) -> usize {
        self.bootstrap_runs.load(Ordering::SeqCst)
    }
}

impl<K: MarketKey, C: Send + Sync + 'static> Default for Market<K, C> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bootstrap::DiscountBootstrap;
    use crate::bump::{BumpKind, BumpScope};
    use crate::quotes::{Compounding, InstrumentKind, QuoteInstrument, QuoteKind};
    use approx::assert_relative_eq;
    use trs_core::conventions::MarketConventions;
    use trs_core::curves::{PillarCurve, YieldCurve};
    use trs_core::types::{Currency, Date};

    fn sheet(mid_1y: f64) -> DataQuoteSheet {
        let as_of = Date::from_ymd(2020, 6, 15).unwrap();
        let mut sheet = DataQuoteSheet::new(as_of);
        for (label, maturity, mid) in [
            ("ZC.1Y", Date::from_ymd(2021, 6, 15).unwrap(), mid_1y),
            ("ZC.2Y", Date::from_ymd(2022, 6, 15).unwrap(), mid_1y + 0.002),
        ] {
            sheet.add_instrument(
                QuoteInstrument::new(
                    label,
                    InstrumentKind::ZeroCoupon {
                        compounding: Compounding::Continuous,
                    },
                    maturity,
                )
                .add_quote(QuoteKind::Mid, mid)
                .unwrap(),
            );
        }
        sheet
    }

    fn market_with_usd(mid_1y: f64) -> Market<Currency, PillarCurve<f64>> {
        let market = Market::new();
        market.add_sheet(
            Currency::USD,
            sheet(mid_1y),
            DiscountBootstrap::new(MarketConventions::default()),
        );
        market
    }

    #[test]
    fn test_unknown_key() {
        let market: Market<Currency, PillarCurve<f64>> = Market::new();
        assert!(matches!(
            market.resolve(&Currency::EUR),
            Err(MarketError::UnknownKey { .. })
        ));
    }

    #[test]
    fn test_resolution_is_memoized() {
        let market = market_with_usd(0.01);
        let a = market.resolve(&Currency::USD).unwrap();
        let b = market.resolve(&Currency::USD).unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(market.bootstrap_count(), 1);
    }

    #[test]
    fn test_add_sheet_invalidates_cache() {
        let market = market_with_usd(0.01);
        let before = market.resolve(&Currency::USD).unwrap();

        market.add_sheet(
            Currency::USD,
            sheet(0.02),
            DiscountBootstrap::new(MarketConventions::default()),
        );
        let after = market.resolve(&Currency::USD).unwrap();

        assert!(!Arc::ptr_eq(&before, &after));
        assert!(after.zero_rate(1.0).unwrap() > before.zero_rate(1.0).unwrap());
        assert_eq!(market.bootstrap_count(), 2);
    }

    #[test]
    fn test_set_bump_unknown_key() {
        let market: Market<Currency, PillarCurve<f64>> = Market::new();
        let result = market.set_bump(&Currency::USD, BumpSpec::flat_absolute(0.0001));
        assert!(matches!(result, Err(MarketError::UnknownKey { .. })));
    }

    #[test]
    fn test_bumped_resolution_leaves_base_untouched() {
        let market = market_with_usd(0.01);
        market
            .set_bump(&Currency::USD, BumpSpec::flat_absolute(0.001))
            .unwrap();

        let base_before = market.resolve(&Currency::USD).unwrap();
        let bumped = market.resolve_bumped(&Currency::USD, BumpDirection::Up).unwrap();
        let base_after = market.resolve(&Currency::USD).unwrap();

        assert!(Arc::ptr_eq(&base_before, &base_after));
        assert!(bumped.zero_rate(1.0).unwrap() > base_before.zero_rate(1.0).unwrap());
    }

    #[test]
    fn test_bumps_compose_in_registration_order() {
        let market = market_with_usd(0.01);
        market
            .set_bump(
                &Currency::USD,
                BumpSpec::new(0.001, -0.001, BumpKind::Absolute, BumpScope::Flat),
            )
            .unwrap();
        market
            .set_bump(
                &Currency::USD,
                BumpSpec::new(0.002, -0.002, BumpKind::Absolute, BumpScope::Flat),
            )
            .unwrap();

        let bumped = market.resolve_bumped(&Currency::USD, BumpDirection::Up).unwrap();
        // 0.01 + 0.001 + 0.002 at the 1Y pillar (both specs applied)
        let t = 365.0 / 365.0;
        assert_relative_eq!(bumped.zero_rate(t).unwrap(), 0.013, epsilon = 1e-10);
    }

    #[test]
    fn test_up_and_down_cached_independently() {
        let market = market_with_usd(0.01);
        market
            .set_bump(&Currency::USD, BumpSpec::flat_absolute(0.001))
            .unwrap();

        let up = market.resolve_bumped(&Currency::USD, BumpDirection::Up).unwrap();
        let down = market.resolve_bumped(&Currency::USD, BumpDirection::Down).unwrap();
        assert!(up.zero_rate(1.0).unwrap() > down.zero_rate(1.0).unwrap());

        // Second resolutions hit the caches.
        let runs = market.bootstrap_count();
        let _ = market.resolve_bumped(&Currency::USD, BumpDirection::Up).unwrap();
        let _ = market.resolve_bumped(&Currency::USD, BumpDirection::Down).unwrap();
        assert_eq!(market.bootstrap_count(), runs);
    }

    #[test]
    fn test_resolve_bumped_without_bumps_is_base() {
        let market = market_with_usd(0.01);
        let base = market.resolve(&Currency::USD).unwrap();
        let bumped = market.resolve_bumped(&Currency::USD, BumpDirection::Up).unwrap();
        assert!(Arc::ptr_eq(&base, &bumped));
    }

    #[test]
    fn test_failed_bootstrap_is_memoized() {
        let market: Market<Currency, PillarCurve<f64>> = Market::new();
        let as_of = Date::from_ymd(2020, 6, 15).unwrap();
        market.add_sheet(
            Currency::USD,
            DataQuoteSheet::new(as_of), // empty: calibration will fail
            DiscountBootstrap::new(MarketConventions::default()),
        );

        assert!(market.resolve(&Currency::USD).is_err());
        assert!(market.resolve(&Currency::USD).is_err());
        // The failure was computed once and memoized.
        assert_eq!(market.bootstrap_count(), 1);
    }
}
