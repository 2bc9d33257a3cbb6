//! The Total Return Swap instrument family.
//!
//! A TRS exchanges the total return of a basket (the asset leg) against
//! funding plus a spread (the funding leg). The asset leg carries a price
//! reset mechanic: its reference price rebases either on every period
//! (periodic reset) or only when the cumulative relative move since the
//! last reset exceeds a threshold.

use trs_core::types::{Currency, Date, DayCountConvention};

use crate::basket::Basket;
use crate::error::{InstrumentError, ScheduleError};
use crate::schedules::{Frequency, Schedule};

/// Product type tag for pricer dispatch.
#[non_exhaustive]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ProductType {
    /// Total return swap on a basket.
    TotalReturnSwap,
}

/// Which side of the swap the book holds.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Side {
    /// Receive the basket total return, pay funding plus spread.
    ReceiveTotalReturn,
    /// Pay the basket total return, receive funding plus spread.
    PayTotalReturn,
}

impl Side {
    /// Sign applied to the net present value: +1 for the receiver of the
    /// total return.
    pub fn sign(&self) -> f64 {
        match self {
            Side::ReceiveTotalReturn => 1.0,
            Side::PayTotalReturn => -1.0,
        }
    }
}

/// Reset mechanic of the asset leg.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ResetPolicy {
    /// Rebase on every observation date.
    Periodic,
    /// Rebase only when the relative move since the last reset exceeds
    /// the threshold.
    Threshold {
        /// Relative-change trigger (positive, e.g. 0.10 for 10%).
        threshold: f64,
    },
}

/// A reset firing: the leg rebased its reference price.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ResetEvent {
    /// Reference price before the reset.
    pub previous_reference: f64,
    /// Reference price after the reset (the observed price).
    pub new_reference: f64,
}

/// The asset leg's running state: active at a reference price.
///
/// On each observation the state either rebases (emitting a
/// [`ResetEvent`], whose cash flow the leg evaluator turns into a
/// payment) or carries the prior reference forward with no cash flow.
///
/// # Example
///
/// ```
/// use trs_models::trs::{ResetPolicy, ResetState};
///
/// let policy = ResetPolicy::Threshold { threshold: 0.10 };
/// let mut state = ResetState::new(100.0);
///
/// // +5% then -5%: inside the band, no reset fires.
/// assert!(state.observe(105.0, &policy).is_none());
/// assert!(state.observe(95.0, &policy).is_none());
/// assert_eq!(state.reference(), 100.0);
///
/// // +15%: exactly one reset, reference rebases.
/// let event = state.observe(115.0, &policy).unwrap();
/// assert_eq!(event.previous_reference, 100.0);
/// assert_eq!(state.reference(), 115.0);
/// ```
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ResetState {
    reference: f64,
}

impl ResetState {
    /// Starts the state machine at the initial reference price.
    pub fn new(reference: f64) -> Self {
        Self { reference }
    }

    /// Returns the current reference price.
    pub fn reference(&self) -> f64 {
        self.reference
    }

    /// Feeds one observation through the state machine.
    ///
    /// Returns `Some(ResetEvent)` when the leg rebases, `None` when the
    /// reference carries forward unchanged.
    pub fn observe(&mut self, price: f64, policy: &ResetPolicy) -> Option<ResetEvent> {
        let fires = match policy {
            ResetPolicy::Periodic => true,
            ResetPolicy::Threshold { threshold } => {
                (price / self.reference - 1.0).abs() > *threshold
            }
        };
        if !fires {
            return None;
        }
        let event = ResetEvent {
            previous_reference: self.reference,
            new_reference: price,
        };
        self.reference = price;
        Some(event)
    }
}

/// The asset leg: a basket observed on the swap schedule under a reset
/// policy.
#[derive(Clone, Debug, PartialEq)]
pub struct AssetLeg {
    /// Underlying basket.
    pub basket: Basket,
    /// Reset mechanic.
    pub reset_policy: ResetPolicy,
}

/// The funding leg: accrues forward rate plus spread on the effective
/// notional.
#[derive(Clone, Debug, PartialEq)]
pub struct FundingLeg {
    /// Spread over the funding rate (annualized).
    pub spread: f64,
    /// Accrual day count.
    pub day_count: DayCountConvention,
}

/// A total return swap on a basket.
///
/// # Example
///
/// ```
/// use trs_core::types::{BasketId, Currency, Date, DayCountConvention, Ticker};
/// use trs_models::basket::Basket;
/// use trs_models::schedules::Frequency;
/// use trs_models::trs::{ResetPolicy, Side, TotalReturnSwap};
///
/// let basket = Basket::new(BasketId::new("TECH"))
///     .with_component(Ticker::new("AAA"), 1.0)
///     .unwrap();
///
/// let swap = TotalReturnSwap::new(
///     "TRS-1",
///     basket,
///     ResetPolicy::Periodic,
///     0.0015,
///     DayCountConvention::Act360,
///     10_000_000.0,
///     Currency::USD,
///     Side::ReceiveTotalReturn,
///     Date::from_ymd(2020, 6, 15).unwrap(),
///     Date::from_ymd(2021, 6, 15).unwrap(),
///     Frequency::Quarterly,
/// ).unwrap();
///
/// assert_eq!(swap.schedule().unwrap().len(), 4);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct TotalReturnSwap {
    trade_id: String,
    asset_leg: AssetLeg,
    funding_leg: FundingLeg,
    notional: f64,
    currency: Currency,
    side: Side,
    effective: Date,
    maturity: Date,
    frequency: Frequency,
}

impl TotalReturnSwap {
    /// Creates a swap with validation.
    ///
    /// # Errors
    ///
    /// - `InstrumentError::EmptyBasket`
    /// - `InstrumentError::InvalidThreshold`: non-positive threshold
    /// - `InstrumentError::InvalidTrade`: non-positive notional, or
    ///   maturity not after the effective date
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        trade_id: impl Into<String>,
        basket: Basket,
        reset_policy: ResetPolicy,
        spread: f64,
        funding_day_count: DayCountConvention,
        notional: f64,
        currency: Currency,
        side: Side,
        effective: Date,
        maturity: Date,
        frequency: Frequency,
    ) -> Result<Self, InstrumentError> {
        if basket.is_empty() {
            return Err(InstrumentError::EmptyBasket);
        }
        if let ResetPolicy::Threshold { threshold } = reset_policy {
            if threshold <= 0.0 {
                return Err(InstrumentError::InvalidThreshold { threshold });
            }
        }
        if notional <= 0.0 {
            return Err(InstrumentError::InvalidTrade {
                reason: format!("notional {notional} must be positive"),
            });
        }
        if maturity <= effective {
            return Err(InstrumentError::InvalidTrade {
                reason: format!("maturity {maturity} must follow effective {effective}"),
            });
        }
        Ok(Self {
            trade_id: trade_id.into(),
            asset_leg: AssetLeg {
                basket,
                reset_policy,
            },
            funding_leg: FundingLeg {
                spread,
                day_count: funding_day_count,
            },
            notional,
            currency,
            side,
            effective,
            maturity,
            frequency,
        })
    }

    /// Returns the trade identifier.
    pub fn trade_id(&self) -> &str {
        &self.trade_id
    }

    /// Returns the product type tag for pricer dispatch.
    pub fn product_type(&self) -> ProductType {
        ProductType::TotalReturnSwap
    }

    /// Returns the asset leg.
    pub fn asset_leg(&self) -> &AssetLeg {
        &self.asset_leg
    }

    /// Returns the funding leg.
    pub fn funding_leg(&self) -> &FundingLeg {
        &self.funding_leg
    }

    /// Returns the notional.
    pub fn notional(&self) -> f64 {
        self.notional
    }

    /// Returns the settlement currency.
    pub fn currency(&self) -> Currency {
        self.currency
    }

    /// Returns which side the book holds.
    pub fn side(&self) -> Side {
        self.side
    }

    /// Returns the effective (start) date.
    pub fn effective(&self) -> Date {
        self.effective
    }

    /// Returns the maturity date.
    pub fn maturity(&self) -> Date {
        self.maturity
    }

    /// Returns the observation/payment frequency.
    pub fn frequency(&self) -> Frequency {
        self.frequency
    }

    /// Returns a copy of this swap with a different spread.
    ///
    /// Fair-spread solving re-prices the same trade at trial spreads.
    pub fn with_spread(&self, spread: f64) -> Self {
        let mut swap = self.clone();
        swap.funding_leg.spread = spread;
        swap
    }

    /// Generates the shared observation/payment schedule.
    pub fn schedule(&self) -> Result<Schedule, ScheduleError> {
        Schedule::generate(self.effective, self.maturity, self.frequency)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use trs_core::types::{BasketId, Ticker};

    fn basket() -> Basket {
        Basket::new(BasketId::new("B"))
            .with_component(Ticker::new("AAA"), 1.0)
            .unwrap()
    }

    fn swap(reset_policy: ResetPolicy) -> Result<TotalReturnSwap, InstrumentError> {
        TotalReturnSwap::new(
            "TRS-1",
            basket(),
            reset_policy,
            0.001,
            DayCountConvention::Act360,
            1_000_000.0,
            Currency::USD,
            Side::ReceiveTotalReturn,
            Date::from_ymd(2020, 6, 15).unwrap(),
            Date::from_ymd(2022, 6, 15).unwrap(),
            Frequency::Quarterly,
        )
    }

    // ========================================
    // Reset state machine
    // ========================================

    #[test]
    fn test_threshold_inside_band_no_reset() {
        let policy = ResetPolicy::Threshold { threshold: 0.10 };
        let mut state = ResetState::new(100.0);
        assert!(state.observe(105.0, &policy).is_none());
        assert!(state.observe(95.0, &policy).is_none());
        assert_eq!(state.reference(), 100.0);
    }

    #[test]
    fn test_threshold_breach_fires_once_and_rebases() {
        let policy = ResetPolicy::Threshold { threshold: 0.10 };
        let mut state = ResetState::new(100.0);
        let event = state.observe(115.0, &policy).unwrap();
        assert_eq!(event.previous_reference, 100.0);
        assert_eq!(event.new_reference, 115.0);
        assert_eq!(state.reference(), 115.0);

        // A further move inside the band off the new reference stays put.
        assert!(state.observe(120.0, &policy).is_none());
    }

    #[test]
    fn test_downward_breach_also_fires() {
        let policy = ResetPolicy::Threshold { threshold: 0.10 };
        let mut state = ResetState::new(100.0);
        assert!(state.observe(85.0, &policy).is_some());
        assert_eq!(state.reference(), 85.0);
    }

    #[test]
    fn test_periodic_resets_every_observation() {
        let policy = ResetPolicy::Periodic;
        let mut state = ResetState::new(100.0);
        assert!(state.observe(101.0, &policy).is_some());
        assert!(state.observe(99.0, &policy).is_some());
        assert_eq!(state.reference(), 99.0);
    }

    // ========================================
    // Trade validation
    // ========================================

    #[test]
    fn test_valid_trade() {
        assert!(swap(ResetPolicy::Periodic).is_ok());
    }

    #[test]
    fn test_non_positive_threshold_rejected() {
        let result = swap(ResetPolicy::Threshold { threshold: 0.0 });
        assert!(matches!(
            result,
            Err(InstrumentError::InvalidThreshold { .. })
        ));
    }

    #[test]
    fn test_maturity_before_effective_rejected() {
        let result = TotalReturnSwap::new(
            "TRS-2",
            basket(),
            ResetPolicy::Periodic,
            0.001,
            DayCountConvention::Act360,
            1_000_000.0,
            Currency::USD,
            Side::ReceiveTotalReturn,
            Date::from_ymd(2022, 6, 15).unwrap(),
            Date::from_ymd(2020, 6, 15).unwrap(),
            Frequency::Quarterly,
        );
        assert!(matches!(result, Err(InstrumentError::InvalidTrade { .. })));
    }

    #[test]
    fn test_with_spread_changes_only_spread() {
        let original = swap(ResetPolicy::Periodic).unwrap();
        let repriced = original.with_spread(0.005);
        assert_eq!(repriced.funding_leg().spread, 0.005);
        assert_eq!(repriced.trade_id(), original.trade_id());
        assert_eq!(repriced.notional(), original.notional());
    }

    #[test]
    fn test_schedule_spans_trade() {
        let swap = swap(ResetPolicy::Periodic).unwrap();
        let schedule = swap.schedule().unwrap();
        assert_eq!(schedule.len(), 8);
        assert_eq!(*schedule.dates().last().unwrap(), swap.maturity());
    }
}
