//! Weighted underlying baskets.

use trs_core::types::{BasketId, Ticker};

use crate::error::InstrumentError;

/// A named, weighted collection of underlyings priced as one reference
/// asset.
///
/// Tickers are unique within a basket. Weights need not sum to one:
/// scaling is the caller's responsibility.
///
/// # Example
///
/// ```
/// use trs_core::types::{BasketId, Ticker};
/// use trs_models::basket::Basket;
///
/// let basket = Basket::new(BasketId::new("TECH"))
///     .with_component(Ticker::new("AAA"), 0.6)
///     .unwrap()
///     .with_component(Ticker::new("BBB"), 0.4)
///     .unwrap();
///
/// assert_eq!(basket.len(), 2);
/// assert!((basket.value(&[100.0, 50.0]) - 80.0).abs() < 1e-12);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct Basket {
    id: BasketId,
    components: Vec<(Ticker, f64)>,
}

impl Basket {
    /// Creates an empty basket.
    pub fn new(id: BasketId) -> Self {
        Self {
            id,
            components: Vec::new(),
        }
    }

    /// Appends a component (builder style).
    ///
    /// # Errors
    ///
    /// `InstrumentError::DuplicateTicker` when the ticker already appears.
    pub fn with_component(mut self, ticker: Ticker, weight: f64) -> Result<Self, InstrumentError> {
        if self.components.iter().any(|(t, _)| *t == ticker) {
            return Err(InstrumentError::DuplicateTicker {
                ticker: ticker.symbol().to_string(),
            });
        }
        self.components.push((ticker, weight));
        Ok(self)
    }

    /// Returns the basket identity.
    pub fn id(&self) -> &BasketId {
        &self.id
    }

    /// Returns the component count.
    pub fn len(&self) -> usize {
        self.components.len()
    }

    /// Returns true when the basket has no components.
    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// Returns the (ticker, weight) components in insertion order.
    pub fn components(&self) -> &[(Ticker, f64)] {
        &self.components
    }

    /// Returns the tickers in insertion order.
    pub fn tickers(&self) -> impl Iterator<Item = &Ticker> + '_ {
        self.components.iter().map(|(t, _)| t)
    }

    /// Weighted basket value for component prices given in insertion
    /// order.
    ///
    /// # Panics
    ///
    /// Panics when `prices` and components disagree in length; callers
    /// validate the pairing up front via model/basket checks.
    pub fn value(&self, prices: &[f64]) -> f64 {
        assert_eq!(
            prices.len(),
            self.components.len(),
            "price vector length must match basket"
        );
        self.components
            .iter()
            .zip(prices.iter())
            .map(|((_, w), p)| w * p)
            .sum()
    }
}
