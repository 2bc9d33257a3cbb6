//! Identity types for market observables.
//!
//! A market container is generic over its key; any `Eq + Hash + Clone`
//! type works. These are the key families used across the workspace,
//! alongside [`super::Currency`] and [`super::CurrencyPair`].

use std::fmt;

use super::currency::Currency;
use super::time::Tenor;

/// An equity underlying identified by ticker.
///
/// # Example
///
/// ```
/// use trs_core::types::Ticker;
///
/// let ticker = Ticker::new("ACME");
/// assert_eq!(format!("{}", ticker), "ACME");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Ticker(String);

impl Ticker {
    /// Creates a ticker key.
    pub fn new(symbol: impl Into<String>) -> Self {
        Self(symbol.into())
    }

    /// Returns the ticker symbol.
    pub fn symbol(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Ticker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A floating reference rate: currency plus fixing tenor (e.g. USD 3M).
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ReferenceRate {
    /// Currency of the rate.
    pub currency: Currency,
    /// Fixing tenor.
    pub tenor: Tenor,
}

impl fmt::Display for ReferenceRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.currency, self.tenor)
    }
}

/// A named basket identity.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BasketId(String);

impl BasketId {
    /// Creates a basket key.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Returns the basket name.
    pub fn name(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BasketId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
