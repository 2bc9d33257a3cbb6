//! Currency pair type for FX curve keys.
//!
//! The pair carries no market data of its own; the spot rate lives in the
//! fx quote sheet so the pair can act as a pure `Eq + Hash` market key.
//!
//! # Examples
//!
//! ```
//! use trs_core::types::{Currency, CurrencyPair};
//!
//! let pair = CurrencyPair::new(Currency::EUR, Currency::USD).unwrap();
//! assert_eq!(pair.base(), Currency::EUR);
//! assert_eq!(pair.quote(), Currency::USD);
//! assert_eq!(format!("{}", pair), "EURUSD");
//!
//! let inverted = pair.invert();
//! assert_eq!(format!("{}", inverted), "USDEUR");
//! ```

use std::fmt;

use super::currency::Currency;
use super::error::CurrencyError;

/// An ordered currency pair, convention BASE/QUOTE: one unit of BASE is
/// worth `rate` units of QUOTE.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CurrencyPair {
    base: Currency,
    quote: Currency,
}

impl CurrencyPair {
    /// Creates a new currency pair.
    ///
    /// # Errors
    ///
    /// Returns `CurrencyError::SameCurrency` if base and quote coincide.
    ///
    /// # Examples
    ///
    /// ```
    /// use trs_core::types::{Currency, CurrencyPair};
    ///
    /// assert!(CurrencyPair::new(Currency::EUR, Currency::USD).is_ok());
    /// assert!(CurrencyPair::new(Currency::USD, Currency::USD).is_err());
    /// ```
    pub fn new(base: Currency, quote: Currency) -> Result<Self, CurrencyError> {
        if base == quote {
            return Err(CurrencyError::SameCurrency(base.code().to_string()));
        }
        Ok(Self { base, quote })
    }

    /// Returns the base currency.
    #[inline]
    pub fn base(&self) -> Currency {
        self.base
    }

    /// Returns the quote currency.
    #[inline]
    pub fn quote(&self) -> Currency {
        self.quote
    }

    /// Returns the pair with base and quote swapped.
    #[inline]
    pub fn invert(&self) -> Self {
        Self {
            base: self.quote,
            quote: self.base,
        }
    }
}

impl fmt::Display for CurrencyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.base.code(), self.quote.code())
    }
}
