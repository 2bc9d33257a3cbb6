//! Core value types: dates, tenors, day counts, currencies and errors.

pub mod currency;
pub mod currency_pair;
pub mod error;
pub mod identifiers;
pub mod time;

pub use currency::Currency;
pub use currency_pair::CurrencyPair;
pub use error::{CurrencyError, DateError, InterpolationError, SolverError, TenorError};
pub use identifiers::{BasketId, ReferenceRate, Ticker};
pub use time::{Date, DayCountConvention, Tenor, TenorUnit};
