//! # trs_market: Market Data Layer
//!
//! Quote sheets, scenario bumps, curve bootstrapping and the generic
//! keyed market container.
//!
//! ## Data flow
//!
//! ```text
//! quotes -> DataQuoteSheet -> Bootstrap -> curve -> Market
//!                 |                                   |
//!              BumpSpec  ------------------->  resolve_bumped
//! ```
//!
//! A [`market::Market`] maps an instrument identity key (currency,
//! reference rate, ticker, currency pair, basket) to its calibration
//! inputs and lazily bootstraps curves on demand, memoizing per sheet
//! version with single-flight semantics. Bumps perturb the quote sheet,
//! never the bootstrapped curve.
//!
//! ## Example
//!
//! ```
//! use trs_core::conventions::MarketConventions;
//! use trs_core::curves::YieldCurve;
//! use trs_core::types::{Currency, Date};
//! use trs_market::bootstrap::DiscountBootstrap;
//! use trs_market::market::Market;
//! use trs_market::quotes::{Compounding, DataQuoteSheet, InstrumentKind, QuoteInstrument, QuoteKind};
//!
//! let as_of = Date::from_ymd(2020, 6, 15).unwrap();
//! let mut sheet = DataQuoteSheet::new(as_of);
//! sheet.add_instrument(
//!     QuoteInstrument::new(
//!         "USD.ZC.1Y",
//!         InstrumentKind::ZeroCoupon { compounding: Compounding::Continuous },
//!         Date::from_ymd(2021, 6, 15).unwrap(),
//!     )
//!     .add_quote(QuoteKind::Mid, 0.005)
//!     .unwrap(),
//! );
//!
//! let market = Market::new();
//! market.add_sheet(
//!     Currency::USD,
//!     sheet,
//!     DiscountBootstrap::new(MarketConventions::default()),
//! );
//! let curve = market.resolve(&Currency::USD).unwrap();
//! assert!(curve.discount_factor(1.0).unwrap() < 1.0);
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod bootstrap;
pub mod bump;
pub mod error;
pub mod market;
pub mod quotes;
