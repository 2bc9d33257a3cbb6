//! # trs_core: Foundation Layer for the TRS Pricing Workspace
//!
//! The bottom layer of the workspace, providing:
//! - Time types: `Date`, `Tenor`, `DayCountConvention` (`types::time`)
//! - Currency types: `Currency`, `CurrencyPair` (`types::currency`)
//! - Interpolators and 1-D root-find solvers (`math`)
//! - The curve abstraction: `YieldCurve`, `PillarCurve`, `FlatCurve`,
//!   `FxForwardCurve` (`curves`)
//! - Explicit market-convention configuration (`conventions`)
//!
//! ## Zero Dependency Principle
//!
//! This crate depends on no other `trs_*` crate, with minimal external
//! dependencies:
//! - num-traits: traits for generic numerical computation
//! - chrono: date arithmetic
//! - thiserror: structured error types
//! - serde: serialisation support (optional)
//!
//! ## Usage Examples
//!
//! ```rust
//! use trs_core::curves::{FlatCurve, YieldCurve};
//! use trs_core::types::{Currency, Date, DayCountConvention};
//!
//! let as_of = Date::from_ymd(2020, 6, 15).unwrap();
//! let maturity = Date::from_ymd(2021, 6, 15).unwrap();
//! let t = DayCountConvention::Act365Fixed.year_fraction(as_of, maturity);
//!
//! let curve = FlatCurve::new(0.005_f64);
//! let df = curve.discount_factor(t).unwrap();
//! assert!(df < 1.0 && df > 0.99);
//!
//! assert_eq!(Currency::USD.code(), "USD");
//! ```
//!
//! ## Feature Flags
//!
//! - `serde` (default): enable serialisation for dates, currencies,
//!   conventions and configuration

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod conventions;
pub mod curves;
pub mod math;
pub mod types;
