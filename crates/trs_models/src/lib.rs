//! # trs_models: Instruments and Stochastic Models
//!
//! The instrument and model layer of the workspace:
//! - Payment schedules (`schedules`)
//! - Weighted underlying baskets (`basket`)
//! - The Total Return Swap family: asset legs with price resets, funding
//!   legs with spread, books of trades (`trs`, `book`)
//! - Correlation matrices with Cholesky factorization (`correlation`)
//! - Correlated multi-asset geometric Brownian motion (`gbm`)
//!
//! Models expose their transition law as plain functions of state, drift
//! and correlated increments; path generation and payoff evaluation live
//! one layer up in `trs_pricing`.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod basket;
pub mod book;
pub mod correlation;
pub mod error;
pub mod gbm;
pub mod schedules;
pub mod trs;
