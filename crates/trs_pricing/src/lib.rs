//! # trs_pricing: Pricing Engines
//!
//! Prices the Total Return Swap family against a curve context, by Monte
//! Carlo simulation or by direct formula:
//! - Seeded, reproducible random number generation (`rng`)
//! - The Monte Carlo engine: correlated basket paths, reset-aware leg
//!   evaluation, batched parallel reduction, cooperative cancellation,
//!   standard error and fair-spread solving (`mc`)
//! - The deterministic forward-based pricer used stand-alone and as the
//!   zero-volatility reference (`deterministic`)
//! - The curve view a pricing run reads from (`context`)
//!
//! ## Reproducibility
//!
//! Every batch derives its random stream from (seed, batch index), so a
//! run's result is bitwise identical for a given seed regardless of how
//! rayon schedules the batches across threads.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod context;
pub mod deterministic;
pub mod error;
pub mod mc;
pub mod rng;
