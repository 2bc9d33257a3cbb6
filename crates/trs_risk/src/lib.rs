//! # trs_risk: Scenarios and Pricing Orchestration
//!
//! The top layer of the workspace:
//! - Greek ladders and flat sensitivity scenarios built from bumped quote
//!   sheets (`scenarios`)
//! - The pricing orchestration loop: books of trades priced across
//!   labelled (context, model, setting) combinations into a result table
//!   with per-cell failure isolation (`orchestration`)

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod error;
pub mod orchestration;
pub mod scenarios;
