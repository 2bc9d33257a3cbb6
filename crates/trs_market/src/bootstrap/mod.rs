//! Curve bootstrapping: sequential calibration of pillar curves from
//! quote sheets.
//!
//! Each bootstrapper processes its sheet's instruments in increasing
//! maturity order. Every instrument determines exactly one new pillar:
//! either by closed-form inversion of its quote (zero-coupon, deposit,
//! repo, dividend) or by a 1-D root-find when the quote's payoff spans
//! several unsolved dates (par swaps). Ties in maturity keep input order
//! and the later instrument's pillar value overwrites the earlier one, so
//! the later-added quote wins.

mod carry;
mod discount;
mod forward;
mod fx;

pub use carry::CarryBootstrap;
pub use discount::DiscountBootstrap;
pub use forward::ForwardBootstrap;
pub use fx::FxForwardBootstrap;

use std::collections::BTreeMap;

use crate::error::CalibrationError;
use crate::quotes::{DataQuoteSheet, QuoteInstrument, QuoteKind};
use trs_core::curves::{Interpolation, PillarCurve};

/// Calibrates a curve of type `C` from a quote sheet.
///
/// Implementations are stateless strategies: a market container holds one
/// per key and re-invokes it whenever the sheet (or a bump of it) changes.
pub trait Bootstrap<C>: Send + Sync {
    /// Calibrates a curve from quotes of one kind.
    fn bootstrap_kind(&self, sheet: &DataQuoteSheet, kind: QuoteKind)
        -> Result<C, CalibrationError>;

    /// Calibrates from mid quotes, the canonical side.
    fn bootstrap(&self, sheet: &DataQuoteSheet) -> Result<C, CalibrationError> {
        self.bootstrap_kind(sheet, QuoteKind::Mid)
    }

    /// Calibrates one independent curve per quote kind present in the
    /// sheet.
    fn bootstrap_all(
        &self,
        sheet: &DataQuoteSheet,
    ) -> Result<BTreeMap<QuoteKind, C>, CalibrationError> {
        let kinds = sheet.quoted_kinds();
        if kinds.is_empty() {
            return Err(CalibrationError::EmptySheet);
        }
        let mut curves = BTreeMap::new();
        for kind in kinds {
            curves.insert(kind, self.bootstrap_kind(sheet, kind)?);
        }
        Ok(curves)
    }
}

/// Partially solved pillars of a curve under construction.
///
/// Holds (time, continuously compounded zero rate) pairs in increasing
/// time order and evaluates the partial discount function, optionally with
/// a trial pillar appended, so a root-find can interpolate intermediate
/// cash-flow dates against the candidate.
#[derive(Debug, Clone, Default)]
pub(crate) struct PillarSet {
    times: Vec<f64>,
    rates: Vec<f64>,
    labels: Vec<String>,
}

impl PillarSet {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn len(&self) -> usize {
        self.times.len()
    }

    pub(crate) fn last_time(&self) -> Option<f64> {
        self.times.last().copied()
    }

    /// Adds a pillar. An equal time replaces the previous pillar (the
    /// later-added instrument wins); an earlier time is a caller bug since
    /// instruments arrive maturity-sorted.
    pub(crate) fn push(&mut self, t: f64, rate: f64, label: String) {
        if let Some(&last) = self.times.last() {
            if t == last {
                *self.rates.last_mut().unwrap() = rate;
                *self.labels.last_mut().unwrap() = label;
                return;
            }
            debug_assert!(t > last, "pillars must arrive in maturity order");
        }
        self.times.push(t);
        self.rates.push(rate);
        self.labels.push(label);
    }

    /// Log discount factor of the partial curve at `t >= 0`.
    ///
    /// Piecewise linear in log discount space between solved pillars;
    /// before the first pillar the segment runs through the origin, beyond
    /// the last pillar the terminal zero rate extends flat.
    pub(crate) fn log_df(&self, t: f64) -> f64 {
        log_df_over(&self.times, &self.rates, t)
    }

    /// Log discount factor with a trial pillar `(cand_t, cand_rate)`
    /// appended past the solved pillars.
    pub(crate) fn log_df_with_candidate(&self, cand_t: f64, cand_rate: f64, t: f64) -> f64 {
        if t <= self.last_time().unwrap_or(0.0) {
            return self.log_df(t);
        }
        if t >= cand_t {
            return -cand_rate * t;
        }
        // Between the last solved pillar and the candidate.
        let (t0, l0) = match self.last_time() {
            Some(last) => (last, self.log_df(last)),
            None => (0.0, 0.0),
        };
        let l1 = -cand_rate * cand_t;
        let w = (t - t0) / (cand_t - t0);
        l0 + w * (l1 - l0)
    }

    /// Verifies positive, monotone non-increasing discount factors and
    /// converts into a [`PillarCurve`].
    pub(crate) fn into_curve(
        self,
        interpolation: Interpolation,
    ) -> Result<PillarCurve<f64>, CalibrationError> {
        let mut prev_df = 1.0;
        for i in 0..self.times.len() {
            let df = (-self.rates[i] * self.times[i]).exp();
            if !df.is_finite() || df <= 0.0 {
                return Err(CalibrationError::BootstrapFailure {
                    pillar: self.labels[i].clone(),
                    reason: format!("non-positive discount factor {df}"),
                });
            }
            if df > prev_df + 1e-12 {
                return Err(CalibrationError::BootstrapFailure {
                    pillar: self.labels[i].clone(),
                    reason: "non-monotonic discount factor".to_string(),
                });
            }
            prev_df = df;
        }
        Ok(PillarCurve::new(self.times, self.rates, interpolation)?)
    }

    /// Converts into a rate-valued [`PillarCurve`] without the discount
    /// monotonicity check (carry curves may slope either way).
    pub(crate) fn into_rate_curve(
        self,
        interpolation: Interpolation,
    ) -> Result<PillarCurve<f64>, CalibrationError> {
        Ok(PillarCurve::new(self.times, self.rates, interpolation)?)
    }
}

fn log_df_over(times: &[f64], rates: &[f64], t: f64) -> f64 {
    if times.is_empty() || t <= 0.0 {
        return 0.0;
    }
    if t <= times[0] {
        return -rates[0] * t;
    }
    let n = times.len();
    if t >= times[n - 1] {
        return -rates[n - 1] * t;
    }
    let idx = times.iter().position(|&ti| ti >= t).unwrap();
    let (t0, t1) = (times[idx - 1], times[idx]);
    let (l0, l1) = (-rates[idx - 1] * t0, -rates[idx] * t1);
    let w = (t - t0) / (t1 - t0);
    l0 + w * (l1 - l0)
}

/// Sorts instrument references by maturity, keeping input order for ties.
pub(crate) fn maturity_sorted<'a>(
    instruments: impl Iterator<Item = &'a QuoteInstrument>,
) -> Vec<&'a QuoteInstrument> {
    let mut sorted: Vec<&QuoteInstrument> = instruments.collect();
    // Stable sort: equal maturities keep input order, so the later-added
    // instrument overwrites the pillar.
    sorted.sort_by_key(|i| i.maturity());
    sorted
}

/// Fetches the quote of `kind` or fails naming the instrument.
pub(crate) fn quote_or_err(
    instrument: &QuoteInstrument,
    kind: QuoteKind,
) -> Result<f64, CalibrationError> {
    instrument
        .quote(kind)
        .ok_or_else(|| CalibrationError::MissingQuote {
            kind,
            instrument: instrument.label().to_string(),
        })
}

/// Pillar label used in failure reporting: "label @ maturity".
pub(crate) fn pillar_label(instrument: &QuoteInstrument) -> String {
    format!("{} @ {}", instrument.label(), instrument.maturity())
}
