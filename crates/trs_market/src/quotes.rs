//! Quote records, quote-carrying instruments and dated quote sheets.
//!
//! A [`QuoteInstrument`] identifies a market observable and carries up to
//! one quote per [`QuoteKind`]. A [`DataQuoteSheet`] groups instruments
//! under a single as-of date and supports merging another sheet's
//! instruments (used to inject discount-curve dependencies into an fx
//! sheet). Quotes are immutable once added; scenario perturbations build
//! new sheets rather than mutating existing ones.

use std::collections::BTreeMap;

use trs_core::types::{Date, DayCountConvention, Tenor};

use crate::error::QuoteError;

/// Quote side. An explicit enum key: mid, bid or ask.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum QuoteKind {
    /// Mid quote: the canonical side for calibration.
    Mid,
    /// Bid quote.
    Bid,
    /// Ask quote.
    Ask,
}

/// Rate compounding convention for zero-coupon quotes.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Compounding {
    /// Simple interest: `Df = 1 / (1 + r * tau)`.
    Simple,
    /// Annual compounding: `Df = (1 + r)^-t`.
    Annual,
    /// Continuous compounding: `Df = exp(-r * t)`.
    Continuous,
}

/// Calibration role of an instrument.
///
/// The taxonomy is deliberately small: bootstrappers only need to know how
/// a quote maps onto a pillar, everything else about the observable stays
/// opaque.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum InstrumentKind {
    /// Zero-coupon rate with an explicit compounding convention.
    ZeroCoupon {
        /// Compounding of the quoted rate.
        compounding: Compounding,
    },
    /// Cash deposit quoted as a simple rate.
    Deposit,
    /// Interest rate future quoted as `100 * (1 - forward rate)`.
    Future,
    /// Par swap rate spanning several coupon dates.
    ParSwap {
        /// Fixed-leg payments per year.
        fixed_frequency: u32,
    },
    /// Outright fx forward.
    FxForward,
    /// Repo rate for an underlying at a maturity.
    RepoRate,
    /// Continuously compounded dividend yield estimate.
    DividendYield,
}

/// Coarse family tag used for filtered sheet views.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum InstrumentFamily {
    /// Zero-coupon rates.
    ZeroCoupon,
    /// Cash deposits.
    Deposit,
    /// Rate futures.
    Future,
    /// Par swaps.
    ParSwap,
    /// Fx forwards.
    FxForward,
    /// Repo rates.
    RepoRate,
    /// Dividend yields.
    DividendYield,
}

impl InstrumentKind {
    /// Returns the family tag for filtered views.
    pub fn family(&self) -> InstrumentFamily {
        match self {
            InstrumentKind::ZeroCoupon { .. } => InstrumentFamily::ZeroCoupon,
            InstrumentKind::Deposit => InstrumentFamily::Deposit,
            InstrumentKind::Future => InstrumentFamily::Future,
            InstrumentKind::ParSwap { .. } => InstrumentFamily::ParSwap,
            InstrumentKind::FxForward => InstrumentFamily::FxForward,
            InstrumentKind::RepoRate => InstrumentFamily::RepoRate,
            InstrumentKind::DividendYield => InstrumentFamily::DividendYield,
        }
    }
}

/// Identity of an instrument within a sheet: label plus maturity.
///
/// Together with the sheet's as-of date this uniquely determines the
/// instrument's slot.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct InstrumentId {
    /// Human-readable label (e.g. "USD.ZC.1Y").
    pub label: String,
    /// Maturity date of the observable.
    pub maturity: Date,
}

/// A market observable carrying zero or more quotes, one per kind.
///
/// # Example
///
/// ```
/// use trs_core::types::Date;
/// use trs_market::quotes::{Compounding, InstrumentKind, QuoteInstrument, QuoteKind};
///
/// let instrument = QuoteInstrument::new(
///     "USD.ZC.1Y",
///     InstrumentKind::ZeroCoupon { compounding: Compounding::Continuous },
///     Date::from_ymd(2021, 6, 15).unwrap(),
/// )
/// .add_quote(QuoteKind::Mid, 0.005)
/// .unwrap();
///
/// assert_eq!(instrument.quote(QuoteKind::Mid), Some(0.005));
/// assert_eq!(instrument.quote(QuoteKind::Bid), None);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct QuoteInstrument {
    label: String,
    kind: InstrumentKind,
    maturity: Date,
    day_count: DayCountConvention,
    tenor: Option<Tenor>,
    quotes: BTreeMap<QuoteKind, f64>,
}

impl QuoteInstrument {
    /// Creates an instrument with no quotes, default day count and no tenor.
    pub fn new(label: impl Into<String>, kind: InstrumentKind, maturity: Date) -> Self {
        Self {
            label: label.into(),
            kind,
            maturity,
            day_count: DayCountConvention::default(),
            tenor: None,
            quotes: BTreeMap::new(),
        }
    }

    /// Sets the accrual day count (builder style).
    pub fn with_day_count(mut self, day_count: DayCountConvention) -> Self {
        self.day_count = day_count;
        self
    }

    /// Sets the market tenor (builder style).
    pub fn with_tenor(mut self, tenor: Tenor) -> Self {
        self.tenor = Some(tenor);
        self
    }

    /// Adds a quote for one kind, returning the instrument.
    ///
    /// # Errors
    ///
    /// `QuoteError::DuplicateQuoteKind` if the kind was already added.
    pub fn add_quote(mut self, kind: QuoteKind, value: f64) -> Result<Self, QuoteError> {
        if self.quotes.contains_key(&kind) {
            return Err(QuoteError::DuplicateQuoteKind {
                kind,
                instrument: self.label.clone(),
            });
        }
        self.quotes.insert(kind, value);
        Ok(self)
    }

    /// Returns the quote of the requested kind, if present.
    pub fn quote(&self, kind: QuoteKind) -> Option<f64> {
        self.quotes.get(&kind).copied()
    }

    /// Returns the canonical mid quote, if present.
    pub fn mid(&self) -> Option<f64> {
        self.quote(QuoteKind::Mid)
    }

    /// Returns the kinds quoted on this instrument.
    pub fn quoted_kinds(&self) -> impl Iterator<Item = QuoteKind> + '_ {
        self.quotes.keys().copied()
    }

    /// Returns the instrument label.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Returns the calibration role.
    pub fn kind(&self) -> &InstrumentKind {
        &self.kind
    }

    /// Returns the maturity date.
    pub fn maturity(&self) -> Date {
        self.maturity
    }

    /// Returns the accrual day count.
    pub fn day_count(&self) -> DayCountConvention {
        self.day_count
    }

    /// Returns the market tenor, if set.
    pub fn tenor(&self) -> Option<Tenor> {
        self.tenor
    }

    /// Returns the identity (label, maturity) of this instrument.
    pub fn id(&self) -> InstrumentId {
        InstrumentId {
            label: self.label.clone(),
            maturity: self.maturity,
        }
    }

    /// Returns a copy with the quote of `kind` replaced by `value`.
    ///
    /// Used by the bump engine; the original instrument is untouched.
    pub(crate) fn with_shifted_quote(&self, kind: QuoteKind, value: f64) -> Self {
        let mut shifted = self.clone();
        shifted.quotes.insert(kind, value);
        shifted
    }
}

/// Overlap resolution when merging sheets.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum MergePolicy {
    /// The incoming instrument replaces the existing one.
    ///
    /// Dependency-injection merges (discount quotes into an fx sheet)
    /// expect the incoming instruments to win, so this is the default.
    #[default]
    Overwrite,
    /// Overlapping identities fail the merge.
    Reject,
}

/// An as-of date plus an ordered collection of instruments.
///
/// Instrument order is preserved: it is the deterministic tie-break for
/// equal-maturity pillars during bootstrap.
///
/// # Example
///
/// ```
/// use trs_core::types::Date;
/// use trs_market::quotes::{DataQuoteSheet, InstrumentKind, MergePolicy, QuoteInstrument, QuoteKind};
///
/// let as_of = Date::from_ymd(2020, 6, 15).unwrap();
/// let mut sheet = DataQuoteSheet::new(as_of);
/// sheet.add_instrument(
///     QuoteInstrument::new("EQ.REPO.1Y", InstrumentKind::RepoRate,
///         Date::from_ymd(2021, 6, 15).unwrap())
///         .add_quote(QuoteKind::Mid, 0.002)
///         .unwrap(),
/// );
/// assert_eq!(sheet.len(), 1);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct DataQuoteSheet {
    as_of: Date,
    instruments: Vec<QuoteInstrument>,
}

impl DataQuoteSheet {
    /// Creates an empty sheet for the given as-of date.
    pub fn new(as_of: Date) -> Self {
        Self {
            as_of,
            instruments: Vec::new(),
        }
    }

    /// Returns the as-of date.
    pub fn as_of(&self) -> Date {
        self.as_of
    }

    /// Returns the number of instruments.
    pub fn len(&self) -> usize {
        self.instruments.len()
    }

    /// Returns true if the sheet carries no instruments.
    pub fn is_empty(&self) -> bool {
        self.instruments.is_empty()
    }

    /// Adds an instrument, replacing in place any existing instrument with
    /// the same identity.
    pub fn add_instrument(&mut self, instrument: QuoteInstrument) {
        let id = instrument.id();
        if let Some(existing) = self.instruments.iter_mut().find(|i| i.id() == id) {
            *existing = instrument;
        } else {
            self.instruments.push(instrument);
        }
    }

    /// Merges another sheet's instruments into this one.
    ///
    /// # Errors
    ///
    /// - `QuoteError::AsOfMismatch` when the as-of dates differ
    /// - `QuoteError::DuplicateInstrument` when an identity overlaps and
    ///   the policy is [`MergePolicy::Reject`]
    pub fn add_data(&mut self, other: &DataQuoteSheet, policy: MergePolicy) -> Result<(), QuoteError> {
        if self.as_of != other.as_of {
            return Err(QuoteError::AsOfMismatch {
                left: self.as_of.to_string(),
                right: other.as_of.to_string(),
            });
        }
        if policy == MergePolicy::Reject {
            for incoming in &other.instruments {
                if self.instruments.iter().any(|i| i.id() == incoming.id()) {
                    return Err(QuoteError::DuplicateInstrument {
                        instrument: incoming.label().to_string(),
                    });
                }
            }
        }
        for incoming in &other.instruments {
            self.add_instrument(incoming.clone());
        }
        Ok(())
    }

    /// Returns all instruments in input order.
    pub fn instruments(&self) -> &[QuoteInstrument] {
        &self.instruments
    }

    /// Returns a borrowing view of the instruments of one family.
    ///
    /// A filtered projection over the sheet, not a copy.
    pub fn instruments_of(
        &self,
        family: InstrumentFamily,
    ) -> impl Iterator<Item = &QuoteInstrument> + '_ {
        self.instruments
            .iter()
            .filter(move |i| i.kind().family() == family)
    }

    /// Returns the union of quote kinds present on any instrument.
    pub fn quoted_kinds(&self) -> Vec<QuoteKind> {
        let mut kinds: Vec<QuoteKind> = Vec::new();
        for instrument in &self.instruments {
            for kind in instrument.quoted_kinds() {
                if !kinds.contains(&kind) {
                    kinds.push(kind);
                }
            }
        }
        kinds.sort();
        kinds
    }

    /// Returns a copy of this sheet with instruments transformed by `f`.
    pub(crate) fn map_instruments<F>(&self, mut f: F) -> Self
    where
        F: FnMut(&QuoteInstrument) -> QuoteInstrument,
    {
        Self {
            as_of: self.as_of,
            instruments: self.instruments.iter().map(|i| f(i)).collect(),
        }
    }
}
