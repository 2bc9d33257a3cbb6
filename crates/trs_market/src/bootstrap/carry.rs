//! Carry curve bootstrappers: repo rates and dividend yields.

use tracing::debug;

use trs_core::conventions::MarketConventions;
use trs_core::curves::PillarCurve;

use super::{maturity_sorted, pillar_label, quote_or_err, Bootstrap, PillarSet};
use crate::error::CalibrationError;
use crate::quotes::{DataQuoteSheet, InstrumentFamily, QuoteInstrument, QuoteKind};

/// Bootstraps a carry curve (repo or dividend) from rate quotes.
///
/// Each quote is already a continuously compounded rate at its maturity,
/// so every pillar inverts in closed form. The resulting [`PillarCurve`]
/// is queried through [`PillarCurve::rate_at`]; carry rates may slope
/// either way, so no discount monotonicity is enforced.
///
/// # Example
///
/// ```
/// use trs_core::conventions::MarketConventions;
/// use trs_core::types::Date;
/// use trs_market::bootstrap::{Bootstrap, CarryBootstrap};
/// use trs_market::quotes::{DataQuoteSheet, InstrumentKind, QuoteInstrument, QuoteKind};
///
/// let as_of = Date::from_ymd(2020, 6, 15).unwrap();
/// let mut sheet = DataQuoteSheet::new(as_of);
/// sheet.add_instrument(
///     QuoteInstrument::new("EQ.REPO.1Y", InstrumentKind::RepoRate,
///         Date::from_ymd(2021, 6, 15).unwrap())
///         .add_quote(QuoteKind::Mid, 0.002)
///         .unwrap(),
/// );
///
/// let curve = CarryBootstrap::repo(MarketConventions::default())
///     .bootstrap(&sheet)
///     .unwrap();
/// assert!((curve.rate_at(1.0).unwrap() - 0.002).abs() < 1e-12);
/// ```
#[derive(Debug, Clone)]
pub struct CarryBootstrap {
    family: InstrumentFamily,
    conventions: MarketConventions,
}

impl CarryBootstrap {
    /// Creates a repo-rate bootstrapper.
    pub fn repo(conventions: MarketConventions) -> Self {
        Self {
            family: InstrumentFamily::RepoRate,
            conventions,
        }
    }

    /// Creates a dividend-yield bootstrapper.
    pub fn dividend(conventions: MarketConventions) -> Self {
        Self {
            family: InstrumentFamily::DividendYield,
            conventions,
        }
    }

    /// Returns the instrument family this bootstrapper consumes.
    pub fn family(&self) -> InstrumentFamily {
        self.family
    }
}

impl Bootstrap<PillarCurve<f64>> for CarryBootstrap {
    fn bootstrap_kind(
        &self,
        sheet: &DataQuoteSheet,
        kind: QuoteKind,
    ) -> Result<PillarCurve<f64>, CalibrationError> {
        let instruments: Vec<&QuoteInstrument> =
            maturity_sorted(sheet.instruments_of(self.family));
        if instruments.is_empty() {
            return Err(CalibrationError::EmptySheet);
        }

        let as_of = sheet.as_of();
        let mut pillars = PillarSet::new();
        for instrument in instruments {
            let quote = quote_or_err(instrument, kind)?;
            let t = self
                .conventions
                .carry_day_count
                .year_fraction(as_of, instrument.maturity());
            if t <= 0.0 {
                return Err(CalibrationError::BootstrapFailure {
                    pillar: pillar_label(instrument),
                    reason: "maturity at or before the as-of date".to_string(),
                });
            }
            pillars.push(t, quote, pillar_label(instrument));
        }

        debug!(
            pillars = pillars.len(),
            family = ?self.family,
            "carry bootstrap complete"
        );
        pillars.into_rate_curve(self.conventions.interpolation)
    }
}
