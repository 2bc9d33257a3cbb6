//! Fx forward curve bootstrapper: composite over a discount dependency.

use tracing::debug;

use trs_core::curves::{FxForwardCurve, YieldCurve};

use super::{maturity_sorted, pillar_label, quote_or_err, Bootstrap, PillarSet};
use crate::error::CalibrationError;
use crate::quotes::{DataQuoteSheet, InstrumentFamily, QuoteInstrument, QuoteKind};
use crate::bootstrap::DiscountBootstrap;

/// Bootstraps an [`FxForwardCurve`] from outright forward quotes.
///
/// A composite bootstrapper: the domestic discount curve comes from an
/// injected dependency [`DiscountBootstrap`] run against the same sheet
/// (the caller merges the discount instruments into the fx sheet), then
/// each outright forward inverts through covered interest parity to a
/// foreign discount pillar:
///
/// ```text
/// Df_foreign(t) = forward(t) * Df_domestic(t) / spot
/// ```
///
/// The dependency is explicit constructor state, never a global lookup.
#[derive(Debug, Clone)]
pub struct FxForwardBootstrap {
    spot: f64,
    dependency: DiscountBootstrap,
}

impl FxForwardBootstrap {
    /// Creates an fx bootstrapper from the spot rate and the discount
    /// dependency.
    pub fn new(spot: f64, dependency: DiscountBootstrap) -> Self {
        Self { spot, dependency }
    }

    /// Returns the spot rate.
    pub fn spot(&self) -> f64 {
        self.spot
    }
}

impl Bootstrap<FxForwardCurve<f64>> for FxForwardBootstrap {
    fn bootstrap_kind(
        &self,
        sheet: &DataQuoteSheet,
        kind: QuoteKind,
    ) -> Result<FxForwardCurve<f64>, CalibrationError> {
        // Delegate the domestic leg to the dependency bootstrapper.
        let domestic = self.dependency.bootstrap_kind(sheet, kind)?;

        let forwards: Vec<&QuoteInstrument> =
            maturity_sorted(sheet.instruments_of(InstrumentFamily::FxForward));
        if forwards.is_empty() {
            return Err(CalibrationError::EmptySheet);
        }

        let as_of = sheet.as_of();
        let conventions = self.dependency.conventions();
        let mut pillars = PillarSet::new();
        for instrument in forwards {
            let forward = quote_or_err(instrument, kind)?;
            let t = conventions
                .discount_day_count
                .year_fraction(as_of, instrument.maturity());
            if t <= 0.0 {
                return Err(CalibrationError::BootstrapFailure {
                    pillar: pillar_label(instrument),
                    reason: "maturity at or before the as-of date".to_string(),
                });
            }
            if forward <= 0.0 {
                return Err(CalibrationError::BootstrapFailure {
                    pillar: pillar_label(instrument),
                    reason: format!("non-positive outright forward {forward}"),
                });
            }
            // Covered interest parity, solved for the foreign leg.
            let df_domestic = domestic.discount_factor(t)?;
            let df_foreign = forward * df_domestic / self.spot;
            pillars.push(t, -df_foreign.ln() / t, pillar_label(instrument));
        }

        debug!(pillars = pillars.len(), ?kind, "fx forward bootstrap complete");
        let foreign = pillars.into_curve(conventions.interpolation)?;
        Ok(FxForwardCurve::new(self.spot, domestic, foreign))
    }
}
