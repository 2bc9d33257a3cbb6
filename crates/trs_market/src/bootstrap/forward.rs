//! Projection (forward) curve bootstrapper: deposits, futures and swaps.

use tracing::debug;

use trs_core::conventions::MarketConventions;
use trs_core::curves::PillarCurve;
use trs_core::math::solvers::BrentSolver;
use trs_core::types::Date;

use super::discount::swap_accruals;
use super::{maturity_sorted, pillar_label, quote_or_err, Bootstrap, PillarSet};
use crate::error::CalibrationError;
use crate::quotes::{DataQuoteSheet, InstrumentFamily, InstrumentKind, QuoteInstrument, QuoteKind};

/// Bootstraps a projection curve from cash deposits, rate futures and par
/// swaps.
///
/// Deposits invert in closed form; a future pins the forward rate over the
/// period from the previously solved pillar to its maturity; par swaps
/// root-find as in the discount bootstrap. The short end is expected to
/// come from deposits, the middle from futures and the long end from
/// swaps, but any maturity-ordered mixture calibrates.
#[derive(Debug, Clone)]
pub struct ForwardBootstrap {
    conventions: MarketConventions,
}

impl ForwardBootstrap {
    /// Creates a projection bootstrapper with the given conventions.
    pub fn new(conventions: MarketConventions) -> Self {
        Self { conventions }
    }

    fn pillar_time(&self, as_of: Date, instrument: &QuoteInstrument) -> Result<f64, CalibrationError> {
        let t = self
            .conventions
            .discount_day_count
            .year_fraction(as_of, instrument.maturity());
        if t <= 0.0 {
            return Err(CalibrationError::BootstrapFailure {
                pillar: pillar_label(instrument),
                reason: "maturity at or before the as-of date".to_string(),
            });
        }
        Ok(t)
    }
}

impl Bootstrap<PillarCurve<f64>> for ForwardBootstrap {
    fn bootstrap_kind(
        &self,
        sheet: &DataQuoteSheet,
        kind: QuoteKind,
    ) -> Result<PillarCurve<f64>, CalibrationError> {
        let instruments: Vec<&QuoteInstrument> = maturity_sorted(
            sheet.instruments().iter().filter(|i| {
                matches!(
                    i.kind().family(),
                    InstrumentFamily::Deposit | InstrumentFamily::Future | InstrumentFamily::ParSwap
                )
            }),
        );
        if instruments.is_empty() {
            return Err(CalibrationError::EmptySheet);
        }

        let as_of = sheet.as_of();
        let mut pillars = PillarSet::new();
        for instrument in instruments {
            let quote = quote_or_err(instrument, kind)?;
            let t = self.pillar_time(as_of, instrument)?;
            let rate = match instrument.kind() {
                InstrumentKind::Deposit => {
                    let tau = instrument
                        .day_count()
                        .year_fraction(as_of, instrument.maturity());
                    let df = 1.0 / (1.0 + quote * tau);
                    if df <= 0.0 {
                        return Err(CalibrationError::BootstrapFailure {
                            pillar: pillar_label(instrument),
                            reason: format!("deposit quote {quote} implies non-positive growth"),
                        });
                    }
                    -df.ln() / t
                }
                InstrumentKind::Future => {
                    // Price 100 * (1 - f): simple forward over the period
                    // from the last solved pillar to this maturity.
                    let forward = (100.0 - quote) / 100.0;
                    let t_prev = pillars.last_time().unwrap_or(0.0);
                    if t <= t_prev {
                        return Err(CalibrationError::BootstrapFailure {
                            pillar: pillar_label(instrument),
                            reason: "future matures before the previous pillar".to_string(),
                        });
                    }
                    let log_df_prev = pillars.log_df(t_prev);
                    let log_df = log_df_prev - (1.0 + forward * (t - t_prev)).ln();
                    -log_df / t
                }
                InstrumentKind::ParSwap { fixed_frequency } => {
                    let schedule =
                        swap_accruals(as_of, instrument, *fixed_frequency, &self.conventions)?;
                    let times: Vec<f64> = schedule
                        .iter()
                        .map(|(date, _)| {
                            self.conventions
                                .discount_day_count
                                .year_fraction(as_of, *date)
                        })
                        .collect();
                    let accruals: Vec<f64> = schedule.iter().map(|(_, a)| *a).collect();

                    let residual = |rate: f64| {
                        let mut annuity = 0.0;
                        for (&t_i, &alpha) in times.iter().zip(accruals.iter()) {
                            annuity += alpha * pillars.log_df_with_candidate(t, rate, t_i).exp();
                        }
                        let df_n = pillars.log_df_with_candidate(t, rate, t).exp();
                        quote * annuity + df_n - 1.0
                    };

                    let solver = BrentSolver::new(self.conventions.solver_config());
                    solver.find_root(residual, -0.5, 1.0).map_err(|e| {
                        CalibrationError::BootstrapFailure {
                            pillar: pillar_label(instrument),
                            reason: e.to_string(),
                        }
                    })?
                }
                _ => unreachable!("filtered to projection families"),
            };
            pillars.push(t, rate, pillar_label(instrument));
        }

        debug!(pillars = pillars.len(), ?kind, "forward bootstrap complete");
        pillars.into_curve(self.conventions.interpolation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use trs_core::curves::YieldCurve;

    fn date(y: i32, m: u32, d: u32) -> Date {
        Date::from_ymd(y, m, d).unwrap()
    }

    fn bootstrap() -> ForwardBootstrap {
        ForwardBootstrap::new(MarketConventions::default())
    }

    #[test]
    fn test_deposit_reprices() {
        let as_of = date(2020, 6, 15);
        let maturity = date(2020, 12, 15);
        let mut sheet = DataQuoteSheet::new(as_of);
        sheet.add_instrument(
            QuoteInstrument::new("DEPO.6M", InstrumentKind::Deposit, maturity)
                .add_quote(QuoteKind::Mid, 0.01)
                .unwrap(),
        );

        let curve = bootstrap().bootstrap(&sheet).unwrap();
        let conventions = MarketConventions::default();
        let t = conventions.discount_day_count.year_fraction(as_of, maturity);
        let tau = conventions.discount_day_count.year_fraction(as_of, maturity);
        assert_relative_eq!(
            curve.discount_factor(t).unwrap(),
            1.0 / (1.0 + 0.01 * tau),
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_future_extends_deposit_strip() {
        let as_of = date(2020, 6, 15);
        let mut sheet = DataQuoteSheet::new(as_of);
        sheet.add_instrument(
            QuoteInstrument::new("DEPO.3M", InstrumentKind::Deposit, date(2020, 9, 15))
                .add_quote(QuoteKind::Mid, 0.008)
                .unwrap(),
        );
        sheet.add_instrument(
            QuoteInstrument::new("FUT.U0", InstrumentKind::Future, date(2020, 12, 15))
                .add_quote(QuoteKind::Mid, 99.0) // 1% forward
                .unwrap(),
        );

        let curve = bootstrap().bootstrap(&sheet).unwrap();
        let conventions = MarketConventions::default();
        let t1 = conventions
            .discount_day_count
            .year_fraction(as_of, date(2020, 9, 15));
        let t2 = conventions
            .discount_day_count
            .year_fraction(as_of, date(2020, 12, 15));

        // The implied simple forward over [t1, t2] matches the future.
        let df1 = curve.discount_factor(t1).unwrap();
        let df2 = curve.discount_factor(t2).unwrap();
        let simple_forward = (df1 / df2 - 1.0) / (t2 - t1);
        assert_relative_eq!(simple_forward, 0.01, epsilon = 1e-10);
    }

    #[test]
    fn test_mixed_strip_is_monotone() {
        let as_of = date(2020, 6, 15);
        let mut sheet = DataQuoteSheet::new(as_of);
        sheet.add_instrument(
            QuoteInstrument::new("DEPO.3M", InstrumentKind::Deposit, date(2020, 9, 15))
                .add_quote(QuoteKind::Mid, 0.006)
                .unwrap(),
        );
        sheet.add_instrument(
            QuoteInstrument::new("FUT.U0", InstrumentKind::Future, date(2020, 12, 15))
                .add_quote(QuoteKind::Mid, 99.2)
                .unwrap(),
        );
        sheet.add_instrument(
            QuoteInstrument::new(
                "SWAP.2Y",
                InstrumentKind::ParSwap { fixed_frequency: 2 },
                date(2022, 6, 15),
            )
            .add_quote(QuoteKind::Mid, 0.011)
            .unwrap(),
        );

        let curve = bootstrap().bootstrap(&sheet).unwrap();
        let mut prev = 1.0;
        for t in [0.25, 0.5, 1.0, 1.5, 2.0] {
            let df = curve.discount_factor(t).unwrap();
            assert!(df < prev);
            prev = df;
        }
    }
}
