//! Discount curve bootstrapper: zero-coupon quotes and par swaps.

use tracing::debug;

use trs_core::conventions::MarketConventions;
use trs_core::curves::PillarCurve;
use trs_core::math::solvers::BrentSolver;
use trs_core::types::Date;

use super::{maturity_sorted, pillar_label, quote_or_err, Bootstrap, PillarSet};
use crate::error::CalibrationError;
use crate::quotes::{
    Compounding, DataQuoteSheet, InstrumentFamily, InstrumentKind, QuoteInstrument, QuoteKind,
};

/// Bootstraps a discount curve from zero-coupon and par-swap quotes.
///
/// Zero-coupon quotes invert in closed form to a pillar discount factor.
/// Par-swap quotes span several coupon dates: the new pillar is solved by
/// a Brent root-find against the pillars already bootstrapped, with
/// intermediate coupon dates interpolating the partial curve.
///
/// # Example
///
/// ```
/// use trs_core::conventions::MarketConventions;
/// use trs_core::curves::YieldCurve;
/// use trs_core::types::Date;
/// use trs_market::bootstrap::{Bootstrap, DiscountBootstrap};
/// use trs_market::quotes::{Compounding, DataQuoteSheet, InstrumentKind, QuoteInstrument, QuoteKind};
///
/// let as_of = Date::from_ymd(2020, 6, 15).unwrap();
/// let mut sheet = DataQuoteSheet::new(as_of);
/// sheet.add_instrument(
///     QuoteInstrument::new(
///         "USD.ZC.1Y",
///         InstrumentKind::ZeroCoupon { compounding: Compounding::Continuous },
///         Date::from_ymd(2021, 6, 15).unwrap(),
///     )
///     .add_quote(QuoteKind::Mid, 0.005)
///     .unwrap(),
/// );
///
/// let curve = DiscountBootstrap::new(MarketConventions::default())
///     .bootstrap(&sheet)
///     .unwrap();
/// let t = 365.0 / 365.0;
/// assert!((curve.discount_factor(t).unwrap() - (-0.005_f64).exp()).abs() < 1e-12);
/// ```
#[derive(Debug, Clone)]
pub struct DiscountBootstrap {
    conventions: MarketConventions,
}

impl DiscountBootstrap {
    /// Creates a discount bootstrapper with the given conventions.
    pub fn new(conventions: MarketConventions) -> Self {
        Self { conventions }
    }

    /// Returns the conventions in force.
    pub fn conventions(&self) -> &MarketConventions {
        &self.conventions
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

    fn zero_coupon_pillar(
        &self,
        as_of: Date,
        instrument: &QuoteInstrument,
        compounding: Compounding,
        quote: f64,
    ) -> Result<(f64, f64), CalibrationError> {
        let t = self.pillar_time(as_of, instrument)?;
        let df = match compounding {
            Compounding::Simple => {
                let tau = instrument
                    .day_count()
                    .year_fraction(as_of, instrument.maturity());
                1.0 / (1.0 + quote * tau)
            }
            Compounding::Annual => (1.0 + quote).powf(-t),
            Compounding::Continuous => (-quote * t).exp(),
        };
        if !df.is_finite() || df <= 0.0 {
            return Err(CalibrationError::BootstrapFailure {
                pillar: pillar_label(instrument),
                reason: format!("quote {quote} implies invalid discount factor {df}"),
            });
        }
        Ok((t, -df.ln() / t))
    }

    fn swap_pillar(
        &self,
        as_of: Date,
        instrument: &QuoteInstrument,
        fixed_frequency: u32,
        par_rate: f64,
        pillars: &PillarSet,
    ) -> Result<(f64, f64), CalibrationError> {
        let t_n = self.pillar_time(as_of, instrument)?;
        let schedule = swap_accruals(as_of, instrument, fixed_frequency, &self.conventions)?;

        // Coupon times in curve day count, accruals in swap day count.
        let times: Vec<f64> = schedule
            .iter()
            .map(|(date, _)| {
                self.conventions
                    .discount_day_count
                    .year_fraction(as_of, *date)
            })
            .collect();
        let accruals: Vec<f64> = schedule.iter().map(|(_, alpha)| *alpha).collect();

        let residual = |rate: f64| {
            let mut annuity = 0.0;
            for (&t_i, &alpha) in times.iter().zip(accruals.iter()) {
                annuity += alpha * pillars.log_df_with_candidate(t_n, rate, t_i).exp();
            }
            let df_n = pillars.log_df_with_candidate(t_n, rate, t_n).exp();
            par_rate * annuity + df_n - 1.0
        };

        let solver = BrentSolver::new(self.conventions.solver_config());
        let rate = solver
            .find_root(residual, -0.5, 1.0)
            .map_err(|e| CalibrationError::BootstrapFailure {
                pillar: pillar_label(instrument),
                reason: e.to_string(),
            })?;
        Ok((t_n, rate))
    }
}

impl Bootstrap<PillarCurve<f64>> for DiscountBootstrap {
    fn bootstrap_kind(
        &self,
        sheet: &DataQuoteSheet,
        kind: QuoteKind,
    ) -> Result<PillarCurve<f64>, CalibrationError> {
        let instruments: Vec<&QuoteInstrument> = maturity_sorted(
            sheet
                .instruments()
                .iter()
                .filter(|i| {
                    matches!(
                        i.kind().family(),
                        InstrumentFamily::ZeroCoupon | InstrumentFamily::ParSwap
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
            let (t, rate) = match instrument.kind() {
                InstrumentKind::ZeroCoupon { compounding } => {
                    self.zero_coupon_pillar(as_of, instrument, *compounding, quote)?
                }
                InstrumentKind::ParSwap { fixed_frequency } => {
                    self.swap_pillar(as_of, instrument, *fixed_frequency, quote, &pillars)?
                }
                _ => unreachable!("filtered to discount families"),
            };
            pillars.push(t, rate, pillar_label(instrument));
        }

        debug!(pillars = pillars.len(), ?kind, "discount bootstrap complete");
        pillars.into_curve(self.conventions.interpolation)
    }
}

/// Fixed-leg coupon dates and accrual fractions from the as-of date to the
/// swap maturity, short stub at the front.
pub(crate) fn swap_accruals(
    as_of: Date,
    instrument: &QuoteInstrument,
    fixed_frequency: u32,
    conventions: &MarketConventions,
) -> Result<Vec<(Date, f64)>, CalibrationError> {
    if fixed_frequency == 0 || 12 % fixed_frequency != 0 {
        return Err(CalibrationError::BootstrapFailure {
            pillar: pillar_label(instrument),
            reason: format!("unsupported fixed frequency {fixed_frequency}"),
        });
    }
    let step = (12 / fixed_frequency) as i32;
    let maturity = instrument.maturity();

    let mut dates = Vec::new();
    let mut k = 1;
    loop {
        let date = as_of
            .add_months(k * step)
            .map_err(|e| CalibrationError::BootstrapFailure {
                pillar: pillar_label(instrument),
                reason: e.to_string(),
            })?;
        if date >= maturity {
            break;
        }
        dates.push(date);
        k += 1;
    }
    dates.push(maturity);

    let mut accruals = Vec::with_capacity(dates.len());
    let mut prev = as_of;
    for date in dates {
        accruals.push((date, conventions.swap_day_count.year_fraction(prev, date)));
        prev = date;
    }
    Ok(accruals)
}
