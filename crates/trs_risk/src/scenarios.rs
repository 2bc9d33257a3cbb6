//! Sensitivity scenarios from bumped quote sheets.
//!
//! A flat bump yields one up/down pair per key; a per-pillar bump yields
//! a ladder with one bucket per calibration instrument. Every scenario
//! rebuilds its curve from a bumped sheet through the market's registered
//! bootstrapper; no curve is ever mutated in place.

use tracing::debug;

use trs_market::bump::{BumpDirection, BumpScope, BumpSpec};
use trs_market::market::{Market, MarketKey};

use crate::error::OrchestrationError;

/// One bucket of a sensitivity ladder.
#[derive(Clone, Debug, PartialEq)]
pub struct LadderPoint {
    /// Label of the bumped pillar (instrument label), or "flat" for a
    /// whole-sheet bump.
    pub pillar: String,
    /// Value under the upward shift.
    pub up: f64,
    /// Value under the downward shift.
    pub down: f64,
    /// Central-difference sensitivity `(up - down) / width`.
    pub sensitivity: f64,
}

/// Prices a flat up/down scenario for one key.
///
/// The valuation closure receives each rebuilt curve; its output feeds
/// the central difference.
pub fn flat_scenario<K, C, F>(
    market: &Market<K, C>,
    key: &K,
    spec: &BumpSpec,
    value: F,
) -> Result<LadderPoint, OrchestrationError>
where
    K: MarketKey,
    C: Send + Sync + 'static,
    F: Fn(&C) -> Result<f64, OrchestrationError>,
{
    let sheet = market.sheet(key)?;
    let up_curve = market.bootstrap_with(key, &spec.apply(&sheet, BumpDirection::Up))?;
    let down_curve = market.bootstrap_with(key, &spec.apply(&sheet, BumpDirection::Down))?;
    let up = value(up_curve.as_ref())?;
    let down = value(down_curve.as_ref())?;
    Ok(LadderPoint {
        pillar: "flat".to_string(),
        up,
        down,
        sensitivity: (up - down) / spec.width(),
    })
}

/// Prices a per-pillar ladder for one key: each calibration instrument is
/// bumped in isolation, up and down, and the curve rebuilt each time.
///
/// For a [`BumpScope::Flat`] spec this degenerates to a single
/// [`flat_scenario`] point.
pub fn pillar_ladder<K, C, F>(
    market: &Market<K, C>,
    key: &K,
    spec: &BumpSpec,
    value: F,
) -> Result<Vec<LadderPoint>, OrchestrationError>
where
    K: MarketKey,
    C: Send + Sync + 'static,
    F: Fn(&C) -> Result<f64, OrchestrationError>,
{
    if spec.scope() == BumpScope::Flat {
        return Ok(vec![flat_scenario(market, key, spec, value)?]);
    }

    let sheet = market.sheet(key)?;
    let mut ladder = Vec::with_capacity(sheet.len());
    for index in 0..sheet.len() {
        let label = sheet.instruments()[index].label().to_string();
        let up_sheet = spec
            .apply_pillar(&sheet, index, BumpDirection::Up)
            .expect("index bounded by sheet length");
        let down_sheet = spec
            .apply_pillar(&sheet, index, BumpDirection::Down)
            .expect("index bounded by sheet length");

        let up = value(market.bootstrap_with(key, &up_sheet)?.as_ref())?;
        let down = value(market.bootstrap_with(key, &down_sheet)?.as_ref())?;
        ladder.push(LadderPoint {
            pillar: label,
            up,
            down,
            sensitivity: (up - down) / spec.width(),
        });
    }
    debug!(key = ?key, buckets = ladder.len(), "pillar ladder complete");
    Ok(ladder)
}
