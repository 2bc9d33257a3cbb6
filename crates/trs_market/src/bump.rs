//! Deterministic quote perturbations for sensitivity scenarios.
//!
//! A [`BumpSpec`] is a pure transformation of a quote sheet: applying it
//! returns a new sheet and never touches the original. Re-bootstrapping a
//! bumped sheet is therefore a pure function of (base sheet, bump spec),
//! so repeated applications produce identical curves.

use crate::quotes::DataQuoteSheet;

/// How a shift combines with a quote value.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BumpKind {
    /// `new = old + shift`
    Absolute,
    /// `new = old * (1 + shift)`
    Relative,
}

/// Which quotes a bump targets.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BumpScope {
    /// One uniform shift applied to every quote in the sheet.
    Flat,
    /// Each pillar shifted independently, one scenario per pillar
    /// (bucket/ladder risk). Applying the spec to a whole sheet still
    /// shifts every pillar; ladder construction uses
    /// [`BumpSpec::apply_pillar`].
    PerPillar,
}

/// Direction of a shift.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum BumpDirection {
    /// Apply the upward shift.
    Up,
    /// Apply the downward shift.
    Down,
}

/// A deterministic quote perturbation.
///
/// Up and down shifts are independent values; asymmetric sensitivity
/// definitions are allowed.
///
/// # Example
///
/// ```
/// use trs_market::bump::{BumpDirection, BumpKind, BumpScope, BumpSpec};
///
/// let spec = BumpSpec::new(0.0001, -0.0001, BumpKind::Absolute, BumpScope::Flat);
/// assert_eq!(spec.shift(BumpDirection::Up), 0.0001);
/// assert_eq!(spec.shift(BumpDirection::Down), -0.0001);
/// ```
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BumpSpec {
    up: f64,
    down: f64,
    kind: BumpKind,
    scope: BumpScope,
}

impl BumpSpec {
    /// Creates a bump specification.
    pub fn new(up: f64, down: f64, kind: BumpKind, scope: BumpScope) -> Self {
        Self {
            up,
            down,
            kind,
            scope,
        }
    }

    /// Symmetric absolute flat bump of `shift` up and `-shift` down.
    pub fn flat_absolute(shift: f64) -> Self {
        Self::new(shift, -shift, BumpKind::Absolute, BumpScope::Flat)
    }

    /// Symmetric relative per-pillar bump.
    pub fn pillar_relative(shift: f64) -> Self {
        Self::new(shift, -shift, BumpKind::Relative, BumpScope::PerPillar)
    }

    /// Returns the shift for a direction.
    pub fn shift(&self, direction: BumpDirection) -> f64 {
        match direction {
            BumpDirection::Up => self.up,
            BumpDirection::Down => self.down,
        }
    }

    /// Returns the shift kind.
    pub fn kind(&self) -> BumpKind {
        self.kind
    }

    /// Returns the target scope.
    pub fn scope(&self) -> BumpScope {
        self.scope
    }

    /// Returns the combined width `up - down` used to normalize central
    /// differences.
    pub fn width(&self) -> f64 {
        self.up - self.down
    }

    fn shifted_value(&self, old: f64, direction: BumpDirection) -> f64 {
        let shift = self.shift(direction);
        match self.kind {
            BumpKind::Absolute => old + shift,
            BumpKind::Relative => old * (1.0 + shift),
        }
    }

    /// Applies the bump to every quote in the sheet, returning a new sheet.
    ///
    /// The input sheet is untouched.
    pub fn apply(&self, sheet: &DataQuoteSheet, direction: BumpDirection) -> DataQuoteSheet {
        sheet.map_instruments(|instrument| {
            let mut shifted = instrument.clone();
            for kind in instrument.quoted_kinds().collect::<Vec<_>>() {
                let old = instrument.quote(kind).unwrap();
                shifted = shifted.with_shifted_quote(kind, self.shifted_value(old, direction));
            }
            shifted
        })
    }

    /// Applies the bump to the single instrument at `index`, returning a
    /// new sheet, or `None` when the index is out of range.
    ///
    /// Ladder scenarios iterate this over every pillar.
    pub fn apply_pillar(
        &self,
        sheet: &DataQuoteSheet,
        index: usize,
        direction: BumpDirection,
    ) -> Option<DataQuoteSheet> {
        if index >= sheet.len() {
            return None;
        }
        let mut position = 0;
        Some(sheet.map_instruments(|instrument| {
            let result = if position == index {
                let mut shifted = instrument.clone();
                for kind in instrument.quoted_kinds().collect::<Vec<_>>() {
                    let old = instrument.quote(kind).unwrap();
                    shifted =
                        shifted.with_shifted_quote(kind, self.shifted_value(old, direction));
                }
                shifted
            } else {
                instrument.clone()
            };
            position += 1;
            result
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quotes::{Compounding, InstrumentKind, QuoteInstrument, QuoteKind};
    use approx::assert_relative_eq;
    use trs_core::types::Date;

    fn sheet() -> DataQuoteSheet {
        let as_of = Date::from_ymd(2020, 6, 15).unwrap();
        let mut sheet = DataQuoteSheet::new(as_of);
        for (label, maturity, mid) in [
            ("ZC.1Y", Date::from_ymd(2021, 6, 15).unwrap(), 0.01),
            ("ZC.2Y", Date::from_ymd(2022, 6, 15).unwrap(), 0.02),
        ] {
            sheet.add_instrument(
                QuoteInstrument::new(
                    label,
                    InstrumentKind::ZeroCoupon {
                        compounding: Compounding::Continuous,
                    },
                    maturity,
                )
                .add_quote(QuoteKind::Mid, mid)
                .unwrap(),
            );
        }
        sheet
    }

    #[test]
    fn test_absolute_flat_bump() {
        let base = sheet();
        let bumped = BumpSpec::flat_absolute(0.0001).apply(&base, BumpDirection::Up);
        assert_relative_eq!(bumped.instruments()[0].mid().unwrap(), 0.0101);
        assert_relative_eq!(bumped.instruments()[1].mid().unwrap(), 0.0201);
        // Base sheet untouched
        assert_relative_eq!(base.instruments()[0].mid().unwrap(), 0.01);
    }

    #[test]
    fn test_relative_bump() {
        let base = sheet();
        let spec = BumpSpec::new(0.10, -0.10, BumpKind::Relative, BumpScope::Flat);
        let bumped = spec.apply(&base, BumpDirection::Down);
        assert_relative_eq!(bumped.instruments()[0].mid().unwrap(), 0.009);
    }

    #[test]
    fn test_asymmetric_shifts() {
        let spec = BumpSpec::new(0.002, -0.001, BumpKind::Absolute, BumpScope::Flat);
        assert_relative_eq!(spec.width(), 0.003);
        let base = sheet();
        let up = spec.apply(&base, BumpDirection::Up);
        let down = spec.apply(&base, BumpDirection::Down);
        assert_relative_eq!(up.instruments()[0].mid().unwrap(), 0.012);
        assert_relative_eq!(down.instruments()[0].mid().unwrap(), 0.009);
    }

    #[test]
    fn test_apply_pillar_shifts_only_target() {
        let base = sheet();
        let spec = BumpSpec::pillar_relative(0.01);
        let bumped = spec.apply_pillar(&base, 1, BumpDirection::Up).unwrap();
        assert_relative_eq!(bumped.instruments()[0].mid().unwrap(), 0.01);
        assert_relative_eq!(bumped.instruments()[1].mid().unwrap(), 0.0202);
    }

    #[test]
    fn test_apply_pillar_out_of_range() {
        let base = sheet();
        let spec = BumpSpec::pillar_relative(0.01);
        assert!(spec.apply_pillar(&base, 5, BumpDirection::Up).is_none());
    }

    #[test]
    fn test_idempotent_application() {
        let base = sheet();
        let spec = BumpSpec::flat_absolute(0.0005);
        let once = spec.apply(&base, BumpDirection::Up);
        let twice = spec.apply(&base, BumpDirection::Up);
        assert_eq!(once, twice);
    }

    proptest::proptest! {
        // Pure transformation: applying any absolute shift moves every
        // quote by exactly that shift and leaves the base sheet alone.
        #[test]
        fn prop_absolute_shift_is_exact(shift in -0.01_f64..0.01) {
            let base = sheet();
            let spec = BumpSpec::new(shift, -shift, BumpKind::Absolute, BumpScope::Flat);
            let bumped = spec.apply(&base, BumpDirection::Up);
            for (before, after) in base.instruments().iter().zip(bumped.instruments()) {
                let expected = before.mid().unwrap() + shift;
                proptest::prop_assert!((after.mid().unwrap() - expected).abs() < 1e-15);
            }
        }
    }
}
