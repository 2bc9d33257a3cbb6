//! Time types and day count conventions for financial calculations.
//!
//! This module provides:
//! - `Date`: type-safe date wrapper around `chrono::NaiveDate`
//! - `Tenor`: market tenor notation ("7D", "3M", "10Y") with date arithmetic
//! - `DayCountConvention`: industry-standard year-fraction rules
//!
//! # Examples
//!
//! ```
//! use trs_core::types::{Date, DayCountConvention, Tenor};
//!
//! let start = Date::from_ymd(2024, 1, 1).unwrap();
//! let end = start.add_tenor("6M".parse::<Tenor>().unwrap()).unwrap();
//! assert_eq!(end, Date::from_ymd(2024, 7, 1).unwrap());
//!
//! let yf = DayCountConvention::Act365Fixed.year_fraction(start, end);
//! assert!((yf - 0.4986).abs() < 0.001);
//! ```

use chrono::{Datelike, Days, Months, NaiveDate};
use std::fmt;
use std::ops::Sub;
use std::str::FromStr;

use super::error::{DateError, TenorError};

/// Type-safe date wrapper around `chrono::NaiveDate`.
///
/// Provides ISO 8601 parsing and the date arithmetic needed by schedule
/// generation and curve pillar placement.
///
/// # Examples
///
/// ```
/// use trs_core::types::Date;
///
/// let date = Date::from_ymd(2024, 6, 15).unwrap();
/// assert_eq!(date.year(), 2024);
///
/// let parsed: Date = "2024-06-15".parse().unwrap();
/// assert_eq!(date, parsed);
///
/// let start = Date::from_ymd(2024, 1, 1).unwrap();
/// let end = Date::from_ymd(2024, 1, 11).unwrap();
/// assert_eq!(end - start, 10);
/// ```
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Date(NaiveDate);

impl Date {
    /// Creates a date from year, month and day components.
    ///
    /// # Errors
    ///
    /// Returns `DateError::InvalidDate` for impossible dates
    /// (e.g. February 30th).
    ///
    /// # Examples
    ///
    /// ```
    /// use trs_core::types::Date;
    ///
    /// assert!(Date::from_ymd(2024, 2, 29).is_ok()); // leap year
    /// assert!(Date::from_ymd(2023, 2, 29).is_err());
    /// ```
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Result<Self, DateError> {
        NaiveDate::from_ymd_opt(year, month, day)
            .map(Date)
            .ok_or(DateError::InvalidDate { year, month, day })
    }

    /// Parses a date from ISO 8601 format (YYYY-MM-DD).
    pub fn parse(s: &str) -> Result<Self, DateError> {
        NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map(Date)
            .map_err(|e| DateError::ParseError(e.to_string()))
    }

    /// Returns the underlying `NaiveDate` for access to chrono's full API.
    pub fn into_inner(self) -> NaiveDate {
        self.0
    }

    /// Returns the year component.
    pub fn year(&self) -> i32 {
        self.0.year()
    }

    /// Returns the month component (1-12).
    pub fn month(&self) -> u32 {
        self.0.month()
    }

    /// Returns the day component (1-31).
    pub fn day(&self) -> u32 {
        self.0.day()
    }

    /// Returns the date advanced by the given number of calendar days.
    pub fn add_days(&self, days: i64) -> Result<Self, DateError> {
        let result = if days >= 0 {
            self.0.checked_add_days(Days::new(days as u64))
        } else {
            self.0.checked_sub_days(Days::new((-days) as u64))
        };
        result.map(Date).ok_or(DateError::OutOfRange)
    }

    /// Returns the date advanced by the given number of calendar months.
    ///
    /// End-of-month days clamp (Jan 31 + 1M = Feb 29 in a leap year).
    pub fn add_months(&self, months: i32) -> Result<Self, DateError> {
        let result = if months >= 0 {
            self.0.checked_add_months(Months::new(months as u32))
        } else {
            self.0.checked_sub_months(Months::new((-months) as u32))
        };
        result.map(Date).ok_or(DateError::OutOfRange)
    }

    /// Returns the date advanced by a market tenor.
    ///
    /// # Examples
    ///
    /// ```
    /// use trs_core::types::{Date, Tenor};
    ///
    /// let date = Date::from_ymd(2024, 1, 31).unwrap();
    /// let shifted = date.add_tenor("1M".parse::<Tenor>().unwrap()).unwrap();
    /// assert_eq!(shifted, Date::from_ymd(2024, 2, 29).unwrap());
    /// ```
    pub fn add_tenor(&self, tenor: Tenor) -> Result<Self, DateError> {
        match tenor.unit {
            TenorUnit::Days => self.add_days(tenor.count as i64),
            TenorUnit::Weeks => self.add_days(tenor.count as i64 * 7),
            TenorUnit::Months => self.add_months(tenor.count),
            TenorUnit::Years => self.add_months(tenor.count * 12),
        }
    }
}

impl Sub for Date {
    type Output = i64;

    /// Returns the number of days between two dates, positive when `self`
    /// is the later date.
    fn sub(self, other: Date) -> i64 {
        (self.0 - other.0).num_days()
    }
}

impl fmt::Display for Date {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

impl FromStr for Date {
    type Err = DateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Date::parse(s)
    }
}

/// Unit of a market tenor.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TenorUnit {
    /// Calendar days
    Days,
    /// Calendar weeks
    Weeks,
    /// Calendar months
    Months,
    /// Calendar years
    Years,
}

/// A market tenor such as "7D", "2W", "3M" or "10Y".
///
/// # Examples
///
/// ```
/// use trs_core::types::{Tenor, TenorUnit};
///
/// let tenor: Tenor = "3M".parse().unwrap();
/// assert_eq!(tenor.count, 3);
/// assert_eq!(tenor.unit, TenorUnit::Months);
/// assert_eq!(format!("{}", tenor), "3M");
/// ```
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tenor {
    /// Number of units.
    pub count: i32,
    /// Calendar unit.
    pub unit: TenorUnit,
}

impl Tenor {
    /// Creates a tenor from a count and a unit.
    pub fn new(count: i32, unit: TenorUnit) -> Self {
        Self { count, unit }
    }

    /// Approximate length in years, used only for ordering heuristics.
    ///
    /// Exact year fractions always go through [`DayCountConvention`].
    pub fn approx_years(&self) -> f64 {
        match self.unit {
            TenorUnit::Days => self.count as f64 / 365.0,
            TenorUnit::Weeks => self.count as f64 * 7.0 / 365.0,
            TenorUnit::Months => self.count as f64 / 12.0,
            TenorUnit::Years => self.count as f64,
        }
    }
}

impl fmt::Display for Tenor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let unit = match self.unit {
            TenorUnit::Days => 'D',
            TenorUnit::Weeks => 'W',
            TenorUnit::Months => 'M',
            TenorUnit::Years => 'Y',
        };
        write!(f, "{}{}", self.count, unit)
    }
}

impl FromStr for Tenor {
    type Err = TenorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() < 2 {
            return Err(TenorError::ParseError(s.to_string()));
        }
        let (count_str, unit_str) = s.split_at(s.len() - 1);
        let count: i32 = count_str
            .parse()
            .map_err(|_| TenorError::ParseError(s.to_string()))?;
        let unit_char = unit_str.chars().next().unwrap();
        let unit = match unit_char.to_ascii_uppercase() {
            'D' => TenorUnit::Days,
            'W' => TenorUnit::Weeks,
            'M' => TenorUnit::Months,
            'Y' => TenorUnit::Years,
            other => return Err(TenorError::UnknownUnit(other)),
        };
        Ok(Tenor { count, unit })
    }
}

/// Industry-standard day count conventions.
///
/// Each convention is a pure function `(start, end) -> year fraction`.
///
/// # Examples
///
/// ```
/// use trs_core::types::{Date, DayCountConvention};
///
/// let start = Date::from_ymd(2024, 1, 1).unwrap();
/// let end = Date::from_ymd(2024, 4, 1).unwrap();
///
/// let act360 = DayCountConvention::Act360.year_fraction(start, end);
/// assert!((act360 - 91.0 / 360.0).abs() < 1e-12);
/// ```
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DayCountConvention {
    /// Actual/360: actual days divided by 360.
    Act360,
    /// Actual/365 Fixed: actual days divided by 365.
    #[default]
    Act365Fixed,
    /// 30E/360 (Eurobond): day-of-month components clamp at 30.
    Thirty360E,
}

impl DayCountConvention {
    /// Computes the year fraction between two dates.
    ///
    /// Negative when `end` precedes `start`.
    pub fn year_fraction(&self, start: Date, end: Date) -> f64 {
        match self {
            DayCountConvention::Act360 => (end - start) as f64 / 360.0,
            DayCountConvention::Act365Fixed => (end - start) as f64 / 365.0,
            DayCountConvention::Thirty360E => {
                let d1 = start.day().min(30) as i64;
                let d2 = end.day().min(30) as i64;
                let days = 360 * (end.year() - start.year()) as i64
                    + 30 * (end.month() as i64 - start.month() as i64)
                    + (d2 - d1);
                days as f64 / 360.0
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    // ========================================
    // Date tests
    // ========================================

    #[test]
    fn test_from_ymd_valid_and_invalid() {
        assert!(Date::from_ymd(2024, 2, 29).is_ok());
        let err = Date::from_ymd(2023, 2, 29).unwrap_err();
        assert!(matches!(err, DateError::InvalidDate { .. }));
    }

    #[test]
    fn test_parse_iso() {
        let date = Date::parse("2020-06-15").unwrap();
        assert_eq!(date, Date::from_ymd(2020, 6, 15).unwrap());
        assert!(Date::parse("15/06/2020").is_err());
    }

    #[test]
    fn test_day_difference() {
        let start = Date::from_ymd(2024, 1, 1).unwrap();
        let end = Date::from_ymd(2024, 3, 1).unwrap();
        assert_eq!(end - start, 60); // leap year February
        assert_eq!(start - end, -60);
    }

    #[test]
    fn test_add_months_clamps_month_end() {
        let date = Date::from_ymd(2024, 1, 31).unwrap();
        assert_eq!(
            date.add_months(1).unwrap(),
            Date::from_ymd(2024, 2, 29).unwrap()
        );
    }

    #[test]
    fn test_add_negative_days() {
        let date = Date::from_ymd(2024, 1, 10).unwrap();
        assert_eq!(
            date.add_days(-10).unwrap(),
            Date::from_ymd(2023, 12, 31).unwrap()
        );
    }

    #[test]
    fn test_display_iso() {
        let date = Date::from_ymd(2024, 6, 5).unwrap();
        assert_eq!(format!("{}", date), "2024-06-05");
    }

    // ========================================
    // Tenor tests
    // ========================================

    #[test]
    fn test_tenor_parse_all_units() {
        assert_eq!("7D".parse::<Tenor>().unwrap().unit, TenorUnit::Days);
        assert_eq!("2W".parse::<Tenor>().unwrap().unit, TenorUnit::Weeks);
        assert_eq!("3m".parse::<Tenor>().unwrap().unit, TenorUnit::Months);
        assert_eq!("10Y".parse::<Tenor>().unwrap().count, 10);
    }

    #[test]
    fn test_tenor_parse_invalid() {
        assert!("".parse::<Tenor>().is_err());
        assert!("M".parse::<Tenor>().is_err());
        assert!("3Q".parse::<Tenor>().is_err());
    }

    #[test]
    fn test_tenor_date_arithmetic() {
        let date = Date::from_ymd(2020, 6, 15).unwrap();
        let shifted = date.add_tenor("1Y".parse().unwrap()).unwrap();
        assert_eq!(shifted, Date::from_ymd(2021, 6, 15).unwrap());

        let shifted = date.add_tenor("2W".parse().unwrap()).unwrap();
        assert_eq!(shifted, Date::from_ymd(2020, 6, 29).unwrap());
    }

    #[test]
    fn test_tenor_display_round_trip() {
        for s in ["7D", "2W", "3M", "10Y"] {
            let tenor: Tenor = s.parse().unwrap();
            assert_eq!(format!("{}", tenor), s);
        }
    }

    // ========================================
    // Day count tests
    // ========================================

    #[test]
    fn test_act360() {
        let start = Date::from_ymd(2024, 1, 1).unwrap();
        let end = Date::from_ymd(2025, 1, 1).unwrap();
        assert_relative_eq!(
            DayCountConvention::Act360.year_fraction(start, end),
            366.0 / 360.0
        );
    }

    #[test]
    fn test_act365_fixed() {
        let start = Date::from_ymd(2020, 6, 15).unwrap();
        let end = Date::from_ymd(2021, 6, 15).unwrap();
        assert_relative_eq!(
            DayCountConvention::Act365Fixed.year_fraction(start, end),
            365.0 / 365.0
        );
    }

    #[test]
    fn test_thirty360e_month_end_clamp() {
        let start = Date::from_ymd(2024, 1, 31).unwrap();
        let end = Date::from_ymd(2024, 2, 28).unwrap();
        // 30E/360: 31st clamps to 30, so 28 days of accrual
        assert_relative_eq!(
            DayCountConvention::Thirty360E.year_fraction(start, end),
            28.0 / 360.0
        );
    }

    #[test]
    fn test_negative_fraction_when_reversed() {
        let start = Date::from_ymd(2024, 6, 1).unwrap();
        let end = Date::from_ymd(2024, 1, 1).unwrap();
        assert!(DayCountConvention::Act365Fixed.year_fraction(start, end) < 0.0);
    }
}
