//! Payment schedule generation.
//!
//! A schedule is a pure function of (start, end, frequency): period end
//! dates rolled backwards from the terminal date, so any stub lands at
//! the short end.

use trs_core::types::{Date, DayCountConvention};

use crate::error::ScheduleError;

/// Payment frequency.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Frequency {
    /// Twelve periods per year.
    Monthly,
    /// Four periods per year.
    Quarterly,
    /// Two periods per year.
    SemiAnnual,
    /// One period per year.
    Annual,
}

impl Frequency {
    /// Period length in months.
    pub fn months(&self) -> i32 {
        match self {
            Frequency::Monthly => 1,
            Frequency::Quarterly => 3,
            Frequency::SemiAnnual => 6,
            Frequency::Annual => 12,
        }
    }

    /// Periods per year.
    pub fn per_year(&self) -> u32 {
        (12 / self.months()) as u32
    }
}

/// An ordered list of period end dates from start to end.
///
/// # Example
///
/// ```
/// use trs_core::types::Date;
/// use trs_models::schedules::{Frequency, Schedule};
///
/// let start = Date::from_ymd(2020, 6, 15).unwrap();
/// let end = Date::from_ymd(2021, 6, 15).unwrap();
/// let schedule = Schedule::generate(start, end, Frequency::Quarterly).unwrap();
///
/// assert_eq!(schedule.dates().len(), 4);
/// assert_eq!(*schedule.dates().last().unwrap(), end);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Schedule {
    start: Date,
    dates: Vec<Date>,
}

impl Schedule {
    /// Generates period end dates by rolling backwards from `end`.
    ///
    /// The first period absorbs any stub (short first period).
    ///
    /// # Errors
    ///
    /// `ScheduleError::InvalidRange` when `end <= start`.
    pub fn generate(start: Date, end: Date, frequency: Frequency) -> Result<Self, ScheduleError> {
        if end <= start {
            return Err(ScheduleError::InvalidRange {
                start: start.to_string(),
                end: end.to_string(),
            });
        }

        let step = frequency.months();
        let mut reversed = Vec::new();
        let mut k = 0;
        loop {
            let date = end
                .add_months(-k * step)
                .map_err(|e| ScheduleError::DateArithmetic(e.to_string()))?;
            if date <= start {
                break;
            }
            reversed.push(date);
            k += 1;
        }
        reversed.reverse();
        Ok(Self {
            start,
            dates: reversed,
        })
    }

    /// Returns the schedule start (the first accrual begins here).
    pub fn start(&self) -> Date {
        self.start
    }

    /// Returns the period end dates in increasing order.
    pub fn dates(&self) -> &[Date] {
        &self.dates
    }

    /// Returns the number of periods.
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    /// Returns true when the schedule has no periods.
    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    /// Year fractions of each period end measured from `as_of`.
    pub fn times_from(&self, as_of: Date, day_count: DayCountConvention) -> Vec<f64> {
        self.dates
            .iter()
            .map(|&d| day_count.year_fraction(as_of, d))
            .collect()
    }

    /// Accrual fractions of each period under `day_count`.
    pub fn accruals(&self, day_count: DayCountConvention) -> Vec<f64> {
        let mut accruals = Vec::with_capacity(self.dates.len());
        let mut prev = self.start;
        for &date in &self.dates {
            accruals.push(day_count.year_fraction(prev, date));
            prev = date;
        }
        accruals
    }
}
