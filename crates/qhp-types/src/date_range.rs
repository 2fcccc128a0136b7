//! Date range and month iteration.

use chrono::{Datelike, NaiveDate, NaiveDateTime};

use crate::DateRangeError;

/// A range of dates for data retrieval.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    /// Start date (inclusive).
    pub start: NaiveDate,
    /// End date (inclusive).
    pub end: NaiveDate,
}

impl DateRange {
    /// Creates a new date range, validating that start <= end.
    ///
    /// # Errors
    ///
    /// Returns an error if start > end.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, DateRangeError> {
        if start > end {
            return Err(DateRangeError::InvalidRange { start, end });
        }
        Ok(Self { start, end })
    }

    /// Parses a range from two `YYYYMMDD` strings.
    ///
    /// # Errors
    ///
    /// Returns an error if either date is malformed or start > end.
    pub fn parse_compact(start: &str, end: &str) -> Result<Self, DateRangeError> {
        let parse = |s: &str| {
            NaiveDate::parse_from_str(s, "%Y%m%d")
                .map_err(|_| DateRangeError::InvalidDate(s.to_string()))
        };
        Self::new(parse(start)?, parse(end)?)
    }

    /// Creates a date range for a single day.
    #[must_use]
    pub const fn single_day(date: NaiveDate) -> Self {
        Self {
            start: date,
            end: date,
        }
    }

    /// Returns midnight of the start date.
    #[must_use]
    pub fn from_datetime(&self) -> NaiveDateTime {
        self.start.and_time(chrono::NaiveTime::MIN)
    }

    /// Returns midnight of the end date.
    #[must_use]
    pub fn to_datetime(&self) -> NaiveDateTime {
        self.end.and_time(chrono::NaiveTime::MIN)
    }

    /// Returns the total number of days in the range.
    #[must_use]
    pub fn total_days(&self) -> usize {
        ((self.end - self.start).num_days() + 1) as usize
    }

    /// Returns true if the range contains the given date.
    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }
}

impl std::fmt::Display for DateRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} to {}", self.start, self.end)
    }
}

/// Endless iterator over calendar months, yielding `(year, month)` with
/// month in 1..=12.
///
/// Contract enumeration walks past the end of a range to reach the first
/// expiration after it, so the caller decides when to stop.
#[derive(Debug, Clone)]
pub struct MonthIterator {
    year: i32,
    month: u32,
}

impl MonthIterator {
    /// Creates an iterator starting at the given month.
    #[must_use]
    pub const fn unbounded(year: i32, month: u32) -> Self {
        Self { year, month }
    }

    /// Creates an iterator starting at the month of `date`.
    #[must_use]
    pub fn starting_at(date: NaiveDate) -> Self {
        Self::unbounded(date.year(), date.month())
    }
}

impl Iterator for MonthIterator {
    type Item = (i32, u32);

    fn next(&mut self) -> Option<Self::Item> {
        let result = (self.year, self.month);
        if self.month == 12 {
            self.month = 1;
            self.year += 1;
        } else {
            self.month += 1;
        }
        Some(result)
    }
}
