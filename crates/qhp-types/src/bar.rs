//! Price bar representation.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// A single OHLCV price bar.
///
/// The timestamp is a naive count of seconds since the Unix epoch. The quote
/// store does not attach a zone to it; any display offset is applied by the
/// caller.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BarRecord {
    /// Bar open time, seconds since epoch.
    pub timestamp: i64,
    /// Opening price.
    pub open: f64,
    /// Highest price during the bar.
    pub high: f64,
    /// Lowest price during the bar.
    pub low: f64,
    /// Closing price.
    pub close: f64,
    /// Traded volume.
    pub volume: u64,
}

impl BarRecord {
    /// Creates a new bar.
    #[must_use]
    pub const fn new(timestamp: i64, open: f64, high: f64, low: f64, close: f64, volume: u64) -> Self {
        Self {
            timestamp,
            open,
            high,
            low,
            close,
            volume,
        }
    }

    /// Returns the bar time as a UTC datetime.
    ///
    /// Timestamps outside chrono's representable range clamp to the epoch.
    #[must_use]
    pub fn datetime(&self) -> DateTime<Utc> {
        DateTime::from_timestamp(self.timestamp, 0).unwrap_or_default()
    }

    /// Returns the UTC calendar date the bar falls on.
    #[must_use]
    pub fn date(&self) -> NaiveDate {
        self.datetime().date_naive()
    }

    /// Returns a copy of this bar moved by `seconds`.
    #[must_use]
    pub const fn shifted(self, seconds: i64) -> Self {
        Self {
            timestamp: self.timestamp + seconds,
            ..self
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn test_datetime_conversion() {
        // 2024-01-15 12:30:00 UTC
        let bar = BarRecord::new(1_705_321_800, 1.0, 2.0, 0.5, 1.5, 10);
        let dt = bar.datetime();

        assert_eq!(dt.year(), 2024);
        assert_eq!(dt.month(), 1);
        assert_eq!(dt.day(), 15);
        assert_eq!(dt.hour(), 12);
        assert_eq!(dt.minute(), 30);
        assert_eq!(bar.date(), NaiveDate::from_ymd_opt(2024, 1, 15).unwrap());
    }

    #[test]
    fn test_shifted() {
        let bar = BarRecord::new(3600, 1.0, 1.0, 1.0, 1.0, 1);
        let moved = bar.shifted(-3600);

        assert_eq!(moved.timestamp, 0);
        assert_eq!(moved.close, bar.close);
    }
}
