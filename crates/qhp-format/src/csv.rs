//! Interchange text output.

use chrono::DateTime;
use chrono_tz::Tz;
use csv::WriterBuilder;
use qhp_types::{BarSeries, Timeframe};
use std::io::Write;

use crate::{FormatError, Formatter};

/// Column names of the interchange header, in order.
pub const INTERCHANGE_COLUMNS: [&str; 9] = [
    "<TICKER>", "<PER>", "<DATE>", "<TIME>", "<OPEN>", "<HIGH>", "<LOW>", "<CLOSE>", "<VOLUME>",
];

/// Interchange text formatter.
///
/// Writes one row per bar with the date as `YYYYMMDD` and the time as
/// `HHMMSS`. Timestamps are shifted by the time delta and then rendered in
/// the display timezone (UTC unless set).
#[derive(Debug, Clone)]
pub struct CsvFormatter {
    delimiter: u8,
    include_header: bool,
    time_delta_secs: i64,
    timezone: Tz,
    ticker: Option<String>,
    period: Option<String>,
}

impl Default for CsvFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl CsvFormatter {
    /// Creates a comma-delimited formatter with a header row.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            delimiter: b',',
            include_header: true,
            time_delta_secs: 0,
            timezone: Tz::UTC,
            ticker: None,
            period: None,
        }
    }

    /// Sets the field delimiter.
    #[must_use]
    pub const fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Sets whether to include a header row.
    #[must_use]
    pub const fn with_header(mut self, include: bool) -> Self {
        self.include_header = include;
        self
    }

    /// Adds `seconds` to every timestamp before rendering.
    #[must_use]
    pub const fn with_time_delta(mut self, seconds: i64) -> Self {
        self.time_delta_secs = seconds;
        self
    }

    /// Renders dates and times in `timezone`.
    #[must_use]
    pub const fn with_timezone(mut self, timezone: Tz) -> Self {
        self.timezone = timezone;
        self
    }

    /// Renders dates and times in the named tz-database zone.
    ///
    /// # Errors
    ///
    /// Returns [`FormatError::UnknownTimezone`] if the name is not known.
    pub fn with_timezone_name(self, name: &str) -> Result<Self, FormatError> {
        let timezone = name
            .parse::<Tz>()
            .map_err(|_| FormatError::UnknownTimezone(name.to_string()))?;
        Ok(self.with_timezone(timezone))
    }

    /// Writes `ticker` in the ticker column instead of the series symbol.
    #[must_use]
    pub fn with_ticker(mut self, ticker: impl Into<String>) -> Self {
        self.ticker = Some(ticker.into());
        self
    }

    /// Writes `period` in the period column instead of the series timeframe.
    #[must_use]
    pub fn with_period(mut self, period: impl Into<String>) -> Self {
        self.period = Some(period.into());
        self
    }

    fn period_for(&self, series: &BarSeries) -> String {
        if let Some(period) = &self.period {
            return period.clone();
        }
        let seconds = series.timeframe_seconds();
        Timeframe::from_seconds(seconds)
            .map_or_else(|| seconds.to_string(), |tf| tf.as_str().to_string())
    }
}

impl Formatter for CsvFormatter {
    fn write_series<W: Write + Send>(
        &self,
        series: &BarSeries,
        writer: W,
    ) -> Result<(), FormatError> {
        let ticker = self.ticker.as_deref().unwrap_or_else(|| series.symbol());
        let period = self.period_for(series);
        let mut writer = WriterBuilder::new()
            .delimiter(self.delimiter)
            .has_headers(false)
            .from_writer(writer);

        if self.include_header {
            writer.write_record(INTERCHANGE_COLUMNS)?;
        }

        for bar in series.bars() {
            let shifted = bar.timestamp.saturating_add(self.time_delta_secs);
            let local = DateTime::from_timestamp(shifted, 0)
                .ok_or(FormatError::TimestampOutOfRange(shifted))?
                .with_timezone(&self.timezone);
            writer.write_record([
                ticker.to_string(),
                period.clone(),
                local.format("%Y%m%d").to_string(),
                local.format("%H%M%S").to_string(),
                bar.open.to_string(),
                bar.high.to_string(),
                bar.low.to_string(),
                bar.close.to_string(),
                bar.volume.to_string(),
            ])?;
        }

        writer.flush()?;
        Ok(())
    }

    fn extension(&self) -> &str {
        "csv"
    }
}
