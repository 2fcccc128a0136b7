//! Interchange text input.

use chrono::{NaiveDate, NaiveTime};
use csv::{ReaderBuilder, StringRecord, Trim};
use qhp_types::{BarRecord, BarSeries, Timeframe};
use serde::{Deserialize, Deserializer};
use std::io::Read;
use std::path::Path;

use crate::FormatError;

/// A bar series read from interchange text, with the labels it carried.
#[derive(Debug, Clone, PartialEq)]
pub struct InterchangeFile {
    /// Ticker of the first row, if any rows were present.
    pub ticker: Option<String>,
    /// Period label of the first row.
    pub period: Option<String>,
    /// The bars, ordered and de-duplicated.
    pub series: BarSeries,
}

/// Parser for interchange text.
///
/// Rows are `TICKER, PER, DATE, TIME, OPEN, HIGH, LOW, CLOSE, VOLUME`, and
/// fields may be quoted. A first line starting with `<` is taken as the
/// header and skipped. Dates and times are read as UTC, then the time delta
/// is subtracted, undoing the delta a writer added.
#[derive(Debug, Clone)]
pub struct CsvReader {
    delimiter: u8,
    time_delta_secs: i64,
    timeframe: Option<Timeframe>,
}

impl Default for CsvReader {
    fn default() -> Self {
        Self::new()
    }
}

impl CsvReader {
    /// Creates a comma-delimited reader.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            delimiter: b',',
            time_delta_secs: 0,
            timeframe: None,
        }
    }

    /// Sets the field delimiter.
    #[must_use]
    pub const fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Subtracts `seconds` from every parsed timestamp.
    #[must_use]
    pub const fn with_time_delta(mut self, seconds: i64) -> Self {
        self.time_delta_secs = seconds;
        self
    }

    /// Uses `timeframe` for the series instead of the period column.
    #[must_use]
    pub const fn with_timeframe(mut self, timeframe: Timeframe) -> Self {
        self.timeframe = Some(timeframe);
        self
    }

    /// Reads every row from `input`.
    ///
    /// # Errors
    ///
    /// Returns [`FormatError::Parse`] naming the first bad row, or the
    /// underlying read error.
    pub fn read<R: Read>(&self, mut input: R) -> Result<InterchangeFile, FormatError> {
        let mut buffer = String::new();
        input.read_to_string(&mut buffer)?;

        let mut reader = ReaderBuilder::new()
            .delimiter(self.delimiter)
            .has_headers(detect_header(&buffer))
            .trim(Trim::All)
            .flexible(true)
            .from_reader(buffer.as_bytes());

        let mut ticker = None;
        let mut period = None;
        let mut bars = Vec::new();
        for result in reader.records() {
            let record = result?;
            let line = record.position().map_or(0, |p| p.line() as usize);
            let row = InterchangeRow::from_record(&record)
                .map_err(|reason| FormatError::Parse { line, reason })?;

            let bar = row.bar().map_err(|reason| FormatError::Parse { line, reason })?;
            if ticker.is_none() {
                ticker = Some(row.ticker);
                period = Some(row.period);
            }
            bars.push(bar.shifted(-self.time_delta_secs));
        }

        let timeframe_seconds = self
            .timeframe
            .map(|tf| tf.seconds())
            .or_else(|| period.as_deref().and_then(period_seconds))
            .unwrap_or(0);
        let series = BarSeries::from_bars(ticker.clone().unwrap_or_default(), timeframe_seconds, bars);

        Ok(InterchangeFile {
            ticker,
            period,
            series,
        })
    }

    /// Reads an interchange file from disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or parsed.
    pub fn read_path(&self, path: impl AsRef<Path>) -> Result<InterchangeFile, FormatError> {
        let file = std::fs::File::open(path)?;
        self.read(std::io::BufReader::new(file))
    }
}

/// Headers are written as `<TICKER>`, `<PER>` and so on.
fn detect_header(buffer: &str) -> bool {
    buffer
        .lines()
        .next()
        .is_some_and(|line| line.trim_start_matches('\u{feff}').trim_start().starts_with('<'))
}

/// One interchange row as it appears in the file.
#[derive(Debug, Deserialize)]
struct InterchangeRow {
    ticker: String,
    period: String,
    date: String,
    time: String,
    open: f64,
    high: f64,
    low: f64,
    close: f64,
    #[serde(deserialize_with = "whole_volume")]
    volume: u64,
}

impl InterchangeRow {
    const FIELDS: usize = 9;

    fn from_record(record: &StringRecord) -> Result<Self, String> {
        if record.len() != Self::FIELDS {
            return Err(format!(
                "expected {} fields, found {}",
                Self::FIELDS,
                record.len()
            ));
        }
        record.deserialize(None).map_err(|e| match e.kind() {
            csv::ErrorKind::Deserialize { err, .. } => match err.field() {
                Some(field) => format!("field {}: {}", field + 1, err.kind()),
                None => err.kind().to_string(),
            },
            _ => e.to_string(),
        })
    }

    fn bar(&self) -> Result<BarRecord, String> {
        let date = NaiveDate::parse_from_str(&self.date, "%Y%m%d")
            .map_err(|e| format!("invalid date '{}': {e}", self.date))?;
        let time = NaiveTime::parse_from_str(&format!("{:0>6}", self.time), "%H%M%S")
            .map_err(|e| format!("invalid time '{}': {e}", self.time))?;

        Ok(BarRecord::new(
            date.and_time(time).and_utc().timestamp(),
            self.open,
            self.high,
            self.low,
            self.close,
            self.volume,
        ))
    }
}

// Some exporters write whole volumes as "10.0".
fn whole_volume<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    let field = String::deserialize(deserializer)?;
    if let Ok(volume) = field.parse::<u64>() {
        return Ok(volume);
    }
    match field.parse::<f64>() {
        Ok(v) if v >= 0.0 && v.fract() == 0.0 && v <= u64::MAX as f64 => Ok(v as u64),
        _ => Err(serde::de::Error::custom(format!("invalid volume '{field}'"))),
    }
}

/// Maps a period label to a bar width: a timeframe name (`M15`, `D`) or a
/// count of minutes (`15`). A minute count too large for the width in
/// seconds is an unknown period.
fn period_seconds(period: &str) -> Option<u64> {
    period
        .parse::<Timeframe>()
        .map(|tf| tf.seconds())
        .ok()
        .or_else(|| period.parse::<u64>().ok()?.checked_mul(60))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use std::io::Write;

    const EXPORT: &str = "\
<TICKER>;<PER>;<DATE>;<TIME>;<OPEN>;<HIGH>;<LOW>;<CLOSE>;<VOLUME>
SPFB.Si;15;20200302;100000;66000;66150.5;65990;66100;1234
SPFB.Si;15;20200302;101500;66100;66200;66050;66180;800.0
";

    #[test]
    fn test_read_exporter_file() {
        let file = CsvReader::new()
            .with_delimiter(b';')
            .read(Cursor::new(EXPORT))
            .unwrap();

        assert_eq!(file.ticker.as_deref(), Some("SPFB.Si"));
        assert_eq!(file.period.as_deref(), Some("15"));
        assert_eq!(file.series.timeframe_seconds(), 900);
        assert_eq!(file.series.len(), 2);

        let first = file.series.bars()[0];
        assert_eq!(first.timestamp, 1_583_143_200);
        assert_eq!(first.high, 66_150.5);
        assert_eq!(first.volume, 1234);
        assert_eq!(file.series.bars()[1].volume, 800);
    }

    #[test]
    fn test_time_delta_is_subtracted() {
        let file = CsvReader::new()
            .with_delimiter(b';')
            .with_time_delta(3 * 3600)
            .with_timeframe(Timeframe::Minute1)
            .read(Cursor::new(EXPORT))
            .unwrap();

        assert_eq!(file.series.bars()[0].timestamp, 1_583_143_200 - 10_800);
        assert_eq!(file.series.timeframe_seconds(), 60);
    }

    #[test]
    fn test_short_time_is_padded() {
        let text = "Si,D,20200302,0,1,1,1,1,1\n";
        let file = CsvReader::new().read(Cursor::new(text)).unwrap();
        assert_eq!(file.series.bars()[0].timestamp, 1_583_107_200);
        assert_eq!(file.series.timeframe_seconds(), 86_400);
    }

    #[test]
    fn test_bad_row_reports_line() {
        let text = "<TICKER>,<PER>,<DATE>,<TIME>,<OPEN>,<HIGH>,<LOW>,<CLOSE>,<VOLUME>\n\
                    Si,M15,20200302,100000,1,1,1,1,1\n\
                    Si,M15,2020-03-02,100000,1,1,1,1,1\n";
        let err = CsvReader::new().read(Cursor::new(text)).unwrap_err();
        assert!(matches!(err, FormatError::Parse { line: 3, .. }));

        let err = CsvReader::new()
            .read(Cursor::new("Si,M15,20200302\n"))
            .unwrap_err();
        assert!(matches!(err, FormatError::Parse { line: 1, ref reason } if reason.contains("9 fields")));
    }

    #[test]
    fn test_quoted_fields() {
        let text = "\"Si-3.20\",M15,20200302,100000,\"66000\",\"66150.5\",65990,66100,\"1234\"\n";
        let file = CsvReader::new().read(Cursor::new(text)).unwrap();

        assert_eq!(file.ticker.as_deref(), Some("Si-3.20"));
        let bar = file.series.bars()[0];
        assert_eq!(bar.open, 66_000.0);
        assert_eq!(bar.high, 66_150.5);
        assert_eq!(bar.volume, 1234);
    }

    #[test]
    fn test_bad_price_names_the_field() {
        let text = "Si,M15,20200302,100000,abc,1,1,1,1\n";
        let err = CsvReader::new().read(Cursor::new(text)).unwrap_err();
        assert!(matches!(err, FormatError::Parse { line: 1, ref reason } if reason.starts_with("field 5")));
    }

    #[test]
    fn test_oversized_minute_period_is_unknown() {
        let text = "Si,999999999999999999,20200302,100000,1,1,1,1,1\n";
        let file = CsvReader::new().read(Cursor::new(text)).unwrap();

        assert_eq!(file.period.as_deref(), Some("999999999999999999"));
        assert_eq!(file.series.timeframe_seconds(), 0);
        assert_eq!(period_seconds("15"), Some(900));
        assert_eq!(period_seconds(&u64::MAX.to_string()), None);
    }

    #[test]
    fn test_empty_input() {
        let file = CsvReader::new().read(Cursor::new("")).unwrap();
        assert!(file.ticker.is_none());
        assert!(file.series.is_empty());
    }

    #[test]
    fn test_read_path() {
        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        tmp.write_all(EXPORT.replace(';', ",").as_bytes()).unwrap();

        let file = CsvReader::new().read_path(tmp.path()).unwrap();
        assert_eq!(file.series.len(), 2);
    }
}
