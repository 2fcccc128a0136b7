//! JSON output format.

use qhp_types::BarSeries;
use std::io::Write;

use crate::{FormatError, Formatter};

/// JSON output style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonStyle {
    /// JSON array (standard JSON).
    #[default]
    Array,
    /// Newline-delimited JSON (NDJSON/JSONL).
    Ndjson,
}

/// JSON formatter writing bars as objects with an epoch `timestamp`.
#[derive(Debug, Clone, Default)]
pub struct JsonFormatter {
    style: JsonStyle,
    pretty: bool,
}

impl JsonFormatter {
    /// Creates a new JSON formatter with default settings (array style).
    #[must_use]
    pub const fn new() -> Self {
        Self {
            style: JsonStyle::Array,
            pretty: false,
        }
    }

    /// Creates a new NDJSON formatter.
    #[must_use]
    pub const fn ndjson() -> Self {
        Self {
            style: JsonStyle::Ndjson,
            pretty: false,
        }
    }

    /// Sets whether to pretty-print output (array style only).
    #[must_use]
    pub const fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    /// Sets the output style.
    #[must_use]
    pub const fn with_style(mut self, style: JsonStyle) -> Self {
        self.style = style;
        self
    }
}

impl Formatter for JsonFormatter {
    fn write_series<W: Write + Send>(
        &self,
        series: &BarSeries,
        mut writer: W,
    ) -> Result<(), FormatError> {
        let bars = series.bars();
        match self.style {
            JsonStyle::Array if self.pretty => serde_json::to_writer_pretty(&mut writer, bars)?,
            JsonStyle::Array => serde_json::to_writer(&mut writer, bars)?,
            JsonStyle::Ndjson => {
                for bar in bars {
                    serde_json::to_writer(&mut writer, bar)?;
                    writeln!(writer)?;
                }
                return Ok(writer.flush()?);
            }
        }
        writeln!(writer)?;
        writer.flush()?;
        Ok(())
    }

    fn extension(&self) -> &str {
        match self.style {
            JsonStyle::Array => "json",
            JsonStyle::Ndjson => "ndjson",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use qhp_types::BarRecord;
    use std::io::Cursor;

    fn create_test_series() -> BarSeries {
        BarSeries::from_bars(
            "Si",
            60,
            [
                BarRecord::new(1_583_143_200, 1.5, 2.0, 1.0, 1.75, 10),
                BarRecord::new(1_583_143_260, 1.75, 2.5, 1.5, 2.25, 20),
            ],
        )
    }

    fn render(formatter: &JsonFormatter) -> String {
        let mut output = Cursor::new(Vec::new());
        formatter
            .write_series(&create_test_series(), &mut output)
            .unwrap();
        String::from_utf8(output.into_inner()).unwrap()
    }

    #[test]
    fn test_json_array() {
        let result = render(&JsonFormatter::new());
        assert!(result.starts_with('['));
        assert!(result.contains("\"timestamp\":1583143200"));
        assert!(result.contains("\"close\":1.75"));
    }

    #[test]
    fn test_ndjson() {
        let formatter = JsonFormatter::ndjson();
        let result = render(&formatter);
        let lines: Vec<_> = result.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[1].contains("\"volume\":20"));
        assert_eq!(formatter.extension(), "ndjson");
    }

    #[test]
    fn test_pretty_json() {
        let result = render(&JsonFormatter::new().with_pretty(true));
        assert!(result.contains("  "));
    }
}
