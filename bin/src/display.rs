//! Display utilities and output formatting for the qhp CLI.

use anyhow::{Context, Result};
use chrono::{NaiveDate, NaiveDateTime};
use clap::ValueEnum;
use indicatif::{ProgressBar, ProgressStyle};
use qhp_lib::prelude::*;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use crate::OutputArgs;

/// Output format for downloaded data.
#[derive(Clone, Copy, ValueEnum)]
pub(crate) enum Format {
    Csv,
    Json,
    Ndjson,
}

impl From<Format> for OutputFormat {
    fn from(format: Format) -> Self {
        match format {
            Format::Csv => Self::Csv,
            Format::Json => Self::Json,
            Format::Ndjson => Self::Ndjson,
        }
    }
}

/// Parses a timeframe flag.
pub(crate) fn parse_timeframe(s: &str) -> Result<Timeframe> {
    s.parse::<Timeframe>().map_err(|e| anyhow::anyhow!("{e}"))
}

/// Parses a `YYYYMMDD` start/end pair.
pub(crate) fn parse_range(from: &str, to: &str) -> Result<DateRange> {
    DateRange::parse_compact(from, to).with_context(|| format!("Invalid range {from} to {to}"))
}

/// Parses a `YYYYMMDD` date as midnight of that day.
pub(crate) fn parse_midnight(s: &str) -> Result<NaiveDateTime> {
    let date = NaiveDate::parse_from_str(s, "%Y%m%d")
        .with_context(|| format!("Invalid date '{s}', expected YYYYMMDD"))?;
    Ok(date.and_time(chrono::NaiveTime::MIN))
}

/// Writes a series to the output file described by `args`.
///
/// Time delta and timezone only apply to the interchange text format; JSON
/// output keeps raw epoch timestamps.
pub(crate) fn write_series(series: &BarSeries, args: &OutputArgs) -> Result<()> {
    let file = File::create(&args.output)
        .with_context(|| format!("Failed to create {}", args.output.display()))?;
    let writer = BufWriter::new(file);

    match OutputFormat::from(args.format) {
        OutputFormat::Csv => {
            let mut formatter = CsvFormatter::new().with_time_delta(args.time_delta);
            if let Some(tz) = &args.timezone {
                formatter = formatter.with_timezone_name(tz)?;
            }
            formatter.write_series(series, writer)?;
        }
        OutputFormat::Json => JsonFormatter::new().write_series(series, writer)?,
        OutputFormat::Ndjson => JsonFormatter::ndjson().write_series(series, writer)?,
    }

    Ok(())
}

/// Writes a series as comma-delimited interchange text.
pub(crate) fn write_interchange(series: &BarSeries, output: &Path) -> Result<()> {
    let file =
        File::create(output).with_context(|| format!("Failed to create {}", output.display()))?;
    CsvFormatter::new().write_series(series, BufWriter::new(file))?;
    Ok(())
}

/// Creates a progress bar over `len` items, hidden in quiet mode.
pub(crate) fn progress_bar(len: u64, unit: &str, quiet: bool) -> Result<ProgressBar> {
    if quiet {
        return Ok(ProgressBar::hidden());
    }
    let pb = ProgressBar::new(len);
    pb.set_style(
        ProgressStyle::default_bar()
            .template(&format!(
                "{{spinner:.green}} [{{elapsed_precise}}] [{{bar:40.cyan/blue}}] {{pos}}/{{len}} {unit} {{msg}}"
            ))?
            .progress_chars("=>-"),
    );
    Ok(pb)
}

/// Creates a spinner for work of unknown length, hidden in quiet mode.
pub(crate) fn spinner(message: &str, quiet: bool) -> ProgressBar {
    if quiet {
        return ProgressBar::hidden();
    }
    let pb = ProgressBar::new_spinner();
    pb.set_message(message.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(120));
    pb
}
