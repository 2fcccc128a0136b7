//! Upload command implementation.

use crate::display::{parse_midnight, parse_timeframe, spinner};
use anyhow::{Context, Result, bail};
use qhp_lib::prelude::*;
use std::path::PathBuf;
use std::time::Duration;

/// Flags of the upload command.
pub(crate) struct UploadParams {
    pub(crate) input: PathBuf,
    pub(crate) archive: String,
    pub(crate) symbol: String,
    pub(crate) timeframe: String,
    pub(crate) delimiter: char,
    pub(crate) time_delta: i64,
    pub(crate) force_from: Option<String>,
    pub(crate) force_to: Option<String>,
    pub(crate) timeout: Duration,
}

/// Upload an interchange file to the history archive.
pub(crate) async fn upload(params: UploadParams, quiet: bool) -> Result<()> {
    let timeframe = parse_timeframe(&params.timeframe)?;
    let start = params.force_from.as_deref().map(parse_midnight).transpose()?;
    let end = params.force_to.as_deref().map(parse_midnight).transpose()?;

    let delimiter = u8::try_from(params.delimiter)
        .ok()
        .filter(u8::is_ascii)
        .with_context(|| format!("Delimiter '{}' is not a single ASCII character", params.delimiter))?;
    let file = CsvReader::new()
        .with_delimiter(delimiter)
        .with_time_delta(params.time_delta)
        .with_timeframe(timeframe)
        .read_path(&params.input)
        .with_context(|| format!("Failed to read {}", params.input.display()))?;
    if file.series.is_empty() {
        bail!("No bars in {}", params.input.display());
    }
    tracing::info!(bars = file.series.len(), input = %params.input.display(), "read file");

    let config = ClientConfig {
        timeout: params.timeout,
        ..ClientConfig::new(&params.archive)
    };
    let mut uploader = HistoryUploader::connect(&config)?;

    let progress = spinner(&format!("Uploading {}", params.symbol), quiet);
    uploader
        .upload_spanning(&params.symbol, &file.series, start, end)
        .await
        .with_context(|| format!("Failed to upload {}", params.symbol))?;
    progress.finish_with_message(format!("Uploaded {} bars", file.series.len()));
    Ok(())
}
