//! Transfer command implementation.

use crate::EndpointArgs;
use crate::display::{parse_range, parse_timeframe, progress_bar};
use anyhow::{Context, Result};
use qhp_lib::prelude::*;
use std::path::PathBuf;

/// Flags of the transfer command.
pub(crate) struct TransferParams {
    pub(crate) archive: String,
    pub(crate) from: String,
    pub(crate) to: String,
    pub(crate) timeframe: String,
    pub(crate) time_delta: i64,
    pub(crate) blocklist: Option<PathBuf>,
    pub(crate) exchange_prefix: String,
}

/// Copy every security from the quote store into the history archive.
pub(crate) async fn transfer(params: TransferParams, endpoint: &EndpointArgs, quiet: bool) -> Result<()> {
    let range = parse_range(&params.from, &params.to)?;
    let blocklist = match &params.blocklist {
        Some(path) => Blocklist::load(path)
            .with_context(|| format!("Failed to load block list {}", path.display()))?,
        None => Blocklist::new(),
    };
    let request = TransferRequest::new(range, parse_timeframe(&params.timeframe)?)
        .with_blocklist(blocklist)
        .with_exchange_prefix(params.exchange_prefix)
        .with_time_delta(params.time_delta);

    let mut source = QuoteClient::connect(&endpoint.config())?;
    let archive_config = ClientConfig {
        timeout: endpoint.config().timeout,
        ..ClientConfig::new(&params.archive)
    };
    let mut sink = HistoryUploader::connect(&archive_config)?;

    // The security list length is only known once the run starts.
    let progress = progress_bar(0, "tickers", quiet)?;
    let report = qhp_lib::transfer(&mut source, &mut sink, &endpoint.retry(), &request, |ticker| {
        progress.inc_length(1);
        progress.inc(1);
        progress.set_message(ticker.to_string());
    })
    .await?;

    progress.finish_with_message(format!(
        "Uploaded {}, blocked {}, skipped {}",
        report.uploaded.len(),
        report.blocked.len(),
        report.skipped.len()
    ));

    if !quiet {
        for uploaded in &report.uploaded {
            println!("{} -> {} ({} bars)", uploaded.source, uploaded.target, uploaded.bars);
        }
        for skipped in &report.skipped {
            eprintln!("Skipped {}: {}", skipped.ticker, skipped.reason);
        }
    }
    Ok(())
}
