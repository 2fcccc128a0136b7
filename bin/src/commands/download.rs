//! Download command implementations.
//!
//! Single-symbol downloads and continuous futures downloads, both written to
//! one output file.

use crate::display::{parse_range, parse_timeframe, progress_bar, spinner, write_series};
use crate::{EndpointArgs, OutputArgs};
use anyhow::{Context, Result};
use qhp_lib::prelude::*;

/// Download one symbol.
pub(crate) async fn download(
    symbol: &str,
    from: &str,
    to: &str,
    timeframe: &str,
    endpoint: &EndpointArgs,
    output: &OutputArgs,
    quiet: bool,
) -> Result<()> {
    let range = parse_range(from, to)?;
    let timeframe = parse_timeframe(timeframe)?;
    let mut client = QuoteClient::connect(&endpoint.config())?;

    let progress = spinner(&format!("{symbol} {range}"), quiet);
    let series = download_series(&mut client, &endpoint.retry(), symbol, &range, timeframe)
        .await
        .with_context(|| format!("Failed to download {symbol}"))?;
    progress.finish_with_message(format!("Downloaded {} bars", series.len()));

    write_series(&series, output)?;
    if !quiet {
        println!("Written {} lines to {}", series.len(), output.output.display());
    }
    Ok(())
}

/// Flags of the futures command.
pub(crate) struct FuturesParams {
    pub(crate) base: String,
    pub(crate) from: String,
    pub(crate) to: String,
    pub(crate) timeframe: String,
    pub(crate) interval: u32,
    pub(crate) stitch_delta: i64,
    pub(crate) rescale: Option<u64>,
    pub(crate) replace_ticker: Option<String>,
}

/// Download and stitch every contract of a futures series.
pub(crate) async fn futures(
    params: FuturesParams,
    endpoint: &EndpointArgs,
    output: &OutputArgs,
    quiet: bool,
) -> Result<()> {
    let range = parse_range(&params.from, &params.to)?;
    let symbol: ContinuousSymbol = params
        .base
        .parse()
        .with_context(|| format!("Invalid symbol '{}'", params.base))?;
    let mut request = ContinuousRequest::new(symbol, range, parse_timeframe(&params.timeframe)?)
        .with_interval(params.interval)
        .with_stitch_delta(params.stitch_delta);
    if let Some(seconds) = params.rescale {
        request = request.with_rescale(seconds);
    }

    let contracts = contract_ids(&request.symbol, &range, params.interval);
    anyhow::ensure!(
        !contracts.is_empty(),
        "No contracts for interval {} months",
        params.interval
    );

    let mut client = QuoteClient::connect(&endpoint.config())?;
    let progress = progress_bar(contracts.len() as u64, "contracts", quiet)?;
    let outcome = download_continuous(&mut client, &endpoint.retry(), &request, |contract| {
        progress.set_message(contract.to_string());
        progress.inc(1);
    })
    .await?;

    let finish_msg = if outcome.skipped.is_empty() {
        format!("Stitched {} bars", outcome.series.len())
    } else {
        format!(
            "Stitched {} bars ({} contracts skipped)",
            outcome.series.len(),
            outcome.skipped.len()
        )
    };
    progress.finish_with_message(finish_msg);

    if !quiet {
        for skipped in &outcome.skipped {
            eprintln!("Skipped {}: {}", skipped.ticker, skipped.reason);
        }
    }

    let series = match params.replace_ticker {
        Some(ticker) => outcome.series.with_symbol(ticker),
        None => outcome.series,
    };
    write_series(&series, output)?;
    if !quiet {
        println!("Output written to: {}", output.output.display());
    }
    Ok(())
}
