//! Single-symbol and continuous futures downloads.

use qhp_aggregate::{BarAggregator, resample_series};
use qhp_contracts::{ContinuousSymbol, contract_ids};
use qhp_fetch::{QuoteClient, Transport};
use qhp_stitch::StitchPlan;
use qhp_types::{BarSeries, DateRange, Result, Timeframe};
use tracing::{debug, info, warn};

use crate::RetryPolicy;

/// A ticker left out of a batch operation, with the reason.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Skipped {
    /// The ticker or contract id.
    pub ticker: String,
    /// Why it was left out.
    pub reason: String,
}

impl Skipped {
    pub(crate) fn new(ticker: impl Into<String>, reason: impl ToString) -> Self {
        Self {
            ticker: ticker.into(),
            reason: reason.to_string(),
        }
    }
}

/// Downloads one symbol with retry.
///
/// # Errors
///
/// Returns the fetch error once retries are exhausted.
pub async fn download_series<T: Transport>(
    client: &mut QuoteClient<T>,
    retry: &RetryPolicy,
    symbol: &str,
    range: &DateRange,
    timeframe: Timeframe,
) -> Result<BarSeries> {
    info!(symbol, %range, %timeframe, "requesting data");
    let series = retry.fetch(client, symbol, range, timeframe).await?;
    info!(symbol, bars = series.len(), "received data");
    Ok(series)
}

/// Parameters of a continuous futures download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContinuousRequest {
    /// Contract notation: `@Si` requests `SiH0`, `~Si` or plain `Si`
    /// requests `Si-3.20`.
    pub symbol: ContinuousSymbol,
    /// Dates to request for every contract.
    pub range: DateRange,
    /// Bar width to request.
    pub timeframe: Timeframe,
    /// Months between contract expirations.
    pub interval_months: u32,
    /// Days trimmed off each contract's tail before splicing.
    pub stitch_delta_days: i64,
    /// Width in seconds to resample each contract to before stitching.
    pub rescale_seconds: Option<u64>,
}

impl ContinuousRequest {
    /// Creates a request for quarterly contracts with a five-day stitch delta.
    #[must_use]
    pub const fn new(symbol: ContinuousSymbol, range: DateRange, timeframe: Timeframe) -> Self {
        Self {
            symbol,
            range,
            timeframe,
            interval_months: 3,
            stitch_delta_days: 5,
            rescale_seconds: None,
        }
    }

    /// Sets the months between expirations.
    #[must_use]
    pub const fn with_interval(mut self, months: u32) -> Self {
        self.interval_months = months;
        self
    }

    /// Sets the stitch delta in days.
    #[must_use]
    pub const fn with_stitch_delta(mut self, days: i64) -> Self {
        self.stitch_delta_days = days;
        self
    }

    /// Resamples every contract to `seconds` before stitching.
    #[must_use]
    pub const fn with_rescale(mut self, seconds: u64) -> Self {
        self.rescale_seconds = Some(seconds);
        self
    }
}

/// Result of a continuous futures download.
#[derive(Debug, Clone, PartialEq)]
pub struct ContinuousOutcome {
    /// The stitched series, named after the contract base without its
    /// notation prefix.
    pub series: BarSeries,
    /// Every contract id that was requested, in order.
    pub contracts: Vec<String>,
    /// Contracts that contributed nothing, with the reason.
    pub skipped: Vec<Skipped>,
}

/// Downloads every contract in the range and stitches them.
///
/// A contract that fails (after retries) or returns no bars is recorded in
/// [`ContinuousOutcome::skipped`]; the remaining contracts are still
/// stitched. `on_contract` is called before each contract is requested.
///
/// # Errors
///
/// Returns [`QhpError::Config`](qhp_types::QhpError::Config) for a zero
/// rescale width. Fetch failures never abort the download.
pub async fn download_continuous<T: Transport>(
    client: &mut QuoteClient<T>,
    retry: &RetryPolicy,
    request: &ContinuousRequest,
    mut on_contract: impl FnMut(&str),
) -> Result<ContinuousOutcome> {
    if let Some(seconds) = request.rescale_seconds {
        BarAggregator::new(seconds)?;
    }

    let base = request.symbol.base();
    let contracts = contract_ids(&request.symbol, &request.range, request.interval_months);
    info!(symbol = %request.symbol, ?contracts, "enumerated contracts");

    let mut fetched = Vec::with_capacity(contracts.len());
    let mut skipped = Vec::new();
    for contract in &contracts {
        on_contract(contract);
        let series = match retry
            .fetch(client, contract, &request.range, request.timeframe)
            .await
        {
            Ok(series) => series,
            Err(e) => {
                warn!(%contract, error = %e, "skipping contract");
                skipped.push(Skipped::new(contract, e));
                continue;
            }
        };
        if series.is_empty() {
            debug!(%contract, "no data");
            skipped.push(Skipped::new(contract, "no data"));
            continue;
        }

        let series = match request.rescale_seconds {
            Some(seconds) => resample_series(series, seconds)?,
            None => series,
        };
        fetched.push(series);
    }

    let plan = StitchPlan::build(fetched, request.stitch_delta_days);
    for segment in plan.segments() {
        debug!(
            contract = %segment.contract,
            end_date = %segment.end_date,
            bars = segment.series.len(),
            "stitch segment"
        );
    }
    let series = plan.into_series(base);
    info!(base, bars = series.len(), skipped = skipped.len(), "stitched");

    Ok(ContinuousOutcome {
        series,
        contracts,
        skipped,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use qhp_fetch::{ScriptedTransport, encode_bars};
    use qhp_types::{BarRecord, QhpError};
    use serde_json::Value;

    const DAY: i64 = 86_400;
    // 2020-01-01 00:00:00 UTC
    const JAN_1: i64 = 1_577_836_800;

    fn daily_reply(first_day: i64, last_day: i64) -> Vec<Vec<u8>> {
        let bars: Vec<_> = (first_day..=last_day)
            .map(|d| BarRecord::new(JAN_1 + d * DAY, 1.0, 1.0, 1.0, d as f64, 1))
            .collect();
        vec![b"OK".to_vec(), encode_bars(&bars)]
    }

    fn range() -> DateRange {
        DateRange::parse_compact("20200101", "20200520").unwrap()
    }

    fn si() -> ContinuousSymbol {
        "Si".parse().unwrap()
    }

    fn requested_tickers(client: &QuoteClient<ScriptedTransport>) -> Vec<String> {
        client
            .transport()
            .requests()
            .iter()
            .map(|frames| {
                let request: Value = serde_json::from_slice(&frames[0]).unwrap();
                request["ticker"].as_str().unwrap().to_string()
            })
            .collect()
    }

    #[tokio::test]
    async fn test_download_series_retries_timeouts() {
        let transport = ScriptedTransport::new().timeout().reply(daily_reply(0, 2));
        let mut client = QuoteClient::new(transport);

        let series = download_series(
            &mut client,
            &RetryPolicy::immediate(3),
            "SBER",
            &range(),
            Timeframe::Day1,
        )
        .await
        .unwrap();
        assert_eq!(series.len(), 3);
    }

    #[tokio::test]
    async fn test_continuous_skips_failed_contract() {
        // Si-3.20, Si-6.20: the March contract fails, June trades days 0..=150.
        let transport = ScriptedTransport::new()
            .reply([b"ERR".to_vec(), b"no such contract".to_vec()])
            .reply(daily_reply(0, 150));
        let mut client = QuoteClient::new(transport);
        let request = ContinuousRequest::new(si(), range(), Timeframe::Day1).with_stitch_delta(5);

        let mut seen = Vec::new();
        let outcome = download_continuous(&mut client, &RetryPolicy::none(), &request, |c| {
            seen.push(c.to_string());
        })
        .await
        .unwrap();

        assert_eq!(outcome.contracts, vec!["Si-3.20", "Si-6.20"]);
        assert_eq!(seen, outcome.contracts);
        assert_eq!(outcome.skipped.len(), 1);
        assert_eq!(outcome.skipped[0].ticker, "Si-3.20");
        assert_eq!(outcome.skipped[0].reason, "Remote error: no such contract");
        assert_eq!(outcome.series.symbol(), "Si");
        assert_eq!(outcome.series.len(), 146);

        let request: Value =
            serde_json::from_slice(&client.transport().requests()[1][0]).unwrap();
        assert_eq!(request["ticker"], "Si-6.20");
        assert_eq!(request["from"], "2020-01-01T00:00:00");
        assert_eq!(request["timeframe"], "D");
    }

    #[tokio::test]
    async fn test_exchange_notation_requests_exchange_codes() {
        let transport = ScriptedTransport::new()
            .reply(daily_reply(0, 80))
            .reply(daily_reply(60, 150));
        let mut client = QuoteClient::new(transport);
        let symbol: ContinuousSymbol = "@Si".parse().unwrap();
        let request = ContinuousRequest::new(symbol, range(), Timeframe::Day1);

        let outcome = download_continuous(&mut client, &RetryPolicy::none(), &request, |_| {})
            .await
            .unwrap();

        assert_eq!(outcome.contracts, vec!["SiH0", "SiM0"]);
        assert_eq!(requested_tickers(&client), outcome.contracts);
        assert_eq!(outcome.series.symbol(), "Si");
    }

    #[tokio::test]
    async fn test_continuous_stitches_and_rescales() {
        let transport = ScriptedTransport::new()
            .reply(daily_reply(0, 80))
            .reply(daily_reply(60, 150));
        let mut client = QuoteClient::new(transport);
        let request = ContinuousRequest::new(si(), range(), Timeframe::Day1)
            .with_stitch_delta(5)
            .with_rescale(2 * 86_400);

        let outcome = download_continuous(&mut client, &RetryPolicy::none(), &request, |_| {})
            .await
            .unwrap();

        let bars = outcome.series.bars();
        assert!(outcome.skipped.is_empty());
        assert!(bars.windows(2).all(|w| w[0].timestamp < w[1].timestamp));
        assert!(bars.iter().all(|b| b.timestamp % (2 * 86_400) == 0));
        assert!(bars.iter().all(|b| b.volume == 2 || b.volume == 1));
    }

    #[tokio::test]
    async fn test_empty_contracts_are_skipped() {
        let transport = ScriptedTransport::new().reply([b"OK".to_vec()]).reply([b"OK".to_vec()]);
        let mut client = QuoteClient::new(transport);
        let request = ContinuousRequest::new(si(), range(), Timeframe::Day1);

        let outcome = download_continuous(&mut client, &RetryPolicy::none(), &request, |_| {})
            .await
            .unwrap();

        assert!(outcome.series.is_empty());
        assert_eq!(outcome.skipped.len(), 2);
    }

    #[tokio::test]
    async fn test_zero_rescale_rejected_before_fetching() {
        let mut client = QuoteClient::new(ScriptedTransport::new());
        let request = ContinuousRequest::new(si(), range(), Timeframe::Day1).with_rescale(0);

        let err = download_continuous(&mut client, &RetryPolicy::none(), &request, |_| {})
            .await
            .unwrap_err();

        assert!(matches!(err, QhpError::Config(_)));
        assert!(client.transport().requests().is_empty());
    }
}
