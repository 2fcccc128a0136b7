//! Quote store to history archive transfer.

use qhp_contracts::{Blocklist, resolve_continuous_symbol};
use qhp_fetch::{HistoryUploader, QuoteClient, Transport};
use qhp_types::{DateRange, Result, Timeframe};
use tracing::{debug, info, warn};

use crate::{RetryPolicy, Skipped};

/// Prefix of exchange-coded futures tickers in the quote store.
pub const DEFAULT_EXCHANGE_PREFIX: &str = "SPBFUT#";

/// Parameters of a transfer run.
#[derive(Debug, Clone)]
pub struct TransferRequest {
    /// Dates to request for every ticker.
    pub range: DateRange,
    /// Bar width to request and upload.
    pub timeframe: Timeframe,
    /// Tickers matching any pattern are not transferred.
    pub blocklist: Blocklist,
    /// Tickers with this prefix carry exchange codes and are renamed to
    /// dashed contract ids before upload, `SPBFUT#SiH0` becoming
    /// `SPBFUT#Si-3.20`.
    ///
    /// Archives filled by older tooling key the same contract as
    /// `SPBFUT#Si.3-20`; series stored under that form are not found under
    /// the dashed id.
    pub exchange_prefix: String,
    /// Seconds added to every bar timestamp before upload.
    pub time_delta_secs: i64,
}

impl TransferRequest {
    /// Creates a request with an empty block list and the default prefix.
    #[must_use]
    pub fn new(range: DateRange, timeframe: Timeframe) -> Self {
        Self {
            range,
            timeframe,
            blocklist: Blocklist::new(),
            exchange_prefix: DEFAULT_EXCHANGE_PREFIX.to_string(),
            time_delta_secs: 0,
        }
    }

    /// Sets the block list.
    #[must_use]
    pub fn with_blocklist(mut self, blocklist: Blocklist) -> Self {
        self.blocklist = blocklist;
        self
    }

    /// Sets the exchange-code prefix.
    #[must_use]
    pub fn with_exchange_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.exchange_prefix = prefix.into();
        self
    }

    /// Sets the time delta in seconds.
    #[must_use]
    pub const fn with_time_delta(mut self, seconds: i64) -> Self {
        self.time_delta_secs = seconds;
        self
    }

    fn archive_ticker(&self, ticker: &str, last_bar_date: chrono::NaiveDate) -> Result<String> {
        if self.exchange_prefix.is_empty() || !ticker.starts_with(&self.exchange_prefix) {
            return Ok(ticker.to_string());
        }
        Ok(resolve_continuous_symbol(ticker, last_bar_date)?.to_string())
    }
}

/// One ticker stored in the archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Uploaded {
    /// Ticker in the quote store.
    pub source: String,
    /// Ticker the archive stored it under.
    pub target: String,
    /// Number of bars uploaded.
    pub bars: usize,
}

/// What a transfer run did with each ticker.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransferReport {
    /// Tickers stored in the archive.
    pub uploaded: Vec<Uploaded>,
    /// Tickers matched by the block list.
    pub blocked: Vec<String>,
    /// Tickers that failed or had no data.
    pub skipped: Vec<Skipped>,
}

/// Copies every listed security from the quote store into the archive.
///
/// Each ticker is handled on its own: a failed fetch, an empty series, an
/// unresolvable exchange code or a rejected upload is recorded in the
/// report and the run moves on. `on_ticker` is called for every listed
/// ticker before anything else happens to it. Exchange-coded tickers are
/// stored under their dashed id, see [`TransferRequest::exchange_prefix`].
///
/// # Errors
///
/// Returns an error only if the security list cannot be retrieved.
pub async fn transfer<Q: Transport, H: Transport>(
    source: &mut QuoteClient<Q>,
    sink: &mut HistoryUploader<H>,
    retry: &RetryPolicy,
    request: &TransferRequest,
    mut on_ticker: impl FnMut(&str),
) -> Result<TransferReport> {
    let tickers = source.security_list().await?;
    info!(count = tickers.len(), "got security list");

    let mut report = TransferReport::default();
    for ticker in tickers {
        on_ticker(&ticker);
        if !request.blocklist.allows(&ticker) {
            debug!(%ticker, "blocked");
            report.blocked.push(ticker);
            continue;
        }

        let mut series = match retry
            .fetch(source, &ticker, &request.range, request.timeframe)
            .await
        {
            Ok(series) => series,
            Err(e) => {
                warn!(%ticker, error = %e, "fetch failed");
                report.skipped.push(Skipped::new(ticker, e));
                continue;
            }
        };
        series.shift(request.time_delta_secs);
        let Some(last) = series.last() else {
            debug!(%ticker, "no data");
            report.skipped.push(Skipped::new(ticker, "no data"));
            continue;
        };

        let target = match request.archive_ticker(&ticker, last.date()) {
            Ok(target) => target,
            Err(e) => {
                warn!(%ticker, error = %e, "cannot resolve contract");
                report.skipped.push(Skipped::new(ticker, e));
                continue;
            }
        };

        info!(%ticker, %target, bars = series.len(), "uploading");
        match sink.upload(&target, &series).await {
            Ok(()) => report.uploaded.push(Uploaded {
                source: ticker,
                target,
                bars: series.len(),
            }),
            Err(e) => {
                warn!(%ticker, %target, error = %e, "upload failed");
                report.skipped.push(Skipped::new(ticker, e));
            }
        }
    }

    info!(
        uploaded = report.uploaded.len(),
        blocked = report.blocked.len(),
        skipped = report.skipped.len(),
        "transfer finished"
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use qhp_fetch::{ScriptedTransport, decode_bars, encode_bars};
    use qhp_types::{BarRecord, QhpError};
    use serde_json::Value;

    // 2020-02-03 10:00:00 UTC
    const FEB_3: i64 = 1_580_724_000;

    fn bars_reply() -> Vec<Vec<u8>> {
        let bars = [
            BarRecord::new(FEB_3, 1.0, 2.0, 0.5, 1.5, 10),
            BarRecord::new(FEB_3 + 60, 1.5, 2.5, 1.0, 2.0, 20),
        ];
        vec![b"OK".to_vec(), encode_bars(&bars)]
    }

    fn request() -> TransferRequest {
        let range = DateRange::parse_compact("20200101", "20200301").unwrap();
        TransferRequest::new(range, Timeframe::Minute1)
    }

    #[tokio::test]
    async fn test_transfer_report() {
        let source = ScriptedTransport::new()
            .reply([&b"OK"[..], &b"SPBFUT#SiH0,SBER,SPBOPT#Si65000BC0,GAZP,SPBFUT#X"[..]])
            .reply(bars_reply())
            .timeout()
            .timeout()
            .reply([b"OK".to_vec()])
            .reply(bars_reply());
        let mut source = QuoteClient::new(source);
        let mut sink = HistoryUploader::new(ScriptedTransport::new().reply([b"OK".to_vec()]));
        let request = request()
            .with_blocklist(Blocklist::from_lines(["SPBOPT#"]).unwrap())
            .with_time_delta(3600);

        let mut seen = 0;
        let report = transfer(
            &mut source,
            &mut sink,
            &RetryPolicy::immediate(2),
            &request,
            |_| seen += 1,
        )
        .await
        .unwrap();

        assert_eq!(seen, 5);
        assert_eq!(
            report.uploaded,
            vec![Uploaded {
                source: "SPBFUT#SiH0".to_string(),
                target: "SPBFUT#Si-3.20".to_string(),
                bars: 2,
            }]
        );
        assert_eq!(report.blocked, vec!["SPBOPT#Si65000BC0"]);

        let skipped: Vec<_> = report.skipped.iter().map(|s| s.ticker.as_str()).collect();
        assert_eq!(skipped, vec!["SBER", "GAZP", "SPBFUT#X"]);
        assert_eq!(report.skipped[0].reason, "Request timed out");
        assert_eq!(report.skipped[1].reason, "no data");
        assert!(report.skipped[2].reason.starts_with("Invalid ticker format"));

        let upload = &sink.transport().requests()[0];
        let header: Value = serde_json::from_slice(&upload[0]).unwrap();
        assert_eq!(header["ticker"], "SPBFUT#Si-3.20");
        assert_eq!(header["start_time"], "2020-02-03T11:00:00");
        assert_eq!(header["timeframe_sec"], 60);
        let first = decode_bars(&upload[1]).unwrap().next().unwrap();
        assert_eq!(first.timestamp, FEB_3 + 3600);
    }

    #[tokio::test]
    async fn test_rejected_upload_is_recorded() {
        let source = ScriptedTransport::new()
            .reply([&b"OK"[..], &b"SBER"[..]])
            .reply(bars_reply());
        let mut source = QuoteClient::new(source);
        let sink = ScriptedTransport::new().reply([b"ERR".to_vec(), b"disk full".to_vec()]);
        let mut sink = HistoryUploader::new(sink);

        let report = transfer(&mut source, &mut sink, &RetryPolicy::none(), &request(), |_| {})
            .await
            .unwrap();

        assert!(report.uploaded.is_empty());
        assert_eq!(report.skipped[0].reason, "Remote error: disk full");
    }

    #[tokio::test]
    async fn test_security_list_failure_aborts() {
        let source = ScriptedTransport::new().reply([b"ERR".to_vec(), b"busy".to_vec()]);
        let mut source = QuoteClient::new(source);
        let mut sink = HistoryUploader::new(ScriptedTransport::new());

        let err = transfer(&mut source, &mut sink, &RetryPolicy::none(), &request(), |_| {})
            .await
            .unwrap_err();
        assert!(matches!(err, QhpError::RemoteError(ref m) if m == "busy"));
    }

    #[test]
    fn test_plain_tickers_keep_their_name() {
        let date = chrono::NaiveDate::from_ymd_opt(2020, 2, 3).unwrap();
        let request = request();
        assert_eq!(request.archive_ticker("SBER", date).unwrap(), "SBER");
        assert_eq!(
            request.archive_ticker("SPBFUT#RIZ9", date).unwrap(),
            "SPBFUT#RI-12.29"
        );
        let unprefixed = request.with_exchange_prefix("");
        assert_eq!(unprefixed.archive_ticker("SPBFUT#RIZ9", date).unwrap(), "SPBFUT#RIZ9");
    }
}
