//! History archive upload client.

use bytes::Bytes;
use chrono::{DateTime, NaiveDateTime};
use qhp_types::BarSeries;

use crate::client::{ClientConfig, FetchError, check_status};
use crate::codec::encode_bars;
use crate::request::{UploadRequest, json_frame};
use crate::transport::{TcpTransport, Transport, TransportError};

/// Client storing bar series in the history archive.
#[derive(Debug)]
pub struct HistoryUploader<T = TcpTransport> {
    transport: T,
}

impl HistoryUploader<TcpTransport> {
    /// Creates a TCP uploader from the given configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the endpoint is not usable.
    pub fn connect(config: &ClientConfig) -> Result<Self, TransportError> {
        Ok(Self::new(config.transport()?))
    }
}

impl<T: Transport> HistoryUploader<T> {
    /// Creates an uploader over an existing transport.
    #[must_use]
    pub const fn new(transport: T) -> Self {
        Self { transport }
    }

    /// Returns the underlying transport.
    #[must_use]
    pub const fn transport(&self) -> &T {
        &self.transport
    }

    /// Uploads `series` under `ticker`.
    ///
    /// The request spans the first to the last bar and carries the series
    /// timeframe; the payload is every bar in wire form.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Protocol`] for an empty series (nothing is sent),
    /// or the archive's error if it rejects the upload.
    pub async fn upload(&mut self, ticker: &str, series: &BarSeries) -> Result<(), FetchError> {
        self.upload_spanning(ticker, series, None, None).await
    }

    /// Uploads `series`, overriding the declared start or end of the span.
    ///
    /// A `None` bound falls back to the first or last bar.
    ///
    /// # Errors
    ///
    /// Same as [`upload`](Self::upload).
    pub async fn upload_spanning(
        &mut self,
        ticker: &str,
        series: &BarSeries,
        start: Option<NaiveDateTime>,
        end: Option<NaiveDateTime>,
    ) -> Result<(), FetchError> {
        let (Some(first), Some(last)) = (series.first(), series.last()) else {
            return Err(FetchError::Protocol(format!(
                "refusing to upload empty series for {ticker}"
            )));
        };

        let request = UploadRequest {
            ticker,
            start_time: start.map_or_else(|| naive(first.timestamp), Ok)?,
            end_time: end.map_or_else(|| naive(last.timestamp), Ok)?,
            timeframe_sec: series.timeframe_seconds(),
        };
        let payload = Bytes::from(encode_bars(series.bars()));

        let reply = self
            .transport
            .request(vec![json_frame(&request)?, payload])
            .await?;
        check_status(reply)?;
        Ok(())
    }
}

fn naive(timestamp: i64) -> Result<NaiveDateTime, FetchError> {
    DateTime::from_timestamp(timestamp, 0)
        .map(|dt| dt.naive_utc())
        .ok_or_else(|| FetchError::Protocol(format!("timestamp {timestamp} out of range")))
}
