//! Quote store client.

use bytes::Bytes;
use qhp_types::{BarSeries, DateRange, QhpError, Timeframe};
use std::time::Duration;
use thiserror::Error;

use crate::codec::{DecodeError, decode_bars};
use crate::request::{FetchRequest, STATUS_OK, SecurityListRequest, json_frame};
use crate::transport::{TcpTransport, Transport, TransportError};

/// Configuration for a quote store connection.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Endpoint, `tcp://host:port` or `host:port`.
    pub endpoint: String,
    /// Deadline for one request/reply exchange.
    pub timeout: Duration,
    /// Deadline for establishing the connection.
    pub connect_timeout: Duration,
}

impl ClientConfig {
    /// Creates a configuration for `endpoint` with default deadlines.
    #[must_use]
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            ..Default::default()
        }
    }

    /// Opens a TCP transport for this configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the endpoint is not usable.
    pub fn transport(&self) -> Result<TcpTransport, TransportError> {
        TcpTransport::new(&self.endpoint, self.timeout, self.connect_timeout)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoint: "tcp://127.0.0.1:5555".to_string(),
            timeout: Duration::from_secs(60),
            connect_timeout: Duration::from_secs(10),
        }
    }
}

/// Errors that can occur while talking to the quote store or archive.
#[derive(Error, Debug)]
pub enum FetchError {
    /// No reply within the channel deadline.
    #[error("Request timed out")]
    Timeout,

    /// The far end reported a failure.
    #[error("Remote error: {0}")]
    Remote(String),

    /// A payload frame did not hold whole bar records.
    #[error(transparent)]
    Malformed(#[from] DecodeError),

    /// The channel failed for a reason other than a timeout.
    #[error("Transport error: {0}")]
    Transport(TransportError),

    /// The reply did not follow the expected frame layout.
    #[error("Protocol error: {0}")]
    Protocol(String),

    /// Request serialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl FetchError {
    /// Returns true if repeating the same request may succeed.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Timeout | Self::Transport(_))
    }
}

impl From<TransportError> for FetchError {
    fn from(error: TransportError) -> Self {
        match error {
            TransportError::Timeout(_) => Self::Timeout,
            other => Self::Transport(other),
        }
    }
}

impl From<FetchError> for QhpError {
    fn from(error: FetchError) -> Self {
        match error {
            FetchError::Timeout => Self::Timeout,
            FetchError::Remote(message) => Self::RemoteError(message),
            FetchError::Malformed(e) => Self::MalformedRecord(e.to_string()),
            FetchError::Transport(e) => Self::Transport(e.to_string()),
            FetchError::Protocol(message) => Self::Transport(message),
            FetchError::Json(e) => Self::Json(e),
        }
    }
}

impl From<TransportError> for QhpError {
    fn from(error: TransportError) -> Self {
        FetchError::from(error).into()
    }
}

/// Splits a reply into its status and body, rejecting non-`OK` replies.
///
/// An error reply carries its message in the frame after the status; if there
/// is none, the status frame itself is the message. Body frames of an error
/// reply are never inspected.
pub(crate) fn check_status(mut reply: Vec<Bytes>) -> Result<Vec<Bytes>, FetchError> {
    if reply.is_empty() {
        return Err(FetchError::Protocol("empty reply".to_string()));
    }
    let status = reply.remove(0);
    if status.as_ref() != STATUS_OK {
        let message = reply.first().unwrap_or(&status);
        return Err(FetchError::Remote(
            String::from_utf8_lossy(message).into_owned(),
        ));
    }
    Ok(reply)
}

/// Client for the quote history store.
///
/// The client issues one request at a time and never retries; retry policy
/// belongs to the caller.
#[derive(Debug)]
pub struct QuoteClient<T = TcpTransport> {
    transport: T,
}

impl QuoteClient<TcpTransport> {
    /// Creates a TCP client from the given configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the endpoint is not usable.
    pub fn connect(config: &ClientConfig) -> Result<Self, TransportError> {
        Ok(Self::new(config.transport()?))
    }
}

impl<T: Transport> QuoteClient<T> {
    /// Creates a client over an existing transport.
    #[must_use]
    pub const fn new(transport: T) -> Self {
        Self { transport }
    }

    /// Returns the underlying transport.
    #[must_use]
    pub const fn transport(&self) -> &T {
        &self.transport
    }

    /// Fetches the bars of `symbol` for `range` at the given timeframe.
    ///
    /// Payload frames are decoded in order and concatenated. Timestamps are
    /// returned exactly as the store sent them.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Remote`] if the store rejects the request,
    /// [`FetchError::Malformed`] if a payload frame is not a whole number of
    /// records, or [`FetchError::Timeout`] if no reply arrives in time.
    pub async fn fetch(
        &mut self,
        symbol: &str,
        range: &DateRange,
        timeframe: Timeframe,
    ) -> Result<BarSeries, FetchError> {
        let request = FetchRequest {
            ticker: symbol,
            from: range.from_datetime(),
            to: range.to_datetime(),
            timeframe,
        };
        let reply = self.transport.request(vec![json_frame(&request)?]).await?;
        let payload = check_status(reply)?;

        let mut series = BarSeries::new(symbol, timeframe.seconds());
        for frame in &payload {
            series.extend(decode_bars(frame)?);
        }
        Ok(series)
    }

    /// Fetches the list of securities known to the store.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the list is not valid UTF-8.
    pub async fn security_list(&mut self) -> Result<Vec<String>, FetchError> {
        let reply = self
            .transport
            .request(vec![json_frame(&SecurityListRequest::default())?])
            .await?;
        let body = check_status(reply)?.concat();
        let text = String::from_utf8(body)
            .map_err(|e| FetchError::Protocol(format!("security list is not UTF-8: {e}")))?;

        Ok(text
            .split(',')
            .map(str::trim)
            .filter(|ticker| !ticker.is_empty())
            .map(str::to_string)
            .collect())
    }
}
