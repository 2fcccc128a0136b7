//! Synchronous request/response transport.

use async_trait::async_trait;
use bytes::Bytes;
use std::collections::VecDeque;
use std::time::Duration;
use thiserror::Error;
use tokio::io::BufStream;
use tokio::net::TcpStream;

use crate::frame::{read_message, write_message};

/// Errors raised by a transport.
#[derive(Error, Debug)]
pub enum TransportError {
    /// No reply arrived before the deadline.
    #[error("No reply within {0:?}")]
    Timeout(Duration),

    /// Socket-level failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Endpoint string could not be used.
    #[error("Unsupported endpoint: {0}")]
    InvalidEndpoint(String),
}

/// A channel carrying one multipart request and one multipart reply at a time.
///
/// Implementations must not pipeline: `request` returns only after the reply
/// to this request has been received or the attempt has failed.
#[async_trait]
pub trait Transport: Send {
    /// Sends `frames` and waits for the reply.
    ///
    /// # Errors
    ///
    /// Returns an error if the reply does not arrive or the channel fails.
    async fn request(&mut self, frames: Vec<Bytes>) -> Result<Vec<Bytes>, TransportError>;
}

/// TCP transport using length-prefixed multipart messages.
///
/// The connection is opened lazily. After a timeout or I/O failure it is
/// dropped and re-opened on the next request, since a lost reply leaves the
/// stream out of step.
#[derive(Debug)]
pub struct TcpTransport {
    address: String,
    timeout: Duration,
    connect_timeout: Duration,
    stream: Option<BufStream<TcpStream>>,
}

impl TcpTransport {
    /// Creates a transport for `endpoint` (`tcp://host:port` or `host:port`).
    ///
    /// # Errors
    ///
    /// Returns an error if the endpoint uses a scheme other than `tcp`.
    pub fn new(
        endpoint: &str,
        timeout: Duration,
        connect_timeout: Duration,
    ) -> Result<Self, TransportError> {
        Ok(Self {
            address: parse_endpoint(endpoint)?,
            timeout,
            connect_timeout,
            stream: None,
        })
    }

    /// Returns the `host:port` this transport connects to.
    #[must_use]
    pub fn address(&self) -> &str {
        &self.address
    }

    async fn connect(&self) -> Result<BufStream<TcpStream>, TransportError> {
        let stream = tokio::time::timeout(self.connect_timeout, TcpStream::connect(&self.address))
            .await
            .map_err(|_| TransportError::Timeout(self.connect_timeout))??;
        stream.set_nodelay(true)?;
        Ok(BufStream::new(stream))
    }

    async fn exchange(&mut self, frames: &[Bytes]) -> Result<Vec<Bytes>, TransportError> {
        let stream = match self.stream.take() {
            Some(stream) => stream,
            None => self.connect().await?,
        };
        let stream = self.stream.insert(stream);
        write_message(stream, frames).await?;
        Ok(read_message(stream).await?)
    }
}

#[async_trait]
impl Transport for TcpTransport {
    async fn request(&mut self, frames: Vec<Bytes>) -> Result<Vec<Bytes>, TransportError> {
        let deadline = self.timeout;
        let result = tokio::time::timeout(deadline, self.exchange(&frames))
            .await
            .unwrap_or(Err(TransportError::Timeout(deadline)));
        if result.is_err() {
            self.stream = None;
        }
        result
    }
}

fn parse_endpoint(endpoint: &str) -> Result<String, TransportError> {
    let address = match endpoint.split_once("://") {
        Some(("tcp", rest)) => rest,
        Some(_) => return Err(TransportError::InvalidEndpoint(endpoint.to_string())),
        None => endpoint,
    };
    if address.is_empty() || !address.contains(':') {
        return Err(TransportError::InvalidEndpoint(endpoint.to_string()));
    }
    Ok(address.to_string())
}

/// In-memory transport replaying canned replies.
///
/// Every request is recorded; replies are served in order. Once the script
/// runs out, requests time out.
#[derive(Debug, Default)]
pub struct ScriptedTransport {
    replies: VecDeque<Result<Vec<Bytes>, TransportError>>,
    requests: Vec<Vec<Bytes>>,
}

impl ScriptedTransport {
    /// Creates an empty script.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a reply made of the given frames.
    #[must_use]
    pub fn reply<I, F>(mut self, frames: I) -> Self
    where
        I: IntoIterator<Item = F>,
        F: Into<Bytes>,
    {
        self.replies
            .push_back(Ok(frames.into_iter().map(Into::into).collect()));
        self
    }

    /// Queues a timeout.
    #[must_use]
    pub fn timeout(mut self) -> Self {
        self.replies
            .push_back(Err(TransportError::Timeout(Duration::ZERO)));
        self
    }

    /// Returns every request received so far.
    #[must_use]
    pub fn requests(&self) -> &[Vec<Bytes>] {
        &self.requests
    }

    /// Returns the number of replies not yet served.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.replies.len()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn request(&mut self, frames: Vec<Bytes>) -> Result<Vec<Bytes>, TransportError> {
        self.requests.push(frames);
        self.replies
            .pop_front()
            .unwrap_or(Err(TransportError::Timeout(Duration::ZERO)))
    }
}
