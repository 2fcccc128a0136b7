//! Wire codec, transport and clients for the qhp quote history client.
//!
//! This crate provides the request/response pipeline:
//!
//! - [`codec`] - Binary bar record encoding and decoding
//! - [`frame`] - Multipart message framing over a byte stream
//! - [`Transport`] - One-request-one-reply channel, with a TCP implementation
//! - [`QuoteClient`] - Fetches bar series and the security list
//! - [`HistoryUploader`] - Stores bar series in the history archive

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/qhp/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod client;
pub mod codec;
pub mod frame;
pub mod request;
mod transport;
mod upload;

pub use client::{ClientConfig, FetchError, QuoteClient};
pub use codec::{BAR_RECORD_SIZE, Bars, DecodeError, decode_bars, encode_bar, encode_bars};
pub use transport::{ScriptedTransport, TcpTransport, Transport, TransportError};
pub use upload::HistoryUploader;
