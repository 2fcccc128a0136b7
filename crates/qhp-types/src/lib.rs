//! Core types for the qhp quote history client.
//!
//! This crate provides the fundamental data structures used throughout qhp:
//!
//! - [`BarRecord`] - A single OHLCV price bar with an epoch timestamp
//! - [`BarSeries`] - An ordered, de-duplicated series of bars for one symbol
//! - [`Timeframe`] - Bar width as understood by the quote store
//! - [`DateRange`] - Date range for data retrieval

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/qhp/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod bar;
mod date_range;
mod error;
mod series;
mod timeframe;

pub use bar::BarRecord;
pub use date_range::{DateRange, MonthIterator};
pub use error::{DateRangeError, QhpError, Result};
pub use series::BarSeries;
pub use timeframe::{Timeframe, TimeframeParseError};
