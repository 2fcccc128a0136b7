//! Bar timeframe resampling for the qhp quote history client.
//!
//! This crate provides bar-to-bar aggregation:
//!
//! - [`BarAggregator`] - Streaming resampler into epoch-aligned buckets
//! - [`resample`] / [`resample_series`] - One-shot folds over a whole run

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/qhp/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod aggregator;

pub use aggregator::{AggregateError, BarAggregator, resample, resample_series};
