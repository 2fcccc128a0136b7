//! Interchange and JSON formats for qhp bar series.
//!
//! - [`CsvFormatter`] - Delimited interchange text with display timezone and time delta
//! - [`CsvReader`] - Parses interchange text, including `;`-delimited exporter files
//! - [`JsonFormatter`] - JSON array or NDJSON

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/qhp/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod csv;
mod formatter;
mod json;
mod reader;

pub use crate::csv::{CsvFormatter, INTERCHANGE_COLUMNS};
pub use formatter::{FormatError, Formatter, OutputFormat};
pub use json::{JsonFormatter, JsonStyle};
pub use reader::{CsvReader, InterchangeFile};
