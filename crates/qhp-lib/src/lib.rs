//! Quote history download, continuous futures stitching and archive transfer.
//!
//! This is a facade crate that re-exports functionality from the qhp
//! workspace crates and adds the orchestration composing them.
//!
//! # Quick Start
//!
//! ```no_run
//! use qhp_lib::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
//!     let mut client = QuoteClient::connect(&ClientConfig::new("tcp://127.0.0.1:5555"))?;
//!     let range = DateRange::parse_compact("20200101", "20201231")?;
//!
//!     let request = ContinuousRequest::new("@Si".parse()?, range, Timeframe::Hour1);
//!     let outcome =
//!         download_continuous(&mut client, &RetryPolicy::default(), &request, |_| {}).await?;
//!     println!("{} bars, {} contracts skipped", outcome.series.len(), outcome.skipped.len());
//!
//!     Ok(())
//! }
//! ```

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/qhp/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod download;
mod files;
mod retry;
mod transfer;

pub use download::{
    ContinuousOutcome, ContinuousRequest, Skipped, download_continuous, download_series,
};
pub use files::{StitchedFiles, stitch_directory};
pub use retry::RetryPolicy;
pub use transfer::{
    DEFAULT_EXCHANGE_PREFIX, TransferReport, TransferRequest, Uploaded, transfer,
};

// Re-export core types
pub use qhp_types::*;

pub use qhp_aggregate::{AggregateError, BarAggregator, resample, resample_series};
pub use qhp_contracts::{
    Blocklist, BlocklistLoadError, ContinuousSymbol, ContractError, ContractToken, contract_ids,
    contract_tokens,
    parse_contract_id, resolve_continuous_symbol,
};
pub use qhp_fetch::{
    ClientConfig, DecodeError, FetchError, HistoryUploader, QuoteClient, TcpTransport, Transport,
    TransportError,
};
pub use qhp_format::{
    CsvFormatter, CsvReader, FormatError, Formatter, InterchangeFile, JsonFormatter, OutputFormat,
};
pub use qhp_stitch::{StitchPlan, StitchSegment, stitch};

/// Prelude module for convenient imports.
///
/// ```
/// use qhp_lib::prelude::*;
/// ```
pub mod prelude {
    pub use qhp_types::{
        BarRecord, BarSeries, DateRange, DateRangeError, QhpError, Result, Timeframe,
    };

    pub use qhp_contracts::{Blocklist, ContinuousSymbol, contract_ids};
    pub use qhp_fetch::{ClientConfig, HistoryUploader, QuoteClient};
    pub use qhp_format::{CsvFormatter, CsvReader, Formatter, JsonFormatter, OutputFormat};
    pub use qhp_stitch::stitch;

    pub use crate::{
        ContinuousRequest, RetryPolicy, TransferRequest, download_continuous, download_series,
        stitch_directory, transfer,
    };
}
