//! Continuous futures stitching for the qhp quote history client.
//!
//! - [`StitchPlan`] - Trimmed per-contract segments ordered by cutoff date
//! - [`stitch`] - One-call trim, order and splice
//!
//! # Example
//!
//! ```
//! use qhp_stitch::stitch;
//! use qhp_types::BarSeries;
//!
//! let continuous = stitch("Si", Vec::<BarSeries>::new(), 5);
//! assert!(continuous.is_empty());
//! ```

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/qhp/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod plan;

pub use plan::{StitchPlan, StitchSegment, stitch};
