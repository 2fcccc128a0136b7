//! Futures contract code translation for the qhp quote history client.
//!
//! Contracts are named two ways:
//!
//! - dashed ids, `BASE-MONTH.YEAR` (e.g. `Si-3.20`), parsed into a
//!   [`ContractToken`]
//! - exchange codes, `BASE` + month letter + last year digit (e.g. `SiH0`)
//!
//! # Example
//!
//! ```
//! use qhp_contracts::{ContinuousSymbol, parse_contract_id};
//!
//! let token = parse_contract_id("Si-3.20").unwrap();
//! let symbol: ContinuousSymbol = "@Si".parse().unwrap();
//! assert_eq!(symbol.render(&token), "SiH0");
//! ```

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/qhp/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod blocklist;
mod enumerate;
mod error;
mod month_code;
mod resolve;
mod symbol;
mod token;

pub use blocklist::{Blocklist, BlocklistLoadError};
pub use enumerate::{contract_ids, contract_tokens};
pub use error::ContractError;
pub use month_code::{MONTH_CODES, code_to_month, month_to_code};
pub use resolve::resolve_continuous_symbol;
pub use symbol::{ContinuousSymbol, to_canonical_dashed, to_exchange_code};
pub use token::{ContractToken, parse_contract_id};
