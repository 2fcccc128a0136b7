//! Contract translation errors.

use thiserror::Error;

/// Errors raised while translating contract identifiers.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ContractError {
    /// The identifier does not match the expected pattern.
    #[error("Invalid ticker format: {0}")]
    InvalidTickerFormat(String),

    /// A block-list line is not a valid pattern.
    #[error("Invalid block-list pattern '{pattern}': {reason}")]
    InvalidPattern {
        /// The offending line.
        pattern: String,
        /// Why it was rejected.
        reason: String,
    },
}

impl From<ContractError> for qhp_types::QhpError {
    fn from(error: ContractError) -> Self {
        match error {
            ContractError::InvalidTickerFormat(ticker) => Self::InvalidTickerFormat(ticker),
            other @ ContractError::InvalidPattern { .. } => Self::Config(other.to_string()),
        }
    }
}
