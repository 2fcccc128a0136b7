//! Ticker block lists.

use regex::Regex;
use std::path::Path;

use crate::ContractError;

/// A set of patterns excluding tickers from processing.
///
/// Each pattern is a regular expression matched at the start of the ticker,
/// so `SPBFUT#` blocks every ticker beginning with that prefix.
#[derive(Debug, Clone, Default)]
pub struct Blocklist {
    patterns: Vec<Regex>,
}

impl Blocklist {
    /// Creates an empty block list that allows everything.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            patterns: Vec::new(),
        }
    }

    /// Builds a block list from pattern lines; blank lines are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`ContractError::InvalidPattern`] for a line that is not a
    /// valid regular expression.
    pub fn from_lines<I, S>(lines: I) -> Result<Self, ContractError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut patterns = Vec::new();
        for line in lines {
            let line = line.as_ref().trim();
            if line.is_empty() {
                continue;
            }
            let regex = Regex::new(&format!("^(?:{line})")).map_err(|e| {
                ContractError::InvalidPattern {
                    pattern: line.to_string(),
                    reason: e.to_string(),
                }
            })?;
            patterns.push(regex);
        }
        Ok(Self { patterns })
    }

    /// Reads a block-list file, one pattern per line.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or holds an invalid pattern.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, BlocklistLoadError> {
        let text = std::fs::read_to_string(path)?;
        Ok(Self::from_lines(text.lines())?)
    }

    /// Returns true if no pattern matches `ticker`.
    #[must_use]
    pub fn allows(&self, ticker: &str) -> bool {
        !self.patterns.iter().any(|rx| rx.is_match(ticker))
    }

    /// Returns the number of patterns.
    #[must_use]
    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    /// Returns true if the list has no patterns.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}

/// Errors raised while loading a block-list file.
#[derive(thiserror::Error, Debug)]
pub enum BlocklistLoadError {
    /// The file could not be read.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A line is not a valid pattern.
    #[error(transparent)]
    Pattern(#[from] ContractError),
}

impl From<BlocklistLoadError> for qhp_types::QhpError {
    fn from(error: BlocklistLoadError) -> Self {
        match error {
            BlocklistLoadError::Io(e) => Self::Io(e),
            BlocklistLoadError::Pattern(e) => e.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_empty_allows_everything() {
        let list = Blocklist::new();
        assert!(list.allows("anything"));
        assert!(list.is_empty());
    }

    #[test]
    fn test_matches_are_anchored_at_start() {
        let list = Blocklist::from_lines(["SPBFUT#", "", "  ", "GAZ.?P"]).unwrap();

        assert_eq!(list.len(), 2);
        assert!(!list.allows("SPBFUT#SiH0"));
        assert!(!list.allows("GAZP"));
        assert!(list.allows("XSPBFUT#SiH0"));
        assert!(list.allows("SBER"));
    }

    #[test]
    fn test_invalid_pattern() {
        let err = Blocklist::from_lines(["ok", "(unclosed"]).unwrap_err();
        assert!(matches!(err, ContractError::InvalidPattern { ref pattern, .. } if pattern == "(unclosed"));
    }

    #[test]
    fn test_load_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "SPBOPT#").unwrap();
        writeln!(file).unwrap();
        writeln!(file, "TEST.*").unwrap();

        let list = Blocklist::load(file.path()).unwrap();
        assert_eq!(list.len(), 2);
        assert!(!list.allows("SPBOPT#Si65000BC0"));
        assert!(!list.allows("TESTING"));
        assert!(list.allows("SPBFUT#SiH0"));
    }
}
