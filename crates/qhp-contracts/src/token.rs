//! Dashed contract identifiers.

use regex::Regex;
use std::sync::OnceLock;

use crate::ContractError;

static CONTRACT_ID: OnceLock<Regex> = OnceLock::new();

fn contract_id_pattern() -> &'static Regex {
    CONTRACT_ID.get_or_init(|| {
        Regex::new(r"^(?P<base>.+)-(?P<month>\d{1,2})\.(?P<year>\d{1,4})$")
            .expect("contract id pattern is valid")
    })
}

/// Parsed identity of one exchange contract.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ContractToken {
    /// Underlying symbol.
    pub base: String,
    /// Expiration month, 1..=12.
    pub month: u32,
    /// Year as written in the identifier (usually two digits).
    pub year_suffix: u32,
}

impl ContractToken {
    /// Returns the last digit of the year, as used in exchange codes.
    #[must_use]
    pub const fn year_digit(&self) -> u32 {
        self.year_suffix % 10
    }
}

impl std::fmt::Display for ContractToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}.{:02}", self.base, self.month, self.year_suffix)
    }
}

/// Parses a `BASE-MONTH.YEAR` contract identifier.
///
/// # Errors
///
/// Returns [`ContractError::InvalidTickerFormat`] if the identifier does not
/// match the pattern or the month is outside 1..=12.
pub fn parse_contract_id(raw: &str) -> Result<ContractToken, ContractError> {
    let invalid = || ContractError::InvalidTickerFormat(raw.to_string());
    let caps = contract_id_pattern().captures(raw).ok_or_else(invalid)?;

    let month: u32 = caps["month"].parse().map_err(|_| invalid())?;
    let year_suffix: u32 = caps["year"].parse().map_err(|_| invalid())?;
    if !(1..=12).contains(&month) {
        return Err(invalid());
    }

    Ok(ContractToken {
        base: caps["base"].to_string(),
        month,
        year_suffix,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_contract_id() {
        let token = parse_contract_id("Si-3.20").unwrap();
        assert_eq!(token.base, "Si");
        assert_eq!(token.month, 3);
        assert_eq!(token.year_suffix, 20);
        assert_eq!(token.year_digit(), 0);
    }

    #[test]
    fn test_base_may_contain_dashes() {
        let token = parse_contract_id("SPBFUT#RTS-Mini-12.19").unwrap();
        assert_eq!(token.base, "SPBFUT#RTS-Mini");
        assert_eq!(token.month, 12);
    }

    #[test]
    fn test_display_is_canonical() {
        let token = parse_contract_id("Si-3.05").unwrap();
        assert_eq!(token.to_string(), "Si-3.05");
    }

    #[test]
    fn test_invalid_formats() {
        for raw in ["Si", "Si-3", "Si-.20", "-3.20", "Si-13.20", "Si-0.20", "Si-3.20x"] {
            assert_eq!(
                parse_contract_id(raw),
                Err(ContractError::InvalidTickerFormat(raw.to_string())),
                "{raw}"
            );
        }
    }
}
