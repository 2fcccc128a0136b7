//! Continuous symbol notation.

use std::str::FromStr;

use crate::{ContractError, ContractToken, month_to_code};

/// A user-facing symbol request.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ContinuousSymbol {
    /// Used as-is for every contract.
    Plain(String),
    /// `@BASE`: rendered as an exchange code, `BASE` + month letter + year digit.
    Exchange {
        /// Underlying symbol.
        base: String,
    },
    /// `~BASE`: rendered as a dashed id, `BASE-MONTH.YEAR`.
    Dashed {
        /// Underlying symbol.
        base: String,
    },
}

impl ContinuousSymbol {
    /// Renders the symbol for one contract.
    #[must_use]
    pub fn render(&self, token: &ContractToken) -> String {
        match self {
            Self::Plain(symbol) => symbol.clone(),
            Self::Exchange { base } => to_exchange_code(base, token),
            Self::Dashed { base } => to_canonical_dashed(base, token),
        }
    }

    /// Returns the underlying symbol without its prefix.
    #[must_use]
    pub fn base(&self) -> &str {
        match self {
            Self::Plain(base) | Self::Exchange { base } | Self::Dashed { base } => base,
        }
    }
}

impl FromStr for ContinuousSymbol {
    type Err = ContractError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let symbol = match (s.strip_prefix('@'), s.strip_prefix('~')) {
            (Some(base), _) => Self::Exchange {
                base: base.to_string(),
            },
            (_, Some(base)) => Self::Dashed {
                base: base.to_string(),
            },
            _ => Self::Plain(s.to_string()),
        };
        if symbol.base().is_empty() {
            return Err(ContractError::InvalidTickerFormat(s.to_string()));
        }
        Ok(symbol)
    }
}

impl std::fmt::Display for ContinuousSymbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Plain(symbol) => write!(f, "{symbol}"),
            Self::Exchange { base } => write!(f, "@{base}"),
            Self::Dashed { base } => write!(f, "~{base}"),
        }
    }
}

/// Builds the exchange code for `token` under `base`.
///
/// The token's month is always valid, so the letter lookup cannot fail.
#[must_use]
pub fn to_exchange_code(base: &str, token: &ContractToken) -> String {
    let letter = month_to_code(token.month).unwrap_or('?');
    format!("{base}{letter}{}", token.year_digit())
}

/// Builds the dashed id for `token` under `base`.
#[must_use]
pub fn to_canonical_dashed(base: &str, token: &ContractToken) -> String {
    format!("{base}-{}.{:02}", token.month, token.year_suffix)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse_contract_id;

    #[test]
    fn test_parse_prefixes() {
        assert_eq!(
            "@Si".parse::<ContinuousSymbol>().unwrap(),
            ContinuousSymbol::Exchange {
                base: "Si".to_string()
            }
        );
        assert_eq!(
            "~RTS".parse::<ContinuousSymbol>().unwrap(),
            ContinuousSymbol::Dashed {
                base: "RTS".to_string()
            }
        );
        assert_eq!(
            "GAZP".parse::<ContinuousSymbol>().unwrap(),
            ContinuousSymbol::Plain("GAZP".to_string())
        );
        assert!("@".parse::<ContinuousSymbol>().is_err());
    }

    #[test]
    fn test_render() {
        let token = parse_contract_id("Si-9.21").unwrap();

        assert_eq!("@SPBFUT#Si".parse::<ContinuousSymbol>().unwrap().render(&token), "SPBFUT#SiU1");
        assert_eq!("~Si".parse::<ContinuousSymbol>().unwrap().render(&token), "Si-9.21");
        assert_eq!("GAZP".parse::<ContinuousSymbol>().unwrap().render(&token), "GAZP");
    }

    #[test]
    fn test_display_round_trips() {
        for raw in ["@Si", "~Si", "Si"] {
            assert_eq!(raw.parse::<ContinuousSymbol>().unwrap().to_string(), raw);
        }
    }
}
