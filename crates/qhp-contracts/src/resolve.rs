//! Exchange code to dashed id resolution.

use chrono::{Datelike, NaiveDate};

use crate::{ContractError, ContractToken, code_to_month};

/// Resolves an exchange code such as `SiH0` to a contract token.
///
/// The code carries only the last digit of the year, so `reference_date`
/// supplies the decade: a digit at or above the reference year's last digit
/// falls in the reference decade, a smaller digit in the next one. Contracts
/// more than ten years from the reference resolve to the wrong decade; the
/// code simply does not carry enough information.
///
/// # Errors
///
/// Returns [`ContractError::InvalidTickerFormat`] unless the id ends in a
/// month letter followed by one digit, with a non-empty base before them.
pub fn resolve_continuous_symbol(
    raw_exchange_id: &str,
    reference_date: NaiveDate,
) -> Result<ContractToken, ContractError> {
    let invalid = || ContractError::InvalidTickerFormat(raw_exchange_id.to_string());

    let mut tail = raw_exchange_id.char_indices().rev();
    let (_, digit) = tail.next().ok_or_else(invalid)?;
    let (letter_at, letter) = tail.next().ok_or_else(invalid)?;
    let digit = digit.to_digit(10).ok_or_else(invalid)?;
    let month = code_to_month(letter).ok_or_else(invalid)?;
    let base = &raw_exchange_id[..letter_at];
    if base.is_empty() {
        return Err(invalid());
    }

    let reference_year = reference_date.year();
    let reference_digit = reference_year.rem_euclid(10) as u32;
    let decade = reference_year - reference_digit as i32;
    let year = if digit >= reference_digit {
        decade + digit as i32
    } else {
        decade + 10 + digit as i32
    };

    Ok(ContractToken {
        base: base.to_string(),
        month,
        year_suffix: year.rem_euclid(100) as u32,
    })
}
