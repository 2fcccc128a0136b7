//! Contract enumeration over a date range.

use chrono::Datelike;
use qhp_types::{DateRange, MonthIterator};

use crate::{ContinuousSymbol, ContractToken, to_canonical_dashed};

/// Lists every contract of `base` relevant to `range`.
///
/// Contracts expire in months divisible by `interval_months` (3 for quarterly
/// futures). The list starts at the first such month on or after the range
/// start and ends with the first contract expiring after the range end month,
/// which still trades during the range.
///
/// Intervals outside 1..=12 yield no contracts.
#[must_use]
pub fn contract_tokens(base: &str, range: &DateRange, interval_months: u32) -> Vec<ContractToken> {
    if !(1..=12).contains(&interval_months) {
        return Vec::new();
    }

    let end = (range.end.year(), range.end.month());
    let mut tokens = Vec::new();
    for (year, month) in MonthIterator::starting_at(range.start) {
        if month % interval_months != 0 {
            continue;
        }
        tokens.push(ContractToken {
            base: base.to_string(),
            month,
            year_suffix: year.rem_euclid(100).unsigned_abs(),
        });
        if (year, month) > end {
            break;
        }
    }
    tokens
}

/// Lists the ticker of every contract relevant to `range`, rendered the way
/// `symbol` asks.
///
/// `@BASE` gives exchange codes (`SiH0`) and `~BASE` gives dashed ids
/// (`Si-3.20`). A plain symbol names no per-contract form of its own, so its
/// contracts are listed as dashed ids.
#[must_use]
pub fn contract_ids(symbol: &ContinuousSymbol, range: &DateRange, interval_months: u32) -> Vec<String> {
    contract_tokens(symbol.base(), range, interval_months)
        .iter()
        .map(|token| match symbol {
            ContinuousSymbol::Plain(base) => to_canonical_dashed(base, token),
            _ => symbol.render(token),
        })
        .collect()
}
