//! Synthetic bar data for qhp benchmarks.

use qhp_types::{BarRecord, BarSeries};

/// 2020-01-01 00:00:00 UTC.
pub const EPOCH_2020: i64 = 1_577_836_800;

/// Generates `count` bars spaced `step_seconds` apart with a gentle random walk.
pub fn synthetic_bars(count: usize, step_seconds: i64) -> Vec<BarRecord> {
    let mut price = 70_000.0_f64;
    (0..count)
        .map(|i| {
            // Deterministic zig-zag keeps runs comparable.
            let drift = if (i / 7) % 2 == 0 { 5.0 } else { -4.5 };
            let open = price;
            price += drift;
            let (low, high) = if open < price { (open, price) } else { (price, open) };
            BarRecord::new(
                EPOCH_2020 + i as i64 * step_seconds,
                open,
                high + 2.5,
                low - 2.5,
                price,
                100 + (i % 50) as u64,
            )
        })
        .collect()
}

/// Generates `count` one-minute contract series, each `days` long and
/// starting `spacing_days` after the previous one.
pub fn synthetic_contracts(count: usize, days: i64, spacing_days: i64) -> Vec<BarSeries> {
    const MINUTES_PER_DAY: i64 = 1440;
    (0..count)
        .map(|n| {
            let offset = n as i64 * spacing_days * 86_400;
            let bars = synthetic_bars((days * MINUTES_PER_DAY) as usize, 60)
                .into_iter()
                .map(|bar| bar.shifted(offset));
            BarSeries::from_bars(format!("Si-{}.{}", 3 * (n % 4) + 3, 20 + n / 4), 60, bars)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_synthetic_bars_are_ordered() {
        let bars = synthetic_bars(100, 60);
        assert_eq!(bars.len(), 100);
        assert!(bars.windows(2).all(|w| w[0].timestamp < w[1].timestamp));
        assert!(bars.iter().all(|b| b.low <= b.open && b.open <= b.high));
    }

    #[test]
    fn test_synthetic_contracts_overlap() {
        let contracts = synthetic_contracts(3, 10, 5);
        assert_eq!(contracts.len(), 3);
        assert_eq!(contracts[1].symbol(), "Si-6.20");
        let first_end = contracts[0].last().unwrap().timestamp;
        let second_start = contracts[1].first().unwrap().timestamp;
        assert!(second_start < first_end);
    }
}
