//! Ordered bar series.

use serde::{Deserialize, Serialize};

use crate::BarRecord;

/// An ordered series of bars for one symbol.
///
/// Bars are kept strictly increasing by timestamp. Ingesting a bar whose
/// timestamp is already present replaces the stored bar, so the later value
/// wins; an out-of-order bar is inserted at its sorted position.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct BarSeries {
    symbol: String,
    timeframe_seconds: u64,
    bars: Vec<BarRecord>,
}

impl BarSeries {
    /// Creates an empty series.
    #[must_use]
    pub fn new(symbol: impl Into<String>, timeframe_seconds: u64) -> Self {
        Self {
            symbol: symbol.into(),
            timeframe_seconds,
            bars: Vec::new(),
        }
    }

    /// Creates a series from arbitrary bars, sorting and de-duplicating them.
    #[must_use]
    pub fn from_bars(
        symbol: impl Into<String>,
        timeframe_seconds: u64,
        bars: impl IntoIterator<Item = BarRecord>,
    ) -> Self {
        let mut series = Self::new(symbol, timeframe_seconds);
        series.extend(bars);
        series
    }

    /// Returns the symbol this series belongs to.
    #[must_use]
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// Replaces the symbol, keeping the bars.
    #[must_use]
    pub fn with_symbol(mut self, symbol: impl Into<String>) -> Self {
        self.symbol = symbol.into();
        self
    }

    /// Returns the bar width in seconds.
    #[must_use]
    pub const fn timeframe_seconds(&self) -> u64 {
        self.timeframe_seconds
    }

    /// Returns the bars in chronological order.
    #[must_use]
    pub fn bars(&self) -> &[BarRecord] {
        &self.bars
    }

    /// Consumes the series and returns its bars.
    #[must_use]
    pub fn into_bars(self) -> Vec<BarRecord> {
        self.bars
    }

    /// Returns the number of bars.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bars.len()
    }

    /// Returns true if the series holds no bars.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// Returns the first bar, if any.
    #[must_use]
    pub fn first(&self) -> Option<&BarRecord> {
        self.bars.first()
    }

    /// Returns the last bar, if any.
    #[must_use]
    pub fn last(&self) -> Option<&BarRecord> {
        self.bars.last()
    }

    /// Adds a bar, keeping timestamps strictly increasing.
    pub fn push(&mut self, bar: BarRecord) {
        match self.bars.last() {
            None => self.bars.push(bar),
            Some(last) if last.timestamp < bar.timestamp => self.bars.push(bar),
            Some(_) => match self
                .bars
                .binary_search_by_key(&bar.timestamp, |b| b.timestamp)
            {
                Ok(pos) => self.bars[pos] = bar,
                Err(pos) => self.bars.insert(pos, bar),
            },
        }
    }

    /// Keeps only the bars matching the predicate.
    pub fn retain(&mut self, f: impl FnMut(&BarRecord) -> bool) {
        self.bars.retain(f);
    }

    /// Moves every bar by `seconds`.
    pub fn shift(&mut self, seconds: i64) {
        if seconds == 0 {
            return;
        }
        for bar in &mut self.bars {
            *bar = bar.shifted(seconds);
        }
    }
}

impl Extend<BarRecord> for BarSeries {
    fn extend<I: IntoIterator<Item = BarRecord>>(&mut self, iter: I) {
        for bar in iter {
            self.push(bar);
        }
    }
}

impl IntoIterator for BarSeries {
    type Item = BarRecord;
    type IntoIter = std::vec::IntoIter<BarRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.bars.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bar(ts: i64, close: f64) -> BarRecord {
        BarRecord::new(ts, close, close, close, close, 1)
    }

    #[test]
    fn test_push_in_order() {
        let mut series = BarSeries::new("Si-3.20", 60);
        series.push(bar(0, 1.0));
        series.push(bar(60, 2.0));

        assert_eq!(series.len(), 2);
        assert_eq!(series.last().unwrap().timestamp, 60);
    }

    #[test]
    fn test_duplicate_keeps_later_value() {
        let mut series = BarSeries::new("Si-3.20", 60);
        series.push(bar(0, 1.0));
        series.push(bar(60, 2.0));
        series.push(bar(60, 3.0));

        assert_eq!(series.len(), 2);
        assert_eq!(series.last().unwrap().close, 3.0);
    }

    #[test]
    fn test_out_of_order_is_sorted() {
        let series = BarSeries::from_bars("X", 60, [bar(120, 3.0), bar(0, 1.0), bar(60, 2.0), bar(0, 4.0)]);
        let stamps: Vec<_> = series.bars().iter().map(|b| b.timestamp).collect();

        assert_eq!(stamps, vec![0, 60, 120]);
        assert_eq!(series.first().unwrap().close, 4.0);
    }

    #[test]
    fn test_shift() {
        let mut series = BarSeries::from_bars("X", 60, [bar(3600, 1.0), bar(3660, 2.0)]);
        series.shift(-3600);

        assert_eq!(series.first().unwrap().timestamp, 0);
        assert_eq!(series.last().unwrap().timestamp, 60);
    }
}
