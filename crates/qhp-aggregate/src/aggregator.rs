//! Streaming bar-to-bar aggregation.

use qhp_types::{BarRecord, BarSeries, Timeframe};
use thiserror::Error;

/// Errors raised when configuring an aggregator.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AggregateError {
    /// The bucket width was zero.
    #[error("Aggregation period must be positive")]
    ZeroPeriod,
}

impl From<AggregateError> for qhp_types::QhpError {
    fn from(error: AggregateError) -> Self {
        Self::Config(error.to_string())
    }
}

/// Streaming bar aggregator.
///
/// Folds a chronologically ordered bar stream into buckets of
/// `period_seconds`. Buckets are aligned to the Unix epoch
/// (`timestamp.div_euclid(period)`), not to calendar days, so a period that
/// does not divide a day yields buckets that straddle local midnight.
#[derive(Debug, Clone)]
pub struct BarAggregator {
    period: i64,
    current: Option<Bucket>,
}

impl BarAggregator {
    /// Creates an aggregator with the given bucket width.
    ///
    /// # Errors
    ///
    /// Returns [`AggregateError::ZeroPeriod`] if `period_seconds` is zero.
    pub fn new(period_seconds: u64) -> Result<Self, AggregateError> {
        let period = i64::try_from(period_seconds).map_err(|_| AggregateError::ZeroPeriod)?;
        if period == 0 {
            return Err(AggregateError::ZeroPeriod);
        }
        Ok(Self {
            period,
            current: None,
        })
    }

    /// Creates an aggregator for one of the store's timeframes.
    #[must_use]
    pub const fn for_timeframe(timeframe: Timeframe) -> Self {
        Self {
            period: timeframe.seconds() as i64,
            current: None,
        }
    }

    /// Returns the bucket width in seconds.
    #[must_use]
    pub const fn period_seconds(&self) -> u64 {
        self.period as u64
    }

    /// Adds a bar, returning the previous bucket if this bar starts a new one.
    pub fn push(&mut self, bar: BarRecord) -> Option<BarRecord> {
        let index = bar.timestamp.div_euclid(self.period);

        match self.current.take() {
            Some(mut bucket) if bucket.index == index => {
                bucket.merge(&bar);
                self.current = Some(bucket);
                None
            }
            Some(bucket) => {
                let completed = bucket.finish(self.period);
                self.current = Some(Bucket::seed(index, &bar));
                Some(completed)
            }
            None => {
                self.current = Some(Bucket::seed(index, &bar));
                None
            }
        }
    }

    /// Emits the open bucket, if any.
    ///
    /// The bucket is consumed, so a second call without an intervening
    /// [`push`](Self::push) returns `None`.
    pub fn flush(&mut self) -> Option<BarRecord> {
        self.current.take().map(|b| b.finish(self.period))
    }
}

/// Accumulator for one bucket.
#[derive(Debug, Clone)]
struct Bucket {
    index: i64,
    open: f64,
    high: f64,
    low: f64,
    close: f64,
    volume: u64,
}

impl Bucket {
    const fn seed(index: i64, bar: &BarRecord) -> Self {
        Self {
            index,
            open: bar.open,
            high: bar.high,
            low: bar.low,
            close: bar.close,
            volume: bar.volume,
        }
    }

    fn merge(&mut self, bar: &BarRecord) {
        self.high = self.high.max(bar.high);
        self.low = self.low.min(bar.low);
        self.close = bar.close;
        self.volume = self.volume.saturating_add(bar.volume);
    }

    const fn finish(self, period: i64) -> BarRecord {
        BarRecord::new(
            self.index * period,
            self.open,
            self.high,
            self.low,
            self.close,
            self.volume,
        )
    }
}

/// Resamples a run of bars into buckets of `period_seconds`.
///
/// # Errors
///
/// Returns [`AggregateError::ZeroPeriod`] if `period_seconds` is zero.
pub fn resample(
    bars: impl IntoIterator<Item = BarRecord>,
    period_seconds: u64,
) -> Result<Vec<BarRecord>, AggregateError> {
    let mut aggregator = BarAggregator::new(period_seconds)?;
    let mut out: Vec<BarRecord> = bars
        .into_iter()
        .filter_map(|bar| aggregator.push(bar))
        .collect();
    out.extend(aggregator.flush());
    Ok(out)
}

/// Resamples a whole series, keeping its symbol.
///
/// # Errors
///
/// Returns [`AggregateError::ZeroPeriod`] if `period_seconds` is zero.
pub fn resample_series(series: BarSeries, period_seconds: u64) -> Result<BarSeries, AggregateError> {
    let symbol = series.symbol().to_string();
    let bars = resample(series, period_seconds)?;
    Ok(BarSeries::from_bars(symbol, period_seconds, bars))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flat(timestamp: i64, price: f64) -> BarRecord {
        BarRecord::new(timestamp, price, price, price, price, 1)
    }

    #[test]
    fn test_bucket_boundaries() {
        let mut agg = BarAggregator::new(60).unwrap();

        assert!(agg.push(flat(0, 1.0)).is_none());
        assert!(agg.push(flat(30, 2.0)).is_none());

        let bar = agg.push(flat(70, 3.0)).unwrap();
        assert_eq!(bar.timestamp, 0);
        assert_eq!(bar.open, 1.0);
        assert_eq!(bar.high, 2.0);
        assert_eq!(bar.low, 1.0);
        assert_eq!(bar.close, 2.0);
        assert_eq!(bar.volume, 2);

        let last = agg.flush().unwrap();
        assert_eq!(last.timestamp, 60);
        assert_eq!(last.close, 3.0);
    }

    #[test]
    fn test_flush_is_idempotent() {
        let mut agg = BarAggregator::new(60).unwrap();
        agg.push(flat(10, 1.0));

        assert!(agg.flush().is_some());
        assert!(agg.flush().is_none());
    }

    #[test]
    fn test_flush_on_empty() {
        let mut agg = BarAggregator::for_timeframe(Timeframe::Hour1);
        assert!(agg.flush().is_none());
    }

    #[test]
    fn test_merge_uses_bar_extremes() {
        let mut agg = BarAggregator::for_timeframe(Timeframe::Minute15);
        agg.push(BarRecord::new(0, 10.0, 12.0, 9.0, 11.0, 5));
        agg.push(BarRecord::new(300, 11.0, 15.0, 10.5, 14.0, 7));
        agg.push(BarRecord::new(600, 14.0, 14.5, 8.0, 8.5, 3));

        let bar = agg.flush().unwrap();
        assert_eq!(bar.open, 10.0);
        assert_eq!(bar.high, 15.0);
        assert_eq!(bar.low, 8.0);
        assert_eq!(bar.close, 8.5);
        assert_eq!(bar.volume, 15);
    }

    #[test]
    fn test_epoch_alignment_ignores_calendar_days() {
        // 7-hour buckets: day 1 starts mid-bucket (86400 / 25200 = 3.43).
        let bars = resample([flat(86_400, 1.0), flat(86_400 + 3600, 2.0)], 25_200).unwrap();

        assert_eq!(bars.len(), 1);
        assert_eq!(bars[0].timestamp, 75_600);
    }

    #[test]
    fn test_negative_timestamps_floor() {
        let bars = resample([flat(-30, 1.0), flat(-1, 2.0), flat(0, 3.0)], 60).unwrap();

        assert_eq!(bars.len(), 2);
        assert_eq!(bars[0].timestamp, -60);
        assert_eq!(bars[1].timestamp, 0);
    }

    #[test]
    fn test_resample_series() {
        let series = BarSeries::from_bars("Si-3.20", 60, (0..10).map(|i| flat(i * 60, i as f64)));
        let five_minute = resample_series(series, 300).unwrap();

        assert_eq!(five_minute.symbol(), "Si-3.20");
        assert_eq!(five_minute.timeframe_seconds(), 300);
        assert_eq!(five_minute.len(), 2);
        assert_eq!(five_minute.bars()[1].open, 5.0);
        assert_eq!(five_minute.bars()[1].close, 9.0);
    }

    #[test]
    fn test_zero_period_rejected() {
        assert_eq!(BarAggregator::new(0).unwrap_err(), AggregateError::ZeroPeriod);
    }
}
