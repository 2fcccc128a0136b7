//! Stitch planning and splicing.

use chrono::{NaiveDate, TimeDelta};
use qhp_types::BarSeries;
use tracing::debug;

/// One contract's contribution to a continuous series.
#[derive(Debug, Clone, PartialEq)]
pub struct StitchSegment {
    /// Symbol of the series the bars came from.
    ///
    /// Kept as written rather than parsed into a contract token: inputs may
    /// be exchange codes (`SiH0`) or exporter tickers (`SPFB.Si`) as well as
    /// dashed ids, and ordering only needs the cutoff date.
    pub contract: String,
    /// Bars left after trimming the expiration tail.
    pub series: BarSeries,
    /// Last date kept for this contract.
    pub end_date: NaiveDate,
}

/// Trimmed contract segments ordered by their cutoff dates.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StitchPlan {
    segments: Vec<StitchSegment>,
}

impl StitchPlan {
    /// Trims each contract's tail and orders the survivors.
    ///
    /// For every series the cutoff is the date of its last bar minus
    /// `stitch_delta_days`; bars dated after the cutoff are dropped. Series
    /// that are empty before or after trimming are left out. Segments are
    /// sorted by cutoff, ties keeping input order.
    #[must_use]
    pub fn build(series: impl IntoIterator<Item = BarSeries>, stitch_delta_days: i64) -> Self {
        let mut segments = Vec::new();

        for mut contract in series {
            let Some(last) = contract.last() else {
                debug!(contract = contract.symbol(), "skipping empty contract");
                continue;
            };
            let last_date = last.date();
            let cutoff = cutoff_date(last_date, stitch_delta_days);

            contract.retain(|bar| bar.date() <= cutoff);
            debug!(
                contract = contract.symbol(),
                %last_date,
                %cutoff,
                kept = contract.len(),
                "trimmed trailing data"
            );
            if contract.is_empty() {
                continue;
            }

            segments.push(StitchSegment {
                contract: contract.symbol().to_string(),
                series: contract,
                end_date: cutoff,
            });
        }

        segments.sort_by_key(|segment| segment.end_date);
        Self { segments }
    }

    /// Returns the segments in splice order.
    #[must_use]
    pub fn segments(&self) -> &[StitchSegment] {
        &self.segments
    }

    /// Returns true if no contract contributes bars.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Splices the segments into one series named `symbol`.
    ///
    /// Each segment contributes only bars later than the last bar of the
    /// segment before it. If a segment loses every bar this way, the bound
    /// it inherited carries over to the next one, keeping the output strictly
    /// increasing.
    #[must_use]
    pub fn into_series(self, symbol: impl Into<String>) -> BarSeries {
        let timeframe = self
            .segments
            .first()
            .map_or(0, |s| s.series.timeframe_seconds());
        let mut out = BarSeries::new(symbol, timeframe);
        let mut bound: Option<i64> = None;

        for segment in self.segments {
            let before = segment.series.len();
            let bars: Vec<_> = segment
                .series
                .into_iter()
                .filter(|bar| bound.is_none_or(|b| bar.timestamp > b))
                .collect();
            debug!(
                contract = %segment.contract,
                dropped = before - bars.len(),
                kept = bars.len(),
                "trimmed starting data"
            );

            if let Some(last) = bars.last() {
                bound = Some(last.timestamp);
            }
            out.extend(bars);
        }
        out
    }
}

/// Builds one continuous series from per-contract series.
///
/// Empty input, or input where every contract trims to nothing, gives an
/// empty series.
#[must_use]
pub fn stitch(
    symbol: impl Into<String>,
    series: impl IntoIterator<Item = BarSeries>,
    stitch_delta_days: i64,
) -> BarSeries {
    StitchPlan::build(series, stitch_delta_days).into_series(symbol)
}

/// Last date kept for a contract ending on `last_date`. Deltas past the
/// calendar saturate: a huge positive delta keeps nothing, a huge negative
/// one keeps everything.
fn cutoff_date(last_date: NaiveDate, stitch_delta_days: i64) -> NaiveDate {
    TimeDelta::try_days(stitch_delta_days)
        .and_then(|delta| last_date.checked_sub_signed(delta))
        .unwrap_or(if stitch_delta_days < 0 {
            NaiveDate::MAX
        } else {
            NaiveDate::MIN
        })
}
