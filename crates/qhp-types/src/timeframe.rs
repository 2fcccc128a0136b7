//! Bar timeframe definitions.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Bar timeframe as understood by the quote store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Timeframe {
    /// 1-minute bars.
    #[serde(rename = "M1")]
    Minute1,
    /// 5-minute bars.
    #[serde(rename = "M5")]
    Minute5,
    /// 15-minute bars.
    #[serde(rename = "M15")]
    Minute15,
    /// 30-minute bars.
    #[serde(rename = "M30")]
    Minute30,
    /// 1-hour bars.
    #[serde(rename = "H1")]
    Hour1,
    /// Daily bars.
    #[serde(rename = "D")]
    Day1,
    /// Weekly bars.
    #[serde(rename = "W")]
    Week1,
}

impl Timeframe {
    /// Returns the bar width in seconds.
    #[must_use]
    pub const fn seconds(&self) -> u64 {
        match self {
            Self::Minute1 => 60,
            Self::Minute5 => 300,
            Self::Minute15 => 900,
            Self::Minute30 => 1800,
            Self::Hour1 => 3600,
            Self::Day1 => 86_400,
            Self::Week1 => 604_800,
        }
    }

    /// Returns the wire identifier sent in fetch requests.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Minute1 => "M1",
            Self::Minute5 => "M5",
            Self::Minute15 => "M15",
            Self::Minute30 => "M30",
            Self::Hour1 => "H1",
            Self::Day1 => "D",
            Self::Week1 => "W",
        }
    }

    /// Looks up the timeframe with the given width.
    #[must_use]
    pub fn from_seconds(seconds: u64) -> Option<Self> {
        Self::all().iter().copied().find(|tf| tf.seconds() == seconds)
    }

    /// Returns all available timeframes.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Minute1,
            Self::Minute5,
            Self::Minute15,
            Self::Minute30,
            Self::Hour1,
            Self::Day1,
            Self::Week1,
        ]
    }
}

impl std::fmt::Display for Timeframe {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Timeframe {
    type Err = TimeframeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "m1" | "1m" | "1min" => Ok(Self::Minute1),
            "m5" | "5m" | "5min" => Ok(Self::Minute5),
            "m15" | "15m" | "15min" => Ok(Self::Minute15),
            "m30" | "30m" | "30min" => Ok(Self::Minute30),
            "h1" | "1h" | "hour" => Ok(Self::Hour1),
            "d" | "d1" | "1d" | "day" | "daily" => Ok(Self::Day1),
            "w" | "w1" | "1w" | "week" | "weekly" => Ok(Self::Week1),
            _ => Err(TimeframeParseError(s.to_string())),
        }
    }
}

/// Error returned when parsing an invalid timeframe string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeframeParseError(String);

impl std::fmt::Display for TimeframeParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "invalid timeframe '{}', expected one of: M1, M5, M15, M30, H1, D, W",
            self.0
        )
    }
}

impl std::error::Error for TimeframeParseError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeframe_seconds() {
        assert_eq!(Timeframe::Minute1.seconds(), 60);
        assert_eq!(Timeframe::Minute15.seconds(), 900);
        assert_eq!(Timeframe::Hour1.seconds(), 3600);
        assert_eq!(Timeframe::Day1.seconds(), 86_400);
        assert_eq!(Timeframe::Week1.seconds(), 604_800);
    }

    #[test]
    fn test_timeframe_parse() {
        assert_eq!("M1".parse::<Timeframe>().unwrap(), Timeframe::Minute1);
        assert_eq!("15min".parse::<Timeframe>().unwrap(), Timeframe::Minute15);
        assert_eq!("daily".parse::<Timeframe>().unwrap(), Timeframe::Day1);
        assert_eq!("W".parse::<Timeframe>().unwrap(), Timeframe::Week1);
        assert!("H4".parse::<Timeframe>().is_err());
    }

    #[test]
    fn test_wire_names_round_trip() {
        for tf in Timeframe::all() {
            assert_eq!(tf.as_str().parse::<Timeframe>().unwrap(), *tf);
            assert_eq!(Timeframe::from_seconds(tf.seconds()), Some(*tf));
        }
    }

    #[test]
    fn test_serde_uses_wire_names() {
        let json = serde_json::to_string(&Timeframe::Hour1).unwrap();
        assert_eq!(json, "\"H1\"");
    }
}
