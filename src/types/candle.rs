use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// Default number of bars requested for a primary evaluation.
pub const DEFAULT_LOOKBACK: u32 = 250;

/// Number of bars requested for the escalated (higher) timeframe.
pub const HIGHER_TIMEFRAME_LOOKBACK: u32 = 120;

/// A single OHLCV bar.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    /// Bar open time.
    pub time: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl Candle {
    /// Green candles close at or above their open.
    pub fn is_green(&self) -> bool {
        self.close >= self.open
    }

    pub fn body(&self) -> f64 {
        (self.close - self.open).abs()
    }

    pub fn range(&self) -> f64 {
        self.high - self.low
    }

    pub fn upper_wick(&self) -> f64 {
        self.high - self.open.max(self.close)
    }

    pub fn lower_wick(&self) -> f64 {
        self.open.min(self.close) - self.low
    }
}

/// Supported bar intervals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Timeframe {
    #[serde(rename = "15m")]
    FifteenMinutes,
    #[serde(rename = "1h")]
    OneHour,
    #[serde(rename = "4h")]
    FourHours,
    #[serde(rename = "1d")]
    OneDay,
}

impl Timeframe {
    pub const ALL: [Timeframe; 4] = [
        Timeframe::FifteenMinutes,
        Timeframe::OneHour,
        Timeframe::FourHours,
        Timeframe::OneDay,
    ];

    /// Parse from the interval string used by the upstream ("15m", "1h", ...).
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "15m" => Some(Self::FifteenMinutes),
            "1h" => Some(Self::OneHour),
            "4h" => Some(Self::FourHours),
            "1d" => Some(Self::OneDay),
            _ => None,
        }
    }

    /// Parse, failing with the list of supported intervals.
    pub fn parse(s: &str) -> Result<Self> {
        Self::from_str(s).ok_or_else(|| AppError::UnsupportedTimeframe {
            timeframe: s.to_string(),
            supported: Self::supported_list(),
        })
    }

    /// Sorted, comma-separated list of supported intervals.
    pub fn supported_list() -> String {
        let mut names: Vec<&str> = Self::ALL.iter().map(|tf| tf.as_str()).collect();
        names.sort_unstable();
        names.join(", ")
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FifteenMinutes => "15m",
            Self::OneHour => "1h",
            Self::FourHours => "4h",
            Self::OneDay => "1d",
        }
    }

    pub fn minutes(&self) -> i64 {
        match self {
            Self::FifteenMinutes => 15,
            Self::OneHour => 60,
            Self::FourHours => 240,
            Self::OneDay => 1440,
        }
    }

    /// Next timeframe up used for confirming structure. None for the daily chart.
    pub fn higher(&self) -> Option<Self> {
        match self {
            Self::FifteenMinutes => Some(Self::OneHour),
            Self::OneHour => Some(Self::FourHours),
            Self::FourHours => Some(Self::OneDay),
            Self::OneDay => None,
        }
    }
}

impl std::fmt::Display for Timeframe {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A resolved candle window for one symbol and timeframe.
#[derive(Debug, Clone, PartialEq)]
pub struct CandleRequest {
    pub symbol: String,
    pub timeframe: Timeframe,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl CandleRequest {
    /// Resolve `lookback` bars ending at `as_of` (or now).
    pub fn resolve(
        symbol: &str,
        timeframe: Timeframe,
        lookback: u32,
        as_of: Option<DateTime<Utc>>,
    ) -> Self {
        let end = as_of.unwrap_or_else(Utc::now);
        let start = end - Duration::minutes(timeframe.minutes() * lookback as i64);
        Self {
            symbol: symbol.to_string(),
            timeframe,
            start,
            end,
        }
    }
}
