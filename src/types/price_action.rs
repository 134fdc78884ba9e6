use serde::{Deserialize, Serialize};

/// Bias implied by a candlestick pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PatternBias {
    Long,
    Short,
    Neutral,
    Breakout,
}

impl PatternBias {
    pub fn label(&self) -> &'static str {
        match self {
            PatternBias::Long => "Long",
            PatternBias::Short => "Short",
            PatternBias::Neutral => "Neutral",
            PatternBias::Breakout => "Breakout",
        }
    }
}

/// Qualitative reliability tag for a pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatternConfidence {
    High,
    Medium,
    Low,
    Neutral,
}

/// The single best-matching candlestick pattern on the latest bars.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatternMatch {
    pub name: String,
    pub bias: PatternBias,
    pub confidence: PatternConfidence,
    /// Number of trailing candles the pattern consumed.
    pub candle_count: u8,
}

/// Shape of recent closes over a trailing window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendStructure {
    Uptrend,
    Downtrend,
    Range,
}

impl TrendStructure {
    pub fn label(&self) -> &'static str {
        match self {
            TrendStructure::Uptrend => "uptrend",
            TrendStructure::Downtrend => "downtrend",
            TrendStructure::Range => "range",
        }
    }
}

/// Price-action context attached to a signal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceAction {
    pub pattern: Option<PatternMatch>,
    pub support: Option<f64>,
    pub resistance: Option<f64>,
    /// Last bar volume relative to the preceding average.
    pub volume_ratio: f64,
    pub timeframe_trend: Option<TrendStructure>,
    pub higher_timeframe_trend: Option<TrendStructure>,
    pub summary: String,
}
