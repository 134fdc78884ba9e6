//! Candlestick pattern detection on the trailing bars of a series.

use crate::types::{Candle, PatternBias, PatternConfidence, PatternMatch};

/// Wick must cover at least this share of the range for a pin bar.
const PIN_WICK_RANGE_RATIO: f64 = 0.5;
/// Wick must be at least this multiple of the body for a pin bar.
const PIN_WICK_BODY_RATIO: f64 = 2.0;
/// The opposite wick of a pin bar may cover at most this share of the range.
const PIN_OPPOSITE_WICK_RATIO: f64 = 0.3;
/// Body at or below this share of the range is a doji.
const DOJI_BODY_RATIO: f64 = 0.1;

/// Patterns recognised on the latest bars.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CandlePattern {
    ThreeWhiteSoldiers,
    ThreeBlackCrows,
    BullishEngulfing,
    BearishEngulfing,
    Hammer,
    ShootingStar,
    InsideBar,
    Doji,
}

impl CandlePattern {
    /// Evaluation order. Earlier entries shadow later ones.
    pub const PRIORITY: [CandlePattern; 8] = [
        CandlePattern::ThreeWhiteSoldiers,
        CandlePattern::ThreeBlackCrows,
        CandlePattern::BullishEngulfing,
        CandlePattern::BearishEngulfing,
        CandlePattern::Hammer,
        CandlePattern::ShootingStar,
        CandlePattern::InsideBar,
        CandlePattern::Doji,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::ThreeWhiteSoldiers => "Three White Soldiers",
            Self::ThreeBlackCrows => "Three Black Crows",
            Self::BullishEngulfing => "Bullish Engulfing",
            Self::BearishEngulfing => "Bearish Engulfing",
            Self::Hammer => "Hammer (Pin Bar)",
            Self::ShootingStar => "Shooting Star (Pin Bar)",
            Self::InsideBar => "Inside Bar",
            Self::Doji => "Doji",
        }
    }

    pub fn bias(&self) -> PatternBias {
        match self {
            Self::ThreeWhiteSoldiers | Self::BullishEngulfing | Self::Hammer => PatternBias::Long,
            Self::ThreeBlackCrows | Self::BearishEngulfing | Self::ShootingStar => {
                PatternBias::Short
            }
            Self::InsideBar => PatternBias::Breakout,
            Self::Doji => PatternBias::Neutral,
        }
    }

    pub fn confidence(&self) -> PatternConfidence {
        match self {
            Self::ThreeWhiteSoldiers | Self::ThreeBlackCrows => PatternConfidence::High,
            Self::BullishEngulfing
            | Self::BearishEngulfing
            | Self::Hammer
            | Self::ShootingStar => PatternConfidence::Medium,
            Self::InsideBar => PatternConfidence::Neutral,
            Self::Doji => PatternConfidence::Low,
        }
    }

    pub fn candle_count(&self) -> u8 {
        match self {
            Self::ThreeWhiteSoldiers | Self::ThreeBlackCrows => 3,
            Self::BullishEngulfing | Self::BearishEngulfing | Self::InsideBar => 2,
            Self::Hammer | Self::ShootingStar | Self::Doji => 1,
        }
    }

    /// Whether the pattern is present on the trailing bars of `candles`.
    pub fn matches(&self, candles: &[Candle]) -> bool {
        let n = candles.len();
        if n < self.candle_count() as usize {
            return false;
        }
        let last = &candles[n - 1];

        match self {
            Self::ThreeWhiteSoldiers => {
                let bars = &candles[n - 3..];
                bars.iter().all(Candle::is_green)
                    && bars
                        .windows(2)
                        .all(|w| w[1].open > w[0].open && w[1].close > w[0].close)
            }
            Self::ThreeBlackCrows => {
                let bars = &candles[n - 3..];
                bars.iter().all(|c| !c.is_green())
                    && bars
                        .windows(2)
                        .all(|w| w[1].open < w[0].open && w[1].close < w[0].close)
            }
            Self::BullishEngulfing => {
                let prev = &candles[n - 2];
                !prev.is_green()
                    && last.is_green()
                    && last.open < prev.close
                    && last.close > prev.open
            }
            Self::BearishEngulfing => {
                let prev = &candles[n - 2];
                prev.is_green()
                    && !last.is_green()
                    && last.open > prev.close
                    && last.close < prev.open
            }
            Self::Hammer => {
                last.is_green() && is_pin_bar(last.lower_wick(), last.upper_wick(), last)
            }
            Self::ShootingStar => {
                !last.is_green() && is_pin_bar(last.upper_wick(), last.lower_wick(), last)
            }
            Self::InsideBar => {
                let prev = &candles[n - 2];
                last.high < prev.high && last.low > prev.low
            }
            Self::Doji => {
                let range = last.range();
                range > 0.0 && last.body() <= range * DOJI_BODY_RATIO
            }
        }
    }

    pub fn to_match(self) -> PatternMatch {
        PatternMatch {
            name: self.name().to_string(),
            bias: self.bias(),
            confidence: self.confidence(),
            candle_count: self.candle_count(),
        }
    }
}

fn is_pin_bar(wick: f64, opposite_wick: f64, candle: &Candle) -> bool {
    let range = candle.range();
    if range <= 0.0 {
        return false;
    }
    wick >= range * PIN_WICK_RANGE_RATIO
        && wick >= candle.body() * PIN_WICK_BODY_RATIO
        && opposite_wick <= range * PIN_OPPOSITE_WICK_RATIO
}

/// First pattern in priority order present on the latest bars.
/// Needs at least three candles.
pub fn detect_pattern(candles: &[Candle]) -> Option<PatternMatch> {
    if candles.len() < 3 {
        return None;
    }

    CandlePattern::PRIORITY
        .iter()
        .find(|pattern| pattern.matches(candles))
        .map(|pattern| pattern.to_match())
}
