//! Average True Range (ATR) indicator.

use super::{shift, wilder_smooth};
use crate::types::Candle;

/// ATR (Average True Range) indicator.
///
/// Measures market volatility by averaging true ranges:
/// TR = max(High-Low, |High-PrevClose|, |Low-PrevClose|)
pub struct Atr {
    period: usize,
}

impl Default for Atr {
    fn default() -> Self {
        Self { period: 14 }
    }
}

impl Atr {
    /// Calculate True Range.
    pub(crate) fn true_range(current: &Candle, previous: &Candle) -> f64 {
        let hl = current.high - current.low;
        let hc = (current.high - previous.close).abs();
        let lc = (current.low - previous.close).abs();
        hl.max(hc).max(lc)
    }

    pub fn min_periods(&self) -> usize {
        self.period + 1
    }

    /// Wilder-smoothed ATR aligned to `candles`; first defined at index `period`.
    pub fn series(&self, candles: &[Candle]) -> Vec<Option<f64>> {
        if candles.len() < 2 {
            return vec![None; candles.len()];
        }

        let true_ranges: Vec<f64> = candles
            .windows(2)
            .map(|w| Self::true_range(&w[1], &w[0]))
            .collect();

        shift(wilder_smooth(&true_ranges, self.period), 1)
    }
}
