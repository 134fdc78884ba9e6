//! Technical indicator implementations.
//!
//! Every indicator produces a series aligned one-to-one with its input, with
//! `None` at the leading positions where it has not stabilized yet.

pub mod adx;
pub mod atr;
pub mod ema;
pub mod macd;
pub mod rsi;

pub use adx::{Adx, AdxSeries};
pub use atr::Atr;
pub use ema::Ema;
pub use macd::{Macd, MacdSeries};
pub use rsi::Rsi;

use crate::error::{AppError, Result};
use crate::types::{Candle, IndicatorVector};

/// Wilder's smoothing aligned to `values`; the first defined value is the
/// simple mean of the first `period` inputs.
pub(crate) fn wilder_smooth(values: &[f64], period: usize) -> Vec<Option<f64>> {
    let mut out = vec![None; values.len()];
    if period == 0 || values.len() < period {
        return out;
    }

    let mut smoothed = values.iter().take(period).sum::<f64>() / period as f64;
    out[period - 1] = Some(smoothed);
    for (i, value) in values.iter().enumerate().skip(period) {
        smoothed = (smoothed * (period - 1) as f64 + value) / period as f64;
        out[i] = Some(smoothed);
    }

    out
}

/// Prepend `offset` undefined positions.
pub(crate) fn shift(series: Vec<Option<f64>>, offset: usize) -> Vec<Option<f64>> {
    let mut out = vec![None; offset];
    out.extend(series);
    out
}

/// Last defined, finite value of an indicator series.
pub fn latest_defined(name: &'static str, series: &[Option<f64>]) -> Result<f64> {
    series
        .iter()
        .rev()
        .flatten()
        .copied()
        .find(|v| v.is_finite())
        .ok_or(AppError::IndicatorUnavailable(name))
}

/// Computes the fixed indicator vector the signal rules read.
pub struct IndicatorEngine {
    ema_fast: Ema,
    ema_slow: Ema,
    macd: Macd,
    rsi: Rsi,
    atr: Atr,
    adx: Adx,
}

impl Default for IndicatorEngine {
    fn default() -> Self {
        Self {
            ema_fast: Ema::new(20),
            ema_slow: Ema::new(50),
            macd: Macd::default(),
            rsi: Rsi::default(),
            atr: Atr::default(),
            adx: Adx::default(),
        }
    }
}

impl IndicatorEngine {
    /// Bars needed for every indicator to have settled.
    pub fn min_history(&self) -> usize {
        [
            self.ema_fast.min_periods(),
            self.ema_slow.min_periods(),
            self.macd.min_periods(),
            self.rsi.min_periods(),
            self.atr.min_periods(),
            self.adx.min_periods(),
        ]
        .into_iter()
        .max()
        .unwrap_or(0)
            + 1
    }

    pub fn compute(&self, candles: &[Candle]) -> Result<IndicatorVector> {
        let last = candles
            .last()
            .ok_or_else(|| AppError::NoDataAvailable("empty candle series".to_string()))?;

        let closes: Vec<f64> = candles.iter().map(|c| c.close).collect();

        let ema20 = self.ema_fast.series(&closes);
        let ema50 = self.ema_slow.series(&closes);
        let macd = self.macd.series(&closes);
        let rsi = self.rsi.series(&closes);
        let atr = self.atr.series(candles);
        let adx = self.adx.series(candles);

        Ok(IndicatorVector {
            ema20: latest_defined("ema20", &ema20)?,
            ema50: latest_defined("ema50", &ema50)?,
            adx: latest_defined("adx", &adx.adx)?,
            plus_di: latest_defined("plus_di", &adx.plus_di)?,
            minus_di: latest_defined("minus_di", &adx.minus_di)?,
            macd: latest_defined("macd", &macd.macd)?,
            macd_signal: latest_defined("macd_signal", &macd.signal)?,
            macd_hist: latest_defined("macd_hist", &macd.histogram)?,
            rsi: latest_defined("rsi", &rsi)?,
            atr: latest_defined("atr", &atr)?,
            close: last.close,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::signals::test_support::trending_candles;

    #[test]
    fn test_wilder_smooth() {
        let out = wilder_smooth(&[2.0, 4.0, 6.0, 8.0], 2);
        assert_eq!(out, vec![None, Some(3.0), Some(4.5), Some(6.25)]);
    }

    #[test]
    fn test_latest_defined_skips_trailing_gaps() {
        let series = [None, Some(1.0), Some(2.0), Some(f64::NAN), None];
        assert_eq!(latest_defined("x", &series).unwrap(), 2.0);
    }

    #[test]
    fn test_latest_defined_all_missing() {
        let err = latest_defined("ema50", &[None, None, Some(f64::NAN)]).unwrap_err();
        assert!(matches!(err, AppError::IndicatorUnavailable("ema50")));
    }

    #[test]
    fn test_min_history() {
        assert_eq!(IndicatorEngine::default().min_history(), 51);
    }

    #[test]
    fn test_compute_full_vector() {
        let candles = trending_candles(120, 1.5);
        let v = IndicatorEngine::default().compute(&candles).unwrap();

        assert_eq!(v.close, candles.last().unwrap().close);
        assert!(v.ema20 > v.ema50);
        assert!(v.plus_di > v.minus_di);
        assert!(v.rsi > 50.0);
        assert!(v.atr > 0.0);
        assert!((v.macd_hist - (v.macd - v.macd_signal)).abs() < 1e-9);
    }

    #[test]
    fn test_compute_short_history_fails() {
        let err = IndicatorEngine::default()
            .compute(&trending_candles(40, 1.5))
            .unwrap_err();
        assert!(matches!(err, AppError::IndicatorUnavailable("ema50")));
    }

    #[test]
    fn test_compute_empty_series() {
        let err = IndicatorEngine::default().compute(&[]).unwrap_err();
        assert!(matches!(err, AppError::NoDataAvailable(_)));
    }
}
