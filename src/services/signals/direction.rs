//! Bias classification and confidence scoring.

use crate::types::{Direction, IndicatorVector};

/// Classify market bias. Rules are checked in order; the EMA fallback makes
/// the result total.
pub fn classify_direction(ind: &IndicatorVector) -> Direction {
    if ind.ema20 > ind.ema50 && ind.macd_hist >= 0.0 && ind.rsi >= 45.0 {
        Direction::Long
    } else if ind.ema20 < ind.ema50 && ind.macd_hist <= 0.0 && ind.rsi <= 55.0 {
        Direction::Short
    } else if ind.ema20 >= ind.ema50 {
        Direction::Long
    } else {
        Direction::Short
    }
}

/// Score (0-100) how well the indicators line up with `direction`.
///
/// - Trend alignment: up to 30
/// - Momentum: up to 25
/// - RSI zone: up to 20
/// - ADX trend strength: up to 25
pub fn calculate_confidence(ind: &IndicatorVector, direction: Direction) -> f64 {
    let (trend_aligned, close_aligned, hist_aligned, di_aligned) = match direction {
        Direction::Long => (
            ind.ema20 > ind.ema50,
            ind.close > ind.ema20,
            ind.macd_hist > 0.0,
            ind.plus_di > ind.minus_di,
        ),
        Direction::Short => (
            ind.ema20 < ind.ema50,
            ind.close < ind.ema20,
            ind.macd_hist < 0.0,
            ind.minus_di > ind.plus_di,
        ),
    };

    let mut score = 0.0;

    if trend_aligned {
        score += 15.0;
        if close_aligned {
            score += 15.0;
        }
    }

    if hist_aligned {
        score += 15.0;
    }
    if di_aligned {
        score += 10.0;
    }

    score += rsi_points(ind.rsi, direction);
    score += adx_points(ind.adx);

    score.clamp(0.0, 100.0)
}

fn rsi_points(rsi: f64, direction: Direction) -> f64 {
    let (comfortable, lower_edge, upper_edge) = match direction {
        Direction::Long => (45.0..=70.0, 40.0..45.0, 70.0..=75.0),
        Direction::Short => (30.0..=55.0, 25.0..30.0, 55.0..=60.0),
    };

    if comfortable.contains(&rsi) {
        20.0
    } else if lower_edge.contains(&rsi) || upper_edge.contains(&rsi) {
        10.0
    } else {
        0.0
    }
}

fn adx_points(adx: f64) -> f64 {
    match adx {
        a if a >= 25.0 => 25.0,
        a if a >= 20.0 => 15.0,
        a if a >= 15.0 => 10.0,
        _ => 0.0,
    }
}
