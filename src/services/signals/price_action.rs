//! Short-term price-action context: pattern, levels, volume and structure.

use super::patterns::detect_pattern;
use crate::types::{Candle, PatternMatch, PriceAction, Timeframe, TrendStructure};

/// Bars scanned for the nearest support and resistance.
pub const LEVELS_LOOKBACK: usize = 60;
/// Bars averaged for the volume baseline.
pub const VOLUME_PERIOD: usize = 20;
/// Bars used to classify trend structure.
pub const TREND_LOOKBACK: usize = 40;
/// Volume ratio at or above which the last bar counts as a spike.
pub const VOLUME_SPIKE_RATIO: f64 = 1.3;

const TREND_MIN_BARS: usize = 5;
const TREND_THRESHOLD: f64 = 0.001;
const VOLUME_BASELINE_FLOOR: f64 = 1e-9;

/// Nearest low below and nearest high above the last close.
pub fn nearest_levels(candles: &[Candle], lookback: usize) -> (Option<f64>, Option<f64>) {
    let Some(last) = candles.last() else {
        return (None, None);
    };
    let window = &candles[candles.len().saturating_sub(lookback)..];
    let price = last.close;

    let support = window
        .iter()
        .map(|c| c.low)
        .filter(|low| *low < price)
        .fold(None, |best: Option<f64>, low| Some(best.map_or(low, |b| b.max(low))));

    let resistance = window
        .iter()
        .map(|c| c.high)
        .filter(|high| *high > price)
        .fold(None, |best: Option<f64>, high| Some(best.map_or(high, |b| b.min(high))));

    (support, resistance)
}

/// Last volume relative to the mean of up to `period` preceding bars.
pub fn volume_ratio(candles: &[Candle], period: usize) -> f64 {
    let Some(last) = candles.last() else {
        return 1.0;
    };
    if candles.len() <= 1 {
        return 1.0;
    }

    let previous = &candles[..candles.len() - 1];
    let baseline_bars = &previous[previous.len().saturating_sub(period)..];
    let baseline = baseline_bars.iter().map(|c| c.volume).sum::<f64>() / baseline_bars.len() as f64;

    last.volume / baseline.max(VOLUME_BASELINE_FLOOR)
}

/// Classify the trailing closes. `None` only for a missing or empty series.
pub fn determine_trend(candles: Option<&[Candle]>, lookback: usize) -> Option<TrendStructure> {
    let candles = candles.filter(|c| !c.is_empty())?;
    let window = &candles[candles.len().saturating_sub(lookback)..];
    if window.len() < TREND_MIN_BARS {
        return Some(TrendStructure::Range);
    }

    let first = window[0].close;
    let last = window[window.len() - 1].close;
    let pct_change = if first != 0.0 {
        (last - first) / first
    } else {
        0.0
    };

    Some(if pct_change > TREND_THRESHOLD {
        TrendStructure::Uptrend
    } else if pct_change < -TREND_THRESHOLD {
        TrendStructure::Downtrend
    } else {
        TrendStructure::Range
    })
}

/// Inputs to the one-line price-action summary.
pub struct SummaryParts<'a> {
    pub pattern: Option<&'a PatternMatch>,
    pub timeframe: Timeframe,
    pub structure: Option<TrendStructure>,
    pub higher_structure: Option<TrendStructure>,
    pub support: Option<f64>,
    pub resistance: Option<f64>,
    pub volume_ratio: f64,
}

/// Join the present clauses in their fixed order.
pub fn build_summary(parts: &SummaryParts<'_>) -> String {
    let mut bits = Vec::with_capacity(6);

    match parts.pattern {
        Some(pattern) => bits.push(format!("{} via {}", pattern.bias.label(), pattern.name)),
        None => bits.push("No dominant candlestick pattern".to_string()),
    }

    if let Some(structure) = parts.structure.filter(|s| *s != TrendStructure::Range) {
        bits.push(format!(
            "{} structure {}",
            parts.timeframe.as_str().to_uppercase(),
            structure.label()
        ));
    }

    if let Some(higher) = parts.higher_structure {
        bits.push(format!("Higher TF bias {}", higher.label()));
    }

    if let Some(support) = parts.support {
        bits.push(format!("Support ~{:.2}", support));
    }
    if let Some(resistance) = parts.resistance {
        bits.push(format!("Resistance ~{:.2}", resistance));
    }

    if parts.volume_ratio >= VOLUME_SPIKE_RATIO {
        bits.push(format!("Volume spike x{:.2}", parts.volume_ratio));
    }

    bits.join("; ")
}

/// Summarize price action on the primary series, optionally confirmed by the
/// next timeframe up.
pub fn analyze_price_action(
    candles: &[Candle],
    timeframe: Timeframe,
    higher_timeframe: Option<&[Candle]>,
) -> PriceAction {
    let pattern = detect_pattern(candles);
    let (support, resistance) = nearest_levels(candles, LEVELS_LOOKBACK);
    let volume_ratio = volume_ratio(candles, VOLUME_PERIOD);
    let structure = determine_trend(Some(candles), TREND_LOOKBACK);
    let higher_structure = higher_timeframe.and_then(|c| determine_trend(Some(c), TREND_LOOKBACK));

    let summary = build_summary(&SummaryParts {
        pattern: pattern.as_ref(),
        timeframe,
        structure,
        higher_structure,
        support,
        resistance,
        volume_ratio,
    });

    PriceAction {
        pattern,
        support,
        resistance,
        volume_ratio,
        timeframe_trend: structure,
        higher_timeframe_trend: higher_structure,
        summary,
    }
}
