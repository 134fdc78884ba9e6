//! ATR-based trade levels.

use crate::types::{Direction, EntryBand, IndicatorVector, TradeLevels};

/// Half-width of the entry band as a fraction of ATR.
const ENTRY_BUFFER_ATR: f64 = 0.15;
/// Take-profit distances in ATR multiples, nearest first.
const TARGET_MULTIPLIERS: [f64; 3] = [1.0, 2.0, 3.0];
/// Stop distance in ATR multiples.
const STOP_MULTIPLIER: f64 = 2.5;

/// Build entry band, targets and stop around the latest close.
pub fn build_trade_levels(ind: &IndicatorVector, direction: Direction) -> TradeLevels {
    let close = ind.close;
    let atr = ind.atr;
    let buffer = atr * ENTRY_BUFFER_ATR;
    let sign = direction.sign();

    TradeLevels {
        entry: EntryBand {
            lower: close - buffer,
            upper: close + buffer,
        },
        targets: TARGET_MULTIPLIERS.map(|k| close + sign * k * atr),
        stop_loss: close - sign * STOP_MULTIPLIER * atr,
    }
}
