//! Average Directional Index (ADX) indicator.

use super::atr::Atr;
use super::{shift, wilder_smooth};
use crate::types::Candle;

/// ADX (Average Directional Index) indicator.
///
/// Measures trend strength (not direction):
/// - Below 20: Weak trend / ranging market
/// - 20-40: Trending
/// - Above 40: Strong trend
///
/// Combined with +DI and -DI for direction.
pub struct Adx {
    period: usize,
}

impl Default for Adx {
    fn default() -> Self {
        Self { period: 14 }
    }
}

/// ADX and directional indicators aligned to the input candles.
#[derive(Debug, Clone)]
pub struct AdxSeries {
    pub adx: Vec<Option<f64>>,
    pub plus_di: Vec<Option<f64>>,
    pub minus_di: Vec<Option<f64>>,
}

impl Adx {
    pub fn min_periods(&self) -> usize {
        self.period * 2
    }

    pub fn series(&self, candles: &[Candle]) -> AdxSeries {
        if candles.len() < 2 {
            let empty = vec![None; candles.len()];
            return AdxSeries {
                adx: empty.clone(),
                plus_di: empty.clone(),
                minus_di: empty,
            };
        }

        let mut plus_dm = Vec::with_capacity(candles.len() - 1);
        let mut minus_dm = Vec::with_capacity(candles.len() - 1);
        let mut tr = Vec::with_capacity(candles.len() - 1);

        for w in candles.windows(2) {
            let (previous, current) = (&w[0], &w[1]);
            let up_move = current.high - previous.high;
            let down_move = previous.low - current.low;

            plus_dm.push(if up_move > down_move && up_move > 0.0 {
                up_move
            } else {
                0.0
            });
            minus_dm.push(if down_move > up_move && down_move > 0.0 {
                down_move
            } else {
                0.0
            });
            tr.push(Atr::true_range(current, previous));
        }

        let smoothed_plus = wilder_smooth(&plus_dm, self.period);
        let smoothed_minus = wilder_smooth(&minus_dm, self.period);
        let smoothed_tr = wilder_smooth(&tr, self.period);

        let mut plus_di = vec![None; tr.len()];
        let mut minus_di = vec![None; tr.len()];
        let mut dx = Vec::new();
        let mut first_dx = None;

        for i in 0..tr.len() {
            let (Some(p), Some(m), Some(atr)) = (smoothed_plus[i], smoothed_minus[i], smoothed_tr[i])
            else {
                continue;
            };
            let (pdi, mdi) = if atr > 0.0 {
                (p / atr * 100.0, m / atr * 100.0)
            } else {
                (0.0, 0.0)
            };
            plus_di[i] = Some(pdi);
            minus_di[i] = Some(mdi);

            let di_sum = pdi + mdi;
            dx.push(if di_sum > 0.0 {
                (pdi - mdi).abs() / di_sum * 100.0
            } else {
                0.0
            });
            first_dx.get_or_insert(i);
        }

        let adx = match first_dx {
            Some(first) => shift(wilder_smooth(&dx, self.period), first),
            None => vec![None; tr.len()],
        };

        AdxSeries {
            adx: shift(adx, 1),
            plus_di: shift(plus_di, 1),
            minus_di: shift(minus_di, 1),
        }
    }
}
