//! Relative Strength Index (RSI) indicator.

use super::{shift, wilder_smooth};

/// RSI (Relative Strength Index) indicator.
///
/// Measures momentum by comparing the magnitude of recent gains to recent losses.
/// Values range from 0-100:
/// - Below 30: Oversold
/// - Above 70: Overbought
pub struct Rsi {
    period: usize,
}

impl Default for Rsi {
    fn default() -> Self {
        Self { period: 14 }
    }
}

impl Rsi {
    pub fn new(period: usize) -> Self {
        Self { period }
    }

    pub fn min_periods(&self) -> usize {
        self.period + 1
    }

    /// RSI aligned to `closes`; first defined at index `period`.
    pub fn series(&self, closes: &[f64]) -> Vec<Option<f64>> {
        if closes.len() < 2 {
            return vec![None; closes.len()];
        }

        let (gains, losses): (Vec<f64>, Vec<f64>) = closes
            .windows(2)
            .map(|w| {
                let change = w[1] - w[0];
                if change > 0.0 {
                    (change, 0.0)
                } else {
                    (0.0, -change)
                }
            })
            .unzip();

        let avg_gain = wilder_smooth(&gains, self.period);
        let avg_loss = wilder_smooth(&losses, self.period);

        let rsi = avg_gain
            .iter()
            .zip(avg_loss.iter())
            .map(|(g, l)| {
                let (gain, loss) = ((*g)?, (*l)?);
                if loss == 0.0 {
                    return Some(100.0);
                }
                let rs = gain / loss;
                Some(100.0 - (100.0 / (1.0 + rs)))
            })
            .collect();

        // changes start at the second close
        shift(rsi, 1)
    }
}
