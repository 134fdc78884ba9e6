//! Exponential Moving Average (EMA) indicator.

/// EMA (Exponential Moving Average) indicator.
///
/// Like an SMA but gives more weight to recent prices. The first defined
/// value is the SMA of the first `period` inputs.
pub struct Ema {
    period: usize,
}

impl Ema {
    pub fn new(period: usize) -> Self {
        Self { period }
    }

    pub fn min_periods(&self) -> usize {
        self.period
    }

    /// EMA aligned to `values`; undefined until `period` inputs are seen.
    pub fn series(&self, values: &[f64]) -> Vec<Option<f64>> {
        let mut out = vec![None; values.len()];
        if self.period == 0 || values.len() < self.period {
            return out;
        }

        let multiplier = 2.0 / (self.period as f64 + 1.0);
        let sma: f64 = values.iter().take(self.period).sum::<f64>() / self.period as f64;

        let mut ema = sma;
        out[self.period - 1] = Some(ema);
        for (i, value) in values.iter().enumerate().skip(self.period) {
            ema = (value - ema) * multiplier + ema;
            out[i] = Some(ema);
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ema_leading_undefined() {
        let values: Vec<f64> = (1..=10).map(|v| v as f64).collect();
        let series = Ema::new(3).series(&values);
        assert_eq!(series.len(), values.len());
        assert!(series[0].is_none());
        assert!(series[1].is_none());
        assert_eq!(series[2], Some(2.0));
    }

    #[test]
    fn test_ema_recursion() {
        let values = [2.0, 4.0, 6.0, 8.0];
        let series = Ema::new(3).series(&values);
        // seed 4.0, multiplier 0.5
        assert_eq!(series[3], Some(6.0));
    }

    #[test]
    fn test_ema_insufficient_data() {
        let series = Ema::new(20).series(&[1.0; 10]);
        assert!(series.iter().all(Option::is_none));
    }

    #[test]
    fn test_ema_constant_input() {
        let series = Ema::new(5).series(&[42.0; 30]);
        assert_eq!(series.last().copied().flatten(), Some(42.0));
    }
}
