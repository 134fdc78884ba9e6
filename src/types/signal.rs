use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{PriceAction, Timeframe};

/// Market bias of a signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Long,
    Short,
}

impl Direction {
    pub fn label(&self) -> &'static str {
        match self {
            Direction::Long => "Long",
            Direction::Short => "Short",
        }
    }

    /// +1 for Long, -1 for Short.
    pub fn sign(&self) -> f64 {
        match self {
            Direction::Long => 1.0,
            Direction::Short => -1.0,
        }
    }
}

/// Latest defined value of every indicator the pipeline reads.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IndicatorVector {
    pub ema20: f64,
    pub ema50: f64,
    pub adx: f64,
    pub plus_di: f64,
    pub minus_di: f64,
    pub macd: f64,
    pub macd_signal: f64,
    pub macd_hist: f64,
    pub rsi: f64,
    pub atr: f64,
    /// Literal close of the last candle.
    pub close: f64,
}

/// Price band to enter the trade in.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EntryBand {
    pub lower: f64,
    pub upper: f64,
}

/// Entry, take-profit and stop levels for one direction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TradeLevels {
    pub entry: EntryBand,
    /// Ordered nearest to furthest from entry.
    pub targets: [f64; 3],
    pub stop_loss: f64,
}

/// A fully assembled trading signal. Immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct TradeSignal {
    pub symbol: String,
    pub timeframe: Timeframe,
    pub direction: Direction,
    pub levels: TradeLevels,
    /// 0-100 indicator alignment with `direction`.
    pub confidence: f64,
    pub indicators: IndicatorVector,
    pub price_action: Option<PriceAction>,
    /// Trailing closes, oldest first.
    pub price_history: Vec<f64>,
    /// Minute-truncated UTC generation time.
    pub generated_at: DateTime<Utc>,
}

impl TradeSignal {
    /// Render the signal as a chat-friendly message.
    pub fn format(&self) -> String {
        let arrow = match self.direction {
            Direction::Long => "🟢",
            Direction::Short => "🔴",
        };
        let levels = &self.levels;

        let mut lines = vec![
            format!(
                "{} ⚡ 📅 {} (PERP - {})",
                arrow,
                self.symbol,
                self.timeframe.as_str().to_uppercase()
            ),
            String::new(),
            format!("{} Signal", self.direction.label()),
            format!(
                "- Entry: {:.6} - {:.6}",
                levels.entry.lower, levels.entry.upper
            ),
            format!(
                "- Targets: TP1: {:.6}, TP2: {:.6}, TP3: {:.6}",
                levels.targets[0], levels.targets[1], levels.targets[2]
            ),
            format!("- Stop Loss: {:.6}", levels.stop_loss),
            String::new(),
            format!("Analysis: {}", self.analysis_summary()),
        ];

        if let Some(summary) = self
            .price_action
            .as_ref()
            .map(|pa| pa.summary.as_str())
            .filter(|s| !s.is_empty())
        {
            lines.push(String::new());
            lines.push(format!("Price Action: {}", summary));
        }

        lines.push(String::new());
        lines.push(format!(
            "Signal generated at {} UTC",
            self.generated_at.format("%H:%M")
        ));

        lines.join("\n")
    }

    fn analysis_summary(&self) -> String {
        let ind = &self.indicators;
        let ema_up = ind.ema20 > ind.ema50;

        let clauses = [
            format!(
                "Trend {}: EMA20 {:.2} {} EMA50 {:.2}",
                if ema_up { "up" } else { "down" },
                ind.ema20,
                if ema_up { ">" } else { "<" },
                ind.ema50
            ),
            format!(
                "ADX {:.1}, +DI {:.1} {} -DI {:.1}",
                ind.adx,
                ind.plus_di,
                if ind.plus_di > ind.minus_di { ">" } else { "<" },
                ind.minus_di
            ),
            if ind.macd_hist > 0.0 {
                "Momentum: MACD hist rising".to_string()
            } else {
                "Momentum: MACD hist falling".to_string()
            },
            format!("RSI {:.1}", ind.rsi),
            format!("ATR {:.3}", ind.atr),
        ];

        clauses.join("; ")
    }

    /// Structured, JSON-ready form including the rendered message.
    pub fn to_payload(&self) -> SignalPayload {
        SignalPayload {
            symbol: self.symbol.clone(),
            timeframe: self.timeframe,
            direction: self.direction,
            entry: self.levels.entry,
            targets: self.levels.targets,
            stop_loss: self.levels.stop_loss,
            indicators: self.indicators,
            generated_at: self.generated_at,
            formatted: self.format(),
            confidence: self.confidence,
            price_action: self.price_action.clone(),
            price_history: self.price_history.clone(),
        }
    }
}

/// Serialized signal as returned to API callers and stored in the cache.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignalPayload {
    pub symbol: String,
    pub timeframe: Timeframe,
    pub direction: Direction,
    pub entry: EntryBand,
    pub targets: [f64; 3],
    pub stop_loss: f64,
    pub indicators: IndicatorVector,
    pub generated_at: DateTime<Utc>,
    pub formatted: String,
    pub confidence: f64,
    pub price_action: Option<PriceAction>,
    pub price_history: Vec<f64>,
}
