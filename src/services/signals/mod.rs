//! Trading signals service module.
//!
//! Fetches candles, computes indicators, classifies bias, scores
//! confidence, builds trade levels and summarizes price action.

pub mod direction;
pub mod indicators;
pub mod levels;
pub mod patterns;
pub mod price_action;
pub mod store;

pub use direction::{calculate_confidence, classify_direction};
pub use indicators::IndicatorEngine;
pub use levels::build_trade_levels;
pub use price_action::analyze_price_action;
pub use store::{CacheStats, EvaluationOptions, SignalStore, SymbolSignals};

use chrono::{DateTime, Duration, DurationRound, Utc};
use tracing::{debug, warn};

use crate::error::{AppError, Result};
use crate::sources::CandleSource;
use crate::types::{
    Candle, CandleRequest, Timeframe, TradeSignal, DEFAULT_LOOKBACK, HIGHER_TIMEFRAME_LOOKBACK,
};

/// Trailing closes returned with each signal.
pub const PRICE_HISTORY_LEN: usize = 100;

/// Candles fetched for one evaluation.
#[derive(Debug, Clone)]
pub struct SignalInputs {
    pub candles: Vec<Candle>,
    pub higher_timeframe: Option<Vec<Candle>>,
}

/// Builds a single signal for one symbol and timeframe.
pub struct SignalGenerator {
    engine: IndicatorEngine,
    lookback: u32,
}

impl Default for SignalGenerator {
    fn default() -> Self {
        Self::new(DEFAULT_LOOKBACK)
    }
}

impl SignalGenerator {
    pub fn new(lookback: u32) -> Self {
        Self {
            engine: IndicatorEngine::default(),
            lookback,
        }
    }

    /// Fetch the primary window and, when the timeframe escalates, the
    /// higher-timeframe window.
    pub async fn fetch_inputs(
        &self,
        source: &dyn CandleSource,
        symbol: &str,
        timeframe: Timeframe,
        as_of: Option<DateTime<Utc>>,
    ) -> Result<SignalInputs> {
        let request = CandleRequest::resolve(symbol, timeframe, self.lookback, as_of);
        let candles = source.fetch_candles(&request).await?;
        if candles.is_empty() {
            return Err(AppError::NoDataAvailable(format!(
                "{} {} between {} and {}",
                symbol, timeframe, request.start, request.end
            )));
        }

        let higher_timeframe = fetch_higher_timeframe(source, symbol, timeframe, as_of).await;

        Ok(SignalInputs {
            candles,
            higher_timeframe,
        })
    }

    /// Pure part of the pipeline: everything after the candles are in hand.
    pub fn assemble(
        &self,
        symbol: &str,
        timeframe: Timeframe,
        inputs: &SignalInputs,
        as_of: Option<DateTime<Utc>>,
    ) -> Result<TradeSignal> {
        let candles = &inputs.candles;
        if candles.len() < self.engine.min_history() {
            debug!(
                "{} {} has {} candles, fewer than the {} recommended",
                symbol,
                timeframe,
                candles.len(),
                self.engine.min_history()
            );
        }

        let indicators = self.engine.compute(candles)?;
        let direction = classify_direction(&indicators);
        let confidence = calculate_confidence(&indicators, direction);
        let levels = build_trade_levels(&indicators, direction);
        let price_action =
            analyze_price_action(candles, timeframe, inputs.higher_timeframe.as_deref());

        let history_start = candles.len().saturating_sub(PRICE_HISTORY_LEN);
        let price_history = candles[history_start..].iter().map(|c| c.close).collect();

        Ok(TradeSignal {
            symbol: symbol.to_string(),
            timeframe,
            direction,
            levels,
            confidence,
            indicators,
            price_action: Some(price_action),
            price_history,
            generated_at: truncate_to_minute(as_of.unwrap_or_else(Utc::now)),
        })
    }

    /// Fetch and assemble in one step on the current task.
    pub async fn generate(
        &self,
        source: &dyn CandleSource,
        symbol: &str,
        timeframe: Timeframe,
        as_of: Option<DateTime<Utc>>,
    ) -> Result<TradeSignal> {
        let inputs = self.fetch_inputs(source, symbol, timeframe, as_of).await?;
        self.assemble(symbol, timeframe, &inputs, as_of)
    }
}

/// Higher-timeframe candles, or None when there is no escalation or the fetch
/// fails. Failures never propagate.
async fn fetch_higher_timeframe(
    source: &dyn CandleSource,
    symbol: &str,
    timeframe: Timeframe,
    as_of: Option<DateTime<Utc>>,
) -> Option<Vec<Candle>> {
    let higher = timeframe.higher()?;
    let request = CandleRequest::resolve(symbol, higher, HIGHER_TIMEFRAME_LOOKBACK, as_of);

    match source.fetch_candles(&request).await {
        Ok(candles) if !candles.is_empty() => Some(candles),
        Ok(_) => {
            debug!("No {} candles for {}; skipping higher timeframe", higher, symbol);
            None
        }
        Err(e) if e.is_upstream() => {
            debug!("Higher timeframe {} unavailable for {}: {}", higher, symbol, e);
            None
        }
        Err(e) => {
            warn!(
                "Unexpected error fetching {} candles for {} from {}: {}",
                higher,
                symbol,
                source.name(),
                e
            );
            None
        }
    }
}

fn truncate_to_minute(at: DateTime<Utc>) -> DateTime<Utc> {
    at.duration_trunc(Duration::minutes(1)).unwrap_or(at)
}
