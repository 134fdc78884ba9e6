//! Signal API endpoints.

use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

use crate::config::split_list;
use crate::error::{AppError, Result};
use crate::services::signals::{EvaluationOptions, SymbolSignals};
use crate::sources::{CandleSource, HyperliquidClient};
use crate::types::{SignalPayload, Timeframe};
use crate::AppState;

/// Query parameters shared by the signal endpoints.
#[derive(Debug, Default, Deserialize)]
pub struct SignalsQuery {
    /// Comma-separated symbols, e.g. `BTC,ETH`
    pub symbols: Option<String>,
    /// Comma-separated intervals, e.g. `1h,4h`
    pub timeframes: Option<String>,
    /// Evaluate as of this RFC 3339 instant.
    pub as_of: Option<DateTime<Utc>>,
    /// Alternate Hyperliquid API base URL.
    pub api_url: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct MultiSignalsResponse {
    pub symbols: SymbolSignals,
    pub timeframes: Vec<Timeframe>,
}

#[derive(Debug, Serialize)]
pub struct SymbolSignalsResponse {
    pub symbol: String,
    pub timeframes: Vec<Timeframe>,
    pub signals: Vec<SignalPayload>,
}

/// Create the signals router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_multi_signals))
        .route("/:symbol", get(get_symbol_signals))
}

/// Parse requested timeframes, reporting every unsupported value at once.
pub fn parse_timeframes(raw: Option<&str>, defaults: &[Timeframe]) -> Result<Vec<Timeframe>> {
    let requested: Vec<&str> = raw.map(|s| split_list(s).collect()).unwrap_or_default();
    if requested.is_empty() {
        return Ok(defaults.to_vec());
    }

    let invalid: Vec<&str> = requested
        .iter()
        .copied()
        .filter(|tf| Timeframe::from_str(tf).is_none())
        .collect();
    if !invalid.is_empty() {
        return Err(AppError::UnsupportedTimeframe {
            timeframe: invalid.join(", "),
            supported: Timeframe::supported_list(),
        });
    }

    Ok(requested
        .into_iter()
        .filter_map(Timeframe::from_str)
        .collect())
}

/// Parse requested symbols. An explicit but empty list is rejected.
pub fn parse_symbols(raw: Option<&str>, defaults: &[String]) -> Result<Vec<String>> {
    let Some(raw) = raw else {
        return Ok(defaults.to_vec());
    };

    let symbols: Vec<String> = split_list(raw).map(str::to_uppercase).collect();
    if symbols.is_empty() {
        return Err(AppError::BadRequest(
            "At least one symbol must be provided".to_string(),
        ));
    }
    Ok(symbols)
}

fn evaluation_options(query: &SignalsQuery) -> EvaluationOptions {
    let source = query
        .api_url
        .as_deref()
        .map(str::trim)
        .filter(|url| !url.is_empty())
        .map(|url| Arc::new(HyperliquidClient::new(url)) as Arc<dyn CandleSource>);

    EvaluationOptions {
        as_of: query.as_of,
        source,
    }
}

/// Get signals for several symbols.
async fn get_multi_signals(
    State(state): State<AppState>,
    Query(query): Query<SignalsQuery>,
) -> Result<Json<MultiSignalsResponse>> {
    let symbols = parse_symbols(query.symbols.as_deref(), &state.config.default_symbols)?;
    let timeframes =
        parse_timeframes(query.timeframes.as_deref(), &state.config.default_timeframes)?;

    info!(
        "Signal request for {} across {} timeframes",
        symbols.join(","),
        timeframes.len()
    );

    let signals = state
        .signal_store
        .get_multi(&symbols, &timeframes, &evaluation_options(&query))
        .await?;

    Ok(Json(MultiSignalsResponse {
        symbols: signals,
        timeframes,
    }))
}

/// Get signals for one symbol.
async fn get_symbol_signals(
    State(state): State<AppState>,
    Path(symbol): Path<String>,
    Query(query): Query<SignalsQuery>,
) -> Result<Json<SymbolSignalsResponse>> {
    let timeframes =
        parse_timeframes(query.timeframes.as_deref(), &state.config.default_timeframes)?;
    let symbol = symbol.trim().to_uppercase();

    info!("Signal request for {} across {} timeframes", symbol, timeframes.len());

    let signals = state
        .signal_store
        .get_signals(&symbol, &timeframes, &evaluation_options(&query))
        .await?;

    Ok(Json(SymbolSignalsResponse {
        symbol,
        timeframes,
        signals,
    }))
}
