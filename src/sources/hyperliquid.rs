use chrono::{DateTime, TimeZone, Utc};
use futures_util::future::BoxFuture;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, warn};

use super::CandleSource;
use crate::error::{AppError, Result};
use crate::types::{Candle, CandleRequest};

/// Hyperliquid mainnet API.
pub const HYPERLIQUID_API_URL: &str = "https://api.hyperliquid.xyz";

/// One candle row from `candleSnapshot`. Prices arrive as decimal strings.
#[derive(Debug, Deserialize)]
struct RawCandle {
    /// Open time in milliseconds
    t: i64,
    o: Decimal,
    h: Decimal,
    l: Decimal,
    c: Decimal,
    v: Decimal,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Decimal {
    Text(String),
    Number(f64),
}

impl Decimal {
    fn value(&self) -> Option<f64> {
        let v = match self {
            Decimal::Text(s) => s.trim().parse::<f64>().ok()?,
            Decimal::Number(n) => *n,
        };
        v.is_finite().then_some(v)
    }
}

impl RawCandle {
    fn to_candle(&self) -> Option<Candle> {
        Some(Candle {
            time: Utc.timestamp_millis_opt(self.t).single()?,
            open: self.o.value()?,
            high: self.h.value()?,
            low: self.l.value()?,
            close: self.c.value()?,
            volume: self.v.value()?,
        })
    }
}

/// Hyperliquid info API client.
#[derive(Clone)]
pub struct HyperliquidClient {
    client: Client,
    base_url: String,
}

impl HyperliquidClient {
    /// Create a client for the given API base URL.
    pub fn new(base_url: &str) -> Self {
        let client = Client::builder()
            .user_agent("Chumba/1.0")
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn candle_snapshot(&self, request: &CandleRequest) -> Result<Vec<Candle>> {
        let url = format!("{}/info", self.base_url);
        let body = json!({
            "type": "candleSnapshot",
            "req": {
                "coin": request.symbol,
                "interval": request.timeframe.as_str(),
                "startTime": request.start.timestamp_millis(),
                "endTime": request.end.timestamp_millis(),
            }
        });

        debug!(
            "Fetching {} {} candles from {}",
            request.symbol, request.timeframe, url
        );

        let response = self.client.post(&url).json(&body).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            let snippet: String = text.chars().take(200).collect();
            warn!("Hyperliquid API returned {}: {}", status, snippet);
            return Err(AppError::UpstreamFetch(format!(
                "Hyperliquid API error: {}",
                status
            )));
        }

        let bytes = response.bytes().await?;
        let rows: Vec<Value> = serde_json::from_slice(&bytes)?;
        let candles = normalize_candles(rows);

        if candles.is_empty() {
            return Err(AppError::NoDataAvailable(format!(
                "{} at interval {} between {} and {}",
                request.symbol,
                request.timeframe,
                format_bound(request.start),
                format_bound(request.end)
            )));
        }

        Ok(candles)
    }
}

impl CandleSource for HyperliquidClient {
    fn name(&self) -> &str {
        "hyperliquid"
    }

    fn fetch_candles<'a>(&'a self, request: &'a CandleRequest) -> BoxFuture<'a, Result<Vec<Candle>>> {
        Box::pin(self.candle_snapshot(request))
    }
}

/// Decode rows, drop malformed ones, sort by open time and keep the first row
/// for each timestamp.
pub fn normalize_candles(rows: Vec<Value>) -> Vec<Candle> {
    let total = rows.len();
    let mut candles: Vec<Candle> = rows
        .into_iter()
        .filter_map(|row| serde_json::from_value::<RawCandle>(row).ok())
        .filter_map(|raw| raw.to_candle())
        .collect();

    if candles.len() < total {
        debug!("Skipped {} malformed candle rows", total - candles.len());
    }

    candles.sort_by_key(|c| c.time);
    candles.dedup_by_key(|c| c.time);
    candles
}

fn format_bound(at: DateTime<Utc>) -> String {
    at.format("%Y-%m-%d %H:%M UTC").to_string()
}
