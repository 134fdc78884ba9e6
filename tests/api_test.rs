//! Integration tests for API endpoints, driven through the router with an
//! in-memory candle source.

mod common;

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use chumba::api;
use chumba::api::signals::SignalsQuery;
use chumba::config::Config;
use chumba::error::AppError;
use chumba::services::SignalStore;
use chumba::types::Timeframe;
use chumba::AppState;
use common::SyntheticSource;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;

fn app(source: SyntheticSource) -> Router {
    let config = Arc::new(Config::default());
    let signal_store = SignalStore::new(
        Arc::new(source),
        config.cache_ttl,
        config.workers,
        config.lookback,
    );
    api::router().with_state(AppState {
        config,
        signal_store,
    })
}

async fn send(app: &Router, method: Method, uri: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn test_health() {
    let app = app(SyntheticSource::new(0.5));
    let (status, body) = send(&app, Method::GET, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert!(body["version"].is_string());
}

#[tokio::test]
async fn test_symbol_signals() {
    let app = app(SyntheticSource::new(0.5));
    let (status, body) = send(&app, Method::GET, "/signals/btc?timeframes=4h,1d").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["symbol"], "BTC");
    assert_eq!(body["timeframes"], serde_json::json!(["4h", "1d"]));
    let signals = body["signals"].as_array().unwrap();
    assert_eq!(signals.len(), 2);
    assert_eq!(signals[0]["timeframe"], "4h");
    assert_eq!(signals[1]["timeframe"], "1d");
    assert_eq!(signals[0]["direction"], "Long");
}

#[tokio::test]
async fn test_multi_symbol_signals_and_cache_endpoints() {
    let app = app(SyntheticSource::new(0.5));
    let (status, body) = send(&app, Method::GET, "/signals?symbols=eth,btc&timeframes=1d").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["timeframes"], serde_json::json!(["1d"]));
    assert_eq!(body["symbols"]["BTC"].as_array().unwrap().len(), 1);
    assert_eq!(body["symbols"]["ETH"].as_array().unwrap().len(), 1);

    let (status, stats) = send(&app, Method::GET, "/cache/stats").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(stats["totalEntries"], 2);
    assert_eq!(stats["activeEntries"], 2);
    assert_eq!(stats["ttlSeconds"], 300);

    let (status, cleared) = send(&app, Method::POST, "/cache/clear").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(cleared["cleared"], 2);

    let (_, stats) = send(&app, Method::GET, "/cache/stats").await;
    assert_eq!(stats["totalEntries"], 0);
}

#[tokio::test]
async fn test_default_symbols_and_timeframes() {
    let source = SyntheticSource::new(0.5);
    let app = app(source);
    let (status, body) = send(&app, Method::GET, "/signals").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["timeframes"], serde_json::json!(["1d", "4h", "1h", "15m"]));
    assert_eq!(body["symbols"]["BTC"].as_array().unwrap().len(), 4);
}

#[tokio::test]
async fn test_unsupported_timeframe_is_bad_request() {
    let source = SyntheticSource::new(0.5);
    let app = app(source);
    let (status, body) = send(&app, Method::GET, "/signals/BTC?timeframes=1h,2h,5m").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], 400);
    let message = body["error"].as_str().unwrap();
    assert!(message.contains("2h, 5m"));
    assert!(message.contains("15m, 1d, 1h, 4h"));

    let (_, stats) = send(&app, Method::GET, "/cache/stats").await;
    assert_eq!(stats["totalEntries"], 0);
}

#[tokio::test]
async fn test_empty_symbol_list_is_bad_request() {
    let app = app(SyntheticSource::new(0.5));
    let (status, body) = send(&app, Method::GET, "/signals?symbols=,").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], 400);
}

#[tokio::test]
async fn test_upstream_failure_is_bad_gateway() {
    let source = SyntheticSource::new(0.5)
        .failing(Timeframe::OneDay, || AppError::UpstreamFetch("connection refused".into()));
    let app = app(source);
    let (status, body) = send(&app, Method::GET, "/signals/BTC?timeframes=1d").await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["status"], 502);
}

#[tokio::test]
async fn test_missing_data_is_server_error() {
    let source = SyntheticSource::new(0.5)
        .failing(Timeframe::OneHour, || AppError::NoDataAvailable("BTC 1h".into()));
    let app = app(source);
    let (status, _) = send(&app, Method::GET, "/signals/BTC?timeframes=1h").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
}

#[test]
fn test_query_deserialization() {
    let query: SignalsQuery = serde_urlencoded::from_str(
        "symbols=BTC,ETH&timeframes=1h,4h&as_of=2024-05-01T12:00:00Z&api_url=https://api.hyperliquid-testnet.xyz",
    )
    .unwrap();

    assert_eq!(query.symbols.as_deref(), Some("BTC,ETH"));
    assert_eq!(query.timeframes.as_deref(), Some("1h,4h"));
    assert_eq!(query.as_of.unwrap().to_rfc3339(), "2024-05-01T12:00:00+00:00");
    assert_eq!(
        query.api_url.as_deref(),
        Some("https://api.hyperliquid-testnet.xyz")
    );

    let empty: SignalsQuery = serde_urlencoded::from_str("").unwrap();
    assert!(empty.symbols.is_none() && empty.as_of.is_none());
}
