//! Deterministic in-memory candle source shared by the integration tests.

#![allow(dead_code)]

use chrono::Duration;
use chumba::error::{AppError, Result};
use chumba::sources::CandleSource;
use chumba::types::{Candle, CandleRequest, Timeframe};
use futures_util::future::BoxFuture;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// Candle source that synthesizes a trending series for any window.
pub struct SyntheticSource {
    /// Price change per bar.
    step: f64,
    failures: HashMap<Timeframe, fn() -> AppError>,
    delays: HashMap<Timeframe, u64>,
    calls: AtomicUsize,
    requests: Mutex<Vec<(String, Timeframe)>>,
}

impl SyntheticSource {
    pub fn new(step: f64) -> Self {
        Self {
            step,
            failures: HashMap::new(),
            delays: HashMap::new(),
            calls: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Fail every fetch for `timeframe`.
    pub fn failing(mut self, timeframe: Timeframe, error: fn() -> AppError) -> Self {
        self.failures.insert(timeframe, error);
        self
    }

    /// Delay every fetch for `timeframe`.
    pub fn delayed(mut self, timeframe: Timeframe, millis: u64) -> Self {
        self.delays.insert(timeframe, millis);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn requests(&self) -> Vec<(String, Timeframe)> {
        self.requests.lock().unwrap().clone()
    }
}

impl CandleSource for SyntheticSource {
    fn name(&self) -> &str {
        "synthetic"
    }

    fn fetch_candles<'a>(&'a self, request: &'a CandleRequest) -> BoxFuture<'a, Result<Vec<Candle>>> {
        Box::pin(async move {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.requests
                .lock()
                .unwrap()
                .push((request.symbol.clone(), request.timeframe));

            if let Some(millis) = self.delays.get(&request.timeframe) {
                tokio::time::sleep(std::time::Duration::from_millis(*millis)).await;
            }
            if let Some(error) = self.failures.get(&request.timeframe) {
                return Err(error());
            }
            Ok(synthetic_candles(request, self.step))
        })
    }
}

/// One bar per interval between `request.start` and `request.end`, drifting by
/// `step` with a small repeating wobble.
pub fn synthetic_candles(request: &CandleRequest, step: f64) -> Vec<Candle> {
    let minutes = request.timeframe.minutes();
    let count = (request.end - request.start).num_minutes() / minutes;
    let drift = if step >= 0.0 { 0.8 } else { -0.8 };

    (0..count)
        .map(|i| {
            let wobble = [0.0, 0.6, -0.4, 0.9, -0.2][(i % 5) as usize];
            let open = 100.0 + i as f64 * step + wobble;
            let close = open + drift;
            Candle {
                time: request.start + Duration::minutes(minutes * i),
                open,
                high: open.max(close) + 0.7,
                low: open.min(close) - 0.7,
                close,
                volume: 1000.0 + (i % 7) as f64 * 50.0,
            }
        })
        .collect()
}
