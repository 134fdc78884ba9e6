//! Signal store: caches evaluated signals and schedules cache misses onto a
//! bounded worker pool.

use chrono::{DateTime, Utc};
use futures_util::future::try_join_all;
use serde::Serialize;
use std::collections::BTreeMap;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use tracing::{debug, info};

use super::SignalGenerator;
use crate::error::{AppError, Result};
use crate::services::Cache;
use crate::sources::CandleSource;
use crate::types::{SignalPayload, Timeframe};

/// Signals keyed by uppercase symbol.
pub type SymbolSignals = BTreeMap<String, Vec<SignalPayload>>;

/// Snapshot of the signal cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheStats {
    pub total_entries: usize,
    pub active_entries: usize,
    pub ttl_seconds: u64,
}

/// Per-request evaluation settings.
#[derive(Clone, Default)]
pub struct EvaluationOptions {
    /// Evaluate as of this instant instead of now.
    pub as_of: Option<DateTime<Utc>>,
    /// Candle source replacing the store's default for this request.
    pub source: Option<Arc<dyn CandleSource>>,
}

impl EvaluationOptions {
    /// The cache key carries neither the as-of time nor the source.
    fn is_cacheable(&self) -> bool {
        self.as_of.is_none() && self.source.is_none()
    }
}

/// Store for computing and caching trading signals.
pub struct SignalStore {
    source: Arc<dyn CandleSource>,
    generator: Arc<SignalGenerator>,
    /// Cache key format: "{SYMBOL}:{timeframe}"
    cache: Arc<Cache<SignalPayload>>,
    workers: Arc<Semaphore>,
}

impl SignalStore {
    /// Create a new signal store.
    pub fn new(
        source: Arc<dyn CandleSource>,
        cache_ttl: Duration,
        workers: usize,
        lookback: u32,
    ) -> Arc<Self> {
        Arc::new(Self {
            source,
            generator: Arc::new(SignalGenerator::new(lookback)),
            cache: Arc::new(Cache::new(cache_ttl)),
            workers: Arc::new(Semaphore::new(workers.max(1))),
        })
    }

    fn cache_key(symbol: &str, timeframe: Timeframe) -> String {
        format!("{}:{}", symbol, timeframe)
    }

    /// Signals for one symbol, in the order the timeframes were requested.
    ///
    /// Any failed evaluation fails the whole call.
    pub async fn get_signals(
        &self,
        symbol: &str,
        timeframes: &[Timeframe],
        options: &EvaluationOptions,
    ) -> Result<Vec<SignalPayload>> {
        let symbol = symbol.trim().to_uppercase();
        if symbol.is_empty() {
            return Err(AppError::BadRequest("symbol must not be empty".to_string()));
        }

        let cacheable = options.is_cacheable();
        let source = options
            .source
            .clone()
            .unwrap_or_else(|| Arc::clone(&self.source));

        let mut results: Vec<Option<SignalPayload>> = vec![None; timeframes.len()];
        let mut pending = Vec::new();

        for (idx, &timeframe) in timeframes.iter().enumerate() {
            if cacheable {
                if let Some(hit) = self.cache.get(&Self::cache_key(&symbol, timeframe)) {
                    debug!("Signal cache hit for {} {}", symbol, timeframe);
                    results[idx] = Some(hit);
                    continue;
                }
                debug!("Signal cache miss for {} {}", symbol, timeframe);
            }
            pending.push(self.spawn_evaluation(
                idx,
                symbol.clone(),
                timeframe,
                Arc::clone(&source),
                options.as_of,
                cacheable,
            ));
        }

        if !pending.is_empty() {
            info!(
                "Evaluating {} of {} timeframes for {} via {}",
                pending.len(),
                timeframes.len(),
                symbol,
                source.name()
            );
        }

        for (idx, payload) in try_join_all(pending).await? {
            results[idx] = Some(payload);
        }

        results
            .into_iter()
            .collect::<Option<Vec<_>>>()
            .ok_or_else(|| AppError::Internal("evaluation produced no signal".to_string()))
    }

    /// Signals for several symbols, evaluated concurrently.
    pub async fn get_multi(
        &self,
        symbols: &[String],
        timeframes: &[Timeframe],
        options: &EvaluationOptions,
    ) -> Result<SymbolSignals> {
        let batches = symbols.iter().map(|symbol| async move {
            let signals = self.get_signals(symbol, timeframes, options).await?;
            Ok::<_, AppError>((symbol.trim().to_uppercase(), signals))
        });

        Ok(try_join_all(batches).await?.into_iter().collect())
    }

    /// Run one evaluation on the worker pool. The task runs to completion even
    /// if the caller stops waiting, and caches its own result.
    fn spawn_evaluation(
        &self,
        idx: usize,
        symbol: String,
        timeframe: Timeframe,
        source: Arc<dyn CandleSource>,
        as_of: Option<DateTime<Utc>>,
        cacheable: bool,
    ) -> impl Future<Output = Result<(usize, SignalPayload)>> {
        let workers = Arc::clone(&self.workers);
        let generator = Arc::clone(&self.generator);
        let cache = cacheable.then(|| Arc::clone(&self.cache));

        let handle = tokio::spawn(async move {
            let _permit = workers
                .acquire_owned()
                .await
                .map_err(|_| AppError::Internal("worker pool closed".to_string()))?;

            let inputs = generator
                .fetch_inputs(source.as_ref(), &symbol, timeframe, as_of)
                .await?;

            let key = Self::cache_key(&symbol, timeframe);
            let signal = tokio::task::spawn_blocking(move || {
                generator.assemble(&symbol, timeframe, &inputs, as_of)
            })
            .await??;

            let payload = signal.to_payload();
            if let Some(cache) = cache {
                cache.insert(key, payload.clone());
            }
            Ok::<_, AppError>((idx, payload))
        });

        async move { handle.await? }
    }

    pub fn cache_stats(&self) -> CacheStats {
        CacheStats {
            total_entries: self.cache.len(),
            active_entries: self.cache.active_len(),
            ttl_seconds: self.cache.ttl().as_secs(),
        }
    }

    /// Drop every cached signal, returning how many were stored.
    pub fn clear_cache(&self) -> usize {
        let cleared = self.cache.clear();
        info!("Cleared {} cached signals", cleared);
        cleared
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::signals::test_support::trending_candles;
    use crate::types::{Candle, CandleRequest};
    use futures_util::future::BoxFuture;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingSource {
        calls: AtomicUsize,
    }

    impl CandleSource for CountingSource {
        fn name(&self) -> &str {
            "counting"
        }

        fn fetch_candles<'a>(
            &'a self,
            _request: &'a CandleRequest,
        ) -> BoxFuture<'a, Result<Vec<Candle>>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Box::pin(async { Ok(trending_candles(120, 1.0)) })
        }
    }

    fn store() -> (Arc<SignalStore>, Arc<CountingSource>) {
        let source = Arc::new(CountingSource {
            calls: AtomicUsize::new(0),
        });
        let store = SignalStore::new(source.clone(), Duration::from_secs(300), 4, 120);
        (store, source)
    }

    #[tokio::test]
    async fn test_second_request_served_from_cache() {
        let (store, source) = store();
        let options = EvaluationOptions::default();

        let first = store
            .get_signals("btc", &[Timeframe::OneDay], &options)
            .await
            .unwrap();
        let second = store
            .get_signals("BTC", &[Timeframe::OneDay], &options)
            .await
            .unwrap();

        assert_eq!(first[0].symbol, "BTC");
        assert_eq!(first[0].generated_at, second[0].generated_at);
        assert_eq!(source.calls.load(Ordering::SeqCst), 1);
        assert_eq!(store.cache_stats().active_entries, 1);
    }

    #[tokio::test]
    async fn test_as_of_bypasses_cache() {
        let (store, source) = store();
        let options = EvaluationOptions {
            as_of: Some(Utc::now()),
            source: None,
        };

        store
            .get_signals("ETH", &[Timeframe::OneDay], &options)
            .await
            .unwrap();
        store
            .get_signals("ETH", &[Timeframe::OneDay], &options)
            .await
            .unwrap();

        assert_eq!(source.calls.load(Ordering::SeqCst), 2);
        assert_eq!(store.cache_stats().total_entries, 0);
    }

    #[tokio::test]
    async fn test_empty_symbol_rejected() {
        let (store, _) = store();
        let err = store
            .get_signals("  ", &[Timeframe::OneHour], &EvaluationOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[tokio::test]
    async fn test_clear_cache() {
        let (store, _) = store();
        store
            .get_multi(
                &["BTC".to_string(), "eth".to_string()],
                &[Timeframe::OneDay],
                &EvaluationOptions::default(),
            )
            .await
            .unwrap();

        assert_eq!(store.cache_stats().total_entries, 2);
        assert_eq!(store.clear_cache(), 2);
        assert_eq!(store.cache_stats().total_entries, 0);
        assert_eq!(store.cache_stats().ttl_seconds, 300);
    }
}
