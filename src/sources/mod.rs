pub mod hyperliquid;

pub use hyperliquid::HyperliquidClient;

use futures_util::future::BoxFuture;

use crate::error::Result;
use crate::types::{Candle, CandleRequest};

/// Provider of historical candles.
///
/// Implementations return candles sorted by time, or
/// [`AppError::NoDataAvailable`](crate::error::AppError::NoDataAvailable)
/// when the window is empty.
pub trait CandleSource: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &str;

    fn fetch_candles<'a>(&'a self, request: &'a CandleRequest) -> BoxFuture<'a, Result<Vec<Candle>>>;
}
