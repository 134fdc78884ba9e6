use std::env;
use std::time::Duration;

use crate::sources::hyperliquid::HYPERLIQUID_API_URL;
use crate::types::{Timeframe, DEFAULT_LOOKBACK};

/// Application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server host address.
    pub host: String,
    /// Server port.
    pub port: u16,
    /// Hyperliquid API base URL.
    pub hyperliquid_api_url: String,
    /// How long an evaluated signal stays fresh.
    pub cache_ttl: Duration,
    /// Maximum concurrent signal evaluations.
    pub workers: usize,
    /// Bars requested for a primary evaluation.
    pub lookback: u32,
    /// Symbols used when a request names none.
    pub default_symbols: Vec<String>,
    /// Timeframes used when a request names none.
    pub default_timeframes: Vec<Timeframe>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            hyperliquid_api_url: HYPERLIQUID_API_URL.to_string(),
            cache_ttl: Duration::from_secs(300),
            workers: 4,
            lookback: DEFAULT_LOOKBACK,
            default_symbols: vec!["BTC".to_string()],
            default_timeframes: vec![
                Timeframe::OneDay,
                Timeframe::FourHours,
                Timeframe::OneHour,
                Timeframe::FifteenMinutes,
            ],
        }
    }
}

impl Config {
    /// Load configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let default_symbols = env::var("DEFAULT_SYMBOLS")
            .ok()
            .map(|s| split_list(&s).map(str::to_uppercase).collect::<Vec<_>>())
            .filter(|symbols| !symbols.is_empty())
            .unwrap_or(defaults.default_symbols);

        // Unknown intervals are ignored rather than failing startup
        let default_timeframes = env::var("DEFAULT_TIMEFRAMES")
            .ok()
            .map(|s| split_list(&s).filter_map(Timeframe::from_str).collect::<Vec<_>>())
            .filter(|timeframes| !timeframes.is_empty())
            .unwrap_or(defaults.default_timeframes);

        Self {
            host: env::var("HOST").unwrap_or(defaults.host),
            port: parse_var("PORT").unwrap_or(defaults.port),
            hyperliquid_api_url: env::var("HYPERLIQUID_API_URL")
                .unwrap_or(defaults.hyperliquid_api_url),
            cache_ttl: parse_var("SIGNAL_CACHE_TTL_SECS")
                .map(Duration::from_secs)
                .unwrap_or(defaults.cache_ttl),
            workers: parse_var("SIGNAL_WORKERS")
                .filter(|w| *w > 0)
                .unwrap_or(defaults.workers),
            lookback: parse_var("SIGNAL_LOOKBACK")
                .filter(|l| *l > 0)
                .unwrap_or(defaults.lookback),
            default_symbols,
            default_timeframes,
        }
    }
}

fn parse_var<T: std::str::FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|v| v.trim().parse().ok())
}

/// Split a comma-separated list, dropping blanks.
pub fn split_list(s: &str) -> impl Iterator<Item = &str> {
    s.split(',').map(str::trim).filter(|part| !part.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.port, 8000);
        assert_eq!(config.hyperliquid_api_url, "https://api.hyperliquid.xyz");
        assert_eq!(config.cache_ttl, Duration::from_secs(300));
        assert_eq!(config.workers, 4);
        assert_eq!(config.lookback, 250);
        assert_eq!(config.default_symbols, vec!["BTC"]);
        assert_eq!(config.default_timeframes.len(), 4);
        assert_eq!(config.default_timeframes[0], Timeframe::OneDay);
    }

    #[test]
    fn test_split_list() {
        let parts: Vec<&str> = split_list(" BTC, eth,,SOL ,").collect();
        assert_eq!(parts, vec!["BTC", "eth", "SOL"]);
        assert_eq!(split_list("").count(), 0);
    }

    #[test]
    fn test_from_env_overrides() {
        env::set_var("SIGNAL_WORKERS", "8");
        env::set_var("DEFAULT_TIMEFRAMES", "4h, 2h,15m");
        env::set_var("DEFAULT_SYMBOLS", "eth,sol");

        let config = Config::from_env();
        assert_eq!(config.workers, 8);
        assert_eq!(
            config.default_timeframes,
            vec![Timeframe::FourHours, Timeframe::FifteenMinutes]
        );
        assert_eq!(config.default_symbols, vec!["ETH", "SOL"]);

        env::remove_var("SIGNAL_WORKERS");
        env::remove_var("DEFAULT_TIMEFRAMES");
        env::remove_var("DEFAULT_SYMBOLS");
    }
}
