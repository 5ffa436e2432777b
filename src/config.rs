use crate::domain::errors::ConfigError;
use anyhow::Result;
use std::env;

/// The fifteen-symbol universe the dashboard ships with.
pub const DEFAULT_TRACKED_SYMBOLS: &str =
    "AAPL,MSFT,GOOGL,AMZN,NVDA,META,TSLA,JPM,V,MA,JNJ,PG,KO,PEP,XOM";

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub alphavantage_api_key: String,
    /// Raw comma-separated tracked-symbol list; resolved per run.
    pub tracked_symbols: String,
    /// Minimum milliseconds between two provider calls.
    pub min_ms_between_calls: u64,
    /// Days before a fetched overview becomes eligible for re-fetch.
    pub overview_ttl_days: i64,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let alphavantage_api_key = env::var("ALPHAVANTAGE_API_KEY").unwrap_or_default();
        if alphavantage_api_key.trim().is_empty() {
            return Err(ConfigError::MissingApiKey.into());
        }

        let database_url = env::var("DATABASE_URL")
            .unwrap_or_else(|_| "sqlite://data/tickerd.db".to_string());

        let tracked_symbols = env::var("TRACKED_SYMBOLS")
            .unwrap_or_else(|_| DEFAULT_TRACKED_SYMBOLS.to_string());

        let min_ms_between_calls = env::var("AV_MIN_MS_BETWEEN_CALLS")
            .unwrap_or_else(|_| "12000".to_string())
            .parse::<u64>()
            .map_err(|e| ConfigError::InvalidSetting {
                name: "AV_MIN_MS_BETWEEN_CALLS",
                reason: e.to_string(),
            })?;

        let overview_ttl_days = env::var("OVERVIEW_TTL_DAYS")
            .unwrap_or_else(|_| "30".to_string())
            .parse::<i64>()
            .map_err(|e| ConfigError::InvalidSetting {
                name: "OVERVIEW_TTL_DAYS",
                reason: e.to_string(),
            })?;

        Ok(Self {
            database_url,
            alphavantage_api_key,
            tracked_symbols,
            min_ms_between_calls,
            overview_ttl_days,
        })
    }
}
