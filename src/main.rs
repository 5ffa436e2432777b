//! tickerd refresh job - headless daily ingestion run.
//!
//! Triggered externally (cron/systemd timer), performs one refresh of the
//! tracked universe under the vendor's daily call quota and exits. Per-item
//! provider failures never fail the process; only a configuration or
//! bootstrap problem does.
//!
//! # Usage
//! ```sh
//! ALPHAVANTAGE_API_KEY=... cargo run --bin tickerd
//! ```
//!
//! # Environment Variables
//! - `ALPHAVANTAGE_API_KEY` - vendor credential (required)
//! - `TRACKED_SYMBOLS` - comma-separated universe (default: built-in 15)
//! - `DATABASE_URL` - SQLite location (default: sqlite://data/tickerd.db)
//! - `AV_MIN_MS_BETWEEN_CALLS` - pacing between calls (default: 12000)
//! - `OVERVIEW_TTL_DAYS` - overview staleness window (default: 30)

use anyhow::Result;
use std::sync::Arc;
use std::time::Duration;
use tickerd::application::refresh::RefreshOrchestrator;
use tickerd::config::Config;
use tickerd::domain::symbols::resolve_tracked_symbols;
use tickerd::infrastructure::alphavantage::AlphaVantageClient;
use tickerd::infrastructure::persistence::{Database, SqliteStockRepository};
use tracing::{Level, info};
use tracing_subscriber::prelude::*;

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Setup logging (stdout only)
    let stdout_layer = tracing_subscriber::fmt::layer().with_target(false).pretty();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive(Level::INFO.into()))
        .with(stdout_layer)
        .init();

    info!("tickerd {} refresh starting...", env!("CARGO_PKG_VERSION"));

    // Load configuration; a missing credential aborts before any call is spent
    let config = Config::from_env()?;
    let tracked = resolve_tracked_symbols(&config.tracked_symbols);
    info!(
        "Configuration loaded: {} tracked symbols, pacing {}ms, overview TTL {}d",
        tracked.len(),
        config.min_ms_between_calls,
        config.overview_ttl_days
    );

    let database = Database::new(&config.database_url).await?;
    let repository = Arc::new(SqliteStockRepository::new(database.pool.clone()));
    let provider = Arc::new(AlphaVantageClient::new(config.alphavantage_api_key.clone()));

    let orchestrator = RefreshOrchestrator::new(
        provider,
        repository,
        Duration::from_millis(config.min_ms_between_calls),
        config.overview_ttl_days,
    );

    let summary = orchestrator.run(&tracked).await?;

    info!(
        "Refresh finished: prices {} ok / {} failed, overviews {} ok / {} failed",
        summary.price_ok, summary.price_fail, summary.overview_ok, summary.overview_fail
    );

    Ok(())
}
