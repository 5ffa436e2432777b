//! End-to-end refresh runs against an in-memory SQLite store.

use async_trait::async_trait;
use sqlx::Row;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tickerd::application::refresh::RefreshOrchestrator;
use tickerd::domain::errors::ProviderError;
use tickerd::domain::market::{CompanyOverview, SeriesBar};
use tickerd::domain::ports::{MarketDataProvider, OutputSize};
use tickerd::domain::symbols::resolve_tracked_symbols;
use tickerd::infrastructure::persistence::{Database, SqliteStockRepository};

fn series_bar(date: &str, close: &str, volume: &str) -> SeriesBar {
    SeriesBar {
        date: date.to_string(),
        open: "100.0000".to_string(),
        high: "101.5000".to_string(),
        low: "99.2500".to_string(),
        close: close.to_string(),
        volume: volume.to_string(),
    }
}

/// Canned vendor: per-symbol series plus one symbol that is always throttled.
struct CannedProvider {
    series: HashMap<String, Vec<SeriesBar>>,
    throttled: Option<String>,
}

#[async_trait]
impl MarketDataProvider for CannedProvider {
    async fn fetch_daily_series(
        &self,
        symbol: &str,
        _size: OutputSize,
    ) -> Result<Vec<SeriesBar>, ProviderError> {
        if self.throttled.as_deref() == Some(symbol) {
            return Err(ProviderError::Throttled(
                "standard API call frequency is 25 requests per day".to_string(),
            ));
        }
        Ok(self.series.get(symbol).cloned().unwrap_or_default())
    }

    async fn fetch_overview(&self, symbol: &str) -> Result<CompanyOverview, ProviderError> {
        Ok(CompanyOverview {
            symbol: Some(symbol.to_string()),
            name: Some(format!("{} Incorporated", symbol)),
            sector: Some("TECHNOLOGY".to_string()),
            market_capitalization: Some("900000000".to_string()),
            ..Default::default()
        })
    }
}

async fn pipeline(
    provider: CannedProvider,
) -> (Database, RefreshOrchestrator) {
    let database = Database::new("sqlite::memory:").await.unwrap();
    let repository = Arc::new(SqliteStockRepository::new(database.pool.clone()));
    let orchestrator = RefreshOrchestrator::new(
        Arc::new(provider),
        repository,
        Duration::ZERO,
        30,
    );
    (database, orchestrator)
}

#[tokio::test]
async fn test_full_run_populates_store_and_counts_failures() {
    let tracked = resolve_tracked_symbols("aapl,msft,tsla");

    let mut series = HashMap::new();
    series.insert(
        "AAPL".to_string(),
        vec![
            series_bar("2024-03-07", "169.0000", "71765061"),
            series_bar("2024-03-08", "170.7300", "76114634"),
        ],
    );
    series.insert(
        "TSLA".to_string(),
        vec![series_bar("2024-03-08", "175.3400", "45211081")],
    );

    let (database, orchestrator) = pipeline(CannedProvider {
        series,
        throttled: Some("MSFT".to_string()),
    })
    .await;

    let summary = orchestrator.run(&tracked).await.unwrap();

    assert_eq!(summary.price_ok, 2);
    assert_eq!(summary.price_fail, 1);
    // All three fit the leftover budget; the throttled price call does not
    // block the symbol's overview item.
    assert_eq!(summary.overview_ok, 3);
    assert_eq!(summary.overview_fail, 0);

    // Every price symbol has a row, including the one whose fetch failed.
    let stock_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM stocks")
        .fetch_one(&database.pool)
        .await
        .unwrap();
    assert_eq!(stock_count, 3);

    let bar_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM daily_prices")
        .fetch_one(&database.pool)
        .await
        .unwrap();
    assert_eq!(bar_count, 3);

    let row = sqlx::query(
        "SELECT name, market_cap, overview_fetched_at FROM stocks WHERE symbol = 'AAPL'",
    )
    .fetch_one(&database.pool)
    .await
    .unwrap();
    assert_eq!(
        row.get::<Option<String>, _>("name"),
        Some("AAPL Incorporated".to_string())
    );
    assert_eq!(
        row.get::<Option<String>, _>("market_cap"),
        Some("900000000".to_string())
    );
    assert!(row.get::<Option<i64>, _>("overview_fetched_at").is_some());
}

#[tokio::test]
async fn test_repeated_runs_are_idempotent() {
    let tracked = resolve_tracked_symbols("aapl");

    let mut series = HashMap::new();
    series.insert(
        "AAPL".to_string(),
        vec![series_bar("2024-03-08", "170.7300", "76114634")],
    );
    let (database, orchestrator) = pipeline(CannedProvider {
        series,
        throttled: None,
    })
    .await;

    orchestrator.run(&tracked).await.unwrap();
    let second = orchestrator.run(&tracked).await.unwrap();

    assert_eq!(second.price_ok, 1);
    // A fresh overview is not re-fetched on the second run.
    assert_eq!(second.overview_ok, 0);

    let bar_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM daily_prices")
        .fetch_one(&database.pool)
        .await
        .unwrap();
    assert_eq!(bar_count, 1);

    let close: String = sqlx::query_scalar(
        "SELECT close FROM daily_prices WHERE symbol = 'AAPL' AND date = '2024-03-08'",
    )
    .fetch_one(&database.pool)
    .await
    .unwrap();
    assert_eq!(close, "170.7300");
}
