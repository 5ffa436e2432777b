//! Refresh Orchestrator
//!
//! Executes one refresh run: seeds symbol rows, then walks the allocated
//! work items strictly sequentially, pacing every provider call to stay
//! under the vendor's shared rate limit. A single item's failure is logged
//! and counted, never retried and never fatal; retrying would burn budget
//! that cannot be recovered until the next run.

use crate::application::allocator::{self, PRICE_SERIES_CAP};
use crate::domain::errors::ProviderError;
use crate::domain::market::{DailyBar, OverviewUpdate};
use crate::domain::ports::{MarketDataProvider, OutputSize};
use crate::domain::repositories::StockRepository;
use anyhow::{Context, Result};
use chrono::{Duration as StalenessWindow, Utc};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// Aggregate counts emitted by one run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RefreshSummary {
    pub price_ok: usize,
    pub price_fail: usize,
    pub overview_ok: usize,
    pub overview_fail: usize,
}

/// Per-item failure record: the error kind label plus a human message.
struct ItemFailure {
    kind: &'static str,
    message: String,
}

impl From<ProviderError> for ItemFailure {
    fn from(error: ProviderError) -> Self {
        Self {
            kind: error.kind(),
            message: error.to_string(),
        }
    }
}

fn store_failure(error: anyhow::Error) -> ItemFailure {
    ItemFailure {
        kind: "store",
        message: format!("{:#}", error),
    }
}

pub struct RefreshOrchestrator {
    provider: Arc<dyn MarketDataProvider>,
    repository: Arc<dyn StockRepository>,
    /// Minimum interval between provider calls. The vendor rate limit is
    /// global across all calls, not per symbol, so no two calls may ever be
    /// in flight concurrently within a run.
    pacing: Duration,
    overview_ttl: StalenessWindow,
}

impl RefreshOrchestrator {
    pub fn new(
        provider: Arc<dyn MarketDataProvider>,
        repository: Arc<dyn StockRepository>,
        pacing: Duration,
        overview_ttl_days: i64,
    ) -> Self {
        Self {
            provider,
            repository,
            pacing,
            overview_ttl: StalenessWindow::days(overview_ttl_days),
        }
    }

    /// Runs one refresh over the tracked universe and returns the aggregate
    /// counts. Only configuration/bootstrap problems abort the run; per-item
    /// provider and store failures are counted and skipped.
    pub async fn run(&self, tracked: &[String]) -> Result<RefreshSummary> {
        if tracked.len() < PRICE_SERIES_CAP {
            warn!(
                "Tracked universe has {} symbols, fewer than the {} price-series slots",
                tracked.len(),
                PRICE_SERIES_CAP
            );
        }

        let price_items = allocator::price_work(tracked);
        info!(
            "Starting refresh: {} price calls, {} of {} calls left for overviews",
            price_items.len(),
            allocator::remaining_budget(price_items.len()),
            allocator::DAILY_CALL_BUDGET
        );

        // Seeding: every symbol selected for price work gets a bare row, so
        // the read side always has something to show and overview updates
        // always find their row.
        for item in &price_items {
            self.repository
                .upsert_symbol_seed(&item.symbol)
                .await
                .with_context(|| format!("Failed to seed symbol row for {}", item.symbol))?;
        }

        let overview_items = allocator::overview_work(
            self.repository.as_ref(),
            &price_items,
            Utc::now(),
            self.overview_ttl,
        )
        .await
        .context("Failed to select stale overview candidates")?;

        let mut summary = RefreshSummary::default();

        for item in &price_items {
            match self.refresh_prices(&item.symbol).await {
                Ok(upserts) => {
                    summary.price_ok += 1;
                    info!(symbol = %item.symbol, upserts, "Updated daily prices");
                }
                Err(failure) => {
                    summary.price_fail += 1;
                    warn!(
                        symbol = %item.symbol,
                        kind = failure.kind,
                        "Daily price update failed: {}",
                        failure.message
                    );
                }
            }
            tokio::time::sleep(self.pacing).await;
        }

        for item in &overview_items {
            match self.refresh_overview(&item.symbol).await {
                Ok(()) => {
                    summary.overview_ok += 1;
                    info!(symbol = %item.symbol, "Updated company overview");
                }
                Err(failure) => {
                    summary.overview_fail += 1;
                    warn!(
                        symbol = %item.symbol,
                        kind = failure.kind,
                        "Company overview update failed: {}",
                        failure.message
                    );
                }
            }
            tokio::time::sleep(self.pacing).await;
        }

        info!(
            price_ok = summary.price_ok,
            price_fail = summary.price_fail,
            overview_ok = summary.overview_ok,
            overview_fail = summary.overview_fail,
            "Refresh complete"
        );

        Ok(summary)
    }

    async fn refresh_prices(&self, symbol: &str) -> Result<usize, ItemFailure> {
        let series = self
            .provider
            .fetch_daily_series(symbol, OutputSize::Compact)
            .await?;

        // Normalize the whole series before writing anything, so a malformed
        // bar fails the item without leaving a half-typed series behind.
        let mut bars = Vec::with_capacity(series.len());
        for wire in &series {
            bars.push(DailyBar::from_series(wire)?);
        }

        let mut upserts = 0;
        for bar in &bars {
            self.repository
                .upsert_daily_bar(symbol, bar)
                .await
                .map_err(store_failure)?;
            upserts += 1;
        }
        Ok(upserts)
    }

    async fn refresh_overview(&self, symbol: &str) -> Result<(), ItemFailure> {
        let overview = self.provider.fetch_overview(symbol).await?;
        let update = OverviewUpdate::from_overview(&overview);
        self.repository
            .upsert_symbol_overview(symbol, &update, Utc::now())
            .await
            .map_err(store_failure)
    }
}
