//! Repository Pattern Abstractions
//!
//! Storage contract for the refresh pipeline. Every write is a single-row
//! upsert keyed by natural key, so partial runs leave committed items
//! standing and repeated runs never duplicate state.

use crate::domain::market::{DailyBar, OverviewUpdate};
use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

#[async_trait]
pub trait StockRepository: Send + Sync {
    /// Insert a bare symbol row if absent; a no-op when the row exists.
    /// Never overwrites descriptive fields.
    async fn upsert_symbol_seed(&self, symbol: &str) -> Result<()>;

    /// Replace the descriptive fields and stamp the fetch time,
    /// unconditionally.
    async fn upsert_symbol_overview(
        &self,
        symbol: &str,
        update: &OverviewUpdate,
        fetched_at: DateTime<Utc>,
    ) -> Result<()>;

    /// Insert-or-replace one daily bar keyed by (symbol, trading date).
    async fn upsert_daily_bar(&self, symbol: &str, bar: &DailyBar) -> Result<()>;

    /// Symbols from the given set whose overview has never been fetched or
    /// was fetched before `stale_before`. Never-fetched symbols come first,
    /// then oldest-first; capped at `limit`.
    async fn list_stale_overview_candidates(
        &self,
        symbols: &[String],
        stale_before: DateTime<Utc>,
        limit: usize,
    ) -> Result<Vec<String>>;
}
