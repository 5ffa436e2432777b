//! Call budget allocation.
//!
//! Decides, under the vendor's hard daily quota, which symbols get a
//! price-series call and which get an overview call in one run. Price work
//! is a fixed slice of the universe; overview work spends whatever budget is
//! left on the stalest overviews among those same symbols.

use crate::domain::repositories::StockRepository;
use anyhow::Result;
use chrono::{DateTime, Duration, Utc};

/// Hard number of provider calls permitted per run (vendor free tier).
pub const DAILY_CALL_BUDGET: usize = 25;

/// Fixed sub-cap of symbols that get one price-series call every run.
/// Not derived from the total budget: one call per symbol is spent on prices
/// regardless of what remains.
pub const PRICE_SERIES_CAP: usize = 15;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOp {
    PriceSeries,
    Overview,
}

/// One (operation, symbol) pair scheduled for a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkItem {
    pub op: RefreshOp,
    pub symbol: String,
}

/// Price-series work: the first `PRICE_SERIES_CAP` symbols in registry order.
pub fn price_work(tracked: &[String]) -> Vec<WorkItem> {
    tracked
        .iter()
        .take(PRICE_SERIES_CAP)
        .map(|symbol| WorkItem {
            op: RefreshOp::PriceSeries,
            symbol: symbol.clone(),
        })
        .collect()
}

/// Calls left for overview work after the price slice is paid for.
pub fn remaining_budget(price_items: usize) -> usize {
    DAILY_CALL_BUDGET.saturating_sub(price_items)
}

/// Overview work: among the symbols already selected for price work, those
/// whose overview is missing or older than the staleness window, stalest
/// first (never-fetched symbols take priority), capped at the remaining
/// budget. Candidate ordering is delegated to the store.
pub async fn overview_work(
    repository: &dyn StockRepository,
    price_items: &[WorkItem],
    now: DateTime<Utc>,
    overview_ttl: Duration,
) -> Result<Vec<WorkItem>> {
    let budget = remaining_budget(price_items.len());
    if budget == 0 {
        return Ok(Vec::new());
    }

    let symbols: Vec<String> = price_items.iter().map(|item| item.symbol.clone()).collect();
    let candidates = repository
        .list_stale_overview_candidates(&symbols, now - overview_ttl, budget)
        .await?;

    Ok(candidates
        .into_iter()
        .map(|symbol| WorkItem {
            op: RefreshOp::Overview,
            symbol,
        })
        .collect())
}
