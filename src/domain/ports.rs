use crate::domain::errors::ProviderError;
use crate::domain::market::{CompanyOverview, SeriesBar};
use async_trait::async_trait;

/// Output-size hint for the vendor's daily series endpoint. `Compact` covers
/// roughly the 100 most recent trading days; the refresh pipeline only ever
/// requests `Compact`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputSize {
    Compact,
    Full,
}

impl OutputSize {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputSize::Compact => "compact",
            OutputSize::Full => "full",
        }
    }
}

/// Upstream market-data vendor.
///
/// Both operations are idempotent and safe to retry, but implementations must
/// not retry internally: a retried call burns daily quota that cannot be
/// recovered until the next run.
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// Fetch the daily bar series for one symbol, sorted newest first.
    async fn fetch_daily_series(
        &self,
        symbol: &str,
        size: OutputSize,
    ) -> Result<Vec<SeriesBar>, ProviderError>;

    /// Fetch the company overview for one symbol.
    async fn fetch_overview(&self, symbol: &str) -> Result<CompanyOverview, ProviderError>;
}
