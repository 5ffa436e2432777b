//! Market data domain types.
//!
//! Wire-level types (`SeriesBar`, `CompanyOverview`) keep the vendor's
//! decimal fields as verbatim strings; normalization into typed values
//! happens here, in one place, before anything reaches the store.

use crate::domain::errors::ProviderError;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::str::FromStr;

/// One trading day as returned by the vendor, newest first in a series.
///
/// Decimal fields are preserved verbatim as strings; converting through a
/// float here would silently lose precision on price and volume.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeriesBar {
    /// Trading date, `YYYY-MM-DD`.
    pub date: String,
    pub open: String,
    pub high: String,
    pub low: String,
    pub close: String,
    pub volume: String,
}

/// Company overview payload. Every field is optional on the wire.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct CompanyOverview {
    #[serde(rename = "Symbol")]
    pub symbol: Option<String>,
    #[serde(rename = "AssetType")]
    pub asset_type: Option<String>,
    #[serde(rename = "Name")]
    pub name: Option<String>,
    #[serde(rename = "Description")]
    pub description: Option<String>,
    #[serde(rename = "Exchange")]
    pub exchange: Option<String>,
    #[serde(rename = "Sector")]
    pub sector: Option<String>,
    #[serde(rename = "Industry")]
    pub industry: Option<String>,
    #[serde(rename = "MarketCapitalization")]
    pub market_capitalization: Option<String>,
}

/// Normalized daily bar, ready for persistence.
///
/// Close and volume are mandatory; open/high/low may be absent on the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DailyBar {
    pub date: NaiveDate,
    pub open: Option<Decimal>,
    pub high: Option<Decimal>,
    pub low: Option<Decimal>,
    pub close: Decimal,
    pub volume: i64,
}

impl DailyBar {
    /// Converts a wire bar into its typed form.
    ///
    /// A bar whose date, close or volume cannot be parsed makes the whole
    /// series unusable and surfaces as a format error on the item.
    pub fn from_series(bar: &SeriesBar) -> Result<Self, ProviderError> {
        let date = NaiveDate::parse_from_str(bar.date.trim(), "%Y-%m-%d").map_err(|e| {
            ProviderError::Format(format!("bad trading date '{}': {}", bar.date, e))
        })?;

        let close = required_price("close", &bar.close)?;
        let volume = bar.volume.trim().parse::<i64>().map_err(|e| {
            ProviderError::Format(format!("bad volume '{}': {}", bar.volume, e))
        })?;

        Ok(Self {
            date,
            open: optional_price("open", &bar.open)?,
            high: optional_price("high", &bar.high)?,
            low: optional_price("low", &bar.low)?,
            close,
            volume,
        })
    }
}

fn required_price(field: &'static str, raw: &str) -> Result<Decimal, ProviderError> {
    Decimal::from_str(raw.trim())
        .map_err(|e| ProviderError::Format(format!("bad {} '{}': {}", field, raw, e)))
}

fn optional_price(field: &'static str, raw: &str) -> Result<Option<Decimal>, ProviderError> {
    if raw.trim().is_empty() {
        return Ok(None);
    }
    required_price(field, raw).map(Some)
}

/// Descriptive fields written to a symbol row by a successful overview fetch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OverviewUpdate {
    pub name: Option<String>,
    pub asset_type: Option<String>,
    pub description: Option<String>,
    pub exchange: Option<String>,
    pub sector: Option<String>,
    pub industry: Option<String>,
    /// Arbitrary-precision integer; anything non-integer on the wire is null.
    pub market_cap: Option<Decimal>,
}

impl OverviewUpdate {
    pub fn from_overview(overview: &CompanyOverview) -> Self {
        Self {
            name: normalize_text(overview.name.as_deref()),
            asset_type: normalize_text(overview.asset_type.as_deref()),
            description: normalize_text(overview.description.as_deref()),
            exchange: normalize_text(overview.exchange.as_deref()),
            sector: normalize_text(overview.sector.as_deref()),
            industry: normalize_text(overview.industry.as_deref()),
            market_cap: parse_market_cap(overview.market_capitalization.as_deref()),
        }
    }
}

/// The vendor pads absent overview fields with placeholder tokens.
fn normalize_text(value: Option<&str>) -> Option<String> {
    let trimmed = value?.trim();
    if trimmed.is_empty() {
        return None;
    }
    match trimmed.to_lowercase().as_str() {
        "none" | "null" | "n/a" => None,
        _ => Some(trimmed.to_string()),
    }
}

fn parse_market_cap(value: Option<&str>) -> Option<Decimal> {
    let text = normalize_text(value)?;
    let cap = Decimal::from_str(&text).ok()?;
    if cap.is_integer() { Some(cap) } else { None }
}

/// Day-over-day percentage change between the latest close and the previous
/// one. Undefined (None) when the previous close is absent or zero.
pub fn day_over_day_change(latest: Decimal, previous: Option<Decimal>) -> Option<Decimal> {
    let previous = previous?;
    if previous.is_zero() {
        return None;
    }
    latest
        .checked_sub(previous)?
        .checked_div(previous)?
        .checked_mul(Decimal::ONE_HUNDRED)
}
