use super::models::DailyEntry;
use crate::domain::errors::ProviderError;
use crate::domain::market::{CompanyOverview, SeriesBar};
use crate::domain::ports::{MarketDataProvider, OutputSize};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::collections::HashMap;
use std::time::Duration;

const BASE_URL: &str = "https://www.alphavantage.co/query";

const SERIES_CONTAINER: &str = "Time Series (Daily)";

pub struct AlphaVantageClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl AlphaVantageClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(10))
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            api_key: api_key.into(),
            base_url: BASE_URL.to_string(),
        }
    }

    /// Points the client at a different endpoint, e.g. a local stub server.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    async fn query(&self, params: &[(&str, &str)]) -> Result<String, ProviderError> {
        let response = self
            .client
            .get(&self.base_url)
            .query(params)
            .query(&[("apikey", self.api_key.as_str())])
            .send()
            .await
            .map_err(|e| ProviderError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProviderError::Transport(format!("HTTP {}", status)));
        }

        response
            .text()
            .await
            .map_err(|e| ProviderError::Transport(e.to_string()))
    }
}

#[async_trait]
impl MarketDataProvider for AlphaVantageClient {
    async fn fetch_daily_series(
        &self,
        symbol: &str,
        size: OutputSize,
    ) -> Result<Vec<SeriesBar>, ProviderError> {
        let body = self
            .query(&[
                ("function", "TIME_SERIES_DAILY"),
                ("symbol", symbol),
                ("outputsize", size.as_str()),
            ])
            .await?;
        parse_daily_body(&body)
    }

    async fn fetch_overview(&self, symbol: &str) -> Result<CompanyOverview, ProviderError> {
        let body = self
            .query(&[("function", "OVERVIEW"), ("symbol", symbol)])
            .await?;
        parse_overview_body(&body)
    }
}

fn parse_daily_body(body: &str) -> Result<Vec<SeriesBar>, ProviderError> {
    let payload = parse_json(body)?;
    check_vendor_signals(&payload)?;

    let series = payload
        .get(SERIES_CONTAINER)
        .ok_or_else(|| ProviderError::Format(format!("missing '{}'", SERIES_CONTAINER)))?;

    let entries: HashMap<String, DailyEntry> = serde_json::from_value(series.clone())
        .map_err(|e| ProviderError::Format(format!("unexpected daily series shape: {}", e)))?;

    let mut bars: Vec<SeriesBar> = entries
        .into_iter()
        .map(|(date, entry)| SeriesBar {
            date,
            open: entry.open,
            high: entry.high,
            low: entry.low,
            close: entry.close,
            volume: entry.volume,
        })
        .collect();

    // Newest first. ISO dates sort lexicographically.
    bars.sort_by(|a, b| b.date.cmp(&a.date));
    Ok(bars)
}

fn parse_overview_body(body: &str) -> Result<CompanyOverview, ProviderError> {
    let payload = parse_json(body)?;
    check_vendor_signals(&payload)?;

    serde_json::from_value(payload)
        .map_err(|e| ProviderError::Format(format!("unexpected overview shape: {}", e)))
}

fn parse_json(body: &str) -> Result<Value, ProviderError> {
    serde_json::from_str(body)
        .map_err(|_| ProviderError::Format("response body is not JSON".to_string()))
}

/// Vendor-level signals take precedence over any data field present:
/// a rate-limit note mentioning call frequency means throttled, an explicit
/// error field means the request was rejected.
fn check_vendor_signals(payload: &Value) -> Result<(), ProviderError> {
    for field in ["Note", "Information"] {
        if let Some(text) = payload.get(field).and_then(Value::as_str)
            && text.to_lowercase().contains("frequency")
        {
            return Err(ProviderError::Throttled(text.to_string()));
        }
    }

    if let Some(message) = payload.get("Error Message").and_then(Value::as_str) {
        return Err(ProviderError::Rejected(message.to_string()));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const DAILY_BODY: &str = r#"{
        "Meta Data": {
            "1. Information": "Daily Prices (open, high, low, close) and Volumes",
            "2. Symbol": "AAPL"
        },
        "Time Series (Daily)": {
            "2024-03-07": {
                "1. open": "169.1500",
                "2. high": "170.7300",
                "3. low": "168.4900",
                "4. close": "169.0000",
                "5. volume": "71765061"
            },
            "2024-03-08": {
                "1. open": "169.0000",
                "2. high": "173.7000",
                "3. low": "168.9400",
                "4. close": "170.7300",
                "5. volume": "76114634"
            }
        }
    }"#;

    #[test]
    fn test_daily_series_parses_and_sorts_newest_first() {
        let bars = parse_daily_body(DAILY_BODY).unwrap();
        assert_eq!(bars.len(), 2);
        assert_eq!(bars[0].date, "2024-03-08");
        assert_eq!(bars[1].date, "2024-03-07");
        // Decimal strings come through verbatim.
        assert_eq!(bars[0].close, "170.7300");
        assert_eq!(bars[0].volume, "76114634");
    }

    #[test]
    fn test_missing_fields_default_to_empty_strings() {
        let body = r#"{"Time Series (Daily)": {"2024-03-08": {"4. close": "170.73", "5. volume": "100"}}}"#;
        let bars = parse_daily_body(body).unwrap();
        assert_eq!(bars[0].open, "");
        assert_eq!(bars[0].close, "170.73");
    }

    #[test]
    fn test_throttle_note_wins_over_data() {
        let body = r#"{
            "Note": "Thank you for using Alpha Vantage! Our standard API call frequency is 25 requests per day.",
            "Time Series (Daily)": {"2024-03-08": {"4. close": "170.73", "5. volume": "100"}}
        }"#;
        let err = parse_daily_body(body).unwrap_err();
        assert_eq!(err.kind(), "throttled");
    }

    #[test]
    fn test_information_field_also_signals_throttling() {
        let body = r#"{"Information": "Please visit ... if you would like a higher call FREQUENCY"}"#;
        let err = parse_overview_body(body).unwrap_err();
        assert_eq!(err.kind(), "throttled");
    }

    #[test]
    fn test_note_without_frequency_is_not_throttling() {
        let body = r#"{"Note": "The demo endpoint only supports MSFT", "Time Series (Daily)": {}}"#;
        let bars = parse_daily_body(body).unwrap();
        assert!(bars.is_empty());
    }

    #[test]
    fn test_explicit_error_message_is_rejected() {
        let body = r#"{"Error Message": "Invalid API call. Please retry with a valid symbol."}"#;
        let err = parse_daily_body(body).unwrap_err();
        assert_eq!(err.kind(), "rejected");
        assert!(err.to_string().contains("Invalid API call"));
    }

    #[test]
    fn test_non_json_body_is_a_format_error() {
        let err = parse_daily_body("<html>gateway timeout</html>").unwrap_err();
        assert_eq!(err.kind(), "format");
    }

    #[test]
    fn test_missing_series_container_is_a_format_error() {
        let err = parse_daily_body(r#"{"Meta Data": {}}"#).unwrap_err();
        assert_eq!(err.kind(), "format");
        assert!(err.to_string().contains("Time Series (Daily)"));
    }

    #[test]
    fn test_malformed_series_entry_is_a_format_error() {
        let body = r#"{"Time Series (Daily)": {"2024-03-08": {"4. close": 170.73}}}"#;
        let err = parse_daily_body(body).unwrap_err();
        assert_eq!(err.kind(), "format");
    }

    #[test]
    fn test_overview_parses_known_fields() {
        let body = r#"{
            "Symbol": "AAPL",
            "AssetType": "Common Stock",
            "Name": "Apple Inc",
            "Exchange": "NASDAQ",
            "Sector": "TECHNOLOGY",
            "Industry": "ELECTRONIC COMPUTERS",
            "MarketCapitalization": "2953679716000",
            "PERatio": "28.5"
        }"#;
        let overview = parse_overview_body(body).unwrap();
        assert_eq!(overview.name.as_deref(), Some("Apple Inc"));
        assert_eq!(overview.market_capitalization.as_deref(), Some("2953679716000"));
        assert_eq!(overview.description, None);
    }

    #[test]
    fn test_overview_with_wrong_field_type_is_a_format_error() {
        let body = r#"{"Name": "Apple Inc", "MarketCapitalization": 2953679716000}"#;
        let err = parse_overview_body(body).unwrap_err();
        assert_eq!(err.kind(), "format");
    }

    #[test]
    fn test_empty_overview_object_is_valid() {
        let overview = parse_overview_body("{}").unwrap();
        assert_eq!(overview, CompanyOverview::default());
    }
}
