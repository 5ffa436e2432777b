use serde::Deserialize;

/// One day inside the `"Time Series (Daily)"` container. Fields the vendor
/// omits default to the empty string so absence survives as-is.
#[derive(Debug, Deserialize)]
pub(crate) struct DailyEntry {
    #[serde(rename = "1. open", default)]
    pub open: String,
    #[serde(rename = "2. high", default)]
    pub high: String,
    #[serde(rename = "3. low", default)]
    pub low: String,
    #[serde(rename = "4. close", default)]
    pub close: String,
    #[serde(rename = "5. volume", default)]
    pub volume: String,
}
