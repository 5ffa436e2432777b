use thiserror::Error;

/// Fatal configuration problems, detected before any provider call is spent.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing ALPHAVANTAGE_API_KEY")]
    MissingApiKey,

    #[error("Invalid {name}: {reason}")]
    InvalidSetting { name: &'static str, reason: String },
}

/// Classified outcome of a single provider call.
///
/// Classification happens once, at the vendor boundary, so the refresh loop
/// only ever reasons about these four kinds instead of raw HTTP/JSON shapes.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("transport failure: {0}")]
    Transport(String),

    #[error("malformed payload: {0}")]
    Format(String),

    #[error("call frequency exceeded: {0}")]
    Throttled(String),

    #[error("rejected by provider: {0}")]
    Rejected(String),
}

impl ProviderError {
    /// Stable label used in log fields and failure records.
    pub fn kind(&self) -> &'static str {
        match self {
            ProviderError::Transport(_) => "transport",
            ProviderError::Format(_) => "format",
            ProviderError::Throttled(_) => "throttled",
            ProviderError::Rejected(_) => "rejected",
        }
    }
}
