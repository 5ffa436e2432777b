//! Alpha Vantage adapter.
//!
//! Free tier: 25 API calls per day, shared across all endpoints. The client
//! performs exactly one HTTP call per operation and classifies the response
//! at this boundary; it never retries.

mod client;
mod models;

pub use client::AlphaVantageClient;
