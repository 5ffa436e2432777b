pub mod alphavantage;
pub mod persistence;

pub use alphavantage::AlphaVantageClient;
pub use persistence::{Database, SqliteStockRepository};
