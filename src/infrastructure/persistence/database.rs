use anyhow::{Context, Result};

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::path::Path;
use std::str::FromStr;
use tokio::fs;
use tracing::info;

/// Singleton database wrapper
#[derive(Clone)]
pub struct Database {
    pub pool: SqlitePool,
}

impl Database {
    pub async fn new(db_url: &str) -> Result<Self> {
        // Ensure the directory exists if it's a file path
        if let Some(path_part) = db_url.strip_prefix("sqlite://") {
            let path = Path::new(path_part);
            if let Some(parent) = path.parent()
                && !parent.exists()
            {
                fs::create_dir_all(parent)
                    .await
                    .context("Failed to create database directory")?;
            }
        }

        let options = SqliteConnectOptions::from_str(db_url)?
            .create_if_missing(true)
            .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal); // Better for concurrency

        // An in-memory database lives inside its connection, so the pool
        // must not hand out a second one.
        let max_connections = if db_url.contains(":memory:") { 1 } else { 5 };

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await
            .context("Failed to connect to SQLite database")?;

        info!("Connected to database: {}", db_url);

        let db = Self { pool };
        db.init().await?;

        Ok(db)
    }

    /// Initialize database schema
    async fn init(&self) -> Result<()> {
        let mut conn = self.pool.acquire().await?;

        // 1. Stocks Table. Descriptive fields stay null until the first
        // successful overview fetch; logo_url is populated by the seed
        // utility, never by the refresh pipeline.
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS stocks (
                symbol TEXT PRIMARY KEY,
                name TEXT,
                asset_type TEXT,
                description TEXT,
                exchange TEXT,
                sector TEXT,
                industry TEXT,
                market_cap TEXT,
                logo_url TEXT,
                overview_fetched_at INTEGER
            );
            "#,
        )
        .execute(&mut *conn)
        .await
        .context("Failed to create stocks table")?;

        // 2. Daily Prices Table. Price fields are decimal strings; going
        // through REAL would lose precision.
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS daily_prices (
                symbol TEXT NOT NULL,
                date TEXT NOT NULL,
                open TEXT,
                high TEXT,
                low TEXT,
                close TEXT NOT NULL,
                volume INTEGER NOT NULL,
                PRIMARY KEY (symbol, date)
            );
            "#,
        )
        .execute(&mut *conn)
        .await
        .context("Failed to create daily_prices table")?;

        // Index for faster date-range queries on the read side
        sqlx::query(
            r#"
            CREATE INDEX IF NOT EXISTS idx_daily_prices_symbol_date
            ON daily_prices (symbol, date DESC);
            "#,
        )
        .execute(&mut *conn)
        .await
        .context("Failed to create daily price index")?;

        info!("Database schema initialized.");
        Ok(())
    }
}
