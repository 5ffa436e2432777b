use crate::domain::market::{DailyBar, OverviewUpdate};
use crate::domain::repositories::StockRepository;
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{Row, SqlitePool};

pub struct SqliteStockRepository {
    pool: SqlitePool,
}

impl SqliteStockRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl StockRepository for SqliteStockRepository {
    async fn upsert_symbol_seed(&self, symbol: &str) -> Result<()> {
        sqlx::query("INSERT INTO stocks (symbol) VALUES (?) ON CONFLICT(symbol) DO NOTHING")
            .bind(symbol)
            .execute(&self.pool)
            .await
            .context("Failed to seed stock row")?;

        Ok(())
    }

    async fn upsert_symbol_overview(
        &self,
        symbol: &str,
        update: &OverviewUpdate,
        fetched_at: DateTime<Utc>,
    ) -> Result<()> {
        // logo_url is deliberately absent from the update set: the refresh
        // pipeline never touches it.
        sqlx::query(
            r#"
            INSERT INTO stocks
            (symbol, name, asset_type, description, exchange, sector, industry, market_cap, overview_fetched_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(symbol) DO UPDATE SET
                name = excluded.name,
                asset_type = excluded.asset_type,
                description = excluded.description,
                exchange = excluded.exchange,
                sector = excluded.sector,
                industry = excluded.industry,
                market_cap = excluded.market_cap,
                overview_fetched_at = excluded.overview_fetched_at
            "#,
        )
        .bind(symbol)
        .bind(&update.name)
        .bind(&update.asset_type)
        .bind(&update.description)
        .bind(&update.exchange)
        .bind(&update.sector)
        .bind(&update.industry)
        .bind(update.market_cap.map(|cap| cap.to_string()))
        .bind(fetched_at.timestamp())
        .execute(&self.pool)
        .await
        .context("Failed to upsert company overview")?;

        Ok(())
    }

    async fn upsert_daily_bar(&self, symbol: &str, bar: &DailyBar) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO daily_prices (symbol, date, open, high, low, close, volume)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(symbol, date) DO UPDATE SET
                open = excluded.open,
                high = excluded.high,
                low = excluded.low,
                close = excluded.close,
                volume = excluded.volume
            "#,
        )
        .bind(symbol)
        .bind(bar.date.format("%Y-%m-%d").to_string())
        .bind(bar.open.map(|price| price.to_string()))
        .bind(bar.high.map(|price| price.to_string()))
        .bind(bar.low.map(|price| price.to_string()))
        .bind(bar.close.to_string())
        .bind(bar.volume)
        .execute(&self.pool)
        .await
        .context("Failed to upsert daily bar")?;

        Ok(())
    }

    async fn list_stale_overview_candidates(
        &self,
        symbols: &[String],
        stale_before: DateTime<Utc>,
        limit: usize,
    ) -> Result<Vec<String>> {
        if symbols.is_empty() || limit == 0 {
            return Ok(Vec::new());
        }

        let placeholders = vec!["?"; symbols.len()].join(", ");
        let sql = format!(
            r#"
            SELECT symbol FROM stocks
            WHERE symbol IN ({placeholders})
              AND (overview_fetched_at IS NULL OR overview_fetched_at < ?)
            ORDER BY overview_fetched_at ASC NULLS FIRST, symbol ASC
            LIMIT ?
            "#,
        );

        let mut query = sqlx::query(&sql);
        for symbol in symbols {
            query = query.bind(symbol);
        }
        query = query.bind(stale_before.timestamp()).bind(limit as i64);

        let rows = query
            .fetch_all(&self.pool)
            .await
            .context("Failed to list stale overview candidates")?;

        let mut candidates = Vec::with_capacity(rows.len());
        for row in rows {
            candidates.push(row.try_get("symbol")?);
        }
        Ok(candidates)
    }
}
