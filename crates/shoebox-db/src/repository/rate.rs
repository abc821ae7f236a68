//! # Exchange Rate Repository
//!
//! Append-only history. The current rate is the row with the highest id;
//! rows are never updated or deleted.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;
use shoebox_core::{ExchangeRate, ExchangeRateRecord};

/// Repository for exchange rates.
#[derive(Debug, Clone)]
pub struct RateRepository {
    pool: SqlitePool,
}

impl RateRepository {
    pub fn new(pool: SqlitePool) -> Self {
        RateRepository { pool }
    }

    /// Appends a rate and returns the stored record.
    pub async fn append(&self, rate: ExchangeRate) -> DbResult<ExchangeRateRecord> {
        debug!(rate = %rate, "Appending exchange rate");

        let record = sqlx::query_as::<_, ExchangeRateRecord>(
            r#"
            INSERT INTO exchange_rates (rate_milli, recorded_at)
            VALUES (?1, ?2)
            RETURNING id, rate_milli, recorded_at
            "#,
        )
        .bind(rate.milli())
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(record)
    }

    /// Most recently recorded rate, if any.
    pub async fn current(&self) -> DbResult<Option<ExchangeRateRecord>> {
        let record = sqlx::query_as::<_, ExchangeRateRecord>(
            r#"
            SELECT id, rate_milli, recorded_at
            FROM exchange_rates
            ORDER BY id DESC
            LIMIT 1
            "#,
        )
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }

    /// History, newest first.
    pub async fn history(&self, limit: u32) -> DbResult<Vec<ExchangeRateRecord>> {
        let records = sqlx::query_as::<_, ExchangeRateRecord>(
            r#"
            SELECT id, rate_milli, recorded_at
            FROM exchange_rates
            ORDER BY id DESC
            LIMIT ?1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }
}
