//! # Stock Repository
//!
//! Per-variant quantities keyed by (product_id, size).
//!
//! ## Compare-and-Decrement
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  UPDATE stock                                                           │
//! │     SET quantity = quantity - :qty                                      │
//! │   WHERE product_id = :p AND size = :s AND quantity >= :qty              │
//! │                                                                         │
//! │  rows_affected = 1  → reserved                                         │
//! │  rows_affected = 0  → short (or no entry); nothing was written         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//! The check and the write are one statement, so even without the engine's
//! keyed locks two connections can never both take the last pair.

use chrono::Utc;
use sqlx::{SqliteConnection, SqlitePool};
use tracing::debug;

use crate::error::DbResult;
use shoebox_core::StockEntry;

/// Repository for stock quantities.
#[derive(Debug, Clone)]
pub struct StockRepository {
    pool: SqlitePool,
}

impl StockRepository {
    pub fn new(pool: SqlitePool) -> Self {
        StockRepository { pool }
    }

    // =========================================================================
    // Pool Reads
    // =========================================================================

    /// Quantity on hand; 0 when the variant has no entry.
    pub async fn quantity(&self, product_id: &str, size: &str) -> DbResult<i64> {
        let quantity: Option<i64> =
            sqlx::query_scalar("SELECT quantity FROM stock WHERE product_id = ?1 AND size = ?2")
                .bind(product_id)
                .bind(size)
                .fetch_optional(&self.pool)
                .await?;

        Ok(quantity.unwrap_or(0))
    }

    /// Entries with quantity at or below `threshold`, lowest first.
    pub async fn list_below(&self, threshold: i64) -> DbResult<Vec<StockEntry>> {
        let entries = sqlx::query_as::<_, StockEntry>(
            r#"
            SELECT product_id, size, quantity, updated_at
            FROM stock
            WHERE quantity <= ?1
            ORDER BY quantity ASC, product_id ASC, size ASC
            "#,
        )
        .bind(threshold)
        .fetch_all(&self.pool)
        .await?;

        debug!(threshold, count = entries.len(), "Low stock query");
        Ok(entries)
    }

    // =========================================================================
    // Transaction Steps
    // =========================================================================

    /// Quantity as seen inside the caller's transaction.
    pub async fn quantity_in(
        conn: &mut SqliteConnection,
        product_id: &str,
        size: &str,
    ) -> DbResult<i64> {
        let quantity: Option<i64> =
            sqlx::query_scalar("SELECT quantity FROM stock WHERE product_id = ?1 AND size = ?2")
                .bind(product_id)
                .bind(size)
                .fetch_optional(&mut *conn)
                .await?;

        Ok(quantity.unwrap_or(0))
    }

    /// Decrements only if enough stock is on hand.
    ///
    /// ## Returns
    /// * `Ok(true)` - Decremented
    /// * `Ok(false)` - Short or no entry; nothing written
    pub async fn try_decrement(
        conn: &mut SqliteConnection,
        product_id: &str,
        size: &str,
        qty: i64,
    ) -> DbResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE stock
            SET quantity = quantity - ?3,
                updated_at = ?4
            WHERE product_id = ?1 AND size = ?2 AND quantity >= ?3
            "#,
        )
        .bind(product_id)
        .bind(size)
        .bind(qty)
        .bind(Utc::now())
        .execute(&mut *conn)
        .await?;

        let reserved = result.rows_affected() == 1;
        debug!(product_id, size, qty, reserved, "Compare-and-decrement");
        Ok(reserved)
    }

    /// Adds `qty`, creating the entry when absent. Returns the new quantity.
    pub async fn increment(
        conn: &mut SqliteConnection,
        product_id: &str,
        size: &str,
        qty: i64,
    ) -> DbResult<i64> {
        let quantity: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO stock (product_id, size, quantity, updated_at)
            VALUES (?1, ?2, ?3, ?4)
            ON CONFLICT (product_id, size) DO UPDATE
            SET quantity = quantity + excluded.quantity,
                updated_at = excluded.updated_at
            RETURNING quantity
            "#,
        )
        .bind(product_id)
        .bind(size)
        .bind(qty)
        .bind(Utc::now())
        .fetch_one(&mut *conn)
        .await?;

        debug!(product_id, size, qty, quantity, "Stock incremented");
        Ok(quantity)
    }
}
