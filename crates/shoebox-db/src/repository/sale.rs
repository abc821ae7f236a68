//! # Sale Repository
//!
//! ## Sale Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Sale Lifecycle                                    │
//! │                                                                         │
//! │  1. CREATE (one transaction)                                           │
//! │     └── StockRepository::try_decrement()                               │
//! │     └── MovementRepository::record(Sale)                               │
//! │     └── SaleRepository::insert() ← cost + rate snapshot                │
//! │                                                                         │
//! │  2. NO UPDATES. A sale is immutable once stored.                       │
//! │                                                                         │
//! │  3. DELETE (one transaction)                                           │
//! │     └── StockRepository::increment()  ← compensation first             │
//! │     └── MovementRepository::record(Compensation)                       │
//! │     └── SaleRepository::delete()                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use sqlx::{SqliteConnection, SqlitePool};
use tracing::debug;

use crate::error::DbResult;
use shoebox_core::{ChannelTotals, Sale, SalesStats};

const SALE_COLUMNS: &str = r#"
    id, product_id, size, quantity,
    unit_price_cents, total_price_cents,
    cost_price_at_sale_cents, exchange_rate_at_sale_milli,
    profit_cents, is_online, owner_id, created_at
"#;

/// Repository for sales.
#[derive(Debug, Clone)]
pub struct SaleRepository {
    pool: SqlitePool,
}

impl SaleRepository {
    pub fn new(pool: SqlitePool) -> Self {
        SaleRepository { pool }
    }

    // =========================================================================
    // Pool Reads
    // =========================================================================

    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Sale>> {
        let sql = format!("SELECT {} FROM sales WHERE id = ?1", SALE_COLUMNS);

        let sale = sqlx::query_as::<_, Sale>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(sale)
    }

    /// IDs of all sales, or only online ones, oldest first.
    pub async fn list_ids(&self, online_only: bool) -> DbResult<Vec<String>> {
        let ids: Vec<String> = sqlx::query_scalar(
            r#"
            SELECT id FROM sales
            WHERE (?1 = 0 OR is_online = 1)
            ORDER BY created_at ASC, rowid ASC
            "#,
        )
        .bind(online_only)
        .fetch_all(&self.pool)
        .await?;

        Ok(ids)
    }

    /// Sales attributed to one owner, newest first.
    pub async fn list_by_owner(&self, owner_id: &str) -> DbResult<Vec<Sale>> {
        let sql = format!(
            "SELECT {} FROM sales WHERE owner_id = ?1 ORDER BY created_at DESC, rowid DESC",
            SALE_COLUMNS
        );

        let sales = sqlx::query_as::<_, Sale>(&sql)
            .bind(owner_id)
            .fetch_all(&self.pool)
            .await?;

        debug!(owner_id, count = sales.len(), "Sales by owner");
        Ok(sales)
    }

    /// Totals per channel over every stored sale.
    pub async fn stats(&self) -> DbResult<SalesStats> {
        let online = self.channel_totals(true).await?;
        let in_store = self.channel_totals(false).await?;

        Ok(SalesStats::from_channels(online, in_store))
    }

    async fn channel_totals(&self, is_online: bool) -> DbResult<ChannelTotals> {
        let totals = sqlx::query_as::<_, ChannelTotals>(
            r#"
            SELECT
                COUNT(*)                          AS sale_count,
                COALESCE(SUM(quantity), 0)        AS units_sold,
                COALESCE(SUM(total_price_cents), 0) AS revenue_cents,
                COALESCE(SUM(profit_cents), 0)    AS profit_cents
            FROM sales
            WHERE is_online = ?1
            "#,
        )
        .bind(is_online)
        .fetch_one(&self.pool)
        .await?;

        Ok(totals)
    }

    // =========================================================================
    // Transaction Steps
    // =========================================================================

    pub async fn insert(conn: &mut SqliteConnection, sale: &Sale) -> DbResult<()> {
        debug!(id = %sale.id, product_id = %sale.product_id, size = %sale.size, "Inserting sale");

        let sql = format!(
            "INSERT INTO sales ({}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
            SALE_COLUMNS
        );

        sqlx::query(&sql)
            .bind(&sale.id)
            .bind(&sale.product_id)
            .bind(&sale.size)
            .bind(sale.quantity)
            .bind(sale.unit_price_cents)
            .bind(sale.total_price_cents)
            .bind(sale.cost_price_at_sale_cents)
            .bind(sale.exchange_rate_at_sale_milli)
            .bind(sale.profit_cents)
            .bind(sale.is_online)
            .bind(&sale.owner_id)
            .bind(sale.created_at)
            .execute(&mut *conn)
            .await?;

        Ok(())
    }

    /// Removes a sale. Returns false when it was already gone.
    pub async fn delete(conn: &mut SqliteConnection, id: &str) -> DbResult<bool> {
        let result = sqlx::query("DELETE FROM sales WHERE id = ?1")
            .bind(id)
            .execute(&mut *conn)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
