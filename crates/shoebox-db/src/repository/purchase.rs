//! # Purchase Repository
//!
//! Purchases are written once and then touched in exactly two ways: the
//! payment allocator moves `paid_cents`, the todo workflow flips `is_todo`.

use chrono::Utc;
use sqlx::{SqliteConnection, SqlitePool};
use tracing::debug;

use crate::error::DbResult;
use shoebox_core::Purchase;

const PURCHASE_COLUMNS: &str = r#"
    id, supplier_id, product_id, size, quantity,
    unit_cost_cents, total_cost_cents, is_credit,
    paid_cents, initial_paid_cents, is_todo,
    created_at, updated_at
"#;

/// Repository for supplier purchases.
#[derive(Debug, Clone)]
pub struct PurchaseRepository {
    pool: SqlitePool,
}

impl PurchaseRepository {
    pub fn new(pool: SqlitePool) -> Self {
        PurchaseRepository { pool }
    }

    // =========================================================================
    // Pool Reads and One-Shot Writes
    // =========================================================================

    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Purchase>> {
        let sql = format!("SELECT {} FROM purchases WHERE id = ?1", PURCHASE_COLUMNS);

        let purchase = sqlx::query_as::<_, Purchase>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(purchase)
    }

    /// Purchases for one supplier, newest first.
    pub async fn list_by_supplier(&self, supplier_id: &str) -> DbResult<Vec<Purchase>> {
        let sql = format!(
            "SELECT {} FROM purchases WHERE supplier_id = ?1 ORDER BY created_at DESC, rowid DESC",
            PURCHASE_COLUMNS
        );

        let purchases = sqlx::query_as::<_, Purchase>(&sql)
            .bind(supplier_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(purchases)
    }

    /// Sets the todo flag. Leaves `updated_at` alone when already in state.
    ///
    /// ## Returns
    /// The purchase after the change, or `None` for an unknown id.
    pub async fn set_todo(&self, id: &str, is_todo: bool) -> DbResult<Option<Purchase>> {
        let result = sqlx::query(
            "UPDATE purchases SET is_todo = ?1, updated_at = ?2 WHERE id = ?3 AND is_todo != ?1",
        )
        .bind(is_todo)
        .bind(Utc::now())
        .bind(id)
        .execute(&self.pool)
        .await?;

        debug!(id, is_todo, changed = result.rows_affected() > 0, "Todo flag set");
        self.get_by_id(id).await
    }

    // =========================================================================
    // Transaction Steps
    // =========================================================================

    pub async fn insert(conn: &mut SqliteConnection, purchase: &Purchase) -> DbResult<()> {
        debug!(
            id = %purchase.id,
            supplier_id = %purchase.supplier_id,
            total_cost_cents = purchase.total_cost_cents,
            is_credit = purchase.is_credit,
            "Inserting purchase"
        );

        let sql = format!(
            "INSERT INTO purchases ({}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)",
            PURCHASE_COLUMNS
        );

        sqlx::query(&sql)
            .bind(&purchase.id)
            .bind(&purchase.supplier_id)
            .bind(&purchase.product_id)
            .bind(&purchase.size)
            .bind(purchase.quantity)
            .bind(purchase.unit_cost_cents)
            .bind(purchase.total_cost_cents)
            .bind(purchase.is_credit)
            .bind(purchase.paid_cents)
            .bind(purchase.initial_paid_cents)
            .bind(purchase.is_todo)
            .bind(purchase.created_at)
            .bind(purchase.updated_at)
            .execute(&mut *conn)
            .await?;

        Ok(())
    }

    pub async fn get_in(conn: &mut SqliteConnection, id: &str) -> DbResult<Option<Purchase>> {
        let sql = format!("SELECT {} FROM purchases WHERE id = ?1", PURCHASE_COLUMNS);

        let purchase = sqlx::query_as::<_, Purchase>(&sql)
            .bind(id)
            .fetch_optional(&mut *conn)
            .await?;

        Ok(purchase)
    }

    /// Overwrites the purchase-level paid amount.
    pub async fn set_paid(conn: &mut SqliteConnection, id: &str, paid_cents: i64) -> DbResult<bool> {
        let result =
            sqlx::query("UPDATE purchases SET paid_cents = ?1, updated_at = ?2 WHERE id = ?3")
                .bind(paid_cents)
                .bind(Utc::now())
                .bind(id)
                .execute(&mut *conn)
                .await?;

        Ok(result.rows_affected() > 0)
    }
}
