//! # Supplier Payment Repository
//!
//! Payments are immutable rows. Deleting one is the only way to undo it,
//! and the engine reverses its effect on the linked purchase in the same
//! transaction.

use sqlx::{SqliteConnection, SqlitePool};
use tracing::debug;

use crate::error::DbResult;
use shoebox_core::SupplierPayment;

/// Repository for supplier payments.
#[derive(Debug, Clone)]
pub struct PaymentRepository {
    pool: SqlitePool,
}

impl PaymentRepository {
    pub fn new(pool: SqlitePool) -> Self {
        PaymentRepository { pool }
    }

    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<SupplierPayment>> {
        let payment = sqlx::query_as::<_, SupplierPayment>(
            r#"
            SELECT id, supplier_id, purchase_id, amount_cents, payment_date
            FROM supplier_payments
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(payment)
    }

    /// Payments for one supplier, newest first.
    pub async fn list_by_supplier(&self, supplier_id: &str) -> DbResult<Vec<SupplierPayment>> {
        let payments = sqlx::query_as::<_, SupplierPayment>(
            r#"
            SELECT id, supplier_id, purchase_id, amount_cents, payment_date
            FROM supplier_payments
            WHERE supplier_id = ?1
            ORDER BY payment_date DESC, rowid DESC
            "#,
        )
        .bind(supplier_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(payments)
    }

    // =========================================================================
    // Transaction Steps
    // =========================================================================

    pub async fn insert(conn: &mut SqliteConnection, payment: &SupplierPayment) -> DbResult<()> {
        debug!(
            id = %payment.id,
            supplier_id = %payment.supplier_id,
            purchase_id = ?payment.purchase_id,
            amount_cents = payment.amount_cents,
            "Inserting supplier payment"
        );

        sqlx::query(
            r#"
            INSERT INTO supplier_payments (id, supplier_id, purchase_id, amount_cents, payment_date)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
        )
        .bind(&payment.id)
        .bind(&payment.supplier_id)
        .bind(&payment.purchase_id)
        .bind(payment.amount_cents)
        .bind(payment.payment_date)
        .execute(&mut *conn)
        .await?;

        Ok(())
    }

    /// Removes a payment. Returns false when it was already gone.
    pub async fn delete(conn: &mut SqliteConnection, id: &str) -> DbResult<bool> {
        let result = sqlx::query("DELETE FROM supplier_payments WHERE id = ?1")
            .bind(id)
            .execute(&mut *conn)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{seed_supplier, test_db};
    use super::*;
    use chrono::Utc;

    fn payment(id: &str, amount: i64) -> SupplierPayment {
        SupplierPayment {
            id: id.to_string(),
            supplier_id: "sup".to_string(),
            purchase_id: None,
            amount_cents: amount,
            payment_date: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_insert_list_delete() {
        let db = test_db().await;
        seed_supplier(&db, "sup").await;

        let mut tx = db.begin().await.unwrap();
        PaymentRepository::insert(&mut tx, &payment("pay1", 500)).await.unwrap();
        PaymentRepository::insert(&mut tx, &payment("pay2", 700)).await.unwrap();
        tx.commit().await.unwrap();

        let listed = db.payments().list_by_supplier("sup").await.unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].id, "pay2");

        let mut tx = db.begin().await.unwrap();
        assert!(PaymentRepository::delete(&mut tx, "pay1").await.unwrap());
        tx.commit().await.unwrap();

        assert!(db.payments().get_by_id("pay1").await.unwrap().is_none());
        assert!(db.payments().get_by_id("pay2").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_zero_amount_rejected_by_schema() {
        let db = test_db().await;
        seed_supplier(&db, "sup").await;

        let mut tx = db.begin().await.unwrap();
        let result = PaymentRepository::insert(&mut tx, &payment("pay1", 0)).await;
        assert!(matches!(
            result,
            Err(crate::error::DbError::ConstraintViolation { .. })
        ));
    }
}
