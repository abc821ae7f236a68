//! # Stock Movement Repository
//!
//! Audit trail of every stock change. Rows are written inside the same
//! transaction as the quantity change they describe, so the trail and the
//! quantities can never disagree.
//!
//! ```text
//! sale            delta -3   reference = sale id
//! compensation    delta +3   reference = deleted sale id
//! replenishment   delta +5   reference = none
//! purchase        delta +10  reference = purchase id
//! ```

use chrono::Utc;
use sqlx::{SqliteConnection, SqlitePool};
use tracing::debug;
use uuid::Uuid;

use crate::error::DbResult;
use shoebox_core::{MovementReason, StockMovement};

/// Repository for the stock audit trail.
#[derive(Debug, Clone)]
pub struct MovementRepository {
    pool: SqlitePool,
}

impl MovementRepository {
    pub fn new(pool: SqlitePool) -> Self {
        MovementRepository { pool }
    }

    /// Records a movement inside the caller's transaction.
    pub async fn record(
        conn: &mut SqliteConnection,
        product_id: &str,
        size: &str,
        delta: i64,
        reason: MovementReason,
        reference_id: Option<&str>,
    ) -> DbResult<StockMovement> {
        let movement = StockMovement {
            id: Uuid::new_v4().to_string(),
            product_id: product_id.to_string(),
            size: size.to_string(),
            delta,
            reason,
            reference_id: reference_id.map(str::to_string),
            created_at: Utc::now(),
        };

        debug!(
            product_id,
            size,
            delta,
            reason = ?reason,
            "Recording stock movement"
        );

        sqlx::query(
            r#"
            INSERT INTO stock_movements (
                id, product_id, size, delta, reason, reference_id, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
        )
        .bind(&movement.id)
        .bind(&movement.product_id)
        .bind(&movement.size)
        .bind(movement.delta)
        .bind(movement.reason)
        .bind(&movement.reference_id)
        .bind(movement.created_at)
        .execute(&mut *conn)
        .await?;

        Ok(movement)
    }

    /// Movements for one variant, newest first.
    pub async fn list_for_variant(
        &self,
        product_id: &str,
        size: &str,
        limit: u32,
    ) -> DbResult<Vec<StockMovement>> {
        let movements = sqlx::query_as::<_, StockMovement>(
            r#"
            SELECT id, product_id, size, delta, reason, reference_id, created_at
            FROM stock_movements
            WHERE product_id = ?1 AND size = ?2
            ORDER BY created_at DESC, rowid DESC
            LIMIT ?3
            "#,
        )
        .bind(product_id)
        .bind(size)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(movements)
    }

    /// Net quantity implied by the trail for one variant.
    pub async fn net_delta(&self, product_id: &str, size: &str) -> DbResult<i64> {
        let net: i64 = sqlx::query_scalar(
            "SELECT COALESCE(SUM(delta), 0) FROM stock_movements WHERE product_id = ?1 AND size = ?2",
        )
        .bind(product_id)
        .bind(size)
        .fetch_one(&self.pool)
        .await?;

        Ok(net)
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::test_db;
    use super::*;

    #[tokio::test]
    async fn test_movements_newest_first() {
        let db = test_db().await;

        let mut tx = db.begin().await.unwrap();
        MovementRepository::record(&mut tx, "runner-x", "42", 10, MovementReason::Replenishment, None)
            .await
            .unwrap();
        MovementRepository::record(&mut tx, "runner-x", "42", -3, MovementReason::Sale, Some("sale-1"))
            .await
            .unwrap();
        MovementRepository::record(
            &mut tx,
            "runner-x",
            "42",
            3,
            MovementReason::Compensation,
            Some("sale-1"),
        )
        .await
        .unwrap();
        tx.commit().await.unwrap();

        let movements = db.movements().list_for_variant("runner-x", "42", 10).await.unwrap();
        let reasons: Vec<_> = movements.iter().map(|m| m.reason).collect();
        assert_eq!(
            reasons,
            vec![
                MovementReason::Compensation,
                MovementReason::Sale,
                MovementReason::Replenishment
            ]
        );
        assert_eq!(movements[1].reference_id.as_deref(), Some("sale-1"));
        assert_eq!(db.movements().net_delta("runner-x", "42").await.unwrap(), 10);
    }
}
