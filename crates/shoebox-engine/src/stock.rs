//! # Stock Ledger
//!
//! Quantities per (product, size), never negative.
//!
//! ```text
//! replenish          +qty   reason: replenishment   (public)
//! bulk_replenish     +qty…  reason: replenishment   (public, all or nothing)
//! reserve            −qty   reason: sale            (sales engine only)
//! compensate         +qty   reason: compensation    (sale deletion only)
//! purchase restock   +qty   reason: purchase        (purchase ledger only)
//! ```

use serde::{Deserialize, Serialize};
use sqlx::SqliteConnection;
use tracing::{debug, info};
use ts_rs::TS;

use shoebox_core::validation::{validate_quantity, validate_threshold};
use shoebox_core::{CoreError, MovementReason, StockEntry, StockMovement, ValidationError};
use shoebox_db::{MovementRepository, StockRepository};

use crate::error::EngineResult;
use crate::{variant_key, Engine};

/// Most movements returned by [`Engine::stock_movements`].
const MOVEMENT_PAGE: u32 = 500;

/// Quantity of one variant after a change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct StockLevel {
    pub product_id: String,
    pub size: String,
    pub quantity: i64,
}

/// One line of a bulk replenishment.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplenishLine {
    pub size: String,
    pub quantity: i64,
}

impl Engine {
    // =========================================================================
    // Reads
    // =========================================================================

    /// Quantity on hand; 0 for a variant never stocked.
    pub async fn quantity(&self, product_id: &str, size: &str) -> EngineResult<i64> {
        Ok(self.db.stock().quantity(product_id, size.trim()).await?)
    }

    /// Variants at or below `threshold`.
    pub async fn list_below(&self, threshold: i64) -> EngineResult<Vec<StockEntry>> {
        validate_threshold(threshold)?;
        Ok(self.db.stock().list_below(threshold).await?)
    }

    /// Audit trail for one variant, newest first.
    pub async fn stock_movements(
        &self,
        product_id: &str,
        size: &str,
    ) -> EngineResult<Vec<StockMovement>> {
        Ok(self
            .db
            .movements()
            .list_for_variant(product_id, size.trim(), MOVEMENT_PAGE)
            .await?)
    }

    // =========================================================================
    // Replenishment
    // =========================================================================

    /// Adds `qty` pairs to a declared variant, creating the entry if absent.
    pub async fn replenish(&self, product_id: &str, size: &str, qty: i64) -> EngineResult<StockLevel> {
        let size = size.trim();
        validate_quantity(qty)?;
        self.resolve_variant(product_id, size).await?;

        let _guard = self.stock_locks.lock(variant_key(product_id, size)).await;

        let mut tx = self.db.begin().await?;
        let quantity =
            add_stock(&mut tx, product_id, size, qty, MovementReason::Replenishment, None).await?;
        tx.commit().await?;

        info!(product_id, size, qty, quantity, "Stock replenished");
        Ok(StockLevel {
            product_id: product_id.to_string(),
            size: size.to_string(),
            quantity,
        })
    }

    /// Replenishes several sizes of one product in a single transaction.
    ///
    /// Every line is validated before anything is written; one bad line
    /// rejects the whole request.
    pub async fn bulk_replenish(
        &self,
        product_id: &str,
        lines: Vec<ReplenishLine>,
    ) -> EngineResult<Vec<StockLevel>> {
        if lines.is_empty() {
            return Err(ValidationError::Required {
                field: "lines".to_string(),
            }
            .into());
        }

        let product = self.get_product(product_id).await?;
        let mut cleaned = Vec::with_capacity(lines.len());
        for line in lines {
            let size = line.size.trim().to_string();
            validate_quantity(line.quantity)?;
            if !product.offers_size(&size) {
                return Err(CoreError::not_found("Size", format!("{} / {}", product_id, size)).into());
            }
            cleaned.push((size, line.quantity));
        }

        let _guards = self
            .stock_locks
            .lock_many(cleaned.iter().map(|(size, _)| variant_key(product_id, size)))
            .await;

        let mut tx = self.db.begin().await?;
        let mut levels = Vec::with_capacity(cleaned.len());
        for (size, qty) in &cleaned {
            let quantity =
                add_stock(&mut tx, product_id, size, *qty, MovementReason::Replenishment, None)
                    .await?;
            levels.push(StockLevel {
                product_id: product_id.to_string(),
                size: size.clone(),
                quantity,
            });
        }
        tx.commit().await?;

        info!(product_id, lines = levels.len(), "Bulk replenishment applied");
        Ok(levels)
    }
}

// =============================================================================
// Transaction Steps
// =============================================================================

/// Increments a variant and records the movement. Returns the new quantity.
pub(crate) async fn add_stock(
    conn: &mut SqliteConnection,
    product_id: &str,
    size: &str,
    qty: i64,
    reason: MovementReason,
    reference_id: Option<&str>,
) -> EngineResult<i64> {
    let quantity = StockRepository::increment(&mut *conn, product_id, size, qty).await?;
    MovementRepository::record(&mut *conn, product_id, size, qty, reason, reference_id).await?;
    Ok(quantity)
}

/// Atomically takes `qty` pairs or fails with `InsufficientStock`.
///
/// On failure nothing has been written and the caller drops its transaction.
pub(crate) async fn reserve(
    conn: &mut SqliteConnection,
    product_id: &str,
    size: &str,
    qty: i64,
    sale_id: &str,
) -> EngineResult<()> {
    if !StockRepository::try_decrement(&mut *conn, product_id, size, qty).await? {
        let available = StockRepository::quantity_in(&mut *conn, product_id, size).await?;
        debug!(product_id, size, requested = qty, available, "Reservation refused");

        return Err(CoreError::InsufficientStock {
            product_id: product_id.to_string(),
            size: size.to_string(),
            available,
            requested: qty,
        }
        .into());
    }

    MovementRepository::record(&mut *conn, product_id, size, -qty, MovementReason::Sale, Some(sale_id))
        .await?;
    Ok(())
}

/// Returns a deleted sale's pairs. Cannot fail for domain reasons.
pub(crate) async fn compensate(
    conn: &mut SqliteConnection,
    product_id: &str,
    size: &str,
    qty: i64,
    sale_id: &str,
) -> EngineResult<i64> {
    add_stock(conn, product_id, size, qty, MovementReason::Compensation, Some(sale_id)).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{engine, shoe};

    #[tokio::test]
    async fn test_quantity_defaults_to_zero() {
        let engine = engine().await;
        assert_eq!(engine.quantity("nothing", "42").await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_replenish_creates_and_accumulates() {
        let engine = engine().await;
        let product = shoe(&engine, "41,42").await;

        engine.replenish(&product.id, "42", 4).await.unwrap();
        let level = engine.replenish(&product.id, " 42 ", 6).await.unwrap();
        assert_eq!(level.quantity, 10);
        assert_eq!(engine.quantity(&product.id, "42").await.unwrap(), 10);

        let movements = engine.stock_movements(&product.id, "42").await.unwrap();
        assert_eq!(movements.len(), 2);
        assert!(movements.iter().all(|m| m.reason == MovementReason::Replenishment));
    }

    #[tokio::test]
    async fn test_replenish_rejects_bad_input() {
        let engine = engine().await;
        let product = shoe(&engine, "42").await;

        let err = engine.replenish(&product.id, "42", 0).await.unwrap_err();
        assert!(matches!(
            err.as_domain(),
            Some(CoreError::Validation(ValidationError::InvalidAmount { .. }))
        ));

        let err = engine.replenish(&product.id, "47", 1).await.unwrap_err();
        assert!(matches!(err.as_domain(), Some(CoreError::NotFound { .. })));

        let err = engine.replenish("ghost", "42", 1).await.unwrap_err();
        assert!(matches!(err.as_domain(), Some(CoreError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_bulk_replenish_all_or_nothing() {
        let engine = engine().await;
        let product = shoe(&engine, "40,41,42").await;

        let err = engine
            .bulk_replenish(
                &product.id,
                vec![
                    ReplenishLine { size: "40".to_string(), quantity: 2 },
                    ReplenishLine { size: "41".to_string(), quantity: -1 },
                ],
            )
            .await
            .unwrap_err();
        assert!(err.as_domain().is_some());
        assert_eq!(engine.quantity(&product.id, "40").await.unwrap(), 0);

        let levels = engine
            .bulk_replenish(
                &product.id,
                vec![
                    ReplenishLine { size: "42".to_string(), quantity: 5 },
                    ReplenishLine { size: "40".to_string(), quantity: 2 },
                    ReplenishLine { size: "42".to_string(), quantity: 1 },
                ],
            )
            .await
            .unwrap();
        assert_eq!(levels.len(), 3);
        assert_eq!(levels[2].quantity, 6);
        assert_eq!(engine.quantity(&product.id, "42").await.unwrap(), 6);
        assert_eq!(engine.quantity(&product.id, "40").await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_bulk_replenish_requires_lines() {
        let engine = engine().await;
        let product = shoe(&engine, "40").await;
        assert!(engine.bulk_replenish(&product.id, Vec::new()).await.is_err());
    }

    #[tokio::test]
    async fn test_list_below() {
        let engine = engine().await;
        let product = shoe(&engine, "40,41").await;
        engine.replenish(&product.id, "40", 2).await.unwrap();
        engine.replenish(&product.id, "41", 20).await.unwrap();

        let low = engine.list_below(3).await.unwrap();
        assert_eq!(low.len(), 1);
        assert_eq!(low[0].size, "40");
        assert!(engine.list_below(-1).await.is_err());
    }
}
