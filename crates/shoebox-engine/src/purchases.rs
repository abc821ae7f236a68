//! # Purchase & Supplier Credit Ledger
//!
//! ## Purchase Creation
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  validate qty, unit cost, opening payment, supplier                     │
//! │  lock variant (only when restocking)                                    │
//! │  BEGIN                                                                  │
//! │    insert purchase                                                      │
//! │    SAVEPOINT ── add stock (reason: purchase)                            │
//! │       ok    → RELEASE                                                   │
//! │       error → ROLLBACK TO, warning StockNotReplenished                  │
//! │  COMMIT   (the purchase is kept either way)                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use serde::{Deserialize, Serialize};
use sqlx::{Sqlite, Transaction};
use tracing::{info, warn};
use ts_rs::TS;
use uuid::Uuid;

use shoebox_core::ledger::opening_paid;
use shoebox_core::validation::{validate_price, validate_quantity, validate_size_label};
use shoebox_core::{LedgerWarning, MovementReason, Money, Purchase, ValidationError};
use shoebox_db::PurchaseRepository;

use crate::error::{EngineError, EngineResult};
use crate::stock::add_stock;
use crate::{variant_key, Engine};

/// Input for [`Engine::create_purchase`].
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPurchase {
    pub supplier_id: String,
    pub product_id: String,
    pub size: String,
    pub quantity: i64,
    /// Local minor units.
    pub unit_cost_cents: i64,
    pub is_credit: bool,
    /// Credit purchases only; ignored for cash.
    #[serde(default)]
    pub initial_paid_cents: Option<i64>,
    #[serde(default)]
    pub add_to_stock: bool,
}

/// A committed purchase plus any soft failure worth showing.
#[derive(Debug, Clone, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct PurchaseReceipt {
    pub purchase: Purchase,
    pub warning: Option<LedgerWarning>,
}

impl Engine {
    pub async fn create_purchase(&self, input: NewPurchase) -> EngineResult<PurchaseReceipt> {
        let size = input.size.trim().to_string();
        validate_quantity(input.quantity)?;
        validate_size_label(&size)?;
        let unit_cost = Money::from_cents(input.unit_cost_cents);
        validate_price("unit cost", unit_cost)?;

        let total_cost = unit_cost
            .checked_mul_quantity(input.quantity)
            .ok_or_else(|| ValidationError::invalid_amount("total cost", "exceeds the allowed maximum"))?;
        validate_price("total cost", total_cost)?;
        let paid = opening_paid(
            input.is_credit,
            total_cost,
            input.initial_paid_cents.map(Money::from_cents),
        )?;

        if !self.db.suppliers().exists(&input.supplier_id).await? {
            return Err(EngineError::not_found("Supplier", &input.supplier_id));
        }

        let now = Utc::now();
        let purchase = Purchase {
            id: Uuid::new_v4().to_string(),
            supplier_id: input.supplier_id,
            product_id: input.product_id,
            size,
            quantity: input.quantity,
            unit_cost_cents: unit_cost.cents(),
            total_cost_cents: total_cost.cents(),
            is_credit: input.is_credit,
            paid_cents: paid.cents(),
            initial_paid_cents: paid.cents(),
            is_todo: false,
            created_at: now,
            updated_at: now,
        };

        let warning = if input.add_to_stock {
            let _guard = self
                .stock_locks
                .lock(variant_key(&purchase.product_id, &purchase.size))
                .await;
            // Variant check reads through the pool, so it runs before BEGIN.
            let variant = self.resolve_variant(&purchase.product_id, &purchase.size).await;

            let mut tx = self.db.begin().await?;
            PurchaseRepository::insert(&mut tx, &purchase).await?;
            let warning = match variant {
                Ok(_) => restock_in_savepoint(&mut tx, &purchase).await?,
                Err(err) => Some(not_replenished(&purchase, &err)),
            };
            tx.commit().await?;
            warning
        } else {
            let mut tx = self.db.begin().await?;
            PurchaseRepository::insert(&mut tx, &purchase).await?;
            tx.commit().await?;
            None
        };

        info!(
            purchase_id = %purchase.id,
            supplier_id = %purchase.supplier_id,
            total_cost = %total_cost,
            is_credit = purchase.is_credit,
            paid = %paid,
            restocked = input.add_to_stock && warning.is_none(),
            "Purchase created"
        );
        Ok(PurchaseReceipt { purchase, warning })
    }

    pub async fn get_purchase(&self, id: &str) -> EngineResult<Purchase> {
        self.db
            .purchases()
            .get_by_id(id)
            .await?
            .ok_or_else(|| EngineError::not_found("Purchase", id))
    }

    pub async fn purchases_by_supplier(&self, supplier_id: &str) -> EngineResult<Vec<Purchase>> {
        self.require_supplier(supplier_id).await?;
        Ok(self.db.purchases().list_by_supplier(supplier_id).await?)
    }

    // =========================================================================
    // Todo Workflow
    // =========================================================================

    /// Flags a purchase for supplier follow-up. No-op when already flagged.
    pub async fn mark_todo(&self, id: &str) -> EngineResult<Purchase> {
        self.set_todo(id, true).await
    }

    /// Clears the follow-up flag. No-op when already clear.
    pub async fn mark_done(&self, id: &str) -> EngineResult<Purchase> {
        self.set_todo(id, false).await
    }

    async fn set_todo(&self, id: &str, is_todo: bool) -> EngineResult<Purchase> {
        let _guard = self.purchase_locks.lock(id.to_string()).await;

        let purchase = self
            .db
            .purchases()
            .set_todo(id, is_todo)
            .await?
            .ok_or_else(|| EngineError::not_found("Purchase", id))?;

        info!(purchase_id = %id, is_todo, "Purchase todo flag updated");
        Ok(purchase)
    }
}

/// Adds the purchased pairs inside a savepoint of `tx`.
///
/// Storage failures here roll back to the savepoint and become a warning;
/// only a failure to open or release the savepoint itself is an error.
async fn restock_in_savepoint(
    tx: &mut Transaction<'static, Sqlite>,
    purchase: &Purchase,
) -> EngineResult<Option<LedgerWarning>> {
    let mut savepoint = sqlx::Connection::begin(&mut **tx).await?;

    match add_stock(
        &mut savepoint,
        &purchase.product_id,
        &purchase.size,
        purchase.quantity,
        MovementReason::Purchase,
        Some(&purchase.id),
    )
    .await
    {
        Ok(_) => {
            savepoint.commit().await?;
            Ok(None)
        }
        Err(err) => {
            savepoint.rollback().await?;
            Ok(Some(not_replenished(purchase, &err)))
        }
    }
}

fn not_replenished(purchase: &Purchase, err: &EngineError) -> LedgerWarning {
    warn!(
        purchase_id = %purchase.id,
        product_id = %purchase.product_id,
        size = %purchase.size,
        error = %err,
        "Purchase recorded without restocking"
    );

    LedgerWarning::StockNotReplenished {
        product_id: purchase.product_id.clone(),
        size: purchase.size.clone(),
        reason: err.to_string(),
    }
}
