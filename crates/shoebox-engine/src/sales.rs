//! # Sales Engine
//!
//! ## Sale Creation
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  1. validate quantity / price override                (no I/O)          │
//! │  2. catalog: list price + foreign cost, size declared  (pool)           │
//! │  3. current rate, NoRateConfigured if none             (pool)           │
//! │     price with checked arithmetic, InvalidAmount on overflow           │
//! │  4. lock variant                                                        │
//! │  5. BEGIN                                                               │
//! │       reserve ──► InsufficientStock? drop tx, nothing written           │
//! │       insert sale with cost + rate snapshot                             │
//! │     COMMIT                                                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Sale Deletion
//! Compensation is written before the sale row is removed, inside one
//! transaction. Bulk deletion is a loop of single deletions.

use chrono::Utc;
use serde::Deserialize;
use tracing::{info, warn};
use uuid::Uuid;

use shoebox_core::pricing::price_sale;
use shoebox_core::validation::{validate_optional_text, validate_price, validate_quantity};
use shoebox_core::{Money, Sale, SalesStats};
use shoebox_db::SaleRepository;

use crate::error::{EngineError, EngineResult};
use crate::stock::{compensate, reserve};
use crate::{variant_key, Engine};

/// Longest accepted owner id.
const MAX_OWNER_ID_LEN: usize = 100;

/// Input for [`Engine::create_sale`].
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSale {
    pub product_id: String,
    pub size: String,
    pub quantity: i64,
    /// Overrides the catalog list price (local minor units).
    #[serde(default)]
    pub unit_price_cents: Option<i64>,
    #[serde(default)]
    pub is_online: bool,
    #[serde(default)]
    pub owner_id: Option<String>,
}

impl Engine {
    /// Records a sale and takes its pairs out of stock, atomically.
    pub async fn create_sale(&self, input: NewSale) -> EngineResult<Sale> {
        let size = input.size.trim().to_string();
        validate_quantity(input.quantity)?;
        if let Some(price) = input.unit_price_cents {
            validate_price("unit price", Money::from_cents(price))?;
        }
        let owner_id = validate_optional_text("owner id", input.owner_id.as_deref(), MAX_OWNER_ID_LEN)?;

        let product = self.resolve_variant(&input.product_id, &size).await?;
        let rate = self.current_rate().await?.rate();

        let unit_price = input
            .unit_price_cents
            .map(Money::from_cents)
            .unwrap_or_else(|| product.price());
        let figures = price_sale(unit_price, input.quantity, product.cost(), rate)?;

        let sale = Sale {
            id: Uuid::new_v4().to_string(),
            product_id: product.id.clone(),
            size: size.clone(),
            quantity: input.quantity,
            unit_price_cents: figures.unit_price.cents(),
            total_price_cents: figures.total_price.cents(),
            cost_price_at_sale_cents: product.cost_cents,
            exchange_rate_at_sale_milli: rate.milli(),
            profit_cents: figures.profit.cents(),
            is_online: input.is_online,
            owner_id,
            created_at: Utc::now(),
        };

        let _guard = self.stock_locks.lock(variant_key(&sale.product_id, &sale.size)).await;

        let mut tx = self.db.begin().await?;
        reserve(&mut tx, &sale.product_id, &sale.size, sale.quantity, &sale.id).await?;
        SaleRepository::insert(&mut tx, &sale).await?;
        tx.commit().await?;

        info!(
            sale_id = %sale.id,
            product_id = %sale.product_id,
            size = %sale.size,
            quantity = sale.quantity,
            total = %figures.total_price,
            profit = %figures.profit,
            rate = %rate,
            "Sale created"
        );
        Ok(sale)
    }

    pub async fn get_sale(&self, id: &str) -> EngineResult<Sale> {
        self.db
            .sales()
            .get_by_id(id)
            .await?
            .ok_or_else(|| EngineError::not_found("Sale", id))
    }

    /// Deletes a sale and returns its pairs to stock.
    pub async fn delete_sale(&self, id: &str) -> EngineResult<Sale> {
        let sale = self.get_sale(id).await?;

        let _guard = self.stock_locks.lock(variant_key(&sale.product_id, &sale.size)).await;

        let mut tx = self.db.begin().await?;
        let quantity = compensate(&mut tx, &sale.product_id, &sale.size, sale.quantity, &sale.id).await?;
        if !SaleRepository::delete(&mut tx, &sale.id).await? {
            // Deleted by a concurrent request after our read; the dropped
            // transaction takes the compensation with it.
            return Err(EngineError::not_found("Sale", id));
        }
        tx.commit().await?;

        info!(
            sale_id = %sale.id,
            product_id = %sale.product_id,
            size = %sale.size,
            restored = sale.quantity,
            quantity,
            "Sale deleted"
        );
        Ok(sale)
    }

    /// Deletes every sale. Returns how many were deleted.
    pub async fn delete_all_sales(&self) -> EngineResult<usize> {
        self.delete_sales(false).await
    }

    /// Deletes every online sale. Returns how many were deleted.
    pub async fn delete_all_online_sales(&self) -> EngineResult<usize> {
        self.delete_sales(true).await
    }

    async fn delete_sales(&self, online_only: bool) -> EngineResult<usize> {
        let ids = self.db.sales().list_ids(online_only).await?;
        let mut deleted = 0;

        for id in &ids {
            match self.delete_sale(id).await {
                Ok(_) => deleted += 1,
                // Already removed by someone else.
                Err(EngineError::Domain(shoebox_core::CoreError::NotFound { .. })) => {
                    warn!(sale_id = %id, "Sale vanished during bulk deletion");
                }
                Err(err) => return Err(err),
            }
        }

        info!(online_only, deleted, "Bulk sale deletion finished");
        Ok(deleted)
    }

    pub async fn sales_stats(&self) -> EngineResult<SalesStats> {
        Ok(self.db.sales().stats().await?)
    }

    pub async fn sales_by_owner(&self, owner_id: &str) -> EngineResult<Vec<Sale>> {
        Ok(self.db.sales().list_by_owner(owner_id.trim()).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{engine, shoe, stocked_shoe};
    use shoebox_core::{CoreError, ExchangeRate, MovementReason, ValidationError};

    fn sale_of(product_id: &str, size: &str, quantity: i64) -> NewSale {
        NewSale {
            product_id: product_id.to_string(),
            size: size.to_string(),
            quantity,
            unit_price_cents: None,
            is_online: false,
            owner_id: None,
        }
    }

    #[tokio::test]
    async fn test_sale_reference_figures() {
        let engine = engine().await;
        let product = stocked_shoe(&engine, "42", 10).await;

        let sale = engine.create_sale(sale_of(&product.id, "42", 3)).await.unwrap();

        assert_eq!(engine.quantity(&product.id, "42").await.unwrap(), 7);
        assert_eq!(sale.total_price(), Money::from_major_minor(150_000, 0));
        assert_eq!(sale.profit(), Money::from_major_minor(60_000, 0));
        assert_eq!(sale.cost_price_at_sale_cents, 2000);
        assert_eq!(sale.exchange_rate_at_sale(), ExchangeRate::from_major(1500));
    }

    #[tokio::test]
    async fn test_oversell_reports_available() {
        let engine = engine().await;
        let product = stocked_shoe(&engine, "42", 10).await;
        engine.create_sale(sale_of(&product.id, "42", 3)).await.unwrap();

        let err = engine.create_sale(sale_of(&product.id, "42", 8)).await.unwrap_err();
        match err.as_domain() {
            Some(CoreError::InsufficientStock { available, requested, .. }) => {
                assert_eq!(*available, 7);
                assert_eq!(*requested, 8);
            }
            other => panic!("expected InsufficientStock, got {:?}", other),
        }

        assert_eq!(engine.quantity(&product.id, "42").await.unwrap(), 7);
        assert_eq!(engine.sales_stats().await.unwrap().total.sale_count, 1);
    }

    #[tokio::test]
    async fn test_sale_without_rate_is_refused() {
        let engine = engine().await;
        let product = shoe(&engine, "42").await;
        engine.replenish(&product.id, "42", 5).await.unwrap();

        let err = engine.create_sale(sale_of(&product.id, "42", 1)).await.unwrap_err();
        assert!(matches!(err.as_domain(), Some(CoreError::NoRateConfigured)));
        assert_eq!(engine.quantity(&product.id, "42").await.unwrap(), 5);
    }

    #[tokio::test]
    async fn test_sale_of_undeclared_size_is_not_found() {
        let engine = engine().await;
        let product = stocked_shoe(&engine, "42", 5).await;

        let err = engine.create_sale(sale_of(&product.id, "44", 1)).await.unwrap_err();
        assert!(matches!(err.as_domain(), Some(CoreError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_price_override_and_owner() {
        let engine = engine().await;
        let product = stocked_shoe(&engine, "42", 5).await;

        let mut input = sale_of(&product.id, "42", 1);
        input.unit_price_cents = Some(Money::from_major_minor(10_000, 0).cents());
        input.owner_id = Some(" ana ".to_string());
        input.is_online = true;
        let sale = engine.create_sale(input).await.unwrap();

        assert_eq!(sale.profit(), Money::from_major_minor(-20_000, 0));
        assert_eq!(sale.owner_id.as_deref(), Some("ana"));
        assert_eq!(engine.sales_by_owner("ana").await.unwrap().len(), 1);

        let stats = engine.sales_stats().await.unwrap();
        assert_eq!(stats.online.sale_count, 1);
        assert_eq!(stats.in_store.sale_count, 0);
    }

    #[tokio::test]
    async fn test_profit_snapshot_survives_rate_change() {
        let engine = engine().await;
        let product = stocked_shoe(&engine, "42", 10).await;
        let sale = engine.create_sale(sale_of(&product.id, "42", 2)).await.unwrap();

        engine.set_rate(ExchangeRate::from_major(2500)).await.unwrap();

        let stored = engine.get_sale(&sale.id).await.unwrap();
        assert_eq!(stored.profit_cents, sale.profit_cents);
        assert_eq!(stored.exchange_rate_at_sale_milli, 1_500_000);
        assert_eq!(stored.recompute_profit().unwrap(), stored.profit());

        let later = engine.create_sale(sale_of(&product.id, "42", 2)).await.unwrap();
        assert_ne!(later.profit_cents, sale.profit_cents);
    }

    #[tokio::test]
    async fn test_delete_sale_compensates() {
        let engine = engine().await;
        let product = stocked_shoe(&engine, "42", 10).await;
        let sale = engine.create_sale(sale_of(&product.id, "42", 3)).await.unwrap();

        engine.delete_sale(&sale.id).await.unwrap();

        assert_eq!(engine.quantity(&product.id, "42").await.unwrap(), 10);
        assert_eq!(engine.sales_stats().await.unwrap().total.sale_count, 0);
        assert!(matches!(
            engine.delete_sale(&sale.id).await.unwrap_err().as_domain(),
            Some(CoreError::NotFound { .. })
        ));

        let reasons: Vec<_> = engine
            .stock_movements(&product.id, "42")
            .await
            .unwrap()
            .into_iter()
            .map(|m| m.reason)
            .collect();
        assert_eq!(
            reasons,
            vec![
                MovementReason::Compensation,
                MovementReason::Sale,
                MovementReason::Replenishment
            ]
        );
    }

    #[tokio::test]
    async fn test_delete_sale_restores_every_quantity() {
        let engine = engine().await;
        let product = stocked_shoe(&engine, "42", 10).await;

        for quantity in 1..=10 {
            let sale = engine.create_sale(sale_of(&product.id, "42", quantity)).await.unwrap();
            assert_eq!(engine.quantity(&product.id, "42").await.unwrap(), 10 - quantity);

            engine.delete_sale(&sale.id).await.unwrap();
            assert_eq!(
                engine.quantity(&product.id, "42").await.unwrap(),
                10,
                "stock not restored after deleting a sale of {quantity}"
            );
        }

        assert_eq!(engine.sales_stats().await.unwrap().total.sale_count, 0);
        let movements = engine.stock_movements(&product.id, "42").await.unwrap();
        assert_eq!(movements.len(), 21);
    }

    #[tokio::test]
    async fn test_extreme_rate_rejects_sale() {
        let engine = engine().await;
        let product = stocked_shoe(&engine, "42", 10).await;
        let extreme = ExchangeRate::from_milli(9_000_000_000_000_000_000);

        let err = engine.set_rate(extreme).await.unwrap_err();
        assert!(matches!(
            err.as_domain(),
            Some(CoreError::Validation(ValidationError::InvalidAmount { .. }))
        ));

        // A rate already stored out of range still cannot price a sale.
        engine.db().rates().append(extreme).await.unwrap();
        let err = engine.create_sale(sale_of(&product.id, "42", 1)).await.unwrap_err();
        assert!(matches!(
            err.as_domain(),
            Some(CoreError::Validation(ValidationError::InvalidAmount { .. }))
        ));

        assert_eq!(engine.quantity(&product.id, "42").await.unwrap(), 10);
        assert_eq!(engine.sales_stats().await.unwrap().total.sale_count, 0);
    }

    #[tokio::test]
    async fn test_bulk_deletions() {
        let engine = engine().await;
        let product = stocked_shoe(&engine, "42", 10).await;

        let mut online = sale_of(&product.id, "42", 1);
        online.is_online = true;
        engine.create_sale(online.clone()).await.unwrap();
        engine.create_sale(online).await.unwrap();
        engine.create_sale(sale_of(&product.id, "42", 3)).await.unwrap();
        assert_eq!(engine.quantity(&product.id, "42").await.unwrap(), 5);

        assert_eq!(engine.delete_all_online_sales().await.unwrap(), 2);
        assert_eq!(engine.quantity(&product.id, "42").await.unwrap(), 7);

        assert_eq!(engine.delete_all_sales().await.unwrap(), 1);
        assert_eq!(engine.quantity(&product.id, "42").await.unwrap(), 10);
        assert_eq!(engine.delete_all_sales().await.unwrap(), 0);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_sales_never_oversell() {
        let engine = engine().await;
        let product = stocked_shoe(&engine, "42", 10).await;

        let mut handles = Vec::new();
        for _ in 0..12 {
            let engine = engine.clone();
            let product_id = product.id.clone();
            handles.push(tokio::spawn(async move {
                engine.create_sale(sale_of(&product_id, "42", 2)).await
            }));
        }

        let mut sold = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(sale) => sold += sale.quantity,
                Err(err) => assert!(matches!(
                    err.as_domain(),
                    Some(CoreError::InsufficientStock { .. })
                )),
            }
        }

        assert_eq!(sold, 10);
        assert_eq!(engine.quantity(&product.id, "42").await.unwrap(), 0);
    }
}
