//! # Payment Allocator
//!
//! ## Linked Payment
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  purchase: total 200000, paid 200000                                    │
//! │  payment:  50000                                                        │
//! │                                                                         │
//! │  paid + amount = 250000 > total                                         │
//! │     → stored paid   = 200000          (capped)                          │
//! │     → warning       = Overpayment { excess: 50000 }                     │
//! │     → payment row   = 50000           (full amount, counts in balance)  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Unlinked payments touch no purchase and only move the supplier balance.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use ts_rs::TS;
use uuid::Uuid;

use shoebox_core::ledger::{allocate_payment, reverse_payment};
use shoebox_core::validation::validate_payment_amount;
use shoebox_core::{CoreError, LedgerWarning, Money, Purchase, SupplierPayment};
use shoebox_db::{PaymentRepository, PurchaseRepository};

use crate::error::{EngineError, EngineResult};
use crate::Engine;

/// Input for [`Engine::create_payment`].
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPayment {
    pub supplier_id: String,
    pub amount_cents: i64,
    #[serde(default)]
    pub purchase_id: Option<String>,
}

/// A stored payment with the purchase it settled, if any.
#[derive(Debug, Clone, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct PaymentReceipt {
    pub payment: SupplierPayment,
    pub purchase: Option<Purchase>,
    pub warning: Option<LedgerWarning>,
}

impl Engine {
    pub async fn create_payment(&self, input: NewPayment) -> EngineResult<PaymentReceipt> {
        let amount = Money::from_cents(input.amount_cents);
        validate_payment_amount(amount)?;
        self.require_supplier(&input.supplier_id).await?;

        let payment = SupplierPayment {
            id: Uuid::new_v4().to_string(),
            supplier_id: input.supplier_id,
            purchase_id: input.purchase_id,
            amount_cents: amount.cents(),
            payment_date: Utc::now(),
        };

        let Some(purchase_id) = payment.purchase_id.clone() else {
            let mut tx = self.db.begin().await?;
            PaymentRepository::insert(&mut tx, &payment).await?;
            tx.commit().await?;

            info!(
                payment_id = %payment.id,
                supplier_id = %payment.supplier_id,
                amount = %amount,
                "Unlinked payment recorded"
            );
            return Ok(PaymentReceipt {
                payment,
                purchase: None,
                warning: None,
            });
        };

        let _guard = self.purchase_locks.lock(purchase_id.clone()).await;

        let mut purchase = self.get_purchase(&purchase_id).await?;
        check_target(&purchase, &payment.supplier_id)?;

        let allocation = allocate_payment(purchase.total_cost(), purchase.paid(), amount);

        let mut tx = self.db.begin().await?;
        PurchaseRepository::set_paid(&mut tx, &purchase_id, allocation.new_paid.cents()).await?;
        PaymentRepository::insert(&mut tx, &payment).await?;
        tx.commit().await?;

        purchase.paid_cents = allocation.new_paid.cents();

        let warning = if allocation.is_overpayment() {
            warn!(
                payment_id = %payment.id,
                purchase_id = %purchase_id,
                excess = %allocation.excess,
                "Payment exceeds purchase balance"
            );
            Some(LedgerWarning::Overpayment {
                purchase_id: purchase_id.clone(),
                excess_cents: allocation.excess.cents(),
            })
        } else {
            None
        };

        info!(
            payment_id = %payment.id,
            purchase_id = %purchase_id,
            amount = %amount,
            paid = %allocation.new_paid,
            "Payment applied"
        );
        Ok(PaymentReceipt {
            payment,
            purchase: Some(purchase),
            warning,
        })
    }

    /// Removes a payment and reverses its effect on the linked purchase.
    ///
    /// The purchase's paid amount drops by `min(amount, paid)`. When the
    /// payment had been capped, the reversal can undo more than was applied.
    pub async fn delete_payment(&self, id: &str) -> EngineResult<PaymentReceipt> {
        let payment = self
            .db
            .payments()
            .get_by_id(id)
            .await?
            .ok_or_else(|| EngineError::not_found("Payment", id))?;

        let _guard = match &payment.purchase_id {
            Some(purchase_id) => Some(self.purchase_locks.lock(purchase_id.clone()).await),
            None => None,
        };

        let mut tx = self.db.begin().await?;
        if !PaymentRepository::delete(&mut tx, id).await? {
            return Err(EngineError::not_found("Payment", id));
        }

        let purchase = match &payment.purchase_id {
            Some(purchase_id) => {
                match PurchaseRepository::get_in(&mut tx, purchase_id).await? {
                    Some(mut purchase) => {
                        let new_paid = reverse_payment(purchase.paid(), payment.amount());
                        PurchaseRepository::set_paid(&mut tx, purchase_id, new_paid.cents())
                            .await?;
                        purchase.paid_cents = new_paid.cents();
                        Some(purchase)
                    }
                    None => None,
                }
            }
            None => None,
        };
        tx.commit().await?;

        info!(
            payment_id = %id,
            purchase_id = ?payment.purchase_id,
            amount = %payment.amount(),
            "Payment deleted"
        );
        Ok(PaymentReceipt {
            payment,
            purchase,
            warning: None,
        })
    }
}

fn check_target(purchase: &Purchase, supplier_id: &str) -> EngineResult<()> {
    let reason = if purchase.supplier_id != supplier_id {
        "purchase belongs to another supplier"
    } else if !purchase.is_credit {
        "purchase was paid in cash"
    } else {
        return Ok(());
    };

    Err(CoreError::InvalidPaymentTarget {
        purchase_id: purchase.id.clone(),
        reason: reason.to_string(),
    }
    .into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::purchases::NewPurchase;
    use crate::test_support::{engine, supplier};
    use shoebox_core::ValidationError;

    /// Credit purchase of 10 × 20000.00 with 50000.00 paid up front.
    async fn credit_purchase(engine: &Engine, supplier_id: &str) -> Purchase {
        engine
            .create_purchase(NewPurchase {
                supplier_id: supplier_id.to_string(),
                product_id: "shoe-b".to_string(),
                size: "41".to_string(),
                quantity: 10,
                unit_cost_cents: 2_000_000,
                is_credit: true,
                initial_paid_cents: Some(5_000_000),
                add_to_stock: false,
            })
            .await
            .unwrap()
            .purchase
    }

    fn linked(supplier_id: &str, purchase_id: &str, amount_cents: i64) -> NewPayment {
        NewPayment {
            supplier_id: supplier_id.to_string(),
            amount_cents,
            purchase_id: Some(purchase_id.to_string()),
        }
    }

    #[tokio::test]
    async fn test_settle_then_overpay() {
        let engine = engine().await;
        let sup = supplier(&engine).await;
        let purchase = credit_purchase(&engine, &sup.id).await;

        let receipt = engine
            .create_payment(linked(&sup.id, &purchase.id, 15_000_000))
            .await
            .unwrap();
        assert!(receipt.warning.is_none());
        assert_eq!(receipt.purchase.unwrap().paid_cents, 20_000_000);
        assert_eq!(engine.supplier_balance(&sup.id).await.unwrap().outstanding_cents, 0);

        let receipt = engine
            .create_payment(linked(&sup.id, &purchase.id, 5_000_000))
            .await
            .unwrap();
        assert_eq!(
            receipt.warning,
            Some(LedgerWarning::Overpayment {
                purchase_id: purchase.id.clone(),
                excess_cents: 5_000_000,
            })
        );
        assert_eq!(receipt.payment.amount_cents, 5_000_000);
        assert_eq!(engine.get_purchase(&purchase.id).await.unwrap().paid_cents, 20_000_000);

        let balance = engine.supplier_balance(&sup.id).await.unwrap();
        assert_eq!(balance.total_paid_cents, 25_000_000);
        assert_eq!(balance.outstanding_cents, -5_000_000);
        assert!(balance.has_credit_in_favor);
    }

    #[tokio::test]
    async fn test_unlinked_payment_moves_only_the_balance() {
        let engine = engine().await;
        let sup = supplier(&engine).await;
        let purchase = credit_purchase(&engine, &sup.id).await;

        let receipt = engine
            .create_payment(NewPayment {
                supplier_id: sup.id.clone(),
                amount_cents: 1_000_000,
                purchase_id: None,
            })
            .await
            .unwrap();

        assert!(receipt.purchase.is_none());
        assert_eq!(engine.get_purchase(&purchase.id).await.unwrap().paid_cents, 5_000_000);
        assert_eq!(
            engine.supplier_balance(&sup.id).await.unwrap().outstanding_cents,
            14_000_000
        );
    }

    #[tokio::test]
    async fn test_rejected_payments_write_nothing() {
        let engine = engine().await;
        let sup = supplier(&engine).await;
        let other = supplier(&engine).await;
        let purchase = credit_purchase(&engine, &sup.id).await;

        let err = engine
            .create_payment(linked(&sup.id, &purchase.id, 0))
            .await
            .unwrap_err();
        assert!(matches!(
            err.as_domain(),
            Some(CoreError::Validation(ValidationError::InvalidAmount { .. }))
        ));

        let err = engine
            .create_payment(linked(&other.id, &purchase.id, 100))
            .await
            .unwrap_err();
        assert!(matches!(
            err.as_domain(),
            Some(CoreError::InvalidPaymentTarget { .. })
        ));

        let err = engine
            .create_payment(linked(&sup.id, "missing", 100))
            .await
            .unwrap_err();
        assert!(matches!(err.as_domain(), Some(CoreError::NotFound { .. })));

        let err = engine
            .create_payment(linked("ghost", &purchase.id, 100))
            .await
            .unwrap_err();
        assert!(matches!(err.as_domain(), Some(CoreError::NotFound { .. })));

        assert!(engine.payments_by_supplier(&sup.id).await.unwrap().is_empty());
        assert!(engine.payments_by_supplier(&other.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_cash_purchase_is_not_a_target() {
        let engine = engine().await;
        let sup = supplier(&engine).await;
        let cash = engine
            .create_purchase(NewPurchase {
                supplier_id: sup.id.clone(),
                product_id: "shoe-b".to_string(),
                size: "41".to_string(),
                quantity: 1,
                unit_cost_cents: 1000,
                is_credit: false,
                initial_paid_cents: None,
                add_to_stock: false,
            })
            .await
            .unwrap()
            .purchase;

        let err = engine
            .create_payment(linked(&sup.id, &cash.id, 100))
            .await
            .unwrap_err();
        assert!(matches!(
            err.as_domain(),
            Some(CoreError::InvalidPaymentTarget { .. })
        ));
    }

    #[tokio::test]
    async fn test_delete_payment_reverses_purchase() {
        let engine = engine().await;
        let sup = supplier(&engine).await;
        let purchase = credit_purchase(&engine, &sup.id).await;

        let payment = engine
            .create_payment(linked(&sup.id, &purchase.id, 3_000_000))
            .await
            .unwrap()
            .payment;
        assert_eq!(engine.get_purchase(&purchase.id).await.unwrap().paid_cents, 8_000_000);

        let receipt = engine.delete_payment(&payment.id).await.unwrap();
        assert_eq!(receipt.purchase.unwrap().paid_cents, 5_000_000);
        assert_eq!(engine.get_purchase(&purchase.id).await.unwrap().paid_cents, 5_000_000);
        assert_eq!(
            engine.supplier_balance(&sup.id).await.unwrap().outstanding_cents,
            15_000_000
        );

        let err = engine.delete_payment(&payment.id).await.unwrap_err();
        assert!(matches!(err.as_domain(), Some(CoreError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_delete_capped_payment_floors_at_zero() {
        let engine = engine().await;
        let sup = supplier(&engine).await;
        let purchase = credit_purchase(&engine, &sup.id).await;

        // Capped at 20000000 on the purchase, row keeps 30000000
        let payment = engine
            .create_payment(linked(&sup.id, &purchase.id, 30_000_000))
            .await
            .unwrap()
            .payment;

        engine.delete_payment(&payment.id).await.unwrap();
        assert_eq!(engine.get_purchase(&purchase.id).await.unwrap().paid_cents, 0);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_payments_never_exceed_total() {
        let engine = engine().await;
        let sup = supplier(&engine).await;
        let purchase = credit_purchase(&engine, &sup.id).await;

        let mut handles = Vec::new();
        for _ in 0..8 {
            let engine = engine.clone();
            let input = linked(&sup.id, &purchase.id, 3_000_000);
            handles.push(tokio::spawn(async move { engine.create_payment(input).await }));
        }

        let mut overpaid = 0;
        for handle in handles {
            if handle.await.unwrap().unwrap().warning.is_some() {
                overpaid += 1;
            }
        }

        // 5000000 + 8 × 3000000 = 29000000 against a 20000000 total
        assert_eq!(overpaid, 3);
        assert_eq!(engine.get_purchase(&purchase.id).await.unwrap().paid_cents, 20_000_000);
        let balance = engine.supplier_balance(&sup.id).await.unwrap();
        assert_eq!(balance.total_paid_cents, 29_000_000);
    }
}
