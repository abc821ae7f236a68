//! # Supplier Ledger Arithmetic
//!
//! Pure rules behind purchases, payments and supplier balances.
//!
//! ## Balance Derivation
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  totalCredit = Σ totalCost        over credit purchases                │
//! │  totalPaid   = Σ initialPaid      over credit purchases                │
//! │              + Σ amount           over every payment (linked or not)   │
//! │  outstanding = totalCredit − totalPaid     (may go negative)           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The balance is recomputed from rows on every read. Nothing in the system
//! stores it.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::ValidationError;
use crate::money::Money;
use crate::types::{Purchase, SupplierBalance, SupplierPayment};
use crate::validation::ValidationResult;

// =============================================================================
// Warnings
// =============================================================================

/// Non-fatal signals returned alongside a successful mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(tag = "kind", rename_all = "camelCase")]
#[ts(export)]
pub enum LedgerWarning {
    /// The payment exceeded what was left on the linked purchase.
    #[serde(rename_all = "camelCase")]
    Overpayment {
        purchase_id: String,
        excess_cents: i64,
    },
    /// The purchase was recorded but stock could not be replenished.
    #[serde(rename_all = "camelCase")]
    StockNotReplenished {
        product_id: String,
        size: String,
        reason: String,
    },
}

// =============================================================================
// Purchase Creation
// =============================================================================

/// Resolves the amount settled when a purchase is recorded.
///
/// Cash purchases are always fully paid. Credit purchases take the optional
/// opening payment, which must lie within `0..=total_cost`.
pub fn opening_paid(
    is_credit: bool,
    total_cost: Money,
    initial_paid: Option<Money>,
) -> ValidationResult<Money> {
    if !is_credit {
        return Ok(total_cost);
    }

    let initial = initial_paid.unwrap_or_else(Money::zero);

    if initial.is_negative() {
        return Err(ValidationError::invalid_amount(
            "initial paid amount",
            "cannot be negative",
        ));
    }

    if initial > total_cost {
        return Err(ValidationError::invalid_amount(
            "initial paid amount",
            format!("cannot exceed total cost {}", total_cost),
        ));
    }

    Ok(initial)
}

// =============================================================================
// Payment Allocation
// =============================================================================

/// Result of applying a payment to one purchase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Allocation {
    /// New purchase-level paid amount, never above the total cost.
    pub new_paid: Money,
    /// Portion of the payment beyond what the purchase still owed.
    pub excess: Money,
}

impl Allocation {
    pub fn is_overpayment(&self) -> bool {
        self.excess.is_positive()
    }
}

/// Applies `amount` to a purchase.
///
/// ```rust
/// use shoebox_core::ledger::allocate_payment;
/// use shoebox_core::money::Money;
///
/// // 200000.00 purchase, 200000.00 already paid, another 50000.00 arrives
/// let total = Money::from_major_minor(200_000, 0);
/// let alloc = allocate_payment(total, total, Money::from_major_minor(50_000, 0));
///
/// assert_eq!(alloc.new_paid, total);
/// assert_eq!(alloc.excess, Money::from_major_minor(50_000, 0));
/// ```
pub fn allocate_payment(total_cost: Money, paid: Money, amount: Money) -> Allocation {
    let uncapped = paid + amount;

    if uncapped > total_cost {
        Allocation {
            new_paid: total_cost,
            excess: uncapped - total_cost,
        }
    } else {
        Allocation {
            new_paid: uncapped,
            excess: Money::zero(),
        }
    }
}

/// Purchase-level paid amount after deleting a linked payment.
pub fn reverse_payment(paid: Money, amount: Money) -> Money {
    paid - amount.min(paid)
}

// =============================================================================
// Balance
// =============================================================================

impl SupplierBalance {
    /// Derives a supplier's balance from its purchases and payments.
    ///
    /// Rows belonging to other suppliers are ignored, so callers can pass
    /// unfiltered slices in tests.
    pub fn compute(
        supplier_id: &str,
        purchases: &[Purchase],
        payments: &[SupplierPayment],
    ) -> SupplierBalance {
        let credit_purchases = purchases
            .iter()
            .filter(|p| p.supplier_id == supplier_id && p.is_credit);

        let mut total_credit = Money::zero();
        let mut total_paid = Money::zero();

        for purchase in credit_purchases {
            total_credit += purchase.total_cost();
            total_paid += purchase.initial_paid();
        }

        total_paid += payments
            .iter()
            .filter(|p| p.supplier_id == supplier_id)
            .map(SupplierPayment::amount)
            .sum::<Money>();

        let outstanding = total_credit - total_paid;

        SupplierBalance {
            supplier_id: supplier_id.to_string(),
            total_credit_cents: total_credit.cents(),
            total_paid_cents: total_paid.cents(),
            outstanding_cents: outstanding.cents(),
            has_credit_in_favor: outstanding.is_negative(),
        }
    }

    #[inline]
    pub fn outstanding(&self) -> Money {
        Money::from_cents(self.outstanding_cents)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
