//! # Domain Types
//!
//! Core domain types shared by every layer of the back office.
//!
//! ## Type Map
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Product      │   │   StockEntry    │   │ ExchangeRate-   │       │
//! │  │  (catalog)      │   │  (variant qty)  │   │ Record          │       │
//! │  │  sizes: SizeSet │   │  quantity >= 0  │   │ append-only     │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │      Sale       │   │    Purchase     │   │ SupplierPayment │       │
//! │  │  cost + rate    │   │  credit / cash  │   │  optional link  │       │
//! │  │  snapshot       │   │  paid, todo     │   │  to purchase    │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  SupplierBalance is derived on every read and has no table.            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::validation::ValidationResult;
use crate::money::Money;
use crate::pricing;
use crate::rate::ExchangeRate;
use crate::sizes::SizeSet;

// =============================================================================
// Catalog
// =============================================================================

/// A shoe model as declared by the catalog.
///
/// The engine only reads products. Sizes arrive here already parsed; a
/// product whose stored size text fails to parse never reaches this type.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Product {
    pub id: String,
    pub name: String,
    /// Declared sizes, in catalog order.
    pub sizes: SizeSet,
    /// List price in local minor units.
    pub price_cents: i64,
    /// Cost basis in foreign minor units.
    pub cost_cents: i64,
    pub is_active: bool,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl Product {
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }

    #[inline]
    pub fn cost(&self) -> Money {
        Money::from_cents(self.cost_cents)
    }

    /// Checks whether `size` is one of the declared sizes.
    pub fn offers_size(&self, size: &str) -> bool {
        self.sizes.contains(size)
    }
}

// =============================================================================
// Stock
// =============================================================================

/// Quantity on hand for one variant (product, size).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct StockEntry {
    pub product_id: String,
    pub size: String,
    pub quantity: i64,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

/// Why a stock quantity changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum MovementReason {
    /// Decrement recorded by a sale.
    Sale,
    /// Stock returned by deleting a sale.
    Compensation,
    /// Manual replenishment.
    Replenishment,
    /// Replenishment triggered by a supplier purchase.
    Purchase,
}

/// One row of the stock audit trail.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct StockMovement {
    pub id: String,
    pub product_id: String,
    pub size: String,
    /// Signed change applied to the quantity.
    pub delta: i64,
    pub reason: MovementReason,
    /// Sale or purchase that caused the movement, if any.
    pub reference_id: Option<String>,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Exchange Rates
// =============================================================================

/// One entry of the append-only exchange rate history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ExchangeRateRecord {
    pub id: i64,
    /// Local units per foreign unit, in thousandths.
    pub rate_milli: i64,
    #[ts(as = "String")]
    pub recorded_at: DateTime<Utc>,
}

impl ExchangeRateRecord {
    #[inline]
    pub fn rate(&self) -> ExchangeRate {
        ExchangeRate::from_milli(self.rate_milli)
    }
}

// =============================================================================
// Sale
// =============================================================================

/// A recorded sale of one variant.
///
/// Cost and exchange rate are snapshots taken when the sale was created, so
/// later catalog or rate changes never rewrite historical profit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Sale {
    pub id: String,
    pub product_id: String,
    pub size: String,
    pub quantity: i64,
    /// Local minor units.
    pub unit_price_cents: i64,
    /// unit price × quantity.
    pub total_price_cents: i64,
    /// Foreign minor units, copied from the catalog (frozen).
    pub cost_price_at_sale_cents: i64,
    /// Thousandths, copied from the current rate (frozen).
    pub exchange_rate_at_sale_milli: i64,
    /// Local minor units.
    pub profit_cents: i64,
    pub is_online: bool,
    pub owner_id: Option<String>,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl Sale {
    #[inline]
    pub fn unit_price(&self) -> Money {
        Money::from_cents(self.unit_price_cents)
    }

    #[inline]
    pub fn total_price(&self) -> Money {
        Money::from_cents(self.total_price_cents)
    }

    #[inline]
    pub fn cost_price_at_sale(&self) -> Money {
        Money::from_cents(self.cost_price_at_sale_cents)
    }

    #[inline]
    pub fn exchange_rate_at_sale(&self) -> ExchangeRate {
        ExchangeRate::from_milli(self.exchange_rate_at_sale_milli)
    }

    #[inline]
    pub fn profit(&self) -> Money {
        Money::from_cents(self.profit_cents)
    }

    /// Recomputes profit from the fields stored on this sale alone.
    pub fn recompute_profit(&self) -> ValidationResult<Money> {
        pricing::price_sale(
            self.unit_price(),
            self.quantity,
            self.cost_price_at_sale(),
            self.exchange_rate_at_sale(),
        )
        .map(|figures| figures.profit)
    }
}

/// Totals for one sales channel.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ChannelTotals {
    pub sale_count: i64,
    pub units_sold: i64,
    pub revenue_cents: i64,
    pub profit_cents: i64,
}

impl ChannelTotals {
    fn combine(&self, other: &ChannelTotals) -> ChannelTotals {
        ChannelTotals {
            sale_count: self.sale_count + other.sale_count,
            units_sold: self.units_sold + other.units_sold,
            revenue_cents: self.revenue_cents + other.revenue_cents,
            profit_cents: self.profit_cents + other.profit_cents,
        }
    }
}

/// Sales totals with the online / in-store split.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct SalesStats {
    pub total: ChannelTotals,
    pub online: ChannelTotals,
    pub in_store: ChannelTotals,
}

impl SalesStats {
    pub fn from_channels(online: ChannelTotals, in_store: ChannelTotals) -> Self {
        SalesStats {
            total: online.combine(&in_store),
            online,
            in_store,
        }
    }
}

// =============================================================================
// Suppliers
// =============================================================================

/// Identity anchor for purchases and payments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Supplier {
    pub id: String,
    pub name: String,
    pub contact: Option<String>,
    pub address: Option<String>,
    pub notes: Option<String>,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

/// A supplier purchase, paid in cash or on credit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Purchase {
    pub id: String,
    pub supplier_id: String,
    pub product_id: String,
    pub size: String,
    pub quantity: i64,
    /// Local minor units.
    pub unit_cost_cents: i64,
    /// unit cost × quantity.
    pub total_cost_cents: i64,
    pub is_credit: bool,
    /// Amount settled against this purchase, capped at the total cost.
    pub paid_cents: i64,
    /// Amount settled when the purchase was recorded (frozen).
    pub initial_paid_cents: i64,
    /// Needs supplier follow-up.
    pub is_todo: bool,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl Purchase {
    #[inline]
    pub fn total_cost(&self) -> Money {
        Money::from_cents(self.total_cost_cents)
    }

    #[inline]
    pub fn paid(&self) -> Money {
        Money::from_cents(self.paid_cents)
    }

    #[inline]
    pub fn initial_paid(&self) -> Money {
        Money::from_cents(self.initial_paid_cents)
    }

    /// Amount still owed on this purchase alone.
    pub fn remaining(&self) -> Money {
        self.total_cost().saturating_sub_to_zero(self.paid())
    }
}

/// A payment to a supplier, optionally earmarked for one purchase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct SupplierPayment {
    pub id: String,
    pub supplier_id: String,
    pub purchase_id: Option<String>,
    pub amount_cents: i64,
    #[ts(as = "String")]
    pub payment_date: DateTime<Utc>,
}

impl SupplierPayment {
    #[inline]
    pub fn amount(&self) -> Money {
        Money::from_cents(self.amount_cents)
    }
}

/// What a supplier is owed, derived from purchases and payments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct SupplierBalance {
    pub supplier_id: String,
    pub total_credit_cents: i64,
    pub total_paid_cents: i64,
    /// Negative when the supplier holds money in our favor.
    pub outstanding_cents: i64,
    pub has_credit_in_favor: bool,
}

// =============================================================================
// Unit Tests
// =============================================================================
