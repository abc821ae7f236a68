//! # shoebox-engine: Inventory, Sales and Supplier Credit
//!
//! Every operation that mutates shared state lives here. The engine owns the
//! locking discipline and transaction boundaries; arithmetic comes from
//! `shoebox-core` and SQL from `shoebox-db`.
//!
//! ## Operation Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  create_sale(runner-x, 42, qty 3)                                       │
//! │       │                                                                 │
//! │       ├── validate input                  (no I/O)                      │
//! │       ├── read catalog + current rate     (pool, unlocked)              │
//! │       ├── lock ("runner-x", "42")         (stock_locks)                 │
//! │       ├── BEGIN                                                         │
//! │       │     try_decrement ── short? ──► InsufficientStock (rollback)    │
//! │       │     record movement                                             │
//! │       │     insert sale (cost + rate snapshot)                          │
//! │       └── COMMIT, release lock                                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Lock Tables
//! - `stock_locks`: one per (product, size). Sales, deletions and every kind
//!   of replenishment go through it.
//! - `purchase_locks`: one per purchase id. Payment creation, payment
//!   deletion and the todo workflow go through it.
//!
//! Locks are always taken before a transaction opens and never while one is
//! held, so a task waiting on a lock never holds a pooled connection.

pub mod catalog;
pub mod error;
pub mod locks;
pub mod payments;
pub mod purchases;
pub mod rates;
pub mod sales;
pub mod stock;
pub mod suppliers;

pub use error::{EngineError, EngineResult};
pub use payments::{NewPayment, PaymentReceipt};
pub use purchases::{NewPurchase, PurchaseReceipt};
pub use sales::NewSale;
pub use stock::ReplenishLine;

use std::sync::Arc;

use shoebox_db::Database;

use crate::locks::KeyedLocks;

/// Key of one stock variant.
pub(crate) type VariantKey = (String, String);

/// Handle to the engine. Cheap to clone; clones share locks and pool.
#[derive(Debug, Clone)]
pub struct Engine {
    db: Database,
    stock_locks: Arc<KeyedLocks<VariantKey>>,
    purchase_locks: Arc<KeyedLocks<String>>,
}

impl Engine {
    pub fn new(db: Database) -> Self {
        Engine {
            db,
            stock_locks: Arc::new(KeyedLocks::new()),
            purchase_locks: Arc::new(KeyedLocks::new()),
        }
    }

    pub fn db(&self) -> &Database {
        &self.db
    }

    /// True when the database answers a trivial query.
    pub async fn health_check(&self) -> bool {
        self.db.health_check().await
    }
}

pub(crate) fn variant_key(product_id: &str, size: &str) -> VariantKey {
    (product_id.to_string(), size.to_string())
}
