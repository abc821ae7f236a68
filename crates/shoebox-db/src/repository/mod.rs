//! # Repository Module
//!
//! ## Repository Layout
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repositories                                         │
//! │                                                                         │
//! │  Engine operation                                                      │
//! │       │                                                                 │
//! │       ├── db.stock().quantity(..)            pool read                 │
//! │       │                                                                 │
//! │       └── let mut tx = db.begin()                                      │
//! │             StockRepository::try_decrement(&mut tx, ..)   tx step      │
//! │             SaleRepository::insert(&mut tx, ..)           tx step      │
//! │             tx.commit()                                                │
//! │                                                                         │
//! │  product   catalog rows (sizes parsed at this boundary)                │
//! │  stock     per-variant quantities, compare-and-decrement               │
//! │  movement  stock audit trail                                           │
//! │  rate      append-only exchange rate history                           │
//! │  sale      sales and channel totals                                    │
//! │  supplier  supplier registry                                           │
//! │  purchase  purchases, paid amount, todo flag                           │
//! │  payment   supplier payments                                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod movement;
pub mod payment;
pub mod product;
pub mod purchase;
pub mod rate;
pub mod sale;
pub mod stock;
pub mod supplier;

#[cfg(test)]
pub(crate) mod test_support {
    use chrono::Utc;
    use shoebox_core::{Product, SizeSet, Supplier};

    use crate::pool::{Database, DbConfig};

    pub async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    pub async fn seed_product(db: &Database, id: &str, sizes: &[&str]) -> Product {
        let now = Utc::now();
        let product = Product {
            id: id.to_string(),
            name: format!("Model {}", id),
            sizes: SizeSet::from_labels(sizes.iter().copied()).unwrap(),
            price_cents: 5_000_000,
            cost_cents: 2000,
            is_active: true,
            created_at: now,
            updated_at: now,
        };
        db.products().insert(&product).await.unwrap();
        product
    }

    pub async fn seed_supplier(db: &Database, id: &str) -> Supplier {
        let supplier = Supplier {
            id: id.to_string(),
            name: format!("Supplier {}", id),
            contact: None,
            address: None,
            notes: None,
            created_at: Utc::now(),
        };
        db.suppliers().insert(&supplier).await.unwrap();
        supplier
    }
}
