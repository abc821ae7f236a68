//! # shoebox-db: Database Layer for the Shoebox Back Office
//!
//! Storage for the engine: SQLite through sqlx, embedded migrations and one
//! repository per table family.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Shoebox Data Flow                                │
//! │                                                                         │
//! │  Engine operation (create_sale)                                        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    shoebox-db (THIS CRATE)                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │   Database    │    │  Repositories │    │  Migrations  │  │   │
//! │  │   │   (pool.rs)   │    │               │    │  (embedded)  │  │   │
//! │  │   │               │    │ StockRepo     │    │ 001_initial_ │  │   │
//! │  │   │ SqlitePool    │◄───│ SaleRepo      │    │  schema.sql  │  │   │
//! │  │   │ Transactions  │    │ PurchaseRepo  │    │              │  │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘  │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     SQLite Database                             │   │
//! │  │   <platform data dir>/shoebox.db                                │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Two Kinds of Repository Methods
//!
//! - `&self` methods run a single statement on the pool (reads, one-shot
//!   writes).
//! - Associated functions taking `&mut SqliteConnection` are steps inside a
//!   transaction owned by the engine. They never commit.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use shoebox_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("shoebox.db")).await?;
//! let on_hand = db.stock().quantity("runner-x", "42").await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};

pub use repository::movement::MovementRepository;
pub use repository::payment::PaymentRepository;
pub use repository::product::ProductRepository;
pub use repository::purchase::PurchaseRepository;
pub use repository::rate::RateRepository;
pub use repository::sale::SaleRepository;
pub use repository::stock::StockRepository;
pub use repository::supplier::SupplierRepository;
