//! # shoebox-core: Pure Business Logic for the Shoebox Back Office
//!
//! Money, exchange rates, pricing and supplier-credit arithmetic as pure
//! functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Shoebox Back Office                                │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    apps/api (axum)                              │   │
//! │  │    /stock  /sales  /rates  /suppliers  /purchases  /payments    │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                 shoebox-engine (operations)                     │   │
//! │  │    locks, transactions, compensation, payment allocation        │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ shoebox-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │  pricing  │  │  ledger   │  │   │
//! │  │   │   Sale    │  │   Money   │  │  profit   │  │ payments  │  │   │
//! │  │   │ Purchase  │  │   Rate    │  │  snapshot │  │ balances  │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                 shoebox-db (Database Layer)                     │   │
//! │  │              SQLite queries, migrations, repositories           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, Sale, Purchase, SupplierBalance, etc.)
//! - [`money`] - Money type with integer arithmetic
//! - [`rate`] - Exchange rates in thousandths
//! - [`sizes`] - Parsing of the catalog's size lists
//! - [`pricing`] - Sale totals and profit snapshots
//! - [`ledger`] - Payment allocation and supplier balances
//! - [`error`] - Domain error types
//! - [`validation`] - Input validation
//!
//! ## Example Usage
//!
//! ```rust
//! use shoebox_core::money::Money;
//! use shoebox_core::pricing::price_sale;
//! use shoebox_core::rate::ExchangeRate;
//!
//! // 3 pairs at 50000.00, cost 20.00 foreign, rate 1500
//! let figures = price_sale(
//!     Money::from_major_minor(50_000, 0),
//!     3,
//!     Money::from_major_minor(20, 0),
//!     ExchangeRate::from_major(1500),
//! )
//! .unwrap();
//!
//! assert_eq!(figures.total_price, Money::from_major_minor(150_000, 0));
//! assert_eq!(figures.profit, Money::from_major_minor(60_000, 0));
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod ledger;
pub mod money;
pub mod pricing;
pub mod rate;
pub mod sizes;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, ValidationError};
pub use ledger::LedgerWarning;
pub use money::Money;
pub use rate::ExchangeRate;
pub use sizes::SizeSet;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Exchange rates are stored as integer thousandths.
pub const RATE_SCALE: i64 = 1000;

/// Maximum units moved by a single sale, purchase or replenishment.
///
/// Catches typos such as 10000 instead of 10.
pub const MAX_QUANTITY: i64 = 100_000;

/// Ceiling for any single amount, in minor units (10 billion major units).
pub const MAX_AMOUNT_CENTS: i64 = 1_000_000_000_000;

/// Highest accepted exchange rate, in thousandths (one billion local units
/// per foreign unit).
pub const MAX_RATE_MILLI: i64 = 1_000_000_000_000;

/// Longest accepted size label.
pub const MAX_SIZE_LABEL_LEN: usize = 16;

/// Quantity at or below which a variant counts as low stock.
pub const DEFAULT_LOW_STOCK_THRESHOLD: i64 = 3;
