//! # Error Types
//!
//! Domain-specific error types for shoebox-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  shoebox-core errors (this file)                                       │
//! │  ├── CoreError        - Business rule violations                       │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  shoebox-db errors                                                     │
//! │  └── DbError          - Storage failures                               │
//! │                                                                         │
//! │  shoebox-engine errors                                                 │
//! │  └── EngineError      - CoreError | DbError                            │
//! │                                                                         │
//! │  apps/api                                                              │
//! │  └── ApiError         - What the client sees (code + message)          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every variant except storage failure means "nothing was written".

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Business rule violations raised by the engine.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Unknown product, variant, sale, purchase, supplier or payment.
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// A decrement would take the variant below zero.
    ///
    /// ## User Workflow
    /// ```text
    /// createSale(shoeA, 42, qty: 8)
    ///      │
    ///      ▼
    /// stock(shoeA, 42) = 7
    ///      │
    ///      ▼
    /// InsufficientStock { available: 7, requested: 8 }
    ///      │
    ///      ▼
    /// UI shows: "Only 7 pairs of shoeA / 42 in stock"
    /// ```
    #[error("Insufficient stock for {product_id} size {size}: available {available}, requested {requested}")]
    InsufficientStock {
        product_id: String,
        size: String,
        available: i64,
        requested: i64,
    },

    /// A sale was attempted before any exchange rate was recorded.
    #[error("No exchange rate configured")]
    NoRateConfigured,

    /// A payment names a purchase it cannot be applied to.
    #[error("Payment cannot be applied to purchase {purchase_id}: {reason}")]
    InvalidPaymentTarget { purchase_id: String, reason: String },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

impl CoreError {
    /// Creates a NotFound error for a given entity type and ID.
    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        CoreError::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors, raised before any storage is touched.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Non-positive quantity, amount or rate, or a value above the ceiling.
    #[error("Invalid {field}: {reason}")]
    InvalidAmount { field: String, reason: String },

    /// Invalid format (e.g. malformed size list).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Duplicate value (e.g. the same size listed twice).
    #[error("{field} '{value}' is listed more than once")]
    Duplicate { field: String, value: String },
}

impl ValidationError {
    pub fn invalid_amount(field: impl Into<String>, reason: impl Into<String>) -> Self {
        ValidationError::InvalidAmount {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insufficient_stock_message() {
        let err = CoreError::InsufficientStock {
            product_id: "shoe-a".to_string(),
            size: "42".to_string(),
            available: 7,
            requested: 8,
        };
        assert_eq!(
            err.to_string(),
            "Insufficient stock for shoe-a size 42: available 7, requested 8"
        );
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::invalid_amount("quantity", "must be positive");
        assert_eq!(err.to_string(), "Invalid quantity: must be positive");

        let err = ValidationError::Duplicate {
            field: "size".to_string(),
            value: "42".to_string(),
        };
        assert_eq!(err.to_string(), "size '42' is listed more than once");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let core_err: CoreError = ValidationError::Required {
            field: "name".to_string(),
        }
        .into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
