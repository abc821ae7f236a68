//! # Validation Module
//!
//! Input validation run by the engine before any storage is touched.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: HTTP (apps/api)                                              │
//! │  └── Type validation (JSON deserialization)                            │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Engine (shoebox-engine)                                      │
//! │  └── THIS MODULE: amounts, quantities, names, size labels              │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── CHECK (quantity >= 0) on stock                                    │
//! │  ├── CHECK (amount_cents > 0) on payments                              │
//! │  └── Foreign key constraints                                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::ValidationError;
use crate::money::Money;
use crate::rate::ExchangeRate;
use crate::{MAX_AMOUNT_CENTS, MAX_QUANTITY, MAX_RATE_MILLI, MAX_SIZE_LABEL_LEN};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

fn validate_required_text(field: &str, value: &str, max: usize) -> ValidationResult<()> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if value.chars().count() > max {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max,
        });
    }

    Ok(())
}

/// Validates a product name (1-200 characters after trimming).
pub fn validate_product_name(name: &str) -> ValidationResult<()> {
    validate_required_text("name", name, 200)
}

/// Validates a supplier name (1-200 characters after trimming).
pub fn validate_supplier_name(name: &str) -> ValidationResult<()> {
    validate_required_text("supplier name", name, 200)
}

/// Validates a single size label such as `42`, `42.5` or `EU 38`.
pub fn validate_size_label(size: &str) -> ValidationResult<()> {
    validate_required_text("size", size, MAX_SIZE_LABEL_LEN)
}

/// Validates free text that may be absent (contact, address, notes).
///
/// ## Returns
/// The trimmed value, or `None` when the input was blank.
pub fn validate_optional_text(
    field: &str,
    value: Option<&str>,
    max: usize,
) -> ValidationResult<Option<String>> {
    let Some(value) = value.map(str::trim).filter(|v| !v.is_empty()) else {
        return Ok(None);
    };

    if value.chars().count() > max {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max,
        });
    }

    Ok(Some(value.to_string()))
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a quantity value (1..=MAX_QUANTITY).
///
/// ## User Workflow
/// ```text
/// createSale(qty: 0)      → InvalidAmount "quantity must be positive"
/// replenish(delta: -3)    → InvalidAmount "quantity must be positive"
/// createPurchase(qty: 10) → OK
/// ```
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::invalid_amount("quantity", "must be positive"));
    }

    if qty > MAX_QUANTITY {
        return Err(ValidationError::invalid_amount(
            "quantity",
            format!("cannot exceed {}", MAX_QUANTITY),
        ));
    }

    Ok(())
}

/// Validates a price or cost in minor units. Zero is allowed (free items).
///
/// ```rust
/// use shoebox_core::money::Money;
/// use shoebox_core::validation::validate_price;
///
/// assert!(validate_price("unit price", Money::from_cents(1099)).is_ok());
/// assert!(validate_price("unit price", Money::zero()).is_ok());
/// assert!(validate_price("unit price", Money::from_cents(-100)).is_err());
/// ```
pub fn validate_price(field: &str, price: Money) -> ValidationResult<()> {
    if price.is_negative() {
        return Err(ValidationError::invalid_amount(field, "cannot be negative"));
    }

    if price.cents() > MAX_AMOUNT_CENTS {
        return Err(ValidationError::invalid_amount(field, "exceeds the allowed maximum"));
    }

    Ok(())
}

/// Validates a supplier payment amount (strictly positive).
pub fn validate_payment_amount(amount: Money) -> ValidationResult<()> {
    if !amount.is_positive() {
        return Err(ValidationError::invalid_amount(
            "payment amount",
            "must be positive",
        ));
    }

    if amount.cents() > MAX_AMOUNT_CENTS {
        return Err(ValidationError::invalid_amount(
            "payment amount",
            "exceeds the allowed maximum",
        ));
    }

    Ok(())
}

/// Validates an exchange rate (1..=MAX_RATE_MILLI thousandths).
pub fn validate_rate(rate: ExchangeRate) -> ValidationResult<()> {
    if !rate.is_positive() {
        return Err(ValidationError::invalid_amount("exchange rate", "must be positive"));
    }

    if rate.milli() > MAX_RATE_MILLI {
        return Err(ValidationError::invalid_amount(
            "exchange rate",
            "exceeds the allowed maximum",
        ));
    }

    Ok(())
}

/// Validates a low-stock threshold (zero or more).
pub fn validate_threshold(threshold: i64) -> ValidationResult<()> {
    if threshold < 0 {
        return Err(ValidationError::invalid_amount("threshold", "cannot be negative"));
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
