//! # Sale Pricing
//!
//! Turns a sale request plus the frozen cost/rate snapshot into the figures
//! stored on the sale.
//!
//! ```text
//! unit cost (local) = round(cost_foreign × rate)
//! total price       = unit price × quantity
//! profit            = total price − unit cost (local) × quantity
//! ```
//!
//! Converting the unit cost before multiplying keeps the profit of a
//! 3-pair sale equal to three times the profit of a 1-pair sale.

use crate::error::ValidationError;
use crate::validation::ValidationResult;
use crate::money::Money;
use crate::rate::ExchangeRate;

/// Figures derived for one sale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SaleFigures {
    pub unit_price: Money,
    pub total_price: Money,
    pub unit_cost_local: Money,
    pub profit: Money,
}

/// Prices a sale of `quantity` units.
///
/// Profit may be negative when the price is below converted cost. Any figure
/// that does not fit in [`Money`] rejects the sale with `InvalidAmount`.
pub fn price_sale(
    unit_price: Money,
    quantity: i64,
    cost_foreign: Money,
    rate: ExchangeRate,
) -> ValidationResult<SaleFigures> {
    let out_of_range =
        |field: &'static str| ValidationError::invalid_amount(field, "exceeds the supported range");

    let unit_cost_local = rate
        .convert(cost_foreign)
        .ok_or_else(|| out_of_range("unit cost"))?;
    let total_price = unit_price
        .checked_mul_quantity(quantity)
        .ok_or_else(|| out_of_range("sale total"))?;
    let total_cost = unit_cost_local
        .checked_mul_quantity(quantity)
        .ok_or_else(|| out_of_range("sale cost"))?;
    let profit = total_price
        .checked_sub(total_cost)
        .ok_or_else(|| out_of_range("profit"))?;

    Ok(SaleFigures {
        unit_price,
        total_price,
        unit_cost_local,
        profit,
    })
}
