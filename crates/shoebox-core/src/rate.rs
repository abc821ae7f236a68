//! # Exchange Rates
//!
//! Local-per-foreign exchange rates held as integer thousandths.
//!
//! ## Why Thousandths?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  1 foreign unit = 1500.000 local units  →  ExchangeRate(1_500_000)     │
//! │                                                                         │
//! │  convert(20.00 foreign) = 2000 × 1_500_000 / 1000                      │
//! │                         = 3_000_000 local minor units (30000.00)       │
//! │                                                                         │
//! │  Integer math keeps profit snapshots reproducible to the minor unit.   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

use crate::money::Money;
use crate::RATE_SCALE;

/// Local currency units per one foreign currency unit, scaled by 1000.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ExchangeRate(i64);

impl ExchangeRate {
    /// Creates a rate from thousandths (1_500_000 = 1500.000).
    #[inline]
    pub const fn from_milli(milli: i64) -> Self {
        ExchangeRate(milli)
    }

    /// Creates a rate from whole local units per foreign unit.
    #[inline]
    pub const fn from_major(major: i64) -> Self {
        ExchangeRate(major * RATE_SCALE)
    }

    /// Creates a rate from a decimal value as typed by an operator.
    ///
    /// Returns `None` for NaN or infinite input; sign checks belong to
    /// validation so the caller gets a proper `InvalidAmount`.
    pub fn from_decimal(rate: f64) -> Option<Self> {
        if !rate.is_finite() {
            return None;
        }
        let scaled = (rate * RATE_SCALE as f64).round();
        if scaled.abs() > i64::MAX as f64 {
            return None;
        }
        Some(ExchangeRate(scaled as i64))
    }

    /// Returns the rate in thousandths.
    #[inline]
    pub const fn milli(&self) -> i64 {
        self.0
    }

    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Converts a foreign amount into local currency.
    ///
    /// Rounds half away from zero to the nearest local minor unit. Returns
    /// `None` when the result does not fit in [`Money`].
    ///
    /// ```rust
    /// use shoebox_core::money::Money;
    /// use shoebox_core::rate::ExchangeRate;
    ///
    /// let rate = ExchangeRate::from_major(1500);
    /// let local = rate.convert(Money::from_major_minor(20, 0));
    /// assert_eq!(local, Some(Money::from_major_minor(30_000, 0)));
    /// ```
    pub fn convert(&self, foreign: Money) -> Option<Money> {
        let product = i128::from(foreign.cents()) * i128::from(self.0);
        let scale = i128::from(RATE_SCALE);
        let half = scale / 2;
        let rounded = if product >= 0 {
            (product + half) / scale
        } else {
            (product - half) / scale
        };
        i64::try_from(rounded).ok().map(Money::from_cents)
    }
}

impl fmt::Display for ExchangeRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.abs();
        write!(f, "{}{}.{:03}", sign, abs / RATE_SCALE, abs % RATE_SCALE)
    }
}
