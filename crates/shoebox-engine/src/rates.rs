//! # Exchange Rate Store
//!
//! Append-only. Sales copy the current rate by value, so nothing here can
//! change the profit of a sale that already exists.

use tracing::info;

use shoebox_core::validation::validate_rate;
use shoebox_core::{CoreError, ExchangeRate, ExchangeRateRecord};

use crate::error::EngineResult;
use crate::Engine;

/// Most history entries returned by [`Engine::rate_history`].
const HISTORY_LIMIT: u32 = 1000;

impl Engine {
    /// Records a new current rate.
    pub async fn set_rate(&self, rate: ExchangeRate) -> EngineResult<ExchangeRateRecord> {
        validate_rate(rate)?;

        let record = self.db.rates().append(rate).await?;

        info!(rate = %rate, id = record.id, "Exchange rate recorded");
        Ok(record)
    }

    /// Most recent rate; `NoRateConfigured` before the first `set_rate`.
    pub async fn current_rate(&self) -> EngineResult<ExchangeRateRecord> {
        self.db
            .rates()
            .current()
            .await?
            .ok_or_else(|| CoreError::NoRateConfigured.into())
    }

    /// Recorded rates, newest first.
    pub async fn rate_history(&self) -> EngineResult<Vec<ExchangeRateRecord>> {
        Ok(self.db.rates().history(HISTORY_LIMIT).await?)
    }
}
