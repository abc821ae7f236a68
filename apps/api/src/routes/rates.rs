use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;

use shoebox_core::{ExchangeRate, ExchangeRateRecord, ValidationError};

use crate::error::{ApiError, ApiResult};
use crate::extract::ApiJson;
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(set_rate))
        .route("/current", get(current_rate))
        .route("/history", get(rate_history))
}

/// Either `rate` as typed (1512.5) or the exact `rateMilli` (1512500).
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetRateRequest {
    pub rate: Option<f64>,
    pub rate_milli: Option<i64>,
}

impl SetRateRequest {
    fn into_rate(self) -> Result<ExchangeRate, ApiError> {
        let rate = match (self.rate_milli, self.rate) {
            (Some(milli), _) => Some(ExchangeRate::from_milli(milli)),
            (None, Some(decimal)) => ExchangeRate::from_decimal(decimal),
            (None, None) => {
                return Err(ValidationError::Required {
                    field: "rate".to_string(),
                }
                .into())
            }
        };

        rate.ok_or_else(|| {
            ValidationError::invalid_amount("exchange rate", "must be a finite number").into()
        })
    }
}

pub async fn set_rate(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<SetRateRequest>,
) -> ApiResult<(StatusCode, Json<ExchangeRateRecord>)> {
    let record = state.engine.set_rate(body.into_rate()?).await?;
    Ok((StatusCode::CREATED, Json(record)))
}

pub async fn current_rate(State(state): State<AppState>) -> ApiResult<Json<ExchangeRateRecord>> {
    Ok(Json(state.engine.current_rate().await?))
}

pub async fn rate_history(
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<ExchangeRateRecord>>> {
    Ok(Json(state.engine.rate_history().await?))
}
