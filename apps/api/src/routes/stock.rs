use axum::extract::rejection::QueryRejection;
use axum::extract::{Path, Query, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;

use shoebox_core::{StockEntry, StockMovement};
use shoebox_engine::stock::StockLevel;
use shoebox_engine::ReplenishLine;

use crate::error::ApiResult;
use crate::extract::ApiJson;
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/low", get(low_stock))
        .route("/replenish", post(replenish))
        .route("/bulk-replenish", post(bulk_replenish))
        .route("/:product_id/:size", get(quantity))
        .route("/:product_id/:size/movements", get(movements))
}

#[derive(Debug, Deserialize)]
pub struct LowStockQuery {
    pub threshold: Option<i64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplenishRequest {
    pub product_id: String,
    pub size: String,
    pub quantity: i64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkReplenishRequest {
    pub product_id: String,
    pub lines: Vec<ReplenishLine>,
}

pub async fn quantity(
    State(state): State<AppState>,
    Path((product_id, size)): Path<(String, String)>,
) -> ApiResult<Json<StockLevel>> {
    let quantity = state.engine.quantity(&product_id, &size).await?;
    Ok(Json(StockLevel {
        product_id,
        size,
        quantity,
    }))
}

pub async fn low_stock(
    State(state): State<AppState>,
    query: Result<Query<LowStockQuery>, QueryRejection>,
) -> ApiResult<Json<Vec<StockEntry>>> {
    let Query(query) = query?;
    let threshold = query.threshold.unwrap_or(state.config.low_stock_threshold);
    Ok(Json(state.engine.list_below(threshold).await?))
}

pub async fn movements(
    State(state): State<AppState>,
    Path((product_id, size)): Path<(String, String)>,
) -> ApiResult<Json<Vec<StockMovement>>> {
    Ok(Json(state.engine.stock_movements(&product_id, &size).await?))
}

pub async fn replenish(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<ReplenishRequest>,
) -> ApiResult<Json<StockLevel>> {
    let level = state
        .engine
        .replenish(&body.product_id, &body.size, body.quantity)
        .await?;
    Ok(Json(level))
}

pub async fn bulk_replenish(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<BulkReplenishRequest>,
) -> ApiResult<Json<Vec<StockLevel>>> {
    let levels = state
        .engine
        .bulk_replenish(&body.product_id, body.lines)
        .await?;
    Ok(Json(levels))
}

#[cfg(test)]
mod tests {
    use axum::http::{Method, StatusCode};
    use serde_json::json;

    use crate::routes::test_support::{app, product, send};

    #[tokio::test]
    async fn test_replenish_and_read_back() {
        let app = app().await;
        let id = product(&app).await;

        let (status, body) = send(
            &app,
            Method::POST,
            "/stock/replenish",
            Some(json!({ "productId": id, "size": "42", "quantity": 5 })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["quantity"], 5);

        let (_, body) = send(&app, Method::GET, &format!("/stock/{}/42", id), None).await;
        assert_eq!(body["quantity"], 5);

        let (_, body) = send(&app, Method::GET, &format!("/stock/{}/41", id), None).await;
        assert_eq!(body["quantity"], 0);

        let (_, body) = send(&app, Method::GET, &format!("/stock/{}/42/movements", id), None).await;
        assert_eq!(body[0]["reason"], "replenishment");
    }

    #[tokio::test]
    async fn test_bulk_replenish_is_all_or_nothing() {
        let app = app().await;
        let id = product(&app).await;

        let (status, body) = send(
            &app,
            Method::POST,
            "/stock/bulk-replenish",
            Some(json!({
                "productId": id,
                "lines": [{ "size": "41", "quantity": 2 }, { "size": "42", "quantity": 0 }],
            })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "INVALID_AMOUNT");

        let (_, body) = send(&app, Method::GET, &format!("/stock/{}/41", id), None).await;
        assert_eq!(body["quantity"], 0);
    }

    #[tokio::test]
    async fn test_low_stock_threshold() {
        let app = app().await;
        let id = product(&app).await;
        send(
            &app,
            Method::POST,
            "/stock/bulk-replenish",
            Some(json!({
                "productId": id,
                "lines": [{ "size": "41", "quantity": 2 }, { "size": "42", "quantity": 10 }],
            })),
        )
        .await;

        let (status, body) = send(&app, Method::GET, "/stock/low", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.as_array().unwrap().len(), 1);
        assert_eq!(body[0]["size"], "41");

        let (_, body) = send(&app, Method::GET, "/stock/low?threshold=10", None).await;
        assert_eq!(body.as_array().unwrap().len(), 2);

        let (status, _) = send(&app, Method::GET, "/stock/low?threshold=abc", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
