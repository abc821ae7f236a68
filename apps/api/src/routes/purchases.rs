use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, patch, post};
use axum::{Json, Router};

use shoebox_core::Purchase;
use shoebox_engine::{NewPurchase, PurchaseReceipt};

use crate::error::ApiResult;
use crate::extract::ApiJson;
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_purchase))
        .route("/:id", get(get_purchase))
        .route("/:id/todo", patch(mark_todo))
        .route("/:id/done", patch(mark_done))
}

pub async fn create_purchase(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<NewPurchase>,
) -> ApiResult<(StatusCode, Json<PurchaseReceipt>)> {
    let receipt = state.engine.create_purchase(body).await?;
    Ok((StatusCode::CREATED, Json(receipt)))
}

pub async fn get_purchase(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Purchase>> {
    Ok(Json(state.engine.get_purchase(&id).await?))
}

pub async fn mark_todo(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Purchase>> {
    Ok(Json(state.engine.mark_todo(&id).await?))
}

pub async fn mark_done(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Purchase>> {
    Ok(Json(state.engine.mark_done(&id).await?))
}
