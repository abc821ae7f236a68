use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use serde::Serialize;

use shoebox_core::{Sale, SalesStats};
use shoebox_engine::NewSale;

use crate::error::ApiResult;
use crate::extract::ApiJson;
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_sale).delete(delete_all_sales))
        .route("/online", delete(delete_all_online_sales))
        .route("/stats", get(sales_stats))
        .route("/owner/:owner_id", get(sales_by_owner))
        .route("/:id", get(get_sale).delete(delete_sale))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeletedCount {
    pub deleted: usize,
}

pub async fn create_sale(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<NewSale>,
) -> ApiResult<(StatusCode, Json<Sale>)> {
    let sale = state.engine.create_sale(body).await?;
    Ok((StatusCode::CREATED, Json(sale)))
}

pub async fn get_sale(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Json<Sale>> {
    Ok(Json(state.engine.get_sale(&id).await?))
}

pub async fn delete_sale(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Sale>> {
    Ok(Json(state.engine.delete_sale(&id).await?))
}

pub async fn delete_all_sales(State(state): State<AppState>) -> ApiResult<Json<DeletedCount>> {
    let deleted = state.engine.delete_all_sales().await?;
    Ok(Json(DeletedCount { deleted }))
}

pub async fn delete_all_online_sales(
    State(state): State<AppState>,
) -> ApiResult<Json<DeletedCount>> {
    let deleted = state.engine.delete_all_online_sales().await?;
    Ok(Json(DeletedCount { deleted }))
}

pub async fn sales_stats(State(state): State<AppState>) -> ApiResult<Json<SalesStats>> {
    Ok(Json(state.engine.sales_stats().await?))
}

pub async fn sales_by_owner(
    State(state): State<AppState>,
    Path(owner_id): Path<String>,
) -> ApiResult<Json<Vec<Sale>>> {
    Ok(Json(state.engine.sales_by_owner(&owner_id).await?))
}
