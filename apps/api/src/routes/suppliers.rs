use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};

use shoebox_core::{Purchase, Supplier, SupplierBalance, SupplierPayment};
use shoebox_engine::suppliers::NewSupplier;

use crate::error::ApiResult;
use crate::extract::ApiJson;
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_supplier).get(list_suppliers))
        .route("/:id", get(get_supplier))
        .route("/:id/balance", get(supplier_balance))
        .route("/:id/purchases", get(purchases_by_supplier))
        .route("/:id/payments", get(payments_by_supplier))
}

pub async fn create_supplier(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<NewSupplier>,
) -> ApiResult<(StatusCode, Json<Supplier>)> {
    let supplier = state.engine.create_supplier(body).await?;
    Ok((StatusCode::CREATED, Json(supplier)))
}

pub async fn list_suppliers(State(state): State<AppState>) -> ApiResult<Json<Vec<Supplier>>> {
    Ok(Json(state.engine.list_suppliers().await?))
}

pub async fn get_supplier(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Supplier>> {
    Ok(Json(state.engine.get_supplier(&id).await?))
}

pub async fn supplier_balance(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<SupplierBalance>> {
    Ok(Json(state.engine.supplier_balance(&id).await?))
}

pub async fn purchases_by_supplier(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Vec<Purchase>>> {
    Ok(Json(state.engine.purchases_by_supplier(&id).await?))
}

pub async fn payments_by_supplier(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Vec<SupplierPayment>>> {
    Ok(Json(state.engine.payments_by_supplier(&id).await?))
}
