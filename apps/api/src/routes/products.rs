use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};

use shoebox_core::Product;
use shoebox_engine::catalog::NewProduct;

use crate::error::ApiResult;
use crate::extract::ApiJson;
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(register_product))
        .route("/:id", get(get_product))
}

pub async fn register_product(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<NewProduct>,
) -> ApiResult<(StatusCode, Json<Product>)> {
    let product = state.engine.register_product(body).await?;
    Ok((StatusCode::CREATED, Json(product)))
}

pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Product>> {
    Ok(Json(state.engine.get_product(&id).await?))
}

#[cfg(test)]
mod tests {
    use axum::http::{Method, StatusCode};
    use serde_json::json;

    use crate::routes::test_support::{app, product, send};

    #[tokio::test]
    async fn test_register_and_get() {
        let app = app().await;
        let id = product(&app).await;

        let (status, body) = send(&app, Method::GET, &format!("/products/{}", id), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["sizes"], json!(["41", "42"]));
        assert_eq!(body["priceCents"], 5_000_000);
    }

    #[tokio::test]
    async fn test_bad_body_is_validation_error() {
        let app = app().await;

        let (status, body) = send(
            &app,
            Method::POST,
            "/products",
            Some(json!({ "name": "Runner X", "sizes": "41,41", "priceCents": 1, "costCents": 1 })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "VALIDATION_ERROR");

        let (status, body) = send(&app, Method::POST, "/products", Some(json!({ "name": 5 }))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "VALIDATION_ERROR");

        let (status, body) = send(&app, Method::GET, "/products/missing", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["code"], "NOT_FOUND");
    }
}
