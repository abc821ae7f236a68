//! Route table.

use axum::routing::get;
use axum::Router;

use crate::AppState;

pub mod payments;
pub mod products;
pub mod purchases;
pub mod rates;
pub mod sales;
pub mod stock;
pub mod suppliers;
pub mod system;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/health", get(system::health))
        .nest("/products", products::router())
        .nest("/stock", stock::router())
        .nest("/sales", sales::router())
        .nest("/rates", rates::router())
        .nest("/suppliers", suppliers::router())
        .nest("/purchases", purchases::router())
        .nest("/payments", payments::router())
}

#[cfg(test)]
pub(crate) mod test_support {
    use axum::body::{to_bytes, Body};
    use axum::http::{Method, Request, StatusCode};
    use axum::Router;
    use serde_json::Value;
    use shoebox_db::{Database, DbConfig};
    use shoebox_engine::Engine;
    use tower::ServiceExt;

    use crate::{router, ApiConfig, AppState};

    pub async fn app() -> Router {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let config = ApiConfig {
            port: 0,
            db_path: ":memory:".into(),
            db_max_connections: 1,
            low_stock_threshold: 3,
        };
        router(AppState::new(Engine::new(db), config))
    }

    /// Sends one request and returns status plus JSON body (`Null` when empty).
    pub async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(json) => builder
                .header("content-type", "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, json)
    }

    /// Registers a product with sizes 41 and 42 and returns its id.
    pub async fn product(app: &Router) -> String {
        let (status, body) = send(
            app,
            Method::POST,
            "/products",
            Some(serde_json::json!({
                "name": "Runner X",
                "sizes": ["41", "42"],
                "priceCents": 5_000_000,
                "costCents": 2_000,
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        body["id"].as_str().unwrap().to_string()
    }

    pub async fn supplier(app: &Router) -> String {
        let (status, body) = send(
            app,
            Method::POST,
            "/suppliers",
            Some(serde_json::json!({ "name": "Atlas Footwear" })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        body["id"].as_str().unwrap().to_string()
    }
}
