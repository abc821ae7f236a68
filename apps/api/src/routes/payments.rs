use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{delete, post};
use axum::{Json, Router};

use shoebox_engine::{NewPayment, PaymentReceipt};

use crate::error::ApiResult;
use crate::extract::ApiJson;
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_payment))
        .route("/:id", delete(delete_payment))
}

pub async fn create_payment(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<NewPayment>,
) -> ApiResult<(StatusCode, Json<PaymentReceipt>)> {
    let receipt = state.engine.create_payment(body).await?;
    Ok((StatusCode::CREATED, Json(receipt)))
}

pub async fn delete_payment(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<PaymentReceipt>> {
    Ok(Json(state.engine.delete_payment(&id).await?))
}

#[cfg(test)]
mod tests {
    use axum::http::{Method, StatusCode};
    use axum::Router;
    use serde_json::{json, Value};

    use crate::routes::test_support::{app, send, supplier};

    async fn balance(app: &Router, supplier_id: &str) -> Value {
        send(app, Method::GET, &format!("/suppliers/{}/balance", supplier_id), None)
            .await
            .1
    }

    #[tokio::test]
    async fn test_credit_ledger_walkthrough() {
        let app = app().await;
        let supplier_id = supplier(&app).await;

        // 10 pairs at 20000.00 on credit, 50000.00 paid up front
        let (_, body) = send(
            &app,
            Method::POST,
            "/purchases",
            Some(json!({
                "supplierId": supplier_id,
                "productId": "shoe-b",
                "size": "41",
                "quantity": 10,
                "unitCostCents": 2_000_000,
                "isCredit": true,
                "initialPaidCents": 5_000_000,
            })),
        )
        .await;
        let purchase_id = body["purchase"]["id"].as_str().unwrap().to_string();
        assert_eq!(balance(&app, &supplier_id).await["outstandingCents"], 15_000_000);

        let (status, body) = send(
            &app,
            Method::POST,
            "/payments",
            Some(json!({ "supplierId": supplier_id, "amountCents": 15_000_000, "purchaseId": purchase_id })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["purchase"]["paidCents"], 20_000_000);
        assert_eq!(balance(&app, &supplier_id).await["outstandingCents"], 0);

        let (_, body) = send(
            &app,
            Method::POST,
            "/payments",
            Some(json!({ "supplierId": supplier_id, "amountCents": 5_000_000, "purchaseId": purchase_id })),
        )
        .await;
        assert_eq!(body["warning"]["kind"], "overpayment");
        assert_eq!(body["warning"]["excessCents"], 5_000_000);
        let payment_id = body["payment"]["id"].as_str().unwrap().to_string();

        let summary = balance(&app, &supplier_id).await;
        assert_eq!(summary["totalPaidCents"], 25_000_000);
        assert_eq!(summary["outstandingCents"], -5_000_000);
        assert_eq!(summary["hasCreditInFavor"], true);

        let (status, _) = send(&app, Method::DELETE, &format!("/payments/{}", payment_id), None).await;
        assert_eq!(status, StatusCode::OK);
        let (_, payments) = send(
            &app,
            Method::GET,
            &format!("/suppliers/{}/payments", supplier_id),
            None,
        )
        .await;
        assert_eq!(payments.as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_payment_errors() {
        let app = app().await;
        let supplier_id = supplier(&app).await;

        let (status, body) = send(
            &app,
            Method::POST,
            "/payments",
            Some(json!({ "supplierId": supplier_id, "amountCents": -1 })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "INVALID_AMOUNT");

        let (_, body) = send(
            &app,
            Method::POST,
            "/purchases",
            Some(json!({
                "supplierId": supplier_id,
                "productId": "shoe-b",
                "size": "41",
                "quantity": 1,
                "unitCostCents": 100,
                "isCredit": false,
            })),
        )
        .await;
        let cash_id = body["purchase"]["id"].as_str().unwrap().to_string();

        let (status, body) = send(
            &app,
            Method::POST,
            "/payments",
            Some(json!({ "supplierId": supplier_id, "amountCents": 100, "purchaseId": cash_id })),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["code"], "INVALID_PAYMENT_TARGET");

        let (status, _) = send(&app, Method::DELETE, "/payments/ghost", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
