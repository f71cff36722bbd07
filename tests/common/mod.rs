use std::time::Duration;

use axum::{
    Json, Router,
    extract::Path,
    http::StatusCode,
    routing::{get, post},
};
use serde_json::{Value, json};
use tokio::net::TcpListener;

use ledgerlens_backend::AppState;
use ledgerlens_backend::services::aggregator::AggregationOptions;
use ledgerlens_backend::services::gemini::GeminiService;
use ledgerlens_backend::services::nessie::NessieService;

/// Build an AppState wired to mock upstream servers and no graph store.
#[allow(dead_code)]
pub fn test_state(sandbox_url: &str, model_url: &str) -> AppState {
    AppState {
        db: None,
        bank: NessieService::new("test-key".to_string(), sandbox_url.to_string(), 5),
        llm: GeminiService::new(
            Some("test-key".to_string()),
            model_url.to_string(),
            "gemini-2.5-flash".to_string(),
        ),
        aggregation: AggregationOptions {
            concurrency: 4,
            timeout: Duration::from_secs(10),
        },
    }
}

async fn serve(app: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

/// Mock banking sandbox with one customer holding a Savings account, a
/// Credit Card account, and an ineligible Checking account.
#[allow(dead_code)]
pub async fn spawn_sandbox() -> String {
    serve(sandbox_router(false)).await
}

/// Same sandbox, but the purchases sub-resource returns 500 and the
/// transfers sub-resource returns a non-array body.
#[allow(dead_code)]
pub async fn spawn_flaky_sandbox() -> String {
    serve(sandbox_router(true)).await
}

fn sandbox_router(flaky: bool) -> Router {
    let router = Router::new()
        .route("/customers", get(customers))
        .route("/customers/{customer_id}/accounts", get(accounts))
        .route("/accounts/{account_id}/deposits", get(deposits))
        .route("/accounts/{account_id}/withdrawals", get(withdrawals))
        .route("/accounts/{account_id}/loans", get(account_loans))
        .route("/loans", get(loans));

    if flaky {
        router
            .route(
                "/accounts/{account_id}/purchases",
                get(|| async { StatusCode::INTERNAL_SERVER_ERROR }),
            )
            .route(
                "/accounts/{account_id}/transfers",
                get(|| async { Json(json!({"error": "unexpected shape"})) }),
            )
    } else {
        router
            .route("/accounts/{account_id}/purchases", get(purchases))
            .route("/accounts/{account_id}/transfers", get(transfers))
    }
}

async fn customers() -> Json<Value> {
    Json(json!([
        {"_id": "c1", "first_name": "Jane", "last_name": "Doe"},
        {"_id": "c2", "first_name": "John", "last_name": "Roe"}
    ]))
}

async fn accounts(Path(customer_id): Path<String>) -> Json<Value> {
    if customer_id == "c1" {
        Json(json!([
            {"_id": "a1", "type": "Savings", "nickname": "Rainy day"},
            {"_id": "a2", "type": "Credit Card"},
            {"_id": "a3", "type": "Checking", "nickname": "Daily"}
        ]))
    } else {
        Json(json!([]))
    }
}

async fn deposits(Path(account_id): Path<String>) -> Json<Value> {
    if account_id == "a1" {
        Json(json!([
            {"_id": "d1", "amount": 150.25, "transaction_date": "2025-05-02", "description": "Paycheck"}
        ]))
    } else {
        Json(json!([]))
    }
}

async fn withdrawals(Path(account_id): Path<String>) -> Json<Value> {
    if account_id == "a1" {
        Json(json!([
            {"_id": "w1", "amount": 40, "transaction_date": "2025-05-03"}
        ]))
    } else {
        Json(json!([]))
    }
}

async fn purchases(Path(account_id): Path<String>) -> Json<Value> {
    if account_id == "a2" {
        Json(json!([
            {"_id": "p1", "amount": 12.5, "date": "2025-05-04", "description": "Coffee"},
            {"_id": "p2", "amount": 30, "transaction_date": "2025-05-04"}
        ]))
    } else {
        Json(json!([]))
    }
}

async fn transfers(Path(_account_id): Path<String>) -> Json<Value> {
    Json(json!([]))
}

async fn account_loans(Path(account_id): Path<String>) -> Json<Value> {
    if account_id == "a1" {
        Json(json!([
            {"_id": "al1", "payment_amount": 250, "date": "2025-05-01", "description": "Car loan"}
        ]))
    } else {
        Json(json!([]))
    }
}

async fn loans() -> Json<Value> {
    Json(json!([
        {"_id": "l1", "type": "home", "amount": 100, "monthly_payment": 10, "credit_score": 750},
        {"_id": "l2", "type": "auto", "amount": 200, "monthly_payment": 20}
    ]))
}

/// Mock model provider that replies to any generateContent call with the
/// given text.
#[allow(dead_code)]
pub async fn spawn_model(reply: &str) -> String {
    let reply = reply.to_string();
    let app = Router::new().route(
        "/v1beta/models/{call}",
        post(move || {
            let reply = reply.clone();
            async move {
                Json(json!({
                    "candidates": [{
                        "content": { "parts": [{ "text": reply }] }
                    }]
                }))
            }
        }),
    );
    serve(app).await
}

/// Mock model provider that fails every call.
#[allow(dead_code)]
pub async fn spawn_broken_model() -> String {
    let app = Router::new().route(
        "/v1beta/models/{call}",
        post(|| async { StatusCode::INTERNAL_SERVER_ERROR }),
    );
    serve(app).await
}
