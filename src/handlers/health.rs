use axum::{Json, extract::State};
use chrono::Utc;
use serde_json::Value;

use crate::AppState;
use crate::models::response::{EchoResponse, HealthResponse};

pub async fn root() -> &'static str {
    "Welcome to the LedgerLens API"
}

pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let database_connected = match &state.db {
        Some(db) => db.ping().await.is_ok(),
        None => false,
    };

    Json(HealthResponse {
        status: "healthy".to_string(),
        message: "API is running".to_string(),
        timestamp: Utc::now(),
        database_connected,
    })
}

pub async fn echo(Json(data): Json<Value>) -> Json<EchoResponse> {
    Json(EchoResponse {
        received_data: data,
        message: "Data received successfully".to_string(),
    })
}
