mod common;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
    routing::post,
};
use serde_json::Value;
use tower::ServiceExt;

use ledgerlens_backend::handlers;

use crate::common::{spawn_broken_model, spawn_model, spawn_sandbox, test_state};

async fn build_test_router(sandbox_url: &str, model_url: &str) -> Router {
    let state = test_state(sandbox_url, model_url);

    Router::new()
        .route(
            "/api/generate-analysis",
            post(handlers::analysis::generate_analysis),
        )
        .with_state(state)
}

async fn post_analysis(app: Router, body: &str) -> (StatusCode, Value) {
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/generate-analysis")
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn test_analysis_with_clean_model_reply() {
    let sandbox = spawn_sandbox().await;
    let model = spawn_model(r#"{"analysis":"Your savings look healthy.","chart":null}"#).await;
    let app = build_test_router(&sandbox, &model).await;

    let (status, json) = post_analysis(app, r#"{"request": "how am I doing?"}"#).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["analysis"], "Your savings look healthy.");
    assert_eq!(json["chart"], Value::Null);
    assert_eq!(json["userQuery"], "how am I doing?");
}

#[tokio::test]
async fn test_analysis_with_fenced_reply_and_chart() {
    let sandbox = spawn_sandbox().await;
    let reply = "```json\n{\"analysis\":\"Food dominates your spending.\",\"chart\":{\"type\":\"pie\",\"title\":\"Spending by category\",\"data\":[{\"name\":\"Food\",\"value\":120}]}}\n```";
    let model = spawn_model(reply).await;
    let app = build_test_router(&sandbox, &model).await;

    let (status, json) = post_analysis(app, r#"{"request": "where does my money go?"}"#).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["analysis"], "Food dominates your spending.");
    assert_eq!(json["chart"]["type"], "pie");
    assert_eq!(json["chart"]["title"], "Spending by category");
    assert_eq!(json["chart"]["data"]["data"][0]["name"], "Food");
    assert!(!json["chart"]["id"].as_str().unwrap().is_empty());
}

#[tokio::test]
async fn test_analysis_missing_request_is_bad_request() {
    let sandbox = spawn_sandbox().await;
    let model = spawn_model("{}").await;
    let app = build_test_router(&sandbox, &model).await;

    let (status, json) = post_analysis(app, r#"{"request": "   "}"#).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "Missing 'request' in body");
}

#[tokio::test]
async fn test_analysis_with_unparseable_reply_is_server_error() {
    let sandbox = spawn_sandbox().await;
    let model = spawn_model("I cannot answer that in JSON, sorry.").await;
    let app = build_test_router(&sandbox, &model).await;

    let (status, json) = post_analysis(app, r#"{"request": "help"}"#).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(
        json["error"]
            .as_str()
            .unwrap()
            .contains("I cannot answer that in JSON")
    );
}

#[tokio::test]
async fn test_analysis_with_failing_model_is_unavailable() {
    let sandbox = spawn_sandbox().await;
    let model = spawn_broken_model().await;
    let app = build_test_router(&sandbox, &model).await;

    let (status, json) = post_analysis(app, r#"{"request": "help"}"#).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert!(json["error"].as_str().unwrap().contains("unavailable"));
}

#[tokio::test]
async fn test_analysis_survives_unreachable_sandbox() {
    // Transaction context is best-effort; the analysis call still succeeds
    // with an empty history.
    let model = spawn_model(r#"{"analysis":"General advice only.","chart":null}"#).await;
    let app = build_test_router("http://127.0.0.1:9", &model).await;

    let (status, json) = post_analysis(app, r#"{"request": "help"}"#).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["analysis"], "General advice only.");
}
