//! Health and documentation endpoint tests

use super::{build_test_router, send_json, TestAppState};
use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use mercator_core::api::health::HealthResponse;
use serde_json::Value;
use tower::ServiceExt;

#[tokio::test]
async fn test_health_returns_version() {
    let app = build_test_router(TestAppState::new());

    let (status, body): (StatusCode, Option<HealthResponse>) =
        send_json::<(), HealthResponse>(&app, Method::GET, "/health", None, None).await;

    assert_eq!(status, StatusCode::OK);
    let body = body.unwrap();
    assert_eq!(body.status, "healthy");
    assert_eq!(body.version, env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn test_ready_reflects_store() {
    let app = build_test_router(TestAppState::new());
    let response = app
        .oneshot(Request::get("/ready").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let mut state = TestAppState::new();
    state.ready = false;
    let app = build_test_router(state);
    let response = app
        .oneshot(Request::get("/ready").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn test_request_id_is_echoed() {
    let app = build_test_router(TestAppState::new());
    let response = app
        .oneshot(
            Request::get("/health")
                .header("x-request-id", "req-123")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.headers()["x-request-id"], "req-123");
}

#[tokio::test]
async fn test_openapi_document_is_served() {
    let app = build_test_router(TestAppState::new());

    let (status, body): (StatusCode, Option<Value>) =
        send_json::<(), Value>(&app, Method::GET, "/api-docs/openapi.json", None, None).await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.unwrap()["paths"]["/mercator/v1/mappings"].is_object());
}

#[tokio::test]
async fn test_expired_or_foreign_token_is_rejected() {
    let app = build_test_router(TestAppState::new());

    let (status, body): (StatusCode, Option<Value>) = send_json::<(), Value>(
        &app,
        Method::GET,
        "/mercator/v1/mappings",
        Some("not-a-jwt"),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body.unwrap()["message"], "Invalid token");
}
