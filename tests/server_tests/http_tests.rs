//! Tests for the HTTP front end
//!
//! These tests verify:
//! - Endpoint routing and JSON payloads
//! - Status codes for each failure kind
//! - Values round-trip as their JSON encoding

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use bucketkv::server::router;
use bucketkv::{Config, StorageService};
use tempfile::TempDir;

// =============================================================================
// Helper Functions
// =============================================================================

fn setup_temp_router() -> (TempDir, Router) {
    let temp_dir = TempDir::new().unwrap();
    let config = Config::builder().storage_root(temp_dir.path()).build();
    let app = router(Arc::new(StorageService::new(config)));
    (temp_dir, app)
}

/// Send one JSON request and return status, content type and body
async fn send(app: &Router, method: Method, uri: &str, body: Value) -> (StatusCode, Option<String>, Vec<u8>) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_vec(&body).unwrap()))
        .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .map(|v| v.to_str().unwrap().to_string());
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, content_type, body.to_vec())
}

async fn create(app: &Router, name: &str, key_type: &str) -> StatusCode {
    let (status, _, _) = send(
        app,
        Method::POST,
        "/create",
        json!({"storageName": name, "keyType": key_type}),
    )
    .await;
    status
}

async fn put(app: &Router, name: &str, key: Value, value: Value) -> StatusCode {
    let (status, _, _) = send(
        app,
        Method::PUT,
        "/put",
        json!({"storageName": name, "key": key, "value": value}),
    )
    .await;
    status
}

// =============================================================================
// Create Tests
// =============================================================================

#[tokio::test]
async fn test_create_returns_ok() {
    let (temp, app) = setup_temp_router();

    let (status, _, body) = send(
        &app,
        Method::POST,
        "/create",
        json!({"storageName": "s1", "keyType": "integer"}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(String::from_utf8(body).unwrap(), "Storage s1 created successfully");
    assert!(temp.path().join("s1").join("parameters").is_file());
}

#[tokio::test]
async fn test_create_twice_is_conflict() {
    let (_temp, app) = setup_temp_router();

    assert_eq!(create(&app, "s1", "integer").await, StatusCode::OK);
    assert_eq!(create(&app, "s1", "integer").await, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_create_unknown_key_type_is_not_found() {
    let (_temp, app) = setup_temp_router();
    assert_eq!(create(&app, "s1", "date").await, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_create_bad_name_is_bad_request() {
    let (_temp, app) = setup_temp_router();
    assert_eq!(create(&app, "../s1", "integer").await, StatusCode::BAD_REQUEST);
}

// =============================================================================
// Put / Get Tests
// =============================================================================

#[tokio::test]
async fn test_put_then_get() {
    let (_temp, app) = setup_temp_router();
    create(&app, "s1", "integer").await;

    let (status, _, body) = send(
        &app,
        Method::PUT,
        "/put",
        json!({"storageName": "s1", "key": 1, "value": "a"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        String::from_utf8(body).unwrap(),
        "Object successfully mapped to given key"
    );

    let (status, content_type, body) = send(
        &app,
        Method::GET,
        "/get",
        json!({"storageName": "s1", "key": 1}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(content_type.as_deref(), Some("application/json"));
    assert_eq!(serde_json::from_slice::<Value>(&body).unwrap(), json!("a"));
}

#[tokio::test]
async fn test_put_accepts_post() {
    let (_temp, app) = setup_temp_router();
    create(&app, "s1", "string").await;

    let (status, _, _) = send(
        &app,
        Method::POST,
        "/put",
        json!({"storageName": "s1", "key": "k", "value": 1}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_structured_values_round_trip() {
    let (_temp, app) = setup_temp_router();
    create(&app, "s1", "long").await;

    let document = json!({"name": "x", "tags": [1, 2, 3], "nested": {"ok": true}});
    assert_eq!(put(&app, "s1", json!(10), document.clone()).await, StatusCode::OK);
    assert_eq!(put(&app, "s1", json!(11), json!(null)).await, StatusCode::OK);

    let (_, _, body) = send(&app, Method::GET, "/get", json!({"storageName": "s1", "key": 10})).await;
    assert_eq!(serde_json::from_slice::<Value>(&body).unwrap(), document);

    // A stored null is still found
    let (status, _, body) = send(&app, Method::GET, "/get", json!({"storageName": "s1", "key": 11})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(serde_json::from_slice::<Value>(&body).unwrap(), Value::Null);
}

#[tokio::test]
async fn test_growth_through_http() {
    let (_temp, app) = setup_temp_router();
    create(&app, "s1", "integer").await;

    for k in 0..5 {
        assert_eq!(put(&app, "s1", json!(k), json!(format!("v{}", k))).await, StatusCode::OK);
    }

    for k in 0..5 {
        let (status, _, body) =
            send(&app, Method::GET, "/get", json!({"storageName": "s1", "key": k})).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            serde_json::from_slice::<Value>(&body).unwrap(),
            json!(format!("v{}", k))
        );
    }
}

// =============================================================================
// Error Status Tests
// =============================================================================

#[tokio::test]
async fn test_get_absent_key_is_not_found() {
    let (_temp, app) = setup_temp_router();
    create(&app, "s1", "integer").await;

    let (status, _, _) = send(&app, Method::GET, "/get", json!({"storageName": "s1", "key": 2})).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_missing_storage_is_not_found() {
    let (_temp, app) = setup_temp_router();

    assert_eq!(put(&app, "ghost", json!(1), json!("a")).await, StatusCode::NOT_FOUND);
    let (status, _, _) = send(&app, Method::GET, "/get", json!({"storageName": "ghost", "key": 1})).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_wrong_key_type_is_bad_request() {
    let (_temp, app) = setup_temp_router();
    create(&app, "s1", "integer").await;

    assert_eq!(
        put(&app, "s1", json!("not a number"), json!("a")).await,
        StatusCode::BAD_REQUEST
    );
    let (status, _, body) = send(
        &app,
        Method::GET,
        "/get",
        json!({"storageName": "s1", "key": [1, 2]}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(String::from_utf8(body).unwrap().contains("integer"));
}

#[tokio::test]
async fn test_unknown_route() {
    let (_temp, app) = setup_temp_router();
    let (status, _, _) = send(&app, Method::POST, "/delete", json!({})).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
