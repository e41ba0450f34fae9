//! Integration tests for asset uploads and notifications.

#![allow(clippy::unwrap_used)]

use axum::body::Body;
use axum::http::{Method, Request, StatusCode, header};
use serde_json::json;
use shopdesk_admin::store::MemoryStore;
use shopdesk_integration_tests::{BOUNDARY, StubUploader, TestApp, TestResponse, multipart_body};

async fn upload(app: &TestApp, field: &str, bytes: &[u8]) -> TestResponse {
    app.request(
        Request::post("/api/uploads")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(multipart_body(field, "shoe.png", bytes)))
            .unwrap(),
    )
    .await
}

// =============================================================================
// Upload Tests
// =============================================================================

#[tokio::test]
async fn test_upload_returns_secure_url() {
    let app = TestApp::with_uploader(
        MemoryStore::new(),
        StubUploader::returning("https://assets.example/shoe.png"),
    );

    let response = upload(&app, "file", b"\x89PNG").await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(
        response.body,
        json!({"secure_url": "https://assets.example/shoe.png"})
    );
    assert_eq!(app.uploader.calls(), 1);
}

#[tokio::test]
async fn test_upload_without_url_is_a_failure() {
    let app = TestApp::with_uploader(MemoryStore::new(), StubUploader::missing_url());

    let response = upload(&app, "file", b"\x89PNG").await;

    assert_eq!(response.status, StatusCode::BAD_GATEWAY);
    assert_eq!(response.body["error"], "Upload failed");
}

#[tokio::test]
async fn test_upload_requires_file_field() {
    let app = TestApp::new(MemoryStore::new());

    let response = upload(&app, "image", b"\x89PNG").await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(app.uploader.calls(), 0);
}

// =============================================================================
// Notification Tests
// =============================================================================

#[tokio::test]
async fn test_notification_is_validated_and_echoed() {
    let app = TestApp::new(MemoryStore::new());

    let response = app
        .send_json(
            Method::POST,
            "/api/notifications",
            &json!({"title": " Summer sale ", "message": "20% off", "kind": "promotion", "audience": "vip"}),
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["title"], "Summer sale");
    assert_eq!(response.body["kind"], "promotion");
    assert_eq!(response.body["audience"], "vip");
    assert!(response.body["sent_at"].is_string());
    assert!(app.store.calls().is_empty());
}

#[tokio::test]
async fn test_notification_without_message_is_rejected() {
    let app = TestApp::new(MemoryStore::new());

    let response = app
        .send_json(Method::POST, "/api/notifications", &json!({"title": "Hi"}))
        .await;

    assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(response.body["error"], "Validation failed: message is required");
}
