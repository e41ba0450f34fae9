//! Integration test support for Shopdesk.
//!
//! Tests drive the admin router in process with `tower::ServiceExt::oneshot`.
//! The router runs against a [`MemoryStore`] and a [`StubUploader`], so no
//! network access is needed.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p shopdesk-integration-tests
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode, header};
use serde_json::Value;
use shopdesk_admin::assets::{AssetUploader, UploadError, UploadFile, UploadedAsset};
use shopdesk_admin::routes;
use shopdesk_admin::state::AppState;
use shopdesk_admin::store::MemoryStore;
use tower::ServiceExt;

/// Boundary used by [`multipart_body`].
pub const BOUNDARY: &str = "shopdesk-test-boundary";

/// Uploader that answers from a fixed script.
#[derive(Debug)]
pub struct StubUploader {
    reply: Option<String>,
    calls: AtomicUsize,
}

impl StubUploader {
    /// Every upload succeeds with `url`.
    #[must_use]
    pub fn returning(url: impl Into<String>) -> Self {
        Self {
            reply: Some(url.into()),
            calls: AtomicUsize::new(0),
        }
    }

    /// Every upload comes back without a URL.
    #[must_use]
    pub const fn missing_url() -> Self {
        Self {
            reply: None,
            calls: AtomicUsize::new(0),
        }
    }

    #[must_use]
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AssetUploader for StubUploader {
    async fn upload(&self, file: UploadFile) -> Result<UploadedAsset, UploadError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if file.bytes.is_empty() {
            return Err(UploadError::Empty);
        }
        self.reply
            .clone()
            .map(|secure_url| UploadedAsset { secure_url })
            .ok_or(UploadError::MissingUrl)
    }
}

/// A decoded response.
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    /// JSON body, or `Value::Null` for an empty or non-JSON body.
    pub body: Value,
}

/// The admin router wired to in-memory backends.
pub struct TestApp {
    pub store: Arc<MemoryStore>,
    pub uploader: Arc<StubUploader>,
    router: Router,
}

impl TestApp {
    #[must_use]
    pub fn new(store: MemoryStore) -> Self {
        Self::with_uploader(store, StubUploader::returning("https://assets.example/img.png"))
    }

    #[must_use]
    pub fn with_uploader(store: MemoryStore, uploader: StubUploader) -> Self {
        let store = Arc::new(store);
        let uploader = Arc::new(uploader);
        let state = AppState::new(store.clone(), uploader.clone(), Duration::from_secs(60));
        Self {
            store,
            uploader,
            router: routes::app(state),
        }
    }

    /// # Panics
    ///
    /// Panics if the request cannot be built or the body cannot be read.
    pub async fn get(&self, uri: &str) -> TestResponse {
        self.request(
            Request::get(uri)
                .body(Body::empty())
                .expect("request builds"),
        )
        .await
    }

    /// # Panics
    ///
    /// Panics if the request cannot be built or the body cannot be read.
    pub async fn send_json(&self, method: Method, uri: &str, body: &Value) -> TestResponse {
        self.request(
            Request::builder()
                .method(method)
                .uri(uri)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .expect("request builds"),
        )
        .await
    }

    /// # Panics
    ///
    /// Panics if the request cannot be built or the body cannot be read.
    pub async fn delete(&self, uri: &str) -> TestResponse {
        self.request(
            Request::delete(uri)
                .body(Body::empty())
                .expect("request builds"),
        )
        .await
    }

    /// # Panics
    ///
    /// Panics if the body cannot be read.
    pub async fn request(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible");
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body reads");
        TestResponse {
            status,
            body: serde_json::from_slice(&bytes).unwrap_or(Value::Null),
        }
    }
}

/// A multipart body with one field named `field`, split on [`BOUNDARY`].
#[must_use]
pub fn multipart_body(field: &str, file_name: &str, bytes: &[u8]) -> Vec<u8> {
    let mut body = format!(
        "--{BOUNDARY}\r\n\
         Content-Disposition: form-data; name=\"{field}\"; filename=\"{file_name}\"\r\n\
         Content-Type: image/png\r\n\r\n"
    )
    .into_bytes();
    body.extend_from_slice(bytes);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());
    body
}
