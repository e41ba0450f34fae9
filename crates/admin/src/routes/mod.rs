//! HTTP route handlers for admin.
//!
//! # Route Structure
//!
//! ```text
//! GET    /health                    - Liveness check
//! GET    /health/ready              - Store reachability
//!
//! # Shell
//! GET    /api/navigation            - Sidebar links with the active one marked
//!
//! # Dashboard
//! GET    /api/dashboard             - Counts, revenue, recent orders, monthly sales
//!
//! # Categories
//! GET    /api/categories            - Category list (?search=)
//! POST   /api/categories            - Create category
//! PUT    /api/categories/{id}       - Update category
//! DELETE /api/categories/{id}       - Soft delete (status = false)
//!
//! # Products
//! GET    /api/products              - Product list (?search=&category=&sort=)
//! POST   /api/products              - Create product
//! PUT    /api/products/{id}         - Update product
//!
//! # Orders
//! GET    /api/orders                - Order list (?search=&status=)
//! PATCH  /api/orders/{id}/status    - Change order status
//!
//! # Users
//! GET    /api/users                 - User list (?search=&role=)
//! GET    /api/users/{uid}           - User with addresses and masked cards
//!
//! # Assets and notifications
//! POST   /api/uploads               - Multipart image upload
//! POST   /api/notifications         - Validate and dispatch a notification
//! ```

use axum::Router;

use crate::state::AppState;

pub mod categories;
pub mod dashboard;
pub mod health;
pub mod navigation;
pub mod notifications;
pub mod orders;
pub mod products;
pub mod uploads;
pub mod users;

/// All API routes, without state.
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(health::router())
        .merge(navigation::router())
        .merge(dashboard::router())
        .merge(categories::router())
        .merge(products::router())
        .merge(orders::router())
        .merge(users::router())
        .merge(uploads::router())
        .merge(notifications::router())
}

/// The application router with state applied.
///
/// Tracing and Sentry layers are added by the binary.
pub fn app(state: AppState) -> Router {
    routes().with_state(state)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    use super::*;
    use crate::assets::{AssetUploader, UploadError, UploadFile, UploadedAsset};
    use crate::store::MemoryStore;

    struct NoUploads;

    #[async_trait]
    impl AssetUploader for NoUploads {
        async fn upload(&self, _file: UploadFile) -> Result<UploadedAsset, UploadError> {
            Err(UploadError::MissingUrl)
        }
    }

    fn test_app() -> Router {
        app(AppState::new(
            Arc::new(MemoryStore::new()),
            Arc::new(NoUploads),
            Duration::from_secs(60),
        ))
    }

    #[tokio::test]
    async fn test_health() {
        let response = test_app()
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_unknown_route_is_not_found() {
        let response = test_app()
            .oneshot(Request::get("/api/nothing").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
