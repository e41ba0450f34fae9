//! Order route handlers.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{get, patch},
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shopdesk_core::{OrderId, OrderStatus, UserId};
use tracing::instrument;

use crate::{
    error::AppError,
    filters::OrderFilters,
    list_view::{self, ListState},
    models::{Order, wire},
    orders,
    state::AppState,
};

/// Order view for tables and the dashboard.
#[derive(Debug, Clone, Serialize)]
pub struct OrderView {
    pub order_id: OrderId,
    pub user_id: Option<UserId>,
    pub customer: String,
    pub email: Option<String>,
    pub product_name: Option<String>,
    pub color: Option<String>,
    pub image_url: Option<String>,
    pub quantity: Option<i64>,
    #[serde(with = "wire::decimal")]
    pub total: Option<Decimal>,
    pub total_display: Option<String>,
    pub status: OrderStatus,
    pub status_label: &'static str,
    pub order_date: Option<DateTime<Utc>>,
}

impl From<Order> for OrderView {
    fn from(order: Order) -> Self {
        Self {
            customer: order.customer_name().to_string(),
            email: order.customer.as_ref().and_then(|c| c.email.clone()),
            total_display: order.total().map(|p| p.display()),
            status_label: order.status.label(),
            order_id: order.order_id,
            user_id: order.user_id,
            product_name: order.product_name,
            color: order.color,
            image_url: order.image_url,
            quantity: order.total_quantity,
            total: order.total_amount,
            status: order.status,
            order_date: order.order_date,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct StatusInput {
    pub status: OrderStatus,
}

#[derive(Debug, Serialize)]
pub struct StatusChanged {
    pub order_id: OrderId,
    pub status: OrderStatus,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/orders", get(index))
        .route("/api/orders/{id}/status", patch(change_status))
}

#[instrument(skip(state))]
async fn index(
    State(state): State<AppState>,
    Query(filters): Query<OrderFilters>,
) -> ListState<OrderView> {
    list_view::load::<_, Order>(state.collections(), &filters)
        .await
        .map(OrderView::from)
}

#[instrument(skip(state))]
async fn change_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<StatusInput>,
) -> Result<Json<StatusChanged>, AppError> {
    let order_id = OrderId::new(id);
    orders::update_status(state.collections(), &order_id, input.status).await?;

    Ok(Json(StatusChanged {
        order_id,
        status: input.status,
    }))
}
