//! Order commands.
//!
//! # Usage
//!
//! ```bash
//! shopdesk orders list --search runner --status pending
//! shopdesk orders set-status 1717000000000 delivered
//! ```

use shopdesk_admin::filters::{ListFilter, OrderFilters};
use shopdesk_admin::models::{ORDER_COLUMNS, Order, Record};
use shopdesk_admin::orders::OrderBoard;
use shopdesk_admin::store::{Collections, Query};
use shopdesk_core::{OrderId, OrderStatus};

use super::CommandError;

/// List orders, newest first.
///
/// # Errors
///
/// Returns `CommandError::Store` if the store read fails.
pub async fn list(
    collections: &Collections,
    search: String,
    status: Option<OrderStatus>,
) -> Result<(), CommandError> {
    let filters = OrderFilters::default()
        .with_search(search)
        .with_status(status);
    let orders: Vec<Order> = collections.fetch(&filters.query()).await?;

    tracing::info!("{} orders", orders.len());
    for order in &orders {
        log_order(order);
    }
    Ok(())
}

/// Change one order's status and show the result.
///
/// # Errors
///
/// Returns `CommandError::NotFound` if no order has `id`, or the store
/// error if the update fails.
pub async fn set_status(
    collections: &Collections,
    id: &str,
    status: OrderStatus,
) -> Result<(), CommandError> {
    let id = OrderId::new(id);
    let query = Query::select(Order::TABLE)
        .columns(ORDER_COLUMNS)
        .equals(Order::KEY, Some(&id));
    let mut board = OrderBoard::new(collections.fetch(&query).await?);

    let previous = board
        .get(&id)
        .map(|order| order.status)
        .ok_or_else(|| CommandError::NotFound(format!("order {id}")))?;

    board.change_status(collections, &id, status).await?;

    tracing::info!("Order {id}: {} -> {}", previous.label(), status.label());
    if let Some(order) = board.get(&id) {
        log_order(order);
    }
    Ok(())
}

fn log_order(order: &Order) {
    let date = order
        .order_date
        .map_or_else(|| "-".to_string(), |d| d.format("%Y-%m-%d").to_string());
    let total = order
        .total()
        .map_or_else(|| "-".to_string(), |p| p.display());
    tracing::info!(
        "  {}  {}  {:<10}  {:>10}  {}  ({})",
        order.order_id,
        date,
        order.status.label(),
        total,
        order.product_name.as_deref().unwrap_or("-"),
        order.customer_name()
    );
}
