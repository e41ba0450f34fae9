//! Order status changes.
//!
//! Status writes are keyed on `order_id` and must match a row. The order
//! table's local rows only change after the store confirms the write, so a
//! failed update leaves the board showing the previous status.

use serde_json::Value;
use shopdesk_core::{OrderId, OrderStatus};
use tracing::{error, info, instrument};

use crate::models::{Order, Record};
use crate::store::{Collections, Row, RowKey, StoreError};

/// Write a new status for one order.
///
/// # Errors
///
/// Returns `StoreError::NotFound` if no order has `id`, or the store error.
#[instrument(skip_all, fields(order_id = %id, status = %status))]
pub async fn update_status(
    collections: &Collections,
    id: &OrderId,
    status: OrderStatus,
) -> Result<(), StoreError> {
    let mut patch = Row::new();
    patch.insert("status".to_string(), Value::from(status.as_str()));

    collections
        .update(Order::TABLE, &RowKey::new(Order::KEY, id), patch)
        .await?;

    info!("Order status updated");
    Ok(())
}

/// Locally held order rows with status editing.
#[derive(Debug, Clone, Default)]
pub struct OrderBoard {
    orders: Vec<Order>,
}

impl OrderBoard {
    #[must_use]
    pub const fn new(orders: Vec<Order>) -> Self {
        Self { orders }
    }

    #[must_use]
    pub fn orders(&self) -> &[Order] {
        &self.orders
    }

    #[must_use]
    pub fn get(&self, id: &OrderId) -> Option<&Order> {
        self.orders.iter().find(|order| &order.order_id == id)
    }

    /// Persist a status change, then patch the local row.
    ///
    /// # Errors
    ///
    /// Returns the store error; the local row is left untouched.
    pub async fn change_status(
        &mut self,
        collections: &Collections,
        id: &OrderId,
        status: OrderStatus,
    ) -> Result<(), StoreError> {
        if let Err(e) = update_status(collections, id, status).await {
            error!(order_id = %id, error = %e, "Order status update failed");
            return Err(e);
        }

        if let Some(order) = self.orders.iter_mut().find(|order| &order.order_id == id) {
            order.status = status;
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use serde_json::json;

    use super::*;
    use crate::store::memory::StoreCall;
    use crate::store::{MemoryStore, Query, Table, decode_rows};

    async fn setup() -> (Arc<MemoryStore>, Collections, OrderBoard) {
        let store = Arc::new(MemoryStore::new().with_rows(
            Table::Orders,
            [
                json!({"order_id": "o1", "status": "pending", "product_name": "Runner"}),
                json!({"order_id": "o2", "status": "processing", "product_name": "Tote"}),
            ],
        ));
        let collections = Collections::new(store.clone(), Duration::from_secs(60));
        let rows = collections.select(&Query::select(Table::Orders)).await.unwrap();
        let board = OrderBoard::new(decode_rows(&rows).unwrap());
        (store, collections, board)
    }

    #[tokio::test]
    async fn test_change_status_writes_then_patches_locally() {
        let (store, collections, mut board) = setup().await;
        let id = OrderId::new("o1");

        board
            .change_status(&collections, &id, OrderStatus::Delivered)
            .await
            .unwrap();

        assert_eq!(board.get(&id).unwrap().status, OrderStatus::Delivered);
        assert_eq!(
            board.get(&OrderId::new("o2")).unwrap().status,
            OrderStatus::Processing
        );
        let calls = store.count_calls(|c| {
            matches!(c, StoreCall::Update { key, patch, .. }
                if key.value == "o1" && patch["status"] == json!("delivered"))
        });
        assert_eq!(calls, 1);
    }

    #[tokio::test]
    async fn test_failed_write_leaves_local_row() {
        let (store, collections, mut board) = setup().await;
        store.fail_writes(true);
        let id = OrderId::new("o1");

        let result = board
            .change_status(&collections, &id, OrderStatus::Cancelled)
            .await;
        assert!(result.is_err());
        assert_eq!(board.get(&id).unwrap().status, OrderStatus::Pending);
    }

    #[tokio::test]
    async fn test_unknown_order_is_not_found() {
        let (_, collections, mut board) = setup().await;
        let result = board
            .change_status(&collections, &OrderId::new("nope"), OrderStatus::Delivered)
            .await;
        assert!(matches!(result, Err(StoreError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_status_change_refreshes_cached_list() {
        let (_, collections, _) = setup().await;
        update_status(&collections, &OrderId::new("o2"), OrderStatus::Delivered)
            .await
            .unwrap();
        let rows = collections.select(&Query::select(Table::Orders)).await.unwrap();
        assert_eq!(rows[1]["status"], json!("delivered"));
    }
}
