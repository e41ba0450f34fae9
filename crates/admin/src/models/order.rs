use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shopdesk_core::{AddressId, CardDetailId, OrderId, OrderStatus, Price, UserId};

use super::{Record, wire};
use crate::store::Table;

/// Columns selected for order lists, embedding the purchasing user.
pub const ORDER_COLUMNS: &str = "*,Users!Orders_user_id_fkey(Name,Email)";

/// A customer order. Each order covers a single product line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub order_id: OrderId,
    #[serde(default)]
    pub user_id: Option<UserId>,
    #[serde(default, with = "wire::timestamp")]
    pub order_date: Option<DateTime<Utc>>,
    #[serde(default, with = "wire::decimal")]
    pub total_amount: Option<Decimal>,
    #[serde(default)]
    pub total_quantity: Option<i64>,
    #[serde(default, with = "wire::order_status")]
    pub status: OrderStatus,
    #[serde(default)]
    pub product_name: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub shipping_address_id: Option<AddressId>,
    #[serde(default)]
    pub card_detail_id: Option<CardDetailId>,
    /// Embedded purchaser, present when selected with [`ORDER_COLUMNS`].
    #[serde(rename = "Users", default, skip_serializing_if = "Option::is_none")]
    pub customer: Option<Customer>,
}

/// Name and email of the purchasing user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    #[serde(rename = "Name", default)]
    pub name: Option<String>,
    #[serde(rename = "Email", default)]
    pub email: Option<String>,
}

impl Order {
    #[must_use]
    pub fn total(&self) -> Option<Price> {
        self.total_amount.map(Price::usd)
    }

    #[must_use]
    pub fn customer_name(&self) -> &str {
        self.customer
            .as_ref()
            .and_then(|c| c.name.as_deref())
            .unwrap_or("Unknown customer")
    }
}

impl Record for Order {
    const TABLE: Table = Table::Orders;
    const KEY: &'static str = "order_id";
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_decode_with_embedded_customer() {
        let order: Order = serde_json::from_value(json!({
            "order_id": "ord_1",
            "user_id": "u_1",
            "order_date": "2025-06-03T09:00:00",
            "total_amount": 120,
            "total_quantity": 2,
            "status": "processing",
            "product_name": "Runner",
            "Users": {"Name": "Ada", "Email": "ada@example.com"}
        }))
        .unwrap();
        assert_eq!(order.status, OrderStatus::Processing);
        assert_eq!(order.customer_name(), "Ada");
        assert_eq!(order.total().unwrap().display(), "$120.00");
    }

    #[test]
    fn test_unknown_status_reads_as_pending() {
        let order: Order =
            serde_json::from_value(json!({"order_id": "o", "status": "shipped"})).unwrap();
        assert_eq!(order.status, OrderStatus::Pending);

        let order: Order = serde_json::from_value(json!({"order_id": "o"})).unwrap();
        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(order.customer_name(), "Unknown customer");
    }
}
