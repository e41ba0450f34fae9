//! Dashboard figures: headline counts, revenue, recent orders and monthly
//! sales.

use std::collections::BTreeMap;

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shopdesk_core::Price;
use tracing::instrument;

use crate::models::{ORDER_COLUMNS, Order, wire};
use crate::store::{Collections, Direction, Query, StoreError, Table};

/// Orders shown in the recent-orders panel.
pub const RECENT_ORDER_LIMIT: usize = 4;

/// Months shown in the sales chart.
pub const SALES_MONTHS: usize = 12;

/// Headline counts and revenue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DashboardStats {
    pub total_orders: u64,
    pub total_users: u64,
    pub total_products: u64,
    pub revenue: Decimal,
}

/// A formatted stat card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatCard {
    pub label: &'static str,
    pub value: String,
}

impl DashboardStats {
    #[must_use]
    pub fn cards(&self) -> Vec<StatCard> {
        vec![
            StatCard {
                label: "Total Orders",
                value: self.total_orders.to_string(),
            },
            StatCard {
                label: "Total Users",
                value: self.total_users.to_string(),
            },
            StatCard {
                label: "Total Products",
                value: self.total_products.to_string(),
            },
            StatCard {
                label: "Revenue",
                value: Price::usd(self.revenue).display_thousands(),
            },
        ]
    }
}

/// Revenue for one calendar month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SalesPoint {
    /// `YYYY-MM`
    pub month: String,
    /// Short month name, e.g. `Jun`
    pub label: String,
    pub revenue: Decimal,
}

#[derive(Debug, Deserialize)]
struct AmountRow {
    #[serde(default, with = "wire::decimal")]
    total_amount: Option<Decimal>,
}

#[derive(Debug, Deserialize)]
struct SaleRow {
    #[serde(default, with = "wire::timestamp")]
    order_date: Option<DateTime<Utc>>,
    #[serde(default, with = "wire::decimal")]
    total_amount: Option<Decimal>,
}

/// Count orders, users and products and sum revenue.
///
/// # Errors
///
/// Fails if any count or the revenue read fails.
#[instrument(skip_all)]
pub async fn load_stats(collections: &Collections) -> Result<DashboardStats, StoreError> {
    let store = collections.store();
    let (total_orders, total_users, total_products) = tokio::try_join!(
        store.count(Table::Orders),
        store.count(Table::Users),
        store.count(Table::Products),
    )?;

    let amounts: Vec<AmountRow> = collections
        .fetch(&Query::select(Table::Orders).columns("total_amount"))
        .await?;
    let revenue = amounts.iter().filter_map(|row| row.total_amount).sum();

    Ok(DashboardStats {
        total_orders,
        total_users,
        total_products,
        revenue,
    })
}

/// Most recent orders, newest first.
///
/// # Errors
///
/// Propagates store errors.
#[instrument(skip_all)]
pub async fn recent_orders(collections: &Collections) -> Result<Vec<Order>, StoreError> {
    collections
        .fetch(
            &Query::select(Table::Orders)
                .columns(ORDER_COLUMNS)
                .order_by("order_date", Direction::Descending)
                .limit(RECENT_ORDER_LIMIT),
        )
        .await
}

/// Revenue per month for the most recent months with sales.
///
/// # Errors
///
/// Propagates store errors.
#[instrument(skip_all)]
pub async fn monthly_sales(collections: &Collections) -> Result<Vec<SalesPoint>, StoreError> {
    let rows: Vec<SaleRow> = collections
        .fetch(
            &Query::select(Table::Orders)
                .columns("order_date,total_amount")
                .order_by("order_date", Direction::Ascending),
        )
        .await?;

    Ok(group_by_month(
        rows.iter().filter_map(|row| Some((row.order_date?, row.total_amount?))),
    ))
}

/// Sum amounts per calendar month, oldest first, keeping the last
/// [`SALES_MONTHS`] months.
pub fn group_by_month(
    sales: impl IntoIterator<Item = (DateTime<Utc>, Decimal)>,
) -> Vec<SalesPoint> {
    let mut months: BTreeMap<(i32, u32), Decimal> = BTreeMap::new();
    for (at, amount) in sales {
        *months.entry((at.year(), at.month())).or_default() += amount;
    }

    let skip = months.len().saturating_sub(SALES_MONTHS);
    months
        .into_iter()
        .skip(skip)
        .map(|((year, month), revenue)| SalesPoint {
            month: format!("{year:04}-{month:02}"),
            label: NaiveDate::from_ymd_opt(year, month, 1)
                .map(|date| date.format("%b").to_string())
                .unwrap_or_default(),
            revenue,
        })
        .collect()
}
