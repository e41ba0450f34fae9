//! Dashboard route handler.
//!
//! The three panels load concurrently and fail independently: a store error
//! in one panel leaves the others intact.

use axum::{Json, Router, extract::State, routing::get};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{error, instrument};

use super::orders::OrderView;
use crate::{
    dashboard::{self, DashboardStats, SalesPoint, StatCard},
    list_view::ListState,
    models::wire,
    state::AppState,
};

/// Headline counts with their formatted cards.
#[derive(Debug, Clone, Serialize)]
pub struct StatsView {
    pub total_orders: u64,
    pub total_users: u64,
    pub total_products: u64,
    #[serde(with = "wire::decimal")]
    pub revenue: Option<Decimal>,
    pub cards: Vec<StatCard>,
}

impl From<DashboardStats> for StatsView {
    fn from(stats: DashboardStats) -> Self {
        Self {
            cards: stats.cards(),
            total_orders: stats.total_orders,
            total_users: stats.total_users,
            total_products: stats.total_products,
            revenue: Some(stats.revenue),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SalesView {
    pub month: String,
    pub label: String,
    #[serde(with = "wire::decimal")]
    pub revenue: Option<Decimal>,
}

impl From<SalesPoint> for SalesView {
    fn from(point: SalesPoint) -> Self {
        Self {
            month: point.month,
            label: point.label,
            revenue: Some(point.revenue),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DashboardView {
    /// `None` when the counts could not be loaded.
    pub stats: Option<StatsView>,
    pub recent_orders: ListState<OrderView>,
    pub monthly_sales: ListState<SalesView>,
}

pub fn router() -> Router<AppState> {
    Router::new().route("/api/dashboard", get(index))
}

#[instrument(skip(state))]
async fn index(State(state): State<AppState>) -> Json<DashboardView> {
    let collections = state.collections();
    let (stats, recent, sales) = tokio::join!(
        dashboard::load_stats(collections),
        dashboard::recent_orders(collections),
        dashboard::monthly_sales(collections),
    );

    let stats = stats
        .inspect_err(|e| error!(error = %e, "Dashboard stats failed"))
        .ok()
        .map(StatsView::from);

    Json(DashboardView {
        stats,
        recent_orders: ListState::settle(recent).map(OrderView::from),
        monthly_sales: ListState::settle(sales).map(SalesView::from),
    })
}
