//! Shell navigation handler.

use axum::{Json, Router, extract::Query, routing::get};
use serde::Deserialize;

use crate::shell::{Navigation, Sidebar};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct NavigationQuery {
    pub path: String,
    pub collapsed: bool,
}

pub fn router() -> Router<AppState> {
    Router::new().route("/api/navigation", get(navigation))
}

async fn navigation(Query(query): Query<NavigationQuery>) -> Json<Navigation> {
    Json(Sidebar::new(query.collapsed).navigation(&query.path))
}
