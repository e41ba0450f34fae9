//! Category route handlers.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, put},
};
use serde::Serialize;
use serde_json::{Value, json};
use shopdesk_core::CategoryId;
use tracing::{info, instrument};

use crate::{
    error::AppError,
    filters::CategoryFilters,
    forms::{CategoryDraft, EntityForm},
    list_view::{self, ListState},
    models::{Category, Record},
    state::AppState,
    store::{Collections, Row, RowKey, StoreError},
};

/// Category view for the list page.
#[derive(Debug, Clone, Serialize)]
pub struct CategoryView {
    pub category_id: CategoryId,
    pub name: String,
    pub icon_path: Option<String>,
    pub hidden: bool,
}

impl From<Category> for CategoryView {
    fn from(category: Category) -> Self {
        Self {
            category_id: category.category_id,
            name: category.display_name().to_string(),
            hidden: category.is_hidden(),
            icon_path: category.icon_path,
        }
    }
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/categories", get(index).post(create))
        .route("/api/categories/{id}", put(update).delete(destroy))
}

#[instrument(skip(state))]
async fn index(
    State(state): State<AppState>,
    Query(filters): Query<CategoryFilters>,
) -> ListState<CategoryView> {
    list_view::load::<_, Category>(state.collections(), &filters)
        .await
        .map(CategoryView::from)
}

#[instrument(skip(state, draft))]
async fn create(
    State(state): State<AppState>,
    Json(draft): Json<CategoryDraft>,
) -> Result<impl IntoResponse, AppError> {
    let outcome = EntityForm::create()
        .with_draft(draft)
        .submit(state.collections())
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "category_id": outcome.id() })),
    ))
}

#[instrument(skip(state, draft))]
async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(draft): Json<CategoryDraft>,
) -> Result<Json<Value>, AppError> {
    let outcome = EntityForm::edit_key(id, draft)
        .submit(state.collections())
        .await?;

    Ok(Json(json!({ "category_id": outcome.id() })))
}

#[instrument(skip(state))]
async fn destroy(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    hide(state.collections(), CategoryId::new(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Soft delete: mark the category hidden. The row is kept.
async fn hide(collections: &Collections, id: CategoryId) -> Result<(), StoreError> {
    let mut patch = Row::new();
    patch.insert("status".to_string(), Value::Bool(false));

    collections
        .update(Category::TABLE, &RowKey::new(Category::KEY, id), patch)
        .await?;

    info!(category_id = %id, "Category hidden");
    Ok(())
}
