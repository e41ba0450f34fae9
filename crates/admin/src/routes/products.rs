//! Product route handlers.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, put},
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use shopdesk_core::{CategoryId, ProductId};
use tracing::instrument;

use crate::{
    error::AppError,
    filters::ProductFilters,
    forms::{EntityForm, ProductDraft},
    list_view::{self, ListState},
    models::{Product, wire},
    state::AppState,
};

/// Product view for the list page. Lists are arrays here; the joined
/// string form only exists in the store.
#[derive(Debug, Clone, Serialize)]
pub struct ProductView {
    pub product_id: ProductId,
    pub name: String,
    #[serde(with = "wire::decimal")]
    pub price: Option<Decimal>,
    pub price_display: Option<String>,
    pub description: Option<String>,
    pub category_id: Option<CategoryId>,
    pub colors: Vec<String>,
    pub images: Vec<String>,
    pub thumbnail: Option<String>,
    pub featured: bool,
    pub created_at: Option<DateTime<Utc>>,
}

impl From<Product> for ProductView {
    fn from(product: Product) -> Self {
        Self {
            name: product.display_name().to_string(),
            price_display: product.price().map(|p| p.display()),
            thumbnail: product.thumbnail().map(str::to_owned),
            product_id: product.product_id,
            price: product.price,
            description: product.description,
            category_id: product.category_id,
            colors: product.colors.items().to_vec(),
            images: product.images.items().to_vec(),
            featured: product.featured,
            created_at: product.created_at,
        }
    }
}

/// Body for creating or replacing a product.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ProductPayload {
    pub name: String,
    #[serde(with = "wire::decimal")]
    pub price: Option<Decimal>,
    pub description: String,
    pub category_id: Option<CategoryId>,
    pub featured: bool,
    pub colors: Vec<String>,
    pub images: Vec<String>,
}

impl From<ProductPayload> for ProductDraft {
    fn from(payload: ProductPayload) -> Self {
        let mut draft = Self {
            name: payload.name,
            price: payload.price,
            description: payload.description,
            category_id: payload.category_id,
            featured: payload.featured,
            ..Self::default()
        };
        for color in &payload.colors {
            if !draft.colors.is_selected(color) {
                draft.toggle_color(color);
            }
        }
        for image in &payload.images {
            draft.add_image(image);
        }
        draft
    }
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/products", get(index).post(create))
        .route("/api/products/{id}", put(update))
}

#[instrument(skip(state))]
async fn index(
    State(state): State<AppState>,
    Query(filters): Query<ProductFilters>,
) -> ListState<ProductView> {
    list_view::load::<_, Product>(state.collections(), &filters)
        .await
        .map(ProductView::from)
}

#[instrument(skip(state, payload))]
async fn create(
    State(state): State<AppState>,
    Json(payload): Json<ProductPayload>,
) -> Result<impl IntoResponse, AppError> {
    let outcome = EntityForm::create()
        .with_draft(ProductDraft::from(payload))
        .submit(state.collections())
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "product_id": outcome.id() })),
    ))
}

#[instrument(skip(state, payload))]
async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<ProductPayload>,
) -> Result<Json<Value>, AppError> {
    let outcome = EntityForm::edit_key(id, ProductDraft::from(payload))
        .submit(state.collections())
        .await?;

    Ok(Json(json!({ "product_id": outcome.id() })))
}
