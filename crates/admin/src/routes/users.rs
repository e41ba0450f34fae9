//! User route handlers.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::get,
};
use serde::Serialize;
use shopdesk_core::{AddressId, CardDetailId, UserId, UserRole};
use tracing::instrument;

use crate::{
    error::AppError,
    filters::UserFilters,
    list_view::{self, ListState},
    models::{Address, CardDetail, Record, User},
    state::AppState,
    store::{Query as StoreQuery, Table},
};

/// User row for the list page.
#[derive(Debug, Clone, Serialize)]
pub struct UserView {
    pub uid: UserId,
    pub name: String,
    pub email: Option<String>,
    pub role: UserRole,
    pub profile_picture_url: Option<String>,
    pub sales_notification: bool,
    pub new_arrivals_notification: bool,
    pub delivery_status_notification: bool,
    pub cart_count: usize,
    pub favorites_count: usize,
}

impl From<&User> for UserView {
    fn from(user: &User) -> Self {
        Self {
            uid: user.uid.clone(),
            name: user.display_name().to_string(),
            email: user.email.clone(),
            role: user.role,
            profile_picture_url: user.profile_picture_url.clone(),
            sales_notification: user.sales_notification.unwrap_or_default(),
            new_arrivals_notification: user.new_arrivals_notification.unwrap_or_default(),
            delivery_status_notification: user.delivery_status_notification.unwrap_or_default(),
            cart_count: user.cart.len(),
            favorites_count: user.favorites.len(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AddressView {
    pub id: AddressId,
    pub full_name: Option<String>,
    pub line: String,
    pub is_default: bool,
}

/// A card as shown to operators: never the full number.
#[derive(Debug, Clone, Serialize)]
pub struct CardView {
    pub id: CardDetailId,
    pub cardholder_name: Option<String>,
    pub number: String,
    pub expiry: Option<String>,
    pub is_default: bool,
}

/// A user with their saved addresses and cards.
#[derive(Debug, Clone, Serialize)]
pub struct UserDetail {
    #[serde(flatten)]
    pub user: UserView,
    pub cart: Vec<String>,
    pub favorites: Vec<String>,
    pub addresses: Vec<AddressView>,
    pub cards: Vec<CardView>,
}

impl UserDetail {
    fn new(user: &User, addresses: Vec<Address>, cards: Vec<CardDetail>) -> Self {
        Self {
            user: UserView::from(user),
            cart: user.cart.items().to_vec(),
            favorites: user.favorites.items().to_vec(),
            addresses: addresses
                .into_iter()
                .map(|address| AddressView {
                    is_default: user.default_shipping_id == Some(address.id),
                    line: address.one_line(),
                    id: address.id,
                    full_name: address.full_name,
                })
                .collect(),
            cards: cards
                .into_iter()
                .map(|card| CardView {
                    is_default: user.default_card_detail_id == Some(card.id),
                    number: card.masked(),
                    expiry: card.expiry(),
                    id: card.id,
                    cardholder_name: card.cardholder_name,
                })
                .collect(),
        }
    }
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/users", get(index))
        .route("/api/users/{uid}", get(show))
}

#[instrument(skip(state))]
async fn index(
    State(state): State<AppState>,
    Query(filters): Query<UserFilters>,
) -> ListState<UserView> {
    list_view::load::<_, User>(state.collections(), &filters)
        .await
        .map(|user| UserView::from(&user))
}

#[instrument(skip(state))]
async fn show(
    State(state): State<AppState>,
    Path(uid): Path<String>,
) -> Result<Json<UserDetail>, AppError> {
    let collections = state.collections();
    let user_query = StoreQuery::select(User::TABLE).equals(User::KEY, Some(&uid));
    let address_query = StoreQuery::select(Table::Addresses).equals("user_id", Some(&uid));
    let card_query = StoreQuery::select(Table::CardDetails).equals("user_id", Some(&uid));
    let (users, addresses, cards) = tokio::try_join!(
        collections.fetch::<User>(&user_query),
        collections.fetch::<Address>(&address_query),
        collections.fetch::<CardDetail>(&card_query),
    )?;

    let user = users
        .first()
        .ok_or_else(|| AppError::NotFound(format!("user {uid}")))?;

    Ok(Json(UserDetail::new(user, addresses, cards)))
}
