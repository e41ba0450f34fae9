use serde::{Deserialize, Serialize};
use shopdesk_core::{AddressId, CardDetailId, DelimitedList, UserId, UserRole};

use super::{Record, wire};
use crate::store::Table;

/// A storefront user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "Uid")]
    pub uid: UserId,
    #[serde(rename = "Name", default)]
    pub name: Option<String>,
    #[serde(rename = "Email", default)]
    pub email: Option<String>,
    #[serde(default, with = "wire::user_role")]
    pub role: UserRole,
    #[serde(default)]
    pub sales_notification: Option<bool>,
    #[serde(default)]
    pub new_arrivals_notification: Option<bool>,
    #[serde(default)]
    pub delivery_status_notification: Option<bool>,
    #[serde(rename = "cartList", default)]
    pub cart: DelimitedList,
    #[serde(rename = "favoritesList", default)]
    pub favorites: DelimitedList,
    #[serde(default)]
    pub profile_picture_url: Option<String>,
    #[serde(default)]
    pub default_shipping_id: Option<AddressId>,
    #[serde(default)]
    pub default_card_detail_id: Option<CardDetailId>,
}

impl User {
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("Unnamed user")
    }
}

impl Record for User {
    const TABLE: Table = Table::Users;
    const KEY: &'static str = "Uid";
}
