use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shopdesk_core::{CategoryId, DelimitedList, Price, ProductId};

use super::{Record, wire};
use crate::store::Table;

/// A catalog product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub product_id: ProductId,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, with = "wire::decimal")]
    pub price: Option<Decimal>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(rename = "categoryId", default)]
    pub category_id: Option<CategoryId>,
    #[serde(rename = "colorsList", default)]
    pub colors: DelimitedList,
    #[serde(rename = "imagesList", default)]
    pub images: DelimitedList,
    #[serde(default, with = "wire::flag_text")]
    pub featured: bool,
    #[serde(default, with = "wire::timestamp")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Product {
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("Unnamed product")
    }

    #[must_use]
    pub fn price(&self) -> Option<Price> {
        self.price.map(Price::usd)
    }

    /// First image, used as the list thumbnail.
    #[must_use]
    pub fn thumbnail(&self) -> Option<&str> {
        self.images.first()
    }
}

impl Record for Product {
    const TABLE: Table = Table::Products;
    const KEY: &'static str = "product_id";
}
