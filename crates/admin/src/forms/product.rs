use rust_decimal::Decimal;
use serde::Serialize;
use shopdesk_core::{CategoryId, ColorSelection, DelimitedList};

use super::{Draft, FormError};
use crate::models::{Product, wire};
use crate::store::{Row, StoreError, encode_row};

/// Editable product fields.
///
/// Colors keep palette order as they are toggled; images are an ordered
/// set where uploads append and duplicates are ignored.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductDraft {
    pub name: String,
    pub price: Option<Decimal>,
    pub description: String,
    pub category_id: Option<CategoryId>,
    pub featured: bool,
    pub colors: ColorSelection,
    pub images: DelimitedList,
}

impl ProductDraft {
    /// Toggle a palette color. Returns whether it is now selected.
    pub fn toggle_color(&mut self, name: &str) -> bool {
        self.colors.toggle(name)
    }

    /// Append an image URL unless already present.
    pub fn add_image(&mut self, url: &str) -> bool {
        self.images.push_unique(url)
    }

    pub fn remove_image(&mut self, url: &str) -> bool {
        self.images.remove(url)
    }
}

#[derive(Serialize)]
struct ProductRow<'a> {
    name: &'a str,
    #[serde(with = "wire::decimal")]
    price: Option<Decimal>,
    description: &'a str,
    #[serde(rename = "categoryId")]
    category_id: Option<CategoryId>,
    #[serde(rename = "colorsList")]
    colors: &'a DelimitedList,
    #[serde(rename = "imagesList")]
    images: &'a DelimitedList,
    #[serde(with = "wire::flag_text")]
    featured: bool,
}

impl Draft for ProductDraft {
    type Record = Product;

    fn from_record(record: &Product) -> Self {
        Self {
            name: record.name.clone().unwrap_or_default(),
            price: record.price,
            description: record.description.clone().unwrap_or_default(),
            category_id: record.category_id,
            featured: record.featured,
            colors: ColorSelection::new(record.colors.clone()),
            images: record.images.clone(),
        }
    }

    fn record_key(record: &Product) -> i64 {
        record.product_id.as_i64()
    }

    fn validate(&self) -> Result<(), FormError> {
        if self.name.trim().is_empty() {
            return Err(FormError::Required("name"));
        }
        if self.category_id.is_none() {
            return Err(FormError::Required("category"));
        }
        match self.price {
            None => Err(FormError::Required("price")),
            Some(price) if price.is_sign_negative() => Err(FormError::Invalid {
                field: "price",
                reason: "must not be negative".to_string(),
            }),
            Some(_) => Ok(()),
        }
    }

    fn to_row(&self) -> Result<Row, StoreError> {
        encode_row(&ProductRow {
            name: self.name.trim(),
            price: self.price,
            description: self.description.trim(),
            category_id: self.category_id,
            colors: self.colors.as_list(),
            images: &self.images,
            featured: self.featured,
        })
    }

    fn attach_asset(&mut self, url: String) {
        self.add_image(&url);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    fn draft() -> ProductDraft {
        ProductDraft {
            name: "Runner".to_string(),
            price: Some(Decimal::new(8950, 2)),
            category_id: Some(CategoryId::new(2)),
            ..ProductDraft::default()
        }
    }

    #[test]
    fn test_row_uses_wire_names_and_formats() {
        let mut draft = draft();
        draft.featured = true;
        draft.toggle_color("Blue");
        draft.toggle_color("Red");
        draft.attach_asset("https://cdn/a.png".to_string());
        draft.attach_asset("https://cdn/b.png".to_string());

        let row = draft.to_row().unwrap();
        assert_eq!(row["price"], json!(89.5));
        assert_eq!(row["categoryId"], json!(2));
        assert_eq!(row["colorsList"], json!("Red, Blue"));
        assert_eq!(row["imagesList"], json!("https://cdn/a.png, https://cdn/b.png"));
        assert_eq!(row["featured"], json!("true"));
    }

    #[test]
    fn test_duplicate_image_is_ignored() {
        let mut draft = draft();
        draft.attach_asset("https://cdn/a.png".to_string());
        draft.attach_asset("https://cdn/a.png".to_string());
        assert_eq!(draft.images.len(), 1);
    }

    #[test]
    fn test_validation() {
        assert!(draft().validate().is_ok());

        let mut missing_price = draft();
        missing_price.price = None;
        assert!(matches!(
            missing_price.validate(),
            Err(FormError::Required("price"))
        ));

        let mut missing_category = draft();
        missing_category.category_id = None;
        assert!(matches!(
            missing_category.validate(),
            Err(FormError::Required("category"))
        ));

        let mut negative = draft();
        negative.price = Some(Decimal::new(-1, 0));
        assert!(matches!(
            negative.validate(),
            Err(FormError::Invalid { field: "price", .. })
        ));
    }
}
