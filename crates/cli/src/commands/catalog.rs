//! Category and product listing commands.
//!
//! # Usage
//!
//! ```bash
//! shopdesk categories list --search sho
//! shopdesk products list --category 3 --sort desc
//! ```

use shopdesk_admin::filters::{CategoryFilters, ListFilter, ProductFilters};
use shopdesk_admin::models::{Category, Product};
use shopdesk_admin::store::{Collections, Direction};
use shopdesk_core::CategoryId;

use super::CommandError;

/// List categories matching `search`.
///
/// # Errors
///
/// Returns `CommandError::Store` if the store read fails.
pub async fn list_categories(collections: &Collections, search: String) -> Result<(), CommandError> {
    let filters = CategoryFilters::default().with_search(search);
    let categories: Vec<Category> = collections.fetch(&filters.query()).await?;

    tracing::info!("{} categories", categories.len());
    for category in &categories {
        let hidden = if category.is_hidden() { " (hidden)" } else { "" };
        tracing::info!(
            "  {:>14}  {}{}",
            category.category_id,
            category.display_name(),
            hidden
        );
    }
    Ok(())
}

/// List products matching the given filters.
///
/// # Errors
///
/// Returns `CommandError::Store` if the store read fails.
pub async fn list_products(
    collections: &Collections,
    search: String,
    category: Option<CategoryId>,
    sort: Option<Direction>,
) -> Result<(), CommandError> {
    let filters = ProductFilters::default()
        .with_search(search)
        .with_category(category)
        .with_sort(sort);
    let products: Vec<Product> = collections.fetch(&filters.query()).await?;

    tracing::info!("{} products", products.len());
    for product in &products {
        let price = product
            .price()
            .map_or_else(|| "-".to_string(), |p| p.display());
        let featured = if product.featured { " *" } else { "" };
        tracing::info!(
            "  {:>14}  {:>10}  {}{}",
            product.product_id,
            price,
            product.display_name(),
            featured
        );
        if !product.colors.is_empty() {
            tracing::info!("  {:>14}  colors: {}", "", product.colors.join());
        }
    }
    Ok(())
}
