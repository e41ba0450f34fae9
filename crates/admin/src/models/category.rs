use serde::{Deserialize, Serialize};
use shopdesk_core::CategoryId;

use super::Record;
use crate::store::Table;

/// A product category.
///
/// `status` is the soft-delete flag: `Some(false)` marks a hidden category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub category_id: CategoryId,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(rename = "iconPath", default)]
    pub icon_path: Option<String>,
    #[serde(default)]
    pub status: Option<bool>,
}

impl Category {
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("Unnamed")
    }

    #[must_use]
    pub fn is_hidden(&self) -> bool {
        self.status == Some(false)
    }
}

impl Record for Category {
    const TABLE: Table = Table::Categories;
    const KEY: &'static str = "category_id";
}
