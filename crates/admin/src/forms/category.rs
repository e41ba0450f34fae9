use serde::{Deserialize, Serialize};

use super::{Draft, FormError};
use crate::models::Category;
use crate::store::{Row, StoreError, encode_row};

/// Editable category fields. A category has a single icon.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CategoryDraft {
    pub name: String,
    #[serde(default)]
    pub icon_path: Option<String>,
}

#[derive(Serialize)]
struct CategoryRow<'a> {
    name: &'a str,
    #[serde(rename = "iconPath")]
    icon_path: Option<&'a str>,
}

impl Draft for CategoryDraft {
    type Record = Category;

    fn from_record(record: &Category) -> Self {
        Self {
            name: record.name.clone().unwrap_or_default(),
            icon_path: record.icon_path.clone(),
        }
    }

    fn record_key(record: &Category) -> i64 {
        record.category_id.as_i64()
    }

    fn validate(&self) -> Result<(), FormError> {
        if self.name.trim().is_empty() {
            return Err(FormError::Required("name"));
        }
        Ok(())
    }

    fn to_row(&self) -> Result<Row, StoreError> {
        encode_row(&CategoryRow {
            name: self.name.trim(),
            icon_path: self.icon_path.as_deref(),
        })
    }

    /// Replaces any previous icon.
    fn attach_asset(&mut self, url: String) {
        self.icon_path = Some(url);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;
    use shopdesk_core::CategoryId;

    use super::*;

    #[test]
    fn test_upload_replaces_icon() {
        let mut draft = CategoryDraft {
            name: "Shoes".to_string(),
            icon_path: Some("https://cdn/old.png".to_string()),
        };
        draft.attach_asset("https://cdn/new.png".to_string());
        assert_eq!(draft.icon_path.as_deref(), Some("https://cdn/new.png"));
    }

    #[test]
    fn test_row_uses_wire_names() {
        let draft = CategoryDraft {
            name: "  Bags ".to_string(),
            icon_path: None,
        };
        let row = draft.to_row().unwrap();
        assert_eq!(row["name"], json!("Bags"));
        assert_eq!(row["iconPath"], serde_json::Value::Null);
        assert!(!row.contains_key("category_id"));
    }

    #[test]
    fn test_seeded_from_record() {
        let category = Category {
            category_id: CategoryId::new(9),
            name: Some("Hats".to_string()),
            icon_path: None,
            status: None,
        };
        let draft = CategoryDraft::from_record(&category);
        assert_eq!(draft.name, "Hats");
        assert_eq!(CategoryDraft::record_key(&category), 9);
    }
}
