//! Collection page state.
//!
//! A list page is always in exactly one [`ListState`]. Loading resolves to
//! `Loaded` or `Empty` on success and to `Failed` on a store error; a failed
//! fetch is logged and never surfaced as a panic.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use tracing::{debug, error};

use crate::filters::ListFilter;
use crate::models::Record;
use crate::store::{Collections, StoreError};

/// State of one list page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ListState<T> {
    Loading,
    Failed { message: String },
    Empty,
    Loaded { items: Vec<T> },
}

impl<T> ListState<T> {
    /// Resolve a finished fetch.
    #[must_use]
    pub fn settle(result: Result<Vec<T>, StoreError>) -> Self {
        match result {
            Ok(items) if items.is_empty() => Self::Empty,
            Ok(items) => Self::Loaded { items },
            Err(e) => {
                error!(error = %e, "List fetch failed");
                Self::Failed {
                    message: "Could not load data. Try again.".to_string(),
                }
            }
        }
    }

    #[must_use]
    pub const fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    /// Items currently shown; empty unless loaded.
    #[must_use]
    pub fn items(&self) -> &[T] {
        match self {
            Self::Loaded { items } => items,
            _ => &[],
        }
    }

    /// Convert loaded items, keeping the state.
    #[must_use]
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> ListState<U> {
        match self {
            Self::Loading => ListState::Loading,
            Self::Failed { message } => ListState::Failed { message },
            Self::Empty => ListState::Empty,
            Self::Loaded { items } => ListState::Loaded {
                items: items.into_iter().map(f).collect(),
            },
        }
    }
}

/// Fetch a filtered page of records.
pub async fn load<F, T>(collections: &Collections, filters: &F) -> ListState<T>
where
    F: ListFilter,
    T: Record,
{
    let query = filters.query();
    debug!(table = %query.table(), predicates = query.predicates().len(), "Loading list");
    ListState::settle(collections.fetch(&query).await)
}

impl<T: Serialize> IntoResponse for ListState<T> {
    fn into_response(self) -> Response {
        let status = match self {
            Self::Failed { .. } => StatusCode::BAD_GATEWAY,
            Self::Loading => StatusCode::ACCEPTED,
            Self::Empty | Self::Loaded { .. } => StatusCode::OK,
        };
        (status, Json(self)).into_response()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use serde_json::json;

    use super::*;
    use crate::filters::CategoryFilters;
    use crate::models::Category;
    use crate::store::{MemoryStore, Table};

    #[test]
    fn test_settle() {
        assert_eq!(ListState::<i32>::settle(Ok(vec![])), ListState::Empty);
        assert_eq!(
            ListState::settle(Ok(vec![1, 2])),
            ListState::Loaded { items: vec![1, 2] }
        );
        let failed = ListState::<i32>::settle(Err(StoreError::Parse("x".into())));
        assert!(matches!(failed, ListState::Failed { .. }));
        assert!(failed.items().is_empty());
    }

    #[test]
    fn test_serialized_shape() {
        let value = serde_json::to_value(ListState::Loaded { items: vec!["a"] }).unwrap();
        assert_eq!(value, json!({"state": "loaded", "items": ["a"]}));
        let value = serde_json::to_value(ListState::<i32>::Empty).unwrap();
        assert_eq!(value, json!({"state": "empty"}));
    }

    #[test]
    fn test_failed_response_is_bad_gateway() {
        let state = ListState::<i32>::Failed {
            message: "down".into(),
        };
        assert_eq!(state.into_response().status(), StatusCode::BAD_GATEWAY);
    }

    #[tokio::test]
    async fn test_load_resolves_to_loaded_or_failed() {
        let store = Arc::new(MemoryStore::new().with_rows(
            Table::Categories,
            [
                json!({"category_id": 1, "name": "Shoes"}),
                json!({"category_id": 2, "name": "Bags"}),
            ],
        ));
        let collections = Collections::new(store.clone(), Duration::from_secs(60));

        let state: ListState<Category> = load(&collections, &CategoryFilters::default()).await;
        let names: Vec<_> = state.items().iter().map(Category::display_name).collect();
        assert_eq!(names, ["Bags", "Shoes"]);

        store.fail_reads(true);
        let filters = CategoryFilters::default().with_search("zzz");
        let state: ListState<Category> = load(&collections, &filters).await;
        assert!(matches!(state, ListState::Failed { .. }));
    }
}
