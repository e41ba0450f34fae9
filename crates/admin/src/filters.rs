//! List filters.
//!
//! Each list page keeps an immutable filter value. A [`FilterBar`] replaces
//! that value on every change and hands the new one to its listener right
//! away, with no debounce. Filter values deserialize straight from request
//! query strings; blank inputs mean "no filter".

use std::fmt::Display;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};
use shopdesk_core::{CategoryId, OrderStatus, UserRole};

use crate::models::ORDER_COLUMNS;
use crate::store::{Direction, Query, Table};

/// A filter value that maps onto a store query.
pub trait ListFilter: Clone + Default + Send + Sync + 'static {
    /// Query for the current filter values.
    fn query(&self) -> Query;
}

/// Category list filters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CategoryFilters {
    pub search: String,
}

impl CategoryFilters {
    #[must_use]
    pub fn with_search(self, search: impl Into<String>) -> Self {
        Self {
            search: search.into(),
        }
    }
}

impl ListFilter for CategoryFilters {
    fn query(&self) -> Query {
        Query::select(Table::Categories)
            .contains("name", &self.search)
            .order_by("name", Direction::Ascending)
    }
}

/// Product list filters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProductFilters {
    pub search: String,
    #[serde(deserialize_with = "blank_as_none")]
    pub category: Option<CategoryId>,
    /// Price ordering; newest first when unset.
    #[serde(deserialize_with = "blank_as_none")]
    pub sort: Option<Direction>,
}

impl ProductFilters {
    #[must_use]
    pub fn with_search(self, search: impl Into<String>) -> Self {
        Self {
            search: search.into(),
            ..self
        }
    }

    #[must_use]
    pub fn with_category(self, category: Option<CategoryId>) -> Self {
        Self { category, ..self }
    }

    #[must_use]
    pub fn with_sort(self, sort: Option<Direction>) -> Self {
        Self { sort, ..self }
    }
}

impl ListFilter for ProductFilters {
    fn query(&self) -> Query {
        let query = Query::select(Table::Products)
            .contains("name", &self.search)
            .equals("categoryId", self.category);
        match self.sort {
            Some(direction) => query.order_by("price", direction),
            None => query.order_by("created_at", Direction::Descending),
        }
    }
}

/// Order list filters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrderFilters {
    pub search: String,
    #[serde(deserialize_with = "blank_as_none")]
    pub status: Option<OrderStatus>,
}

impl OrderFilters {
    #[must_use]
    pub fn with_search(self, search: impl Into<String>) -> Self {
        Self {
            search: search.into(),
            ..self
        }
    }

    #[must_use]
    pub fn with_status(self, status: Option<OrderStatus>) -> Self {
        Self { status, ..self }
    }
}

impl ListFilter for OrderFilters {
    fn query(&self) -> Query {
        Query::select(Table::Orders)
            .columns(ORDER_COLUMNS)
            .contains("product_name", &self.search)
            .equals("status", self.status)
            .order_by("order_date", Direction::Descending)
    }
}

/// User list filters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserFilters {
    pub search: String,
    #[serde(deserialize_with = "blank_as_none")]
    pub role: Option<UserRole>,
}

impl UserFilters {
    #[must_use]
    pub fn with_search(self, search: impl Into<String>) -> Self {
        Self {
            search: search.into(),
            ..self
        }
    }

    #[must_use]
    pub fn with_role(self, role: Option<UserRole>) -> Self {
        Self { role, ..self }
    }
}

impl ListFilter for UserFilters {
    fn query(&self) -> Query {
        Query::select(Table::Users)
            .contains("Name", &self.search)
            .equals("role", self.role)
            .order_by("Name", Direction::Ascending)
    }
}

type Listener<F> = Box<dyn Fn(&F) + Send + Sync>;

/// Holds the current filter value and reports every change.
pub struct FilterBar<F: ListFilter> {
    current: F,
    listener: Listener<F>,
}

impl<F: ListFilter> FilterBar<F> {
    pub fn new(listener: impl Fn(&F) + Send + Sync + 'static) -> Self {
        Self {
            current: F::default(),
            listener: Box::new(listener),
        }
    }

    #[must_use]
    pub const fn current(&self) -> &F {
        &self.current
    }

    /// Replace the filter value and notify the listener synchronously.
    pub fn update(&mut self, change: impl FnOnce(F) -> F) -> &F {
        self.current = change(self.current.clone());
        (self.listener)(&self.current);
        &self.current
    }

    /// Clear every filter.
    pub fn reset(&mut self) -> &F {
        self.update(|_| F::default())
    }
}

impl<F: ListFilter + std::fmt::Debug> std::fmt::Debug for FilterBar<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FilterBar")
            .field("current", &self.current)
            .finish_non_exhaustive()
    }
}

/// Deserialize an optional value, treating a blank string as absent.
fn blank_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: Display,
{
    match Option::<String>::deserialize(deserializer)? {
        Some(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(serde::de::Error::custom),
        _ => Ok(None),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;
    use crate::store::Predicate;

    #[test]
    fn test_empty_filters_are_unfiltered() {
        assert!(CategoryFilters::default().query().predicates().is_empty());
        assert!(ProductFilters::default().query().predicates().is_empty());
        assert!(OrderFilters::default().query().predicates().is_empty());
        assert!(UserFilters::default().query().predicates().is_empty());
    }

    #[test]
    fn test_product_predicates_are_conjunction_of_active_filters() {
        let search_only = ProductFilters::default().with_search("run");
        assert_eq!(
            search_only.query().predicates(),
            [Predicate::Contains {
                column: "name",
                term: "run".into()
            }]
        );

        let both = search_only.with_category(Some(CategoryId::new(3)));
        assert_eq!(
            both.query().predicates(),
            [
                Predicate::Contains {
                    column: "name",
                    term: "run".into()
                },
                Predicate::Equals {
                    column: "categoryId",
                    value: "3".into()
                }
            ]
        );

        let category_only = both.with_search("  ");
        assert_eq!(category_only.query().predicates().len(), 1);
    }

    #[test]
    fn test_product_sort_replaces_default_order() {
        let newest = ProductFilters::default().query().ordering().unwrap();
        assert_eq!(newest.column, "created_at");
        assert_eq!(newest.direction, Direction::Descending);

        let cheapest = ProductFilters::default()
            .with_sort(Some(Direction::Ascending))
            .query()
            .ordering()
            .unwrap();
        assert_eq!(cheapest.column, "price");
    }

    #[test]
    fn test_order_query_embeds_customer() {
        let query = OrderFilters::default()
            .with_status(Some(OrderStatus::Delivered))
            .query();
        assert_eq!(query.selected_columns(), ORDER_COLUMNS);
        assert_eq!(
            query.predicates(),
            [Predicate::Equals {
                column: "status",
                value: "delivered".into()
            }]
        );
    }

    #[test]
    fn test_user_role_filter() {
        let query = UserFilters::default().with_role(Some(UserRole::Admin)).query();
        assert_eq!(
            query.predicates(),
            [Predicate::Equals {
                column: "role",
                value: "admin".into()
            }]
        );
    }

    #[test]
    fn test_blank_query_params_deserialize_as_absent() {
        let filters: ProductFilters =
            serde_json::from_value(serde_json::json!({"search": "", "category": "", "sort": ""}))
                .unwrap();
        assert_eq!(filters, ProductFilters::default());

        let filters: OrderFilters =
            serde_json::from_value(serde_json::json!({"status": "cancelled"})).unwrap();
        assert_eq!(filters.status, Some(OrderStatus::Cancelled));

        assert!(serde_json::from_value::<OrderFilters>(serde_json::json!({"status": "lost"})).is_err());
    }

    #[test]
    fn test_filter_bar_notifies_on_every_change() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let mut bar = FilterBar::<CategoryFilters>::new(move |f| {
            sink.lock().unwrap().push(f.search.clone());
        });

        for partial in ["s", "sh", "sho"] {
            bar.update(|f| f.with_search(partial));
        }
        bar.update(|f| f.with_search("sho"));
        bar.reset();

        assert_eq!(*seen.lock().unwrap(), ["s", "sh", "sho", "sho", ""]);
        assert_eq!(bar.current(), &CategoryFilters::default());
    }
}
