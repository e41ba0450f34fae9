//! Collection query builder.
//!
//! A [`Query`] is a base select on one table plus an AND-list of
//! [`Predicate`]s, an optional ordering and an optional limit. Blank filter
//! inputs never contribute a predicate. The same value drives both the REST
//! store (rendered to PostgREST query parameters) and the in-memory store
//! (evaluated against rows), and doubles as the collection cache key.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::Row;

/// Tables exposed by the hosted store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Table {
    Categories,
    Products,
    Orders,
    Users,
    Addresses,
    CardDetails,
}

impl Table {
    pub const ALL: [Self; 6] = [
        Self::Categories,
        Self::Products,
        Self::Orders,
        Self::Users,
        Self::Addresses,
        Self::CardDetails,
    ];

    /// Table name as exposed by the REST interface.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Categories => "Categories",
            Self::Products => "Products",
            Self::Orders => "Orders",
            Self::Users => "Users",
            Self::Addresses => "Addresses",
            Self::CardDetails => "Card_Details",
        }
    }
}

impl std::fmt::Display for Table {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    #[serde(rename = "asc")]
    Ascending,
    #[serde(rename = "desc")]
    Descending,
}

impl Direction {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ascending => "asc",
            Self::Descending => "desc",
        }
    }
}

impl std::str::FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "asc" => Ok(Self::Ascending),
            "desc" => Ok(Self::Descending),
            other => Err(format!("invalid sort direction: {other}")),
        }
    }
}

/// A single filter condition on one column.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Predicate {
    /// Case-insensitive substring match.
    Contains { column: &'static str, term: String },
    /// Exact match on the column's text form.
    Equals { column: &'static str, value: String },
}

impl Predicate {
    #[must_use]
    pub const fn column(&self) -> &'static str {
        match self {
            Self::Contains { column, .. } | Self::Equals { column, .. } => column,
        }
    }

    /// PostgREST operator expression (`ilike.*term*`, `eq.value`).
    #[must_use]
    pub fn to_param_value(&self) -> String {
        match self {
            Self::Contains { term, .. } => format!("ilike.*{}*", escape_like(term)),
            Self::Equals { value, .. } => format!("eq.{value}"),
        }
    }

    /// Evaluate against a row. Null or missing columns never match.
    #[must_use]
    pub fn matches(&self, row: &Row) -> bool {
        let Some(text) = row.get(self.column()).and_then(value_text) else {
            return false;
        };
        match self {
            Self::Contains { term, .. } => text.to_lowercase().contains(&term.to_lowercase()),
            Self::Equals { value, .. } => text == *value,
        }
    }
}

/// Ordering clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OrderBy {
    pub column: &'static str,
    pub direction: Direction,
}

impl OrderBy {
    /// Compare two rows. Nulls sort last ascending and first descending.
    #[must_use]
    pub fn compare(&self, a: &Row, b: &Row) -> Ordering {
        let ascending = compare_values(a.get(self.column), b.get(self.column));
        match self.direction {
            Direction::Ascending => ascending,
            Direction::Descending => ascending.reverse(),
        }
    }
}

/// A select on one table.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Query {
    table: Table,
    columns: &'static str,
    predicates: Vec<Predicate>,
    order: Option<OrderBy>,
    limit: Option<usize>,
}

impl Query {
    /// Select every column of a table, unfiltered.
    #[must_use]
    pub const fn select(table: Table) -> Self {
        Self {
            table,
            columns: "*",
            predicates: Vec::new(),
            order: None,
            limit: None,
        }
    }

    /// Restrict (or extend, with embeds) the selected columns.
    #[must_use]
    pub const fn columns(mut self, columns: &'static str) -> Self {
        self.columns = columns;
        self
    }

    /// Add a case-insensitive substring filter unless `term` is blank.
    #[must_use]
    pub fn contains(mut self, column: &'static str, term: &str) -> Self {
        let term = term.trim();
        if !term.is_empty() {
            self.predicates.push(Predicate::Contains {
                column,
                term: term.to_owned(),
            });
        }
        self
    }

    /// Add an equality filter when a value is present.
    #[must_use]
    pub fn equals(mut self, column: &'static str, value: Option<impl ToString>) -> Self {
        if let Some(value) = value.map(|v| v.to_string())
            && !value.trim().is_empty()
        {
            self.predicates.push(Predicate::Equals {
                column,
                value: value.trim().to_owned(),
            });
        }
        self
    }

    /// Set the ordering, replacing any previous one.
    #[must_use]
    pub const fn order_by(mut self, column: &'static str, direction: Direction) -> Self {
        self.order = Some(OrderBy { column, direction });
        self
    }

    #[must_use]
    pub const fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    #[must_use]
    pub const fn table(&self) -> Table {
        self.table
    }

    #[must_use]
    pub const fn selected_columns(&self) -> &'static str {
        self.columns
    }

    #[must_use]
    pub fn predicates(&self) -> &[Predicate] {
        &self.predicates
    }

    #[must_use]
    pub const fn ordering(&self) -> Option<OrderBy> {
        self.order
    }

    #[must_use]
    pub const fn row_limit(&self) -> Option<usize> {
        self.limit
    }

    /// Render as PostgREST query parameters.
    #[must_use]
    pub fn to_params(&self) -> Vec<(String, String)> {
        let mut params = vec![("select".to_string(), self.columns.to_string())];
        params.extend(
            self.predicates
                .iter()
                .map(|p| (p.column().to_string(), p.to_param_value())),
        );
        if let Some(order) = self.order {
            params.push((
                "order".to_string(),
                format!("{}.{}", order.column, order.direction.as_str()),
            ));
        }
        if let Some(limit) = self.limit {
            params.push(("limit".to_string(), limit.to_string()));
        }
        params
    }

    /// Whether a row satisfies every predicate.
    #[must_use]
    pub fn matches(&self, row: &Row) -> bool {
        self.predicates.iter().all(|p| p.matches(row))
    }

    /// Apply predicates, ordering and limit to a set of rows.
    #[must_use]
    pub fn apply(&self, rows: &[Row]) -> Vec<Row> {
        let mut selected: Vec<Row> = rows.iter().filter(|r| self.matches(r)).cloned().collect();
        if let Some(order) = self.order {
            selected.sort_by(|a, b| order.compare(a, b));
        }
        if let Some(limit) = self.limit {
            selected.truncate(limit);
        }
        selected
    }
}

/// Text form of a scalar JSON value, as the REST interface compares it.
#[must_use]
pub fn value_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    let a = a.filter(|v| !v.is_null());
    let b = b.filter(|v| !v.is_null());
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(Value::Number(x)), Some(Value::Number(y))) => {
            let x = x.as_f64().unwrap_or(f64::NAN);
            let y = y.as_f64().unwrap_or(f64::NAN);
            x.partial_cmp(&y).unwrap_or(Ordering::Equal)
        }
        (Some(x), Some(y)) => value_text(x).cmp(&value_text(y)),
    }
}

/// Escape LIKE metacharacters; asterisks remain wildcards.
fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for ch in term.chars() {
        if matches!(ch, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    fn row(value: Value) -> Row {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_blank_filters_add_no_predicates() {
        let query = Query::select(Table::Products)
            .contains("name", "   ")
            .equals("categoryId", None::<i64>)
            .equals("status", Some(""));
        assert!(query.predicates().is_empty());
        assert_eq!(query.to_params(), vec![("select".into(), "*".into())]);
    }

    #[test]
    fn test_params_render_postgrest_operators() {
        let query = Query::select(Table::Products)
            .contains("name", "Sh")
            .equals("categoryId", Some(3))
            .order_by("price", Direction::Descending)
            .limit(4);
        assert_eq!(
            query.to_params(),
            vec![
                ("select".into(), "*".into()),
                ("name".into(), "ilike.*Sh*".into()),
                ("categoryId".into(), "eq.3".into()),
                ("order".into(), "price.desc".into()),
                ("limit".into(), "4".into()),
            ]
        );
    }

    #[test]
    fn test_like_metacharacters_are_escaped() {
        let predicate = Predicate::Contains {
            column: "name",
            term: "50%_off".into(),
        };
        assert_eq!(predicate.to_param_value(), r"ilike.*50\%\_off*");
    }

    #[test]
    fn test_contains_is_case_insensitive() {
        let query = Query::select(Table::Categories).contains("name", "sh");
        let rows = [
            row(json!({"category_id": 1, "name": "Shoes"})),
            row(json!({"category_id": 2, "name": "Bags"})),
            row(json!({"category_id": 3, "name": null})),
        ];
        let selected = query.apply(&rows);
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0]["category_id"], json!(1));
    }

    #[test]
    fn test_equals_compares_text_form() {
        let query = Query::select(Table::Products).equals("categoryId", Some("2"));
        assert!(query.matches(&row(json!({"categoryId": 2}))));
        assert!(!query.matches(&row(json!({"categoryId": 20}))));
        assert!(!query.matches(&row(json!({"categoryId": null}))));
    }

    #[test]
    fn test_ordering_puts_nulls_last_ascending() {
        let rows = [
            row(json!({"price": 30})),
            row(json!({"price": null})),
            row(json!({"price": 10.5})),
        ];
        let asc = Query::select(Table::Products)
            .order_by("price", Direction::Ascending)
            .apply(&rows);
        let prices: Vec<_> = asc.iter().map(|r| r["price"].clone()).collect();
        assert_eq!(prices, vec![json!(10.5), json!(30), Value::Null]);

        let desc = Query::select(Table::Products)
            .order_by("price", Direction::Descending)
            .apply(&rows);
        assert_eq!(desc[0]["price"], Value::Null);
        assert_eq!(desc[1]["price"], json!(30));
    }

    #[test]
    fn test_direction_parse() {
        assert_eq!("asc".parse::<Direction>().unwrap(), Direction::Ascending);
        assert!("up".parse::<Direction>().is_err());
    }
}
