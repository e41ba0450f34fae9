//! Hosted record store.
//!
//! The back office talks to a DB-as-a-service over its PostgREST interface.
//! Everything above this module sees only the [`RecordStore`] trait:
//!
//! - [`rest::RestStore`] - the production client
//! - [`memory::MemoryStore`] - an in-process store for tests and local runs
//! - [`cache::Collections`] - per-table read cache sitting in front of either
//!
//! Rows cross the trait as untyped JSON objects; typed models are decoded
//! with [`decode_rows`] and encoded with [`encode_row`].

pub mod cache;
pub mod memory;
pub mod query;
pub mod rest;

pub use cache::Collections;
pub use memory::MemoryStore;
pub use query::{Direction, Predicate, Query, Table};
pub use rest::RestStore;

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

/// A single row as exchanged with the store.
pub type Row = serde_json::Map<String, serde_json::Value>;

/// Errors that can occur when talking to the record store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Store returned an error response.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// API key rejected.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Table or row not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Response or row could not be decoded.
    #[error("Parse error: {0}")]
    Parse(String),

    /// Store URL could not be built.
    #[error("Invalid store URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

/// Identifies the row(s) an update applies to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RowKey {
    pub column: &'static str,
    pub value: String,
}

impl RowKey {
    #[must_use]
    pub fn new(column: &'static str, value: impl ToString) -> Self {
        Self {
            column,
            value: value.to_string(),
        }
    }

    /// Equality predicate selecting the keyed row.
    #[must_use]
    pub fn predicate(&self) -> Predicate {
        Predicate::Equals {
            column: self.column,
            value: self.value.clone(),
        }
    }
}

/// Table-oriented access to the hosted store.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Run a select and return matching rows in query order.
    async fn select(&self, query: &Query) -> Result<Vec<Row>, StoreError>;

    /// Exact row count of a table.
    async fn count(&self, table: Table) -> Result<u64, StoreError>;

    /// Insert one row.
    async fn insert(&self, table: Table, row: Row) -> Result<(), StoreError>;

    /// Patch every row matching `key`. Returns the number of rows changed.
    async fn update(&self, table: Table, key: &RowKey, patch: Row) -> Result<usize, StoreError>;
}

/// Decode store rows into a typed model.
///
/// # Errors
///
/// Returns `StoreError::Parse` naming the first row that fails to decode.
pub fn decode_rows<T: DeserializeOwned>(rows: &[Row]) -> Result<Vec<T>, StoreError> {
    rows.iter()
        .enumerate()
        .map(|(index, row)| {
            serde_json::from_value(serde_json::Value::Object(row.clone()))
                .map_err(|e| StoreError::Parse(format!("row {index}: {e}")))
        })
        .collect()
}

/// Encode a typed value as a store row.
///
/// # Errors
///
/// Returns `StoreError::Parse` if the value does not serialize to an object.
pub fn encode_row<T: Serialize>(value: &T) -> Result<Row, StoreError> {
    match serde_json::to_value(value) {
        Ok(serde_json::Value::Object(row)) => Ok(row),
        Ok(other) => Err(StoreError::Parse(format!("expected an object, got {other}"))),
        Err(e) => Err(StoreError::Parse(e.to_string())),
    }
}
