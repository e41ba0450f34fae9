//! PostgREST client for the hosted store.
//!
//! # API Reference
//!
//! - Base URL: `{STORE_URL}/rest/v1/{table}`
//! - Authentication: `apikey` header plus `Authorization: Bearer <key>`
//! - Counts: `HEAD` with `Prefer: count=exact`, total read from `Content-Range`
//! - Updates: `PATCH` with `Prefer: return=representation` so the number of
//!   affected rows is observable

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue};
use secrecy::ExposeSecret;
use serde::Deserialize;
use tracing::instrument;
use url::Url;

use super::{Query, RecordStore, Row, RowKey, StoreError, Table};
use crate::config::StoreConfig;

const REST_PATH: &str = "rest/v1";

/// Error body returned by PostgREST.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    hint: Option<String>,
}

/// REST-backed [`RecordStore`].
#[derive(Clone)]
pub struct RestStore {
    inner: Arc<RestStoreInner>,
}

struct RestStoreInner {
    client: reqwest::Client,
    base_url: String,
}

impl RestStore {
    /// Create a new store client.
    ///
    /// # Errors
    ///
    /// Returns error if the API key is not a valid header value or the HTTP
    /// client fails to build.
    pub fn new(config: &StoreConfig) -> Result<Self, StoreError> {
        let key = config.api_key.expose_secret();
        let mut headers = HeaderMap::new();

        headers.insert(
            "apikey",
            HeaderValue::from_str(key)
                .map_err(|e| StoreError::Parse(format!("Invalid API key format: {e}")))?,
        );
        headers.insert(
            "Authorization",
            HeaderValue::from_str(&format!("Bearer {key}"))
                .map_err(|e| StoreError::Parse(format!("Invalid API key format: {e}")))?,
        );
        headers.insert("Accept", HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        Ok(Self {
            inner: Arc::new(RestStoreInner {
                client,
                base_url: format!("{}/{REST_PATH}", config.url.trim_end_matches('/')),
            }),
        })
    }

    fn table_url(&self, table: Table, params: &[(String, String)]) -> Result<Url, StoreError> {
        let mut url = Url::parse(&format!("{}/{}", self.inner.base_url, table.name()))?;
        if !params.is_empty() {
            url.query_pairs_mut().extend_pairs(params);
        }
        Ok(url)
    }

    /// Handle a response carrying a JSON array of rows.
    async fn handle_rows(&self, response: reqwest::Response) -> Result<Vec<Row>, StoreError> {
        if response.status().is_success() {
            return response
                .json()
                .await
                .map_err(|e| StoreError::Parse(format!("Failed to parse response: {e}")));
        }

        Err(self.parse_error(response).await)
    }

    /// Parse an error response.
    async fn parse_error(&self, response: reqwest::Response) -> StoreError {
        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        let message = serde_json::from_str::<ErrorBody>(&body).map_or(body, |err| {
            let mut message = err.message;
            if let Some(code) = err.code {
                message = format!("{message} ({code})");
            }
            if let Some(hint) = err.hint {
                message = format!("{message}; hint: {hint}");
            }
            message
        });

        match status {
            401 | 403 => StoreError::Unauthorized(message),
            404 => StoreError::NotFound(message),
            _ => StoreError::Api { status, message },
        }
    }
}

#[async_trait]
impl RecordStore for RestStore {
    #[instrument(skip(self), fields(table = %query.table()))]
    async fn select(&self, query: &Query) -> Result<Vec<Row>, StoreError> {
        let url = self.table_url(query.table(), &query.to_params())?;
        let response = self.inner.client.get(url).send().await?;
        self.handle_rows(response).await
    }

    #[instrument(skip(self))]
    async fn count(&self, table: Table) -> Result<u64, StoreError> {
        let url = self.table_url(table, &[("select".to_string(), "*".to_string())])?;
        let response = self
            .inner
            .client
            .head(url)
            .header("Prefer", "count=exact")
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(self.parse_error(response).await);
        }

        response
            .headers()
            .get("Content-Range")
            .and_then(|v| v.to_str().ok())
            .and_then(content_range_total)
            .ok_or_else(|| StoreError::Parse(format!("missing count for {table}")))
    }

    #[instrument(skip(self, row))]
    async fn insert(&self, table: Table, row: Row) -> Result<(), StoreError> {
        let url = self.table_url(table, &[])?;
        let response = self
            .inner
            .client
            .post(url)
            .header("Prefer", "return=minimal")
            .json(&row)
            .send()
            .await?;

        if response.status().is_success() {
            return Ok(());
        }

        Err(self.parse_error(response).await)
    }

    #[instrument(skip(self, patch))]
    async fn update(&self, table: Table, key: &RowKey, patch: Row) -> Result<usize, StoreError> {
        let predicate = key.predicate();
        let params = [(key.column.to_string(), predicate.to_param_value())];
        let url = self.table_url(table, &params)?;
        let response = self
            .inner
            .client
            .patch(url)
            .header("Prefer", "return=representation")
            .json(&patch)
            .send()
            .await?;

        self.handle_rows(response).await.map(|rows| rows.len())
    }
}

impl std::fmt::Debug for RestStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RestStore")
            .field("base_url", &self.inner.base_url)
            .finish_non_exhaustive()
    }
}

/// Total from a `Content-Range` header such as `0-24/310` or `*/0`.
fn content_range_total(header: &str) -> Option<u64> {
    header.rsplit_once('/')?.1.trim().parse().ok()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use secrecy::SecretString;

    use super::*;
    use crate::store::Direction;

    fn store() -> RestStore {
        RestStore::new(&StoreConfig {
            url: "https://project.example.co/".to_string(),
            api_key: SecretString::from("anon-key-value"),
        })
        .unwrap()
    }

    #[test]
    fn test_content_range_total() {
        assert_eq!(content_range_total("0-24/310"), Some(310));
        assert_eq!(content_range_total("*/0"), Some(0));
        assert_eq!(content_range_total("0-24/*"), None);
        assert_eq!(content_range_total("garbage"), None);
    }

    #[test]
    fn test_table_url_encodes_query() {
        let query = Query::select(Table::Orders)
            .contains("product_name", "red shoe")
            .order_by("order_date", Direction::Descending);
        let url = store()
            .table_url(query.table(), &query.to_params())
            .unwrap();
        assert_eq!(url.path(), "/rest/v1/Orders");
        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert_eq!(pairs, query.to_params());
    }

    #[test]
    fn test_card_details_table_path() {
        let url = store().table_url(Table::CardDetails, &[]).unwrap();
        assert_eq!(url.as_str(), "https://project.example.co/rest/v1/Card_Details");
    }

    #[test]
    fn test_debug_hides_key() {
        let debug = format!("{:?}", store());
        assert!(!debug.contains("anon-key-value"));
    }
}
