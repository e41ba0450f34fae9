//! Command implementations.
//!
//! Every command talks to the hosted store through the same cached
//! collections the admin server uses.

pub mod catalog;
pub mod orders;
pub mod stats;

use std::sync::Arc;
use std::time::Duration;

use shopdesk_admin::config::{ConfigError, StoreConfig};
use shopdesk_admin::store::{Collections, RestStore, StoreError};
use thiserror::Error;

/// Cached reads only need to outlive one command.
const CACHE_TTL: Duration = Duration::from_secs(5);

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CommandError {
    /// Store settings are missing or invalid.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Store request failed.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// No row matched.
    #[error("Not found: {0}")]
    NotFound(String),
}

/// Build store collections from `STORE_URL` and `STORE_API_KEY`.
///
/// # Errors
///
/// Returns `CommandError::Config` for bad settings and
/// `CommandError::Store` if the HTTP client fails to build.
pub fn connect() -> Result<Collections, CommandError> {
    let config = StoreConfig::from_env()?;
    tracing::debug!(url = %config.url, "Connecting to store");
    let store = RestStore::new(&config)?;
    Ok(Collections::new(Arc::new(store), CACHE_TTL))
}
