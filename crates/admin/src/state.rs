//! Application state shared across handlers.

use std::sync::Arc;
use std::time::Duration;

use crate::assets::{AssetUploader, HostedUploader, UploadError};
use crate::config::AdminConfig;
use crate::store::{Collections, RecordStore, RestStore, StoreError};

/// Errors building state from configuration.
#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("Failed to create store client: {0}")]
    Store(#[from] StoreError),
    #[error("Failed to create upload client: {0}")]
    Upload(#[from] UploadError),
}

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    collections: Collections,
    uploader: Arc<dyn AssetUploader>,
}

impl AppState {
    #[must_use]
    pub fn new(
        store: Arc<dyn RecordStore>,
        uploader: Arc<dyn AssetUploader>,
        cache_ttl: Duration,
    ) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                collections: Collections::new(store, cache_ttl),
                uploader,
            }),
        }
    }

    /// Build state backed by the hosted store and asset host.
    ///
    /// # Errors
    ///
    /// Returns `StateError` if either HTTP client fails to build.
    pub fn from_config(config: &AdminConfig) -> Result<Self, StateError> {
        let store = RestStore::new(&config.store)?;
        let uploader = HostedUploader::new(&config.assets)?;
        Ok(Self::new(
            Arc::new(store),
            Arc::new(uploader),
            config.cache_ttl,
        ))
    }

    #[must_use]
    pub fn collections(&self) -> &Collections {
        &self.inner.collections
    }

    #[must_use]
    pub fn uploader(&self) -> &dyn AssetUploader {
        self.inner.uploader.as_ref()
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("collections", &self.inner.collections)
            .finish_non_exhaustive()
    }
}
