//! Image uploads to the external asset host.
//!
//! Product images and category icons are stored as public URLs. Files are
//! posted as `multipart/form-data` with an unsigned upload preset, and the
//! host answers with the asset's `secure_url`.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, instrument};

use crate::config::AssetConfig;

/// Errors that can occur while uploading an asset.
#[derive(Debug, Error)]
pub enum UploadError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Asset host refused the upload.
    #[error("Upload rejected: {status} - {message}")]
    Rejected { status: u16, message: String },

    /// Upload succeeded but no URL came back.
    #[error("Upload response did not include a URL")]
    MissingUrl,

    /// Nothing to upload.
    #[error("Upload file is empty")]
    Empty,
}

/// A file picked for upload.
#[derive(Debug, Clone)]
pub struct UploadFile {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

/// A stored asset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadedAsset {
    pub secure_url: String,
}

/// Something that turns files into public URLs.
#[async_trait]
pub trait AssetUploader: Send + Sync {
    async fn upload(&self, file: UploadFile) -> Result<UploadedAsset, UploadError>;
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    #[serde(default)]
    secure_url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct UploadErrorBody {
    error: UploadErrorDetail,
}

#[derive(Debug, Deserialize)]
struct UploadErrorDetail {
    message: String,
}

/// Asset host client.
#[derive(Clone)]
pub struct HostedUploader {
    inner: Arc<HostedUploaderInner>,
}

struct HostedUploaderInner {
    client: reqwest::Client,
    upload_url: String,
    upload_preset: String,
}

impl HostedUploader {
    /// Create a new uploader.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(config: &AssetConfig) -> Result<Self, UploadError> {
        let client = reqwest::Client::builder().build()?;

        Ok(Self {
            inner: Arc::new(HostedUploaderInner {
                client,
                upload_url: config.upload_url(),
                upload_preset: config.upload_preset.clone(),
            }),
        })
    }

    async fn parse_error(response: reqwest::Response) -> UploadError {
        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        let message = serde_json::from_str::<UploadErrorBody>(&body)
            .map_or(body, |parsed| parsed.error.message);

        UploadError::Rejected { status, message }
    }
}

#[async_trait]
impl AssetUploader for HostedUploader {
    #[instrument(skip(self, file), fields(file_name = %file.file_name, size = file.bytes.len()))]
    async fn upload(&self, file: UploadFile) -> Result<UploadedAsset, UploadError> {
        if file.bytes.is_empty() {
            return Err(UploadError::Empty);
        }

        let mut part = Part::bytes(file.bytes).file_name(file.file_name);
        if let Some(content_type) = file.content_type.as_deref() {
            part = part.mime_str(content_type)?;
        }
        let form = Form::new()
            .part("file", part)
            .text("upload_preset", self.inner.upload_preset.clone());

        let response = self
            .inner
            .client
            .post(&self.inner.upload_url)
            .multipart(form)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::parse_error(response).await);
        }

        let body: UploadResponse = response.json().await?;
        let secure_url = body
            .secure_url
            .filter(|url| !url.trim().is_empty())
            .ok_or(UploadError::MissingUrl)?;

        info!(url = %secure_url, "Asset uploaded");
        Ok(UploadedAsset { secure_url })
    }
}

impl std::fmt::Debug for HostedUploader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HostedUploader")
            .field("upload_url", &self.inner.upload_url)
            .finish_non_exhaustive()
    }
}
