//! Asset upload handler.
//!
//! Accepts one multipart `file` field and forwards it to the asset host.
//! The returned URL is attached to a draft by the client on its next save.

use axum::{
    Json, Router,
    extract::{DefaultBodyLimit, Multipart, State},
    routing::post,
};
use tracing::{info, instrument};

use crate::{
    assets::{UploadFile, UploadedAsset},
    error::AppError,
    state::AppState,
};

/// Largest accepted upload.
const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/uploads", post(upload))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
}

#[instrument(skip_all)]
async fn upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadedAsset>, AppError> {
    let file = read_file_field(&mut multipart).await?;
    let file_name = file.file_name.clone();

    let asset = state.uploader().upload(file).await?;

    info!(%file_name, url = %asset.secure_url, "Asset uploaded");
    Ok(Json(asset))
}

async fn read_file_field(multipart: &mut Multipart) -> Result<UploadFile, AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("Invalid multipart body: {e}")))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let file_name = field.file_name().unwrap_or("upload").to_string();
        let content_type = field.content_type().map(str::to_owned);
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::BadRequest(format!("Failed to read file: {e}")))?;

        return Ok(UploadFile {
            file_name,
            content_type,
            bytes: bytes.to_vec(),
        });
    }

    Err(AppError::BadRequest("missing file field".to_string()))
}
