//! Notification composer handler.

use axum::{Json, Router, routing::post};
use tracing::instrument;

use crate::{
    error::AppError,
    notifications::{Composer, Notification, NotificationDraft},
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new().route("/api/notifications", post(send))
}

#[instrument(skip_all)]
async fn send(Json(draft): Json<NotificationDraft>) -> Result<Json<Notification>, AppError> {
    let mut composer = Composer::new(draft);
    let sent = composer.send()?.clone();
    Ok(Json(sent))
}
