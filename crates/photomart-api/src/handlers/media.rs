//! Preview delivery for the local and S3 backends.
//!
//! Only paths carrying the overlay directive (`upload/{directive}/{key}`)
//! resolve. The clean original behind a bare `upload/{key}` path is never
//! served.

use crate::error::HttpAppError;
use crate::state::AppState;
use axum::{
    body::Body,
    extract::{Path, State},
    http::{header, StatusCode},
    response::Response,
};
use photomart_core::{preview_storage_key, AppError};
use photomart_storage::content_type_for_key;
use std::sync::Arc;

#[tracing::instrument(skip(state), fields(operation = "serve_preview"))]
pub async fn serve_preview(
    State(state): State<Arc<AppState>>,
    Path(path): Path<String>,
) -> Result<Response, HttpAppError> {
    let key = preview_storage_key(&path, &state.media.overlay)
        .ok_or_else(|| AppError::NotFound("Media not found".to_string()))?;

    let data = state.media.storage.download(&key).await?;

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, content_type_for_key(&key))
        .header(header::CACHE_CONTROL, "public, max-age=3600")
        .body(Body::from(data))
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to build response");
            HttpAppError::from(AppError::Internal(e.to_string()))
        })
}
