use std::sync::Arc;

use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    Json,
};
use photomart_core::models::{Album, Photo};
use photomart_core::AppError;
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::auth::PhotographerContext;
use crate::constants::UPLOAD_SUCCESS_MESSAGE;
use crate::error::{ErrorResponse, HttpAppError};
use crate::services::listing::ListingService;
use crate::services::upload::{UploadRequest, UploadWorkflow};
use crate::state::AppState;
use crate::utils::upload::{parse_is_private, parse_price, read_upload_form};

#[derive(Debug, Serialize, ToSchema)]
pub struct UploadResponse {
    pub message: String,
    pub album: Album,
    pub photos: Vec<Photo>,
}

/// Upload photos into an album
///
/// Creates the album on first use of a title. All photos of the request are
/// stored or none are.
///
/// # Errors
/// - `AppError::InvalidInput` - no files, too many files, bad form values
/// - `AppError::PayloadTooLarge` - a file exceeds the size limit
/// - `AppError::Upload` - the storage backend rejected or timed out a file
/// - `AppError::Database` - album or photo persistence failed
#[utoipa::path(
    post,
    path = "/api/photos/upload",
    tag = "photos",
    request_body(content = inline(Object), content_type = "multipart/form-data",
        description = "Fields: albumTitle, price, isPrivate, photographerId; files under `photos`"),
    responses(
        (status = 201, description = "Photos uploaded", body = UploadResponse),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 413, description = "File too large", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, multipart), fields(operation = "upload_photos"))]
pub async fn upload_photos(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<UploadResponse>), HttpAppError> {
    let form = read_upload_form(multipart).await?;

    let photographer = PhotographerContext::resolve(
        form.photographer_id.as_deref(),
        state.config.default_photographer_id(),
    )?;

    let request = UploadRequest {
        album_title: form.album_title.unwrap_or_default(),
        price: parse_price(form.price.as_deref())?,
        is_private: parse_is_private(form.is_private.as_deref()),
        files: form.files,
    };

    let outcome = UploadWorkflow::from_state(&state)
        .upload(&photographer, request)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(UploadResponse {
            message: UPLOAD_SUCCESS_MESSAGE.to_string(),
            album: outcome.album,
            photos: outcome.photos,
        }),
    ))
}

/// List the photos of an album in upload order
#[utoipa::path(
    get,
    path = "/api/photos/{album_id}",
    tag = "photos",
    params(("album_id" = String, Path, description = "Album ID (UUID)")),
    responses(
        (status = 200, description = "Photos of the album", body = Vec<Photo>),
        (status = 400, description = "Malformed album id", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state))]
pub async fn list_album_photos(
    State(state): State<Arc<AppState>>,
    Path(album_id): Path<String>,
) -> Result<Json<Vec<Photo>>, HttpAppError> {
    let album_id = Uuid::parse_str(&album_id)
        .map_err(|_| AppError::InvalidInput(format!("Invalid album id: {}", album_id)))?;

    let photos = ListingService::new(state.db.photos.clone())
        .list_by_album(album_id)
        .await?;

    Ok(Json(photos))
}
