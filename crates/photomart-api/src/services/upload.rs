//! Photo upload workflow
//!
//! Validates the batch, resolves the album, pushes every file to the storage
//! backend with bounded concurrency, derives the preview URLs and persists all
//! photo records in one transaction.
//!
//! A batch either lands completely or not at all. When any step fails after
//! objects were stored, those objects are deleted again on a best-effort
//! basis and no photo record is written.

use futures::stream::{self, StreamExt};
use photomart_core::models::{Album, NewPhoto, Photo, PhotoMetadata};
use photomart_core::{derive_with, AppError, UploadLimits, WatermarkOverlay};
use photomart_db::{AlbumRepositoryTrait, PhotoRepositoryTrait};
use photomart_storage::{normalize_content_type, object_filename, Storage, StoredObject};
use rust_decimal::Decimal;
use serde::Serialize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

use crate::auth::PhotographerContext;
use crate::services::album::{AlbumAttributes, AlbumResolver};
use crate::state::AppState;
use crate::utils::upload::{validate_content_type, validate_file_size};

/// One file part of an upload request.
#[derive(Debug, Clone)]
pub struct UploadFile {
    pub filename: String,
    pub content_type: String,
    pub data: Vec<u8>,
}

#[derive(Debug, Clone)]
pub struct UploadRequest {
    pub album_title: String,
    /// Album-level price, applied to every photo of the batch
    pub price: Decimal,
    pub is_private: bool,
    pub files: Vec<UploadFile>,
}

/// The resolved album and the photos created, in request order.
#[derive(Debug, Clone, Serialize)]
pub struct UploadOutcome {
    pub album: Album,
    pub photos: Vec<Photo>,
}

pub struct UploadWorkflow {
    albums: AlbumResolver,
    photos: Arc<dyn PhotoRepositoryTrait>,
    storage: Arc<dyn Storage>,
    limits: UploadLimits,
    overlay: WatermarkOverlay,
}

impl UploadWorkflow {
    pub fn new(
        albums: Arc<dyn AlbumRepositoryTrait>,
        photos: Arc<dyn PhotoRepositoryTrait>,
        storage: Arc<dyn Storage>,
        limits: UploadLimits,
    ) -> Self {
        Self {
            albums: AlbumResolver::new(albums),
            photos,
            storage,
            limits,
            overlay: WatermarkOverlay::default(),
        }
    }

    pub fn from_state(state: &AppState) -> Self {
        Self::new(
            state.db.albums.clone(),
            state.db.photos.clone(),
            state.media.storage.clone(),
            state.media.limits.clone(),
        )
        .with_overlay(state.media.overlay.clone())
    }

    pub fn with_overlay(mut self, overlay: WatermarkOverlay) -> Self {
        self.overlay = overlay;
        self
    }

    #[tracing::instrument(
        skip(self, photographer, request),
        fields(
            photographer_id = %photographer.photographer_id,
            album_title = %request.album_title,
            file_count = request.files.len(),
        )
    )]
    pub async fn upload(
        &self,
        photographer: &PhotographerContext,
        request: UploadRequest,
    ) -> Result<UploadOutcome, AppError> {
        self.validate(&request.files)?;

        let album = self
            .albums
            .resolve(
                photographer,
                &request.album_title,
                AlbumAttributes {
                    price_per_photo: request.price,
                    is_private: request.is_private,
                },
            )
            .await?;

        let stored = self
            .store_all(photographer.photographer_id, request.files)
            .await?;

        let new_photos = match self.build_photos(&album, request.price, &stored) {
            Ok(photos) => photos,
            Err(err) => {
                self.discard(&stored).await;
                return Err(err);
            }
        };

        let photos = match self.photos.create_many(new_photos).await {
            Ok(photos) => photos,
            Err(err) => {
                self.discard(&stored).await;
                return Err(err);
            }
        };

        tracing::info!(
            album_id = %album.id,
            photo_count = photos.len(),
            "Photos uploaded"
        );

        Ok(UploadOutcome { album, photos })
    }

    fn validate(&self, files: &[UploadFile]) -> Result<(), AppError> {
        if files.is_empty() {
            return Err(AppError::InvalidInput("No files uploaded".to_string()));
        }
        if files.len() > self.limits.max_files_per_upload {
            return Err(AppError::InvalidInput(format!(
                "Too many files: at most {} photos per upload",
                self.limits.max_files_per_upload
            )));
        }
        for file in files {
            validate_file_size(file, self.limits.max_file_size_bytes)?;
            validate_content_type(file, &self.limits.allowed_content_types)?;
        }
        Ok(())
    }

    /// Store every file, preserving request order in the result.
    ///
    /// After the first failure no further upload is started; the ones already
    /// in flight are awaited so that everything stored can be discarded.
    async fn store_all(
        &self,
        photographer_id: Uuid,
        files: Vec<UploadFile>,
    ) -> Result<Vec<StoredObject>, AppError> {
        let total = files.len();
        let aborted = AtomicBool::new(false);
        let aborted = &aborted;

        let results: Vec<Result<Option<StoredObject>, AppError>> = stream::iter(files)
            .map(|file| async move {
                if aborted.load(Ordering::SeqCst) {
                    return Ok(None);
                }
                let result = self.store_one(photographer_id, file).await;
                if result.is_err() {
                    aborted.store(true, Ordering::SeqCst);
                }
                result.map(Some)
            })
            .buffered(self.limits.upload_concurrency.max(1))
            .collect()
            .await;

        let mut stored = Vec::with_capacity(total);
        let mut failure = None;
        for result in results {
            match result {
                Ok(Some(object)) => stored.push(object),
                Ok(None) => {}
                Err(err) => {
                    failure.get_or_insert(err);
                }
            }
        }

        if let Some(err) = failure {
            tracing::warn!(
                stored = stored.len(),
                total,
                "Upload batch aborted, discarding stored objects"
            );
            self.discard(&stored).await;
            return Err(err);
        }

        Ok(stored)
    }

    /// Upload one file under a key chosen up front.
    ///
    /// A failed or timed-out upload may still have left bytes behind, so its
    /// key is deleted before the error is returned.
    async fn store_one(
        &self,
        photographer_id: Uuid,
        file: UploadFile,
    ) -> Result<StoredObject, AppError> {
        let content_type = normalize_content_type(&file.content_type);
        let filename = object_filename(&file.filename, &content_type);
        let key = self.storage.storage_key(photographer_id, &filename);
        let timeout = Duration::from_secs(self.limits.upload_timeout_secs);
        let size = file.data.len();

        let upload = self.storage.upload_with_key(&key, &content_type, file.data);

        let failure = match tokio::time::timeout(timeout, upload).await {
            Ok(Ok(object)) => {
                tracing::debug!(key = %object.key, size, original = %file.filename, "Photo stored");
                return Ok(object);
            }
            Ok(Err(e)) => {
                tracing::error!(error = %e, key = %key, original = %file.filename, "Photo upload failed");
                AppError::Upload(format!("{}: {}", file.filename, e))
            }
            Err(_) => {
                tracing::error!(
                    key = %key,
                    original = %file.filename,
                    timeout_secs = self.limits.upload_timeout_secs,
                    "Photo upload timed out"
                );
                AppError::Upload(format!(
                    "{}: upload timed out after {}s",
                    file.filename, self.limits.upload_timeout_secs
                ))
            }
        };

        self.delete_key(&key).await;
        Err(failure)
    }

    fn build_photos(
        &self,
        album: &Album,
        price: Decimal,
        stored: &[StoredObject],
    ) -> Result<Vec<NewPhoto>, AppError> {
        stored
            .iter()
            .map(|object| {
                let watermarked_url = derive_with(&object.url, &self.overlay)?;
                Ok(NewPhoto {
                    album_id: album.id,
                    original_url: object.url.clone(),
                    watermarked_url,
                    price: Some(price),
                    metadata: PhotoMetadata {
                        size: Some(object.size),
                        ..PhotoMetadata::default()
                    },
                    tags: Vec::new(),
                })
            })
            .collect()
    }

    /// Best-effort removal of objects belonging to an aborted batch.
    async fn discard(&self, stored: &[StoredObject]) {
        for object in stored {
            self.delete_key(&object.key).await;
        }
    }

    async fn delete_key(&self, key: &str) {
        if let Err(e) = self.storage.delete(key).await {
            tracing::warn!(key = %key, error = %e, "Failed to delete object of aborted upload");
        }
    }
}
