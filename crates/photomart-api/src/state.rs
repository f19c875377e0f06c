//! Application state shared by every handler.
//!
//! Repositories and the storage backend sit behind trait objects so tests can
//! build the same router over in-memory doubles.

use photomart_core::{Config, UploadLimits, WatermarkOverlay};
use photomart_db::{
    AlbumRepositoryTrait, DatabaseProbe, PhotoRepositoryTrait, PostgresAlbumRepository,
    PostgresHealth, PostgresPhotoRepository,
};
use photomart_storage::Storage;
use sqlx::PgPool;
use std::sync::Arc;

/// Repositories used by the request handlers.
#[derive(Clone)]
pub struct DbState {
    pub albums: Arc<dyn AlbumRepositoryTrait>,
    pub photos: Arc<dyn PhotoRepositoryTrait>,
    pub probe: Arc<dyn DatabaseProbe>,
}

impl DbState {
    pub fn postgres(pool: PgPool) -> Self {
        Self {
            albums: Arc::new(PostgresAlbumRepository::new(pool.clone())),
            photos: Arc::new(PostgresPhotoRepository::new(pool.clone())),
            probe: Arc::new(PostgresHealth::new(pool)),
        }
    }
}

/// Upload sink and the rules applied to incoming photos.
#[derive(Clone)]
pub struct MediaConfig {
    pub storage: Arc<dyn Storage>,
    pub limits: UploadLimits,
    pub overlay: WatermarkOverlay,
}

#[derive(Clone)]
pub struct AppState {
    pub db: DbState,
    pub media: MediaConfig,
    pub config: Config,
}

impl AppState {
    pub fn new(config: Config, db: DbState, storage: Arc<dyn Storage>) -> Self {
        let media = MediaConfig {
            storage,
            limits: config.upload_limits().clone(),
            overlay: WatermarkOverlay::default(),
        };
        Self { db, media, config }
    }
}
