use async_trait::async_trait;
use photomart_core::models::{NewPhoto, Photo};
use photomart_core::AppError;
use sqlx::types::Json;
use sqlx::{PgPool, Postgres};
use uuid::Uuid;

use super::transaction::TransactionGuard;
use crate::traits::PhotoRepositoryTrait;

const PHOTO_COLUMNS: &str = "id, album_id, original_url, watermarked_url, thumbnail_url, price, \
     metadata, tags, created_at, updated_at";

/// Repository for photos
#[derive(Clone)]
pub struct PostgresPhotoRepository {
    pool: PgPool,
}

impl PostgresPhotoRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PhotoRepositoryTrait for PostgresPhotoRepository {
    #[tracing::instrument(skip(self, photos), fields(db.table = "photos", db.operation = "insert", count = photos.len()))]
    async fn create_many(&self, photos: Vec<NewPhoto>) -> Result<Vec<Photo>, AppError> {
        let mut tx = TransactionGuard::begin(&self.pool).await?;
        let mut created = Vec::with_capacity(photos.len());

        for photo in photos {
            let row = sqlx::query_as::<Postgres, Photo>(&format!(
                r#"
                INSERT INTO photos (album_id, original_url, watermarked_url, price, metadata, tags)
                VALUES ($1, $2, $3, $4, $5, $6)
                RETURNING {PHOTO_COLUMNS}
                "#
            ))
            .bind(photo.album_id)
            .bind(&photo.original_url)
            .bind(&photo.watermarked_url)
            .bind(photo.price)
            .bind(Json(&photo.metadata))
            .bind(&photo.tags)
            .fetch_one(&mut **tx)
            .await?;

            created.push(row);
        }

        tx.commit().await?;

        tracing::info!(count = created.len(), "Photos persisted");
        Ok(created)
    }

    #[tracing::instrument(skip(self), fields(db.table = "photos", db.operation = "select", db.record_id = %id))]
    async fn get_photo(&self, id: Uuid) -> Result<Option<Photo>, AppError> {
        let photo = sqlx::query_as::<Postgres, Photo>(&format!(
            "SELECT {PHOTO_COLUMNS} FROM photos WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(photo)
    }

    #[tracing::instrument(skip(self), fields(db.table = "photos", db.operation = "select", album_id = %album_id))]
    async fn list_by_album(&self, album_id: Uuid) -> Result<Vec<Photo>, AppError> {
        // created_at is the transaction start for a batch; seq keeps batch order
        let photos = sqlx::query_as::<Postgres, Photo>(&format!(
            "SELECT {PHOTO_COLUMNS} FROM photos WHERE album_id = $1 ORDER BY created_at ASC, seq ASC"
        ))
        .bind(album_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(photos)
    }
}
