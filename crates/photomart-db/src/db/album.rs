use async_trait::async_trait;
use photomart_core::models::{Album, NewAlbum};
use photomart_core::AppError;
use sqlx::{FromRow, PgPool, Postgres};
use uuid::Uuid;

use crate::traits::AlbumRepositoryTrait;

const ALBUM_COLUMNS: &str = "id, photographer_id, title, description, cover_image, event_date, \
     is_private, access_code, price_per_photo, price_full_album, created_at, updated_at";

#[derive(FromRow)]
struct UpsertedAlbum {
    #[sqlx(flatten)]
    album: Album,
    inserted: bool,
}

/// Repository for albums
#[derive(Clone)]
pub struct PostgresAlbumRepository {
    pool: PgPool,
}

impl PostgresAlbumRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AlbumRepositoryTrait for PostgresAlbumRepository {
    /// Single-statement upsert on the (photographer_id, title) unique index.
    ///
    /// The no-op `DO UPDATE` makes `RETURNING` yield the existing row on
    /// conflict; `xmax = 0` tells a fresh insert apart from a hit.
    #[tracing::instrument(
        skip(self, new_album),
        fields(db.table = "albums", db.operation = "upsert", photographer_id = %new_album.photographer_id, title = %new_album.title)
    )]
    async fn find_or_create(&self, new_album: NewAlbum) -> Result<Album, AppError> {
        let upserted = sqlx::query_as::<Postgres, UpsertedAlbum>(&format!(
            r#"
            INSERT INTO albums (photographer_id, title, is_private, price_per_photo)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (photographer_id, title) DO UPDATE SET title = albums.title
            RETURNING {ALBUM_COLUMNS}, (xmax = 0) AS inserted
            "#
        ))
        .bind(new_album.photographer_id)
        .bind(&new_album.title)
        .bind(new_album.is_private)
        .bind(new_album.price_per_photo)
        .fetch_one(&self.pool)
        .await?;

        if upserted.inserted {
            tracing::info!(album_id = %upserted.album.id, "Album created");
        } else {
            tracing::debug!(album_id = %upserted.album.id, "Existing album reused");
        }

        Ok(upserted.album)
    }

    #[tracing::instrument(skip(self), fields(db.table = "albums", db.operation = "select", db.record_id = %id))]
    async fn get_album(&self, id: Uuid) -> Result<Option<Album>, AppError> {
        let album = sqlx::query_as::<Postgres, Album>(&format!(
            "SELECT {ALBUM_COLUMNS} FROM albums WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(album)
    }

    #[tracing::instrument(skip(self), fields(db.table = "albums", db.operation = "select"))]
    async fn find_by_title(
        &self,
        photographer_id: Uuid,
        title: &str,
    ) -> Result<Option<Album>, AppError> {
        let album = sqlx::query_as::<Postgres, Album>(&format!(
            "SELECT {ALBUM_COLUMNS} FROM albums WHERE photographer_id = $1 AND title = $2"
        ))
        .bind(photographer_id)
        .bind(title)
        .fetch_optional(&self.pool)
        .await?;

        Ok(album)
    }
}
