//! Repository traits
//!
//! These abstract the document store so the upload workflow can run against
//! PostgreSQL in production and an in-memory store in tests.

use async_trait::async_trait;
use photomart_core::models::{Album, NewAlbum, NewOrder, NewPhoto, Order, Photo};
use photomart_core::AppError;
use uuid::Uuid;

#[async_trait]
pub trait AlbumRepositoryTrait: Send + Sync {
    /// Return the album for (photographer, title), creating it from `new_album` if absent.
    ///
    /// Atomic with respect to concurrent callers: two calls with the same key
    /// always observe the same album id.
    async fn find_or_create(&self, new_album: NewAlbum) -> Result<Album, AppError>;

    async fn get_album(&self, id: Uuid) -> Result<Option<Album>, AppError>;

    async fn find_by_title(
        &self,
        photographer_id: Uuid,
        title: &str,
    ) -> Result<Option<Album>, AppError>;
}

#[async_trait]
pub trait PhotoRepositoryTrait: Send + Sync {
    /// Insert every photo or none of them. Output order matches input order.
    async fn create_many(&self, photos: Vec<NewPhoto>) -> Result<Vec<Photo>, AppError>;

    async fn get_photo(&self, id: Uuid) -> Result<Option<Photo>, AppError>;

    /// Photos of an album in insertion order; empty for unknown albums.
    async fn list_by_album(&self, album_id: Uuid) -> Result<Vec<Photo>, AppError>;
}

#[async_trait]
pub trait OrderRepositoryTrait: Send + Sync {
    async fn create_order(&self, order: NewOrder) -> Result<Order, AppError>;

    async fn get_order(&self, id: Uuid) -> Result<Option<Order>, AppError>;

    async fn list_by_customer_email(&self, email: &str) -> Result<Vec<Order>, AppError>;
}

/// Readiness probe for the backing store
#[async_trait]
pub trait DatabaseProbe: Send + Sync {
    async fn ping(&self) -> Result<(), AppError>;
}
