//! In-memory repositories for tests
//!
//! One `InMemoryStore` implements every repository trait over shared vectors,
//! so a test can hand the same store to the API state as albums, photos and
//! orders and then inspect what was persisted.

use async_trait::async_trait;
use chrono::Utc;
use photomart_core::models::{
    Album, NewAlbum, NewOrder, NewPhoto, Order, PaymentStatus, Photo,
};
use photomart_core::AppError;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use uuid::Uuid;

use crate::traits::{
    AlbumRepositoryTrait, DatabaseProbe, OrderRepositoryTrait, PhotoRepositoryTrait,
};

#[derive(Default)]
struct State {
    albums: Vec<Album>,
    photos: Vec<Photo>,
    orders: Vec<Order>,
}

#[derive(Clone, Default)]
pub struct InMemoryStore {
    state: Arc<Mutex<State>>,
    fail_photo_inserts: Arc<AtomicBool>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `create_many` fail as a database error would, persisting nothing.
    pub fn fail_photo_inserts(&self, fail: bool) {
        self.fail_photo_inserts.store(fail, Ordering::SeqCst);
    }

    pub fn album_count(&self) -> usize {
        self.lock().albums.len()
    }

    pub fn photo_count(&self) -> usize {
        self.lock().photos.len()
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl AlbumRepositoryTrait for InMemoryStore {
    async fn find_or_create(&self, new_album: NewAlbum) -> Result<Album, AppError> {
        let mut state = self.lock();
        if let Some(existing) = state.albums.iter().find(|album| {
            album.photographer_id == new_album.photographer_id && album.title == new_album.title
        }) {
            return Ok(existing.clone());
        }

        let now = Utc::now();
        let album = Album {
            id: Uuid::new_v4(),
            photographer_id: new_album.photographer_id,
            title: new_album.title,
            description: None,
            cover_image: None,
            event_date: None,
            is_private: new_album.is_private,
            access_code: None,
            price_per_photo: new_album.price_per_photo,
            price_full_album: None,
            created_at: now,
            updated_at: now,
        };
        state.albums.push(album.clone());
        Ok(album)
    }

    async fn get_album(&self, id: Uuid) -> Result<Option<Album>, AppError> {
        Ok(self.lock().albums.iter().find(|album| album.id == id).cloned())
    }

    async fn find_by_title(
        &self,
        photographer_id: Uuid,
        title: &str,
    ) -> Result<Option<Album>, AppError> {
        Ok(self
            .lock()
            .albums
            .iter()
            .find(|album| album.photographer_id == photographer_id && album.title == title)
            .cloned())
    }
}

#[async_trait]
impl PhotoRepositoryTrait for InMemoryStore {
    async fn create_many(&self, photos: Vec<NewPhoto>) -> Result<Vec<Photo>, AppError> {
        if self.fail_photo_inserts.load(Ordering::SeqCst) {
            return Err(AppError::Database(sqlx::Error::PoolTimedOut));
        }

        let mut state = self.lock();
        if let Some(orphan) = photos
            .iter()
            .find(|photo| !state.albums.iter().any(|album| album.id == photo.album_id))
        {
            return Err(AppError::Internal(format!(
                "photo references unknown album {}",
                orphan.album_id
            )));
        }

        let now = Utc::now();
        let created: Vec<Photo> = photos
            .into_iter()
            .map(|photo| Photo {
                id: Uuid::new_v4(),
                album_id: photo.album_id,
                original_url: photo.original_url,
                watermarked_url: photo.watermarked_url,
                thumbnail_url: None,
                price: photo.price,
                metadata: photo.metadata,
                tags: photo.tags,
                created_at: now,
                updated_at: now,
            })
            .collect();
        state.photos.extend(created.iter().cloned());
        Ok(created)
    }

    async fn get_photo(&self, id: Uuid) -> Result<Option<Photo>, AppError> {
        Ok(self.lock().photos.iter().find(|photo| photo.id == id).cloned())
    }

    async fn list_by_album(&self, album_id: Uuid) -> Result<Vec<Photo>, AppError> {
        Ok(self
            .lock()
            .photos
            .iter()
            .filter(|photo| photo.album_id == album_id)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl OrderRepositoryTrait for InMemoryStore {
    async fn create_order(&self, order: NewOrder) -> Result<Order, AppError> {
        let now = Utc::now();
        let created = Order {
            id: Uuid::new_v4(),
            customer_id: order.customer_id,
            customer_email: order.customer_email,
            items: order.items,
            total_amount: order.total_amount,
            currency: order.currency,
            payment_status: PaymentStatus::default(),
            payment_gateway_id: None,
            download_links: Vec::new(),
            created_at: now,
            updated_at: now,
        };
        self.lock().orders.push(created.clone());
        Ok(created)
    }

    async fn get_order(&self, id: Uuid) -> Result<Option<Order>, AppError> {
        Ok(self.lock().orders.iter().find(|order| order.id == id).cloned())
    }

    async fn list_by_customer_email(&self, email: &str) -> Result<Vec<Order>, AppError> {
        Ok(self
            .lock()
            .orders
            .iter()
            .filter(|order| order.customer_email == email)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl DatabaseProbe for InMemoryStore {
    async fn ping(&self) -> Result<(), AppError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use photomart_core::models::{OrderItem, PhotoMetadata};
    use rust_decimal::Decimal;

    fn new_album(photographer_id: Uuid, title: &str) -> NewAlbum {
        NewAlbum {
            photographer_id,
            title: title.to_string(),
            is_private: false,
            price_per_photo: Decimal::ZERO,
        }
    }

    fn new_photo(album_id: Uuid, n: usize) -> NewPhoto {
        NewPhoto {
            album_id,
            original_url: format!("https://cdn.example.com/upload/{}.jpg", n),
            watermarked_url: format!("https://cdn.example.com/upload/wm/{}.jpg", n),
            price: None,
            metadata: PhotoMetadata::default(),
            tags: Vec::new(),
        }
    }

    #[tokio::test]
    async fn test_find_or_create_is_keyed_by_photographer_and_title() {
        let store = InMemoryStore::new();
        let photographer = Uuid::new_v4();

        let first = store.find_or_create(new_album(photographer, "Wedding")).await.unwrap();
        let again = store.find_or_create(new_album(photographer, "Wedding")).await.unwrap();
        let other = store
            .find_or_create(new_album(Uuid::new_v4(), "Wedding"))
            .await
            .unwrap();

        assert_eq!(first.id, again.id);
        assert_ne!(first.id, other.id);
        assert_eq!(store.album_count(), 2);
    }

    #[tokio::test]
    async fn test_create_many_rejects_unknown_album_without_partial_writes() {
        let store = InMemoryStore::new();
        let album = store
            .find_or_create(new_album(Uuid::new_v4(), "Portraits"))
            .await
            .unwrap();

        let result = store
            .create_many(vec![new_photo(album.id, 1), new_photo(Uuid::new_v4(), 2)])
            .await;

        assert!(result.is_err());
        assert_eq!(store.photo_count(), 0);
    }

    #[tokio::test]
    async fn test_orders_by_email() {
        let store = InMemoryStore::new();
        let order = store
            .create_order(NewOrder::from_items(
                "buyer@example.com",
                vec![OrderItem {
                    photo_id: None,
                    price: Decimal::new(500, 2),
                }],
            ))
            .await
            .unwrap();

        assert_eq!(order.payment_status, PaymentStatus::Pending);
        assert_eq!(store.get_order(order.id).await.unwrap().unwrap().id, order.id);
        assert_eq!(
            store.list_by_customer_email("buyer@example.com").await.unwrap().len(),
            1
        );
        assert!(store
            .list_by_customer_email("other@example.com")
            .await
            .unwrap()
            .is_empty());
    }
}
