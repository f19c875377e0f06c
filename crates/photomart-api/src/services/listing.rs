//! Album photo listing

use photomart_core::models::Photo;
use photomart_core::AppError;
use photomart_db::PhotoRepositoryTrait;
use std::sync::Arc;
use uuid::Uuid;

#[derive(Clone)]
pub struct ListingService {
    photos: Arc<dyn PhotoRepositoryTrait>,
}

impl ListingService {
    pub fn new(photos: Arc<dyn PhotoRepositoryTrait>) -> Self {
        Self { photos }
    }

    /// Photos of an album in upload order. Unknown albums yield an empty list.
    #[tracing::instrument(skip(self))]
    pub async fn list_by_album(&self, album_id: Uuid) -> Result<Vec<Photo>, AppError> {
        let photos = self.photos.list_by_album(album_id).await?;
        tracing::debug!(count = photos.len(), "Listed album photos");
        Ok(photos)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::PhotographerContext;
    use crate::services::upload::{UploadFile, UploadRequest, UploadWorkflow};
    use photomart_core::UploadLimits;
    use photomart_db::InMemoryStore;
    use photomart_storage::MockStorage;
    use rust_decimal::Decimal;

    fn files(count: usize) -> Vec<UploadFile> {
        (0..count)
            .map(|i| UploadFile {
                filename: format!("{}.png", i),
                content_type: "image/png".to_string(),
                data: vec![0x89, 0x50, 0x4E, 0x47],
            })
            .collect()
    }

    #[tokio::test]
    async fn test_lists_only_the_albums_photos() {
        let store = InMemoryStore::new();
        let workflow = UploadWorkflow::new(
            Arc::new(store.clone()),
            Arc::new(store.clone()),
            Arc::new(MockStorage::new()),
            UploadLimits::default(),
        );
        let owner = PhotographerContext::new(Uuid::new_v4());
        let upload = |title: &str, count| UploadRequest {
            album_title: title.to_string(),
            price: Decimal::ZERO,
            is_private: false,
            files: files(count),
        };

        let beach = workflow.upload(&owner, upload("Beach", 2)).await.unwrap();
        let city = workflow.upload(&owner, upload("City", 3)).await.unwrap();

        let listing = ListingService::new(Arc::new(store.clone()));
        let beach_photos = listing.list_by_album(beach.album.id).await.unwrap();
        let city_photos = listing.list_by_album(city.album.id).await.unwrap();

        assert_eq!(beach_photos.len(), 2);
        assert_eq!(city_photos.len(), 3);
        assert!(city_photos.iter().all(|p| p.album_id == city.album.id));
        let expected: Vec<Uuid> = city.photos.iter().map(|p| p.id).collect();
        let listed: Vec<Uuid> = city_photos.iter().map(|p| p.id).collect();
        assert_eq!(listed, expected);
    }

    #[tokio::test]
    async fn test_unknown_album_is_empty() {
        let listing = ListingService::new(Arc::new(InMemoryStore::new()));
        let photos = listing.list_by_album(Uuid::new_v4()).await.unwrap();
        assert!(photos.is_empty());
    }
}
