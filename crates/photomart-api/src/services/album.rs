//! Album get-or-create

use photomart_core::models::{Album, NewAlbum};
use photomart_core::AppError;
use photomart_db::AlbumRepositoryTrait;
use rust_decimal::Decimal;
use std::sync::Arc;

use crate::auth::PhotographerContext;

/// Attributes applied only when the album has to be created.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlbumAttributes {
    pub price_per_photo: Decimal,
    pub is_private: bool,
}

#[derive(Clone)]
pub struct AlbumResolver {
    albums: Arc<dyn AlbumRepositoryTrait>,
}

impl AlbumResolver {
    pub fn new(albums: Arc<dyn AlbumRepositoryTrait>) -> Self {
        Self { albums }
    }

    /// Return the photographer's album with this title, creating it if needed.
    ///
    /// An existing album is returned unchanged; `attrs` do not overwrite it.
    #[tracing::instrument(
        skip(self, photographer, attrs),
        fields(photographer_id = %photographer.photographer_id)
    )]
    pub async fn resolve(
        &self,
        photographer: &PhotographerContext,
        title: &str,
        attrs: AlbumAttributes,
    ) -> Result<Album, AppError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(AppError::InvalidInput("Album title is required".to_string()));
        }

        let album = self
            .albums
            .find_or_create(NewAlbum {
                photographer_id: photographer.photographer_id,
                title: title.to_string(),
                is_private: attrs.is_private,
                price_per_photo: attrs.price_per_photo,
            })
            .await?;

        tracing::debug!(album_id = %album.id, "Album resolved");
        Ok(album)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use photomart_db::InMemoryStore;
    use uuid::Uuid;

    fn resolver(store: &InMemoryStore) -> AlbumResolver {
        AlbumResolver::new(Arc::new(store.clone()))
    }

    #[tokio::test]
    async fn test_same_title_resolves_to_same_album() {
        let store = InMemoryStore::new();
        let resolver = resolver(&store);
        let photographer = PhotographerContext::new(Uuid::new_v4());

        let first = resolver
            .resolve(&photographer, "Wedding", AlbumAttributes::default())
            .await
            .unwrap();
        let second = resolver
            .resolve(&photographer, "Wedding", AlbumAttributes::default())
            .await
            .unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(store.album_count(), 1);
    }

    #[tokio::test]
    async fn test_existing_album_keeps_original_attributes() {
        let store = InMemoryStore::new();
        let resolver = resolver(&store);
        let photographer = PhotographerContext::new(Uuid::new_v4());

        let created = resolver
            .resolve(
                &photographer,
                "Gala",
                AlbumAttributes {
                    price_per_photo: Decimal::new(500, 2),
                    is_private: true,
                },
            )
            .await
            .unwrap();
        let again = resolver
            .resolve(
                &photographer,
                "Gala",
                AlbumAttributes {
                    price_per_photo: Decimal::new(900, 2),
                    is_private: false,
                },
            )
            .await
            .unwrap();

        assert_eq!(again.id, created.id);
        assert_eq!(again.price_per_photo, Decimal::new(500, 2));
        assert!(again.is_private);
    }

    #[tokio::test]
    async fn test_titles_are_scoped_per_photographer() {
        let store = InMemoryStore::new();
        let resolver = resolver(&store);

        let a = resolver
            .resolve(
                &PhotographerContext::new(Uuid::new_v4()),
                "Wedding",
                AlbumAttributes::default(),
            )
            .await
            .unwrap();
        let b = resolver
            .resolve(
                &PhotographerContext::new(Uuid::new_v4()),
                "Wedding",
                AlbumAttributes::default(),
            )
            .await
            .unwrap();

        assert_ne!(a.id, b.id);
        assert_eq!(store.album_count(), 2);
    }

    #[tokio::test]
    async fn test_blank_title_is_rejected() {
        let store = InMemoryStore::new();
        let err = resolver(&store)
            .resolve(
                &PhotographerContext::new(Uuid::new_v4()),
                "   ",
                AlbumAttributes::default(),
            )
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::InvalidInput(_)));
        assert_eq!(store.album_count(), 0);
    }
}
