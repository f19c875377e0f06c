use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::Album;

/// Technical details recorded for an uploaded photo.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PhotoMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    /// Size in bytes as reported by the storage backend
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct Photo {
    pub id: Uuid,
    pub album_id: Uuid,
    pub original_url: String,
    pub watermarked_url: String,
    pub thumbnail_url: Option<String>,
    #[schema(value_type = Option<f64>)]
    pub price: Option<Decimal>,
    #[cfg_attr(feature = "sqlx", sqlx(json))]
    pub metadata: PhotoMetadata,
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Photo {
    /// Price a buyer pays for this photo: its own override, else the album rate.
    pub fn effective_price(&self, album: &Album) -> Decimal {
        self.price.unwrap_or(album.price_per_photo)
    }
}

#[derive(Debug, Clone)]
pub struct NewPhoto {
    pub album_id: Uuid,
    pub original_url: String,
    pub watermarked_url: String,
    pub price: Option<Decimal>,
    pub metadata: PhotoMetadata,
    pub tags: Vec<String>,
}
