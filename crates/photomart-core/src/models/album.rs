use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// A photographer's collection of photos, unique per (photographer, title).
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct Album {
    pub id: Uuid,
    pub photographer_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub cover_image: Option<String>,
    pub event_date: Option<DateTime<Utc>>,
    pub is_private: bool,
    #[serde(skip_serializing, default)]
    pub access_code: Option<String>,
    #[schema(value_type = f64)]
    pub price_per_photo: Decimal,
    #[schema(value_type = Option<f64>)]
    pub price_full_album: Option<Decimal>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Attributes used when an album has to be created.
#[derive(Debug, Clone)]
pub struct NewAlbum {
    pub photographer_id: Uuid,
    pub title: String,
    pub is_private: bool,
    pub price_per_photo: Decimal,
}
