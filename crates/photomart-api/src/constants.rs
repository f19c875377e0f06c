//! Route paths and fixed response texts.

/// Photo routes (`/api/photos`)
pub const PHOTOS_PREFIX: &str = "/api/photos";

/// Authentication mount point (`/api/auth`)
pub const AUTH_PREFIX: &str = "/api/auth";

/// Watermarked previews for backends without an image CDN
pub const MEDIA_PREFIX: &str = "/media";

/// Served OpenAPI document
pub const OPENAPI_PATH: &str = "/api/openapi.json";

/// Multipart field carrying the uploaded photos
pub const PHOTOS_FIELD: &str = "photos";

pub const ROOT_MESSAGE: &str = "Smart Photography Platform API is Running";

pub const UPLOAD_SUCCESS_MESSAGE: &str = "Upload Successful";
