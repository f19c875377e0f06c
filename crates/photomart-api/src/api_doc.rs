//! OpenAPI documentation, served at `/api/openapi.json` and rendered under `/docs`.

use utoipa::OpenApi;

use crate::error;
use crate::handlers;
use photomart_core::models;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Smart Photography Platform API",
        version = "0.1.0",
        description = "Photographers upload photos into albums; buyers browse watermarked previews."
    ),
    paths(
        handlers::photos::upload_photos,
        handlers::photos::list_album_photos,
    ),
    components(schemas(
        models::Album,
        models::Photo,
        models::PhotoMetadata,
        handlers::photos::UploadResponse,
        error::ErrorResponse,
    )),
    tags(
        (name = "photos", description = "Photo upload and album listing")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_lists_photo_routes() {
        let spec = ApiDoc::openapi();
        assert!(spec.paths.paths.contains_key("/api/photos/upload"));
        assert!(spec.paths.paths.contains_key("/api/photos/{album_id}"));
    }
}
