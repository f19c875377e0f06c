//! Domain route groups (photos, auth).

use crate::constants::{AUTH_PREFIX, PHOTOS_PREFIX};
use crate::handlers;
use crate::state::AppState;
use axum::routing::{any, get, post};
use axum::Router;
use std::sync::Arc;

pub fn photo_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            &format!("{}/upload", PHOTOS_PREFIX),
            post(handlers::photos::upload_photos),
        )
        .route(
            &format!("{}/{{album_id}}", PHOTOS_PREFIX),
            get(handlers::photos::list_album_photos),
        )
}

pub fn auth_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(AUTH_PREFIX, any(handlers::auth::not_implemented))
        .route(
            &format!("{}/{{*rest}}", AUTH_PREFIX),
            any(handlers::auth::not_implemented),
        )
}
