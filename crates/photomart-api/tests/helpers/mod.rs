//! Test helpers: build the router over in-memory repositories and a
//! scriptable storage backend.
//!
//! Run from workspace root: `cargo test -p photomart-api --test photos_test`.
//! No database or network access is needed.

#![allow(dead_code)]

use axum_test::multipart::{MultipartForm, Part};
use axum_test::TestServer;
use photomart_api::setup::routes;
use photomart_api::state::{AppState, DbState};
use photomart_core::{Config, PlatformConfig};
use photomart_db::InMemoryStore;
use photomart_storage::{LocalStorage, MockStorage, Storage};
use std::path::Path;
use std::sync::Arc;

pub const UPLOAD_PATH: &str = "/api/photos/upload";

/// Smallest byte sequence that still starts like a JPEG.
pub const JPEG_BYTES: &[u8] = &[0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, 0x4A, 0x46, 0x49, 0x46];

/// Test application: server plus handles on the doubles behind it.
pub struct TestApp {
    pub server: TestServer,
    pub store: InMemoryStore,
    pub storage: MockStorage,
}

impl TestApp {
    pub fn client(&self) -> &TestServer {
        &self.server
    }
}

pub fn test_config() -> Config {
    let platform =
        PlatformConfig::from_vars(|_| None).expect("default configuration should be valid");
    Config(Box::new(platform))
}

pub fn setup_test_app() -> TestApp {
    setup_test_app_with_storage(MockStorage::new())
}

pub fn setup_test_app_with_storage(storage: MockStorage) -> TestApp {
    let store = InMemoryStore::new();
    let server = build_server(&store, Arc::new(storage.clone()));

    TestApp {
        server,
        store,
        storage,
    }
}

/// Server over the local filesystem backend rooted at `dir`.
pub async fn setup_local_media_app(dir: &Path) -> TestServer {
    let storage = LocalStorage::new(dir, test_config().media_base_url().to_string())
        .await
        .expect("Failed to create local storage");
    build_server(&InMemoryStore::new(), Arc::new(storage))
}

fn build_server(store: &InMemoryStore, storage: Arc<dyn Storage>) -> TestServer {
    let config = test_config();
    let db = DbState {
        albums: Arc::new(store.clone()),
        photos: Arc::new(store.clone()),
        probe: Arc::new(store.clone()),
    };
    let state = Arc::new(AppState::new(config.clone(), db, storage));

    let app = routes::setup_routes(&config, state).expect("Failed to build routes");
    TestServer::new(app.into_make_service()).expect("Failed to create test server")
}

/// Multipart form with an album title and `count` JPEG parts under `photos`.
pub fn photo_form(album_title: &str, count: usize) -> MultipartForm {
    (0..count).fold(
        MultipartForm::new().add_text("albumTitle", album_title.to_string()),
        |form, i| form.add_part("photos", jpeg_part(&format!("photo-{}.jpg", i))),
    )
}

pub fn jpeg_part(file_name: &str) -> Part {
    Part::bytes(bytes::Bytes::from_static(JPEG_BYTES))
        .file_name(file_name.to_string())
        .mime_type("image/jpeg")
}
