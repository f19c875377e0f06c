//! Photomart persistence layer
//!
//! Repository traits for albums, photos and orders with PostgreSQL
//! implementations. The API only depends on the traits, which lets tests swap
//! in the in-memory store behind the `test-helpers` feature.

pub mod db;
#[cfg(any(test, feature = "test-helpers"))]
pub mod memory;
pub mod traits;

pub use db::{
    transaction::TransactionGuard, PostgresAlbumRepository, PostgresHealth,
    PostgresOrderRepository, PostgresPhotoRepository, MIGRATOR,
};
#[cfg(any(test, feature = "test-helpers"))]
pub use memory::InMemoryStore;
pub use traits::{
    AlbumRepositoryTrait, DatabaseProbe, OrderRepositoryTrait, PhotoRepositoryTrait,
};
