//! PostgreSQL repositories
//!
//! Each repository owns a clone of the pool and implements the matching trait
//! from `crate::traits`.

mod album;
mod health;
mod order;
mod photo;
pub mod transaction;

pub use album::PostgresAlbumRepository;
pub use health::PostgresHealth;
pub use order::PostgresOrderRepository;
pub use photo::PostgresPhotoRepository;

/// Schema migrations embedded from the workspace `migrations/` directory
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("../../migrations");
