//! Photomart Core Library
//!
//! Domain models, error types, configuration and the preview watermark deriver
//! shared by every photomart crate.

pub mod config;
pub mod error;
pub mod models;
pub mod storage_types;
pub mod watermark;

pub use config::{BaseConfig, Config, PlatformConfig, UploadLimits};
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use storage_types::StorageBackend;
pub use watermark::{
    derive_watermarked_url, derive_with, preview_storage_key, WatermarkError, WatermarkOverlay,
};
