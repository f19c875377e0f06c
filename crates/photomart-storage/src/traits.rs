//! Storage abstraction trait
//!
//! This module defines the Storage trait that all storage backends must implement.

use crate::keys::generate_storage_key;
use crate::StorageBackend;
use async_trait::async_trait;
use photomart_core::AppError;
use thiserror::Error;
use uuid::Uuid;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("Download failed: {0}")]
    DownloadFailed(String),

    #[error("Delete failed: {0}")]
    DeleteFailed(String),

    #[error("File not found: {0}")]
    NotFound(String),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("Storage backend error: {0}")]
    BackendError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::UploadFailed(msg) => AppError::Upload(msg),
            StorageError::NotFound(key) => AppError::NotFound(format!("Object not found: {}", key)),
            other => AppError::Storage(other.to_string()),
        }
    }
}

/// An object accepted by a storage backend
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    /// Backend identifier used to delete the object later
    pub key: String,
    /// Durable public URL of the original asset
    pub url: String,
    /// Stored size in bytes as reported by the backend
    pub size: u64,
}

/// Storage abstraction trait
///
/// The upload workflow only ever talks to this trait, so any backend that can
/// hand back a durable URL with exactly one `/upload/` segment can serve as the
/// upload sink.
///
/// Keys are decided before any bytes are sent. A caller that gives up on an
/// upload (for example on timeout) can still delete whatever the backend wrote.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Key a photographer's file will be stored under
    fn storage_key(&self, photographer_id: Uuid, filename: &str) -> String {
        generate_storage_key(photographer_id, filename)
    }

    /// Store a file under a key obtained from `storage_key`
    async fn upload_with_key(
        &self,
        storage_key: &str,
        content_type: &str,
        data: Vec<u8>,
    ) -> StorageResult<StoredObject>;

    /// Read a stored file back
    async fn download(&self, storage_key: &str) -> StorageResult<Vec<u8>>;

    /// Delete a file by its storage key. Deleting a missing object is not an error.
    async fn delete(&self, storage_key: &str) -> StorageResult<()>;

    /// Check if a file exists
    async fn exists(&self, storage_key: &str) -> StorageResult<bool>;

    /// Get the storage backend type
    fn backend_type(&self) -> StorageBackend;
}
