//! Photomart Storage Library
//!
//! The object upload sink behind the photo upload workflow: a `Storage` trait
//! with local filesystem, S3 and Cloudinary implementations.
//!
//! # Storage key format
//!
//! Local and S3 keys are `upload/{photographer_id}/{filename}`, so every
//! delivery URL carries exactly one `/upload/` segment, which is where the
//! preview watermark directive is inserted. Cloudinary produces that segment
//! itself (`.../image/upload/...`) and uses the public id as the key.

pub mod factory;
pub(crate) mod keys;
#[cfg(feature = "storage-cloudinary")]
pub mod cloudinary;
#[cfg(feature = "storage-local")]
pub mod local;
#[cfg(feature = "storage-s3")]
pub mod s3;
#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers;
pub mod traits;

pub use factory::create_storage;
#[cfg(feature = "storage-cloudinary")]
pub use cloudinary::CloudinaryStorage;
pub use keys::{content_type_for_key, normalize_content_type, object_filename};
#[cfg(feature = "storage-local")]
pub use local::LocalStorage;
pub use photomart_core::StorageBackend;
#[cfg(feature = "storage-s3")]
pub use s3::S3Storage;
#[cfg(any(test, feature = "test-helpers"))]
pub use test_helpers::MockStorage;
pub use traits::{Storage, StorageError, StorageResult, StoredObject};
