//! Cloudinary upload API backend.
//!
//! Uploads go through the signed REST endpoint as multipart forms. Requests are
//! signed with SHA-256 over the alphabetically sorted parameters followed by
//! the API secret.

use crate::traits::{Storage, StorageError, StorageResult, StoredObject};
use crate::StorageBackend;
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use sha2::{Digest, Sha256};
use uuid::Uuid;

const API_BASE_URL: &str = "https://api.cloudinary.com/v1_1";
const DELIVERY_BASE_URL: &str = "https://res.cloudinary.com";

#[derive(Debug, Deserialize)]
struct UploadResponse {
    public_id: String,
    secure_url: String,
    bytes: u64,
}

#[derive(Debug, Deserialize)]
struct DestroyResponse {
    result: String,
}

/// Cloudinary storage implementation
#[derive(Clone)]
pub struct CloudinaryStorage {
    client: Client,
    cloud_name: String,
    api_key: String,
    api_secret: String,
    folder: String,
}

impl CloudinaryStorage {
    pub fn new(
        cloud_name: String,
        api_key: String,
        api_secret: String,
        folder: String,
    ) -> StorageResult<Self> {
        let client = Client::builder()
            .build()
            .map_err(|e| StorageError::ConfigError(format!("Failed to build HTTP client: {}", e)))?;

        Ok(CloudinaryStorage {
            client,
            cloud_name,
            api_key,
            api_secret,
            folder,
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}/{}", API_BASE_URL, self.cloud_name, path)
    }

    fn sign(&self, params: &[(&str, &str)]) -> String {
        sign_params(params, &self.api_secret)
    }
}

/// Cloudinary request signature: `sha256(k1=v1&k2=v2...{secret})` over sorted, non-empty params.
fn sign_params(params: &[(&str, &str)], api_secret: &str) -> String {
    let mut sorted: Vec<&(&str, &str)> = params.iter().filter(|(_, v)| !v.is_empty()).collect();
    sorted.sort_by(|a, b| a.0.cmp(b.0));

    let to_sign = sorted
        .iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join("&");

    let mut hasher = Sha256::new();
    hasher.update(to_sign.as_bytes());
    hasher.update(api_secret.as_bytes());
    hex::encode(hasher.finalize())
}

/// Public ids carry no extension; Cloudinary appends the detected format to the delivery URL.
fn public_id_for(filename: &str) -> &str {
    filename
        .rsplit_once('.')
        .map(|(stem, _)| stem)
        .unwrap_or(filename)
}

/// Untransformed delivery URL; Cloudinary serves the stored format when no extension is given.
fn delivery_url(cloud_name: &str, public_id: &str) -> String {
    format!("{}/{}/image/upload/{}", DELIVERY_BASE_URL, cloud_name, public_id)
}

#[async_trait]
impl Storage for CloudinaryStorage {
    /// Full public id `{folder}/{photographer}/{stem}`, known before the upload.
    fn storage_key(&self, photographer_id: Uuid, filename: &str) -> String {
        format!(
            "{}/{}/{}",
            self.folder.trim_end_matches('/'),
            photographer_id,
            public_id_for(filename)
        )
    }

    async fn upload_with_key(
        &self,
        storage_key: &str,
        content_type: &str,
        data: Vec<u8>,
    ) -> StorageResult<StoredObject> {
        let start = std::time::Instant::now();
        let timestamp = chrono::Utc::now().timestamp().to_string();
        let signature = self.sign(&[
            ("public_id", storage_key),
            ("timestamp", timestamp.as_str()),
        ]);

        let file_name = storage_key
            .rsplit('/')
            .next()
            .unwrap_or(storage_key)
            .to_string();
        let part = Part::bytes(data)
            .file_name(file_name)
            .mime_str(content_type)
            .map_err(|e| StorageError::UploadFailed(format!("Invalid content type: {}", e)))?;

        let form = Form::new()
            .part("file", part)
            .text("api_key", self.api_key.clone())
            .text("timestamp", timestamp)
            .text("public_id", storage_key.to_string())
            .text("signature_algorithm", "sha256")
            .text("signature", signature);

        let response = self
            .client
            .post(self.endpoint("image/upload"))
            .multipart(form)
            .send()
            .await
            .map_err(|e| StorageError::UploadFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(
                status = %status,
                body = %body,
                cloud_name = %self.cloud_name,
                duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                "Cloudinary upload failed"
            );
            return Err(StorageError::UploadFailed(format!(
                "Cloudinary returned {}: {}",
                status, body
            )));
        }

        let uploaded: UploadResponse = response
            .json()
            .await
            .map_err(|e| StorageError::UploadFailed(format!("Invalid upload response: {}", e)))?;

        tracing::info!(
            public_id = %uploaded.public_id,
            size_bytes = uploaded.bytes,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Cloudinary upload successful"
        );

        Ok(StoredObject {
            key: uploaded.public_id,
            url: uploaded.secure_url,
            size: uploaded.bytes,
        })
    }

    async fn download(&self, storage_key: &str) -> StorageResult<Vec<u8>> {
        let url = delivery_url(&self.cloud_name, storage_key);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| StorageError::DownloadFailed(e.to_string()))?;

        match response.status() {
            status if status.is_success() => {}
            StatusCode::NOT_FOUND => return Err(StorageError::NotFound(storage_key.to_string())),
            status => {
                return Err(StorageError::DownloadFailed(format!(
                    "Cloudinary returned {}",
                    status
                )))
            }
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| StorageError::DownloadFailed(e.to_string()))?;
        Ok(bytes.to_vec())
    }

    async fn delete(&self, storage_key: &str) -> StorageResult<()> {
        let start = std::time::Instant::now();
        let timestamp = chrono::Utc::now().timestamp().to_string();
        let signature = self.sign(&[
            ("public_id", storage_key),
            ("timestamp", timestamp.as_str()),
        ]);

        let response = self
            .client
            .post(self.endpoint("image/destroy"))
            .form(&[
                ("public_id", storage_key),
                ("timestamp", timestamp.as_str()),
                ("api_key", self.api_key.as_str()),
                ("signature_algorithm", "sha256"),
                ("signature", signature.as_str()),
            ])
            .send()
            .await
            .map_err(|e| StorageError::DeleteFailed(e.to_string()))?;

        if !response.status().is_success() {
            return Err(StorageError::DeleteFailed(format!(
                "Cloudinary returned {}",
                response.status()
            )));
        }

        let destroyed: DestroyResponse = response
            .json()
            .await
            .map_err(|e| StorageError::DeleteFailed(format!("Invalid destroy response: {}", e)))?;

        match destroyed.result.as_str() {
            "ok" | "not found" => {
                tracing::info!(
                    public_id = %storage_key,
                    result = %destroyed.result,
                    duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                    "Cloudinary delete successful"
                );
                Ok(())
            }
            other => Err(StorageError::DeleteFailed(format!(
                "Cloudinary destroy result: {}",
                other
            ))),
        }
    }

    async fn exists(&self, storage_key: &str) -> StorageResult<bool> {
        let response = self
            .client
            .get(self.endpoint(&format!("resources/image/upload/{}", storage_key)))
            .basic_auth(&self.api_key, Some(&self.api_secret))
            .send()
            .await
            .map_err(|e| StorageError::BackendError(e.to_string()))?;

        match response.status() {
            status if status.is_success() => Ok(true),
            StatusCode::NOT_FOUND => Ok(false),
            status => Err(StorageError::BackendError(format!(
                "Cloudinary returned {}",
                status
            ))),
        }
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Cloudinary
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signature_sorts_params_and_appends_secret() {
        let signature = sign_params(
            &[
                ("timestamp", "1700000000"),
                ("public_id", "abc123"),
                ("folder", "smart-photo-platform"),
            ],
            "secret",
        );
        assert_eq!(
            signature,
            "acac0931ef906563465e94e68b3c07a64baad381e75f656e9fa0824fddb3fc65"
        );
    }

    #[test]
    fn test_signature_skips_empty_params() {
        let with_empty = sign_params(
            &[
                ("public_id", "smart-photo-platform/abc123"),
                ("folder", ""),
                ("timestamp", "1700000000"),
            ],
            "secret",
        );
        assert_eq!(
            with_empty,
            "47d07bc5d7c0ea4afce28797d72a0243f075a3f05a9984c19286a51e805ba682"
        );
    }

    #[test]
    fn test_public_id_strips_extension() {
        assert_eq!(public_id_for("0b9f.jpg"), "0b9f");
        assert_eq!(public_id_for("0b9f"), "0b9f");
    }

    #[test]
    fn test_storage_key_is_full_public_id() {
        let storage = CloudinaryStorage::new(
            "demo".to_string(),
            "key".to_string(),
            "secret".to_string(),
            "smart-photo-platform/".to_string(),
        )
        .unwrap();
        assert_eq!(
            storage.storage_key(Uuid::nil(), "0b9f.jpg"),
            "smart-photo-platform/00000000-0000-0000-0000-000000000000/0b9f"
        );
        assert_eq!(
            delivery_url("demo", "smart-photo-platform/p/0b9f"),
            "https://res.cloudinary.com/demo/image/upload/smart-photo-platform/p/0b9f"
        );
    }

    #[test]
    fn test_endpoint_includes_cloud_name() {
        let storage = CloudinaryStorage::new(
            "demo".to_string(),
            "key".to_string(),
            "secret".to_string(),
            "smart-photo-platform".to_string(),
        )
        .unwrap();
        assert_eq!(
            storage.endpoint("image/upload"),
            "https://api.cloudinary.com/v1_1/demo/image/upload"
        );
        assert_eq!(storage.backend_type(), StorageBackend::Cloudinary);
    }
}
