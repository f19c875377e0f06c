//! Configuration module
//!
//! Server, database, storage and upload settings, loaded from the process
//! environment (with `.env` support through `dotenvy`).

use std::env;

use uuid::Uuid;

use crate::storage_types::StorageBackend;

const DEFAULT_PORT: u16 = 5000;
const MAX_CONNECTIONS: u32 = 20;
const CONNECTION_TIMEOUT_SECS: u64 = 30;
const DEFAULT_DATABASE_URL: &str = "postgresql://localhost:5432/smart_photo_platform";
const DEFAULT_LOCAL_STORAGE_PATH: &str = "./data/media";
const DEFAULT_MEDIA_BASE_URL: &str = "http://localhost:5000/media";
const DEFAULT_CLOUDINARY_FOLDER: &str = "smart-photo-platform";
const DEFAULT_ALLOWED_CONTENT_TYPES: &str = "image/jpeg,image/png,image/webp,image/heic";
const MAX_FILE_SIZE_MB: usize = 20;
const MAX_FILES_PER_UPLOAD: usize = 50;
const UPLOAD_CONCURRENCY: usize = 4;
const UPLOAD_TIMEOUT_SECS: u64 = 60;

/// Placeholder photographer used until authentication supplies a real principal.
pub const DEFAULT_PHOTOGRAPHER_ID: Uuid = Uuid::from_u128(0x60d0_fe4f_5311);

/// Settings shared by every server process
#[derive(Clone, Debug)]
pub struct BaseConfig {
    pub server_port: u16,
    pub cors_origins: Vec<String>,
    pub db_max_connections: u32,
    pub db_timeout_seconds: u64,
    pub environment: String,
}

/// Limits applied to a single upload request
#[derive(Clone, Debug)]
pub struct UploadLimits {
    pub max_file_size_bytes: usize,
    pub max_files_per_upload: usize,
    pub allowed_content_types: Vec<String>,
    pub upload_concurrency: usize,
    pub upload_timeout_secs: u64,
}

impl Default for UploadLimits {
    fn default() -> Self {
        Self {
            max_file_size_bytes: MAX_FILE_SIZE_MB * 1024 * 1024,
            max_files_per_upload: MAX_FILES_PER_UPLOAD,
            allowed_content_types: split_list(DEFAULT_ALLOWED_CONTENT_TYPES),
            upload_concurrency: UPLOAD_CONCURRENCY,
            upload_timeout_secs: UPLOAD_TIMEOUT_SECS,
        }
    }
}

#[derive(Clone, Debug)]
pub struct PlatformConfig {
    pub base: BaseConfig,
    pub database_url: String,
    pub storage_backend: StorageBackend,
    pub s3_bucket: Option<String>,
    pub s3_region: Option<String>,
    pub s3_endpoint: Option<String>,
    pub aws_region: Option<String>,
    pub local_storage_path: String,
    /// Where the API serves media; local and S3 object URLs are built under it
    pub media_base_url: String,
    pub cloudinary_cloud_name: Option<String>,
    pub cloudinary_api_key: Option<String>,
    pub cloudinary_api_secret: Option<String>,
    pub cloudinary_folder: String,
    pub upload: UploadLimits,
    pub default_photographer_id: Uuid,
}

/// Application configuration.
#[derive(Clone, Debug)]
pub struct Config(pub Box<PlatformConfig>);

impl Config {
    fn inner(&self) -> &PlatformConfig {
        &self.0
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        is_production_environment(&self.inner().base.environment)
    }

    pub fn from_env() -> Result<Self, anyhow::Error> {
        let config = PlatformConfig::from_env()?;
        Ok(Config(Box::new(config)))
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        self.inner().validate()
    }

    pub fn server_port(&self) -> u16 {
        self.inner().base.server_port
    }

    pub fn cors_origins(&self) -> &[String] {
        &self.inner().base.cors_origins
    }

    pub fn environment(&self) -> &str {
        &self.inner().base.environment
    }

    pub fn db_max_connections(&self) -> u32 {
        self.inner().base.db_max_connections
    }

    pub fn db_timeout_seconds(&self) -> u64 {
        self.inner().base.db_timeout_seconds
    }

    pub fn database_url(&self) -> &str {
        &self.inner().database_url
    }

    pub fn storage_backend(&self) -> StorageBackend {
        self.inner().storage_backend
    }

    pub fn s3_bucket(&self) -> Option<&str> {
        self.inner().s3_bucket.as_deref()
    }

    /// S3 region, falling back to `AWS_REGION`
    pub fn s3_region(&self) -> Option<&str> {
        self.inner()
            .s3_region
            .as_deref()
            .or(self.inner().aws_region.as_deref())
    }

    pub fn s3_endpoint(&self) -> Option<&str> {
        self.inner().s3_endpoint.as_deref()
    }

    pub fn local_storage_path(&self) -> &str {
        &self.inner().local_storage_path
    }

    pub fn media_base_url(&self) -> &str {
        &self.inner().media_base_url
    }

    pub fn cloudinary_cloud_name(&self) -> Option<&str> {
        self.inner().cloudinary_cloud_name.as_deref()
    }

    pub fn cloudinary_api_key(&self) -> Option<&str> {
        self.inner().cloudinary_api_key.as_deref()
    }

    pub fn cloudinary_api_secret(&self) -> Option<&str> {
        self.inner().cloudinary_api_secret.as_deref()
    }

    pub fn cloudinary_folder(&self) -> &str {
        &self.inner().cloudinary_folder
    }

    pub fn upload_limits(&self) -> &UploadLimits {
        &self.inner().upload
    }

    pub fn default_photographer_id(&self) -> Uuid {
        self.inner().default_photographer_id
    }
}

impl PlatformConfig {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();
        Self::from_vars(|key| env::var(key).ok())
    }

    /// Build the configuration from an arbitrary variable source.
    pub fn from_vars<F>(var: F) -> Result<Self, anyhow::Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let environment = var("ENVIRONMENT")
            .or_else(|| var("APP_ENV"))
            .unwrap_or_else(|| "development".to_string());

        let cors_origins_str = var("CORS_ORIGINS").unwrap_or_else(|| "*".to_string());
        if is_production_environment(&environment) && cors_origins_str.trim() == "*" {
            return Err(anyhow::anyhow!(
                "CORS_ORIGINS cannot be '*' in production. Please specify explicit origins."
            ));
        }

        let base = BaseConfig {
            server_port: match var("PORT") {
                Some(port) => port
                    .parse()
                    .map_err(|_| anyhow::anyhow!("PORT must be a valid number"))?,
                None => DEFAULT_PORT,
            },
            cors_origins: split_list(&cors_origins_str),
            db_max_connections: parse_or(&var, "DB_MAX_CONNECTIONS", MAX_CONNECTIONS),
            db_timeout_seconds: parse_or(&var, "DB_TIMEOUT_SECONDS", CONNECTION_TIMEOUT_SECS),
            environment,
        };

        let storage_backend = match var("STORAGE_BACKEND") {
            Some(value) => value.parse()?,
            None => StorageBackend::Local,
        };

        let upload = UploadLimits {
            max_file_size_bytes: parse_or(&var, "MAX_FILE_SIZE_MB", MAX_FILE_SIZE_MB)
                .saturating_mul(1024 * 1024),
            max_files_per_upload: parse_or(&var, "MAX_FILES_PER_UPLOAD", MAX_FILES_PER_UPLOAD),
            allowed_content_types: split_list(
                &var("ALLOWED_CONTENT_TYPES")
                    .unwrap_or_else(|| DEFAULT_ALLOWED_CONTENT_TYPES.to_string()),
            )
            .into_iter()
            .map(|s| s.to_lowercase())
            .collect(),
            upload_concurrency: parse_or(&var, "UPLOAD_CONCURRENCY", UPLOAD_CONCURRENCY),
            upload_timeout_secs: parse_or(&var, "UPLOAD_TIMEOUT_SECS", UPLOAD_TIMEOUT_SECS),
        };

        let default_photographer_id = match var("DEFAULT_PHOTOGRAPHER_ID") {
            Some(id) => Uuid::parse_str(id.trim())
                .map_err(|_| anyhow::anyhow!("DEFAULT_PHOTOGRAPHER_ID must be a valid UUID"))?,
            None => DEFAULT_PHOTOGRAPHER_ID,
        };

        Ok(PlatformConfig {
            base,
            database_url: var("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string()),
            storage_backend,
            s3_bucket: var("S3_BUCKET"),
            s3_region: var("S3_REGION"),
            s3_endpoint: var("S3_ENDPOINT"),
            aws_region: var("AWS_REGION"),
            local_storage_path: var("LOCAL_STORAGE_PATH")
                .unwrap_or_else(|| DEFAULT_LOCAL_STORAGE_PATH.to_string()),
            media_base_url: var("MEDIA_BASE_URL")
                .or_else(|| var("LOCAL_STORAGE_BASE_URL"))
                .unwrap_or_else(|| DEFAULT_MEDIA_BASE_URL.to_string()),
            cloudinary_cloud_name: var("CLOUDINARY_CLOUD_NAME"),
            cloudinary_api_key: var("CLOUDINARY_API_KEY"),
            cloudinary_api_secret: var("CLOUDINARY_API_SECRET"),
            cloudinary_folder: var("CLOUDINARY_FOLDER")
                .unwrap_or_else(|| DEFAULT_CLOUDINARY_FOLDER.to_string()),
            upload,
            default_photographer_id,
        })
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if !self.database_url.starts_with("postgres://")
            && !self.database_url.starts_with("postgresql://")
        {
            return Err(anyhow::anyhow!(
                "DATABASE_URL must be a valid PostgreSQL connection string"
            ));
        }

        if self.upload.max_files_per_upload == 0 {
            return Err(anyhow::anyhow!("MAX_FILES_PER_UPLOAD must be greater than 0"));
        }

        if self.upload.upload_concurrency == 0 {
            return Err(anyhow::anyhow!("UPLOAD_CONCURRENCY must be greater than 0"));
        }

        if self.upload.max_file_size_bytes == 0 {
            return Err(anyhow::anyhow!("MAX_FILE_SIZE_MB must be greater than 0"));
        }

        if self.upload.upload_timeout_secs == 0 {
            return Err(anyhow::anyhow!("UPLOAD_TIMEOUT_SECS must be greater than 0"));
        }

        match self.storage_backend {
            StorageBackend::S3 => {
                if self.s3_bucket.is_none() {
                    return Err(anyhow::anyhow!(
                        "S3_BUCKET must be set when using S3 storage backend"
                    ));
                }
                if self.s3_region.is_none() && self.aws_region.is_none() {
                    return Err(anyhow::anyhow!(
                        "S3_REGION or AWS_REGION must be set when using S3 storage backend"
                    ));
                }
            }
            StorageBackend::Local => {
                if self.local_storage_path.trim().is_empty() {
                    return Err(anyhow::anyhow!(
                        "LOCAL_STORAGE_PATH must not be empty when using local storage backend"
                    ));
                }
            }
            StorageBackend::Cloudinary => {
                if self.cloudinary_cloud_name.is_none()
                    || self.cloudinary_api_key.is_none()
                    || self.cloudinary_api_secret.is_none()
                {
                    return Err(anyhow::anyhow!(
                        "CLOUDINARY_CLOUD_NAME, CLOUDINARY_API_KEY and CLOUDINARY_API_SECRET must be set when using Cloudinary storage backend"
                    ));
                }
            }
        }

        Ok(())
    }
}

fn is_production_environment(environment: &str) -> bool {
    let environment = environment.to_lowercase();
    environment == "production" || environment == "prod"
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

fn parse_or<F, T>(var: &F, key: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    var(key)
        .and_then(|value| value.trim().parse().ok())
        .unwrap_or(default)
}
