//! HTTP error response conversion
//!
//! Handlers return `Result<_, HttpAppError>`. Anything that converts into
//! `AppError` can be propagated with `?` and is rendered with the status,
//! code and message its `ErrorMetadata` describes.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use photomart_core::{AppError, ErrorMetadata, LogLevel};
use photomart_storage::StorageError;
use serde::Serialize;
use utoipa::ToSchema;

/// Error body returned by every route
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Human readable summary ("Server Error" for internal failures)
    pub message: String,
    /// Underlying failure; omitted in production for sensitive errors
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_type: Option<String>,
    /// Machine-readable error code for programmatic handling
    pub code: String,
    /// Whether retrying the same request may succeed
    pub recoverable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggested_action: Option<String>,
}

impl ErrorResponse {
    fn from_app_error(error: &AppError, production: bool) -> Self {
        let details = match (production, error.is_sensitive()) {
            (true, true) => None,
            (true, false) => Some(error.to_string()),
            (false, _) => Some(error.detailed_message()),
        };

        Self {
            message: error.client_message(),
            error: details,
            error_type: (!production).then(|| error.error_type().to_string()),
            code: error.error_code().to_string(),
            recoverable: error.is_recoverable(),
            suggested_action: error.suggested_action().map(String::from),
        }
    }
}

/// `AppError` lives in photomart-core, so axum's `IntoResponse` is
/// implemented on this local wrapper instead.
#[derive(Debug)]
pub struct HttpAppError(pub AppError);

impl From<AppError> for HttpAppError {
    fn from(err: AppError) -> Self {
        HttpAppError(err)
    }
}

impl From<anyhow::Error> for HttpAppError {
    fn from(err: anyhow::Error) -> Self {
        HttpAppError(AppError::from(err))
    }
}

impl From<StorageError> for HttpAppError {
    fn from(err: StorageError) -> Self {
        HttpAppError(AppError::from(err))
    }
}

fn log_error(error: &AppError) {
    let error_type = error.error_type();
    match error.log_level() {
        LogLevel::Debug => {
            tracing::debug!(error = %error, error_type = error_type, "Request failed");
        }
        LogLevel::Warn => {
            tracing::warn!(error = %error, error_type = error_type, "Request failed");
        }
        LogLevel::Error => {
            tracing::error!(
                error = %error.detailed_message(),
                error_type = error_type,
                "Request failed"
            );
        }
    }
}

fn is_production_env() -> bool {
    std::env::var("ENVIRONMENT")
        .or_else(|_| std::env::var("APP_ENV"))
        .map(|env| matches!(env.to_lowercase().as_str(), "production" | "prod"))
        .unwrap_or(false)
}

impl IntoResponse for HttpAppError {
    fn into_response(self) -> Response {
        let app_error = &self.0;

        let status = StatusCode::from_u16(app_error.http_status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        log_error(app_error);

        let body = ErrorResponse::from_app_error(app_error, is_production_env());

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn test_from_storage_error_upload_failed() {
        let HttpAppError(app_err) = StorageError::UploadFailed("timed out".to_string()).into();
        match app_err {
            AppError::Upload(msg) => assert_eq!(msg, "timed out"),
            other => panic!("Expected Upload variant, got {:?}", other),
        }
    }

    #[test]
    fn test_from_storage_error_config() {
        let HttpAppError(app_err) =
            StorageError::ConfigError("CLOUDINARY_API_KEY not configured".to_string()).into();
        assert!(matches!(app_err, AppError::Storage(_)));
    }

    #[tokio::test]
    async fn test_validation_error_renders_400_with_message() {
        let response =
            HttpAppError(AppError::InvalidInput("No files uploaded".to_string())).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let json = body_json(response).await;
        assert_eq!(json["message"], "No files uploaded");
        assert_eq!(json["code"], "INVALID_INPUT");
        assert_eq!(json["recoverable"], false);
    }

    #[tokio::test]
    async fn test_upload_failure_renders_server_error() {
        let response =
            HttpAppError(AppError::Upload("sink unavailable".to_string())).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let json = body_json(response).await;
        assert_eq!(json["message"], "Server Error");
        assert_eq!(json["code"], "UPLOAD_FAILED");
    }

    #[tokio::test]
    async fn test_database_error_renders_server_error_with_detail() {
        let response = HttpAppError(AppError::from(sqlx::Error::PoolTimedOut)).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let json = body_json(response).await;
        assert_eq!(json["message"], "Server Error");
        assert_eq!(json["code"], "DATABASE_ERROR");
        assert!(json["error"].as_str().unwrap().starts_with("Database error"));
    }

    #[test]
    fn test_sensitive_error_hides_details_in_production() {
        let response = ErrorResponse::from_app_error(
            &AppError::Internal("connection string leaked".to_string()),
            true,
        );
        assert_eq!(response.message, "Server Error");
        assert!(response.error.is_none());
        assert!(response.error_type.is_none());
    }

    #[test]
    fn test_non_sensitive_error_keeps_summary_in_production() {
        let response =
            ErrorResponse::from_app_error(&AppError::Upload("sink timed out".to_string()), true);
        assert_eq!(response.message, "Server Error");
        assert_eq!(response.error.as_deref(), Some("Upload failed: sink timed out"));
        assert!(response.error_type.is_none());
    }

    #[test]
    fn test_error_response_shape() {
        let response = ErrorResponse::from_app_error(
            &AppError::NotImplemented("Authentication is not available".to_string()),
            false,
        );
        let json = serde_json::to_value(&response).expect("serialize");
        assert_eq!(json["message"], "Authentication is not available");
        assert_eq!(json["code"], "NOT_IMPLEMENTED");
        assert_eq!(json["error_type"], "NotImplemented");
        assert!(json["error"].as_str().is_some());
        assert!(json.get("suggested_action").is_none());
    }
}
