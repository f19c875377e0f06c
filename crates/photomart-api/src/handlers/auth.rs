use photomart_core::AppError;

use crate::error::HttpAppError;

/// Authentication is mounted but not built yet; every route answers 501.
pub async fn not_implemented() -> HttpAppError {
    HttpAppError(AppError::NotImplemented(
        "Authentication is not available yet".to_string(),
    ))
}
