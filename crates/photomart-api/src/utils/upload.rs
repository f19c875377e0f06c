//! Multipart parsing and per-file checks for the photo upload route

use axum::extract::Multipart;
use photomart_core::AppError;
use photomart_storage::normalize_content_type;
use rust_decimal::Decimal;
use std::str::FromStr;

use crate::constants::PHOTOS_FIELD;
use crate::services::upload::UploadFile;

/// Raw fields of an upload form, before interpretation.
#[derive(Debug, Default)]
pub struct UploadForm {
    pub album_title: Option<String>,
    pub price: Option<String>,
    pub is_private: Option<String>,
    pub photographer_id: Option<String>,
    pub files: Vec<UploadFile>,
}

/// Read every part of the form. File parts must use the `photos` field name;
/// unknown text fields are ignored.
pub async fn read_upload_form(mut multipart: Multipart) -> Result<UploadForm, AppError> {
    let mut form = UploadForm::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("Failed to read multipart: {}", e)))?
    {
        let field_name = field.name().map(|s| s.to_string()).unwrap_or_default();

        if field_name == PHOTOS_FIELD {
            let filename = field
                .file_name()
                .map(|s| s.to_string())
                .unwrap_or_else(|| "unknown".to_string());
            let content_type = field
                .content_type()
                .map(|s| s.to_string())
                .unwrap_or_else(|| "application/octet-stream".to_string());
            let data = field
                .bytes()
                .await
                .map_err(|e| AppError::BadRequest(format!("Failed to read file data: {}", e)))?;

            form.files.push(UploadFile {
                filename,
                content_type,
                data: data.to_vec(),
            });
            continue;
        }

        let slot = match field_name.as_str() {
            "albumTitle" => &mut form.album_title,
            "price" => &mut form.price,
            "isPrivate" => &mut form.is_private,
            "photographerId" => &mut form.photographer_id,
            _ => continue,
        };
        let value = field
            .text()
            .await
            .map_err(|e| AppError::BadRequest(format!("Failed to read field {}: {}", field_name, e)))?;
        *slot = Some(value);
    }

    Ok(form)
}

/// Prices are stored as `NUMERIC(12, 2)`.
const PRICE_SCALE: u32 = 2;
const PRICE_CEILING: i64 = 10_000_000_000;

/// Album price from the form. Missing or blank means free.
pub fn parse_price(raw: Option<&str>) -> Result<Decimal, AppError> {
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return Ok(Decimal::ZERO);
    };

    let price = Decimal::from_str(raw)
        .map_err(|_| AppError::InvalidInput(format!("Invalid price: {}", raw)))?;
    if price.is_sign_negative() {
        return Err(AppError::InvalidInput(
            "Price cannot be negative".to_string(),
        ));
    }
    if price.normalize().scale() > PRICE_SCALE {
        return Err(AppError::InvalidInput(format!(
            "Price cannot have more than {} decimal places",
            PRICE_SCALE
        )));
    }
    if price >= Decimal::from(PRICE_CEILING) {
        return Err(AppError::InvalidInput(format!(
            "Price must be below {}",
            PRICE_CEILING
        )));
    }
    Ok(price)
}

/// Only the literal `"true"` marks an album private.
pub fn parse_is_private(raw: Option<&str>) -> bool {
    raw == Some("true")
}

/// Validate file size
pub fn validate_file_size(file: &UploadFile, max_size: usize) -> Result<(), AppError> {
    if file.data.is_empty() {
        return Err(AppError::InvalidInput(format!(
            "File {} is empty",
            file.filename
        )));
    }
    if file.data.len() > max_size {
        return Err(AppError::PayloadTooLarge(format!(
            "File {} exceeds maximum allowed size of {} MB",
            file.filename,
            max_size / 1024 / 1024
        )));
    }
    Ok(())
}

/// Validate content type against the allowlist.
pub fn validate_content_type(file: &UploadFile, allowed_types: &[String]) -> Result<(), AppError> {
    let normalized = normalize_content_type(&file.content_type);
    if !allowed_types
        .iter()
        .any(|allowed| normalized == allowed.to_lowercase())
    {
        return Err(AppError::InvalidInput(format!(
            "Invalid content type for {}. Allowed types: {}",
            file.filename,
            allowed_types.join(", ")
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(content_type: &str, len: usize) -> UploadFile {
        UploadFile {
            filename: "shot.jpg".to_string(),
            content_type: content_type.to_string(),
            data: vec![0xFF; len],
        }
    }

    #[test]
    fn test_parse_price_defaults_to_zero() {
        assert_eq!(parse_price(None).unwrap(), Decimal::ZERO);
        assert_eq!(parse_price(Some("")).unwrap(), Decimal::ZERO);
    }

    #[test]
    fn test_parse_price_accepts_decimal_strings() {
        assert_eq!(parse_price(Some("12.50")).unwrap(), Decimal::new(1250, 2));
        assert_eq!(parse_price(Some(" 5 ")).unwrap(), Decimal::new(5, 0));
    }

    #[test]
    fn test_parse_price_rejects_garbage_and_negatives() {
        assert!(matches!(
            parse_price(Some("ten dollars")),
            Err(AppError::InvalidInput(_))
        ));
        assert!(matches!(
            parse_price(Some("-1")),
            Err(AppError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_parse_price_rejects_sub_cent_precision() {
        assert!(matches!(
            parse_price(Some("1.005")),
            Err(AppError::InvalidInput(_))
        ));
        assert_eq!(parse_price(Some("1.500")).unwrap(), Decimal::new(15, 1));
    }

    #[test]
    fn test_parse_price_rejects_values_beyond_column_range() {
        assert!(matches!(
            parse_price(Some("100000000000")),
            Err(AppError::InvalidInput(_))
        ));
        assert!(matches!(
            parse_price(Some("10000000000")),
            Err(AppError::InvalidInput(_))
        ));
        assert_eq!(
            parse_price(Some("9999999999.99")).unwrap(),
            Decimal::new(999_999_999_999, 2)
        );
    }

    #[test]
    fn test_parse_is_private() {
        assert!(parse_is_private(Some("true")));
        assert!(!parse_is_private(Some("TRUE")));
        assert!(!parse_is_private(Some("1")));
        assert!(!parse_is_private(None));
    }

    #[test]
    fn test_validate_file_size() {
        assert!(validate_file_size(&file("image/jpeg", 10), 10).is_ok());
        assert!(matches!(
            validate_file_size(&file("image/jpeg", 11), 10),
            Err(AppError::PayloadTooLarge(_))
        ));
        assert!(matches!(
            validate_file_size(&file("image/jpeg", 0), 10),
            Err(AppError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_validate_content_type_ignores_parameters() {
        let allowed = vec!["image/jpeg".to_string(), "image/png".to_string()];
        assert!(validate_content_type(&file("image/JPEG; charset=binary", 1), &allowed).is_ok());
        assert!(validate_content_type(&file("application/pdf", 1), &allowed).is_err());
    }
}
