//! Preview watermark URLs.
//!
//! Delivery URLs produced by the storage backends contain exactly one
//! `/upload/` path segment. A CDN transformation directive placed right after
//! that segment makes the provider render the asset with a text overlay, so the
//! public preview never exposes the clean original. Backends without such a
//! CDN are served through the API, which resolves the same directive path.

use std::fmt;

const UPLOAD_SEGMENT: &str = "/upload/";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WatermarkError {
    #[error("asset URL must contain exactly one '/upload/' segment: {0}")]
    InvalidAssetUrl(String),
}

/// Text overlay rendered on top of preview images.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatermarkOverlay {
    pub text: String,
    pub font: String,
    pub font_size: u32,
    pub bold: bool,
    pub gravity: String,
    pub opacity: u8,
    pub angle: i32,
    pub width: u32,
}

impl Default for WatermarkOverlay {
    fn default() -> Self {
        Self {
            text: "PREVIEW".to_string(),
            font: "Arial".to_string(),
            font_size: 80,
            bold: true,
            gravity: "center".to_string(),
            opacity: 50,
            angle: -45,
            width: 1000,
        }
    }
}

impl fmt::Display for WatermarkOverlay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "l_text:{}_{}", self.font, self.font_size)?;
        if self.bold {
            f.write_str("_bold")?;
        }
        write!(
            f,
            ":{},g_{},o_{},a_{},w_{}",
            self.text, self.gravity, self.opacity, self.angle, self.width
        )
    }
}

/// Derive the public preview URL for an uploaded asset using the default overlay.
pub fn derive_watermarked_url(original: &str) -> Result<String, WatermarkError> {
    derive_with(original, &WatermarkOverlay::default())
}

/// Derive a preview URL with a custom overlay.
///
/// The overlay directive is inserted immediately after the single `/upload/`
/// segment. URLs with no such segment, or more than one, are rejected because
/// the insertion point would be ambiguous.
pub fn derive_with(original: &str, overlay: &WatermarkOverlay) -> Result<String, WatermarkError> {
    let mut parts = original.split(UPLOAD_SEGMENT);
    let (Some(prefix), Some(suffix), None) = (parts.next(), parts.next(), parts.next()) else {
        return Err(WatermarkError::InvalidAssetUrl(original.to_string()));
    };

    Ok(format!("{prefix}{UPLOAD_SEGMENT}{overlay}/{suffix}"))
}

/// Storage key behind a served preview path `upload/{directive}/{key}`.
///
/// Only the overlay's own directive resolves. A bare `upload/{key}` path names
/// the clean original and yields `None`.
pub fn preview_storage_key(path: &str, overlay: &WatermarkOverlay) -> Option<String> {
    let rest = path.trim_start_matches('/').strip_prefix("upload/")?;
    let (directive, key) = rest.split_once('/')?;
    if key.is_empty() || directive != overlay.to_string() {
        return None;
    }
    Some(format!("upload/{key}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    const CLOUDINARY_URL: &str =
        "https://res.cloudinary.com/demo/image/upload/v1700000000/smart-photo-platform/a1b2.jpg";

    #[test]
    fn test_default_overlay_directive() {
        assert_eq!(
            WatermarkOverlay::default().to_string(),
            "l_text:Arial_80_bold:PREVIEW,g_center,o_50,a_-45,w_1000"
        );
    }

    #[test]
    fn test_derive_inserts_directive_after_upload_segment() {
        let derived = derive_watermarked_url(CLOUDINARY_URL).unwrap();
        assert_eq!(
            derived,
            "https://res.cloudinary.com/demo/image/upload/l_text:Arial_80_bold:PREVIEW,g_center,o_50,a_-45,w_1000/v1700000000/smart-photo-platform/a1b2.jpg"
        );
    }

    #[test]
    fn test_derive_is_deterministic() {
        let first = derive_watermarked_url(CLOUDINARY_URL).unwrap();
        let second = derive_watermarked_url(CLOUDINARY_URL).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_derive_local_url() {
        let derived =
            derive_watermarked_url("http://localhost:5000/media/upload/owner/photo.png").unwrap();
        assert_eq!(
            derived,
            "http://localhost:5000/media/upload/l_text:Arial_80_bold:PREVIEW,g_center,o_50,a_-45,w_1000/owner/photo.png"
        );
    }

    #[test]
    fn test_missing_upload_segment_is_rejected() {
        let err = derive_watermarked_url("https://cdn.example.com/images/photo.jpg").unwrap_err();
        assert_eq!(
            err,
            WatermarkError::InvalidAssetUrl("https://cdn.example.com/images/photo.jpg".to_string())
        );
    }

    #[test]
    fn test_repeated_upload_segment_is_rejected() {
        let url = "https://cdn.example.com/upload/nested/upload/photo.jpg";
        assert!(matches!(
            derive_watermarked_url(url),
            Err(WatermarkError::InvalidAssetUrl(_))
        ));
    }

    #[test]
    fn test_preview_path_resolves_to_original_key() {
        let overlay = WatermarkOverlay::default();
        assert_eq!(
            preview_storage_key(
                "upload/l_text:Arial_80_bold:PREVIEW,g_center,o_50,a_-45,w_1000/owner/photo.png",
                &overlay
            ),
            Some("upload/owner/photo.png".to_string())
        );
    }

    #[test]
    fn test_original_path_is_not_a_preview() {
        let overlay = WatermarkOverlay::default();
        assert_eq!(preview_storage_key("upload/owner/photo.png", &overlay), None);
        assert_eq!(preview_storage_key("upload/l_text:Arial_80:SAMPLE/a.jpg", &overlay), None);
        assert_eq!(preview_storage_key("owner/photo.png", &overlay), None);
    }

    #[test]
    fn test_custom_overlay() {
        let overlay = WatermarkOverlay {
            text: "SAMPLE".to_string(),
            bold: false,
            opacity: 30,
            ..WatermarkOverlay::default()
        };
        let derived = derive_with("https://cdn.example.com/upload/x.jpg", &overlay).unwrap();
        assert_eq!(
            derived,
            "https://cdn.example.com/upload/l_text:Arial_80:SAMPLE,g_center,o_30,a_-45,w_1000/x.jpg"
        );
    }
}
