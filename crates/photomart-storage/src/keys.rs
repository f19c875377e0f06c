//! Shared key generation for storage backends.

use uuid::Uuid;

/// Top-level prefix for uploaded photos.
pub(crate) const UPLOAD_PREFIX: &str = "upload";

/// Storage key for a photographer's file: `upload/{photographer_id}/{filename}`.
pub(crate) fn generate_storage_key(photographer_id: Uuid, filename: &str) -> String {
    format!("{}/{}/{}", UPLOAD_PREFIX, photographer_id, filename)
}

/// Bare MIME type, lowercased ("image/PNG; charset=binary" -> "image/png").
pub fn normalize_content_type(content_type: &str) -> String {
    content_type
        .split(';')
        .next()
        .unwrap_or(content_type)
        .trim()
        .to_lowercase()
}

/// Content type to serve a stored object with, from its key's extension.
pub fn content_type_for_key(storage_key: &str) -> &'static str {
    let ext = storage_key
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "webp" => "image/webp",
        "heic" => "image/heic",
        "gif" => "image/gif",
        _ => "application/octet-stream",
    }
}

/// Unique object name for an upload, keeping a recognizable image extension.
///
/// The extension comes from the content type when it is a known image type,
/// otherwise from the client filename, and is dropped when neither is usable.
pub fn object_filename(original_filename: &str, content_type: &str) -> String {
    let id = Uuid::new_v4();
    match extension_for(original_filename, content_type) {
        Some(ext) => format!("{}.{}", id, ext),
        None => id.to_string(),
    }
}

fn extension_for(original_filename: &str, content_type: &str) -> Option<String> {
    let from_content_type = match normalize_content_type(content_type).as_str() {
        "image/jpeg" | "image/jpg" => Some("jpg"),
        "image/png" => Some("png"),
        "image/webp" => Some("webp"),
        "image/heic" => Some("heic"),
        "image/gif" => Some("gif"),
        _ => None,
    };
    if let Some(ext) = from_content_type {
        return Some(ext.to_string());
    }

    original_filename
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_lowercase())
        .filter(|ext| !ext.is_empty() && ext.len() <= 5 && ext.chars().all(|c| c.is_ascii_alphanumeric()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_storage_key() {
        let id = Uuid::nil();
        assert_eq!(
            generate_storage_key(id, "a.jpg"),
            "upload/00000000-0000-0000-0000-000000000000/a.jpg"
        );
    }

    #[test]
    fn test_object_filename_uses_content_type() {
        let name = object_filename("IMG_0001.JPEG", "image/png");
        assert!(name.ends_with(".png"));
        assert!(Uuid::parse_str(name.trim_end_matches(".png")).is_ok());
    }

    #[test]
    fn test_object_filename_ignores_mime_parameters() {
        assert!(object_filename("upload", "image/PNG; charset=binary").ends_with(".png"));
    }

    #[test]
    fn test_content_type_for_key() {
        assert_eq!(content_type_for_key("upload/a/b.JPG"), "image/jpeg");
        assert_eq!(content_type_for_key("upload/a/b.webp"), "image/webp");
        assert_eq!(content_type_for_key("upload/a/b"), "application/octet-stream");
    }

    #[test]
    fn test_object_filename_falls_back_to_client_extension() {
        assert!(object_filename("scan.TIFF", "application/octet-stream").ends_with(".tiff"));
        assert!(!object_filename("../../etc/passwd", "text/plain").contains('/'));
        assert!(!object_filename("noext", "text/plain").contains('.'));
    }
}
