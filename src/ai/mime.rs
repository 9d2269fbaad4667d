/// Used when an upload declares no content type and its bytes are unknown.
pub const FALLBACK_IMAGE_MIME: &str = "image/jpeg";

pub fn detect_image_mime(bytes: &[u8]) -> Option<&'static str> {
    match bytes {
        [0xFF, 0xD8, 0xFF, ..] => Some("image/jpeg"),
        [0x89, 0x50, 0x4E, 0x47, ..] => Some("image/png"),
        [0x52, 0x49, 0x46, 0x46, _, _, _, _, 0x57, 0x45, 0x42, 0x50, ..] => Some("image/webp"),
        _ => None,
    }
}

/// Pick the MIME type to forward: the declared one if present, else sniffed,
/// else [`FALLBACK_IMAGE_MIME`].
pub fn resolve_upload_mime(declared: Option<&str>, bytes: &[u8]) -> String {
    if let Some(declared) = declared.map(str::trim).filter(|d| !d.is_empty()) {
        return declared.to_string();
    }

    match detect_image_mime(bytes) {
        Some(mime) => mime.to_string(),
        None => {
            tracing::warn!(
                "Unrecognized upload format (first 4 bytes: {:02X?}), falling back to {}",
                &bytes[..bytes.len().min(4)],
                FALLBACK_IMAGE_MIME
            );
            FALLBACK_IMAGE_MIME.to_string()
        }
    }
}
