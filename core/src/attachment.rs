//! File naming for image parts.

/// MIME type assumed when the resolver cannot tell.
pub const DEFAULT_MIME: &str = "image/jpeg";

/// Content type sent on every image part.
pub const IMAGE_PART_CONTENT_TYPE: &str = "image/*";

/// Form field name shared by all image parts.
pub const IMAGE_PART_NAME: &str = "images";

/// Extension (with leading dot) for a MIME type. Unknown types map to `.jpg`.
pub fn extension_for(mime: &str) -> &'static str {
    match mime {
        "image/jpeg" => ".jpg",
        "image/png" => ".png",
        "image/webp" => ".webp",
        _ => ".jpg",
    }
}

/// Inverse of `extension_for`, used by resolvers that only know a path.
pub fn mime_for_extension(ext: &str) -> Option<&'static str> {
    match ext.to_ascii_lowercase().as_str() {
        "jpg" | "jpeg" => Some("image/jpeg"),
        "png" => Some("image/png"),
        "webp" => Some("image/webp"),
        _ => None,
    }
}

/// Name under which the image at `index` is uploaded.
///
/// A resolved display name that already has an extension is kept as is;
/// otherwise the extension comes from `mime`. Without a display name the
/// file is called `image_<index>`.
pub fn file_name(index: usize, display_name: Option<&str>, mime: Option<&str>) -> String {
    let ext = extension_for(mime.unwrap_or(DEFAULT_MIME));
    match display_name.filter(|n| !n.is_empty()) {
        Some(name) if name.contains('.') => name.to_string(),
        Some(name) => format!("{name}{ext}"),
        None => format!("image_{index}{ext}"),
    }
}
