//! Content type detection from object paths.

/// Content type used when nothing better is known.
pub const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// Media formats the proxy is primarily used for.
///
/// Checked before the system registry. `.heim` is accepted as an alias of `.heic`.
const MEDIA_TYPES: &[(&str, &str)] = &[
    ("mp4", "video/mp4"),
    ("m4v", "video/mp4"),
    ("mov", "video/quicktime"),
    ("avi", "video/x-msvideo"),
    ("webm", "video/webm"),
    ("heim", "image/heic"),
    ("heic", "image/heic"),
    ("heif", "image/heif"),
    ("jpg", "image/jpeg"),
    ("jpeg", "image/jpeg"),
    ("png", "image/png"),
    ("gif", "image/gif"),
    ("webp", "image/webp"),
    ("bmp", "image/bmp"),
];

/// Returns the lowercased extension of the last path segment, without the dot.
pub fn extension(path: &str) -> Option<String> {
    let name = path.rsplit('/').next().unwrap_or(path);
    let (_, ext) = name.rsplit_once('.')?;

    if ext.is_empty() {
        return None;
    }

    Some(ext.to_ascii_lowercase())
}

/// Detects the content type of an object from its path.
///
/// Looks up the media table first, then the system extension registry, and
/// falls back to [`DEFAULT_CONTENT_TYPE`].
pub fn detect_content_type(path: &str) -> &'static str {
    let Some(ext) = extension(path) else {
        return DEFAULT_CONTENT_TYPE;
    };

    if let Some((_, content_type)) = MEDIA_TYPES.iter().find(|(known, _)| *known == ext) {
        return content_type;
    }

    mime_guess::from_ext(&ext)
        .first_raw()
        .unwrap_or(DEFAULT_CONTENT_TYPE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_of_nested_path() {
        assert_eq!(extension("a/b/photo.HEIM").as_deref(), Some("heim"));
        assert_eq!(extension("clip.mp4").as_deref(), Some("mp4"));
        assert_eq!(extension("archive.tar.gz").as_deref(), Some("gz"));
    }

    #[test]
    fn extension_ignores_directories() {
        assert_eq!(extension("dir.d/file"), None);
        assert_eq!(extension("file."), None);
        assert_eq!(extension(""), None);
    }

    #[test]
    fn media_table_wins() {
        assert_eq!(detect_content_type("a/b/photo.heim"), "image/heic");
        assert_eq!(detect_content_type("clip.mp4"), "video/mp4");
        assert_eq!(detect_content_type("CLIP.MOV"), "video/quicktime");
        assert_eq!(detect_content_type("still.heif"), "image/heif");
    }

    #[test]
    fn registry_fallback() {
        assert_eq!(detect_content_type("report.pdf"), "application/pdf");
        assert_eq!(detect_content_type("data.json"), "application/json");
    }

    #[test]
    fn unknown_extension_defaults() {
        assert_eq!(detect_content_type("blob.zzzunknown"), DEFAULT_CONTENT_TYPE);
        assert_eq!(detect_content_type("no-extension"), DEFAULT_CONTENT_TYPE);
    }
}
