//! Extension to MIME type inference and text/binary classification.

/// Fallback for absent or unrecognized extensions.
pub const OCTET_STREAM: &str = "application/octet-stream";

/// Structured types that are text even though they live under `application/`.
const TEXT_APPLICATION_TYPES: &[&str] = &[
    "application/json",
    "application/xml",
    "application/javascript",
    "application/typescript",
    "application/xhtml+xml",
    "application/x-www-form-urlencoded",
];

/// Text after the last `.` of `name`, without the dot.
///
/// Only a dot at the very start of `name` (`.env`) or at its end yields no
/// extension; the key is not split on `/`, so `dir/.json` has extension `json`.
pub fn extension_of(name: &str) -> Option<&str> {
    match name.rfind('.') {
        Some(pos) if pos > 0 && pos + 1 < name.len() => Some(&name[pos + 1..]),
        _ => None,
    }
}

/// Extension usable as a local file suffix: like [`extension_of`] but never
/// spanning a `/`.
pub fn file_suffix_of(name: &str) -> Option<&str> {
    extension_of(name).filter(|ext| !ext.contains('/'))
}

/// MIME type registered for a lower-cased extension.
pub fn mime_for_extension(extension: &str) -> Option<&'static str> {
    let mime = match extension {
        // Text
        "txt" => "text/plain",
        "html" | "htm" => "text/html",
        "xml" => "text/xml",
        "csv" => "text/csv",
        "md" | "markdown" => "text/markdown",
        "json" => "application/json",
        "js" => "application/javascript",
        "ts" => "application/typescript",
        "css" => "text/css",
        "rtf" => "application/rtf",
        "yaml" | "yml" => "text/yaml",

        // Documents
        "pdf" => "application/pdf",
        "doc" => "application/msword",
        "docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        "xls" => "application/vnd.ms-excel",
        "xlsx" => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        "ppt" => "application/vnd.ms-powerpoint",
        "pptx" => "application/vnd.openxmlformats-officedocument.presentationml.presentation",
        "odt" => "application/vnd.oasis.opendocument.text",
        "ods" => "application/vnd.oasis.opendocument.spreadsheet",
        "odp" => "application/vnd.oasis.opendocument.presentation",

        // Images
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "svg" => "image/svg+xml",
        "webp" => "image/webp",
        "ico" => "image/x-icon",
        "bmp" => "image/bmp",
        "tiff" | "tif" => "image/tiff",

        // Audio
        "mp3" => "audio/mpeg",
        "wav" => "audio/wav",
        "ogg" => "audio/ogg",
        "m4a" => "audio/mp4",
        "flac" => "audio/flac",
        "aac" => "audio/aac",

        // Video
        "mp4" => "video/mp4",
        "avi" => "video/x-msvideo",
        "webm" => "video/webm",
        "mkv" => "video/x-matroska",
        "mov" => "video/quicktime",
        "wmv" => "video/x-ms-wmv",
        "flv" => "video/x-flv",

        // Archives
        "zip" => "application/zip",
        "rar" => "application/vnd.rar",
        "7z" => "application/x-7z-compressed",
        "tar" => "application/x-tar",
        "gz" => "application/gzip",

        // Fonts
        "ttf" => "font/ttf",
        "otf" => "font/otf",
        "woff" => "font/woff",
        "woff2" => "font/woff2",

        // Source code
        "java" => "text/x-java-source",
        "py" => "text/x-python",
        "cpp" => "text/x-c++src",
        "c" => "text/x-csrc",
        "cs" => "text/x-csharp",
        "php" => "application/x-php",
        "rb" => "text/x-ruby",
        "go" => "text/x-go",
        "swift" => "text/x-swift",

        // Binaries and disk images
        "exe" | "dll" => "application/x-msdownload",
        "bin" => OCTET_STREAM,
        "iso" => "application/x-iso9660-image",
        "apk" => "application/vnd.android.package-archive",
        "dmg" => "application/x-apple-diskimage",

        _ => return None,
    };
    Some(mime)
}

/// Infer a MIME type from a key or file name. Never fails; unknown types
/// fall back to [`OCTET_STREAM`].
pub fn infer_content_type(name: &str) -> &'static str {
    let content_type = extension_of(name)
        .map(str::to_ascii_lowercase)
        .and_then(|ext| mime_for_extension(&ext))
        .unwrap_or(OCTET_STREAM);

    log::debug!("Inferred content type '{}' for '{}'", content_type, name);
    content_type
}

/// Whether objects of this type can be returned inline as text.
///
/// An unknown content type is treated as binary.
pub fn is_text_like(content_type: Option<&str>) -> bool {
    let Some(content_type) = content_type else {
        return false;
    };

    let content_type = content_type.to_ascii_lowercase();
    content_type.starts_with("text/")
        || TEXT_APPLICATION_TYPES.contains(&content_type.as_str())
        || content_type.contains("+json")
        || content_type.contains("+xml")
}
