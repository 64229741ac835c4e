//! Upload path: turns a declared encoding plus a raw string payload into
//! bytes and a resolved content type.

use std::path::Path;
use std::str::FromStr;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;

use super::mime::infer_content_type;
use crate::error::GatewayError;
use crate::object::models::{non_blank, UploadRequest};

/// How the upload payload string is encoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ContentEncoding {
    /// Payload is stored verbatim as UTF-8.
    #[default]
    Text,
    /// Payload is standard base64 of the object bytes.
    Base64,
    /// Payload is a path to a local file holding the object bytes.
    Path,
}

impl ContentEncoding {
    /// Parse an optional format argument; absent or blank means [`ContentEncoding::Text`].
    pub fn from_option(value: Option<&str>) -> Result<Self, GatewayError> {
        match non_blank(value) {
            Some(value) => value.parse(),
            None => Ok(Self::Text),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Base64 => "base64",
            Self::Path => "path",
        }
    }
}

impl FromStr for ContentEncoding {
    type Err = GatewayError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "base64" => Ok(Self::Base64),
            "path" => Ok(Self::Path),
            other => Err(GatewayError::invalid(format!(
                "unsupported encoding '{}'; expected 'text', 'base64' or 'path'",
                other
            ))),
        }
    }
}

/// Bytes and content type ready for a single storage write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedPayload {
    pub bytes: Vec<u8>,
    pub content_type: String,
}

/// Validate `request` and decode its payload.
///
/// For `text` and `base64` an absent content type is inferred from the key;
/// for `path` it is inferred from the local file's own name.
pub async fn normalize(request: &UploadRequest) -> Result<NormalizedPayload, GatewayError> {
    request.validate()?;
    let encoding = ContentEncoding::from_option(request.content_format.as_deref())?;

    let content = request.content.as_deref().unwrap_or_default();
    let declared = non_blank(request.content_type.as_deref());

    let payload = match encoding {
        ContentEncoding::Text => {
            log::info!(
                "Processing as text content, size: {} characters",
                content.chars().count()
            );
            NormalizedPayload {
                bytes: content.as_bytes().to_vec(),
                content_type: resolve_for_key(declared, &request.key),
            }
        }
        ContentEncoding::Base64 => {
            let bytes = BASE64
                .decode(content)
                .map_err(|e| GatewayError::invalid(format!("invalid base64 content: {}", e)))?;
            log::info!("Decoded base64 content, size: {} bytes", bytes.len());
            NormalizedPayload {
                bytes,
                content_type: resolve_for_key(declared, &request.key),
            }
        }
        ContentEncoding::Path => read_local_file(content, declared).await?,
    };

    Ok(payload)
}

fn resolve_for_key(declared: Option<&str>, key: &str) -> String {
    match declared {
        Some(content_type) => content_type.to_string(),
        None => {
            let inferred = infer_content_type(key);
            log::info!("Content type inferred from key: {}", inferred);
            inferred.to_string()
        }
    }
}

async fn read_local_file(
    path: &str,
    declared: Option<&str>,
) -> Result<NormalizedPayload, GatewayError> {
    let metadata = match tokio::fs::metadata(path).await {
        Ok(metadata) => metadata,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(GatewayError::invalid(format!("file does not exist: {}", path)));
        }
        Err(e) => {
            return Err(GatewayError::invalid(format!(
                "cannot access file '{}': {}",
                path, e
            )));
        }
    };

    if !metadata.is_file() {
        return Err(GatewayError::invalid(format!("path is not a file: {}", path)));
    }

    let content_type = match declared {
        Some(content_type) => content_type.to_string(),
        None => {
            let file_name = Path::new(path)
                .file_name()
                .and_then(|name| name.to_str())
                .unwrap_or(path);
            let inferred = infer_content_type(file_name);
            log::info!("Content type inferred from file name '{}': {}", file_name, inferred);
            inferred.to_string()
        }
    };

    log::info!("Reading from file: {}, size: {} bytes", path, metadata.len());
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|e| GatewayError::invalid(format!("failed to read file '{}': {}", path, e)))?;

    Ok(NormalizedPayload {
        bytes,
        content_type,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(content: &str) -> UploadRequest {
        UploadRequest::new("docs", "notes/readme.txt", content)
    }

    #[test]
    fn test_encoding_parsing() {
        assert_eq!(ContentEncoding::from_option(None).unwrap(), ContentEncoding::Text);
        assert_eq!(ContentEncoding::from_option(Some("  ")).unwrap(), ContentEncoding::Text);
        assert_eq!(
            ContentEncoding::from_option(Some("BASE64")).unwrap(),
            ContentEncoding::Base64
        );
        assert_eq!(
            ContentEncoding::from_option(Some(" Path ")).unwrap(),
            ContentEncoding::Path
        );

        let err = ContentEncoding::from_option(Some("hex")).unwrap_err();
        assert!(err.is_invalid_argument());
        assert!(err.to_string().contains("unsupported encoding"));
    }

    #[tokio::test]
    async fn test_text_is_stored_verbatim_with_inferred_type() {
        let payload = normalize(&request("  hello\nworld ")).await.unwrap();
        assert_eq!(payload.bytes, b"  hello\nworld ".to_vec());
        assert_eq!(payload.content_type, "text/plain");
    }

    #[tokio::test]
    async fn test_declared_content_type_is_kept_verbatim() {
        let req = request("{}").with_content_type("Application/Custom+JSON");
        let payload = normalize(&req).await.unwrap();
        assert_eq!(payload.content_type, "Application/Custom+JSON");
    }

    #[tokio::test]
    async fn test_blank_declared_type_falls_back_to_inference() {
        let req = request("hi").with_content_type("   ");
        let payload = normalize(&req).await.unwrap();
        assert_eq!(payload.content_type, "text/plain");
    }

    #[tokio::test]
    async fn test_base64_is_decoded() {
        let req = UploadRequest::new("docs", "blob.bin", "AAEC/w==").with_format("base64");
        let payload = normalize(&req).await.unwrap();
        assert_eq!(payload.bytes, vec![0u8, 1, 2, 255]);
        assert_eq!(payload.content_type, "application/octet-stream");
    }

    #[tokio::test]
    async fn test_malformed_base64_is_rejected() {
        let req = UploadRequest::new("docs", "blob.bin", "not base64!!").with_format("base64");
        let err = normalize(&req).await.unwrap_err();
        assert!(err.is_invalid_argument());
        assert!(err.to_string().contains("invalid base64 content"));
    }

    #[tokio::test]
    async fn test_validation_order() {
        let mut req = UploadRequest::default();
        req.content_format = Some("bogus".to_string());
        let err = normalize(&req).await.unwrap_err();
        assert_eq!(err.to_string(), "invalid argument: container name required");

        req.bucket_name = "docs".to_string();
        let err = normalize(&req).await.unwrap_err();
        assert_eq!(err.to_string(), "invalid argument: key required");

        req.key = "a.txt".to_string();
        let err = normalize(&req).await.unwrap_err();
        assert_eq!(err.to_string(), "invalid argument: content required");

        req.content = Some(String::new());
        let err = normalize(&req).await.unwrap_err();
        assert!(err.to_string().contains("unsupported encoding"));
    }

    #[tokio::test]
    async fn test_empty_text_content_is_allowed() {
        let payload = normalize(&request("")).await.unwrap();
        assert!(payload.bytes.is_empty());
    }

    #[tokio::test]
    async fn test_path_infers_type_from_file_name_not_key() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("report.pdf");
        std::fs::write(&file, b"%PDF-1.7").unwrap();

        let req = UploadRequest::new("docs", "uploads/latest", file.to_str().unwrap())
            .with_format("path");
        let payload = normalize(&req).await.unwrap();

        assert_eq!(payload.bytes, b"%PDF-1.7".to_vec());
        assert_eq!(payload.content_type, "application/pdf");
    }

    #[tokio::test]
    async fn test_path_with_declared_type() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("report.pdf");
        std::fs::write(&file, b"data").unwrap();

        let req = UploadRequest::new("docs", "report.pdf", file.to_str().unwrap())
            .with_format("path")
            .with_content_type("application/x-custom");
        let payload = normalize(&req).await.unwrap();
        assert_eq!(payload.content_type, "application/x-custom");
    }

    #[tokio::test]
    async fn test_path_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.txt");
        let missing = missing.to_str().unwrap();

        let req = UploadRequest::new("docs", "nope.txt", missing).with_format("path");
        let err = normalize(&req).await.unwrap_err();
        assert!(err.is_invalid_argument());
        assert!(err.to_string().contains(missing));
    }

    #[tokio::test]
    async fn test_path_directory_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let dir_path = dir.path().to_str().unwrap();

        let req = UploadRequest::new("docs", "dir", dir_path).with_format("path");
        let err = normalize(&req).await.unwrap_err();
        assert!(err.is_invalid_argument());
        assert!(err.to_string().contains("path is not a file"));
        assert!(err.to_string().contains(dir_path));
    }
}
