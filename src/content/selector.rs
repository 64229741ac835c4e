//! Download path: decide between inline text and a local file, then move the data.

use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use super::mime::{file_suffix_of, is_text_like};
use crate::error::GatewayError;
use crate::object::models::DownloadRequest;
use crate::storage::{ObjectMetadata, ObjectStorage, StorageError};

const TEMP_FILE_PREFIX: &str = "r2download_";
const STAGING_PREFIX: &str = ".r2download_";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseMode {
    Text,
    File,
}

impl ResponseMode {
    /// Explicit override from the caller. `text` (any case) forces text,
    /// any other non-blank value forces a file.
    pub fn from_hint(hint: Option<&str>) -> Option<Self> {
        let hint = hint.map(str::trim).filter(|h| !h.is_empty())?;
        if hint.eq_ignore_ascii_case("text") {
            Some(Self::Text)
        } else {
            Some(Self::File)
        }
    }
}

/// Result of a download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DownloadOutcome {
    Text(String),
    File(PathBuf),
}

/// Pick the response mode. Precedence: hint, then explicit destination, then content type.
pub fn select_mode(
    hint: Option<&str>,
    content_type: Option<&str>,
    destination: Option<&str>,
) -> ResponseMode {
    if let Some(mode) = ResponseMode::from_hint(hint) {
        log::info!("Using forced response type: {:?}", mode);
        return mode;
    }

    let has_destination = destination.is_some_and(|d| !d.trim().is_empty());
    let mode = if is_text_like(content_type) && !has_destination {
        ResponseMode::Text
    } else {
        ResponseMode::File
    };
    log::info!("Auto-detected response mode: {:?}", mode);
    mode
}

/// Transfer the object described by `metadata` according to the selected mode.
pub async fn deliver(
    storage: &(dyn ObjectStorage + Send + Sync),
    request: &DownloadRequest,
    metadata: &ObjectMetadata,
) -> Result<DownloadOutcome, GatewayError> {
    let bucket = request.bucket_name.as_str();
    let key = request.key.as_str();

    let mode = select_mode(
        request.response_hint(),
        metadata.content_type.as_deref(),
        request.destination(),
    );

    match mode {
        ResponseMode::Text => {
            let bytes = storage.get_object(bucket, key).await.map_err(|e| {
                GatewayError::object_access(
                    bucket,
                    key,
                    format!(
                        "Error reading object from bucket '{}' with key '{}'",
                        bucket, key
                    ),
                    e,
                )
            })?;
            let text = String::from_utf8_lossy(&bytes).into_owned();
            log::info!("Object downloaded as text, size: {} characters", text.chars().count());
            Ok(DownloadOutcome::Text(text))
        }
        ResponseMode::File => {
            let staged = stage_download(key, request.destination()).await?;
            let written = storage
                .get_object_to_file(bucket, key, staged.path())
                .await
                .map_err(|e| {
                    GatewayError::object_access(
                        bucket,
                        key,
                        format!(
                            "Failed to download object from bucket '{}' with key '{}' to '{}'",
                            bucket,
                            key,
                            staged.final_path().display()
                        ),
                        e,
                    )
                })?;
            let target = staged.commit()?;
            log::info!(
                "Object downloaded successfully to file: {} ({} bytes)",
                target.display(),
                written
            );
            Ok(DownloadOutcome::File(target))
        }
    }
}

/// A file-mode download in progress.
///
/// Bytes are written to a temporary file which is removed when the value is
/// dropped, so a failed transfer leaves nothing behind. [`StagedDownload::commit`]
/// moves it to its final place.
#[derive(Debug)]
pub struct StagedDownload {
    file: NamedTempFile,
    destination: Option<PathBuf>,
}

impl StagedDownload {
    /// Where the storage backend should write the object.
    pub fn path(&self) -> &Path {
        self.file.path()
    }

    /// Path the download will have once committed.
    pub fn final_path(&self) -> &Path {
        self.destination.as_deref().unwrap_or_else(|| self.file.path())
    }

    /// Keep the downloaded file and return its absolute path.
    ///
    /// With a destination the staged file is renamed over it; otherwise the
    /// `r2download_*` temporary file itself is kept.
    pub fn commit(self) -> Result<PathBuf, GatewayError> {
        let Self { file, destination } = self;

        match destination {
            Some(destination) => {
                file.persist(&destination).map_err(|e| {
                    log::error!("Failed to save download to {}: {}", destination.display(), e.error);
                    GatewayError::storage(
                        format!("Failed to save download to '{}'", destination.display()),
                        StorageError::Io(e.error),
                    )
                })?;
                Ok(destination)
            }
            None => {
                let path = file.into_temp_path().keep().map_err(|e| {
                    log::error!("Failed to keep temporary file: {}", e.error);
                    GatewayError::storage(
                        "Failed to keep temporary file for download",
                        StorageError::Io(e.error),
                    )
                })?;
                log::info!("Kept temporary file for download: {}", path.display());
                Ok(absolute(&path))
            }
        }
    }
}

/// Prepare the local file a download is written to.
///
/// Without a destination the staging file lives in the system temp directory
/// and carries the key's extension. With one, missing parent directories are
/// created first and the staging file is placed next to the destination;
/// failing to create the directories is only logged, the staging file
/// creation then reports the error.
pub async fn stage_download(
    key: &str,
    destination: Option<&str>,
) -> Result<StagedDownload, GatewayError> {
    let destination = destination.filter(|d| !d.trim().is_empty());

    let Some(destination) = destination else {
        let suffix = file_suffix_of(key)
            .map(|ext| format!(".{}", ext))
            .unwrap_or_default();
        let file = tempfile::Builder::new()
            .prefix(TEMP_FILE_PREFIX)
            .suffix(&suffix)
            .tempfile()
            .map_err(|e| {
                log::error!("Failed to create temporary file: {}", e);
                GatewayError::storage(
                    "Failed to create temporary file for download",
                    StorageError::Io(e),
                )
            })?;
        return Ok(StagedDownload {
            file,
            destination: None,
        });
    };

    let target = absolute(Path::new(destination));
    let parent = target
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));

    if let Err(e) = tokio::fs::create_dir_all(&parent).await {
        log::warn!("Failed to create directory {}: {}", parent.display(), e);
    }

    let file = tempfile::Builder::new()
        .prefix(STAGING_PREFIX)
        .tempfile_in(&parent)
        .map_err(|e| {
            log::error!("Failed to create file in {}: {}", parent.display(), e);
            GatewayError::storage(
                format!("Failed to create file for download in '{}'", parent.display()),
                StorageError::Io(e),
            )
        })?;

    Ok(StagedDownload {
        file,
        destination: Some(target),
    })
}

fn absolute(path: &Path) -> PathBuf {
    std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf())
}
