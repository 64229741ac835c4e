//! Object tool operations: upload, download, metadata, listing and deletion.

use std::collections::BTreeMap;

use log::{error, info};

use crate::content::{deliver, normalize, DownloadOutcome};
use crate::error::GatewayError;
use crate::object::models::{require_bucket_name, require_key, DownloadRequest, UploadRequest};
use crate::storage::ObjectSummary;
use crate::AppState;

/// Upload an object. The payload is decoded according to `content_format`
/// and stored with the declared or inferred content type.
pub async fn upload_object(state: &AppState, request: UploadRequest) -> Result<String, GatewayError> {
    info!(
        "Uploading object to bucket: {} with key: {}, contentFormat: {:?}",
        request.bucket_name, request.key, request.content_format
    );

    let payload = normalize(&request).await?;
    let bucket = request.bucket_name.as_str();
    let key = request.key.as_str();

    let e_tag = state
        .storage
        .put_object(bucket, key, &payload.bytes, &payload.content_type)
        .await
        .map_err(|e| {
            error!(
                "Failed to upload object to bucket '{}' with key '{}': {}",
                bucket, key, e
            );
            GatewayError::storage(
                format!(
                    "Failed to upload object to bucket '{}' with key '{}'",
                    bucket, key
                ),
                e,
            )
        })?;

    info!(
        "Object uploaded successfully to bucket: '{}' with key: '{}', content type: '{}', etag: '{}'",
        bucket,
        key,
        payload.content_type,
        e_tag.as_deref().unwrap_or("")
    );

    Ok(format!(
        "Object uploaded successfully to bucket: '{}' with key: '{}'.",
        bucket, key
    ))
}

/// Download an object, returning either its text or the path of the file it was saved to.
pub async fn download_object(
    state: &AppState,
    request: DownloadRequest,
) -> Result<String, GatewayError> {
    info!(
        "Downloading object from bucket: {} with key: {}, destinationPath: {:?}, responseType: {:?}",
        request.bucket_name, request.key, request.destination_path, request.response_type
    );

    request.validate()?;
    let bucket = request.bucket_name.as_str();
    let key = request.key.as_str();

    let metadata = state.storage.head_object(bucket, key).await.map_err(|e| {
        error!("Failed to get object metadata: {}", e);
        GatewayError::object_access(
            bucket,
            key,
            format!(
                "Object cannot be accessed in bucket '{}' with key '{}'",
                bucket, key
            ),
            e,
        )
    })?;

    info!(
        "Object content type: {:?}, content length: {} bytes",
        metadata.content_type, metadata.content_length
    );

    match deliver(state.storage.as_ref(), &request, &metadata).await? {
        DownloadOutcome::Text(text) => Ok(text),
        DownloadOutcome::File(path) => Ok(path.display().to_string()),
    }
}

/// Head an object and flatten its metadata into string pairs.
pub async fn get_object_metadata(
    state: &AppState,
    bucket_name: &str,
    key: &str,
) -> Result<BTreeMap<String, String>, GatewayError> {
    info!(
        "Getting metadata for object in bucket: {} with key: {}",
        bucket_name, key
    );
    require_bucket_name(bucket_name)?;
    require_key(key)?;

    let head = state
        .storage
        .head_object(bucket_name, key)
        .await
        .map_err(|e| {
            error!(
                "Failed to get metadata for object in bucket '{}' with key '{}': {}",
                bucket_name, key, e
            );
            GatewayError::object_access(
                bucket_name,
                key,
                format!(
                    "Failed to get metadata for object in bucket '{}' with key '{}'",
                    bucket_name, key
                ),
                e,
            )
        })?;

    let mut metadata = BTreeMap::new();
    if let Some(content_type) = head.content_type {
        metadata.insert("contentType".to_string(), content_type);
    }
    metadata.insert("contentLength".to_string(), head.content_length.to_string());
    if let Some(last_modified) = head.last_modified {
        metadata.insert("lastModified".to_string(), last_modified.to_rfc3339());
    }
    if let Some(e_tag) = head.e_tag {
        metadata.insert("eTag".to_string(), e_tag);
    }
    metadata.extend(head.user_metadata);

    info!(
        "Metadata retrieved successfully for object in bucket: {} with key: {}",
        bucket_name, key
    );
    Ok(metadata)
}

pub async fn list_objects(
    state: &AppState,
    bucket_name: &str,
    prefix: Option<&str>,
) -> Result<Vec<ObjectSummary>, GatewayError> {
    let prefix = prefix.unwrap_or_default();
    info!(
        "Listing objects in bucket: {} with prefix: {}",
        bucket_name, prefix
    );
    require_bucket_name(bucket_name)?;

    let objects = state
        .storage
        .list_objects(bucket_name, prefix)
        .await
        .map_err(|e| {
            error!(
                "Failed to list objects in bucket '{}' with prefix '{}': {}",
                bucket_name, prefix, e
            );
            GatewayError::storage(
                format!(
                    "Failed to list objects in bucket '{}' with prefix '{}'",
                    bucket_name, prefix
                ),
                e,
            )
        })?;

    info!("Found {} objects in bucket: {}", objects.len(), bucket_name);
    Ok(objects)
}

pub async fn delete_object(
    state: &AppState,
    bucket_name: &str,
    key: &str,
) -> Result<String, GatewayError> {
    info!("Deleting object from bucket: {} with key: {}", bucket_name, key);
    require_bucket_name(bucket_name)?;
    require_key(key)?;

    state
        .storage
        .delete_object(bucket_name, key)
        .await
        .map_err(|e| {
            error!(
                "Failed to delete object from bucket '{}' with key '{}': {}",
                bucket_name, key, e
            );
            GatewayError::storage(
                format!(
                    "Failed to delete object from bucket '{}' with key '{}'",
                    bucket_name, key
                ),
                e,
            )
        })?;

    info!(
        "Object deleted successfully from bucket: {} with key: {}",
        bucket_name, key
    );
    Ok(format!(
        "Object deleted successfully from bucket: '{}' with key: '{}'.",
        bucket_name, key
    ))
}
