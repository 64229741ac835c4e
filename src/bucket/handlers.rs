//! Bucket tool operations. Thin pass-through to the storage capability.

use log::{error, info};

use crate::error::GatewayError;
use crate::object::models::require_bucket_name;
use crate::AppState;

pub async fn list_buckets(state: &AppState) -> Result<Vec<String>, GatewayError> {
    info!("Fetching list of buckets.");

    let buckets = state.storage.list_buckets().await.map_err(|e| {
        error!("Failed to list buckets: {}", e);
        GatewayError::storage("Failed to list buckets", e)
    })?;

    info!("Buckets found: {:?}", buckets);
    Ok(buckets)
}

pub async fn create_bucket(state: &AppState, bucket_name: &str) -> Result<String, GatewayError> {
    info!("Creating bucket: {}", bucket_name);
    require_bucket_name(bucket_name)?;

    state
        .storage
        .create_bucket(bucket_name)
        .await
        .map_err(|e| {
            error!("Failed to create bucket '{}': {}", bucket_name, e);
            GatewayError::storage(format!("Failed to create bucket '{}'", bucket_name), e)
        })?;

    info!("Bucket '{}' created successfully.", bucket_name);
    Ok(format!("Bucket '{}' created successfully.", bucket_name))
}

pub async fn delete_bucket(state: &AppState, bucket_name: &str) -> Result<String, GatewayError> {
    info!("Deleting bucket: {}", bucket_name);
    require_bucket_name(bucket_name)?;

    state
        .storage
        .delete_bucket(bucket_name)
        .await
        .map_err(|e| {
            error!("Failed to delete bucket '{}': {}", bucket_name, e);
            GatewayError::storage(format!("Failed to delete bucket '{}'", bucket_name), e)
        })?;

    info!("Bucket '{}' deleted successfully.", bucket_name);
    Ok(format!("Bucket '{}' deleted successfully.", bucket_name))
}
