//! Object storage capability consumed by the gateway.
//!
//! The gateway never talks to the network directly; every bucket and object
//! operation goes through [`ObjectStorage`]. [`R2Storage`] is the production
//! implementation, tests plug in an in-memory one.

mod r2;

pub use r2::R2Storage;

use std::collections::HashMap;
use std::path::Path;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

/// Failure reported by the storage service or by local I/O performed on its behalf.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("object or bucket does not exist")]
    NotFound,
    #[error("storage service returned status {status}: {message}")]
    Service { status: u16, message: String },
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("storage client error: {0}")]
    Client(#[from] s3::error::S3Error),
    #[error("invalid storage configuration: {0}")]
    InvalidConfig(String),
}

/// Snapshot of an object's metadata as returned by a head call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObjectMetadata {
    pub content_type: Option<String>,
    pub content_length: u64,
    pub last_modified: Option<DateTime<Utc>>,
    pub e_tag: Option<String>,
    pub user_metadata: HashMap<String, String>,
}

/// One entry of an object listing.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ObjectSummary {
    pub key: String,
    pub size: u64,
    pub last_modified: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub e_tag: Option<String>,
}

#[async_trait]
pub trait ObjectStorage {
    async fn list_buckets(&self) -> Result<Vec<String>, StorageError>;

    async fn create_bucket(&self, bucket: &str) -> Result<(), StorageError>;

    async fn delete_bucket(&self, bucket: &str) -> Result<(), StorageError>;

    async fn list_objects(
        &self,
        bucket: &str,
        prefix: &str,
    ) -> Result<Vec<ObjectSummary>, StorageError>;

    /// Store `data` under `key`, overwriting any existing object. Returns the eTag when known.
    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        data: &[u8],
        content_type: &str,
    ) -> Result<Option<String>, StorageError>;

    async fn get_object(&self, bucket: &str, key: &str) -> Result<Vec<u8>, StorageError>;

    /// Stream the object body into a (created or truncated) file at `path`.
    /// Returns the number of bytes written.
    async fn get_object_to_file(
        &self,
        bucket: &str,
        key: &str,
        path: &Path,
    ) -> Result<u64, StorageError>;

    async fn head_object(&self, bucket: &str, key: &str) -> Result<ObjectMetadata, StorageError>;

    async fn delete_object(&self, bucket: &str, key: &str) -> Result<(), StorageError>;
}
