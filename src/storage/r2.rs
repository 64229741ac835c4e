//! Cloudflare R2 backend built on `rust-s3`.

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures::StreamExt;
use s3::bucket::Bucket;
use s3::creds::Credentials;
use s3::{BucketConfiguration, Region};
use tokio::io::AsyncWriteExt;

use super::{ObjectMetadata, ObjectStorage, ObjectSummary, StorageError};
use crate::config::R2Config;

/// R2 client. Bucket handles are cheap and built per call, the HTTP
/// connection pool lives inside `rust-s3`.
pub struct R2Storage {
    region: Region,
    credentials: Credentials,
    request_timeout: Duration,
}

impl R2Storage {
    pub fn new(config: &R2Config) -> Result<Self, StorageError> {
        log::info!("Initializing R2 storage with endpoint: {}", config.endpoint);

        let credentials = Credentials::new(
            Some(&config.access_key_id),
            Some(&config.secret_access_key),
            None,
            None,
            None,
        )
        .map_err(|e| StorageError::InvalidConfig(format!("invalid R2 credentials: {}", e)))?;

        let region = Region::Custom {
            region: config.region.clone(),
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
        };

        Ok(Self {
            region,
            credentials,
            request_timeout: config.request_timeout,
        })
    }

    // R2 only supports path-style addressing.
    fn bucket(&self, name: &str) -> Result<Box<Bucket>, StorageError> {
        let bucket = Bucket::new(name, self.region.clone(), self.credentials.clone())?;
        Ok(bucket.with_path_style().with_request_timeout(self.request_timeout)?)
    }
}

fn check_status(status: u16, body: &[u8]) -> Result<(), StorageError> {
    match status {
        200..=299 => Ok(()),
        404 => Err(StorageError::NotFound),
        _ => Err(StorageError::Service {
            status,
            message: String::from_utf8_lossy(body).into_owned(),
        }),
    }
}

fn parse_last_modified(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc2822(value)
        .or_else(|_| DateTime::parse_from_rfc3339(value))
        .map(|dt| dt.with_timezone(&Utc))
        .ok()
}

#[async_trait]
impl ObjectStorage for R2Storage {
    async fn list_buckets(&self) -> Result<Vec<String>, StorageError> {
        let response = Bucket::list_buckets(self.region.clone(), self.credentials.clone()).await?;
        Ok(response.bucket_names().collect())
    }

    async fn create_bucket(&self, bucket: &str) -> Result<(), StorageError> {
        let response = Bucket::create_with_path_style(
            bucket,
            self.region.clone(),
            self.credentials.clone(),
            BucketConfiguration::default(),
        )
        .await?;

        if response.success() {
            Ok(())
        } else {
            Err(StorageError::Service {
                status: response.response_code,
                message: response.response_text,
            })
        }
    }

    async fn delete_bucket(&self, bucket: &str) -> Result<(), StorageError> {
        let status = self.bucket(bucket)?.delete().await?;
        check_status(status, &[])
    }

    async fn list_objects(
        &self,
        bucket: &str,
        prefix: &str,
    ) -> Result<Vec<ObjectSummary>, StorageError> {
        let pages = self.bucket(bucket)?.list(prefix.to_string(), None).await?;

        Ok(pages
            .into_iter()
            .flat_map(|page| page.contents)
            .map(|object| ObjectSummary {
                key: object.key,
                size: object.size as u64,
                last_modified: object.last_modified,
                e_tag: object.e_tag,
            })
            .collect())
    }

    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        data: &[u8],
        content_type: &str,
    ) -> Result<Option<String>, StorageError> {
        let response = self
            .bucket(bucket)?
            .put_object_with_content_type(key, data, content_type)
            .await?;
        check_status(response.status_code(), response.bytes())?;

        let e_tag = response.headers().get("etag").cloned();
        Ok(e_tag)
    }

    async fn get_object(&self, bucket: &str, key: &str) -> Result<Vec<u8>, StorageError> {
        let response = self.bucket(bucket)?.get_object(key).await?;
        check_status(response.status_code(), response.bytes())?;
        Ok(response.bytes().to_vec())
    }

    async fn get_object_to_file(
        &self,
        bucket: &str,
        key: &str,
        path: &Path,
    ) -> Result<u64, StorageError> {
        let mut response = self.bucket(bucket)?.get_object_stream(key).await?;
        let status = response.status_code;

        // Error bodies must never reach the caller's file.
        if !(200..300).contains(&status) {
            let mut body = Vec::new();
            while let Some(chunk) = response.bytes().next().await {
                body.extend_from_slice(&chunk?);
            }
            check_status(status, &body)?;
        }

        let mut file = tokio::fs::File::create(path).await?;
        let mut written = 0u64;
        while let Some(chunk) = response.bytes().next().await {
            let chunk = chunk?;
            file.write_all(&chunk).await?;
            written += chunk.len() as u64;
        }
        file.flush().await?;

        Ok(written)
    }

    async fn head_object(&self, bucket: &str, key: &str) -> Result<ObjectMetadata, StorageError> {
        let (head, status) = self.bucket(bucket)?.head_object(key).await?;
        check_status(status, &[])?;

        Ok(ObjectMetadata {
            content_type: head.content_type,
            content_length: head.content_length.unwrap_or(0).max(0) as u64,
            last_modified: head.last_modified.as_deref().and_then(parse_last_modified),
            e_tag: head.e_tag,
            user_metadata: head.metadata.unwrap_or_default(),
        })
    }

    async fn delete_object(&self, bucket: &str, key: &str) -> Result<(), StorageError> {
        let response = self.bucket(bucket)?.delete_object(key).await?;
        check_status(response.status_code(), response.bytes())
    }
}
