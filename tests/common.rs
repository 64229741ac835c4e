#![allow(dead_code)]

use std::collections::{BTreeSet, HashMap};
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use chrono::Utc;
use tokio::sync::Mutex;

use r2_object_gateway::storage::{ObjectMetadata, ObjectStorage, ObjectSummary, StorageError};
use r2_object_gateway::AppState;

#[derive(Debug, Clone)]
pub struct StoredObject {
    pub data: Vec<u8>,
    pub content_type: String,
    pub user_metadata: HashMap<String, String>,
}

/// In-memory implementation of ObjectStorage for testing
pub struct MockObjectStorage {
    buckets: Arc<Mutex<BTreeSet<String>>>,
    objects: Arc<Mutex<HashMap<(String, String), StoredObject>>>,
    put_count: AtomicUsize,
    get_count: AtomicUsize,
    should_fail: bool,
    fail_transfers: bool,
}

impl MockObjectStorage {
    pub fn new() -> Self {
        Self {
            buckets: Arc::new(Mutex::new(BTreeSet::new())),
            objects: Arc::new(Mutex::new(HashMap::new())),
            put_count: AtomicUsize::new(0),
            get_count: AtomicUsize::new(0),
            should_fail: false,
            fail_transfers: false,
        }
    }

    pub fn new_failing() -> Self {
        Self {
            should_fail: true,
            ..Self::new()
        }
    }

    /// Head succeeds but file transfers write a partial body, then fail.
    pub fn new_failing_transfers() -> Self {
        Self {
            fail_transfers: true,
            ..Self::new()
        }
    }

    pub fn put_count(&self) -> usize {
        self.put_count.load(Ordering::SeqCst)
    }

    pub fn get_count(&self) -> usize {
        self.get_count.load(Ordering::SeqCst)
    }

    pub async fn object(&self, bucket: &str, key: &str) -> Option<StoredObject> {
        let objects = self.objects.lock().await;
        objects.get(&(bucket.to_string(), key.to_string())).cloned()
    }

    /// Seed an object directly, bypassing the upload path.
    pub async fn insert(&self, bucket: &str, key: &str, data: &[u8], content_type: &str) {
        self.insert_with_metadata(bucket, key, data, content_type, HashMap::new())
            .await;
    }

    pub async fn insert_with_metadata(
        &self,
        bucket: &str,
        key: &str,
        data: &[u8],
        content_type: &str,
        user_metadata: HashMap<String, String>,
    ) {
        self.buckets.lock().await.insert(bucket.to_string());
        self.objects.lock().await.insert(
            (bucket.to_string(), key.to_string()),
            StoredObject {
                data: data.to_vec(),
                content_type: content_type.to_string(),
                user_metadata,
            },
        );
    }

    fn check_failure(&self) -> Result<(), StorageError> {
        if self.should_fail {
            return Err(StorageError::Service {
                status: 500,
                message: "Mock storage failure".to_string(),
            });
        }
        Ok(())
    }

    async fn load(&self, bucket: &str, key: &str) -> Result<StoredObject, StorageError> {
        self.check_failure()?;
        self.object(bucket, key).await.ok_or(StorageError::NotFound)
    }
}

#[async_trait::async_trait]
impl ObjectStorage for MockObjectStorage {
    async fn list_buckets(&self) -> Result<Vec<String>, StorageError> {
        self.check_failure()?;
        Ok(self.buckets.lock().await.iter().cloned().collect())
    }

    async fn create_bucket(&self, bucket: &str) -> Result<(), StorageError> {
        self.check_failure()?;
        let mut buckets = self.buckets.lock().await;
        if !buckets.insert(bucket.to_string()) {
            return Err(StorageError::Service {
                status: 409,
                message: "BucketAlreadyExists".to_string(),
            });
        }
        Ok(())
    }

    async fn delete_bucket(&self, bucket: &str) -> Result<(), StorageError> {
        self.check_failure()?;
        let mut buckets = self.buckets.lock().await;
        if buckets.remove(bucket) {
            Ok(())
        } else {
            Err(StorageError::NotFound)
        }
    }

    async fn list_objects(
        &self,
        bucket: &str,
        prefix: &str,
    ) -> Result<Vec<ObjectSummary>, StorageError> {
        self.check_failure()?;
        let objects = self.objects.lock().await;
        let mut listed: Vec<ObjectSummary> = objects
            .iter()
            .filter(|((b, k), _)| b == bucket && k.starts_with(prefix))
            .map(|((_, k), object)| ObjectSummary {
                key: k.clone(),
                size: object.data.len() as u64,
                last_modified: "2024-01-01T00:00:00.000Z".to_string(),
                e_tag: None,
            })
            .collect();
        listed.sort_by(|a, b| a.key.cmp(&b.key));
        Ok(listed)
    }

    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        data: &[u8],
        content_type: &str,
    ) -> Result<Option<String>, StorageError> {
        self.check_failure()?;
        self.put_count.fetch_add(1, Ordering::SeqCst);
        self.insert(bucket, key, data, content_type).await;
        Ok(Some(format!("\"etag-{}\"", data.len())))
    }

    async fn get_object(&self, bucket: &str, key: &str) -> Result<Vec<u8>, StorageError> {
        let object = self.load(bucket, key).await?;
        self.get_count.fetch_add(1, Ordering::SeqCst);
        Ok(object.data)
    }

    async fn get_object_to_file(
        &self,
        bucket: &str,
        key: &str,
        path: &Path,
    ) -> Result<u64, StorageError> {
        let object = self.load(bucket, key).await?;
        self.get_count.fetch_add(1, Ordering::SeqCst);
        if self.fail_transfers {
            tokio::fs::write(path, b"<Error>partial").await?;
            return Err(StorageError::Service {
                status: 500,
                message: "stream reset".to_string(),
            });
        }
        tokio::fs::write(path, &object.data).await?;
        Ok(object.data.len() as u64)
    }

    async fn head_object(&self, bucket: &str, key: &str) -> Result<ObjectMetadata, StorageError> {
        let object = self.load(bucket, key).await?;
        Ok(ObjectMetadata {
            content_type: Some(object.content_type),
            content_length: object.data.len() as u64,
            last_modified: Some(Utc::now()),
            e_tag: Some(format!("\"etag-{}\"", object.data.len())),
            user_metadata: object.user_metadata,
        })
    }

    async fn delete_object(&self, bucket: &str, key: &str) -> Result<(), StorageError> {
        self.check_failure()?;
        let mut objects = self.objects.lock().await;
        objects.remove(&(bucket.to_string(), key.to_string()));
        Ok(())
    }
}

/// AppState backed by a fresh mock; the mock handle is returned for assertions.
pub fn setup_test_app_state() -> (AppState, Arc<MockObjectStorage>) {
    r2_object_gateway::init_logging();
    let storage = Arc::new(MockObjectStorage::new());
    let state = AppState::new_with_storage(storage.clone());
    (state, storage)
}
