use std::sync::Arc;

use crate::config::R2Config;
use crate::storage::{ObjectStorage, R2Storage, StorageError};

/// Shared handle passed to every tool operation. Cheap to clone.
#[derive(Clone)]
pub struct AppState {
    pub storage: Arc<dyn ObjectStorage + Send + Sync>,
}

impl AppState {
    pub fn new() -> Result<Self, Box<dyn std::error::Error>> {
        let config = R2Config::from_env()?;
        Ok(Self::new_with_config(config)?)
    }

    pub fn new_with_config(config: R2Config) -> Result<Self, StorageError> {
        let storage = Arc::new(R2Storage::new(&config)?);
        log::info!("R2 storage client initialized successfully");
        Ok(Self::new_with_storage(storage))
    }

    pub fn new_with_storage(storage: Arc<dyn ObjectStorage + Send + Sync>) -> Self {
        Self { storage }
    }
}
