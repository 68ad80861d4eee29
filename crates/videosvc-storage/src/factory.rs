#[cfg(feature = "storage-local")]
use crate::LocalStorage;
use crate::{MemoryStorage, StorageBackend, StorageResult, VideoDataStorage};
#[cfg(not(feature = "storage-local"))]
use crate::StorageError;
use std::sync::Arc;
use videosvc_core::Config;

/// Create a storage backend based on configuration
pub async fn create_storage(config: &Config) -> StorageResult<Arc<dyn VideoDataStorage>> {
    match config.storage_backend {
        #[cfg(feature = "storage-local")]
        StorageBackend::Local => {
            let storage = LocalStorage::new(&config.local_storage_path).await?;
            Ok(Arc::new(storage))
        }

        #[cfg(not(feature = "storage-local"))]
        StorageBackend::Local => Err(StorageError::ConfigError(
            "Local storage backend not available (storage-local feature not enabled)".to_string(),
        )),

        StorageBackend::Memory => Ok(Arc::new(MemoryStorage::new())),
    }
}
