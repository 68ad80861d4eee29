use crate::traits::{ByteStream, DataReader, StorageError, StorageResult, VideoDataStorage};
use crate::StorageBackend;
use async_trait::async_trait;
use bytes::Bytes;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::io::AsyncReadExt;
use tokio::sync::RwLock;

/// In-process storage; contents are lost on restart.
#[derive(Clone, Default)]
pub struct MemoryStorage {
    data: Arc<RwLock<HashMap<i64, Bytes>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl VideoDataStorage for MemoryStorage {
    async fn save(&self, video_id: i64, mut reader: DataReader<'_>) -> StorageResult<u64> {
        let mut buf = Vec::new();
        reader
            .read_to_end(&mut buf)
            .await
            .map_err(|e| StorageError::UploadFailed(format!("Failed to read upload: {}", e)))?;

        let size = buf.len() as u64;
        self.data.write().await.insert(video_id, Bytes::from(buf));

        tracing::debug!(video_id, size_bytes = size, "Memory storage save successful");

        Ok(size)
    }

    async fn serve(&self, video_id: i64) -> StorageResult<ByteStream> {
        let bytes = self
            .data
            .read()
            .await
            .get(&video_id)
            .cloned()
            .ok_or(StorageError::NotFound(video_id))?;

        Ok(Box::pin(futures::stream::once(async move { Ok(bytes) })))
    }

    async fn exists(&self, video_id: i64) -> StorageResult<bool> {
        Ok(self.data.read().await.contains_key(&video_id))
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Memory
    }
}
