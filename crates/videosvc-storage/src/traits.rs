//! Storage abstraction trait
//!
//! This module defines the trait every video data backend implements.

use crate::StorageBackend;
use async_trait::async_trait;
use bytes::Bytes;
use futures::Stream;
use std::pin::Pin;
use thiserror::Error;
use tokio::io::AsyncRead;
use videosvc_core::AppError;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("Download failed: {0}")]
    DownloadFailed(String),

    #[error("No data stored for video {0}")]
    NotFound(i64),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Chunked video bytes as served to clients
pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes, StorageError>> + Send>>;

/// Source of uploaded video bytes
pub type DataReader<'a> = Pin<Box<dyn AsyncRead + Send + 'a>>;

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::NotFound(id) => {
                AppError::NotFound(format!("No data uploaded for video {}", id))
            }
            other => AppError::StorageUnavailable(other.to_string()),
        }
    }
}

/// Video data storage abstraction
///
/// Bytes are keyed by video id only. Callers are responsible for checking that
/// the video's metadata exists before saving.
#[async_trait]
pub trait VideoDataStorage: Send + Sync {
    /// Stream the reader to storage until EOF, replacing any previous bytes.
    ///
    /// Returns the number of bytes written.
    async fn save(&self, video_id: i64, reader: DataReader<'_>) -> StorageResult<u64>;

    /// Stream previously saved bytes. `NotFound` if nothing was saved for the id.
    async fn serve(&self, video_id: i64) -> StorageResult<ByteStream>;

    async fn exists(&self, video_id: i64) -> StorageResult<bool>;

    fn backend_type(&self) -> StorageBackend;
}
