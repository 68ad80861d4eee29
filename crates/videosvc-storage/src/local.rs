use crate::keys::video_data_key;
use crate::traits::{ByteStream, DataReader, StorageError, StorageResult, VideoDataStorage};
use crate::StorageBackend;
use async_trait::async_trait;
use futures::StreamExt;
use std::path::{Path, PathBuf};
use tokio::fs;

/// Local filesystem storage implementation
#[derive(Clone)]
pub struct LocalStorage {
    base_path: PathBuf,
}

impl LocalStorage {
    /// Create a new LocalStorage rooted at `base_path`, creating the directory if needed.
    pub async fn new(base_path: impl Into<PathBuf>) -> StorageResult<Self> {
        let base_path = base_path.into();

        fs::create_dir_all(&base_path).await.map_err(|e| {
            StorageError::ConfigError(format!(
                "Failed to create storage directory {}: {}",
                base_path.display(),
                e
            ))
        })?;

        Ok(LocalStorage { base_path })
    }

    /// Convert storage key to filesystem path with security validation
    ///
    /// Rejects keys that could escape the base storage directory.
    fn key_to_path(&self, storage_key: &str) -> StorageResult<PathBuf> {
        if storage_key.contains("..") || storage_key.starts_with('/') {
            return Err(StorageError::InvalidKey(
                "Storage key contains invalid characters".to_string(),
            ));
        }

        let path = self.base_path.join(storage_key);

        let base_canonical = self.base_path.canonicalize().map_err(|e| {
            StorageError::ConfigError(format!("Failed to canonicalize base path: {}", e))
        })?;

        if let Ok(canonical) = path.canonicalize() {
            if canonical.strip_prefix(&base_canonical).is_err() {
                return Err(StorageError::InvalidKey(
                    "Storage key resolves outside storage directory".to_string(),
                ));
            }
        }

        Ok(path)
    }

    fn video_path(&self, video_id: i64) -> StorageResult<PathBuf> {
        self.key_to_path(&video_data_key(video_id))
    }

    /// Ensure parent directory exists
    async fn ensure_parent_dir(&self, path: &Path) -> StorageResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }
        Ok(())
    }
}

/// `video{id}.mpg` -> `video{id}.mpg.<uuid>.part` in the same directory, so the
/// final rename never crosses filesystems.
fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(format!(".{}.part", uuid::Uuid::new_v4()));
    path.with_file_name(name)
}

async fn write_file(path: &Path, reader: &mut DataReader<'_>) -> StorageResult<u64> {
    let mut file = fs::File::create(path).await.map_err(|e| {
        StorageError::UploadFailed(format!("Failed to create file {}: {}", path.display(), e))
    })?;

    let bytes_copied = tokio::io::copy(reader, &mut file).await.map_err(|e| {
        StorageError::UploadFailed(format!(
            "Failed to write stream to file {}: {}",
            path.display(),
            e
        ))
    })?;

    file.sync_all().await.map_err(|e| {
        StorageError::UploadFailed(format!("Failed to sync file {}: {}", path.display(), e))
    })?;

    Ok(bytes_copied)
}

async fn remove_temp(path: &Path) {
    if let Err(e) = fs::remove_file(path).await {
        tracing::warn!(path = %path.display(), error = %e, "Failed to remove partial upload");
    }
}

#[async_trait]
impl VideoDataStorage for LocalStorage {
    async fn save(&self, video_id: i64, mut reader: DataReader<'_>) -> StorageResult<u64> {
        let path = self.video_path(video_id)?;
        let start = std::time::Instant::now();

        self.ensure_parent_dir(&path).await?;

        // Bytes land in a sibling temp file and replace the target only once complete.
        let temp_path = temp_path_for(&path);
        let result = write_file(&temp_path, &mut reader).await;
        let bytes_copied = match result {
            Ok(bytes) => bytes,
            Err(e) => {
                remove_temp(&temp_path).await;
                return Err(e);
            }
        };

        if let Err(e) = fs::rename(&temp_path, &path).await {
            remove_temp(&temp_path).await;
            return Err(StorageError::UploadFailed(format!(
                "Failed to move upload into {}: {}",
                path.display(),
                e
            )));
        }

        tracing::info!(
            path = %path.display(),
            video_id,
            size_bytes = bytes_copied,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Local storage save successful"
        );

        Ok(bytes_copied)
    }

    async fn serve(&self, video_id: i64) -> StorageResult<ByteStream> {
        let path = self.video_path(video_id)?;
        let start = std::time::Instant::now();

        if !fs::try_exists(&path).await.unwrap_or(false) {
            return Err(StorageError::NotFound(video_id));
        }

        let file = fs::File::open(&path).await.map_err(|e| {
            StorageError::DownloadFailed(format!("Failed to open file {}: {}", path.display(), e))
        })?;

        let path_display = path.display().to_string();
        let stream = tokio_util::io::ReaderStream::new(file).map(move |result| {
            result.map_err(|e| {
                tracing::error!(
                    path = %path_display,
                    video_id,
                    duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                    error = %e,
                    "Local storage stream read error"
                );
                StorageError::DownloadFailed(format!("Failed to read chunk: {}", e))
            })
        });

        Ok(Box::pin(stream))
    }

    async fn exists(&self, video_id: i64) -> StorageResult<bool> {
        let path = self.video_path(video_id)?;
        Ok(fs::try_exists(&path).await.unwrap_or(false))
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Local
    }
}

#[cfg(all(test, feature = "storage-local"))]
mod tests {
    use super::*;
    use bytes::Bytes;
    use futures::StreamExt;
    use tempfile::tempdir;
    use tokio_util::io::StreamReader;

    fn reader(data: &[u8]) -> DataReader<'static> {
        Box::pin(std::io::Cursor::new(data.to_vec()))
    }

    async fn collect(mut stream: ByteStream) -> Vec<u8> {
        let mut out = Vec::new();
        while let Some(chunk) = stream.next().await {
            out.extend_from_slice(&chunk.unwrap());
        }
        out
    }

    #[tokio::test]
    async fn test_local_storage_save_serve() {
        let dir = tempdir().unwrap();
        let storage = LocalStorage::new(dir.path()).await.unwrap();

        let written = storage.save(1, reader(b"test data")).await.unwrap();
        assert_eq!(written, 9);
        assert!(dir.path().join("videos/video1.mpg").exists());

        let served = collect(storage.serve(1).await.unwrap()).await;
        assert_eq!(served, b"test data");
    }

    #[tokio::test]
    async fn test_local_storage_save_overwrites() {
        let dir = tempdir().unwrap();
        let storage = LocalStorage::new(dir.path()).await.unwrap();

        storage.save(2, reader(b"first version, longer")).await.unwrap();
        storage.save(2, reader(b"second")).await.unwrap();

        let served = collect(storage.serve(2).await.unwrap()).await;
        assert_eq!(served, b"second");
    }

    fn failing_reader(prefix: &'static [u8]) -> DataReader<'static> {
        let chunks: Vec<Result<Bytes, std::io::Error>> = vec![
            Ok(Bytes::from_static(prefix)),
            Err(std::io::Error::new(
                std::io::ErrorKind::ConnectionReset,
                "client went away",
            )),
        ];
        Box::pin(StreamReader::new(futures::stream::iter(chunks)))
    }

    fn entries(dir: &Path) -> Vec<String> {
        let mut names: Vec<String> = std::fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    #[tokio::test]
    async fn test_local_storage_failed_save_keeps_previous_data() {
        let dir = tempdir().unwrap();
        let storage = LocalStorage::new(dir.path()).await.unwrap();

        storage.save(1, reader(b"GOOD-COMPLETE-VIDEO")).await.unwrap();

        let result = storage.save(1, failing_reader(b"PART")).await;
        assert!(matches!(result, Err(StorageError::UploadFailed(_))));

        let served = collect(storage.serve(1).await.unwrap()).await;
        assert_eq!(served, b"GOOD-COMPLETE-VIDEO");
        assert_eq!(entries(&dir.path().join("videos")), vec!["video1.mpg"]);
    }

    #[tokio::test]
    async fn test_local_storage_failed_first_save_leaves_nothing() {
        let dir = tempdir().unwrap();
        let storage = LocalStorage::new(dir.path()).await.unwrap();

        assert!(storage.save(3, failing_reader(b"PART")).await.is_err());

        assert!(!storage.exists(3).await.unwrap());
        assert!(entries(&dir.path().join("videos")).is_empty());
    }

    #[tokio::test]
    async fn test_local_storage_serve_missing() {
        let dir = tempdir().unwrap();
        let storage = LocalStorage::new(dir.path()).await.unwrap();

        let result = storage.serve(404).await;
        assert!(matches!(result, Err(StorageError::NotFound(404))));
    }

    #[tokio::test]
    async fn test_local_storage_exists() {
        let dir = tempdir().unwrap();
        let storage = LocalStorage::new(dir.path()).await.unwrap();

        assert!(!storage.exists(5).await.unwrap());
        storage.save(5, reader(b"x")).await.unwrap();
        assert!(storage.exists(5).await.unwrap());
    }

    #[tokio::test]
    async fn test_path_traversal_rejected() {
        let dir = tempdir().unwrap();
        let storage = LocalStorage::new(dir.path()).await.unwrap();

        let result = storage.key_to_path("../../../etc/passwd");
        assert!(matches!(result, Err(StorageError::InvalidKey(_))));

        let result = storage.key_to_path("/etc/passwd");
        assert!(matches!(result, Err(StorageError::InvalidKey(_))));
    }

    #[tokio::test]
    async fn test_new_creates_base_directory() {
        let dir = tempdir().unwrap();
        let nested = dir.path().join("a/b/c");
        LocalStorage::new(&nested).await.unwrap();
        assert!(nested.is_dir());
    }
}
