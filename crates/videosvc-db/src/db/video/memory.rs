use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;
use videosvc_core::{AppError, Video};

use super::repository::VideoRepository;

/// Repository keeping every record in process memory.
#[derive(Clone, Default)]
pub struct InMemoryVideoRepository {
    videos: Arc<RwLock<BTreeMap<i64, Video>>>,
    last_id: Arc<AtomicI64>,
}

impl InMemoryVideoRepository {
    pub fn new() -> Self {
        Self::default()
    }

    async fn filtered<F>(&self, predicate: F) -> Vec<Video>
    where
        F: Fn(&Video) -> bool,
    {
        self.videos
            .read()
            .await
            .values()
            .filter(|video| predicate(video))
            .cloned()
            .collect()
    }
}

#[async_trait]
impl VideoRepository for InMemoryVideoRepository {
    async fn next_id(&self) -> Result<i64, AppError> {
        Ok(self.last_id.fetch_add(1, Ordering::SeqCst) + 1)
    }

    async fn reserve_id(&self, id: i64) -> Result<(), AppError> {
        self.last_id.fetch_max(id, Ordering::SeqCst);
        Ok(())
    }

    #[tracing::instrument(skip(self, video), fields(db.table = "videos", db.operation = "upsert", video_id = video.id))]
    async fn save(&self, video: &Video) -> Result<(), AppError> {
        self.videos.write().await.insert(video.id, video.clone());
        Ok(())
    }

    #[tracing::instrument(skip(self), fields(db.table = "videos", db.operation = "select"))]
    async fn find_all(&self) -> Result<Vec<Video>, AppError> {
        Ok(self.videos.read().await.values().cloned().collect())
    }

    #[tracing::instrument(skip(self), fields(db.table = "videos", db.operation = "select"))]
    async fn find_by_id(&self, id: i64) -> Result<Option<Video>, AppError> {
        Ok(self.videos.read().await.get(&id).cloned())
    }

    #[tracing::instrument(skip(self), fields(db.table = "videos", db.operation = "select"))]
    async fn find_by_title(&self, title: &str) -> Result<Vec<Video>, AppError> {
        Ok(self.filtered(|video| video.title == title).await)
    }

    #[tracing::instrument(skip(self), fields(db.table = "videos", db.operation = "select"))]
    async fn find_by_duration_less_than(&self, duration: i64) -> Result<Vec<Video>, AppError> {
        Ok(self.filtered(|video| video.duration < duration).await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_next_id_starts_at_one() {
        let repo = InMemoryVideoRepository::new();
        assert_eq!(repo.next_id().await.unwrap(), 1);
        assert_eq!(repo.next_id().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_reserve_id_skips_past_explicit_ids() {
        let repo = InMemoryVideoRepository::new();
        repo.reserve_id(10).await.unwrap();
        assert_eq!(repo.next_id().await.unwrap(), 11);

        // reserving a lower id never moves the counter back
        repo.reserve_id(3).await.unwrap();
        assert_eq!(repo.next_id().await.unwrap(), 12);
    }

    #[tokio::test]
    async fn test_find_all_is_ordered_by_id() {
        let repo = InMemoryVideoRepository::new();
        for id in [3, 1, 2] {
            let mut video = Video::new(format!("v{}", id), 10);
            video.id = id;
            repo.save(&video).await.unwrap();
        }

        let ids: Vec<i64> = repo.find_all().await.unwrap().iter().map(|v| v.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_save_keeps_liker_set() {
        let repo = InMemoryVideoRepository::new();
        let mut video = Video::new("a", 10).with_liked_by(["bob"]);
        video.id = 1;
        repo.save(&video).await.unwrap();

        let stored = repo.find_by_id(1).await.unwrap().unwrap();
        assert!(stored.is_liked_by("bob"));
        assert_eq!(stored.likes(), 1);
    }
}
