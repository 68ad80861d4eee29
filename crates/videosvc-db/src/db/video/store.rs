use std::sync::Arc;
use videosvc_core::models::data_url_for;
use videosvc_core::{AppError, NewVideo, Video};

use super::locks::VideoLocks;
use super::repository::VideoRepository;

/// Authoritative holder of video metadata: id assignment and the query surface.
#[derive(Clone)]
pub struct VideoStore {
    repo: Arc<dyn VideoRepository>,
    locks: VideoLocks,
    public_base_url: String,
}

impl VideoStore {
    pub fn new(
        repo: Arc<dyn VideoRepository>,
        locks: VideoLocks,
        public_base_url: impl Into<String>,
    ) -> Self {
        Self {
            repo,
            locks,
            public_base_url: public_base_url.into(),
        }
    }

    /// Store a new video, or replace the one with the same explicit id.
    ///
    /// An unset id is assigned from the repository counter; an explicit id
    /// pushes the counter past it. The returned record carries its id and `data_url`.
    #[tracing::instrument(skip(self, new), fields(title = %new.title))]
    pub async fn add(&self, new: NewVideo) -> Result<Video, AppError> {
        new.validate()?;

        let mut video = Video::from(new);
        if video.has_id() {
            self.repo.reserve_id(video.id).await?;
        } else {
            video.id = self.repo.next_id().await?;
        }
        video.data_url = Some(data_url_for(&self.public_base_url, video.id));

        let _guard = self.locks.lock(video.id).await;
        self.repo.save(&video).await?;

        tracing::info!(video_id = video.id, "Video added");
        Ok(video)
    }

    pub async fn list(&self) -> Result<Vec<Video>, AppError> {
        self.repo.find_all().await
    }

    pub async fn get(&self, id: i64) -> Result<Video, AppError> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::video_not_found(id))
    }

    pub async fn find_by_title(&self, title: &str) -> Result<Vec<Video>, AppError> {
        self.repo.find_by_title(title).await
    }

    pub async fn find_by_duration_less_than(&self, duration: i64) -> Result<Vec<Video>, AppError> {
        self.repo.find_by_duration_less_than(duration).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::InMemoryVideoRepository;
    use std::collections::HashSet;

    fn store() -> VideoStore {
        VideoStore::new(
            Arc::new(InMemoryVideoRepository::new()),
            VideoLocks::default(),
            "",
        )
    }

    fn new_video(title: &str, duration: i64) -> NewVideo {
        NewVideo {
            id: 0,
            title: title.to_string(),
            duration,
            location: None,
            subject: None,
            content_type: None,
        }
    }

    #[tokio::test]
    async fn test_add_assigns_increasing_ids() {
        let store = store();
        let mut last = 0;
        for i in 0..20 {
            let video = store.add(new_video(&format!("v{}", i), i)).await.unwrap();
            assert!(video.id > last);
            last = video.id;
        }
    }

    #[tokio::test]
    async fn test_add_sets_data_url() {
        let store = VideoStore::new(
            Arc::new(InMemoryVideoRepository::new()),
            VideoLocks::default(),
            "http://localhost:8080",
        );
        let video = store.add(new_video("a", 10)).await.unwrap();
        assert_eq!(
            video.data_url.as_deref(),
            Some("http://localhost:8080/video/1/data")
        );
        assert_eq!(store.get(video.id).await.unwrap().data_url, video.data_url);
    }

    #[tokio::test]
    async fn test_explicit_id_replaces_and_advances_counter() {
        let store = store();
        let mut explicit = new_video("first", 5);
        explicit.id = 7;
        store.add(explicit).await.unwrap();

        let mut replacement = new_video("second", 6);
        replacement.id = 7;
        store.add(replacement).await.unwrap();

        let stored = store.get(7).await.unwrap();
        assert_eq!(stored.title, "second");
        assert_eq!(store.list().await.unwrap().len(), 1);

        let generated = store.add(new_video("third", 1)).await.unwrap();
        assert_eq!(generated.id, 8);
    }

    #[tokio::test]
    async fn test_add_rejects_negative_duration() {
        let store = store();
        let result = store.add(new_video("a", -5)).await;
        assert!(matches!(result, Err(AppError::InvalidInput(_))));
        assert!(store.list().await.unwrap().is_empty());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_adds_get_unique_ids() {
        let store = store();
        let handles: Vec<_> = (0..64)
            .map(|i| {
                let store = store.clone();
                tokio::spawn(async move { store.add(new_video("c", i)).await.unwrap().id })
            })
            .collect();

        let mut ids = HashSet::new();
        for handle in futures::future::join_all(handles).await {
            assert!(ids.insert(handle.unwrap()));
        }
        assert_eq!(ids.len(), 64);
        assert_eq!(store.list().await.unwrap().len(), 64);
    }

    #[tokio::test]
    async fn test_get_unknown_is_not_found() {
        let store = store();
        assert!(matches!(store.get(999).await, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_find_by_title_is_exact() {
        let store = store();
        store.add(new_video("Cats", 1)).await.unwrap();
        store.add(new_video("cats", 2)).await.unwrap();
        store.add(new_video("Cats and dogs", 3)).await.unwrap();
        store.add(new_video("Cats", 4)).await.unwrap();

        let found = store.find_by_title("Cats").await.unwrap();
        let durations: Vec<i64> = found.iter().map(|v| v.duration).collect();
        assert_eq!(durations, vec![1, 4]);
        assert!(store.find_by_title("Dogs").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_find_by_duration_is_strict() {
        let store = store();
        for duration in [5, 10, 15, 10] {
            store.add(new_video("d", duration)).await.unwrap();
        }

        let shorter = store.find_by_duration_less_than(10).await.unwrap();
        assert_eq!(shorter.len(), 1);
        assert_eq!(shorter[0].duration, 5);

        let all = store.find_by_duration_less_than(16).await.unwrap();
        assert_eq!(all.len(), 4);
        assert!(store.find_by_duration_less_than(5).await.unwrap().is_empty());
    }
}
