use std::sync::Arc;
use videosvc_core::{AppError, Video};

use super::locks::VideoLocks;
use super::repository::VideoRepository;

/// Like/unlike state transitions for videos.
///
/// Each transition is a read-modify-write on the video's liker set, serialized
/// per video through [`VideoLocks`].
#[derive(Clone)]
pub struct EngagementTracker {
    repo: Arc<dyn VideoRepository>,
    locks: VideoLocks,
}

impl EngagementTracker {
    pub fn new(repo: Arc<dyn VideoRepository>, locks: VideoLocks) -> Self {
        Self { repo, locks }
    }

    async fn load(&self, video_id: i64) -> Result<Video, AppError> {
        self.repo
            .find_by_id(video_id)
            .await?
            .ok_or_else(|| AppError::video_not_found(video_id))
    }

    #[tracing::instrument(skip(self))]
    pub async fn like(&self, video_id: i64, user: &str) -> Result<Video, AppError> {
        let _guard = self.locks.lock(video_id).await;
        let mut video = self.load(video_id).await?;

        if !video.add_liker(user) {
            return Err(AppError::AlreadyLiked {
                video_id,
                user: user.to_string(),
            });
        }
        self.repo.save(&video).await?;

        tracing::info!(video_id, user = %user, likes = video.likes(), "Video liked");
        Ok(video)
    }

    #[tracing::instrument(skip(self))]
    pub async fn unlike(&self, video_id: i64, user: &str) -> Result<Video, AppError> {
        let _guard = self.locks.lock(video_id).await;
        let mut video = self.load(video_id).await?;

        if !video.remove_liker(user) {
            return Err(AppError::NotLiked {
                video_id,
                user: user.to_string(),
            });
        }
        self.repo.save(&video).await?;

        tracing::info!(video_id, user = %user, likes = video.likes(), "Video unliked");
        Ok(video)
    }

    /// Users who liked the video, sorted.
    pub async fn liked_by(&self, video_id: i64) -> Result<Vec<String>, AppError> {
        let video = self.load(video_id).await?;
        Ok(video.liked_by().iter().cloned().collect())
    }
}
