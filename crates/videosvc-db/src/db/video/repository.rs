use async_trait::async_trait;
use videosvc_core::{AppError, Video};

/// Persistence for video records, including each video's liker set.
///
/// Implementations must be safe to share across request handlers. Records are
/// returned in ascending id order wherever a list is returned.
#[async_trait]
pub trait VideoRepository: Send + Sync + 'static {
    /// Hand out a fresh id, strictly greater than every id handed out or reserved before.
    async fn next_id(&self) -> Result<i64, AppError>;

    /// Make sure `next_id` never returns `id` or anything below it.
    async fn reserve_id(&self, id: i64) -> Result<(), AppError>;

    /// Insert or replace the record keyed by `video.id`, liker set included.
    async fn save(&self, video: &Video) -> Result<(), AppError>;

    async fn find_all(&self) -> Result<Vec<Video>, AppError>;

    async fn find_by_id(&self, id: i64) -> Result<Option<Video>, AppError>;

    /// Exact, case-sensitive title match
    async fn find_by_title(&self, title: &str) -> Result<Vec<Video>, AppError>;

    /// Videos whose duration is strictly below `duration`
    async fn find_by_duration_less_than(&self, duration: i64) -> Result<Vec<Video>, AppError>;
}
