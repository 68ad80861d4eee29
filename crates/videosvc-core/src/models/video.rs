use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt::{Display, Formatter, Result as FmtResult};
use utoipa::ToSchema;

use crate::AppError;

/// Id value meaning "not assigned yet"; the store replaces it on first save.
pub const UNASSIGNED_VIDEO_ID: i64 = 0;

/// Build the URL a client uses to fetch a video's bytes.
///
/// With an empty `base` the result is server-relative (`/video/{id}/data`).
pub fn data_url_for(base: &str, id: i64) -> String {
    format!("{}/video/{}/data", base.trim_end_matches('/'), id)
}

/// A video metadata record.
///
/// The like count is derived from the set of users who liked the video, so the
/// two can never disagree. The set is only reachable through [`Video::add_liker`]
/// and [`Video::remove_liker`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Video {
    pub id: i64,
    pub title: String,
    pub duration: i64,
    pub location: Option<String>,
    pub subject: Option<String>,
    pub content_type: Option<String>,
    pub data_url: Option<String>,
    liked_by: BTreeSet<String>,
}

impl Video {
    pub fn new(title: impl Into<String>, duration: i64) -> Self {
        Self {
            id: UNASSIGNED_VIDEO_ID,
            title: title.into(),
            duration,
            location: None,
            subject: None,
            content_type: None,
            data_url: None,
            liked_by: BTreeSet::new(),
        }
    }

    /// Replace the liker set wholesale (used when rehydrating from storage).
    pub fn with_liked_by<I, S>(mut self, likers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.liked_by = likers.into_iter().map(Into::into).collect();
        self
    }

    pub fn has_id(&self) -> bool {
        self.id != UNASSIGNED_VIDEO_ID
    }

    pub fn likes(&self) -> u64 {
        self.liked_by.len() as u64
    }

    pub fn liked_by(&self) -> &BTreeSet<String> {
        &self.liked_by
    }

    pub fn is_liked_by(&self, user: &str) -> bool {
        self.liked_by.contains(user)
    }

    /// Returns `false` if the user had already liked the video.
    pub fn add_liker(&mut self, user: &str) -> bool {
        self.liked_by.insert(user.to_string())
    }

    /// Returns `false` if the user had not liked the video.
    pub fn remove_liker(&mut self, user: &str) -> bool {
        self.liked_by.remove(user)
    }
}

/// Request body for adding a video.
///
/// Fields a client cannot set (`likes`, `dataUrl`) are ignored if present.
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewVideo {
    /// Leave unset (or 0) to have the store assign one
    #[serde(default)]
    pub id: i64,
    pub title: String,
    /// Length in seconds
    pub duration: i64,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default)]
    pub content_type: Option<String>,
}

impl NewVideo {
    pub fn validate(&self) -> Result<(), AppError> {
        if self.id < 0 {
            return Err(AppError::InvalidInput(
                "Video id must not be negative".to_string(),
            ));
        }
        if self.duration < 0 {
            return Err(AppError::InvalidInput(
                "Video duration must not be negative".to_string(),
            ));
        }
        Ok(())
    }
}

impl From<NewVideo> for Video {
    fn from(new: NewVideo) -> Self {
        Video {
            id: new.id,
            location: new.location,
            subject: new.subject,
            content_type: new.content_type,
            ..Video::new(new.title, new.duration)
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VideoResponse {
    pub id: i64,
    pub title: String,
    pub duration: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_url: Option<String>,
    pub likes: u64,
}

impl From<Video> for VideoResponse {
    fn from(video: Video) -> Self {
        let likes = video.likes();
        VideoResponse {
            id: video.id,
            title: video.title,
            duration: video.duration,
            location: video.location,
            subject: video.subject,
            content_type: video.content_type,
            data_url: video.data_url,
            likes,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VideoState {
    Ready,
}

impl Display for VideoState {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            VideoState::Ready => write!(f, "READY"),
        }
    }
}

/// Outcome of a data upload
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
pub struct VideoStatus {
    pub state: VideoState,
}

impl VideoStatus {
    pub fn ready() -> Self {
        Self {
            state: VideoState::Ready,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_video_has_no_likes() {
        let video = Video::new("a", 10);
        assert!(!video.has_id());
        assert_eq!(video.likes(), 0);
        assert!(video.liked_by().is_empty());
    }

    #[test]
    fn test_add_liker_is_guarded() {
        let mut video = Video::new("a", 10);
        assert!(video.add_liker("bob"));
        assert!(!video.add_liker("bob"));
        assert_eq!(video.likes(), 1);
        assert!(video.is_liked_by("bob"));
    }

    #[test]
    fn test_remove_liker_is_guarded() {
        let mut video = Video::new("a", 10);
        assert!(!video.remove_liker("bob"));
        video.add_liker("bob");
        video.add_liker("alice");
        assert!(video.remove_liker("bob"));
        assert_eq!(video.likes(), 1);
        assert!(!video.remove_liker("bob"));
        assert_eq!(video.likes(), 1);
    }

    #[test]
    fn test_with_liked_by_deduplicates() {
        let video = Video::new("a", 10).with_liked_by(["bob", "alice", "bob"]);
        assert_eq!(video.likes(), 2);
        assert_eq!(
            video.liked_by().iter().cloned().collect::<Vec<_>>(),
            vec!["alice".to_string(), "bob".to_string()]
        );
    }

    #[test]
    fn test_data_url_for() {
        assert_eq!(data_url_for("", 7), "/video/7/data");
        assert_eq!(
            data_url_for("http://localhost:8080/", 7),
            "http://localhost:8080/video/7/data"
        );
    }

    #[test]
    fn test_new_video_ignores_client_only_fields() {
        let new: NewVideo = serde_json::from_value(serde_json::json!({
            "title": "clip",
            "duration": 42,
            "contentType": "video/mp4",
            "likes": 99,
            "dataUrl": "http://evil/video/1/data"
        }))
        .unwrap();
        assert_eq!(new.id, UNASSIGNED_VIDEO_ID);

        let video = Video::from(new);
        assert_eq!(video.content_type.as_deref(), Some("video/mp4"));
        assert_eq!(video.likes(), 0);
        assert_eq!(video.data_url, None);
    }

    #[test]
    fn test_new_video_rejects_negative_duration() {
        let new = NewVideo {
            id: 0,
            title: "a".to_string(),
            duration: -1,
            location: None,
            subject: None,
            content_type: None,
        };
        assert!(matches!(new.validate(), Err(AppError::InvalidInput(_))));
    }

    #[test]
    fn test_video_response_serializes_camel_case() {
        let mut video = Video::new("a", 10);
        video.id = 3;
        video.content_type = Some("video/mp4".to_string());
        video.data_url = Some(data_url_for("", 3));
        video.add_liker("bob");

        let json = serde_json::to_value(VideoResponse::from(video)).unwrap();
        assert_eq!(json["id"], 3);
        assert_eq!(json["contentType"], "video/mp4");
        assert_eq!(json["dataUrl"], "/video/3/data");
        assert_eq!(json["likes"], 1);
        assert!(json.get("likedBy").is_none());
        assert!(json.get("location").is_none());
    }

    #[test]
    fn test_video_status_wire_format() {
        let json = serde_json::to_value(VideoStatus::ready()).unwrap();
        assert_eq!(json, serde_json::json!({ "state": "READY" }));
    }
}
