//! Shared key generation for storage backends.
//!
//! Key format: `videos/video{id}.mpg`, relative to the backend root.

/// Generate the storage key holding the bytes of the given video.
pub fn video_data_key(video_id: i64) -> String {
    format!("videos/video{}.mpg", video_id)
}
