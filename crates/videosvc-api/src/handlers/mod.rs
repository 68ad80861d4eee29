pub mod health;
pub mod likes;
pub mod oauth;
pub mod video_data;
pub mod videos;
