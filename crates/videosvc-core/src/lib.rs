//! videosvc core library
//!
//! Domain models, error types and configuration shared by the storage, database
//! and API crates.

pub mod config;
pub mod error;
pub mod models;
pub mod storage_types;

pub use config::{parse_auth_users, Config, UserCredential};
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use models::{NewVideo, Video, VideoResponse, VideoState, VideoStatus};
pub use storage_types::StorageBackend;
