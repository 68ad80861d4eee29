//! Database repositories for data access layer
//!
//! Repositories hold video records and their liker sets. The in-memory
//! repository is always available; the PostgreSQL one is behind the
//! `postgres` feature.

pub mod video;

pub use video::{
    EngagementTracker, InMemoryVideoRepository, VideoLocks, VideoRepository, VideoStore,
    DEFAULT_LOCK_STRIPES,
};

#[cfg(feature = "postgres")]
pub use video::PostgresVideoRepository;
