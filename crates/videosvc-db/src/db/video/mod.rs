mod engagement;
mod locks;
mod memory;
#[cfg(feature = "postgres")]
mod postgres;
mod repository;
mod store;

pub use engagement::EngagementTracker;
pub use locks::{VideoLocks, DEFAULT_LOCK_STRIPES};
pub use memory::InMemoryVideoRepository;
#[cfg(feature = "postgres")]
pub use postgres::PostgresVideoRepository;
pub use repository::VideoRepository;
pub use store::VideoStore;
