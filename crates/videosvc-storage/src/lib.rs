//! videosvc storage library
//!
//! Holds the raw bytes uploaded for each video. Backends implement
//! [`VideoDataStorage`]; [`create_storage`] picks one from configuration.
//!
//! # Storage key format
//!
//! Every backend addresses a video's bytes by `videos/video{id}.mpg`. Key
//! generation lives in the `keys` module so all backends stay consistent.

pub mod factory;
pub(crate) mod keys;
#[cfg(feature = "storage-local")]
pub mod local;
pub mod memory;
pub mod traits;

// Re-export commonly used types
pub use factory::create_storage;
#[cfg(feature = "storage-local")]
pub use local::LocalStorage;
pub use memory::MemoryStorage;
pub use traits::{ByteStream, DataReader, StorageError, StorageResult, VideoDataStorage};
pub use videosvc_core::StorageBackend;
