//! Video data storage setup

use anyhow::{Context, Result};
use std::sync::Arc;
use videosvc_core::Config;
use videosvc_storage::{create_storage, VideoDataStorage};

pub async fn setup_storage(config: &Config) -> Result<Arc<dyn VideoDataStorage>> {
    let storage = create_storage(config)
        .await
        .context("Failed to initialize video data storage")?;

    tracing::info!(
        backend = %storage.backend_type(),
        path = %config.local_storage_path,
        "Video data storage initialized"
    );

    Ok(storage)
}
