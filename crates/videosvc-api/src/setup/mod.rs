//! Application setup and initialization

pub mod database;
pub mod routes;
pub mod server;
pub mod storage;

use crate::auth::{JwtService, UserDirectory};
use crate::state::{AppState, AuthConfig};
use anyhow::{Context, Result};
use std::sync::Arc;
use videosvc_core::Config;
use videosvc_db::{EngagementTracker, VideoLocks, VideoRepository, VideoStore};
use videosvc_storage::VideoDataStorage;

/// Assemble state from an already-built repository and storage backend.
pub fn build_state(
    config: Config,
    repo: Arc<dyn VideoRepository>,
    storage: Arc<dyn VideoDataStorage>,
) -> Result<Arc<AppState>> {
    let locks = VideoLocks::default();
    let store = VideoStore::new(repo.clone(), locks.clone(), config.public_base_url.clone());
    let engagement = EngagementTracker::new(repo, locks);

    let users = UserDirectory::new(&config.auth_users)
        .map_err(|e| anyhow::anyhow!("Failed to build user directory: {}", e))?;
    tracing::info!(users = users.len(), "User directory loaded");

    let auth = AuthConfig {
        users: Arc::new(users),
        jwt: Arc::new(JwtService::new(&config.jwt_secret, config.jwt_expiry_hours)),
        client_id: config.oauth_client_id.clone(),
    };

    Ok(Arc::new(AppState {
        config,
        store,
        engagement,
        storage,
        auth,
    }))
}

/// Build the router for the given parts. Used by `initialize_app` and by tests.
pub fn build_app(
    config: Config,
    repo: Arc<dyn VideoRepository>,
    storage: Arc<dyn VideoDataStorage>,
) -> Result<(Arc<AppState>, axum::Router)> {
    let state = build_state(config, repo, storage)?;
    let router = routes::setup_routes(state.clone())?;
    Ok((state, router))
}

/// Initialize the entire application
pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, axum::Router)> {
    // Fail fast on misconfiguration
    config.validate().context("Configuration validation failed")?;

    crate::telemetry::init_telemetry(config.is_production())
        .context("Failed to initialize telemetry")?;

    tracing::info!(
        environment = %config.environment,
        "Configuration loaded and validated successfully"
    );

    let repo = database::setup_repository(&config).await?;
    let storage = storage::setup_storage(&config).await?;

    build_app(config, repo, storage)
}
