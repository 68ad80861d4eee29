//! Application state shared by all handlers.

use crate::auth::{JwtService, UserDirectory};
use std::sync::Arc;
use videosvc_core::Config;
use videosvc_db::{EngagementTracker, VideoStore};
use videosvc_storage::VideoDataStorage;

/// Token issuing: the user directory plus the signer used by `/oauth/token`.
#[derive(Clone)]
pub struct AuthConfig {
    pub users: Arc<UserDirectory>,
    pub jwt: Arc<JwtService>,
    pub client_id: String,
}

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub store: VideoStore,
    pub engagement: EngagementTracker,
    pub storage: Arc<dyn VideoDataStorage>,
    pub auth: AuthConfig,
}
