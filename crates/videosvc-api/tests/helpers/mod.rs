//! Test helpers: build the app on the in-memory repository and memory storage.
//!
//! No external services are needed: `cargo test -p videosvc-api`.

#![allow(dead_code)]

pub mod auth;

use axum_test::TestServer;
use std::sync::Arc;
use videosvc_api::setup;
use videosvc_api::state::AppState;
use videosvc_core::Config;
use videosvc_db::InMemoryVideoRepository;
use videosvc_storage::MemoryStorage;

pub const TEST_JWT_SECRET: &str = "test-jwt-secret-at-least-32-characters-long";
pub const TEST_CLIENT_ID: &str = "mobile";

pub fn test_config() -> Config {
    let vars = [
        ("JWT_SECRET", TEST_JWT_SECRET),
        ("AUTH_USERS", "bob:builder,alice:wonderland"),
        ("OAUTH_CLIENT_ID", TEST_CLIENT_ID),
        ("STORAGE_BACKEND", "memory"),
        ("PUBLIC_BASE_URL", "http://localhost:8080"),
    ];
    Config::from_lookup(|key| {
        vars.iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.to_string())
    })
    .expect("test config should parse")
}

/// Test application: server plus the state behind it.
pub struct TestApp {
    pub server: TestServer,
    pub state: Arc<AppState>,
}

impl TestApp {
    pub fn client(&self) -> &TestServer {
        &self.server
    }
}

pub fn setup_test_app() -> TestApp {
    let (state, router) = setup::build_app(
        test_config(),
        Arc::new(InMemoryVideoRepository::new()),
        Arc::new(MemoryStorage::new()),
    )
    .expect("Failed to build app");

    let server = TestServer::new(router.into_make_service()).expect("Failed to create test server");
    TestApp { server, state }
}
