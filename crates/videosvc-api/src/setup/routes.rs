//! Route configuration and setup

use crate::api_doc::ApiDoc;
use crate::auth::{auth_middleware, AuthState};
use crate::handlers;
use crate::middleware::request_id_middleware;
use crate::state::AppState;
use axum::{
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method},
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_rapidoc::RapiDoc;
use videosvc_core::Config;

/// Setup all application routes
pub fn setup_routes(state: Arc<AppState>) -> Result<Router<()>, anyhow::Error> {
    let config = &state.config;
    let cors = setup_cors(config)?;
    let auth_state = Arc::new(AuthState {
        jwt: state.auth.jwt.clone(),
    });

    let protected_routes = protected_routes().route_layer(
        axum::middleware::from_fn_with_state(auth_state, auth_middleware),
    );

    let app = public_routes()
        .merge(protected_routes)
        .merge(RapiDoc::new("/api/openapi.json").path("/docs"))
        .layer(DefaultBodyLimit::max(config.max_video_size_bytes))
        .layer(RequestBodyLimitLayer::new(config.max_video_size_bytes))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .layer(axum::middleware::from_fn(request_id_middleware))
        .with_state(state);

    Ok(app)
}

/// Setup CORS configuration
fn setup_cors(config: &Config) -> Result<CorsLayer, anyhow::Error> {
    let cors = if config.cors_origins.iter().any(|o| o == "*") {
        tracing::warn!("CORS configured to allow all origins - not recommended for production");
        CorsLayer::new().allow_origin(Any)
    } else {
        let origins = config
            .cors_origins
            .iter()
            .map(|o| {
                o.parse::<HeaderValue>()
                    .map_err(|e| anyhow::anyhow!("Invalid CORS origin '{}': {}", o, e))
            })
            .collect::<Result<Vec<_>, _>>()?;
        CorsLayer::new().allow_origin(origins)
    };

    Ok(cors
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any))
}

/// Public routes (no authentication required)
fn public_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/health", get(handlers::health::liveness_check))
        .route("/oauth/token", post(handlers::oauth::issue_token))
        .route(
            "/api/openapi.json",
            get(|| async { Json(ApiDoc::openapi()) }),
        )
}

/// Protected routes (require a bearer token)
fn protected_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/video",
            get(handlers::videos::list_videos).post(handlers::videos::add_video),
        )
        .route("/video/{id}", get(handlers::videos::get_video))
        .route(
            "/video/search/findByTitle",
            get(handlers::videos::find_by_title),
        )
        .route(
            "/video/search/findByDurationLessThan",
            get(handlers::videos::find_by_duration_less_than),
        )
        .route("/video/{id}/like", post(handlers::likes::like_video))
        .route("/video/{id}/unlike", post(handlers::likes::unlike_video))
        .route("/video/{id}/likedby", get(handlers::likes::liked_by))
        .route(
            "/video/{id}/data",
            get(handlers::video_data::download_video_data)
                .post(handlers::video_data::upload_video_data),
        )
}
