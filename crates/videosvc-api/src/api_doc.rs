//! OpenAPI documentation, served at `/api/openapi.json` and browsable at `/docs`.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::auth;
use crate::error;
use crate::handlers;
use videosvc_core::models;

/// Registers the bearer scheme referenced by the `/video` operations.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Video Service API",
        version = "0.1.0",
        description = "Video metadata, likes and video data upload/download. Obtain a token from /oauth/token and send it as a Bearer token to every /video endpoint."
    ),
    paths(
        // Videos
        handlers::videos::list_videos,
        handlers::videos::add_video,
        handlers::videos::get_video,
        handlers::videos::find_by_title,
        handlers::videos::find_by_duration_less_than,
        // Likes
        handlers::likes::like_video,
        handlers::likes::unlike_video,
        handlers::likes::liked_by,
        // Video data
        handlers::video_data::upload_video_data,
        handlers::video_data::download_video_data,
        // Auth
        handlers::oauth::issue_token,
        handlers::health::liveness_check,
    ),
    components(
        schemas(
            models::NewVideo,
            models::VideoResponse,
            models::VideoState,
            models::VideoStatus,
            auth::TokenRequest,
            auth::TokenResponse,
            error::ErrorResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "videos", description = "Video metadata and derived queries"),
        (name = "likes", description = "Per-user likes"),
        (name = "video-data", description = "Video byte upload and download"),
        (name = "auth", description = "OAuth2 password grant"),
        (name = "health", description = "Liveness"),
    )
)]
pub struct ApiDoc;
