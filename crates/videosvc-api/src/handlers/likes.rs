//! Like / unlike endpoints. The liking user is always the authenticated caller.

use crate::auth::UserContext;
use crate::error::{ErrorResponse, HttpAppError, ValidatedPath};
use crate::state::AppState;
use axum::{
    extract::State,
    response::IntoResponse,
    Json,
};
use std::sync::Arc;
use videosvc_core::VideoResponse;

#[utoipa::path(
    post,
    path = "/video/{id}/like",
    tag = "likes",
    params(
        ("id" = i64, Path, description = "Video ID")
    ),
    responses(
        (status = 200, description = "Video liked", body = VideoResponse),
        (status = 400, description = "Video already liked by this user", body = ErrorResponse),
        (status = 404, description = "Video not found", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip(state, user), fields(user = %user.username, video_id = id))]
pub async fn like_video(
    user: UserContext,
    ValidatedPath(id): ValidatedPath<i64>,
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpAppError> {
    let video = state.engagement.like(id, &user.username).await?;
    Ok(Json(VideoResponse::from(video)))
}

#[utoipa::path(
    post,
    path = "/video/{id}/unlike",
    tag = "likes",
    params(
        ("id" = i64, Path, description = "Video ID")
    ),
    responses(
        (status = 200, description = "Like removed", body = VideoResponse),
        (status = 400, description = "Video not liked by this user", body = ErrorResponse),
        (status = 404, description = "Video not found", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip(state, user), fields(user = %user.username, video_id = id))]
pub async fn unlike_video(
    user: UserContext,
    ValidatedPath(id): ValidatedPath<i64>,
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpAppError> {
    let video = state.engagement.unlike(id, &user.username).await?;
    Ok(Json(VideoResponse::from(video)))
}

#[utoipa::path(
    get,
    path = "/video/{id}/likedby",
    tag = "likes",
    params(
        ("id" = i64, Path, description = "Video ID")
    ),
    responses(
        (status = 200, description = "Usernames that liked the video, sorted", body = Vec<String>),
        (status = 404, description = "Video not found", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip(state, user), fields(user = %user.username, video_id = id))]
pub async fn liked_by(
    user: UserContext,
    ValidatedPath(id): ValidatedPath<i64>,
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpAppError> {
    let users = state.engagement.liked_by(id).await?;
    Ok(Json(users))
}
