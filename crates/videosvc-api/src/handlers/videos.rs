use crate::auth::UserContext;
use crate::error::{ErrorResponse, HttpAppError, ValidatedJson, ValidatedPath};
use crate::state::AppState;
use axum::{
    extract::{rejection::QueryRejection, Query, State},
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use std::sync::Arc;
use utoipa::IntoParams;
use videosvc_core::{NewVideo, Video, VideoResponse};

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct TitleQuery {
    /// Exact, case-sensitive title
    pub title: String,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct DurationQuery {
    /// Upper bound (exclusive)
    pub duration: i64,
}

fn to_responses(videos: Vec<Video>) -> Vec<VideoResponse> {
    videos.into_iter().map(VideoResponse::from).collect()
}

#[utoipa::path(
    get,
    path = "/video",
    tag = "videos",
    responses(
        (status = 200, description = "All videos", body = Vec<VideoResponse>),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip(state, user), fields(user = %user.username, operation = "list_videos"))]
pub async fn list_videos(
    user: UserContext,
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpAppError> {
    let videos = state.store.list().await?;
    Ok(Json(to_responses(videos)))
}

#[utoipa::path(
    post,
    path = "/video",
    tag = "videos",
    request_body = NewVideo,
    responses(
        (status = 200, description = "Stored video with its id and data URL", body = VideoResponse),
        (status = 400, description = "Invalid video metadata", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip(state, user, body), fields(user = %user.username, operation = "add_video"))]
pub async fn add_video(
    user: UserContext,
    State(state): State<Arc<AppState>>,
    ValidatedJson(body): ValidatedJson<NewVideo>,
) -> Result<impl IntoResponse, HttpAppError> {
    let video = state.store.add(body).await?;
    Ok(Json(VideoResponse::from(video)))
}

#[utoipa::path(
    get,
    path = "/video/{id}",
    tag = "videos",
    params(
        ("id" = i64, Path, description = "Video ID")
    ),
    responses(
        (status = 200, description = "Video found", body = VideoResponse),
        (status = 404, description = "Video not found", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip(state, user), fields(user = %user.username, video_id = id, operation = "get_video"))]
pub async fn get_video(
    user: UserContext,
    ValidatedPath(id): ValidatedPath<i64>,
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpAppError> {
    let video = state.store.get(id).await?;
    Ok(Json(VideoResponse::from(video)))
}

#[utoipa::path(
    get,
    path = "/video/search/findByTitle",
    tag = "videos",
    params(TitleQuery),
    responses(
        (status = 200, description = "Videos with exactly this title", body = Vec<VideoResponse>),
        (status = 400, description = "Missing title parameter", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip(state, user, query), fields(user = %user.username, operation = "find_by_title"))]
pub async fn find_by_title(
    user: UserContext,
    State(state): State<Arc<AppState>>,
    query: Result<Query<TitleQuery>, QueryRejection>,
) -> Result<impl IntoResponse, HttpAppError> {
    let Query(query) = query?;
    let videos = state.store.find_by_title(&query.title).await?;
    Ok(Json(to_responses(videos)))
}

#[utoipa::path(
    get,
    path = "/video/search/findByDurationLessThan",
    tag = "videos",
    params(DurationQuery),
    responses(
        (status = 200, description = "Videos strictly shorter than the bound", body = Vec<VideoResponse>),
        (status = 400, description = "Missing or malformed duration", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip(state, user, query), fields(user = %user.username, operation = "find_by_duration_less_than"))]
pub async fn find_by_duration_less_than(
    user: UserContext,
    State(state): State<Arc<AppState>>,
    query: Result<Query<DurationQuery>, QueryRejection>,
) -> Result<impl IntoResponse, HttpAppError> {
    let Query(query) = query?;
    let videos = state
        .store
        .find_by_duration_less_than(query.duration)
        .await?;
    Ok(Json(to_responses(videos)))
}
