use crate::auth::UserContext;
use crate::error::{ErrorResponse, HttpAppError, ValidatedPath};
use crate::state::AppState;
use axum::{
    body::Body,
    extract::{Multipart, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use futures::TryStreamExt;
use std::sync::Arc;
use tokio_util::io::StreamReader;
use videosvc_core::{AppError, VideoStatus};

/// Name of the multipart field carrying the video bytes.
const DATA_FIELD: &str = "data";
const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

#[utoipa::path(
    post,
    path = "/video/{id}/data",
    tag = "video-data",
    params(
        ("id" = i64, Path, description = "Video ID")
    ),
    request_body(content = inline(Object), content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Data stored", body = VideoStatus),
        (status = 400, description = "Missing 'data' field", body = ErrorResponse),
        (status = 404, description = "Video not found", body = ErrorResponse),
        (status = 413, description = "Upload too large"),
        (status = 500, description = "Storage unavailable", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip(state, user, multipart), fields(user = %user.username, video_id = id))]
pub async fn upload_video_data(
    user: UserContext,
    ValidatedPath(id): ValidatedPath<i64>,
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, HttpAppError> {
    // Unknown ids are rejected before any bytes are read.
    state.store.get(id).await?;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::InvalidInput(format!("Failed to read multipart: {}", e)))?
    {
        if field.name() != Some(DATA_FIELD) {
            continue;
        }

        let reader = StreamReader::new(field.map_err(std::io::Error::other));
        let size = state.storage.save(id, Box::pin(reader)).await?;

        tracing::info!(
            video_id = id,
            size_bytes = size,
            backend = %state.storage.backend_type(),
            "Video data stored"
        );
        return Ok(Json(VideoStatus::ready()));
    }

    Err(AppError::BadRequest(format!("Missing multipart field '{}'", DATA_FIELD)).into())
}

#[utoipa::path(
    get,
    path = "/video/{id}/data",
    tag = "video-data",
    params(
        ("id" = i64, Path, description = "Video ID")
    ),
    responses(
        (status = 200, description = "Video bytes, served with the video's content type"),
        (status = 404, description = "Video or its data not found", body = ErrorResponse),
        (status = 500, description = "Storage unavailable", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip(state, user), fields(user = %user.username, video_id = id))]
pub async fn download_video_data(
    user: UserContext,
    ValidatedPath(id): ValidatedPath<i64>,
    State(state): State<Arc<AppState>>,
) -> Result<Response, HttpAppError> {
    let video = state.store.get(id).await?;
    let stream = state.storage.serve(id).await?;

    let content_type = video
        .content_type
        .unwrap_or_else(|| DEFAULT_CONTENT_TYPE.to_string());

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, content_type)
        .body(Body::from_stream(stream))
        .map_err(|e| {
            tracing::error!(error = %e, video_id = id, "Failed to build data response");
            HttpAppError(AppError::Internal("Failed to build response".to_string()))
        })
}
