//! OAuth2 password grant token endpoint.

use crate::auth::models::{BEARER_TOKEN_TYPE, PASSWORD_GRANT};
use crate::auth::{TokenRequest, TokenResponse};
use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;
use axum::{
    extract::{rejection::FormRejection, State},
    response::IntoResponse,
    Form, Json,
};
use std::sync::Arc;
use subtle::ConstantTimeEq;
use videosvc_core::AppError;

fn secure_compare(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.as_bytes().ct_eq(b.as_bytes()).into()
}

#[utoipa::path(
    post,
    path = "/oauth/token",
    tag = "auth",
    request_body(content = TokenRequest, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 200, description = "Access token issued", body = TokenResponse),
        (status = 400, description = "Unsupported grant type or malformed form", body = ErrorResponse),
        (status = 401, description = "Invalid client or credentials", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, form), fields(operation = "issue_token"))]
pub async fn issue_token(
    State(state): State<Arc<AppState>>,
    form: Result<Form<TokenRequest>, FormRejection>,
) -> Result<impl IntoResponse, HttpAppError> {
    let Form(request) = form?;

    if request.grant_type != PASSWORD_GRANT {
        return Err(AppError::BadRequest(format!(
            "Unsupported grant_type '{}'",
            request.grant_type
        ))
        .into());
    }

    let client_id = request.client_id.as_deref().unwrap_or_default();
    if !secure_compare(client_id, &state.auth.client_id) {
        tracing::warn!(client_id = %client_id, "Token request with unknown client id");
        return Err(AppError::Unauthorized("Invalid client".to_string()).into());
    }

    if !state.auth.users.verify(&request.username, &request.password) {
        tracing::warn!(user = %request.username, "Invalid credentials");
        return Err(AppError::Unauthorized("Invalid username or password".to_string()).into());
    }

    let access_token = state.auth.jwt.issue_token(&request.username, client_id)?;
    tracing::info!(user = %request.username, "Access token issued");

    Ok(Json(TokenResponse {
        access_token,
        token_type: BEARER_TOKEN_TYPE.to_string(),
        expires_in: state.auth.jwt.expires_in(),
    }))
}
