//! OAuth token endpoint integration tests.
//!
//! Run with: `cargo test -p videosvc-api --test auth_test`

mod helpers;

use helpers::auth::{bearer, TokenForm};
use helpers::setup_test_app;
use serde_json::Value;

#[tokio::test]
async fn test_token_issued_for_valid_credentials() {
    let app = setup_test_app();
    let client = app.client();

    let response = client
        .post("/oauth/token")
        .form(&TokenForm::password("bob", "builder"))
        .await;
    assert_eq!(response.status_code(), 200);

    let body: Value = response.json();
    assert_eq!(body["token_type"], "bearer");
    assert_eq!(body["expires_in"], 24 * 3600);

    let token = body["access_token"].as_str().unwrap();
    let claims = app.state.auth.jwt.validate_token(token).unwrap();
    assert_eq!(claims.sub, "bob");
    assert_eq!(claims.client_id, "mobile");

    client
        .get("/video")
        .add_header("Authorization", bearer(token))
        .await
        .assert_status_ok();
}

#[tokio::test]
async fn test_wrong_password_rejected() {
    let app = setup_test_app();
    let response = app
        .client()
        .post("/oauth/token")
        .form(&TokenForm::password("bob", "wonderland"))
        .await;
    assert_eq!(response.status_code(), 401);
}

#[tokio::test]
async fn test_unknown_user_rejected() {
    let app = setup_test_app();
    let response = app
        .client()
        .post("/oauth/token")
        .form(&TokenForm::password("mallory", "builder"))
        .await;
    assert_eq!(response.status_code(), 401);
}

#[tokio::test]
async fn test_wrong_client_id_rejected() {
    let app = setup_test_app();
    let mut form = TokenForm::password("bob", "builder");
    form.client_id = "desktop";

    let response = app.client().post("/oauth/token").form(&form).await;
    assert_eq!(response.status_code(), 401);
}

#[tokio::test]
async fn test_unsupported_grant_type() {
    let app = setup_test_app();
    let mut form = TokenForm::password("bob", "builder");
    form.grant_type = "client_credentials";

    let response = app.client().post("/oauth/token").form(&form).await;
    assert_eq!(response.status_code(), 400);
}

#[tokio::test]
async fn test_openapi_document_served() {
    let app = setup_test_app();
    let response = app.client().get("/api/openapi.json").await;
    assert_eq!(response.status_code(), 200);

    let doc: Value = response.json();
    assert!(doc["paths"]["/video/{id}/like"].is_object());
}
