use axum_test::TestServer;
use serde::Serialize;

use super::TEST_CLIENT_ID;

#[derive(Serialize)]
pub struct TokenForm<'a> {
    pub grant_type: &'a str,
    pub username: &'a str,
    pub password: &'a str,
    pub client_id: &'a str,
}

impl<'a> TokenForm<'a> {
    pub fn password(username: &'a str, password: &'a str) -> Self {
        Self {
            grant_type: "password",
            username,
            password,
            client_id: TEST_CLIENT_ID,
        }
    }
}

/// Obtain a bearer token through `/oauth/token`.
pub async fn login(client: &TestServer, username: &str, password: &str) -> String {
    let response = client
        .post("/oauth/token")
        .form(&TokenForm::password(username, password))
        .await;
    assert_eq!(response.status_code(), 200, "login failed for {}", username);

    let body: serde_json::Value = response.json();
    body["access_token"]
        .as_str()
        .expect("Expected 'access_token' in token response")
        .to_string()
}

pub fn bearer(token: &str) -> String {
    format!("Bearer {}", token)
}
