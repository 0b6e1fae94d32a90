//! Shared fixtures for the connection integration tests

#![allow(dead_code)]

use mockito::{Matcher, Mock, ServerGuard};
use serde_json::json;
use sf_connection::api::{Connection, ConnectionOptions, Credentials, ResilienceConfig};
use std::time::Duration;

pub const TOKEN_PATH: &str = "/services/oauth2/token";
pub const API_VERSION: &str = "1.0";
pub const OBJ_ENDPOINT: &str = "obj_endpoint";

/// Initial access token handed out with the credentials
pub const INITIAL_TOKEN: &str = "security_token";
/// Token issued by the refresh performed while connecting
pub const FIRST_TOKEN: &str = "token-1";

pub fn credentials(domain: &str) -> Credentials {
    Credentials {
        domain: domain.to_string(),
        access_token: INITIAL_TOKEN.to_string(),
        client_id: "consumer_key".to_string(),
        client_secret: "consumer_secret".to_string(),
        user_key: "user_name".to_string(),
        refresh_token: "password".to_string(),
    }
}

/// Options pointing the token endpoint at `server` with millisecond backoff
pub fn options(server: &ServerGuard) -> ConnectionOptions {
    ConnectionOptions {
        auth_url: format!("{}{}", server.url(), TOKEN_PATH),
        request_timeout: Duration::from_secs(5),
        connect_timeout: Duration::from_secs(2),
        resilience: ResilienceConfig::builder()
            .base_delay(Duration::from_millis(1))
            .max_delay(Duration::from_millis(10))
            .build(),
        ..ConnectionOptions::default()
    }
}

/// Token endpoint that swaps `current_token` for `new_token`
///
/// The password field must be the configured password followed by the
/// current token, so each refresh in a chain hits its own mock.
pub async fn mock_token(server: &mut ServerGuard, current_token: &str, new_token: &str) -> Mock {
    server
        .mock("POST", TOKEN_PATH)
        .match_body(Matcher::AllOf(vec![
            Matcher::UrlEncoded("grant_type".into(), "password".into()),
            Matcher::UrlEncoded("client_id".into(), "consumer_key".into()),
            Matcher::UrlEncoded("client_secret".into(), "consumer_secret".into()),
            Matcher::UrlEncoded("username".into(), "user_name".into()),
            Matcher::UrlEncoded("password".into(), format!("password{}", current_token)),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(json!({ "access_token": new_token }).to_string())
        .expect(1)
        .create_async()
        .await
}

/// Connect against `server`, which serves both the API and the token endpoint
///
/// The returned mock must be kept alive for as long as the server is used.
pub async fn connect(server: &mut ServerGuard) -> (Connection, Mock) {
    let options = options(server);
    connect_with(server, options).await
}

pub async fn connect_with(server: &mut ServerGuard, options: ConnectionOptions) -> (Connection, Mock) {
    let token = mock_token(server, INITIAL_TOKEN, FIRST_TOKEN).await;
    let connection =
        Connection::with_options(credentials(&server.url()), OBJ_ENDPOINT, API_VERSION, options)
            .await
            .expect("connection should refresh its token");
    (connection, token)
}

pub fn record_path(id: &str) -> String {
    format!("/services/data/v{}/sobjects/{}/{}", API_VERSION, OBJ_ENDPOINT, id)
}

pub fn updated_path(connection: &Connection) -> String {
    format!(
        "/services/data/v{}/sobjects/{}/updated/?start={}&end={}",
        API_VERSION,
        OBJ_ENDPOINT,
        connection.start_date(),
        connection.end_date()
    )
}

pub fn bearer(token: &str) -> String {
    format!("Bearer {}", token)
}
