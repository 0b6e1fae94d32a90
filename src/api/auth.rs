use log::{debug, info, warn};
use reqwest::Client;
use serde_json::Value;

use super::error::{ConnectionError, Result};
use super::models::Credentials;

/// Password-grant client for the OAuth2 token endpoint
#[derive(Debug, Clone)]
pub struct AuthClient {
    client: Client,
    token_url: String,
}

impl AuthClient {
    pub fn new(client: Client, token_url: impl Into<String>) -> Self {
        Self {
            client,
            token_url: token_url.into(),
        }
    }

    pub fn token_url(&self) -> &str {
        &self.token_url
    }

    /// Exchange the credentials for a fresh access token
    ///
    /// The password sent is the configured password followed by
    /// `current_token`. The status code is not checked: a body without
    /// `access_token` is reported as [`ConnectionError::MissingField`].
    pub async fn refresh(&self, credentials: &Credentials, current_token: &str) -> Result<String> {
        info!("Refreshing access token for {}", credentials.user_key);

        let password = format!("{}{}", credentials.refresh_token, current_token);
        let response = self
            .client
            .post(&self.token_url)
            .form(&[
                ("grant_type", "password"),
                ("client_id", credentials.client_id.as_str()),
                ("client_secret", credentials.client_secret.as_str()),
                ("username", credentials.user_key.as_str()),
                ("password", password.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();
        debug!("Token request status: {}", status);

        let body = response.text().await?;
        let token_data: Value = serde_json::from_str(&body)?;

        match token_data.get("access_token").and_then(Value::as_str) {
            Some(access_token) => {
                debug!("Access token obtained from refresh response");
                Ok(access_token.to_string())
            }
            None => {
                warn!("Token refresh failed ({}): {}", status, body);
                Err(ConnectionError::MissingField("access_token"))
            }
        }
    }
}
