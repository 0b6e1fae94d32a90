use std::time::Duration;

use log::{debug, error, info, warn};
use reqwest::{Client, Method, RequestBuilder, StatusCode, Url};
use serde::Serialize;
use serde_json::Value;

use super::auth::AuthClient;
use super::constants;
use super::date_range::DateRange;
use super::error::{ConnectionError, Result};
use super::models::{Credentials, Record, UpdatedPage};
use super::resilience::ResilienceConfig;

/// Tunables for a [`Connection`]
#[derive(Debug, Clone)]
pub struct ConnectionOptions {
    pub auth_url: String,
    pub request_timeout: Duration,
    pub connect_timeout: Duration,
    pub resilience: ResilienceConfig,
    pub mass_update_threshold: usize,
}

impl Default for ConnectionOptions {
    fn default() -> Self {
        Self {
            auth_url: constants::AUTH_URL.to_string(),
            request_timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
            resilience: ResilienceConfig::default(),
            mass_update_threshold: constants::MASS_UPDATE_THRESHOLD,
        }
    }
}

/// Authenticated session against one sObject endpoint
///
/// Methods that may refresh the access token take `&mut self`.
pub struct Connection {
    http_client: Client,
    auth: AuthClient,
    credentials: Credentials,
    instance_url: String,
    access_token: String,
    api_version: String,
    obj_endpoint: String,
    date_range: DateRange,
    resilience: ResilienceConfig,
    mass_update_threshold: usize,
}

impl Connection {
    /// Connect with default options
    pub async fn connect(
        credentials: Credentials,
        obj_endpoint: impl Into<String>,
        api_version: impl Into<String>,
    ) -> Result<Self> {
        Self::with_options(credentials, obj_endpoint, api_version, ConnectionOptions::default()).await
    }

    /// Build the HTTP client, refresh the access token and compute the query window
    pub async fn with_options(
        credentials: Credentials,
        obj_endpoint: impl Into<String>,
        api_version: impl Into<String>,
        options: ConnectionOptions,
    ) -> Result<Self> {
        let http_client = Client::builder()
            .timeout(options.request_timeout)
            .connect_timeout(options.connect_timeout)
            .user_agent(constants::USER_AGENT)
            .build()?;

        let mut connection = Self {
            auth: AuthClient::new(http_client.clone(), options.auth_url),
            http_client,
            instance_url: credentials.domain.trim_end_matches('/').to_string(),
            access_token: credentials.access_token.clone(),
            credentials,
            api_version: api_version.into(),
            obj_endpoint: obj_endpoint.into(),
            date_range: DateRange::last_24_hours(),
            resilience: options.resilience,
            mass_update_threshold: options.mass_update_threshold,
        };

        connection.refresh_token().await?;
        connection.refresh_date_range();

        info!(
            "Connected to {} ({} v{})",
            connection.instance_url, connection.obj_endpoint, connection.api_version
        );
        Ok(connection)
    }

    pub fn access_token(&self) -> &str {
        &self.access_token
    }

    pub fn instance_url(&self) -> &str {
        &self.instance_url
    }

    pub fn api_version(&self) -> &str {
        &self.api_version
    }

    pub fn obj_endpoint(&self) -> &str {
        &self.obj_endpoint
    }

    pub fn start_date(&self) -> &str {
        &self.date_range.start
    }

    pub fn end_date(&self) -> &str {
        &self.date_range.end
    }

    pub fn date_range(&self) -> &DateRange {
        &self.date_range
    }

    /// Replace the access token with a freshly issued one
    pub async fn refresh_token(&mut self) -> Result<()> {
        let token = self.auth.refresh(&self.credentials, &self.access_token).await?;
        self.access_token = token;
        Ok(())
    }

    /// Recompute the query window so it ends now
    pub fn refresh_date_range(&mut self) {
        self.date_range = DateRange::last_24_hours();
        debug!(
            "Query window set to {} .. {}",
            self.date_range.start, self.date_range.end
        );
    }

    /// GET a URL and decode the JSON body
    ///
    /// Returns `Ok(None)` when `url` cannot be parsed. Timeouts are retried
    /// according to the read policy. A 401 refreshes the token once and
    /// re-issues the request.
    pub async fn get_or_retry(&mut self, url: &str) -> Result<Option<Value>> {
        let url = match Url::parse(url) {
            Ok(url) => url,
            Err(e) => {
                warn!("Skipping malformed URL '{}': {}", url, e);
                return Ok(None);
            }
        };

        let mut refreshed = false;
        loop {
            let (status, body) = self.send_get(&url).await?;

            if status == StatusCode::UNAUTHORIZED {
                if refreshed {
                    error!("Still unauthorized after token refresh: {}", url);
                    return Err(ConnectionError::Unauthorized);
                }
                info!("refreshing token...");
                self.refresh_token().await?;
                refreshed = true;
                continue;
            }

            return read_json(status, body).map(Some);
        }
    }

    /// Fetch one record by id
    ///
    /// Returns `None` unless the response carries an `Id` field.
    pub async fn query_single_object(&mut self, id: &str) -> Result<Option<Record>> {
        let url = constants::sobject_record_endpoint(
            &self.instance_url,
            &self.api_version,
            &self.obj_endpoint,
            id,
        );

        match self.get_or_retry(&url).await? {
            Some(Value::Object(record)) if record.contains_key(constants::RECORD_ID_FIELD) => {
                Ok(Some(record))
            }
            _ => {
                debug!("No {} record returned for {}", self.obj_endpoint, id);
                Ok(None)
            }
        }
    }

    /// Ids of every record modified within the query window, in page order
    ///
    /// Fails with [`ConnectionError::MassUpdate`] as soon as the collected ids
    /// exceed the mass-update threshold.
    pub async fn query_recent_records(&mut self) -> Result<Vec<String>> {
        let mut ids = Vec::new();
        let mut next_url = Some(constants::updated_endpoint(
            &self.instance_url,
            &self.api_version,
            &self.obj_endpoint,
            &self.date_range.start,
            &self.date_range.end,
        ));

        while let Some(url) = next_url.take() {
            let body = match self.get_or_retry(&url).await? {
                Some(body) if !body.is_null() => body,
                _ => break,
            };

            let page: UpdatedPage = serde_json::from_value(body)?;
            debug!("Fetched {} ids from {}", page.ids.len(), url);
            ids.extend(page.ids);

            if ids.len() > self.mass_update_threshold {
                warn!(
                    "Mass update detected on {}: {} ids exceed threshold of {}",
                    self.obj_endpoint,
                    ids.len(),
                    self.mass_update_threshold
                );
                return Err(ConnectionError::MassUpdate { count: ids.len() });
            }

            next_url = page.next_records_url.map(|cursor| self.resolve_cursor(&cursor));
        }

        info!("Found {} recently modified {} records", ids.len(), self.obj_endpoint);
        Ok(ids)
    }

    /// Create a record from form fields, returning the server's `success` flag
    pub async fn create_record<T: Serialize + ?Sized>(&self, data: &T) -> Result<bool> {
        let url = constants::sobject_endpoint(&self.instance_url, &self.api_version, &self.obj_endpoint);

        let (status, body) = self.send_write(Method::POST, &url, data).await?;
        let body = read_json(status, body)?;

        body.get("success")
            .and_then(Value::as_bool)
            .ok_or(ConnectionError::MissingField("success"))
    }

    /// Update a record's fields. Returns `true` when the server accepted it.
    ///
    /// The body of a 2xx response is ignored.
    pub async fn update_record<T: Serialize + ?Sized>(&self, id: &str, data: &T) -> Result<bool> {
        let url = constants::sobject_record_endpoint(
            &self.instance_url,
            &self.api_version,
            &self.obj_endpoint,
            id,
        );

        let (status, body) = self.send_write(Method::PATCH, &url, data).await?;
        ensure_success(status, body)?;
        debug!("Updated {} record {}", self.obj_endpoint, id);
        Ok(true)
    }

    async fn send_get(&self, url: &Url) -> Result<(StatusCode, String)> {
        let policy = self.resilience.read_policy();
        let client = &self.http_client;
        let token = self.access_token.as_str();

        policy
            .execute(|| fetch(client.get(url.clone()).bearer_auth(token)))
            .await
    }

    async fn send_write<T: Serialize + ?Sized>(
        &self,
        method: Method,
        url: &str,
        data: &T,
    ) -> Result<(StatusCode, String)> {
        let policy = self.resilience.write_policy();
        let client = &self.http_client;
        let token = self.access_token.as_str();

        policy
            .execute(|| fetch(client.request(method.clone(), url).bearer_auth(token).form(data)))
            .await
    }

    /// Cursors may be server-relative paths
    fn resolve_cursor(&self, cursor: &str) -> String {
        if cursor.starts_with('/') {
            format!("{}{}", self.instance_url, cursor)
        } else {
            cursor.to_string()
        }
    }
}

/// Send a request and read the whole body
///
/// The request timeout covers the body as well, so both steps run inside
/// one retry attempt.
async fn fetch(request: RequestBuilder) -> Result<(StatusCode, String)> {
    let response = request.send().await?;
    let status = response.status();
    let body = response.text().await?;
    Ok((status, body))
}

/// Turn a non-2xx response into [`ConnectionError::Http`]
fn ensure_success(status: StatusCode, body: String) -> Result<String> {
    if !status.is_success() {
        error!("Request failed with status {}: {}", status, body);
        return Err(ConnectionError::Http {
            status: status.as_u16(),
            body,
        });
    }
    Ok(body)
}

/// Decode the JSON body of a successful response
fn read_json(status: StatusCode, body: String) -> Result<Value> {
    let body = ensure_success(status, body)?;

    if body.trim().is_empty() {
        return Ok(Value::Null);
    }

    Ok(serde_json::from_str(&body)?)
}
