//! API Constants and URL builders for the sObject REST API

/// OAuth2 token endpoint used for the password grant
pub const AUTH_URL: &str = "https://login.salesforce.com/services/oauth2/token";

/// Default REST API version
pub const DEFAULT_API_VERSION: &str = "39.0";

/// Base path for the versioned data API
pub const API_BASE_PATH: &str = "/services/data";

/// Abort a recent-records query once more ids than this have been collected
pub const MASS_UPDATE_THRESHOLD: usize = 25_000;

/// Length of the rolling "recently modified" window
pub const QUERY_WINDOW_HOURS: i64 = 24;

/// Field the server uses for a record's identifier
pub const RECORD_ID_FIELD: &str = "Id";

pub const USER_AGENT: &str = "sf-connection/0.1";

/// Full API path with version
pub fn api_path(api_version: &str) -> String {
    format!("{}/v{}", API_BASE_PATH, api_version)
}

/// Build the sObject collection endpoint URL (trailing slash included)
pub fn sobject_endpoint(base_url: &str, api_version: &str, object: &str) -> String {
    format!("{}{}/sobjects/{}/", base_url, api_path(api_version), object)
}

/// Build a single record endpoint URL
pub fn sobject_record_endpoint(base_url: &str, api_version: &str, object: &str, id: &str) -> String {
    format!("{}{}", sobject_endpoint(base_url, api_version, object), id)
}

/// Build the "updated records" endpoint URL for the given window
///
/// `start` and `end` must already be URL-safe.
pub fn updated_endpoint(base_url: &str, api_version: &str, object: &str, start: &str, end: &str) -> String {
    format!(
        "{}updated/?start={}&end={}",
        sobject_endpoint(base_url, api_version, object),
        start,
        end
    )
}
