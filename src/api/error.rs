//! Error type for sObject API calls

use thiserror::Error;

/// Convenience alias used throughout the `api` module
pub type Result<T> = std::result::Result<T, ConnectionError>;

#[derive(Debug, Error)]
pub enum ConnectionError {
    /// The request did not complete within the client timeout
    #[error("request timed out: {0}")]
    Timeout(#[source] reqwest::Error),

    /// Any other transport-level failure
    #[error("request failed: {0}")]
    Request(#[source] reqwest::Error),

    /// Still rejected with 401 after a token refresh
    #[error("unauthorized after refreshing the access token")]
    Unauthorized,

    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    /// A required field was absent from a response body
    #[error("response is missing the '{0}' field")]
    MissingField(&'static str),

    #[error("failed to decode response body: {0}")]
    Decode(#[from] serde_json::Error),

    /// Too many records were modified in the query window to process safely
    #[error("mass update detected ({count} records modified). Not processing entire database.")]
    MassUpdate { count: usize },
}

impl ConnectionError {
    /// Only timeouts are worth another attempt
    pub fn is_transient(&self) -> bool {
        matches!(self, ConnectionError::Timeout(_))
    }

    pub fn is_mass_update(&self) -> bool {
        matches!(self, ConnectionError::MassUpdate { .. })
    }
}

impl From<reqwest::Error> for ConnectionError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            ConnectionError::Timeout(error)
        } else {
            ConnectionError::Request(error)
        }
    }
}
