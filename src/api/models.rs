use serde::Deserialize;
use serde_json::{Map, Value};

/// A record as returned by the API. The shape is not validated locally.
pub type Record = Map<String, Value>;

/// Credentials for one org/property
#[derive(Debug, Clone, Deserialize)]
pub struct Credentials {
    /// Instance URL, e.g. `https://na1.my.salesforce.com`
    pub domain: String,
    pub access_token: String,
    /// Connected-app consumer key
    pub client_id: String,
    /// Connected-app consumer secret
    pub client_secret: String,
    /// Login user name
    pub user_key: String,
    /// Login password. The current access token is appended to it on refresh.
    pub refresh_token: String,
}

/// One page of an `updated` query
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdatedPage {
    #[serde(default)]
    pub ids: Vec<String>,
    #[serde(rename = "nextRecordsUrl")]
    pub next_records_url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_updated_page_without_cursor() {
        let page: UpdatedPage = serde_json::from_value(json!({"ids": ["1234", "3456"]})).unwrap();
        assert_eq!(page.ids, vec!["1234", "3456"]);
        assert!(page.next_records_url.is_none());
    }

    #[test]
    fn test_updated_page_missing_ids_is_empty() {
        let page: UpdatedPage = serde_json::from_value(json!({"nextRecordsUrl": "/next"})).unwrap();
        assert!(page.ids.is_empty());
        assert_eq!(page.next_records_url.as_deref(), Some("/next"));
    }
}
