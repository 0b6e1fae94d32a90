use anyhow::Result;
use log::info;
use std::path::Path;

use crate::api::Credentials;

pub const DOMAIN_VAR: &str = "SF_DOMAIN";
pub const ACCESS_TOKEN_VAR: &str = "SF_ACCESS_TOKEN";
pub const CLIENT_ID_VAR: &str = "SF_CLIENT_ID";
pub const CLIENT_SECRET_VAR: &str = "SF_CLIENT_SECRET";
pub const USER_KEY_VAR: &str = "SF_USER_KEY";
pub const REFRESH_TOKEN_VAR: &str = "SF_REFRESH_TOKEN";

impl Credentials {
    pub fn from_env() -> Result<Credentials> {
        info!("Importing credentials from environment variables");
        Self::read_vars(|name| {
            std::env::var(name)
                .map_err(|_| anyhow::anyhow!("{} environment variable not set", name))
        })
    }

    /// Load a `.env` file into the process environment, then read the credentials from it
    ///
    /// Variables already set in the environment take precedence over the file.
    pub fn from_env_file(path: &str) -> Result<Credentials> {
        info!("Importing credentials from .env file: {}", path);

        if !Path::new(path).exists() {
            anyhow::bail!("Environment file not found: {}", path);
        }

        dotenvy::from_path(path)
            .map_err(|e| anyhow::anyhow!("Failed to load .env file '{}': {}", path, e))?;

        Self::read_vars(|name| {
            std::env::var(name)
                .map_err(|_| anyhow::anyhow!("{} not found in .env file: {}", name, path))
        })
    }

    fn read_vars(var: impl Fn(&str) -> Result<String>) -> Result<Credentials> {
        Ok(Credentials {
            domain: var(DOMAIN_VAR)?,
            access_token: var(ACCESS_TOKEN_VAR)?,
            client_id: var(CLIENT_ID_VAR)?,
            client_secret: var(CLIENT_SECRET_VAR)?,
            user_key: var(USER_KEY_VAR)?,
            refresh_token: var(REFRESH_TOKEN_VAR)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const ALL_VARS: [&str; 6] = [
        DOMAIN_VAR,
        ACCESS_TOKEN_VAR,
        CLIENT_ID_VAR,
        CLIENT_SECRET_VAR,
        USER_KEY_VAR,
        REFRESH_TOKEN_VAR,
    ];

    #[test]
    fn test_from_env() {
        temp_env::with_vars(
            [
                (DOMAIN_VAR, Some("https://www.test_domain.com")),
                (ACCESS_TOKEN_VAR, Some("security_token")),
                (CLIENT_ID_VAR, Some("consumer_key")),
                (CLIENT_SECRET_VAR, Some("consumer_secret")),
                (USER_KEY_VAR, Some("user_name")),
                (REFRESH_TOKEN_VAR, Some("password")),
            ],
            || {
                let credentials = Credentials::from_env().unwrap();
                assert_eq!(credentials.domain, "https://www.test_domain.com");
                assert_eq!(credentials.user_key, "user_name");
                assert_eq!(credentials.refresh_token, "password");
            },
        );
    }

    #[test]
    fn test_from_env_reports_missing_variable() {
        temp_env::with_vars(
            [
                (DOMAIN_VAR, Some("https://www.test_domain.com")),
                (ACCESS_TOKEN_VAR, Some("security_token")),
                (CLIENT_ID_VAR, None),
                (CLIENT_SECRET_VAR, Some("consumer_secret")),
                (USER_KEY_VAR, Some("user_name")),
                (REFRESH_TOKEN_VAR, Some("password")),
            ],
            || {
                let error = Credentials::from_env().unwrap_err();
                assert!(error.to_string().contains(CLIENT_ID_VAR));
            },
        );
    }

    #[test]
    fn test_from_env_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "SF_DOMAIN=https://www.test_domain.com").unwrap();
        writeln!(file, "SF_ACCESS_TOKEN=security_token").unwrap();
        writeln!(file, "SF_CLIENT_ID=consumer_key").unwrap();
        writeln!(file, "SF_CLIENT_SECRET=consumer_secret").unwrap();
        writeln!(file, "SF_USER_KEY=user_name").unwrap();
        writeln!(file, "SF_REFRESH_TOKEN=password").unwrap();

        let path = file.path().to_str().unwrap().to_string();
        temp_env::with_vars_unset(ALL_VARS, || {
            let credentials = Credentials::from_env_file(&path).unwrap();
            assert_eq!(credentials.client_id, "consumer_key");
            assert_eq!(credentials.client_secret, "consumer_secret");
        });
    }

    #[test]
    fn test_from_missing_env_file() {
        let error = Credentials::from_env_file("/nonexistent/.env").unwrap_err();
        assert!(error.to_string().contains("not found"));
    }
}
