use anyhow::{Context, Result};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::api::constants;
use crate::api::{Backoff, ConnectionOptions, ResilienceConfig, RetryConfig};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api_version: String,
    pub auth_url: String,
    pub request_timeout_secs: u64,
    pub connect_timeout_secs: u64,
    pub mass_update_threshold: usize,
    pub retry: RetrySettings,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_version: constants::DEFAULT_API_VERSION.to_string(),
            auth_url: constants::AUTH_URL.to_string(),
            request_timeout_secs: 30,
            connect_timeout_secs: 10,
            mass_update_threshold: constants::MASS_UPDATE_THRESHOLD,
            retry: RetrySettings::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrySettings {
    pub max_attempts: u32,
    pub base_delay_secs: u64,
    pub max_delay_secs: u64,
    pub jitter: bool,
    pub read_backoff: Backoff,
    pub write_backoff: Backoff,
}

impl Default for RetrySettings {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay_secs: 10,
            max_delay_secs: 120,
            jitter: false,
            read_backoff: Backoff::Power,
            write_backoff: Backoff::Multiplicative,
        }
    }
}

impl RetrySettings {
    fn retry_config(&self, backoff: Backoff) -> RetryConfig {
        RetryConfig {
            max_attempts: self.max_attempts,
            base_delay: Duration::from_secs(self.base_delay_secs),
            max_delay: Duration::from_secs(self.max_delay_secs),
            backoff,
            jitter: self.jitter,
        }
    }
}

impl Config {
    pub fn get_config_path() -> Result<PathBuf> {
        // XDG on Linux, Application Support on macOS, AppData on Windows
        let config_dir = dirs::config_dir()
            .context("Failed to get config directory")?
            .join("sf-connection");

        Ok(config_dir.join("config.toml"))
    }

    /// Load from the default location, falling back to defaults when no file exists
    pub fn load() -> Result<Self> {
        let config_path = Self::get_config_path()?;
        Self::load_from(&config_path)
    }

    pub fn load_from(config_path: &Path) -> Result<Self> {
        debug!("Loading config from: {:?}", config_path);

        if !config_path.exists() {
            info!("Config file doesn't exist, using defaults");
            return Ok(Self::default());
        }

        let config_content = fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config file: {:?}", config_path))?;

        let config: Config = toml::from_str(&config_content)
            .with_context(|| format!("Failed to parse config file: {:?}", config_path))?;

        Ok(config)
    }

    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        debug!("Saving config to: {:?}", config_path);

        if let Some(config_dir) = config_path.parent() {
            if !config_dir.exists() {
                fs::create_dir_all(config_dir)
                    .with_context(|| format!("Failed to create config directory: {:?}", config_dir))?;
                info!("Created config directory: {:?}", config_dir);
            }
        }

        let config_content =
            toml::to_string_pretty(self).context("Failed to serialize config to TOML")?;

        fs::write(config_path, config_content)
            .with_context(|| format!("Failed to write config file: {:?}", config_path))?;

        info!("Config saved successfully");
        Ok(())
    }

    pub fn resilience(&self) -> ResilienceConfig {
        ResilienceConfig {
            read: self.retry.retry_config(self.retry.read_backoff),
            write: self.retry.retry_config(self.retry.write_backoff),
        }
    }

    pub fn connection_options(&self) -> ConnectionOptions {
        ConnectionOptions {
            auth_url: self.auth_url.clone(),
            request_timeout: Duration::from_secs(self.request_timeout_secs),
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
            resilience: self.resilience(),
            mass_update_threshold: self.mass_update_threshold,
        }
    }
}
