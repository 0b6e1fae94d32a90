//! Resilience configuration with builder pattern
//!
//! Read (GET) and write (POST/PATCH) requests keep independent retry
//! settings and independent backoff state.

use super::retry::{Backoff, RetryConfig, RetryPolicy};
use std::time::Duration;

/// Retry configuration for both request paths of a connection
#[derive(Debug, Clone, PartialEq)]
pub struct ResilienceConfig {
    pub read: RetryConfig,
    pub write: RetryConfig,
}

impl Default for ResilienceConfig {
    fn default() -> Self {
        Self {
            read: RetryConfig::reads(),
            write: RetryConfig::writes(),
        }
    }
}

impl ResilienceConfig {
    /// Create a new builder for ResilienceConfig
    pub fn builder() -> ResilienceConfigBuilder {
        ResilienceConfigBuilder::new()
    }

    /// Same backoff formula on both paths
    pub fn unified(backoff: Backoff) -> Self {
        Self::builder().backoff(backoff).build()
    }

    /// No retries at all (for testing)
    pub fn disabled() -> Self {
        Self {
            read: RetryConfig::disabled(),
            write: RetryConfig::disabled(),
        }
    }

    pub fn read_policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.read.clone())
    }

    pub fn write_policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.write.clone())
    }
}

/// Builder for ResilienceConfig
///
/// Setters apply to both paths unless named `read_*` / `write_*`.
#[derive(Debug)]
pub struct ResilienceConfigBuilder {
    config: ResilienceConfig,
}

impl ResilienceConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: ResilienceConfig::default(),
        }
    }

    /// Set max attempts (including the first one)
    pub fn max_attempts(mut self, attempts: u32) -> Self {
        self.config.read.max_attempts = attempts;
        self.config.write.max_attempts = attempts;
        self
    }

    pub fn base_delay(mut self, delay: Duration) -> Self {
        self.config.read.base_delay = delay;
        self.config.write.base_delay = delay;
        self
    }

    pub fn max_delay(mut self, delay: Duration) -> Self {
        self.config.read.max_delay = delay;
        self.config.write.max_delay = delay;
        self
    }

    pub fn jitter(mut self, enabled: bool) -> Self {
        self.config.read.jitter = enabled;
        self.config.write.jitter = enabled;
        self
    }

    pub fn backoff(self, backoff: Backoff) -> Self {
        self.read_backoff(backoff).write_backoff(backoff)
    }

    pub fn read_backoff(mut self, backoff: Backoff) -> Self {
        self.config.read.backoff = backoff;
        self
    }

    pub fn write_backoff(mut self, backoff: Backoff) -> Self {
        self.config.write.backoff = backoff;
        self
    }

    /// Build the final configuration
    pub fn build(self) -> ResilienceConfig {
        self.config
    }
}

impl Default for ResilienceConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_keeps_path_specific_backoff() {
        let config = ResilienceConfig::default();

        assert_eq!(config.read.max_attempts, 3);
        assert_eq!(config.write.max_attempts, 3);
        assert_eq!(config.read.backoff, Backoff::Power);
        assert_eq!(config.write.backoff, Backoff::Multiplicative);
        assert_eq!(config.read.base_delay, Duration::from_secs(10));
    }

    #[test]
    fn test_disabled_config() {
        let config = ResilienceConfig::disabled();

        assert_eq!(config.read.max_attempts, 1);
        assert_eq!(config.write.max_attempts, 1);
    }

    #[test]
    fn test_unified_backoff() {
        let config = ResilienceConfig::unified(Backoff::Exponential { multiplier: 2.0 });

        assert_eq!(config.read.backoff, config.write.backoff);
    }

    #[test]
    fn test_builder_pattern() {
        let config = ResilienceConfig::builder()
            .max_attempts(5)
            .base_delay(Duration::from_millis(1))
            .write_backoff(Backoff::Power)
            .jitter(true)
            .build();

        assert_eq!(config.read.max_attempts, 5);
        assert_eq!(config.write.base_delay, Duration::from_millis(1));
        assert_eq!(config.read.backoff, Backoff::Power);
        assert_eq!(config.write.backoff, Backoff::Power);
        assert!(config.read.jitter && config.write.jitter);
    }
}
