//! Bounded retry with pluggable backoff
//!
//! Retries only transient failures (timeouts). Every other error is returned
//! on the attempt that produced it.

use std::future::Future;
use std::time::Duration;

use log::{debug, warn};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::api::error::{ConnectionError, Result};

/// How the wait between attempts grows
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Backoff {
    /// `base ^ attempt` seconds: 10s, 100s, ...
    Power,
    /// Cumulative multiply by the attempt number: 10s, 20s, 60s, ...
    Multiplicative,
    /// `base * multiplier ^ (attempt - 1)`
    Exponential { multiplier: f64 },
}

/// Configuration for retry behavior
#[derive(Debug, Clone, PartialEq)]
pub struct RetryConfig {
    pub max_attempts: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
    pub backoff: Backoff,
    pub jitter: bool,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self::reads()
    }
}

impl RetryConfig {
    /// GET path: three attempts, wait raised to a growing power
    pub fn reads() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_secs(10),
            max_delay: Duration::from_secs(120),
            backoff: Backoff::Power,
            jitter: false,
        }
    }

    /// POST/PATCH path: three attempts, wait multiplied by the attempt count
    pub fn writes() -> Self {
        Self {
            backoff: Backoff::Multiplicative,
            ..Self::reads()
        }
    }

    /// Single attempt, no waiting
    pub fn disabled() -> Self {
        Self {
            max_attempts: 1,
            base_delay: Duration::ZERO,
            max_delay: Duration::ZERO,
            backoff: Backoff::Multiplicative,
            jitter: false,
        }
    }
}

/// Retry policy shared by the read and write paths
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    config: RetryConfig,
}

impl RetryPolicy {
    pub fn new(config: RetryConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RetryConfig {
        &self.config
    }

    /// Run `operation` until it succeeds, fails permanently, or runs out of attempts
    pub async fn execute<F, Fut, T>(&self, mut operation: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let max_attempts = self.config.max_attempts.max(1);
        let mut attempt = 1;

        loop {
            debug!("Executing request (attempt {}/{})", attempt, max_attempts);

            match operation().await {
                Ok(result) => {
                    if attempt > 1 {
                        debug!("Request succeeded after {} attempts", attempt);
                    }
                    return Ok(result);
                }
                Err(error) if error.is_transient() && attempt < max_attempts => {
                    let delay = self.calculate_delay(attempt);
                    warn!(
                        "Request failed on attempt {} (retrying in {:?}): {}",
                        attempt, delay, error
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(error) => {
                    if error.is_transient() {
                        warn!("Request failed permanently after {} attempts: {}", attempt, error);
                    }
                    return Err(error);
                }
            }
        }
    }

    /// Delay to wait after `attempt` (1-based) has failed
    pub(crate) fn calculate_delay(&self, attempt: u32) -> Duration {
        let base = self.config.base_delay.as_secs_f64();
        let secs = match self.config.backoff {
            Backoff::Power => base.powi(attempt as i32),
            Backoff::Multiplicative => base * (1..=attempt).map(f64::from).product::<f64>(),
            Backoff::Exponential { multiplier } => base * multiplier.powi(attempt as i32 - 1),
        };

        let max_delay = self.config.max_delay;
        let capped = secs.min(max_delay.as_secs_f64()).max(0.0);
        let delay = Duration::try_from_secs_f64(capped).unwrap_or(max_delay);

        if !self.config.jitter {
            return delay;
        }

        // Jitter in 0.5x..=1.5x, computed in whole milliseconds
        let jitter_permille = rand::rng().random_range(500..=1500);
        (delay / 1000).checked_mul(jitter_permille).unwrap_or(delay)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(RetryConfig::default())
    }
}
