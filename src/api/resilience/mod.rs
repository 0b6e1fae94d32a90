//! Retry policies and their configuration

pub mod config;
pub mod retry;

pub use config::{ResilienceConfig, ResilienceConfigBuilder};
pub use retry::{Backoff, RetryConfig, RetryPolicy};
