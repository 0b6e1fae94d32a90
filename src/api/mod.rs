//! sObject REST API client
//!
//! A [`Connection`] wraps one authenticated session against one object
//! endpoint: token refresh, the rolling "recently modified" window, retrying
//! GET/POST/PATCH calls and pagination of `updated` queries.

pub mod auth;
pub mod client;
pub mod constants;
pub mod date_range;
pub mod error;
pub mod models;
pub mod resilience;

pub use auth::AuthClient;
pub use client::{Connection, ConnectionOptions};
pub use date_range::{DateRange, format_date};
pub use error::{ConnectionError, Result};
pub use models::{Credentials, Record, UpdatedPage};
pub use resilience::{Backoff, ResilienceConfig, RetryConfig, RetryPolicy};
