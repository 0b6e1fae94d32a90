//! Credential loading from the environment or a `.env` file

pub mod credentials;
