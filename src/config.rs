//! Client configuration sourced from the environment.

use anyhow::{Context, Result};

/// Connection settings for the LeanKit service.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Base address of the service, without a trailing slash.
    pub base_url: String,
    pub username: String,
    pub password: String,
}

impl Config {
    pub fn new(base_url: impl Into<String>, username: impl Into<String>, password: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            base_url,
            username: username.into(),
            password: password.into(),
        }
    }

    /// Reads the configuration from `LEANKIT_URL`, `LEANKITUSERNAME` and
    /// `LEANKITPASSWORD`. A missing variable is an error; callers are expected
    /// to treat it as fatal at startup.
    pub fn from_env() -> Result<Self> {
        let base_url =
            std::env::var("LEANKIT_URL").context("LEANKIT_URL environment variable is not set")?;
        let username = std::env::var("LEANKITUSERNAME")
            .context("LEANKITUSERNAME environment variable is not set")?;
        let password = std::env::var("LEANKITPASSWORD")
            .context("LEANKITPASSWORD environment variable is not set")?;
        Ok(Self::new(base_url, username, password))
    }
}
