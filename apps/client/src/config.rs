use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000/api";
const DEFAULT_TOKEN_STORE_PATH: &str = ".client/session.json";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Client configuration loaded from environment variables.
/// Every variable has a default, so a bare environment is valid.
#[derive(Debug, Clone)]
pub struct Config {
    pub api_base_url: String,
    pub token_store_path: PathBuf,
    pub request_timeout: Duration,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let timeout_secs = match std::env::var("REQUEST_TIMEOUT_SECS") {
            Ok(raw) => raw
                .parse::<u64>()
                .context("REQUEST_TIMEOUT_SECS must be a whole number of seconds")?,
            Err(_) => DEFAULT_TIMEOUT_SECS,
        };

        Ok(Config {
            api_base_url: std::env::var("API_BASE_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or_else(|_| DEFAULT_API_BASE_URL.to_string()),
            token_store_path: std::env::var("TOKEN_STORE_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(DEFAULT_TOKEN_STORE_PATH)),
            request_timeout: Duration::from_secs(timeout_secs),
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }

    #[cfg(test)]
    pub fn for_base_url(base_url: impl Into<String>) -> Self {
        Config {
            api_base_url: base_url.into(),
            token_store_path: PathBuf::from(DEFAULT_TOKEN_STORE_PATH),
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            rust_log: "info".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_for_base_url_uses_thirty_second_timeout() {
        let config = Config::for_base_url("http://api.test");
        assert_eq!(config.api_base_url, "http://api.test");
        assert_eq!(config.request_timeout, Duration::from_secs(30));
    }
}
