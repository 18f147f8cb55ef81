use std::env;
use std::time::Duration;

use anyhow::{Context, Result};

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the booking API, including any version prefix
    pub api_url: String,

    /// SQLite database holding the session and the quote cache
    pub store_url: String,

    /// Maximum number of quotes kept in the local quote cache
    pub store_max_entries: usize,

    /// Request timeout; the HTTP client's default when unset
    pub http_timeout: Option<Duration>,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        Ok(Config {
            api_url: env::var("CANCHAS_API_URL")
                .unwrap_or_else(|_| "http://localhost:8000/api/v1".to_string()),

            store_url: env::var("CANCHAS_STORE_URL")
                .unwrap_or_else(|_| "sqlite:data/canchas.db".to_string()),

            store_max_entries: env::var("CANCHAS_STORE_MAX_ENTRIES")
                .unwrap_or_else(|_| "512".to_string())
                .parse()
                .context("CANCHAS_STORE_MAX_ENTRIES must be a valid number")?,

            http_timeout: match env::var("CANCHAS_HTTP_TIMEOUT_SECS") {
                Ok(raw) => Some(Duration::from_secs(
                    raw.parse()
                        .context("CANCHAS_HTTP_TIMEOUT_SECS must be a valid number")?,
                )),
                Err(_) => None,
            },
        })
    }
}
