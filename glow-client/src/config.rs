//! Client configuration

use std::path::PathBuf;

/// Configuration for a storefront session
///
/// # Environment variables
///
/// All settings can be provided through the environment:
///
/// | Variable | Default | Purpose |
/// |----------|---------|---------|
/// | API_BASE_URL | http://localhost:3000 | Backend base URL |
/// | AUTH_TOKEN | (none) | Bearer token for authenticated endpoints |
/// | REQUEST_TIMEOUT_SECS | 30 | HTTP request timeout |
/// | STORAGE_PATH | glow-client.redb | Durable snapshot database |
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Backend base URL (e.g. "https://shop.example.com")
    pub base_url: String,
    /// Bearer token for authenticated endpoints (wishlist mutations)
    pub token: Option<String>,
    /// Request timeout in seconds
    pub timeout: u64,
    /// Durable snapshot database path
    pub storage_path: PathBuf,
}

impl ClientConfig {
    /// Create a configuration pointing at the given backend
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            token: None,
            timeout: 30,
            storage_path: PathBuf::from("glow-client.redb"),
        }
    }

    /// Load configuration from environment variables, using defaults for
    /// anything unset
    pub fn from_env() -> Self {
        let mut config = Self::new(
            std::env::var("API_BASE_URL").unwrap_or_else(|_| "http://localhost:3000".into()),
        );
        config.token = std::env::var("AUTH_TOKEN").ok();
        config.timeout = std::env::var("REQUEST_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(30);
        config.storage_path = std::env::var("STORAGE_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("glow-client.redb"));
        config
    }

    /// Set the bearer token
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout = seconds;
        self
    }

    /// Set the snapshot database path
    pub fn with_storage_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.storage_path = path.into();
        self
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new("http://localhost:3000")
    }
}
