//! Application settings resolved at build time.
//!
//! The backend address comes from `MLCOMPARE_API_URL` when the crate is compiled
//! (the browser build has no process environment to read at runtime). Everything
//! else is a fixed UX constant exposed here so it is visible and overridable in
//! tests.

use std::time::Duration;

use api::{ClientConfig, DEFAULT_BASE_URL, DEFAULT_REQUEST_TIMEOUT};

/// Pause between the upload finishing and the results appearing.
pub const DEFAULT_SETTLE_DELAY: Duration = Duration::from_millis(1500);

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub api_base_url: String,
    pub request_timeout: Duration,
    pub settle_delay: Duration,
}

impl AppConfig {
    pub fn from_build_env() -> Self {
        let api_base_url = option_env!("MLCOMPARE_API_URL")
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .unwrap_or(DEFAULT_BASE_URL)
            .to_string();

        Self {
            api_base_url,
            ..Self::default()
        }
    }

    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }

    pub fn client_config(&self) -> ClientConfig {
        ClientConfig::default()
            .with_base_url(self.api_base_url.clone())
            .with_request_timeout(self.request_timeout)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            settle_delay: DEFAULT_SETTLE_DELAY,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_backend_contract() {
        let config = AppConfig::default();
        assert_eq!(config.api_base_url, "http://localhost:8000");
        assert_eq!(config.request_timeout, Duration::from_secs(300));
        assert_eq!(config.settle_delay, Duration::from_millis(1500));
    }

    #[test]
    fn client_config_carries_transport_settings() {
        let config = AppConfig::default().with_api_base_url("http://ml.internal:8080");
        let client = config.client_config();
        assert_eq!(client.base_url, "http://ml.internal:8080");
        assert_eq!(client.request_timeout, config.request_timeout);
    }
}
