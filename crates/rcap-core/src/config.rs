//! Client configuration model.

use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_API_URL: &str = "http://localhost:8000/api/v1";
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 30;

/// Settings shared by every front end of the client.
///
/// Loaded from `config.toml`; every field has a default so a missing or
/// partial file is valid.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base URL of the REST API, without a trailing slash.
    #[serde(default = "default_api_url")]
    pub api_url: String,
    /// Path the user is sent to when the server rejects the token.
    #[serde(default = "default_login_route")]
    pub login_route: String,
    #[serde(default = "default_home_route")]
    pub home_route: String,
    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,
    /// No timeout beyond the transport defaults when unset.
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

fn default_login_route() -> String {
    "/auth/login".to_string()
}

fn default_home_route() -> String {
    "/".to_string()
}

fn default_poll_interval_secs() -> u64 {
    DEFAULT_POLL_INTERVAL_SECS
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            login_route: default_login_route(),
            home_route: default_home_route(),
            poll_interval_secs: default_poll_interval_secs(),
            request_timeout_secs: None,
            log_level: default_log_level(),
        }
    }
}

impl ClientConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs.max(1))
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }

    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into().trim_end_matches('/').to_string();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: ClientConfig = toml::from_str(r#"api_url = "https://rcap.example/api/v1""#).unwrap();
        assert_eq!(config.api_url, "https://rcap.example/api/v1");
        assert_eq!(config.poll_interval_secs, 30);
        assert_eq!(config.login_route, "/auth/login");
        assert!(config.request_timeout().is_none());
    }

    #[test]
    fn test_with_api_url_trims_trailing_slash() {
        let config = ClientConfig::default().with_api_url("https://rcap.example/api/v1/");
        assert_eq!(config.api_url, "https://rcap.example/api/v1");
    }
}
