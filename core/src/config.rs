//! Client configuration.
//!
//! Only base URLs and the transport timeout are configurable; access tokens
//! are per-call inputs and never live here.

use std::time::Duration;

use serde::{Deserialize, Serialize};

pub const DEFAULT_CONTROL_BASE_URL: &str = "https://api.ws.sonos.com/control/api/v1";
pub const DEFAULT_AUTH_BASE_URL: &str = "https://api.sonos.com/login/v3";

/// Where requests go and how long the shipped transport waits for them.
///
/// Deserializable so callers can keep it in their own config files; missing
/// fields fall back to the production hosts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub control_base_url: String,
    pub auth_base_url: String,
    pub timeout_secs: Option<u64>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            control_base_url: DEFAULT_CONTROL_BASE_URL.to_string(),
            auth_base_url: DEFAULT_AUTH_BASE_URL.to_string(),
            timeout_secs: Some(30),
        }
    }
}

impl ClientConfig {
    /// Point both APIs at a single host, e.g. a local mock server.
    ///
    /// The control API is expected under `/control/api/v1` and the
    /// authorization API under `/login/v3`, mirroring the vendor's layout.
    pub fn with_host(host: &str) -> Self {
        let host = host.trim_end_matches('/');
        Self {
            control_base_url: format!("{host}/control/api/v1"),
            auth_base_url: format!("{host}/login/v3"),
            ..Self::default()
        }
    }

    pub fn control_base_url(&self) -> &str {
        self.control_base_url.trim_end_matches('/')
    }

    pub fn auth_base_url(&self) -> &str {
        self.auth_base_url.trim_end_matches('/')
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_points_at_production() {
        let config = ClientConfig::default();
        assert_eq!(config.control_base_url(), "https://api.ws.sonos.com/control/api/v1");
        assert_eq!(config.auth_base_url(), "https://api.sonos.com/login/v3");
        assert_eq!(config.timeout(), Some(Duration::from_secs(30)));
    }

    #[test]
    fn trailing_slash_is_stripped() {
        let config = ClientConfig {
            control_base_url: "http://localhost:3000/control/api/v1/".to_string(),
            ..ClientConfig::default()
        };
        assert_eq!(config.control_base_url(), "http://localhost:3000/control/api/v1");
    }

    #[test]
    fn with_host_mirrors_vendor_layout() {
        let config = ClientConfig::with_host("http://127.0.0.1:8080/");
        assert_eq!(config.control_base_url(), "http://127.0.0.1:8080/control/api/v1");
        assert_eq!(config.auth_base_url(), "http://127.0.0.1:8080/login/v3");
    }

    #[test]
    fn partial_json_falls_back_to_defaults() {
        let config: ClientConfig =
            serde_json::from_str(r#"{"timeout_secs":5,"control_base_url":"http://h/api"}"#).unwrap();
        assert_eq!(config.control_base_url(), "http://h/api");
        assert_eq!(config.auth_base_url(), DEFAULT_AUTH_BASE_URL);
        assert_eq!(config.timeout(), Some(Duration::from_secs(5)));
    }
}
