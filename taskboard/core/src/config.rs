use reqwest::Url;
use serde::{Deserialize, Serialize};

use crate::error::ApiError;

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000";
pub const DEFAULT_PAGE_SIZE: u32 = 10;
pub const MAX_PAGE_SIZE: u32 = 100;

/// Settings for talking to the task API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base address of the API, e.g. `https://tasks.example.com`.
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    #[serde(default = "default_page_size")]
    pub page_size: u32,
    /// Cookie the CSRF token is read from.
    #[serde(default = "default_csrf_cookie_name")]
    pub csrf_cookie_name: String,
    /// Header the CSRF token is sent in on mutating requests.
    #[serde(default = "default_csrf_header_name")]
    pub csrf_header_name: String,
    /// Ignored in the browser, where fetch has no timeout knob.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            page_size: default_page_size(),
            csrf_cookie_name: default_csrf_cookie_name(),
            csrf_header_name: default_csrf_header_name(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

impl ClientConfig {
    /// Loads configuration from `TASKBOARD_*` environment variables,
    /// e.g. `TASKBOARD_API_BASE_URL`.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn from_env() -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::Environment::with_prefix("TASKBOARD").try_parsing(true))
            .build()?;

        Self::from_settings(settings)
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn from_settings(settings: config::Config) -> Result<Self, config::ConfigError> {
        settings.try_deserialize()
    }

    /// Configuration baked in at compile time, used by the browser build.
    pub fn from_build_env() -> Self {
        match option_env!("TASKBOARD_API_BASE_URL") {
            Some(url) => Self::default().with_api_base_url(url),
            None => Self::default(),
        }
    }

    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }

    /// Page size clamped to what the API accepts.
    pub fn effective_page_size(&self) -> u32 {
        self.page_size.clamp(1, MAX_PAGE_SIZE)
    }

    /// Parses the base address, making sure it ends with `/` so relative
    /// paths are joined under it rather than replacing its last segment.
    pub fn base_url(&self) -> Result<Url, ApiError> {
        let mut raw = self.api_base_url.trim().to_string();
        if !raw.ends_with('/') {
            raw.push('/');
        }
        let url = Url::parse(&raw)
            .map_err(|err| ApiError::Config(format!("invalid api_base_url {raw:?}: {err}")))?;
        if url.cannot_be_a_base() {
            return Err(ApiError::Config(format!(
                "api_base_url {raw:?} cannot be used as a base address"
            )));
        }
        Ok(url)
    }
}

fn default_api_base_url() -> String {
    DEFAULT_API_BASE_URL.to_string()
}

fn default_page_size() -> u32 {
    DEFAULT_PAGE_SIZE
}

fn default_csrf_cookie_name() -> String {
    "csrftoken".to_string()
}

fn default_csrf_header_name() -> String {
    "X-CSRFToken".to_string()
}

fn default_request_timeout_secs() -> u64 {
    30
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn can_fill_missing_fields_with_defaults() {
        let config: ClientConfig =
            serde_json::from_str(r#"{"api_base_url": "https://tasks.example.com"}"#).unwrap();

        assert_eq!(config.api_base_url, "https://tasks.example.com");
        assert_eq!(config.page_size, DEFAULT_PAGE_SIZE);
        assert_eq!(config.csrf_cookie_name, "csrftoken");
        assert_eq!(config.csrf_header_name, "X-CSRFToken");
        assert_eq!(config.request_timeout_secs, 30);
    }

    #[test]
    fn can_load_from_config_sources() {
        let settings = config::Config::builder()
            .set_override("api_base_url", "http://127.0.0.1:9000")
            .unwrap()
            .set_override("page_size", 25)
            .unwrap()
            .build()
            .unwrap();

        let config = ClientConfig::from_settings(settings).unwrap();

        assert_eq!(config.api_base_url, "http://127.0.0.1:9000");
        assert_eq!(config.page_size, 25);
        assert_eq!(config.csrf_header_name, "X-CSRFToken");
    }

    #[test]
    fn can_keep_path_prefix_of_base_url() {
        let config = ClientConfig::default().with_api_base_url("https://example.com/backend");

        let url = config.base_url().unwrap().join("api/tasks/").unwrap();

        assert_eq!(url.as_str(), "https://example.com/backend/api/tasks/");
    }

    #[test]
    fn can_reject_invalid_base_url() {
        let config = ClientConfig::default().with_api_base_url("not a url");

        assert!(matches!(config.base_url(), Err(ApiError::Config(_))));
    }

    #[test]
    fn can_clamp_page_size() {
        let mut config = ClientConfig::default();
        config.page_size = 0;
        assert_eq!(config.effective_page_size(), 1);
        config.page_size = 1000;
        assert_eq!(config.effective_page_size(), MAX_PAGE_SIZE);
    }
}
