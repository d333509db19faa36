//! Navitime route service configuration

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use url::Url;

use crate::query::RouteQuery;

/// Configuration for the Navitime Route TotalNavi API (served through RapidAPI)
#[derive(Debug, Clone, Deserialize)]
pub struct NavitimeConfig {
    /// RapidAPI key (sensitive - uses `SecretString`)
    #[serde(default = "default_api_key")]
    pub api_key: SecretString,

    /// Value of the `X-RapidAPI-Host` header
    #[serde(default = "default_api_host")]
    pub api_host: String,

    /// Base URL of the API, without trailing path
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Path of the transit route endpoint
    #[serde(default = "default_route_path")]
    pub route_path: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Search window (`term`) in minutes
    #[serde(default = "default_search_window_minutes")]
    pub search_window_minutes: u32,

    /// Maximum number of itineraries (`limit`)
    #[serde(default = "default_result_limit")]
    pub result_limit: u32,

    /// User agent sent with every request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_api_key() -> SecretString {
    SecretString::from(String::new())
}

fn default_api_host() -> String {
    "navitime-route-totalnavi.p.rapidapi.com".to_string()
}

fn default_base_url() -> String {
    "https://navitime-route-totalnavi.p.rapidapi.com".to_string()
}

fn default_route_path() -> String {
    "/route_transit".to_string()
}

const fn default_timeout_secs() -> u64 {
    30
}

const fn default_search_window_minutes() -> u32 {
    1440
}

const fn default_result_limit() -> u32 {
    5
}

fn default_user_agent() -> String {
    concat!("navitime-route/", env!("CARGO_PKG_VERSION")).to_string()
}

impl Default for NavitimeConfig {
    fn default() -> Self {
        Self {
            api_key: default_api_key(),
            api_host: default_api_host(),
            base_url: default_base_url(),
            route_path: default_route_path(),
            timeout_secs: default_timeout_secs(),
            search_window_minutes: default_search_window_minutes(),
            result_limit: default_result_limit(),
            user_agent: default_user_agent(),
        }
    }
}

impl NavitimeConfig {
    /// Create a configuration with the given API key and defaults for everything else
    #[must_use]
    pub fn with_api_key(api_key: impl Into<String>) -> Self {
        Self {
            api_key: SecretString::from(api_key.into()),
            ..Default::default()
        }
    }

    /// Create a configuration suitable for testing
    #[must_use]
    pub fn for_testing() -> Self {
        Self {
            api_key: SecretString::from("test-api-key".to_string()),
            timeout_secs: 5,
            result_limit: 2,
            ..Default::default()
        }
    }

    /// Point the configuration at another base URL (e.g. a mock server)
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Full URL of the route endpoint, without query string
    #[must_use]
    pub fn route_url(&self) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), self.route_path)
    }

    /// Full request URL for a query, exactly as the client sends it
    #[must_use]
    pub fn request_url(&self, query: &RouteQuery) -> String {
        format!("{}?{}", self.route_url(), query.query_string())
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.api_key.expose_secret().trim().is_empty() {
            return Err("api_key must not be empty".to_string());
        }

        if self.api_host.trim().is_empty() {
            return Err("api_host must not be empty".to_string());
        }

        if self.base_url.is_empty() {
            return Err("base_url must not be empty".to_string());
        }

        Url::parse(&self.base_url).map_err(|e| format!("base_url is not a valid URL: {e}"))?;

        if !self.route_path.starts_with('/') {
            return Err("route_path must start with '/'".to_string());
        }

        if self.timeout_secs == 0 {
            return Err("timeout_secs must be greater than 0".to_string());
        }

        if self.search_window_minutes == 0 {
            return Err("search_window_minutes must be greater than 0".to_string());
        }

        if self.result_limit == 0 {
            return Err("result_limit must be greater than 0".to_string());
        }

        Ok(())
    }
}
