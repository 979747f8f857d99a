//! Client configuration.
//!
//! Loads configuration from environment variables with sensible defaults.

use crate::error::ClientError;
use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;
use std::time::Duration;
use ticketdesk_core::Locale;
use ticketdesk_maps::MapsConfig;

/// Default backend API root
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:5000/api";
/// Default quiet period of debounced searches
pub const DEFAULT_SEARCH_DEBOUNCE: Duration = Duration::from_millis(300);

/// Client configuration loaded from environment variables.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Backend API root; resources live under `{api_base_url}/{resource}`
    pub api_base_url: String,
    /// Interface language, sent as `Accept-Language`
    pub locale: Locale,
    /// Per-request timeout; requests wait indefinitely when absent
    pub request_timeout: Option<Duration>,
    /// File backing the durable key-value storage
    pub storage_path: PathBuf,
    /// Quiet period of debounced searches
    pub search_debounce: Duration,
    /// Map SDK and geocoder configuration
    pub maps: MapsConfig,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            locale: Locale::default(),
            request_timeout: None,
            storage_path: PathBuf::from(".ticketdesk/storage.json"),
            search_debounce: DEFAULT_SEARCH_DEBOUNCE,
            maps: MapsConfig::default(),
        }
    }
}

impl ClientConfig {
    /// Load configuration from environment variables.
    ///
    /// | Variable | Default |
    /// |----------|---------|
    /// | `TICKETDESK_API_URL` | `http://localhost:5000/api` |
    /// | `TICKETDESK_LOCALE` | `ru` |
    /// | `TICKETDESK_REQUEST_TIMEOUT_MS` | none |
    /// | `TICKETDESK_STORAGE_PATH` | `.ticketdesk/storage.json` |
    /// | `TICKETDESK_SEARCH_DEBOUNCE_MS` | `300` |
    ///
    /// Map settings are read by [`MapsConfig::from_env`]. Unparseable values
    /// fall back to their defaults.
    #[must_use]
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            api_base_url: env::var("TICKETDESK_API_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or(defaults.api_base_url),
            locale: env::var("TICKETDESK_LOCALE")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.locale),
            request_timeout: env::var("TICKETDESK_REQUEST_TIMEOUT_MS")
                .ok()
                .and_then(|s| s.parse::<u64>().ok())
                .filter(|&ms| ms > 0)
                .map(Duration::from_millis),
            storage_path: env::var("TICKETDESK_STORAGE_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.storage_path),
            search_debounce: env::var("TICKETDESK_SEARCH_DEBOUNCE_MS")
                .ok()
                .and_then(|s| s.parse::<u64>().ok())
                .map_or(defaults.search_debounce, Duration::from_millis),
            maps: MapsConfig::from_env(),
        }
    }

    /// Set the API root.
    #[must_use]
    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Set the interface language.
    #[must_use]
    pub const fn with_locale(mut self, locale: Locale) -> Self {
        self.locale = locale;
        self
    }

    /// Set a per-request timeout.
    #[must_use]
    pub const fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    /// Set the storage file.
    #[must_use]
    pub fn with_storage_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.storage_path = path.into();
        self
    }

    /// Set the debounce quiet period.
    #[must_use]
    pub const fn with_search_debounce(mut self, delay: Duration) -> Self {
        self.search_debounce = delay;
        self
    }

    /// Set the map configuration.
    #[must_use]
    pub fn with_maps(mut self, maps: MapsConfig) -> Self {
        self.maps = maps;
        self
    }

    /// Check that the API root is an absolute http(s) URL.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Config`] describing the first problem found.
    pub fn validate(&self) -> Result<(), ClientError> {
        let url = Url::parse(&self.api_base_url)
            .map_err(|e| ClientError::Config(format!("api_base_url {}: {e}", self.api_base_url)))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ClientError::Config(format!(
                "api_base_url must be http or https, got {}",
                url.scheme()
            )));
        }
        Ok(())
    }
}
