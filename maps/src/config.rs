//! Map SDK and geocoder configuration.
//!
//! Loaded from environment variables with defaults pointing at the vendor's
//! public endpoints.

use crate::error::MapsError;
use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::env;
use ticketdesk_core::Locale;

/// Default SDK script location
pub const DEFAULT_SCRIPT_URL: &str = "https://api-maps.yandex.ru/v3/";
/// Default REST geocoder endpoint
pub const DEFAULT_GEOCODER_URL: &str = "https://geocode-maps.yandex.ru/1.x/";
/// SDK module that binds map primitives into renderable components
pub const DEFAULT_BINDINGS_MODULE: &str = "@yandex/ymaps3-vuefy";
/// SDK module with the default controls (search box, zoom buttons)
pub const DEFAULT_UI_THEME_MODULE: &str = "@yandex/ymaps3-default-ui-theme";

/// Map integration configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapsConfig {
    /// SDK API key
    pub api_key: String,
    /// SDK script URL, without query string
    pub script_url: String,
    /// REST geocoder URL
    pub geocoder_url: String,
    /// Geocoder key; the SDK key is used when absent
    pub geocoder_api_key: Option<String>,
    /// Module imported for the base component set
    pub bindings_module: String,
    /// Module imported for the UI theme component set
    pub ui_theme_module: String,
}

impl Default for MapsConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            script_url: DEFAULT_SCRIPT_URL.to_string(),
            geocoder_url: DEFAULT_GEOCODER_URL.to_string(),
            geocoder_api_key: None,
            bindings_module: DEFAULT_BINDINGS_MODULE.to_string(),
            ui_theme_module: DEFAULT_UI_THEME_MODULE.to_string(),
        }
    }
}

impl MapsConfig {
    /// Load configuration from environment variables.
    ///
    /// | Variable | Default |
    /// |----------|---------|
    /// | `TICKETDESK_MAPS_API_KEY` | empty |
    /// | `TICKETDESK_MAPS_SCRIPT_URL` | [`DEFAULT_SCRIPT_URL`] |
    /// | `TICKETDESK_GEOCODER_URL` | [`DEFAULT_GEOCODER_URL`] |
    /// | `TICKETDESK_GEOCODER_API_KEY` | SDK key |
    #[must_use]
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            api_key: env::var("TICKETDESK_MAPS_API_KEY").unwrap_or(defaults.api_key),
            script_url: env::var("TICKETDESK_MAPS_SCRIPT_URL").unwrap_or(defaults.script_url),
            geocoder_url: env::var("TICKETDESK_GEOCODER_URL").unwrap_or(defaults.geocoder_url),
            geocoder_api_key: env::var("TICKETDESK_GEOCODER_API_KEY")
                .ok()
                .filter(|key| !key.trim().is_empty()),
            ..defaults
        }
    }

    /// Set the SDK API key.
    #[must_use]
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = api_key.into();
        self
    }

    /// Set the geocoder endpoint.
    #[must_use]
    pub fn with_geocoder_url(mut self, url: impl Into<String>) -> Self {
        self.geocoder_url = url.into();
        self
    }

    /// Set a dedicated geocoder key.
    #[must_use]
    pub fn with_geocoder_api_key(mut self, key: impl Into<String>) -> Self {
        self.geocoder_api_key = Some(key.into());
        self
    }

    /// Key sent to the geocoder.
    #[must_use]
    pub fn effective_geocoder_key(&self) -> &str {
        self.geocoder_api_key.as_deref().unwrap_or(&self.api_key)
    }

    /// Full script URL with key and language, e.g.
    /// `https://api-maps.yandex.ru/v3/?apikey=KEY&lang=ru_RU`.
    ///
    /// # Errors
    ///
    /// Returns [`MapsError::Config`] if `script_url` is not a valid URL.
    pub fn script_src(&self, locale: Locale) -> Result<Url, MapsError> {
        Url::parse_with_params(
            &self.script_url,
            &[("apikey", self.api_key.as_str()), ("lang", locale.map_lang())],
        )
        .map_err(|e| MapsError::Config(format!("script url {}: {e}", self.script_url)))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)] // Test code
mod tests {
    use super::*;

    #[test]
    fn test_script_src_carries_key_and_lang() {
        let config = MapsConfig::default().with_api_key("abc");
        assert_eq!(
            config.script_src(Locale::Ru).unwrap().as_str(),
            "https://api-maps.yandex.ru/v3/?apikey=abc&lang=ru_RU"
        );
    }

    #[test]
    fn test_invalid_script_url() {
        let config = MapsConfig {
            script_url: "not a url".to_string(),
            ..MapsConfig::default()
        };
        assert!(matches!(config.script_src(Locale::En), Err(MapsError::Config(_))));
    }

    #[test]
    fn test_geocoder_key_falls_back_to_sdk_key() {
        let config = MapsConfig::default().with_api_key("sdk");
        assert_eq!(config.effective_geocoder_key(), "sdk");
        assert_eq!(config.with_geocoder_api_key("geo").effective_geocoder_key(), "geo");
    }
}
